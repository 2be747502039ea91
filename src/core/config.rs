use crate::core::{Result, SelruleError};
use std::env;
use std::path::PathBuf;

/// Default file extension scanned for class sources
pub const DEFAULT_EXTENSION: &str = "php";

/// Configuration for scanning a source tree against class selectors
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the application sources
    pub root: PathBuf,
    /// Namespace that maps onto `root`
    pub namespace: String,
    /// Only files with this extension are enumerated (without the dot)
    pub extension: Option<String>,
    /// Whether to print progress during a scan
    pub show_progress: bool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    root: Option<String>,
    namespace: Option<String>,
    extension: Option<String>,
    show_progress: bool,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn from_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| non_blank(Some(v.as_str())))
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: Option<&str>, try_env: bool) -> Self {
        self.root = non_blank(root);
        if self.root.is_none() && try_env {
            self.root = from_env("SELRULE_ROOT");
        }
        self
    }

    pub fn namespace(mut self, namespace: Option<&str>, try_env: bool) -> Self {
        self.namespace = non_blank(namespace);
        if self.namespace.is_none() && try_env {
            self.namespace = from_env("SELRULE_NAMESPACE");
        }
        self
    }

    /// A leading dot is accepted and stripped. Unset falls back to `php`.
    pub fn extension(mut self, extension: Option<&str>, try_env: bool) -> Self {
        self.extension = non_blank(extension);
        if self.extension.is_none() && try_env {
            self.extension = from_env("SELRULE_EXTENSION");
        }
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn build(self) -> Result<Config> {
        let root = self
            .root
            .ok_or_else(|| SelruleError::config("Root directory must be set"))?;

        let namespace = self
            .namespace
            .unwrap_or_default()
            .trim_matches('\\')
            .to_string();

        let extension = self
            .extension
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();
        let extension = if extension == "*" { None } else { Some(extension) };
        if extension.as_deref() == Some("") {
            return Err(SelruleError::config("Extension cannot be empty"));
        }

        Ok(Config {
            root: PathBuf::from(root),
            namespace,
            extension,
            show_progress: self.show_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect error if root is not set
    #[test]
    fn test_default_config() {
        let config = Config::builder().build();

        assert!(config.is_err());
    }

    #[test]
    fn test_config_with_custom_values() {
        let config = Config::builder()
            .root(Some("/srv/app"), false)
            .namespace(Some("\\App\\"), false)
            .extension(Some(".inc"), false)
            .show_progress(true)
            .build()
            .expect("Failed to create custom config");

        assert_eq!(config.root, PathBuf::from("/srv/app"));
        assert_eq!(config.namespace, "App");
        assert_eq!(config.extension.as_deref(), Some("inc"));
        assert!(config.show_progress);
    }

    #[test]
    fn test_extension_defaults_and_wildcard() {
        let config = Config::builder()
            .root(Some("src"), false)
            .build()
            .unwrap();
        assert_eq!(config.extension.as_deref(), Some("php"));

        let config = Config::builder()
            .root(Some("src"), false)
            .extension(Some("*"), false)
            .build()
            .unwrap();
        assert!(config.extension.is_none());
    }

    #[test]
    fn test_extension_only_dot_is_rejected() {
        let config = Config::builder()
            .root(Some("src"), false)
            .extension(Some("."), false)
            .build();

        assert!(config.is_err());
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            env::set_var("SELRULE_ROOT", "/tmp/selrule-root");
            env::set_var("SELRULE_NAMESPACE", "Demo");
        }

        let config = Config::builder()
            .root(None, true)
            .namespace(None, true)
            .build()
            .expect("Failed to create config from environment");

        assert_eq!(config.root, PathBuf::from("/tmp/selrule-root"));
        assert_eq!(config.namespace, "Demo");

        unsafe {
            env::remove_var("SELRULE_ROOT");
            env::remove_var("SELRULE_NAMESPACE");
        }
    }
}
