use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Separator between namespace segments in a class name
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Produces lazy, finite passes over the files under a root directory.
///
/// Each call to [`FileEnumerator::files`] starts a fresh walk; a consumed
/// iterator is not restartable.
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    root: PathBuf,
    extension: Option<String>,
}

impl FileEnumerator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extension: None,
        }
    }

    /// Keep only files whose extension equals `extension`, ignoring case
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree. A missing root yields nothing.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + use<> {
        let walker = self
            .root
            .is_dir()
            .then(|| WalkDir::new(&self.root).follow_links(true).into_iter());
        let extension = self.extension.clone();

        walker
            .into_iter()
            .flatten()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(move |path| match &extension {
                Some(ext) => has_extension(path, ext),
                None => true,
            })
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// All files under `root`
pub fn enumerate_files<P: Into<PathBuf>>(root: P) -> impl Iterator<Item = PathBuf> {
    FileEnumerator::new(root).files()
}

/// Files under `root` with the given extension
pub fn enumerate_files_with_extension<P: Into<PathBuf>>(
    root: P,
    extension: &str,
) -> impl Iterator<Item = PathBuf> {
    FileEnumerator::new(root).with_extension(extension).files()
}

/// Join a directory and a file name; the trailing separator is optional
pub fn join_path(dir: &str, file_name: &str) -> String {
    let mut result = dir.to_string();
    if !result.ends_with(MAIN_SEPARATOR) {
        result.push(MAIN_SEPARATOR);
    }
    result.push_str(file_name);
    result
}

/// Last segment of a namespaced class name
pub fn class_short_name(class_name: &str) -> &str {
    class_name
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(class_name)
}

/// Directory holding `namespace`, given the directory of the app namespace.
///
/// Returns `None` when `namespace` is not inside `app_namespace`.
pub fn namespace_path(app_namespace: &str, app_root: &Path, namespace: &str) -> Option<PathBuf> {
    let app_namespace = app_namespace.trim_matches(NAMESPACE_SEPARATOR);
    let namespace = namespace.trim_matches(NAMESPACE_SEPARATOR);
    let rest = namespace.strip_prefix(app_namespace)?;
    if !(rest.is_empty() || rest.starts_with(NAMESPACE_SEPARATOR)) {
        return None;
    }

    Some(
        rest.split(NAMESPACE_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(app_root.to_path_buf(), |path, segment| path.join(segment)),
    )
}

/// Class name for a source file under `root`, inverse of [`namespace_path`]
pub fn class_name_for(root: &Path, app_namespace: &str, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        return None;
    }

    let app_namespace = app_namespace.trim_matches(NAMESPACE_SEPARATOR);
    if !app_namespace.is_empty() {
        segments.insert(0, app_namespace.to_string());
    }
    Some(segments.join(&NAMESPACE_SEPARATOR.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let model = temp_dir.path().join("Model");
        fs::create_dir(&model).unwrap();
        fs::write(model.join("User.php"), "<?php").unwrap();
        fs::write(model.join("Order.PHP"), "<?php").unwrap();
        fs::write(temp_dir.path().join("README.md"), "docs").unwrap();
        fs::write(temp_dir.path().join("Main.php"), "<?php").unwrap();
        temp_dir
    }

    #[test]
    fn test_enumerate_all_files() {
        let temp_dir = sample_tree();
        let files: Vec<PathBuf> = enumerate_files(temp_dir.path()).collect();

        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_enumerate_with_extension() {
        let temp_dir = sample_tree();
        let files: Vec<PathBuf> = enumerate_files_with_extension(temp_dir.path(), "php").collect();

        assert_eq!(files.len(), 3);
        assert!(!files.iter().any(|p| p.ends_with("README.md")));
        assert!(files.iter().any(|p| p.ends_with("Order.PHP")));
    }

    #[test]
    fn test_enumerate_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert_eq!(enumerate_files(missing).count(), 0);
    }

    #[test]
    fn test_enumerator_fresh_pass() {
        let temp_dir = sample_tree();
        let enumerator = FileEnumerator::new(temp_dir.path()).with_extension("php");

        assert_eq!(enumerator.files().count(), 3);
        fs::write(temp_dir.path().join("Late.php"), "<?php").unwrap();
        assert_eq!(enumerator.files().count(), 4);
    }

    #[test]
    fn test_join_path() {
        let sep = MAIN_SEPARATOR;
        assert_eq!(join_path("dir", "file.txt"), format!("dir{sep}file.txt"));
        assert_eq!(
            join_path(&format!("dir{sep}"), "file.txt"),
            format!("dir{sep}file.txt")
        );
    }

    #[test]
    fn test_class_short_name() {
        assert_eq!(class_short_name("App\\Model\\User"), "User");
        assert_eq!(class_short_name("User"), "User");
        assert_eq!(class_short_name(""), "");
    }

    #[test]
    fn test_namespace_path() {
        let root = Path::new("/srv/app");
        assert_eq!(
            namespace_path("App", root, "App\\Model\\Sub"),
            Some(root.join("Model").join("Sub"))
        );
        assert_eq!(namespace_path("App", root, "App"), Some(root.to_path_buf()));
        assert_eq!(namespace_path("App", root, "Application\\X"), None);
        assert_eq!(namespace_path("App", root, "Lib\\X"), None);
    }

    #[test]
    fn test_class_name_for() {
        let root = Path::new("/srv/app");
        let file = root.join("Model").join("User.php");
        assert_eq!(
            class_name_for(root, "App", &file).as_deref(),
            Some("App\\Model\\User")
        );
        assert_eq!(class_name_for(root, "", &file).as_deref(), Some("Model\\User"));
        assert_eq!(class_name_for(root, "App", Path::new("/elsewhere/X.php")), None);
    }
}
