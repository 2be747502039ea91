use crate::core::{Config, ErrorContext, Result, SelruleError};
use crate::io::{FileEnumerator, InputReader, class_name_for};
use crate::rules::SelectorSet;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

/// A class found under the scan root that matched a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
    pub class_name: String,
    pub path: PathBuf,
    pub selector: String,
}

/// Status of each scanned file for callback reporting
#[derive(Debug, Clone)]
pub enum ScanStatus {
    /// Class name matched the given selector
    Matched(String),
    /// No selector matched
    Skipped,
    /// The file could not be mapped to a class name
    Unmapped,
}

/// Scans a source tree and keeps the classes matching the configured selectors
pub struct ScanService {
    reader: Box<dyn InputReader>,
    config: Config,
    /// Cached matches so repeated calls don't walk the tree again
    matches: OnceLock<Vec<ClassMatch>>,
}

impl ScanService {
    pub fn new(reader: Box<dyn InputReader>, config: Config) -> Self {
        Self {
            reader,
            config,
            matches: OnceLock::new(),
        }
    }

    fn enumerator(&self) -> FileEnumerator {
        let enumerator = FileEnumerator::new(&self.config.root);
        match &self.config.extension {
            Some(ext) => enumerator.with_extension(ext.clone()),
            None => enumerator,
        }
    }

    /// Read selectors, walk the root and collect matching classes
    pub async fn matching_classes(&self) -> Result<Vec<ClassMatch>> {
        if let Some(cached) = self.matches.get() {
            return Ok(cached.clone());
        }

        let matches = self.scan_with(|_, _| {}).await?;
        let _ = self.matches.set(matches.clone());
        Ok(matches)
    }

    async fn scan_with<F>(&self, mut on_file: F) -> Result<Vec<ClassMatch>>
    where
        F: FnMut(&PathBuf, &ScanStatus),
    {
        let selectors = self.reader.read_lines().await?;
        if selectors.is_empty() {
            return Err(SelruleError::config("No selectors provided"));
        }

        if !self.config.root.is_dir() {
            return Err(SelruleError::config(format!(
                "Root directory does not exist: {}",
                self.config.root.display()
            )));
        }

        let set = SelectorSet::with_class_selectors(&selectors)
            .context_config("Failed to compile selectors")?;
        debug!(selectors = set.len(), root = %self.config.root.display(), "starting scan");

        let mut matches = Vec::new();
        for path in self.enumerator().files() {
            let status = match class_name_for(&self.config.root, &self.config.namespace, &path) {
                None => ScanStatus::Unmapped,
                Some(class_name) => match set.first_match(&class_name) {
                    Some(selector) => {
                        matches.push(ClassMatch {
                            class_name: class_name.clone(),
                            path: path.clone(),
                            selector: selector.to_string(),
                        });
                        ScanStatus::Matched(class_name)
                    }
                    None => ScanStatus::Skipped,
                },
            };
            on_file(&path, &status);
        }

        Ok(matches)
    }

    /// Run the scan, printing progress and a summary
    pub async fn run(&self) -> Result<Vec<ClassMatch>> {
        let show_progress = self.config.show_progress;
        if show_progress {
            println!("🔍 Scanning {}", self.config.root.display());
        }

        let mut scanned = 0usize;
        let mut unmapped = 0usize;
        let matches = self
            .scan_with(|path, status| {
                scanned += 1;
                match status {
                    ScanStatus::Matched(class_name) if show_progress => {
                        println!("✓ {} ({})", class_name, path.display());
                    }
                    ScanStatus::Unmapped => unmapped += 1,
                    _ => {}
                }
            })
            .await?;

        if show_progress {
            println!("\n📊 Scan Summary:");
            println!("  📁 Scanned: {} files", scanned);
            println!("  ✓ Matched: {} classes", matches.len());
            if unmapped > 0 {
                println!("  ⚠️  Unmapped: {} files", unmapped);
            }
        }

        let _ = self.matches.set(matches.clone());
        Ok(matches)
    }
}
