use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{self, BufRead};

/// Trait for reading rule or selector lines
#[async_trait]
pub trait InputReader: Send + Sync {
    /// Read non-empty, non-comment lines from the input source
    async fn read_lines(&self) -> Result<Vec<String>>;
}

/// Trim a raw line; blank lines and `#` comments are dropped
fn clean_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reader that reads from standard input
pub struct StdinReader;

impl StdinReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputReader for StdinReader {
    async fn read_lines(&self) -> Result<Vec<String>> {
        let stdin = io::stdin();
        let mut lines = Vec::new();

        for line in stdin.lock().lines() {
            let line = line.context("Failed to read line from stdin")?;
            lines.extend(clean_line(&line));
        }

        Ok(lines)
    }
}

/// Reader that reads from a file
pub struct FileReader {
    file_path: String,
}

impl FileReader {
    pub fn new(file_path: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
        }
    }
}

#[async_trait]
impl InputReader for FileReader {
    async fn read_lines(&self) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(&self.file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", self.file_path))?;

        Ok(content.lines().filter_map(clean_line).collect())
    }
}

/// Reader that takes lines from a vector
pub struct VecReader {
    lines: Vec<String>,
}

impl VecReader {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl InputReader for VecReader {
    async fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self.lines.iter().filter_map(|l| clean_line(l)).collect())
    }
}
