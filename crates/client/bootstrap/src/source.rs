//! Content sources consumed by the bootstrap builder.
use std::path::PathBuf;

use anyhow::{Context, Result};
use macrogame_content::{ContentBundle, ContentFactory};

use crate::config::PreviewConfig;

pub trait ContentSource: Send + Sync {
    fn load(&self) -> Result<ContentBundle>;
}

/// An already loaded bundle is its own source.
impl ContentSource for ContentBundle {
    fn load(&self) -> Result<ContentBundle> {
        Ok(self.clone())
    }
}

/// Content source that reads a macrogame content directory.
///
/// See [`ContentFactory`] for the expected file layout.
#[derive(Clone, Debug)]
pub struct DirectoryContentSource {
    data_dir: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Source named by `MACROGAME_CONTENT_DIR`, or the bundled sample.
    pub fn from_config(config: &PreviewConfig) -> Self {
        match &config.content_dir {
            Some(dir) => Self::new(dir),
            None => Self::default_paths(),
        }
    }

    /// Create with the bundled sample content.
    ///
    /// Looks for the data directory in the following order:
    /// 1. Relative to current executable (../../crates/game/content/data/summer)
    /// 2. Relative to current directory (crates/game/content/data/summer)
    pub fn default_paths() -> Self {
        const SAMPLE: &str = "crates/game/content/data/summer";

        let from_exe = std::env::current_exe().ok().and_then(|exe| {
            exe.parent()
                .and_then(|p| p.parent())
                .and_then(|p| p.parent())
                .map(|root| root.join(SAMPLE))
        });

        let data_dir = match from_exe {
            Some(dir) if dir.exists() => dir,
            _ => std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(SAMPLE),
        };

        Self::new(data_dir)
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }
}

impl ContentSource for DirectoryContentSource {
    fn load(&self) -> Result<ContentBundle> {
        if !self.data_dir.exists() {
            anyhow::bail!(
                "Content directory not found: {} (set MACROGAME_CONTENT_DIR to override)",
                self.data_dir.display()
            );
        }

        ContentFactory::new(&self.data_dir)
            .load_bundle()
            .with_context(|| format!("Failed to load content from {}", self.data_dir.display()))
    }
}
