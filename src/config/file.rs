//
//  hubrest
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O Module
//!
//! Thin helpers used by [`Config`](super::Config) to read and write its
//! TOML file. Writes create missing parent directories.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the whole configuration file as UTF-8.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes `content` to `path`, creating parent directories first.
///
/// Existing files are overwritten.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Returns `true` when a configuration file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.exists()
}
