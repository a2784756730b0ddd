//! Explicit check configuration: symbol-reader path, API header roots and the
//! platform-profile table, loaded once from a TOML file. Replaces the
//! process-environment lookups the original workflow relied on.
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Error;

/// Per-platform sources feeding the allowlist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformProfile {
    /// Flat newline-delimited symbol list, consulted only if the file exists.
    #[serde(default)]
    pub symbol_list: Option<PathBuf>,
    /// Platform extension headers scanned for function declarations.
    #[serde(default)]
    pub headers: Vec<PathBuf>,
    /// Sources scanned for export-macro call sites.
    #[serde(default)]
    pub export_sources: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Symbol-table dump tool, e.g. llvm-readelf for the target toolchain.
    pub elf_reader: PathBuf,
    /// Introductory lines of reader output preceding the first symbol row.
    /// A property of the tool's output format, not of the data.
    #[serde(default = "default_rows_to_discard")]
    pub rows_to_discard: usize,
    /// Individual API headers scanned for every platform.
    #[serde(default)]
    pub api_headers: Vec<PathBuf>,
    /// Directories whose `*.h` entries are scanned for every platform.
    #[serde(default)]
    pub api_header_dirs: Vec<PathBuf>,
    #[serde(default, rename = "platform")]
    pub platforms: BTreeMap<String, PlatformProfile>,
}

fn default_rows_to_discard() -> usize {
    4
}

impl CheckConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::MissingConfig(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&data)
            .map_err(|source| Error::ParseConfig { path: path.to_path_buf(), source })
    }

    pub fn profile(&self, name: &str) -> Result<&PlatformProfile, Error> {
        self.platforms.get(name).ok_or_else(|| Error::UnknownPlatform(name.to_string()))
    }

    /// Expands `api_headers` plus every `.h` file under `api_header_dirs`,
    /// directory entries sorted for a stable scan order.
    pub fn api_header_paths(&self) -> Result<Vec<PathBuf>, Error> {
        let mut paths = self.api_headers.clone();
        for dir in &self.api_header_dirs {
            let mut entries = Vec::new();
            for entry in fs::read_dir(dir)
                .map_err(|source| Error::Read { path: dir.clone(), source })?
            {
                let entry =
                    entry.map_err(|source| Error::Read { path: dir.clone(), source })?;
                entries.push(entry.path());
            }
            entries.sort();
            for path in entries {
                if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("h") {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }
}
