//! CONTEXT: Symbol-allowlist verification for nanoapp shared objects
//! INTENT: Gate builds on undefined dynamic symbols the host runtime cannot resolve
//! DEPS: serde/toml (config), thiserror (errors), log (per-source counts)
//! READINESS: Library ready; consumed by tools/check-nanoapp-symbols
//! TESTS: Scanner/matcher unit tests per module; end-to-end flow in tests/check_flow.rs
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

pub mod allowlist;
pub mod config;
pub mod exports;
pub mod extract;
pub mod headers;

pub use allowlist::Allowlist;
pub use config::{CheckConfig, PlatformProfile};

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    MissingConfig(PathBuf),
    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown platform `{0}`")]
    UnknownPlatform(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run symbol reader `{tool}`: {source}")]
    ToolSpawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("symbol reader `{tool}` exited with {status}")]
    ToolFailed { tool: PathBuf, status: ExitStatus },
}

/// Result of one allowlist check. A non-empty `disallowed` set is the
/// reportable outcome of the gate, not an error.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Undefined dynamic symbols observed in the nanoapp, in reader order.
    pub observed: Vec<String>,
    /// Number of distinct allowlist entries aggregated for this run.
    pub allowed_count: usize,
    /// Observed symbols covered by no allowlist entry.
    pub disallowed: BTreeSet<String>,
}

impl CheckOutcome {
    pub fn is_clean(&self) -> bool {
        self.disallowed.is_empty()
    }
}

/// Runs the whole check once: extract the nanoapp's undefined symbols,
/// aggregate the allowlist for `platform`, and diff the two.
///
/// Extraction happens first so a broken reader fails the run even when the
/// platform profile is also bad, matching the gate's one-shot semantics.
pub fn run_check(
    config: &CheckConfig,
    platform: &str,
    nanoapp: &Path,
    extra_symbols_file: Option<&Path>,
) -> Result<CheckOutcome, Error> {
    let observed =
        extract::extract_undefined_symbols(&config.elf_reader, config.rows_to_discard, nanoapp)?;
    log::info!("{} dynamic symbols found in {}", observed.len(), nanoapp.display());

    let profile = config.profile(platform)?;
    let allowed = allowlist::compute_allowed_symbols(
        &config.api_header_paths()?,
        &profile.headers,
        &profile.export_sources,
        profile.symbol_list.as_deref(),
        extra_symbols_file,
    )?;

    let disallowed = allowed.disallowed(&observed);
    Ok(CheckOutcome { observed, allowed_count: allowed.len(), disallowed })
}
