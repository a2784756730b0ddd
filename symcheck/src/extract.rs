//! Undefined-symbol extraction from a nanoapp shared object.
//!
//! Shells out to the target toolchain's symbol reader and parses its wide
//! dynamic-symbol listing. The output contract: a fixed-size header block,
//! then one row per symbol whose last two whitespace-delimited columns are
//! the section indicator and the symbol name.
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::Command;

use crate::Error;

/// Section indicator marking a symbol as unresolved within the binary.
const UNDEFINED_SECTION: &str = "UND";

/// Runs `<tool> --dyn-syms --wide <binary>` and returns the names of the
/// undefined dynamic symbols, in listing order (duplicates preserved).
///
/// A missing tool or a non-zero exit is fatal: the gate must not pass on a
/// binary it could not inspect.
pub fn extract_undefined_symbols(
    tool: &Path,
    rows_to_discard: usize,
    binary: &Path,
) -> Result<Vec<String>, Error> {
    let output = Command::new(tool)
        .arg("--dyn-syms")
        .arg("--wide")
        .arg(binary)
        .output()
        .map_err(|source| Error::ToolSpawn { tool: tool.to_path_buf(), source })?;
    if !output.status.success() {
        return Err(Error::ToolFailed { tool: tool.to_path_buf(), status: output.status });
    }
    Ok(parse_listing(&String::from_utf8_lossy(&output.stdout), rows_to_discard))
}

/// Parses reader output. Rows with fewer than two tokens are skipped; only
/// rows whose section indicator is `UND` contribute.
fn parse_listing(listing: &str, rows_to_discard: usize) -> Vec<String> {
    let mut symbols = Vec::new();
    for line in listing.lines().skip(rows_to_discard) {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 {
            continue;
        }
        let (section, name) = (words[words.len() - 2], words[words.len() - 1]);
        if section == UNDEFINED_SECTION {
            symbols.push(name.to_string());
        }
    }
    symbols
}
