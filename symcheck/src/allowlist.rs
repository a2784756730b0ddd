//! Allowed-symbol aggregation and wildcard-aware matching.
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::{exports, headers, Error};

/// The set of symbol names a nanoapp may reference externally. An entry
/// containing `*` is a wildcard matching every symbol that starts with the
/// text before the first `*`. Built once per check, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    entries: BTreeSet<String>,
}

impl Allowlist {
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.entries.extend(names);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Observed symbols covered by no entry: plain set difference on exact
    /// names, then wildcard entries absorb every symbol sharing their
    /// prefix. An entry that is just `*` absorbs everything. Pure function.
    pub fn disallowed(&self, observed: &[String]) -> BTreeSet<String> {
        let mut diff: BTreeSet<String> = observed
            .iter()
            .filter(|sym| !self.entries.contains(sym.as_str()))
            .cloned()
            .collect();
        for entry in &self.entries {
            if let Some(pos) = entry.find('*') {
                let prefix = &entry[..pos];
                diff.retain(|sym| !sym.starts_with(prefix));
            }
        }
        diff
    }
}

impl FromIterator<String> for Allowlist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Allowlist { entries: iter.into_iter().collect() }
    }
}

/// Unions every allowed-symbol source for one check: API and platform
/// headers, export-macro sources, the platform's flat list (only if the file
/// exists) and an optional caller-supplied extra list. Per-source counts are
/// logged for observability; they never affect the result.
pub fn compute_allowed_symbols(
    api_headers: &[PathBuf],
    platform_headers: &[PathBuf],
    export_sources: &[PathBuf],
    platform_list: Option<&Path>,
    extra_list: Option<&Path>,
) -> Result<Allowlist, Error> {
    let mut allowed = Allowlist::default();

    let mut declared = 0usize;
    for path in api_headers.iter().chain(platform_headers) {
        let names = headers::declared_functions(path)?;
        declared += names.len();
        allowed.extend(names);
    }
    info!("{declared} dynamic symbols found in api headers");

    for path in export_sources {
        let names = exports::exported_symbols(path)?;
        info!("{} dynamic symbols found in {}", names.len(), path.display());
        allowed.extend(names);
    }

    if let Some(path) = platform_list {
        if path.exists() {
            let names = read_symbol_list(path)?;
            info!("{} dynamic symbols found in {}", names.len(), path.display());
            allowed.extend(names);
        }
    }

    if let Some(path) = extra_list {
        let names = read_symbol_list(path)?;
        info!("{} dynamic symbols found in {}", names.len(), path.display());
        allowed.extend(names);
    }

    Ok(allowed)
}

/// Newline-delimited symbol names, trimmed. Blank lines are skipped so an
/// empty entry can never act as an accidental match-all.
pub fn read_symbol_list(path: &Path) -> Result<Vec<String>, Error> {
    let data = fs::read_to_string(path)
        .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn list(entries: &[&str]) -> Allowlist {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn observed(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn without_wildcards_matches_plain_set_difference() {
        let allowed = list(&["chreGetTime", "chreLog"]);
        let seen = observed(&["chreGetTime", "mallocHook", "chreLog"]);
        let diff = allowed.disallowed(&seen);
        assert_eq!(diff, BTreeSet::from(["mallocHook".to_string()]));
    }

    #[test]
    fn wildcard_absorbs_prefix_matches() {
        let allowed = list(&["foo*"]);
        let seen = observed(&["foobar", "foo", "barfoo"]);
        let diff = allowed.disallowed(&seen);
        assert_eq!(diff, BTreeSet::from(["barfoo".to_string()]));
    }

    #[test]
    fn bare_wildcard_absorbs_everything() {
        let allowed = list(&["*"]);
        let seen = observed(&["anything", "at", "all"]);
        assert!(allowed.disallowed(&seen).is_empty());
    }

    #[test]
    fn duplicate_prefixes_and_repeat_runs_are_idempotent() {
        let allowed = list(&["pw_*", "pw_*trace", "chreLog"]);
        let seen = observed(&["pw_assert_HandleFailure", "chreLog", "mallocHook", "chreLog"]);
        let first = allowed.disallowed(&seen);
        let second = allowed.disallowed(&seen);
        assert_eq!(first, second);
        assert_eq!(first, BTreeSet::from(["mallocHook".to_string()]));
    }

    #[test]
    fn literal_and_wildcard_entries_are_distinct_rules() {
        // "foo" the literal does not absorb "foobar"; only "foo*" would
        let allowed = list(&["foo"]);
        let seen = observed(&["foobar"]);
        assert_eq!(allowed.disallowed(&seen), BTreeSet::from(["foobar".to_string()]));
    }

    #[test]
    fn union_of_independent_sources() {
        let temp = TempDir::new().unwrap();
        let header = temp.path().join("chre.h");
        std::fs::write(&header, "uint64_t chreGetTime(void);\n").unwrap();
        let loader = temp.path().join("nanoapp_loader.cc");
        std::fs::write(&loader, "ADD_EXPORTED_C_SYMBOL(memcpy);\n").unwrap();
        let flat = temp.path().join("dl_base_symbols.lst");
        let mut f = std::fs::File::create(&flat).unwrap();
        writeln!(f, "  qurt_mutex_lock  \n\n__wrap_*").unwrap();

        let allowed = compute_allowed_symbols(
            &[header],
            &[],
            &[loader.clone()],
            Some(&flat),
            None,
        )
        .unwrap();
        assert_eq!(allowed.len(), 4);
        let seen = observed(&["chreGetTime", "memcpy", "qurt_mutex_lock", "__wrap_malloc"]);
        assert!(allowed.disallowed(&seen).is_empty());
    }

    #[test]
    fn absent_platform_list_is_tolerated_missing_extra_list_is_not() {
        let temp = TempDir::new().unwrap();
        let absent = temp.path().join("absent.lst");

        let allowed =
            compute_allowed_symbols(&[], &[], &[], Some(&absent), None).unwrap();
        assert!(allowed.is_empty());

        let err = compute_allowed_symbols(&[], &[], &[], None, Some(&absent)).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn blank_lines_never_become_a_match_all() {
        let temp = TempDir::new().unwrap();
        let flat = temp.path().join("symbols.lst");
        std::fs::write(&flat, "\n   \nchreLog\n").unwrap();
        let names = read_symbol_list(&flat).unwrap();
        assert_eq!(names, vec!["chreLog"]);
    }
}
