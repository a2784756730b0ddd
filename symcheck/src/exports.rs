//! Scanner for export-macro call sites in platform loader sources.
//!
//! Two shapes are recognized, one name per line:
//! `ADD_EXPORTED_SYMBOL(internal, "external")` yields the quoted external
//! name, `ADD_EXPORTED_C_SYMBOL(ident)` yields the identifier itself.
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use crate::Error;

/// Reads a source file and returns the symbol names its export macros bind.
pub fn exported_symbols(path: &Path) -> Result<Vec<String>, Error> {
    let source = fs::read_to_string(path)
        .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
    Ok(source.lines().filter_map(scan_line).collect())
}

/// At most one exported name per line, matching the macro call-site shapes.
fn scan_line(line: &str) -> Option<String> {
    paired_export(line).or_else(|| c_export(line))
}

/// `ADD_EXPORTED_SYMBOL(internal, "external")` — the quoted external name.
fn paired_export(line: &str) -> Option<String> {
    let args = macro_args(line, "ADD_EXPORTED_SYMBOL")?;
    let (_, rest) = args.split_once(',')?;
    let (_, rest) = rest.split_once('"')?;
    let (name, _) = rest.split_once('"')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// `ADD_EXPORTED_C_SYMBOL(ident)` — the identifier, shared by both linkage names.
fn c_export(line: &str) -> Option<String> {
    let args = macro_args(line, "ADD_EXPORTED_C_SYMBOL")?;
    let (inner, _) = args.split_once(')')?;
    let name = inner.trim();
    if !is_c_identifier(name) {
        return None;
    }
    Some(name.to_string())
}

/// Locates a call site of `name` and returns the text after its opening
/// paren. Hits inside longer identifiers (e.g. a `_NAME` suffix macro) do
/// not count.
fn macro_args<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(found) = line[search..].find(name) {
        let start = search + found;
        let end = start + name.len();
        let bounded_left = line[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_ident_char(c));
        let after = line[end..].trim_start();
        if bounded_left && after.starts_with('(') {
            return Some(&after[1..]);
        }
        search = end;
    }
    None
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_ident_char)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_external_name_from_paired_form() {
        assert_eq!(
            scan_line("ADD_EXPORTED_SYMBOL(chreLogInternal, \"chreLog\");"),
            Some("chreLog".to_string())
        );
        // whitespace before the paren and around arguments is tolerated
        assert_eq!(
            scan_line("  ADD_EXPORTED_SYMBOL ( ns::wrapper , \"pw_assert_HandleFailure\" );"),
            Some("pw_assert_HandleFailure".to_string())
        );
    }

    #[test]
    fn captures_identifier_from_c_form() {
        assert_eq!(
            scan_line("ADD_EXPORTED_C_SYMBOL(chreGetTime);"),
            Some("chreGetTime".to_string())
        );
        assert_eq!(scan_line("ADD_EXPORTED_C_SYMBOL( memcpy )"), Some("memcpy".to_string()));
    }

    #[test]
    fn one_name_per_line_paired_form_wins() {
        let line = "ADD_EXPORTED_SYMBOL(a, \"ext\"); ADD_EXPORTED_C_SYMBOL(other);";
        assert_eq!(scan_line(line), Some("ext".to_string()));
    }

    #[test]
    fn ignores_non_call_lines() {
        assert!(scan_line("#define ADD_EXPORTED_C_SYMBOL_NAME(x) #x").is_none());
        assert!(scan_line("MY_ADD_EXPORTED_C_SYMBOL(not_this)").is_none());
        assert!(scan_line("void addSymbol(const char *name);").is_none());
        assert!(scan_line("").is_none());
    }

    #[test]
    fn malformed_call_contributes_nothing() {
        assert!(scan_line("ADD_EXPORTED_SYMBOL(missing_string_arg)").is_none());
        assert!(scan_line("ADD_EXPORTED_C_SYMBOL(1bad)").is_none());
    }
}
