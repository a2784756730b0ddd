//! Narrowly scoped C declaration scanner.
//!
//! Extracts the names of functions declared with a C-style prototype in an
//! API header. This is deliberately not a C parser: comments and preprocessor
//! lines are stripped, the remainder is split into top-level statements, and
//! each statement ending in a parameter list yields the identifier heading
//! that list. Anything the scanner does not recognize is skipped, never
//! fatal.
// Copyright 2026 Nanoapp Tooling Contributors
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use crate::Error;

/// Reads a header and returns the function names it declares, in order of
/// appearance. Unreadable files are fatal; unparseable statements are not.
pub fn declared_functions(path: &Path) -> Result<Vec<String>, Error> {
    let source = fs::read_to_string(path)
        .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
    let names = scan_declarations(&source);
    if names.is_empty() {
        log::warn!("no function declarations recognized in {}", path.display());
    }
    Ok(names)
}

/// Best-effort extraction of declared function names from header text.
pub fn scan_declarations(source: &str) -> Vec<String> {
    let code = strip_preprocessor(&strip_comments(source));
    top_level_statements(&code)
        .iter()
        .filter_map(|stmt| declaration_name(stmt))
        .collect()
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    // keep line structure so directives still end where they did
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                out.push(' ');
            }
            '"' | '\'' => {
                out.push(c);
                let mut escaped = false;
                for next in chars.by_ref() {
                    out.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == c {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_preprocessor(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut continued = false;
    for line in source.lines() {
        if continued || line.trim_start().starts_with('#') {
            continued = line.trim_end().ends_with('\\');
            out.push('\n');
            continue;
        }
        continued = false;
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Splits code into top-level statements at `;` and `{`, skipping brace
/// bodies. An `extern "C"` linkage block is transparent: its contents stay at
/// top level, since every CHRE-style header wraps its prototypes in one.
fn top_level_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in source.chars() {
        match c {
            '{' if depth == 0 => {
                if current.trim_end().ends_with("extern \"C\"") {
                    current.clear();
                } else {
                    flush(&mut statements, &mut current);
                    depth = 1;
                }
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => flush(&mut statements, &mut current),
            _ if depth == 0 => current.push(c),
            _ => {}
        }
    }
    flush(&mut statements, &mut current);
    statements
}

fn flush(statements: &mut Vec<String>, current: &mut String) {
    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    current.clear();
}

/// The declared name of a prototype statement, or None for anything that is
/// not a function declaration (typedefs, function-pointer declarators,
/// macro call sites, aggregate definitions).
fn declaration_name(stmt: &str) -> Option<String> {
    let stmt = strip_variadic_tail(stmt);
    let stmt = stmt.trim();
    if stmt.is_empty() || stmt.starts_with("typedef") {
        return None;
    }

    // tolerate a bare trailing attribute macro after the parameter list
    let close = stmt.rfind(')')?;
    if !stmt[close + 1..]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace())
    {
        return None;
    }
    let stmt = &stmt[..=close];

    // walk back from the closing paren to the '(' opening the parameter list
    let mut depth = 0usize;
    let mut open = None;
    for (i, b) in stmt.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    open = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let head = stmt[..open?].trim_end();

    let name_start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i)?;
    let name = &head[name_start..];
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    // a trailing attribute parsed as the parameter list, e.g. __attribute__((...))
    if name.starts_with("__") {
        return None;
    }

    // a declaration needs a return type before the name; a bare NAME(...) is
    // a macro call site, and '=' means an initializer expression
    let prefix = head[..name_start].trim_end();
    if prefix.is_empty() || prefix.contains('=') {
        return None;
    }
    let last = prefix.chars().last()?;
    if !is_ident_char(last) && last != '*' && last != '&' {
        return None;
    }
    Some(name.to_string())
}

/// Drops a variadic tail (`, ...`) so the parameter-list walk is not thrown
/// off by the ellipsis.
fn strip_variadic_tail(stmt: &str) -> String {
    let mut out = stmt.to_string();
    while let Some(pos) = out.find("...") {
        let head = out[..pos].trim_end();
        let cut = if head.ends_with(',') { head.len() - 1 } else { pos };
        out.replace_range(cut..pos + 3, "");
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
