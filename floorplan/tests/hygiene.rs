//! Source-tree rules for the floorplan library.
//!
//! The editing core (document, viewport, drag, hit testing, scene, SVG) is
//! plain synchronous geometry that runs unchanged in the browser and in
//! native tests. Browser bindings live only in the two modules that talk to
//! the DOM, and the library reports through `tracing` rather than stdio.
//! Budgets only ever go down.

use std::fs;
use std::path::Path;

/// Modules allowed to touch `web_sys` / `wasm_bindgen` / `js_sys`.
const BROWSER_MODULES: &[&str] = &["engine.rs", "render.rs"];

/// Modules that must stay free of clocks, runtimes and I/O.
const SYNC_CORE: &[&str] = &["doc.rs", "viewport.rs", "drag.rs", "hit.rs", "scene.rs", "svg.rs", "input.rs"];

/// Modules doing room-space arithmetic; they stay in `f64` end to end.
const GEOMETRY: &[&str] = &["doc.rs", "viewport.rs", "drag.rs", "hit.rs", "scene.rs", "svg.rs"];

const PANIC_BUDGETS: &[(&str, usize)] = &[
    (".unwrap()", 0),
    (".expect(", 0),
    ("panic!(", 0),
    ("unreachable!(", 0),
    ("todo!(", 0),
    ("unimplemented!(", 0),
];

const DISCARD_BUDGETS: &[(&str, usize)] = &[("let _ =", 0), (".ok()", 0), ("#[allow(dead_code)]", 0)];

const STDIO_BUDGETS: &[(&str, usize)] = &[("println!(", 0), ("eprintln!(", 0), ("print!(", 0), ("dbg!(", 0)];

struct SourceFile {
    name: String,
    code: Vec<String>,
}

/// Production files under `src/`, with comment lines removed.
fn source_files() -> Vec<SourceFile> {
    let Ok(entries) = fs::read_dir(Path::new("src")) else {
        return Vec::new();
    };
    let mut files: Vec<SourceFile> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "rs"))
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().to_string();
            if name.ends_with("_test.rs") {
                return None;
            }
            let content = fs::read_to_string(&path).ok()?;
            let code = content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .map(str::to_owned)
                .collect();
            Some(SourceFile { name, code })
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

/// True when `line` uses `pattern` as a token. Patterns that begin with an
/// identifier character must not be the tail of a longer identifier, so
/// `println!(` does not match inside `eprintln!(`.
fn mentions(line: &str, pattern: &str) -> bool {
    let word_start = pattern.starts_with(|c: char| c.is_alphanumeric() || c == '_');
    line.match_indices(pattern).any(|(at, _)| {
        !word_start || !line[..at].ends_with(|c: char| c.is_alphanumeric() || c == '_')
    })
}

/// `(file:line, text)` for every line in `files` that mentions `pattern`.
fn hits<'a>(files: impl IntoIterator<Item = &'a SourceFile>, pattern: &str) -> Vec<String> {
    files
        .into_iter()
        .flat_map(|file| {
            file.code
                .iter()
                .enumerate()
                .filter(move |(_, line)| mentions(line, pattern))
                .map(move |(i, line)| format!("  {}:{}: {}", file.name, i + 1, line.trim()))
        })
        .collect()
}

fn only<'a>(files: &'a [SourceFile], names: &'a [&str]) -> impl Iterator<Item = &'a SourceFile> + Clone {
    files.iter().filter(move |f| names.contains(&f.name.as_str()))
}

fn except<'a>(files: &'a [SourceFile], names: &'a [&str]) -> impl Iterator<Item = &'a SourceFile> + Clone {
    files.iter().filter(move |f| !names.contains(&f.name.as_str()))
}

fn check_budgets(files: &[SourceFile], budgets: &[(&str, usize)]) -> Vec<String> {
    budgets
        .iter()
        .filter_map(|&(pattern, max)| {
            let found = hits(files, pattern);
            (found.len() > max).then(|| format!("{pattern} found {} (max {max})\n{}", found.len(), found.join("\n")))
        })
        .collect()
}

fn check_forbidden<'a>(files: impl Iterator<Item = &'a SourceFile> + Clone, patterns: &[&str]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| hits(files.clone(), pattern))
        .collect()
}

// =============================================================
// Scanner
// =============================================================

#[test]
fn scanner_sees_every_module() {
    let files = source_files();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    for expected in ["lib.rs", "doc.rs", "drag.rs", "engine.rs", "render.rs", "poller.rs"] {
        assert!(names.contains(&expected), "{expected} missing from scan: {names:?}");
    }
    assert!(!names.iter().any(|n| n.ends_with("_test.rs")));
}

#[test]
fn mentions_respects_identifier_boundaries() {
    assert!(mentions("    println!(\"x\");", "println!("));
    assert!(!mentions("    eprintln!(\"x\");", "println!("));
    assert!(mentions("let v = x.unwrap();", ".unwrap()"));
    assert!(!mentions("use my_web_sys::Foo;", "web_sys"));
}

// =============================================================
// Budgets
// =============================================================

#[test]
fn library_code_does_not_panic() {
    let over = check_budgets(&source_files(), PANIC_BUDGETS);
    assert!(over.is_empty(), "panic paths in library code:\n{}", over.join("\n"));
}

#[test]
fn library_code_does_not_discard_errors() {
    let over = check_budgets(&source_files(), DISCARD_BUDGETS);
    assert!(over.is_empty(), "silently discarded results:\n{}", over.join("\n"));
}

#[test]
fn library_code_logs_through_tracing() {
    let over = check_budgets(&source_files(), STDIO_BUDGETS);
    assert!(over.is_empty(), "stdio output in library code, use tracing:\n{}", over.join("\n"));
}

// =============================================================
// Module boundaries
// =============================================================

#[test]
fn browser_bindings_stay_in_engine_and_render() {
    let files = source_files();
    let found = check_forbidden(except(&files, BROWSER_MODULES), &["web_sys", "wasm_bindgen", "js_sys"]);
    assert!(found.is_empty(), "browser bindings outside {BROWSER_MODULES:?}:\n{}", found.join("\n"));
}

#[test]
fn editing_core_has_no_clock_or_runtime() {
    let files = source_files();
    let found = check_forbidden(
        only(&files, SYNC_CORE),
        &["std::time", "Instant", "tokio", "reqwest", "async ", ".await"],
    );
    assert!(found.is_empty(), "clock or runtime in the synchronous core:\n{}", found.join("\n"));
}

#[test]
fn geometry_has_no_numeric_casts() {
    let files = source_files();
    let found = check_forbidden(
        only(&files, GEOMETRY),
        &[" as f64", " as f32", " as i32", " as i64", " as u32", " as u64", " as usize"],
    );
    assert!(found.is_empty(), "numeric casts in geometry code:\n{}", found.join("\n"));
}
