//! Integration Test: Async Boundaries
//!
//! **Policy**: Code inside `async fn` bodies MUST NOT block the runtime.
//! **Required**: `tokio::fs`, `tokio::net`, `tokio::time::sleep`, async reqwest.
//!
//! Blocking setup (reading the config file, creating the log file) is fine
//! in plain functions called before or outside the event loop.

use architectural_enforcement::{
    async_fn_lines, code_part, production_lines, production_sources, read_source, Violation,
};

/// Calls that block the executor thread
const BLOCKING_CALLS: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("File::open", "Blocking file I/O"),
    ("File::create", "Blocking file I/O"),
    ("std::net::TcpListener", "Blocking network I/O"),
    ("std::net::TcpStream", "Blocking network I/O"),
    ("std::thread::sleep", "Blocking sleep"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    (".read_line(", "Blocking stdin read"),
];

fn find_blocking_calls() -> Vec<(Violation, &'static str)> {
    let mut violations = Vec::new();

    for path in production_sources() {
        let content = read_source(&path);
        let lines = production_lines(&content);

        for (number, line) in async_fn_lines(&lines) {
            let code = code_part(line);
            for (pattern, kind) in BLOCKING_CALLS {
                if code.contains(pattern) {
                    violations.push((
                        Violation {
                            path: path.clone(),
                            line: number,
                            text: line.trim().to_string(),
                        },
                        *kind,
                    ));
                }
            }
        }
    }

    violations
}

#[test]
fn test_production_sources_are_found() {
    let sources = production_sources();
    assert!(
        sources.iter().any(|p| p.ends_with("forwarder/core/src/routes.rs")),
        "forwarder sources not found: {sources:?}"
    );
    assert!(
        sources.iter().any(|p| p.ends_with("tui/src/app.rs")),
        "tui sources not found: {sources:?}"
    );
}

#[test]
fn test_no_blocking_calls_in_async_functions() {
    let violations = find_blocking_calls();

    if !violations.is_empty() {
        eprintln!("\nBlocking calls found inside async functions:\n");
        for (violation, kind) in &violations {
            eprintln!("  {kind}: {violation}");
        }
        eprintln!("\nUse tokio::fs, tokio::net, tokio::time::sleep, or move the call");
        eprintln!("into a plain function that runs before the event loop.");

        panic!(
            "\nFound {} blocking call(s) in async code.",
            violations.len()
        );
    }
}
