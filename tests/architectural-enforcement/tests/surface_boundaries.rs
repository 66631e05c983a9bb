//! Integration Test: Surface Boundaries
//!
//! **Policy**:
//! - The chat client issues non-streaming generate requests only.
//! - The forwarder crates carry no terminal UI dependency; the chat client
//!   reaches Ollama only through the forwarder's wire types.

use std::path::Path;

use architectural_enforcement::{
    code_part, production_lines, production_sources, read_source, workspace_root, Violation,
};

#[test]
fn test_client_never_requests_streaming() {
    let mut violations = Vec::new();

    for path in production_sources() {
        let content = read_source(&path);
        for (number, line) in production_lines(&content) {
            let code = code_part(line).replace(' ', "");
            if code.contains("stream:true") || code.contains("\"stream\":true") {
                violations.push(Violation {
                    path: path.clone(),
                    line: number,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    assert!(
        violations.is_empty(),
        "streaming requests are not supported:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn manifest(relative: &str) -> String {
    read_source(&workspace_root().join(relative).join("Cargo.toml"))
}

#[test]
fn test_forwarder_has_no_terminal_dependencies() {
    for crate_dir in ["forwarder/core", "forwarder/daemon"] {
        let toml = manifest(crate_dir);
        assert!(!toml.is_empty(), "missing manifest for {crate_dir}");
        for forbidden in ["ratatui", "crossterm"] {
            assert!(
                !toml.contains(forbidden),
                "{crate_dir} must not depend on {forbidden}"
            );
        }
    }
}

#[test]
fn test_client_does_not_address_ollama_directly() {
    let tui_src = workspace_root().join("tui/src");
    for path in production_sources()
        .into_iter()
        .filter(|p| p.starts_with(&tui_src))
    {
        let content = read_source(&path);
        for (number, line) in production_lines(&content) {
            let code = code_part(line);
            assert!(
                !code.contains(":11434/"),
                "{}:{} builds an Ollama URL; go through the forwarder",
                display(&path),
                number
            );
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
