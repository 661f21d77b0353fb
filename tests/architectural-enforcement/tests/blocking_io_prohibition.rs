//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async code in vibeshow MUST NOT block the runtime.
//! **Required**: `tokio::fs`, `tokio::io`, async `reqwest`, `tokio::time`.
//!
//! Blocking calls in plain `fn`s are allowed (config loading runs before any
//! work is scheduled).

use architectural_enforcement::{
    is_in_async_function, production_sources, scan_file, SourceLine, Violation,
};

#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();
    for path in production_sources() {
        scan_file(&path, &mut violations, blocking_io_rule);
    }

    report(&violations);
}

#[test]
fn test_no_blocking_http_client_anywhere() {
    let mut violations = Vec::new();
    for path in production_sources() {
        scan_file(&path, &mut violations, |line| {
            line.code
                .contains("reqwest::blocking")
                .then_some("Blocking HTTP client")
        });
    }

    report(&violations);
}

fn blocking_io_rule(line: SourceLine<'_>) -> Option<&'static str> {
    let code = line.code;
    let rule = if code.contains("std::fs::") || code.contains("use std::fs") {
        "Blocking file I/O"
    } else if code.contains("std::net::") {
        "Blocking network I/O"
    } else if code.contains("std::process::Command") {
        "Blocking process I/O"
    } else if code.contains("std::io::stdin()") || code.contains("std::io::stdout()") {
        "Blocking stdin/stdout"
    } else {
        return None;
    };

    // `use` lines have no enclosing fn; flag them only when they pull in std::fs
    if code.trim_start().starts_with("use ") || is_in_async_function(line.lines, line.index) {
        Some(rule)
    } else {
        None
    }
}

fn report(violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ Blocking I/O found in async code:\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!("\n✅ Use tokio::fs, tokio::io::stdin, async reqwest instead.");

    panic!(
        "\nFound {} blocking I/O violation(s) in production code.",
        violations.len()
    );
}
