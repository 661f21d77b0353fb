//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code MUST NOT sleep. Slide rotation and the clock
//! audio run on `tokio::time::interval`, which keeps a fixed phase and can be
//! cancelled by dropping it.
//! **Exception**: the mock content service, which simulates request latency.

use std::path::Path;

use architectural_enforcement::{production_sources, scan_file, SourceLine};

/// Files allowed to sleep, relative to a production root
const SLEEP_ALLOWED: &[&str] = &["service/mock.rs"];

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();
    for path in production_sources() {
        if is_allowed(&path) {
            continue;
        }
        scan_file(&path, &mut violations, sleep_rule);
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Sleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Use tokio::time::interval or wait on a channel instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_allow_list_matches_real_files() {
    for allowed in SLEEP_ALLOWED {
        assert!(
            production_sources().iter().any(|p| p.ends_with(allowed)),
            "allow-listed file {allowed} no longer exists"
        );
    }
}

fn sleep_rule(line: SourceLine<'_>) -> Option<&'static str> {
    if line.code.contains("thread::sleep") {
        Some("Thread sleep")
    } else if line.code.contains("::sleep(") || line.code.contains("sleep_until(") {
        Some("Timer sleep")
    } else {
        None
    }
}

fn is_allowed(path: &Path) -> bool {
    SLEEP_ALLOWED.iter().any(|allowed| path.ends_with(allowed))
}
