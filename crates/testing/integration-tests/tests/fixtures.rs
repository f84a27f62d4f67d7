//! Checked-in source files and the IR listings they compile to

#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "integration test crate"
)]

use integration_tests::{Fixture, fixtures_dir};
use px_driver::Config;

#[test]
fn test_all_fixtures() {
    let fixtures = Fixture::load_all(fixtures_dir()).expect("Failed to load fixtures");
    assert!(!fixtures.is_empty(), "No fixtures found in {:?}", fixtures_dir());

    let mut failures = Vec::new();
    for fixture in &fixtures {
        match fixture.compile(Config::default()) {
            Ok(listing) if listing == fixture.expected => {}
            Ok(listing) => failures.push(format!(
                "{}:\n  expected: {}  actual:   {}",
                fixture.name, fixture.expected, listing
            )),
            Err(error) => failures.push(format!("{}: {error:#}", fixture.name)),
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        fixtures.len(),
        failures.join("\n")
    );
}

#[test]
fn test_fixture_names() {
    let names: Vec<_> = Fixture::load_all(fixtures_dir())
        .unwrap()
        .into_iter()
        .map(|fixture| fixture.name)
        .collect();
    assert_eq!(
        names,
        vec!["corner", "fibonacci", "loops", "projection", "running_total"]
    );
}
