//! Sessions configured from TOML files

#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "integration test crate"
)]

use integration_tests::compile_source;
use px_driver::{Config, DriverError};
use std::io::Write as _;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_relaxed_grouping_keeps_required_parentheses() {
    let file = config_file("[lowering]\ngroup_aggressively = false\n");
    let config = Config::load(file.path()).unwrap();
    let compiled =
        compile_source(config, "def f(a, b, c):\n    return (a - (b - c)) * a ** 2\n").unwrap();
    assert_eq!(
        compiled[0].ir,
        "define$1$0(f$1$0, a$1$6, b$1$9, c$1$12, (a$2$12 - (b$2$17 - c$2$21)) * a$2$27 ** 2)"
    );
}

#[test]
fn test_extra_references_and_module_bindings() {
    let file = config_file(
        r#"
[references]
norm = "vector_norm"

[modules]
la = ["norm", "solve"]
"#,
    );
    let config = Config::load(file.path()).unwrap();
    let compiled = compile_source(
        config,
        "def f(m, v):\n    x = la.solve(m, v)\n    return la.norm(x)\n",
    )
    .unwrap();
    assert_eq!(
        compiled[0].ir,
        "define$1$0(f$1$0, m$1$6, v$1$9, block$1$0(define$2$4(x$2$4, solve$2$8(m$2$17, v$2$20)), \
         vector_norm$3$11(x$3$19)))"
    );
}

#[test]
fn test_import_catalogue_override() {
    let file = config_file("[imports]\nnumeric = \"numpy\"\n");
    let config = Config::load(file.path()).unwrap();
    let compiled = compile_source(
        config,
        "import numeric as nm\n\ndef f(a):\n    return nm.dot(a, a)\n",
    )
    .unwrap();
    assert_eq!(compiled[0].ir, "define$3$0(f$3$0, a$3$6, dot$4$11(a$4$18, a$4$21))");
}

#[test]
fn test_invalid_config_is_rejected() {
    let file = config_file("[lowering]\ngroup_aggressively = \"yes\"\n");
    assert!(matches!(
        Config::load(file.path()),
        Err(DriverError::ConfigParse { .. })
    ));
}
