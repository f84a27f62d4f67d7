//! Error reporting

use colored::Colorize as _;
use miette::Diagnostic as _;
use px_driver::DriverError;

/// Print `error[code]: message` followed by its causes
pub fn print_error(error: &anyhow::Error) {
    let headline = match code(error) {
        Some(code) => format!("error[{code}]"),
        None => "error".to_string(),
    };
    eprintln!("{}: {error}", headline.red().bold());
    for cause in error.chain().skip(1) {
        eprintln!("  {} {cause}", "caused by:".bold());
    }
}

/// Diagnostic code of the first driver error in the chain
fn code(error: &anyhow::Error) -> Option<String> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DriverError>())
        .and_then(|driver| driver.code())
        .map(|code| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_code_found_through_context() {
        let error = Err::<(), _>(DriverError::FunctionNotFound {
            name: "f".to_string(),
        })
        .context("failed to compile a.py")
        .unwrap_err();
        assert_eq!(code(&error).as_deref(), Some("driver::function_not_found"));
    }

    #[test]
    fn test_plain_errors_have_no_code() {
        assert_eq!(code(&anyhow::anyhow!("boom")), None);
    }
}
