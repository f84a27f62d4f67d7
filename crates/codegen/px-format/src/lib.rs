//! Human-readable rendering of IR source
//!
//! Nothing here is needed to run compiled code; it exists for people reading
//! the compiler's output.

use px_span::TAG_SEPARATOR;
use regex::Regex;
use std::iter;
use std::sync::LazyLock;

/// Default indentation step of [`format_ir`]
pub const INDENT_WIDTH: usize = 4;

#[allow(clippy::expect_used, reason = "the patterns are literals")]
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+").expect("position tag pattern is valid"));

/// A quoted string, an innermost parenthesized group, or any single character
#[allow(clippy::expect_used, reason = "the patterns are literals")]
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:\\.|[^"\\])*"|\([^()]*\)|."#).expect("token pattern is valid")
});

/// Remove every `$<digits>` position tag
pub fn strip_tags(src: &str) -> String {
    if !src.contains(TAG_SEPARATOR) {
        return src.to_string();
    }
    TAG.replace_all(src, "").into_owned()
}

/// Strip tags and lay the IR out one argument per line
///
/// Calls whose arguments contain no further parentheses stay on one line.
pub fn format_ir(src: &str) -> String {
    format_ir_with(src, INDENT_WIDTH)
}

/// [`format_ir`] with a custom indentation step
pub fn format_ir_with(src: &str, width: usize) -> String {
    let stripped = strip_tags(src);
    let mut out = String::with_capacity(stripped.len() * 2);
    let mut depth = 0usize;
    let newline = |buffer: &mut String, level: usize| {
        buffer.push('\n');
        buffer.extend(iter::repeat_n(' ', level * width));
    };

    for token in TOKEN.find_iter(&stripped).map(|found| found.as_str()) {
        match token {
            " " | "\t" | "\r" | "\n" => {}
            "(" => {
                out.push('(');
                depth += 1;
                newline(&mut out, depth);
            }
            ")" => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(')');
            }
            "," => {
                out.push(',');
                newline(&mut out, depth);
            }
            other => out.push_str(other),
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("define$1$0(x$2$4, nil$3$12)"),
            "define(x, nil)"
        );
        assert_eq!(strip_tags("set(a, 0, 0, 1, 0, 0, 0, 7)"), "set(a, 0, 0, 1, 0, 0, 0, 7)");
    }

    #[test]
    fn test_format_nested_calls() {
        let ir = "define$1$0(fib$1$0, n$1$8, if$2$4((n$2$7 < 2), n$3$15, \
                  (fib$5$15((n$5$19 - 1)) + fib$5$28((n$5$32 - 2)))))";
        expect![[r#"
            define(
                fib,
                n,
                if(
                    (n < 2),
                    n,
                    (
                        fib(
                            (n - 1)
                        )+fib(
                            (n - 2)
                        )
                    )
                )
            )
        "#]]
        .assert_eq(&format_ir(ir));
    }

    #[test]
    fn test_quoted_strings_are_opaque() {
        expect![[r#"
            cout(
                "a, (b)",
                x
            )
        "#]]
        .assert_eq(&format_ir("cout$1$0(\"a, (b)\", x$1$12)"));
    }

    #[test]
    fn test_custom_width() {
        assert_eq!(format_ir_with("f(g(x), y)", 2), "f(\n  g(x),\n  y\n)\n");
    }
}
