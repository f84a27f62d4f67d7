//! Literal text decoding

/// Decode an integer literal (`42`, `0x_ff`, `0o17`, `0b1010`, `1_000`)
pub fn integer(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|ch| *ch != '_').collect();
    let cleaned = cleaned.trim_end_matches(['l', 'L']);
    let lower = cleaned.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(octal) = lower.strip_prefix("0o") {
        (octal, 8)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        (binary, 2)
    } else {
        (lower.as_str(), 10)
    };
    i64::from_str_radix(digits, radix).ok()
}

/// Decode a floating-point literal (`1.5`, `1.`, `.5`, `1e-3`, `1_0.0`)
///
/// Literals that overflow to infinity have no IR spelling and are rejected.
pub fn float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|ch| *ch != '_').collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whether a numeric literal is imaginary (`2j`)
pub fn is_imaginary(text: &str) -> bool {
    text.ends_with(['j', 'J'])
}

/// Resolve backslash escapes in a non-raw string body
///
/// Unknown escapes are kept verbatim, backslash included.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\n') => {}
            Some(escaped @ ('\\' | '\'' | '"')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
