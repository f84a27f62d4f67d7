//! Known-module catalogues
//!
//! `import numpy as np` binds `np` to the members listed here, so qualified
//! calls through `np` resolve without an explicit `[modules]` entry.

/// Top-level members of the numeric array library
const NUMPY: &[&str] = &[
    "abs", "all", "any", "arange", "argmax", "argmin", "array", "ceil", "clip", "concatenate",
    "cos", "cross", "cumsum", "diag", "diagonal", "dot", "e", "empty", "exp", "eye", "floor",
    "full", "hstack", "identity", "inner", "linalg", "linspace", "log", "matmul", "max", "mean",
    "min", "ones", "outer", "pi", "power", "prod", "random", "reshape", "shape", "sin", "sqrt",
    "square", "stack", "std", "sum", "tan", "tanh", "transpose", "vstack", "where", "zeros",
];

/// Members exposed by the catalogue called `name`
pub fn members(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "numpy" => Some(NUMPY),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numpy_catalogue() {
        let numpy = members("numpy").unwrap();
        assert!(numpy.contains(&"dot"));
        assert!(numpy.contains(&"linalg"));
        assert!(numpy.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_unknown_catalogue() {
        assert_eq!(members("pandas"), None);
    }
}
