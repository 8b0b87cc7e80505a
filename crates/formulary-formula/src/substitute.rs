//! Parameter substitution
//!
//! Inlines argument text into a callee body. Each word token of the body is
//! looked at exactly once; a token equal to a parameter name is replaced by the
//! argument at that parameter's position. Replacement text is never re-scanned,
//! so an argument that happens to contain another parameter's name stays intact.
//! Tokens inside string literals are left alone.

use crate::error::{FormulaError, FormulaResult};
use ahash::AHashMap;
use lazy_regex::regex;
use regex::Captures;

/// Replace whole-token parameter occurrences in `body` with `args`
///
/// `parameters` and `args` must have the same length; `function` names the
/// callee for the error message otherwise.
///
/// # Example
/// ```rust
/// use formulary_formula::substitute;
///
/// let out = substitute("WRAP", "range + input_range", &["range"], &["A1:A3"]).unwrap();
/// assert_eq!(out, "A1:A3 + input_range");
/// ```
pub fn substitute<P, A>(
    function: &str,
    body: &str,
    parameters: &[P],
    args: &[A],
) -> FormulaResult<String>
where
    P: AsRef<str>,
    A: AsRef<str>,
{
    if parameters.len() != args.len() {
        return Err(FormulaError::ArgumentCount {
            function: function.to_string(),
            expected: parameters.len(),
            actual: args.len(),
        });
    }

    if parameters.is_empty() {
        return Ok(body.to_string());
    }

    // First declaration wins if a name repeats
    let mut positions: AHashMap<&str, usize> = AHashMap::with_capacity(parameters.len());
    for (i, param) in parameters.iter().enumerate() {
        positions.entry(param.as_ref()).or_insert(i);
    }

    let tokens = regex!(r#""(?:[^"]|"")*"|'(?:[^']|'')*'|\w+"#);
    let replaced = tokens.replace_all(body, |caps: &Captures| {
        let token = &caps[0];
        match positions.get(token) {
            Some(&i) => args[i].as_ref().to_string(),
            None => token.to_string(),
        }
    });

    Ok(replaced.into_owned())
}
