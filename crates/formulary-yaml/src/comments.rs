//! Comment removal for formula bodies
//!
//! Spreadsheets do not accept comments in formulas, but formula files may use
//! `// line` and `/* block */` comments for readability.

/// Remove `//` and `/* */` comments that are outside string literals
///
/// Line comments stop before the newline, which is kept. An unterminated block
/// comment runs to the end of the text.
///
/// # Example
/// ```rust
/// use formulary_yaml::strip_comments;
///
/// assert_eq!(strip_comments("A1 /* note */ + 1 // done"), "A1  + 1 ");
/// assert_eq!(strip_comments(r#""http://x""#), r#""http://x""#);
/// ```
pub fn strip_comments(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut chars = formula.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            // A doubled quote closes and reopens, which needs no special case
            if c == q {
                quote = None;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) | ('\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.peek().map_or(false, |&n| n != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_comments() {
        let text = "LET(\n  x, 1, // the input\n  x * 2\n)";
        assert_eq!(strip_comments(text), "LET(\n  x, 1, \n  x * 2\n)");
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(strip_comments("A1/* multi\nline */+B1"), "A1+B1");
        assert_eq!(strip_comments("A1 /* unterminated"), "A1 ");
        assert_eq!(strip_comments("A1 /**/ / 2"), "A1  / 2");
    }

    #[test]
    fn test_strings_are_preserved() {
        assert_eq!(
            strip_comments(r#"CONCAT("a // b", 'c /* d */', """//""") // tail"#),
            r#"CONCAT("a // b", 'c /* d */', """//""") "#
        );
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(strip_comments("A1 / B1"), "A1 / B1");
    }
}
