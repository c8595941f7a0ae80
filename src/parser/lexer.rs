//! Lexical analysis for BibTeX

use super::PResult;
use winnow::prelude::*;
use winnow::{
    ascii::digit1,
    combinator::{alt, opt},
    token::take_while,
};

fn backtrack() -> winnow::error::ErrMode<winnow::error::ContextError> {
    winnow::error::ErrMode::Backtrack(winnow::error::ContextError::default())
}

/// Parse an identifier (letters, numbers, underscores, hyphens, colons)
pub fn identifier<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || c == '_' || c == '-' || c == ':' || c == '.'
    })
    .parse_next(input)
}

/// Parse a field name
pub fn field_name<'a>(input: &mut &'a str) -> PResult<&'a str> {
    identifier.parse_next(input)
}

/// Parse content up to the closing brace of the current depth,
/// tolerating balanced nested braces and backslash escapes
pub fn balanced_braces<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let original = *input;
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let Some(offset) = memchr::memchr3(b'{', b'}', b'\\', &bytes[pos..]) else {
            break;
        };
        pos += offset;
        match bytes[pos] {
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                if depth == 0 {
                    let result = &original[..pos];
                    *input = &original[pos..];
                    return Ok(result);
                }
                depth -= 1;
                pos += 1;
            }
            _ => {
                // backslash: skip the escaped character too
                pos += 2;
            }
        }
    }

    Err(backtrack())
}

/// Parse a quoted string "..."
pub fn quoted_string<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let start = *input;
    let bytes = input.as_bytes();

    if bytes.is_empty() || bytes[0] != b'"' {
        return Err(backtrack());
    }

    let mut pos = 1;
    let mut brace_depth = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if pos + 1 < bytes.len() => pos += 2,
            b'"' if brace_depth == 0 => {
                let result = &start[1..pos];
                *input = &start[pos + 1..];
                return Ok(result);
            }
            b'{' => {
                brace_depth += 1;
                pos += 1;
            }
            b'}' if brace_depth > 0 => {
                brace_depth -= 1;
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    Err(backtrack())
}

/// Parse a number (integer)
pub fn number(input: &mut &str) -> PResult<i64> {
    let sign = opt(alt(('+', '-'))).parse_next(input)?;
    let digits = digit1.parse_next(input)?;

    let mut num = digits.parse::<i64>().map_err(|_| backtrack())?;

    if sign == Some('-') {
        num = -num;
    }

    Ok(num)
}

/// Fast whitespace skipping
pub fn skip_whitespace(input: &mut &str) {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            _ => break,
        }
    }

    *input = &input[pos..];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        let mut input = "reed72:a xxx";
        let result = identifier(&mut input).unwrap();
        assert_eq!(result, "reed72:a");
        assert_eq!(input, " xxx");
    }

    #[test]
    fn test_balanced_braces() {
        let mut input = "hello {nested {braces}} world} xxx";
        let result = balanced_braces(&mut input).unwrap();
        assert_eq!(result, "hello {nested {braces}} world");
        assert_eq!(input, "} xxx");
    }

    #[test]
    fn test_balanced_braces_unclosed() {
        let mut input = "no closing brace here";
        assert!(balanced_braces(&mut input).is_err());
    }

    #[test]
    fn test_quoted_string() {
        let mut input = r#""hello \"world\"" xxx"#;
        let result = quoted_string(&mut input).unwrap();
        assert_eq!(result, r#"hello \"world\""#);
        assert_eq!(input, " xxx");

        let mut input = r#""hello {world}" xxx"#;
        let result = quoted_string(&mut input).unwrap();
        assert_eq!(result, "hello {world}");
    }

    #[test]
    fn test_number() {
        let mut input = "1972 xxx";
        assert_eq!(number(&mut input).unwrap(), 1972);

        let mut input = "-42 xxx";
        assert_eq!(number(&mut input).unwrap(), -42);
    }
}
