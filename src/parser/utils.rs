//! Parser utilities

use winnow::ascii::multispace0;
use winnow::prelude::*;

/// Make a parser whitespace-insensitive
pub fn ws<'a, F, O>(mut parser: F) -> impl Parser<&'a str, O, winnow::error::ContextError>
where
    F: Parser<&'a str, O, winnow::error::ContextError>,
{
    move |input: &mut &'a str| {
        let _ = multispace0.parse_next(input)?;
        let output = parser.parse_next(input)?;
        let _ = multispace0.parse_next(input)?;
        Ok(output)
    }
}

/// Parse a delimited block with balanced delimiters, returning the content
#[must_use]
pub fn balanced_delimited<'a>(
    open: char,
    close: char,
) -> impl Parser<&'a str, &'a str, winnow::error::ContextError> {
    move |input: &mut &'a str| {
        if !input.starts_with(open) {
            return Err(winnow::error::ErrMode::Backtrack(
                winnow::error::ContextError::default(),
            ));
        }

        let mut depth = 0;
        let mut pos = 0;
        let bytes = input.as_bytes();

        for (i, &byte) in bytes.iter().enumerate() {
            if byte == open as u8 {
                depth += 1;
            } else if byte == close as u8 {
                depth -= 1;
                if depth == 0 {
                    pos = i + 1;
                    break;
                }
            }
        }

        if depth == 0 && pos > 0 {
            let result = &input[1..pos - 1];
            *input = &input[pos..];
            Ok(result)
        } else {
            Err(winnow::error::ErrMode::Backtrack(
                winnow::error::ContextError::default(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws() {
        let mut input = "  hello  world  ";
        let mut parser = ws("hello");
        let result = parser.parse_next(&mut input).unwrap();
        assert_eq!(result, "hello");
        assert_eq!(input, "world  ");
    }

    #[test]
    fn test_balanced_delimited() {
        let mut input = "{a {b} c} rest";
        let result = balanced_delimited('{', '}').parse_next(&mut input).unwrap();
        assert_eq!(result, "a {b} c");
        assert_eq!(input, " rest");
    }
}
