//! Entry parsing for BibTeX

use super::{lexer, utils, PResult, RawEntry, RawValue};
use crate::schema::ReferenceType;
use winnow::combinator::{alt, preceded};
use winnow::prelude::*;
use winnow::ascii::multispace0;

/// Parse one `@type{...}` block.
///
/// Returns `None` when the type literal is not a supported reference
/// type; the whole block is consumed and skipped.
pub fn parse_item<'a>(input: &mut &'a str) -> PResult<Option<RawEntry<'a>>> {
    preceded((multispace0, '@'), parse_item_content).parse_next(input)
}

/// Parse the content of an entry after the @
fn parse_item_content<'a>(input: &mut &'a str) -> PResult<Option<RawEntry<'a>>> {
    let tag = lexer::identifier.parse_next(input)?;
    lexer::skip_whitespace(input);

    let Some(ty) = ReferenceType::from_tag(tag) else {
        tracing::debug!(tag, "skipping unsupported entry type");
        let _ = alt((
            utils::balanced_delimited('{', '}'),
            utils::balanced_delimited('(', ')'),
        ))
        .parse_next(input)?;
        return Ok(None);
    };

    if input.starts_with('{') {
        *input = &input[1..];
        let entry = parse_entry_body(input, ty)?;
        utils::ws('}').parse_next(input)?;
        Ok(Some(entry))
    } else if input.starts_with('(') {
        *input = &input[1..];
        let entry = parse_entry_body(input, ty)?;
        utils::ws(')').parse_next(input)?;
        Ok(Some(entry))
    } else {
        Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::default(),
        ))
    }
}

/// Parse the body of an entry (key and fields)
fn parse_entry_body<'a>(input: &mut &'a str, ty: ReferenceType) -> PResult<RawEntry<'a>> {
    let key = utils::ws(lexer::identifier).parse_next(input)?;
    utils::ws(',').parse_next(input)?;
    let fields = parse_fields.parse_next(input)?;

    Ok(RawEntry { ty, key, fields })
}

/// Parse all fields in an entry
fn parse_fields<'a>(input: &mut &'a str) -> PResult<Vec<(&'a str, RawValue<'a>)>> {
    let mut fields = Vec::new();

    loop {
        lexer::skip_whitespace(input);

        if input.starts_with('}') || input.starts_with(')') || input.is_empty() {
            break;
        }

        match parse_field(input) {
            Ok(field) => {
                fields.push(field);

                lexer::skip_whitespace(input);
                if input.starts_with(',') {
                    *input = &input[1..];
                } else {
                    // no comma, we should be at the end
                    lexer::skip_whitespace(input);
                    if !input.starts_with('}') && !input.starts_with(')') {
                        return Err(winnow::error::ErrMode::Backtrack(
                            winnow::error::ContextError::default(),
                        ));
                    }
                }
            }
            Err(_) => break,
        }
    }

    Ok(fields)
}

/// Parse a single field (name = value)
fn parse_field<'a>(input: &mut &'a str) -> PResult<(&'a str, RawValue<'a>)> {
    let name = utils::ws(lexer::field_name).parse_next(input)?;
    utils::ws('=').parse_next(input)?;
    let value = utils::ws(parse_value).parse_next(input)?;

    Ok((name, value))
}

/// Parse a field value: `{braced}`, `"quoted"`, or a bare integer
fn parse_value<'a>(input: &mut &'a str) -> PResult<RawValue<'a>> {
    alt((parse_braced_value, parse_quoted_value, parse_number_value)).parse_next(input)
}

fn parse_braced_value<'a>(input: &mut &'a str) -> PResult<RawValue<'a>> {
    if !input.starts_with('{') {
        return Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::default(),
        ));
    }

    *input = &input[1..];
    let content = lexer::balanced_braces(input)?;

    if input.starts_with('}') {
        *input = &input[1..];
    } else {
        return Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::default(),
        ));
    }

    Ok(RawValue::Text(content))
}

fn parse_quoted_value<'a>(input: &mut &'a str) -> PResult<RawValue<'a>> {
    if !input.starts_with('"') {
        return Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::default(),
        ));
    }

    let s = lexer::quoted_string(input)?;
    Ok(RawValue::Text(s))
}

fn parse_number_value<'a>(input: &mut &'a str) -> PResult<RawValue<'a>> {
    let num = lexer::number(input)?;
    Ok(RawValue::Number(num))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entry() {
        let mut input = r#"@inproceedings{reed72,
            author = {Reed, Lou},
            title = "Walk on the Wild Side",
            booktitle = {Transformer},
            year = 1972
        }"#;

        let entry = parse_item(&mut input).unwrap().unwrap();
        assert_eq!(entry.ty, ReferenceType::InProceedings);
        assert_eq!(entry.key, "reed72");
        assert_eq!(entry.fields.len(), 4);

        assert_eq!(entry.fields[0], ("author", RawValue::Text("Reed, Lou")));
        assert_eq!(
            entry.fields[1],
            ("title", RawValue::Text("Walk on the Wild Side"))
        );
        assert_eq!(entry.fields[3], ("year", RawValue::Number(1972)));
    }

    #[test]
    fn test_parse_entry_with_trailing_comma() {
        let mut input = r#"@article{doe23,
            author = {Doe, Jane},
            title = {On Trailing Commas},
            journal = {Letters},
            year = 2023,
        }"#;

        let entry = parse_item(&mut input).unwrap().unwrap();
        assert_eq!(entry.fields.len(), 4);
    }

    #[test]
    fn test_parse_paren_delimited_entry() {
        let mut input = r#"@article(doe23,
            author = {Doe, Jane},
            title = {Parens},
            journal = {Letters},
            year = 2023
        )"#;

        let entry = parse_item(&mut input).unwrap().unwrap();
        assert_eq!(entry.key, "doe23");
    }

    #[test]
    fn test_unknown_type_consumes_block() {
        let mut input = "@misc{skipme, note = {ignored}} rest";
        let parsed = parse_item(&mut input).unwrap();
        assert!(parsed.is_none());
        assert_eq!(input, " rest");
    }

    #[test]
    fn test_nested_braces_in_value() {
        let mut input = r#"@article{doe23,
            author = {Doe, Jane},
            title = {The {TeX} Book},
            journal = {Letters},
            year = 2023
        }"#;

        let entry = parse_item(&mut input).unwrap().unwrap();
        assert_eq!(entry.fields[1], ("title", RawValue::Text("The {TeX} Book")));
    }
}
