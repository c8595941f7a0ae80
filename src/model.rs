//! Data model for bibliography references

use crate::error::{Error, Result};
use crate::schema::{ReferenceType, NUMERIC_FIELDS};
use crate::validate;
use ahash::AHashMap;
use std::fmt;

/// A field value: free text, or an integer for numeric fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// String value
    Text(String),
    /// Number value
    Number(i64),
}

impl Value {
    /// Get the value rendered as plain text
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Whether the value is an empty string
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One bibliography entry
///
/// Instances can only be built through [`Reference::validated`], so every
/// reference in circulation satisfies its type's schema: no field outside
/// the permitted list, every mandatory field present and non-empty.
/// References are immutable; an edit is a delete followed by a re-save.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    ty: ReferenceType,
    key: String,
    fields: AHashMap<String, Value>,
}

impl Reference {
    /// Validated construction: the only public way to build a `Reference`.
    ///
    /// Checks the key is non-empty, then runs the full entry validation
    /// (extra-field check, mandatory-presence check, per-field format
    /// checks, in that order). Digit-only values of numeric fields are
    /// normalized to [`Value::Number`] so equality is representation
    /// independent.
    pub fn validated(
        ty: ReferenceType,
        key: impl Into<String>,
        fields: AHashMap<String, Value>,
    ) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::MissingField {
                field: "key".to_string(),
            });
        }
        validate::validate_entry(ty, &fields)?;
        Ok(Self::from_storage(ty, key, fields))
    }

    /// Rebuild a reference from fields already validated at save time.
    pub(crate) fn from_storage(
        ty: ReferenceType,
        key: String,
        mut fields: AHashMap<String, Value>,
    ) -> Self {
        for name in NUMERIC_FIELDS {
            if let Some(Value::Text(text)) = fields.get(*name) {
                if let Ok(n) = text.parse::<i64>() {
                    fields.insert((*name).to_string(), Value::Number(n));
                }
            }
        }
        Self { ty, key, fields }
    }

    /// Get the reference type
    #[must_use]
    pub const fn reference_type(&self) -> ReferenceType {
        self.ty
    }

    /// Get the citation key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a field value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value rendered as plain text
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(Value::to_text)
    }

    /// Get all fields
    #[must_use]
    pub const fn fields(&self) -> &AHashMap<String, Value> {
        &self.fields
    }

    /// Render the reference as a BibTeX entry.
    ///
    /// Fields appear one per line in schema order, absent fields are
    /// omitted, numeric fields (`year`, `volume`) are unbraced, all other
    /// values are wrapped in braces.
    #[must_use]
    pub fn to_bibtex(&self) -> String {
        let mut lines = Vec::new();
        for name in self.ty.fields() {
            let Some(value) = self.fields.get(*name) else {
                continue;
            };
            let printable = if NUMERIC_FIELDS.contains(name) {
                value.to_text()
            } else {
                format!("{{{value}}}")
            };
            lines.push(format!("    {name:<13}= {printable}"));
        }
        format!("@{}{{{},\n{}\n}}\n", self.ty.tag(), self.key, lines.join(",\n"))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bibtex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inproceedings_fields() -> AHashMap<String, Value> {
        let mut fields = AHashMap::new();
        fields.insert("author".to_string(), Value::Text("Reed, Lou".to_string()));
        fields.insert(
            "title".to_string(),
            Value::Text("Walk on the Wild Side".to_string()),
        );
        fields.insert("booktitle".to_string(), Value::Text("Transformer".to_string()));
        fields.insert("year".to_string(), Value::Text("1972".to_string()));
        fields
    }

    #[test]
    fn test_render_schema_order_and_braces() {
        let mut fields = inproceedings_fields();
        fields.insert("pages".to_string(), Value::Text("12-13".to_string()));
        let reference =
            Reference::validated(ReferenceType::InProceedings, "reed72", fields).unwrap();

        assert_eq!(
            reference.to_bibtex(),
            "@inproceedings{reed72,\n\
             \x20   author       = {Reed, Lou},\n\
             \x20   title        = {Walk on the Wild Side},\n\
             \x20   booktitle    = {Transformer},\n\
             \x20   year         = 1972,\n\
             \x20   pages        = {12-13}\n\
             }\n"
        );
    }

    #[test]
    fn test_numeric_normalization() {
        let reference =
            Reference::validated(ReferenceType::InProceedings, "reed72", inproceedings_fields())
                .unwrap();
        assert_eq!(reference.get("year"), Some(&Value::Number(1972)));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = Reference::validated(ReferenceType::InProceedings, "", inproceedings_fields());
        assert!(matches!(result, Err(Error::MissingField { field }) if field == "key"));
    }
}
