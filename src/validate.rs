//! Field-format and entry-level validation

use crate::error::{Error, Result};
use crate::model::Value;
use crate::schema::ReferenceType;
use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEAR_PATTERN: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref MONTH_PATTERN: Regex = Regex::new(
        r"(?i)^(0?[1-9]|1[0-2]|jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|jun(e)?|jul(y)?|aug(ust)?|sep(tember)?|oct(ober)?|nov(ember)?|dec(ember)?)$"
    )
    .unwrap();
    static ref VOLUME_PATTERN: Regex = Regex::new(r"^\d+$").unwrap();
    static ref PAGES_PATTERN: Regex = Regex::new(r"^\d+(-{1,2}\d+)?$").unwrap();
}

/// Validate a single field value against its format rule.
///
/// Format rules are independent of the reference type: `year` must be
/// exactly four digits, `month` a 1-12 number or an English month name
/// (full or three-letter), `volume` digits only, `pages` a page number or
/// a `start-end`/`start--end` range. Every other field accepts any text.
pub fn validate_field(name: &str, raw: &str) -> Result<()> {
    match name {
        "year" if !YEAR_PATTERN.is_match(raw) => Err(Error::YearFormat(raw.to_string())),
        "month" if !MONTH_PATTERN.is_match(raw) => Err(Error::MonthFormat(raw.to_string())),
        "volume" if !VOLUME_PATTERN.is_match(raw) => Err(Error::VolumeFormat(raw.to_string())),
        "pages" if !PAGES_PATTERN.is_match(raw) => Err(Error::PagesFormat(raw.to_string())),
        _ => Ok(()),
    }
}

/// Validate a field map against a reference type's schema.
///
/// Checks run in a fixed order and the first failure wins: extra-field
/// check, mandatory-presence check, then per-field format checks in
/// schema order.
pub fn validate_entry(ty: ReferenceType, fields: &AHashMap<String, Value>) -> Result<()> {
    let allowed = ty.fields();
    if fields.keys().any(|name| !allowed.contains(&name.as_str())) {
        return Err(Error::ExtraFields {
            entry_type: ty.to_string(),
        });
    }

    for name in ty.mandatory() {
        match fields.get(*name) {
            Some(value) if !value.is_empty() => {}
            _ => {
                return Err(Error::MissingField {
                    field: (*name).to_string(),
                })
            }
        }
    }

    for name in allowed.iter().copied() {
        if let Some(value) = fields.get(name) {
            if value.is_empty() {
                return Err(Error::MissingField {
                    field: name.to_string(),
                });
            }
            validate_field(name, &value.to_text())?;
        }
    }

    Ok(())
}
