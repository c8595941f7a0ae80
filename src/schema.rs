//! Reference type registry and per-type field schemas

use std::fmt;

/// Fields rendered without braces in BibTeX output
pub const NUMERIC_FIELDS: &[&str] = &["year", "volume"];

/// Supported reference types
///
/// The set of variants is fixed at compile time. Each variant owns an
/// ordered field list (which defines serialization order) and the
/// mandatory subset of those fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    /// Article in conference proceedings
    InProceedings,
    /// Technical report
    TechReport,
    /// Article from a journal
    Article,
    /// Doctoral thesis
    Phd,
}

impl ReferenceType {
    /// All supported variants, in listing order
    pub const ALL: [Self; 4] = [Self::InProceedings, Self::TechReport, Self::Article, Self::Phd];

    /// Resolve an external BibTeX type literal (case-insensitive)
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "inproceedings" => Some(Self::InProceedings),
            "techreport" => Some(Self::TechReport),
            "article" => Some(Self::Article),
            "phd" => Some(Self::Phd),
            _ => None,
        }
    }

    /// The BibTeX type literal for this variant
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::InProceedings => "inproceedings",
            Self::TechReport => "techreport",
            Self::Article => "article",
            Self::Phd => "phd",
        }
    }

    /// Permitted field names, in serialization order
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::InProceedings => &[
                "author", "title", "booktitle", "year", "editor", "volume", "series", "pages",
                "address", "month", "note",
            ],
            Self::TechReport => &[
                "author",
                "title",
                "institution",
                "year",
                "type",
                "number",
                "address",
                "month",
                "note",
                "annote",
            ],
            Self::Article => &[
                "author", "title", "journal", "year", "volume", "number", "pages", "month", "note",
            ],
            Self::Phd => &[
                "author", "title", "school", "year", "type", "address", "month", "note",
            ],
        }
    }

    /// Subset of `fields` that must be present and non-empty
    #[must_use]
    pub const fn mandatory(self) -> &'static [&'static str] {
        match self {
            Self::InProceedings => &["author", "title", "booktitle", "year"],
            Self::TechReport => &["author", "title", "institution", "year"],
            Self::Article => &["author", "title", "journal", "year"],
            Self::Phd => &["author", "title", "school", "year"],
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// External type literals for all supported variants
#[must_use]
pub fn all_type_literals() -> Vec<&'static str> {
    ReferenceType::ALL.iter().map(|ty| ty.tag()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_subset_of_fields() {
        for ty in ReferenceType::ALL {
            for name in ty.mandatory() {
                assert!(
                    ty.fields().contains(name),
                    "{ty}: mandatory field '{name}' missing from field list"
                );
            }
        }
    }

    #[test]
    fn test_tag_round_trip() {
        for ty in ReferenceType::ALL {
            assert_eq!(ReferenceType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(ReferenceType::from_tag("INPROCEEDINGS"), Some(ReferenceType::InProceedings));
        assert_eq!(ReferenceType::from_tag("misc"), None);
    }

    #[test]
    fn test_all_type_literals() {
        assert_eq!(
            all_type_literals(),
            vec!["inproceedings", "techreport", "article", "phd"]
        );
    }
}
