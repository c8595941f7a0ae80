//! Reference services: the collaborator-facing API
//!
//! The interactive UI and CLI layers call into the core exclusively
//! through [`ReferenceService`], which owns the repository instance and
//! wires validation, key generation, and the BibTeX codec together.

use crate::error::{Error, Result};
use crate::keygen;
use crate::model::{Reference, Value};
use crate::parser;
use crate::repository::Repository;
use crate::schema::ReferenceType;
use crate::validate;
use ahash::AHashMap;
use std::path::Path;
use tracing::debug;

/// Field selector for [`ReferenceService::filter_references`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Match against the author field
    Author,
    /// Match against the title field
    Title,
    /// Match against the year field rendered as text
    Year,
}

impl FilterField {
    const fn name(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Title => "title",
            Self::Year => "year",
        }
    }
}

/// Service facade over a repository backend
pub struct ReferenceService {
    repository: Box<dyn Repository>,
}

impl std::fmt::Debug for ReferenceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceService").finish_non_exhaustive()
    }
}

impl ReferenceService {
    /// Create a service owning the given repository
    #[must_use]
    pub fn new(repository: Box<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Validate a field map, derive a citation key when none is supplied,
    /// and persist the reference. Returns the key under which the
    /// reference was saved.
    pub fn create_reference(
        &mut self,
        ty: ReferenceType,
        fields: AHashMap<String, Value>,
        manual_key: Option<&str>,
    ) -> Result<String> {
        validate::validate_entry(ty, &fields)?;

        let key = match manual_key {
            Some(key) => key.to_string(),
            None => {
                // author and year are mandatory for every type, so both
                // are present once validation has passed
                let author = fields.get("author").map(Value::to_text).unwrap_or_default();
                let year = fields
                    .get("year")
                    .map(Value::to_text)
                    .unwrap_or_default()
                    .parse::<i64>()
                    .unwrap_or_default();
                keygen::construct_key(&author, year, self.repository.as_ref())?
            }
        };

        let reference = Reference::validated(ty, key.clone(), fields)?;
        self.repository.save(reference)?;
        debug!(key = %key, "created reference");
        Ok(key)
    }

    /// Delete a reference by key
    pub fn delete_reference(&mut self, key: &str) -> Result<()> {
        self.repository.delete_by_key(key)
    }

    /// All references, in storage order
    pub fn load_all(&self) -> Result<Vec<Reference>> {
        self.repository.load_all()
    }

    /// One reference by key
    pub fn load_one(&self, key: &str) -> Result<Reference> {
        self.repository.load_one(key)
    }

    /// Import references from a `.bib` file.
    ///
    /// Entries of unsupported types are skipped. Entries that fail
    /// validation, or whose key is already taken, are reported as
    /// `(key, error)` pairs without aborting the batch; everything else
    /// is persisted.
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<(String, Error)>> {
        let text = std::fs::read_to_string(path)?;
        let entries = parser::parse_bib(&text)?;

        let mut failures = Vec::new();
        for entry in entries {
            let key = entry.key.to_string();
            let outcome = Reference::validated(entry.ty, key.clone(), entry.field_map())
                .and_then(|reference| self.repository.save(reference));
            if let Err(e) = outcome {
                debug!(key = %key, error = %e, "import entry failed");
                failures.push((key, e));
            }
        }
        Ok(failures)
    }

    /// Export the whole repository to a `.bib` file
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.repository.save_to_file(path.as_ref())
    }

    /// Filter references by a case-insensitive substring match against
    /// the selected field
    #[must_use]
    pub fn filter_references(
        references: &[Reference],
        field: FilterField,
        needle: &str,
    ) -> Vec<Reference> {
        let needle = needle.to_lowercase();
        references
            .iter()
            .filter(|reference| {
                reference
                    .get_text(field.name())
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}
