//! Flat-file repository backend

use super::Repository;
use crate::error::{Error, Result};
use crate::model::Reference;
use crate::parser;
use crate::writer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Repository backed by a `.bib` file mirrored by an in-memory index.
///
/// Saves append the rendered entry to the backing file; deletion rewrites
/// the file from the index. Storage order is insertion order.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    references: Vec<Reference>,
}

impl FileRepository {
    /// Open a file-backed repository, loading any existing entries.
    ///
    /// The file is created on the first save if it does not exist yet.
    /// Stored entries that no longer validate are skipped with a warning
    /// rather than failing the open.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut references = Vec::new();

        if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            for entry in parser::parse_bib(&text)? {
                match Reference::validated(entry.ty, entry.key, entry.field_map()) {
                    Ok(reference) => references.push(reference),
                    Err(e) => warn!(key = entry.key, error = %e, "skipping invalid stored entry"),
                }
            }
            debug!(
                count = references.len(),
                path = %path.display(),
                "loaded file repository"
            );
        }

        Ok(Self { path, references })
    }
}

impl Repository for FileRepository {
    fn save(&mut self, reference: Reference) -> Result<()> {
        if self.references.iter().any(|r| r.key() == reference.key()) {
            return Err(Error::KeyAlreadyExists(reference.key().to_string()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(reference.to_bibtex().as_bytes())?;
        file.write_all(b"\n")?;

        debug!(key = reference.key(), "saved reference");
        self.references.push(reference);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Reference>> {
        Ok(self.references.clone())
    }

    fn load_one(&self, key: &str) -> Result<Reference> {
        self.references
            .iter()
            .find(|r| r.key() == key)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    fn delete_by_key(&mut self, key: &str) -> Result<()> {
        let before = self.references.len();
        self.references.retain(|r| r.key() != key);

        if self.references.len() != before {
            writer::to_file(&self.references, &self.path)?;
            debug!(key, "deleted reference");
        }
        Ok(())
    }

    fn count_keys_containing(&self, needle: &str) -> Result<usize> {
        Ok(self
            .references
            .iter()
            .filter(|r| r.key().contains(needle))
            .count())
    }

    fn save_to_file(&self, path: &Path) -> Result<()> {
        writer::to_file(&self.references, path)
    }
}
