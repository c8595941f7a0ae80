//! Persistence abstraction for references

pub mod file;
pub mod sqlite;

pub use file::FileRepository;
pub use sqlite::SqliteRepository;

use crate::error::Result;
use crate::model::Reference;
use crate::writer;
use std::path::Path;

/// Backend-agnostic persistence contract for references.
///
/// A repository owns an ordered collection of references keyed by
/// citation key. Implementations must not leak backend-specific types
/// across this boundary; callers select a backend at startup and pass
/// the instance explicitly to consumers.
pub trait Repository {
    /// Persist a reference.
    ///
    /// Rejects with [`crate::Error::KeyAlreadyExists`] when the citation
    /// key is already present.
    fn save(&mut self, reference: Reference) -> Result<()>;

    /// All references, in storage order
    fn load_all(&self) -> Result<Vec<Reference>>;

    /// Retrieve one reference by citation key
    fn load_one(&self, key: &str) -> Result<Reference>;

    /// Remove a reference by key.
    ///
    /// Deleting an absent key is a no-op, not an error.
    fn delete_by_key(&mut self, key: &str) -> Result<()>;

    /// Number of stored keys containing `needle` as a substring
    fn count_keys_containing(&self, needle: &str) -> Result<usize>;

    /// Serialize the entire current state to a `.bib` file
    fn save_to_file(&self, path: &Path) -> Result<()> {
        writer::to_file(&self.load_all()?, path)
    }
}
