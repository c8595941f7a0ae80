//! # bibkeep
//!
//! A BibTeX reference manager core: validated reference entries,
//! deterministic citation keys, BibTeX parsing and serialization, and
//! interchangeable file / SQLite persistence backends.
//!
//! ## Features
//!
//! - Closed set of reference types with per-type field schemas
//! - Field-format validation (year, month, volume, pages)
//! - Deterministic citation-key derivation with collision handling
//! - Stable BibTeX output: rendered entries re-parse to equal references
//! - Flat-file and relational persistence behind one repository trait
//!
//! ## Example
//!
//! ```
//! use ahash::AHashMap;
//! use bibkeep::{ReferenceService, ReferenceType, SqliteRepository, Value};
//!
//! let repository = SqliteRepository::open_in_memory()?;
//! let mut service = ReferenceService::new(Box::new(repository));
//!
//! let mut fields = AHashMap::new();
//! fields.insert("author".to_string(), Value::Text("Reed, Lou".to_string()));
//! fields.insert("title".to_string(), Value::Text("Walk on the Wild Side".to_string()));
//! fields.insert("booktitle".to_string(), Value::Text("Transformer".to_string()));
//! fields.insert("year".to_string(), Value::Text("1972".to_string()));
//!
//! let key = service.create_reference(ReferenceType::InProceedings, fields, None)?;
//! assert_eq!(key, "reed72");
//! # Ok::<(), bibkeep::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod error;
pub mod keygen;
pub mod model;
pub mod parser;
pub mod repository;
pub mod schema;
pub mod service;
pub mod validate;
pub mod writer;

pub use error::{Error, Result};
pub use model::{Reference, Value};
pub use repository::{FileRepository, Repository, SqliteRepository};
pub use schema::ReferenceType;
pub use service::{FilterField, ReferenceService};

/// Re-export of common types
pub mod prelude {
    pub use crate::{
        Error, FileRepository, FilterField, Reference, ReferenceService, ReferenceType,
        Repository, Result, SqliteRepository, Value,
    };
}
