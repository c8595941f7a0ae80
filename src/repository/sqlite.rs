//! Relational repository backend

use super::Repository;
use crate::error::{Error, Result};
use crate::model::{Reference, Value};
use crate::schema::ReferenceType;
use ahash::AHashMap;
use std::path::Path;
use tracing::debug;

/// Scalar columns loaded back from the fact table and its joined
/// dimensions, paired with their position in [`LOAD_SQL`]
const LOADED_COLUMNS: [(&str, usize); 16] = [
    ("title", 2),
    ("author", 3),
    ("institution", 5),
    ("booktitle", 6),
    ("editor", 7),
    ("volume", 8),
    ("type", 9),
    ("number", 10),
    ("series", 11),
    ("pages", 12),
    ("address", 13),
    ("month", 14),
    ("note", 15),
    ("annote", 16),
    ("school", 17),
    ("journal", 18),
];

const LOAD_SQL: &str = "
    SELECT Referencetypes.referencetype, Bibrefs.key, Bibrefs.title, Authors.author,
        Bibrefs.year, Institutions.institution, Booktitles.booktitle, Editors.editor,
        Bibrefs.volume, Types.type, Bibrefs.number, Series.series, Bibrefs.pages,
        Bibrefs.address, Bibrefs.month, Bibrefs.note, Bibrefs.annote, Bibrefs.school,
        Bibrefs.journal
    FROM Bibrefs
    LEFT JOIN Authors ON Bibrefs.author_id = Authors.id
    LEFT JOIN Institutions ON Bibrefs.institution_id = Institutions.id
    LEFT JOIN Booktitles ON Bibrefs.booktitle_id = Booktitles.id
    LEFT JOIN Editors ON Bibrefs.editor_id = Editors.id
    LEFT JOIN Types ON Bibrefs.type_id = Types.id
    LEFT JOIN Series ON Bibrefs.series_id = Series.id
    LEFT JOIN Referencetypes ON Bibrefs.referencetype_id = Referencetypes.id
    WHERE Bibrefs.key = ?1
";

/// Repository backed by an embedded SQLite database.
///
/// Repeated strings (author, institution, booktitle, editor, series,
/// free-text type label) are deduplicated into dimension tables and
/// resolved through nullable foreign keys from the `Bibrefs` fact table.
/// Dimension rows are never garbage collected: a value stays in its
/// lookup table even when the last reference using it is deleted.
#[derive(Debug)]
pub struct SqliteRepository {
    conn: rusqlite::Connection,
}

impl SqliteRepository {
    /// Open a database file, creating the schema if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = rusqlite::Connection::open(path.as_ref())?;
        Self::initialize_schema(&conn)?;
        debug!(path = %path.as_ref().display(), "opened sqlite repository");
        Ok(Self { conn })
    }

    /// Open an in-memory database (useful for tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Delete all rows from all tables, dimension tables included
    pub fn clear(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM Bibrefs;
             DELETE FROM Authors;
             DELETE FROM Institutions;
             DELETE FROM Booktitles;
             DELETE FROM Editors;
             DELETE FROM Series;
             DELETE FROM Types;
             DELETE FROM Referencetypes;",
        )?;
        Ok(())
    }

    fn initialize_schema(conn: &rusqlite::Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS Authors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Institutions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                institution TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Booktitles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booktitle TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Editors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                editor TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Series (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                series TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Types (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Referencetypes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                referencetype TEXT UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Bibrefs (
                key TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                author_id INT NOT NULL REFERENCES Authors,
                year INT NOT NULL,
                institution_id INT REFERENCES Institutions,
                booktitle_id INT REFERENCES Booktitles,
                editor_id INT REFERENCES Editors,
                referencetype_id INT REFERENCES Referencetypes,
                volume TEXT,
                type_id INT REFERENCES Types,
                number TEXT,
                series_id INT REFERENCES Series,
                pages TEXT,
                address TEXT,
                month TEXT,
                note TEXT,
                annote TEXT,
                school TEXT,
                journal TEXT
            );",
        )?;
        Ok(())
    }

    /// Rebuild a reference from one joined row.
    ///
    /// Dispatches on the stored type discriminant; columns outside the
    /// type's field subset are ignored even when populated.
    fn row_to_reference(row: &rusqlite::Row<'_>) -> Result<Reference> {
        let tag: Option<String> = row.get(0)?;
        let ty = tag
            .as_deref()
            .and_then(ReferenceType::from_tag)
            .ok_or_else(|| Error::InvalidReferenceType(tag.unwrap_or_default()))?;

        let key: String = row.get(1)?;
        let year: i64 = row.get(4)?;

        let mut fields = AHashMap::new();
        fields.insert("year".to_string(), Value::Number(year));
        for (name, index) in LOADED_COLUMNS {
            if !ty.fields().contains(&name) {
                continue;
            }
            if let Some(text) = row.get::<_, Option<String>>(index)? {
                fields.insert(name.to_string(), Value::Text(text));
            }
        }

        Ok(Reference::from_storage(ty, key, fields))
    }

    fn insert_dimension(
        tx: &rusqlite::Transaction<'_>,
        table: &str,
        column: &str,
        value: Option<&String>,
    ) -> Result<()> {
        if let Some(value) = value {
            tx.execute(
                &format!("INSERT OR IGNORE INTO {table} ({column}) VALUES (?1)"),
                [value],
            )?;
        }
        Ok(())
    }
}

impl Repository for SqliteRepository {
    fn save(&mut self, reference: Reference) -> Result<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM Bibrefs WHERE key = ?1)",
            [reference.key()],
            |row| row.get(0),
        )?;
        if exists {
            return Err(Error::KeyAlreadyExists(reference.key().to_string()));
        }

        let get = |name: &str| reference.get_text(name);
        let year = get("year").and_then(|t| t.parse::<i64>().ok()).unwrap_or_default();
        let tag = reference.reference_type().tag();

        let tx = self.conn.transaction()?;

        Self::insert_dimension(&tx, "Authors", "author", get("author").as_ref())?;
        Self::insert_dimension(&tx, "Institutions", "institution", get("institution").as_ref())?;
        Self::insert_dimension(&tx, "Booktitles", "booktitle", get("booktitle").as_ref())?;
        Self::insert_dimension(&tx, "Editors", "editor", get("editor").as_ref())?;
        Self::insert_dimension(&tx, "Series", "series", get("series").as_ref())?;
        Self::insert_dimension(&tx, "Types", "type", get("type").as_ref())?;
        tx.execute(
            "INSERT OR IGNORE INTO Referencetypes (referencetype) VALUES (?1)",
            [tag],
        )?;

        tx.execute(
            "INSERT INTO Bibrefs (
                key, title, author_id, year, institution_id, booktitle_id, editor_id,
                referencetype_id, volume, type_id, number, series_id, pages, address,
                month, note, annote, school, journal
            ) VALUES (
                ?1, ?2, (SELECT id FROM Authors WHERE author = ?3), ?4,
                (SELECT id FROM Institutions WHERE institution = ?5),
                (SELECT id FROM Booktitles WHERE booktitle = ?6),
                (SELECT id FROM Editors WHERE editor = ?7),
                (SELECT id FROM Referencetypes WHERE referencetype = ?8),
                ?9,
                (SELECT id FROM Types WHERE type = ?10),
                ?11,
                (SELECT id FROM Series WHERE series = ?12),
                ?13, ?14, ?15, ?16, ?17, ?18, ?19
            )",
            rusqlite::params![
                reference.key(),
                get("title"),
                get("author"),
                year,
                get("institution"),
                get("booktitle"),
                get("editor"),
                tag,
                get("volume"),
                get("type"),
                get("number"),
                get("series"),
                get("pages"),
                get("address"),
                get("month"),
                get("note"),
                get("annote"),
                get("school"),
                get("journal"),
            ],
        )?;
        tx.commit()?;

        debug!(key = reference.key(), "saved reference");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Reference>> {
        let mut stmt = self.conn.prepare("SELECT key FROM Bibrefs")?;
        let keys: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        keys.iter().map(|key| self.load_one(key)).collect()
    }

    fn load_one(&self, key: &str) -> Result<Reference> {
        let mut stmt = self.conn.prepare(LOAD_SQL)?;
        let mut rows = stmt.query([key])?;

        match rows.next()? {
            Some(row) => Self::row_to_reference(row),
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    fn delete_by_key(&mut self, key: &str) -> Result<()> {
        // dimension rows are retained even if now unreferenced
        self.conn
            .execute("DELETE FROM Bibrefs WHERE key = ?1", [key])?;
        debug!(key, "deleted reference");
        Ok(())
    }

    fn count_keys_containing(&self, needle: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM Bibrefs WHERE instr(key, ?1) > 0",
            [needle],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
