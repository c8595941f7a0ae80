//! Citation-key derivation

use crate::error::Result;
use crate::repository::Repository;

/// Derive a citation key from an author and a year.
///
/// The author is lowercased, cut at the first comma (so the
/// "Lastname, Firstname" convention keeps only the last name), stripped
/// of spaces and truncated to at most seven characters; the last two
/// digits of the year are appended. When other keys in the repository
/// contain the candidate as a substring, `_<count>` is appended to
/// disambiguate.
///
/// The substring count is a best-effort collision guard: it can
/// over-count unrelated keys and under-count after deletions. Existing
/// `.bib` files depend on the exact keys it produces, so the behavior is
/// frozen; the repository still enforces exact uniqueness at save time.
pub fn construct_key(author: &str, year: i64, repository: &dyn Repository) -> Result<String> {
    let mut stem = author.to_lowercase();
    if let Some(comma) = stem.find(',') {
        stem.truncate(comma);
    }
    stem.retain(|c| c != ' ');
    let stem: String = stem.chars().take(7).collect();

    let year = year.to_string();
    let suffix = year.get(2..).unwrap_or("");
    let candidate = format!("{stem}{suffix}");

    let count = repository.count_keys_containing(&candidate)?;
    if count > 0 {
        Ok(format!("{candidate}_{count}"))
    } else {
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::Reference;
    use std::path::Path;

    /// Repository stub exposing a fixed key list to the substring counter
    struct KeyList(Vec<&'static str>);

    impl Repository for KeyList {
        fn save(&mut self, _reference: Reference) -> Result<()> {
            unreachable!()
        }

        fn load_all(&self) -> Result<Vec<Reference>> {
            Ok(Vec::new())
        }

        fn load_one(&self, key: &str) -> Result<Reference> {
            Err(Error::KeyNotFound(key.to_string()))
        }

        fn delete_by_key(&mut self, _key: &str) -> Result<()> {
            unreachable!()
        }

        fn count_keys_containing(&self, needle: &str) -> Result<usize> {
            Ok(self.0.iter().filter(|key| key.contains(needle)).count())
        }

        fn save_to_file(&self, _path: &Path) -> Result<()> {
            unreachable!()
        }
    }

    #[test]
    fn test_basic_key() {
        let repo = KeyList(vec![]);
        assert_eq!(construct_key("Powers", 2023, &repo).unwrap(), "powers23");
    }

    #[test]
    fn test_long_author_truncated() {
        let repo = KeyList(vec![]);
        assert_eq!(construct_key("Powersson", 1995, &repo).unwrap(), "powerss95");
    }

    #[test]
    fn test_comma_keeps_last_name() {
        let repo = KeyList(vec![]);
        assert_eq!(construct_key("Reed, Lou", 1972, &repo).unwrap(), "reed72");
    }

    #[test]
    fn test_spaces_removed() {
        let repo = KeyList(vec![]);
        assert_eq!(construct_key("Van Halen", 1984, &repo).unwrap(), "vanhale84");
    }

    #[test]
    fn test_collision_appends_count() {
        let repo = KeyList(vec!["alphabe23"]);
        assert_eq!(
            construct_key("Alphabet Inc.", 2023, &repo).unwrap(),
            "alphabe23_1"
        );
    }

    #[test]
    fn test_two_collisions() {
        let repo = KeyList(vec!["smith20", "smith20_1"]);
        assert_eq!(construct_key("Smith", 2020, &repo).unwrap(), "smith20_2");
    }
}
