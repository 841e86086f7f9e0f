use crate::error::ShengciError;
use include_dir::{include_dir, Dir};

static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Supplies raw vocabulary table text for a book id. Retrieval failure
/// surfaces as `SourceUnavailable`; parse errors are a separate layer.
pub trait TextSource {
    fn fetch_text(&self, book_id: &str) -> Result<String, ShengciError>;
}

/// Vocabulary tables compiled into the binary from `assets/`.
#[derive(Debug, Clone, Default)]
pub struct BundledSource;

impl BundledSource {
    pub fn book_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = ASSETS_DIR
            .files()
            .filter_map(|file| file.path().file_stem())
            .filter_map(|stem| stem.to_str())
            .map(String::from)
            .collect();
        ids.sort();
        ids
    }
}

impl TextSource for BundledSource {
    fn fetch_text(&self, book_id: &str) -> Result<String, ShengciError> {
        let file = ["tsv", "csv"]
            .iter()
            .find_map(|ext| ASSETS_DIR.get_file(format!("{}.{}", book_id, ext)))
            .ok_or_else(|| ShengciError::SourceUnavailable(format!("no such book '{}'", book_id)))?;

        file.contents_utf8()
            .map(String::from)
            .ok_or_else(|| ShengciError::SourceUnavailable(format!("book '{}' is not UTF-8", book_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn bundled_book_parses() {
        let raw = BundledSource.fetch_text("book1").unwrap();
        let outcome = parser::parse(&raw).unwrap();
        assert!(!outcome.records.is_empty());
        assert_eq!(outcome.skipped_rows, 0);
    }

    #[test]
    fn unknown_book_is_source_unavailable() {
        assert!(matches!(
            BundledSource.fetch_text("book99"),
            Err(ShengciError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn book_ids_lists_bundled_tables() {
        assert!(BundledSource.book_ids().contains(&"book1".to_string()));
    }
}
