//! Decoding of the raw vocabulary tables: delimiter detection, quoted
//! field tokenizing, and mapping of the fixed CJK header schema onto
//! typed records. This is deliberately not a general CSV parser; it
//! targets the one known schema and the handful of delimiter/encoding
//! quirks the source files actually exhibit.

use crate::error::ShengciError;
use crate::record::{GlossLanguage, VocabularyRecord};

const BOM: char = '\u{feff}';

/// Canonical destinations for recognized header columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    Volume,
    LessonCode,
    Sequence,
    Headword,
    Romanization,
    PartOfSpeech,
    Gloss(GlossLanguage),
}

/// The closed header dictionary. Unknown labels contribute no field.
const HEADER_COLUMNS: [(&str, FieldKey); 12] = [
    ("冊", FieldKey::Volume),
    ("課次", FieldKey::LessonCode),
    ("序號", FieldKey::Sequence),
    ("生詞", FieldKey::Headword),
    ("漢拼", FieldKey::Romanization),
    ("詞類", FieldKey::PartOfSpeech),
    ("英譯", FieldKey::Gloss(GlossLanguage::English)),
    ("越譯", FieldKey::Gloss(GlossLanguage::Vietnamese)),
    ("泰譯", FieldKey::Gloss(GlossLanguage::Thai)),
    ("緬譯", FieldKey::Gloss(GlossLanguage::Burmese)),
    ("日譯", FieldKey::Gloss(GlossLanguage::Japanese)),
    ("韓譯", FieldKey::Gloss(GlossLanguage::Korean)),
];

fn lookup_header(label: &str) -> Option<FieldKey> {
    HEADER_COLUMNS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, key)| *key)
}

/// Result of a full parse: the surviving records plus how many source
/// rows were dropped (ragged or failing the validity invariant).
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<VocabularyRecord>,
    pub skipped_rows: usize,
}

/// Splits raw text into token rows. Strips a single leading BOM,
/// normalizes line endings, and detects the delimiter (tab beats
/// comma) once from the header line.
pub fn decode(raw: &str) -> Result<Vec<Vec<String>>, ShengciError> {
    let raw = raw.strip_prefix(BOM).unwrap_or(raw);

    // Trim only decides blankness; tokenizing keeps the raw line so a
    // trailing empty field survives.
    let lines: Vec<&str> = raw
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ShengciError::EmptyInput);
    }

    let delimiter = if lines[0].contains('\t') { '\t' } else { ',' };

    Ok(lines
        .iter()
        .map(|line| tokenize(line, delimiter))
        .collect())
}

#[derive(Debug, Clone, Copy)]
enum TokenState {
    Unquoted,
    Quoted,
    QuotedQuote,
}

/// Splits one line into fields. A field may be wrapped in double
/// quotes, in which case the delimiter is literal content and `""`
/// unescapes to `"`. Malformed quoting degrades to best-effort
/// splitting rather than failing the row.
fn tokenize(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = TokenState::Unquoted;

    for ch in line.chars() {
        state = match state {
            TokenState::Unquoted => {
                if ch == delimiter {
                    fields.push(std::mem::take(&mut field));
                    TokenState::Unquoted
                } else if ch == '"' && field.is_empty() {
                    TokenState::Quoted
                } else {
                    field.push(ch);
                    TokenState::Unquoted
                }
            }
            TokenState::Quoted => {
                if ch == '"' {
                    TokenState::QuotedQuote
                } else {
                    field.push(ch);
                    TokenState::Quoted
                }
            }
            TokenState::QuotedQuote => {
                if ch == '"' {
                    field.push('"');
                    TokenState::Quoted
                } else if ch == delimiter {
                    fields.push(std::mem::take(&mut field));
                    TokenState::Unquoted
                } else {
                    // Stray text after a closing quote; keep it.
                    field.push(ch);
                    TokenState::Unquoted
                }
            }
        };
    }
    fields.push(field);

    fields
}

/// Trims a raw token and, if it is wrapped in a matching quote pair,
/// strips the pair and unescapes doubled quotes.
fn clean_field(token: &str) -> String {
    let token = token.trim();
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].replace("\"\"", "\"")
    } else {
        token.to_string()
    }
}

/// Builds records from a header row plus data rows. Ragged rows and
/// rows failing the validity invariant are dropped and counted, never
/// surfaced as errors; the only failure is a header with zero
/// recognized columns.
pub fn map(header: &[String], rows: &[Vec<String>]) -> Result<ParseOutcome, ShengciError> {
    let columns: Vec<Option<FieldKey>> = header
        .iter()
        .map(|label| lookup_header(clean_field(label).as_str()))
        .collect();

    if !columns.iter().any(Option::is_some) {
        return Err(ShengciError::UnrecognizedSchema);
    }

    let mut outcome = ParseOutcome::default();

    for (row_index, row) in rows.iter().enumerate() {
        if row.len() < header.len() {
            outcome.skipped_rows += 1;
            continue;
        }

        let mut record = VocabularyRecord {
            sequence: row_index as u32,
            ..Default::default()
        };

        for (key, token) in columns.iter().zip(row.iter()) {
            let Some(key) = key else { continue };
            let value = clean_field(token);
            match key {
                FieldKey::Volume => record.volume = value,
                FieldKey::LessonCode => record.lesson_code = value,
                FieldKey::Sequence => {
                    if let Ok(sequence) = value.parse::<u32>() {
                        record.sequence = sequence;
                    }
                }
                FieldKey::Headword => record.headword = value,
                FieldKey::Romanization => record.romanization = value,
                FieldKey::PartOfSpeech => record.part_of_speech = value,
                FieldKey::Gloss(lang) => record.glosses.set(*lang, value),
            }
        }

        if record.is_valid() {
            outcome.records.push(record);
        } else {
            outcome.skipped_rows += 1;
        }
    }

    Ok(outcome)
}

/// Decodes and maps a raw vocabulary table in one step.
pub fn parse(raw: &str) -> Result<ParseOutcome, ShengciError> {
    let rows = decode(raw)?;
    map(&rows[0], &rows[1..])
}
