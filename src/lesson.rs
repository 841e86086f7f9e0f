use crate::record::VocabularyRecord;
use std::cmp::Ordering;

/// Read-only view over parsed records, grouped by lesson code.
#[derive(Debug, Clone, Default)]
pub struct LessonIndex {
    codes: Vec<String>,
    records: Vec<VocabularyRecord>,
}

impl LessonIndex {
    pub fn build(records: Vec<VocabularyRecord>) -> Self {
        let mut codes: Vec<String> = Vec::new();
        for record in &records {
            let code = record.lesson_code.trim();
            if code.is_empty() {
                continue;
            }
            if !codes.iter().any(|known| known == code) {
                codes.push(code.to_string());
            }
        }
        codes.sort_by(|a, b| compare_codes(a, b));

        Self { codes, records }
    }

    /// Distinct lesson codes in segmented numeric order.
    pub fn lesson_codes(&self) -> &[String] {
        &self.codes
    }

    /// Records for one lesson, in original parse order. The code is
    /// trimmed, so caller-supplied input may carry stray whitespace.
    pub fn for_lesson(&self, code: &str) -> Vec<VocabularyRecord> {
        let code = code.trim();
        self.records
            .iter()
            .filter(|record| record.lesson_code.trim() == code)
            .cloned()
            .collect()
    }

    /// Whether the index knows this lesson code (whitespace ignored).
    pub fn contains(&self, code: &str) -> bool {
        let code = code.trim();
        self.codes.iter().any(|known| known == code)
    }

    pub fn records(&self) -> &[VocabularyRecord] {
        &self.records
    }
}

/// Orders dash-segmented codes numerically, segment by segment.
/// Non-numeric segments sort after numeric ones; ties fall back to the
/// raw strings so the order stays total and stable.
fn compare_codes(a: &str, b: &str) -> Ordering {
    let mut left = a.split('-');
    let mut right = b.split('-');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.trim().parse::<u64>(), y.trim().parse::<u64>()) {
                    (Ok(m), Ok(n)) => m.cmp(&n),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
