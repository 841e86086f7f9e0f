//! Multiple-choice question generation. Questions reference records by
//! index into the lesson pool they were generated from, so two records
//! that happen to display the same text never get conflated.

use crate::error::ShengciError;
use crate::record::{AnswerDirection, CardSide, LanguageSet, VocabularyRecord};
use rand::prelude::*;

pub const MAX_DISTRACTORS: usize = 3;

const GLOSS_SEPARATOR: &str = " / ";

/// Renders one face of a record. The meaning face concatenates the
/// enabled languages' non-empty glosses in declared language order.
/// Both question display and flashcard faces go through here, so what
/// is shown is always what was generated.
pub fn render_side(record: &VocabularyRecord, side: CardSide, languages: &LanguageSet) -> String {
    match side {
        CardSide::Headword => record.headword.clone(),
        CardSide::Romanization => record.romanization.clone(),
        CardSide::Meaning => languages
            .iter()
            .map(|lang| record.glosses.get(lang))
            .filter(|gloss| !gloss.is_empty())
            .collect::<Vec<_>>()
            .join(GLOSS_SEPARATOR),
    }
}

/// One generated question. Indices point into the pool the question
/// was generated from.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub correct: usize,
    pub distractors: Vec<usize>,
    pub options: Vec<usize>,
    pub mode: AnswerDirection,
    pub languages: LanguageSet,
}

impl QuizQuestion {
    pub fn prompt(&self, pool: &[VocabularyRecord]) -> String {
        render_side(&pool[self.correct], self.mode.prompt_side(), &self.languages)
    }

    pub fn option_texts(&self, pool: &[VocabularyRecord]) -> Vec<String> {
        self.options
            .iter()
            .map(|&index| render_side(&pool[index], self.mode.answer_side(), &self.languages))
            .collect()
    }

    /// Position of the correct record within the shuffled options.
    pub fn correct_position(&self) -> usize {
        self.options
            .iter()
            .position(|&index| index == self.correct)
            .unwrap_or(0)
    }
}

/// Produces one question per pool record, in pool order. Callers that
/// want randomized question order pre-shuffle the pool; this only
/// shuffles each question's options.
pub fn generate(
    pool: &[VocabularyRecord],
    mode: AnswerDirection,
    languages: LanguageSet,
) -> Result<Vec<QuizQuestion>, ShengciError> {
    if pool.len() < 2 {
        return Err(ShengciError::InsufficientPool { size: pool.len() });
    }

    let mut rng = rand::rng();
    let questions = (0..pool.len())
        .map(|correct| {
            let mut candidates: Vec<usize> = (0..pool.len()).filter(|&i| i != correct).collect();
            candidates.shuffle(&mut rng);
            candidates.truncate(MAX_DISTRACTORS);

            let mut options = candidates.clone();
            options.push(correct);
            options.shuffle(&mut rng);

            QuizQuestion {
                correct,
                distractors: candidates,
                options,
                mode,
                languages,
            }
        })
        .collect();

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GlossLanguage;

    fn pool(n: usize) -> Vec<VocabularyRecord> {
        (0..n)
            .map(|i| {
                let mut record = VocabularyRecord {
                    lesson_code: "1-1".to_string(),
                    headword: format!("詞{}", i),
                    romanization: format!("ci{}", i),
                    ..Default::default()
                };
                record
                    .glosses
                    .set(GlossLanguage::English, format!("word {}", i));
                record
                    .glosses
                    .set(GlossLanguage::Vietnamese, format!("từ {}", i));
                record
            })
            .collect()
    }

    #[test]
    fn pool_of_one_is_rejected() {
        let result = generate(
            &pool(1),
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::default(),
        );
        assert!(matches!(
            result,
            Err(ShengciError::InsufficientPool { size: 1 })
        ));
    }

    #[test]
    fn large_pool_gives_four_options_with_correct_once() {
        let records = pool(8);
        let questions = generate(
            &records,
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::default(),
        )
        .unwrap();
        assert_eq!(questions.len(), 8);
        for (i, question) in questions.iter().enumerate() {
            assert_eq!(question.correct, i);
            assert_eq!(question.options.len(), 1 + MAX_DISTRACTORS);
            assert_eq!(
                question
                    .options
                    .iter()
                    .filter(|&&index| index == question.correct)
                    .count(),
                1
            );
            // No duplicate distractors.
            let mut seen = question.options.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), question.options.len());
        }
    }

    #[test]
    fn small_pool_exhausts_distractors_without_padding() {
        for size in 2..4 {
            let records = pool(size);
            let questions = generate(
                &records,
                AnswerDirection::MeaningToHeadword,
                LanguageSet::default(),
            )
            .unwrap();
            for question in &questions {
                assert_eq!(question.options.len(), size);
            }
        }
    }

    #[test]
    fn correct_option_text_matches_english_gloss() {
        let records = pool(5);
        let questions = generate(
            &records,
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::single(GlossLanguage::English),
        )
        .unwrap();
        for question in &questions {
            let texts = question.option_texts(&records);
            assert_eq!(
                texts[question.correct_position()],
                records[question.correct].glosses.get(GlossLanguage::English)
            );
        }
    }

    #[test]
    fn rendered_meaning_follows_declared_language_order() {
        let records = pool(2);
        let languages: LanguageSet = [GlossLanguage::Vietnamese, GlossLanguage::English]
            .into_iter()
            .collect();
        let text = render_side(&records[0], CardSide::Meaning, &languages);
        assert_eq!(text, "word 0 / từ 0");
    }

    #[test]
    fn empty_glosses_are_skipped_in_meaning_text() {
        let mut record = pool(1).remove(0);
        record.glosses.set(GlossLanguage::English, String::new());
        let languages: LanguageSet = [GlossLanguage::English, GlossLanguage::Vietnamese]
            .into_iter()
            .collect();
        assert_eq!(render_side(&record, CardSide::Meaning, &languages), "từ 0");
    }

    #[test]
    fn render_is_stable_for_grading() {
        // The same record and settings always render identically, so a
        // generated option recognizes itself at grading time.
        let records = pool(3);
        let languages = LanguageSet::default();
        let a = render_side(&records[1], CardSide::Meaning, &languages);
        let b = render_side(&records[1], CardSide::Meaning, &languages);
        assert_eq!(a, b);
    }
}
