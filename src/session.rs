//! In-memory study session state: flashcard traversal and quiz
//! progress/scoring. Sessions are built from an already-validated pool
//! and never observe an empty one.

use crate::error::ShengciError;
use crate::lesson::LessonIndex;
use crate::quiz::QuizQuestion;
use crate::record::VocabularyRecord;
use crate::store::{self, KeyValueStore};
use rand::prelude::*;

/// Which records a session runs over: a whole lesson, or an explicit
/// custom set (e.g. the learner's marked-difficult words). Passed in
/// explicitly instead of swapping a shared record list.
#[derive(Debug, Clone)]
pub enum ActiveRecordSource {
    Lesson(String),
    Custom(Vec<VocabularyRecord>),
}

impl ActiveRecordSource {
    pub fn resolve(&self, index: &LessonIndex) -> Vec<VocabularyRecord> {
        match self {
            ActiveRecordSource::Lesson(code) => index.for_lesson(code),
            ActiveRecordSource::Custom(records) => records.clone(),
        }
    }

    /// Drill set of the book's records whose headwords were marked
    /// difficult. `None` when no marked word appears in the book.
    pub fn difficult(
        index: &LessonIndex,
        store: &dyn KeyValueStore,
        book_id: &str,
    ) -> Option<Self> {
        let marked = store::difficult_words(store, book_id);
        let records: Vec<VocabularyRecord> = index
            .records()
            .iter()
            .filter(|record| marked.iter().any(|word| *word == record.headword))
            .cloned()
            .collect();
        if records.is_empty() {
            None
        } else {
            Some(ActiveRecordSource::Custom(records))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ActiveRecordSource::Lesson(code) => format!("lesson {}", code),
            ActiveRecordSource::Custom(records) => {
                format!("custom set ({} words)", records.len())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Front,
    Back,
}

/// Sequential flashcard traversal over a pool. `next`/`prev` clamp at
/// the ends and always land on the front face.
#[derive(Debug)]
pub struct FlashcardSession {
    order: Vec<usize>,
    cursor: usize,
    flip: Flip,
}

impl FlashcardSession {
    pub fn new(pool_size: usize) -> Result<Self, ShengciError> {
        if pool_size == 0 {
            return Err(ShengciError::InsufficientPool { size: 0 });
        }
        Ok(Self {
            order: (0..pool_size).collect(),
            cursor: 0,
            flip: Flip::Front,
        })
    }

    /// Pool index of the card under the cursor.
    pub fn current(&self) -> usize {
        self.order[self.cursor]
    }

    pub fn position(&self) -> (usize, usize) {
        (self.cursor, self.order.len())
    }

    pub fn flip(&mut self) {
        self.flip = match self.flip {
            Flip::Front => Flip::Back,
            Flip::Back => Flip::Front,
        };
    }

    pub fn face(&self) -> Flip {
        self.flip
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
        }
        self.flip = Flip::Front;
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.flip = Flip::Front;
    }

    pub fn shuffle(&mut self) {
        self.order.shuffle(&mut rand::rng());
        self.cursor = 0;
        self.flip = Flip::Front;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress { index: usize, total: usize },
    Results { score: usize, total: usize },
}

/// Quiz progress over a generated question sequence. One answer per
/// question; a second select on the same question is a no-op.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    question_index: usize,
    score: usize,
    answered: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            question_index: 0,
            score: 0,
            answered: false,
        }
    }

    pub fn state(&self) -> QuizState {
        if self.question_index >= self.questions.len() {
            QuizState::Results {
                score: self.score,
                total: self.questions.len(),
            }
        } else {
            QuizState::InProgress {
                index: self.question_index,
                total: self.questions.len(),
            }
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.question_index)
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    /// Answers the current question with the option at `position`.
    /// Returns whether the pick was correct, or `None` if the question
    /// was already answered, the position is out of range, or the quiz
    /// is over.
    pub fn select(&mut self, position: usize) -> Option<bool> {
        if self.answered {
            return None;
        }
        let question = self.questions.get(self.question_index)?;
        if position >= question.options.len() {
            return None;
        }
        self.answered = true;
        let correct = question.options[position] == question.correct;
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Moves to the next question once the current one is answered.
    pub fn advance(&mut self) -> bool {
        if !self.answered || self.question_index >= self.questions.len() {
            return false;
        }
        self.question_index += 1;
        self.answered = false;
        true
    }

    /// Restarts with a freshly generated question sequence.
    pub fn retry(&mut self, questions: Vec<QuizQuestion>) {
        self.questions = questions;
        self.question_index = 0;
        self.score = 0;
        self.answered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::generate;
    use crate::record::{AnswerDirection, GlossLanguage, LanguageSet};

    fn pool(n: usize) -> Vec<VocabularyRecord> {
        (0..n)
            .map(|i| {
                let mut record = VocabularyRecord {
                    lesson_code: "1-1".to_string(),
                    headword: format!("字{}", i),
                    ..Default::default()
                };
                record
                    .glosses
                    .set(GlossLanguage::English, format!("char {}", i));
                record
            })
            .collect()
    }

    fn quiz(n: usize) -> (Vec<VocabularyRecord>, QuizSession) {
        let records = pool(n);
        let questions = generate(
            &records,
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::default(),
        )
        .unwrap();
        (records, QuizSession::new(questions))
    }

    #[test]
    fn empty_pool_is_rejected_before_the_state_machine() {
        assert!(FlashcardSession::new(0).is_err());
        assert!(FlashcardSession::new(1).is_ok());
    }

    #[test]
    fn flashcard_cursor_clamps_at_both_ends() {
        let mut session = FlashcardSession::new(3).unwrap();
        session.prev();
        assert_eq!(session.position().0, 0);
        session.next();
        session.next();
        session.next();
        assert_eq!(session.position().0, 2);
    }

    #[test]
    fn navigation_resets_the_flip() {
        let mut session = FlashcardSession::new(2).unwrap();
        session.flip();
        assert_eq!(session.face(), Flip::Back);
        session.next();
        assert_eq!(session.face(), Flip::Front);
        session.flip();
        session.prev();
        assert_eq!(session.face(), Flip::Front);
    }

    #[test]
    fn shuffle_resets_cursor_and_keeps_every_card() {
        let mut session = FlashcardSession::new(5).unwrap();
        session.next();
        session.next();
        session.shuffle();
        assert_eq!(session.position().0, 0);
        let mut order = session.order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn second_select_is_a_no_op() {
        let (_, mut session) = quiz(4);
        let correct_position = session.current().unwrap().correct_position();
        assert_eq!(session.select(correct_position), Some(true));
        // Clicking again, on any option, changes nothing.
        assert_eq!(session.select(correct_position), None);
        assert_eq!(session.select(0), None);
        match session.state() {
            QuizState::InProgress { index, .. } => assert_eq!(index, 0),
            state => panic!("unexpected state {:?}", state),
        }
    }

    #[test]
    fn wrong_answer_does_not_score() {
        let (_, mut session) = quiz(4);
        let question = session.current().unwrap();
        let wrong = (0..question.options.len())
            .find(|&i| question.options[i] != question.correct)
            .unwrap();
        assert_eq!(session.select(wrong), Some(false));
        while session.advance() {
            session.select(0);
        }
        if let QuizState::Results { score, total } = session.state() {
            assert_eq!(total, 4);
            assert!(score < total);
        } else {
            panic!("quiz should be finished");
        }
    }

    #[test]
    fn advance_requires_an_answer() {
        let (_, mut session) = quiz(3);
        assert!(!session.advance());
        session.select(0);
        assert!(session.advance());
    }

    #[test]
    fn perfect_run_reaches_results_with_full_score() {
        let (_, mut session) = quiz(5);
        loop {
            match session.state() {
                QuizState::InProgress { .. } => {
                    let position = session.current().unwrap().correct_position();
                    assert_eq!(session.select(position), Some(true));
                    session.advance();
                }
                QuizState::Results { score, total } => {
                    assert_eq!(score, 5);
                    assert_eq!(total, 5);
                    break;
                }
            }
        }
    }

    #[test]
    fn retry_rebuilds_and_zeroes_counters() {
        let (records, mut session) = quiz(3);
        session.select(0);
        session.advance();
        let fresh = generate(
            &records,
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::default(),
        )
        .unwrap();
        session.retry(fresh);
        assert_eq!(
            session.state(),
            QuizState::InProgress { index: 0, total: 3 }
        );
        assert!(!session.answered());
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let (_, mut session) = quiz(2);
        let options = session.current().unwrap().options.len();
        assert_eq!(session.select(options), None);
        assert!(!session.answered());
    }

    #[test]
    fn marked_words_become_a_drillable_custom_set() {
        use crate::store::MemoryStore;

        let records = pool(4);
        let index = LessonIndex::build(records.clone());
        let mut store = MemoryStore::default();

        // Nothing marked yet, so there is nothing to drill.
        assert!(ActiveRecordSource::difficult(&index, &store, "book1").is_none());

        store::mark_difficult(&mut store, "book1", &records[1].headword);
        store::mark_difficult(&mut store, "book1", &records[3].headword);

        let source = ActiveRecordSource::difficult(&index, &store, "book1").unwrap();
        let drill = source.resolve(&index);
        let headwords: Vec<_> = drill.iter().map(|r| r.headword.as_str()).collect();
        assert_eq!(headwords, vec!["字1", "字3"]);

        // The drill set can seed a session like any other pool.
        let questions = generate(
            &drill,
            AnswerDirection::HeadwordToMeaning,
            LanguageSet::default(),
        )
        .unwrap();
        assert_eq!(questions.len(), 2);
        assert!(FlashcardSession::new(drill.len()).is_ok());
    }

    #[test]
    fn custom_source_resolves_to_its_own_records() {
        let records = pool(3);
        let index = LessonIndex::build(records.clone());
        let custom = ActiveRecordSource::Custom(records[..2].to_vec());
        assert_eq!(custom.resolve(&index).len(), 2);
        let lesson = ActiveRecordSource::Lesson("1-1".to_string());
        assert_eq!(lesson.resolve(&index).len(), 3);
    }
}
