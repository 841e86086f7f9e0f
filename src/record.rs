use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gloss languages supported by the vocabulary tables, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlossLanguage {
    English,
    Vietnamese,
    Thai,
    Burmese,
    Japanese,
    Korean,
}

impl GlossLanguage {
    pub const ALL: [GlossLanguage; 6] = [
        GlossLanguage::English,
        GlossLanguage::Vietnamese,
        GlossLanguage::Thai,
        GlossLanguage::Burmese,
        GlossLanguage::Japanese,
        GlossLanguage::Korean,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlossLanguage::English => "english",
            GlossLanguage::Vietnamese => "vietnamese",
            GlossLanguage::Thai => "thai",
            GlossLanguage::Burmese => "burmese",
            GlossLanguage::Japanese => "japanese",
            GlossLanguage::Korean => "korean",
        }
    }
}

impl FromStr for GlossLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlossLanguage::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown gloss language '{}'", s))
    }
}

/// Set of enabled gloss languages. Always iterated in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSet([bool; GlossLanguage::ALL.len()]);

impl LanguageSet {
    pub fn empty() -> Self {
        LanguageSet([false; GlossLanguage::ALL.len()])
    }

    pub fn single(lang: GlossLanguage) -> Self {
        let mut set = Self::empty();
        set.insert(lang);
        set
    }

    pub fn insert(&mut self, lang: GlossLanguage) {
        self.0[lang.index()] = true;
    }

    pub fn contains(&self, lang: GlossLanguage) -> bool {
        self.0[lang.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&enabled| enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = GlossLanguage> + '_ {
        GlossLanguage::ALL
            .into_iter()
            .filter(move |lang| self.contains(*lang))
    }
}

impl FromIterator<GlossLanguage> for LanguageSet {
    fn from_iter<I: IntoIterator<Item = GlossLanguage>>(iter: I) -> Self {
        let mut set = Self::empty();
        for lang in iter {
            set.insert(lang);
        }
        set
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::single(GlossLanguage::English)
    }
}

/// Per-record gloss table. Every language has an entry; a language with
/// no data holds an empty string, never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glosses([String; GlossLanguage::ALL.len()]);

impl Glosses {
    pub fn get(&self, lang: GlossLanguage) -> &str {
        &self.0[lang.index()]
    }

    pub fn set(&mut self, lang: GlossLanguage, text: String) {
        self.0[lang.index()] = text;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub lesson_code: String,
    pub sequence: u32,
    pub headword: String,
    pub romanization: String,
    pub part_of_speech: String,
    pub glosses: Glosses,
    pub volume: String,
}

impl VocabularyRecord {
    /// A record is usable iff it has a headword and a lesson code.
    pub fn is_valid(&self) -> bool {
        !self.headword.trim().is_empty() && !self.lesson_code.trim().is_empty()
    }
}

/// Which field is the prompt and which supplies the answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum AnswerDirection {
    /// Show the headword, answer with the glosses.
    HeadwordToMeaning,
    /// Show the glosses, answer with the headword.
    MeaningToHeadword,
    /// Show the headword, answer with the pinyin.
    HeadwordToRomanization,
    /// Show the pinyin, answer with the headword.
    RomanizationToHeadword,
}

/// One displayable face of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Headword,
    Romanization,
    Meaning,
}

impl AnswerDirection {
    pub fn prompt_side(self) -> CardSide {
        match self {
            AnswerDirection::HeadwordToMeaning => CardSide::Headword,
            AnswerDirection::MeaningToHeadword => CardSide::Meaning,
            AnswerDirection::HeadwordToRomanization => CardSide::Headword,
            AnswerDirection::RomanizationToHeadword => CardSide::Romanization,
        }
    }

    pub fn answer_side(self) -> CardSide {
        match self {
            AnswerDirection::HeadwordToMeaning => CardSide::Meaning,
            AnswerDirection::MeaningToHeadword => CardSide::Headword,
            AnswerDirection::HeadwordToRomanization => CardSide::Romanization,
            AnswerDirection::RomanizationToHeadword => CardSide::Headword,
        }
    }
}

impl fmt::Display for AnswerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnswerDirection::HeadwordToMeaning => "headword-to-meaning",
            AnswerDirection::MeaningToHeadword => "meaning-to-headword",
            AnswerDirection::HeadwordToRomanization => "headword-to-romanization",
            AnswerDirection::RomanizationToHeadword => "romanization-to-headword",
        };
        f.write_str(name)
    }
}
