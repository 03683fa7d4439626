use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// Identifier of a question, unique within its quiz.
///
/// Course pages use both numeric ids (`1`, `2`, ...) and slugs
/// (`"coshh-stands-for"`), so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl QuestionId {
    /// Parse an id typed on the command line. All-digit input is numeric.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<u64>() {
            Ok(n) => QuestionId::Number(n),
            Err(_) => QuestionId::Text(input.to_string()),
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// A question as authored in a bank file.
///
/// Content uses several spellings for the same fields (`question` or
/// `prompt`, `correctAnswer` or `correctIndex`); the aliases fold them into
/// one shape before it is checked and turned into a [`Question`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    #[serde(alias = "question", alias = "text")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(
        alias = "correctAnswer",
        alias = "correct_answer",
        alias = "correct_index"
    )]
    pub correct_index: usize,
    pub explanation: String,
    pub section: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub category: Option<String>,
}

/// A validated question.
///
/// Construction guarantees a non-empty prompt, at least [`MIN_OPTIONS`]
/// options and a `correct_index` that points into them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    section: Option<String>,
    difficulty: Option<Difficulty>,
    topic: Option<String>,
    category: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let id = id.into();
        let prompt = prompt.into();

        if prompt.trim().is_empty() {
            return Err(ContentError::EmptyPrompt { id });
        }
        if options.len() < MIN_OPTIONS {
            return Err(ContentError::TooFewOptions {
                id,
                count: options.len(),
            });
        }
        if correct_index >= options.len() {
            return Err(ContentError::CorrectIndexOutOfRange {
                id,
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_index,
            explanation: explanation.into(),
            section: None,
            difficulty: None,
            topic: None,
            category: None,
        })
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether `index` names one of this question's options.
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    pub fn is_correct_option(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = ContentError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let mut question = Question::new(
            record.id,
            record.prompt,
            record.options,
            record.correct_index,
            record.explanation,
        )?;
        question.section = record.section;
        question.difficulty = record.difficulty;
        question.topic = record.topic;
        question.category = record.category;
        Ok(question)
    }
}
