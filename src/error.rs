//! Error types.
//!
//! Content defects are authoring mistakes in a question bank and are caught
//! when a `Quiz` is built or when `validate` runs. Selection errors come from
//! the engine and never change answer state.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::QuestionId;

/// A defect in authored question content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("question {id}: prompt is empty")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id}: needs at least 2 options, found {count}")]
    TooFewOptions { id: QuestionId, count: usize },

    #[error("question {id}: correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    /// A record that could not be read as a question at all.
    #[error("record {record}: {reason}")]
    Malformed { record: String, reason: String },

    #[error("exam config: {0}")]
    InvalidExam(String),
}

/// Failure to load a question bank file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: ContentError,
    },
}

/// Rejected call to `select_answer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("no question at position {index}, the quiz has {len}")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("question {id}: option {index} is out of range for {len} options")]
    OptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    /// The question was already answered with a different option.
    #[error("question {id} is already answered with option {selected}")]
    Locked { id: QuestionId, selected: usize },
}

/// Top-level error for running a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("no question with id {0} in the bank")]
    QuestionNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
