//! Content checks for question bank files, run ahead of publishing.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::data::{RejectedQuestion, load_bank};
use crate::error::{ContentError, LoadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    /// A single question record is unusable.
    Record(RejectedQuestion),
    /// The bank as a whole is unusable.
    Bank(ContentError),
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::Record(rejected) => write!(f, "{}", rejected.error),
            Defect::Bank(error) => write!(f, "{}", error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BankReport {
    pub path: PathBuf,
    pub question_count: usize,
    pub has_exam: bool,
    pub defects: Vec<Defect>,
}

impl BankReport {
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }
}

/// Load `path` and collect every content defect in it.
pub fn validate_bank<P: AsRef<Path>>(path: P) -> Result<BankReport, LoadError> {
    let path = path.as_ref();
    let bank = load_bank(path)?;

    let mut defects: Vec<Defect> = bank.rejected.iter().cloned().map(Defect::Record).collect();

    if bank.questions.is_empty() {
        defects.push(Defect::Bank(ContentError::EmptyQuiz));
    }
    if let Some(error) = &bank.exam_error {
        defects.push(Defect::Bank(error.clone()));
    }
    if let Some(exam) = &bank.exam {
        defects.extend(exam.check(&bank.questions).into_iter().map(Defect::Bank));
    }

    debug!(path = %path.display(), defects = defects.len(), "bank validated");

    Ok(BankReport {
        path: path.to_path_buf(),
        question_count: bank.questions.len(),
        has_exam: bank.exam.is_some(),
        defects,
    })
}
