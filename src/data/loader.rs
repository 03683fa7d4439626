use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::data::MockExamConfig;
use crate::error::{ContentError, LoadError};
use crate::models::{Question, QuestionId, QuestionRecord, Quiz};

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// A bank file is either a bare array of question records or a document
/// carrying a title and an optional mock exam configuration.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    Records(Vec<Value>),
    Document(BankDocument),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankDocument {
    title: Option<String>,
    /// Read loosely so a broken exam section does not hide the questions.
    exam: Option<Value>,
    #[serde(alias = "questionBank")]
    questions: Vec<Value>,
}

/// A record left out of the bank because it failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedQuestion {
    /// The record's id, or its 1-based position when it has no usable id.
    pub record: String,
    pub error: ContentError,
}

/// Questions read from a bank file, with any records that were rejected.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pub title: Option<String>,
    pub exam: Option<MockExamConfig>,
    /// Why the exam section could not be read, when there is one.
    pub exam_error: Option<ContentError>,
    pub questions: Vec<Question>,
    pub rejected: Vec<RejectedQuestion>,
}

impl QuestionBank {
    /// Build a quiz from the accepted questions. The bank's own title wins
    /// over `fallback_title`.
    pub fn to_quiz(&self, fallback_title: &str) -> Result<Quiz, ContentError> {
        let title = self.title.as_deref().unwrap_or(fallback_title);
        Quiz::new(title, self.questions.clone())
    }

    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.exam_error.is_none()
    }
}

/// Parse bank JSON, keeping every valid record and rejecting the rest.
///
/// Only a document that is not JSON, or not one of the two bank shapes,
/// fails outright. An unreadable exam section is kept as `exam_error`.
pub fn parse_bank(json: &str) -> Result<QuestionBank, serde_json::Error> {
    let (title, exam, records) = match serde_json::from_str::<BankFile>(json)? {
        BankFile::Records(records) => (None, None, records),
        BankFile::Document(doc) => (doc.title, doc.exam, doc.questions),
    };

    let (exam, exam_error) = match exam.map(serde_json::from_value::<MockExamConfig>) {
        None => (None, None),
        Some(Ok(config)) => (Some(config), None),
        Some(Err(err)) => (None, Some(ContentError::InvalidExam(err.to_string()))),
    };

    let mut bank = QuestionBank {
        title,
        exam,
        exam_error,
        ..QuestionBank::default()
    };
    let mut seen = HashSet::new();

    for (position, value) in records.into_iter().enumerate() {
        let label = record_label(&value, position);
        let parsed = serde_json::from_value::<QuestionRecord>(value)
            .map_err(|err| ContentError::Malformed {
                record: label.clone(),
                reason: err.to_string(),
            })
            .and_then(Question::try_from);

        match parsed {
            Ok(question) if !seen.insert(question.id().clone()) => {
                bank.rejected.push(RejectedQuestion {
                    record: label,
                    error: ContentError::DuplicateId(question.id().clone()),
                });
            }
            Ok(question) => bank.questions.push(question),
            Err(error) => bank.rejected.push(RejectedQuestion {
                record: label,
                error,
            }),
        }
    }

    Ok(bank)
}

fn record_label(value: &Value, position: usize) -> String {
    match value.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => format!("#{}", position + 1),
    }
}

/// Load a bank leniently: bad records are logged and set aside.
pub fn load_bank<P: AsRef<Path>>(path: P) -> Result<QuestionBank, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let bank = parse_bank(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(error) = &bank.exam_error {
        warn!(path = %path.display(), error = %error, "exam section ignored");
    }
    for rejected in &bank.rejected {
        warn!(path = %path.display(), record = %rejected.record, error = %rejected.error, "question rejected");
    }
    info!(
        path = %path.display(),
        accepted = bank.questions.len(),
        rejected = bank.rejected.len(),
        "question bank loaded"
    );

    Ok(bank)
}

/// Load questions strictly: the first defect fails the whole file.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();
    let bank = load_bank(path)?;

    if let Some(rejected) = bank.rejected.into_iter().next() {
        return Err(LoadError::Content {
            path: path.to_path_buf(),
            source: rejected.error,
        });
    }
    if bank.questions.is_empty() {
        return Err(LoadError::Content {
            path: path.to_path_buf(),
            source: ContentError::EmptyQuiz,
        });
    }

    Ok(bank.questions)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MIXED_BANK: &str = r#"[
        {"id": 1, "question": "Q1", "options": ["A", "B", "C", "D"], "correctAnswer": 1, "explanation": "E1"},
        {"id": "slug", "prompt": "Q2", "options": ["A", "B"], "correctIndex": 0, "explanation": "E2"},
        {"id": 3, "question": "Q3", "options": ["A", "B"], "correctAnswer": 4, "explanation": "E3"},
        {"id": 4, "question": "Q4", "correctAnswer": 0, "explanation": "no options"},
        {"id": 1, "question": "Q1 again", "options": ["A", "B"], "correctAnswer": 0, "explanation": ""},
        {"question": "No id", "options": ["A", "B"], "correctAnswer": 0, "explanation": ""}
    ]"#;

    #[test]
    fn test_parse_bank_keeps_valid_records() {
        let bank = parse_bank(MIXED_BANK).unwrap();

        let ids: Vec<String> = bank.questions.iter().map(|q| q.id().to_string()).collect();
        assert_eq!(ids, vec!["1", "slug"]);

        let rejected: Vec<&str> = bank.rejected.iter().map(|r| r.record.as_str()).collect();
        assert_eq!(rejected, vec!["3", "4", "1", "#6"]);
        assert!(matches!(
            bank.rejected[0].error,
            ContentError::CorrectIndexOutOfRange { index: 4, len: 2, .. }
        ));
        assert!(matches!(bank.rejected[1].error, ContentError::Malformed { .. }));
        assert_eq!(
            bank.rejected[2].error,
            ContentError::DuplicateId(QuestionId::Number(1))
        );
        assert!(!bank.is_clean());
    }

    #[test]
    fn test_parse_document_with_exam() {
        let json = r#"{
            "title": "COSHH Awareness Mock Examination",
            "exam": {
                "examId": "coshh-awareness",
                "examTitle": "COSHH Awareness Mock Examination",
                "totalQuestions": 1,
                "timeLimit": 1800,
                "passThreshold": 80,
                "categories": ["Understanding COSHH"]
            },
            "questions": [
                {"id": 1, "question": "What does COSHH stand for?", "options": ["A", "B"],
                 "correctAnswer": 0, "explanation": "", "category": "Understanding COSHH"}
            ]
        }"#;
        let bank = parse_bank(json).unwrap();
        assert_eq!(bank.title.as_deref(), Some("COSHH Awareness Mock Examination"));
        let exam = bank.exam.as_ref().unwrap();
        assert_eq!(exam.pass_threshold, 80);
        assert_eq!(exam.time_limit, Some(1800));
        assert!(bank.is_clean());

        let quiz = bank.to_quiz("fallback").unwrap();
        assert_eq!(quiz.title(), "COSHH Awareness Mock Examination");
    }

    #[test]
    fn test_bad_exam_section_keeps_questions() {
        let json = r#"{
            "exam": {"examId": "x", "examTitle": "X", "totalQuestions": 1, "passThreshold": 300},
            "questions": [
                {"id": 1, "question": "Q1", "options": ["A", "B"], "correctAnswer": 0, "explanation": ""},
                {"id": 2, "question": "Q2", "options": ["A"], "correctAnswer": 0, "explanation": ""}
            ]
        }"#;
        let bank = parse_bank(json).unwrap();

        assert!(bank.exam.is_none());
        assert!(matches!(bank.exam_error, Some(ContentError::InvalidExam(ref reason)) if reason.contains("300")));
        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.rejected.len(), 1);
        assert!(!bank.is_clean());
    }

    #[test]
    fn test_null_exam_is_absent() {
        let json = r#"{"exam": null, "questions": [
            {"id": 1, "question": "Q1", "options": ["A", "B"], "correctAnswer": 0, "explanation": ""}
        ]}"#;
        let bank = parse_bank(json).unwrap();
        assert!(bank.exam.is_none());
        assert!(bank.exam_error.is_none());
    }

    #[test]
    fn test_parse_bank_rejects_other_shapes() {
        assert!(parse_bank(r#"{"nope": true}"#).is_err());
        assert!(parse_bank("not json").is_err());
    }

    #[test]
    fn test_strict_load_fails_on_defect() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MIXED_BANK.as_bytes()).unwrap();

        let err = load_questions_from_json(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Content {
                source: ContentError::CorrectIndexOutOfRange { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_strict_load_rejects_empty_bank() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();

        let err = load_questions_from_json(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Content {
                source: ContentError::EmptyQuiz,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_bank("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
