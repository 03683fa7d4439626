//! Mock exams: configuration, balanced question draws, and the exam clock.

use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::models::{Difficulty, Question, Quiz};

/// Default pass mark, in percent.
pub const DEFAULT_PASS_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExamConfig {
    pub exam_id: String,
    pub exam_title: String,
    pub total_questions: usize,
    /// Seconds; no limit when absent.
    #[serde(default)]
    pub time_limit: Option<u64>,
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
    #[serde(default)]
    pub categories: Vec<String>,
    /// When set, the draw follows these weights instead of `categories`.
    #[serde(default)]
    pub difficulty_mix: Option<DifficultyMix>,
}

/// Relative weights for basic, intermediate and advanced questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DifficultyMix {
    pub basic: u32,
    pub intermediate: u32,
    pub advanced: u32,
}

impl DifficultyMix {
    pub fn total(&self) -> u32 {
        self.basic + self.intermediate + self.advanced
    }

    /// Split `count` into per-difficulty quotas, in [`Difficulty::ALL`]
    /// order. Basic and intermediate are rounded to nearest; advanced gets
    /// the rest.
    pub fn quotas(&self, count: usize) -> [usize; 3] {
        let total = self.total() as usize;
        if total == 0 {
            return [0, 0, count];
        }
        let share = |weight: u32| (2 * count * weight as usize + total) / (2 * total);

        let basic = share(self.basic).min(count);
        let intermediate = share(self.intermediate).min(count - basic);
        [basic, intermediate, count - basic - intermediate]
    }

    fn weight(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Basic => self.basic,
            Difficulty::Intermediate => self.intermediate,
            Difficulty::Advanced => self.advanced,
        }
    }
}

fn default_pass_threshold() -> u8 {
    DEFAULT_PASS_THRESHOLD
}

impl MockExamConfig {
    /// Every problem with this config measured against `bank`.
    pub fn check(&self, bank: &[Question]) -> Vec<ContentError> {
        let mut problems = Vec::new();

        if self.pass_threshold > 100 {
            problems.push(ContentError::InvalidExam(format!(
                "pass threshold {}% is above 100%",
                self.pass_threshold
            )));
        }
        if self.total_questions == 0 {
            problems.push(ContentError::InvalidExam(
                "totalQuestions must be at least 1".to_string(),
            ));
        }
        if self.total_questions > bank.len() {
            problems.push(ContentError::InvalidExam(format!(
                "totalQuestions is {} but the bank holds {}",
                self.total_questions,
                bank.len()
            )));
        }
        if self.time_limit == Some(0) {
            problems.push(ContentError::InvalidExam(
                "timeLimit must be positive".to_string(),
            ));
        }
        for category in &self.categories {
            if !bank.iter().any(|q| q.category() == Some(category.as_str())) {
                problems.push(ContentError::InvalidExam(format!(
                    "category \"{}\" has no questions",
                    category
                )));
            }
        }
        if let Some(mix) = &self.difficulty_mix {
            if mix.total() == 0 {
                problems.push(ContentError::InvalidExam(
                    "difficultyMix weights are all zero".to_string(),
                ));
            }
            for difficulty in Difficulty::ALL {
                if mix.weight(difficulty) > 0 && !bank.iter().any(|q| q.difficulty() == Some(difficulty)) {
                    problems.push(ContentError::InvalidExam(format!(
                        "difficultyMix asks for {} questions but the bank has none",
                        difficulty
                    )));
                }
            }
        }

        problems
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit.map(Duration::from_secs)
    }
}

/// Pick up to `count` questions spread evenly over `categories`.
///
/// Each category gets `count / k` picks and the first `count % k` one more.
/// Picks within a category are random. When a category runs short, the gap
/// is filled at random from the questions not yet drawn. The result is
/// shuffled. With no categories this is a plain random sample.
pub fn draw_balanced<R: Rng + ?Sized>(
    bank: &[Question],
    count: usize,
    categories: &[String],
    rng: &mut R,
) -> Vec<Question> {
    let count = count.min(bank.len());
    let quotas: Vec<usize> = if categories.is_empty() {
        Vec::new()
    } else {
        let per_category = count / categories.len();
        let extra = count % categories.len();
        (0..categories.len())
            .map(|slot| per_category + usize::from(slot < extra))
            .collect()
    };

    draw_grouped(bank, count, &quotas, rng, |q| {
        categories
            .iter()
            .position(|category| q.category() == Some(category.as_str()))
    })
}

/// Pick up to `count` questions with difficulties weighted by `mix`.
///
/// Shortfalls in one difficulty are filled at random from the rest of the
/// bank, as in [`draw_balanced`].
pub fn draw_by_difficulty<R: Rng + ?Sized>(
    bank: &[Question],
    count: usize,
    mix: &DifficultyMix,
    rng: &mut R,
) -> Vec<Question> {
    let count = count.min(bank.len());
    let quotas = mix.quotas(count);

    draw_grouped(bank, count, &quotas, rng, |q| {
        q.difficulty()
            .and_then(|difficulty| Difficulty::ALL.iter().position(|d| *d == difficulty))
    })
}

/// Draw `quotas[g]` questions from each group `g`, top up to `count` from
/// whatever is left, then shuffle. `count` must not exceed the bank.
fn draw_grouped<R, F>(
    bank: &[Question],
    count: usize,
    quotas: &[usize],
    rng: &mut R,
    group_of: F,
) -> Vec<Question>
where
    R: Rng + ?Sized,
    F: Fn(&Question) -> Option<usize>,
{
    let groups: Vec<Option<usize>> = bank.iter().map(&group_of).collect();
    let mut taken = vec![false; bank.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(count);

    for (group, &quota) in quotas.iter().enumerate() {
        let pool: Vec<usize> = (0..bank.len())
            .filter(|&i| !taken[i] && groups[i] == Some(group))
            .collect();

        for &index in pool.choose_multiple(rng, quota) {
            taken[index] = true;
            picked.push(index);
        }
        debug!(group, quota, available = pool.len(), "group drawn");
    }

    let shortfall = count.saturating_sub(picked.len());
    if shortfall > 0 {
        let rest: Vec<usize> = (0..bank.len()).filter(|&i| !taken[i]).collect();
        picked.extend(rest.choose_multiple(rng, shortfall).copied());
    }

    picked.shuffle(rng);
    picked.into_iter().map(|index| bank[index].clone()).collect()
}

/// A drawn mock exam ready to be taken.
#[derive(Debug, Clone)]
pub struct MockExam {
    pub config: MockExamConfig,
    pub quiz: Quiz,
}

impl MockExam {
    pub fn draw<R: Rng + ?Sized>(
        config: MockExamConfig,
        bank: &[Question],
        rng: &mut R,
    ) -> Result<Self, ContentError> {
        if config.pass_threshold > 100 {
            return Err(ContentError::InvalidExam(format!(
                "pass threshold {}% is above 100%",
                config.pass_threshold
            )));
        }

        let questions = match &config.difficulty_mix {
            Some(mix) => draw_by_difficulty(bank, config.total_questions, mix, rng),
            None => draw_balanced(bank, config.total_questions, &config.categories, rng),
        };
        let quiz = Quiz::new(config.exam_title.clone(), questions)?;
        info!(exam = %config.exam_id, questions = quiz.len(), "mock exam drawn");

        Ok(Self { config, quiz })
    }
}

/// Countdown for a timed exam.
#[derive(Debug, Clone, Copy)]
pub struct ExamClock {
    started: Instant,
    limit: Duration,
}

impl ExamClock {
    pub fn start(limit: Duration) -> Self {
        Self::started_at(Instant::now(), limit)
    }

    pub fn started_at(started: Instant, limit: Duration) -> Self {
        Self { started, limit }
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.limit
            .saturating_sub(now.saturating_duration_since(self.started))
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_zero()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// `mm:ss` for the countdown display.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
