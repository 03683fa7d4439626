use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use course_quiz::logging::{self, LogConfig};
use course_quiz::{CourseQuiz, DEFAULT_QUESTIONS_PATH, QuestionId, QuickCheck, validate_bank};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take a quiz, or a mock exam with --exam
    Run {
        /// JSON file to load the questions from
        #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
        questions: PathBuf,

        /// Draw a mock exam using the bank's exam section
        #[arg(long)]
        exam: bool,

        /// Seed for a reproducible exam draw
        #[arg(long, requires = "exam")]
        seed: Option<u64>,

        /// Number of exam questions, overriding the bank's totalQuestions
        #[arg(long, requires = "exam")]
        questions_limit: Option<usize>,
    },

    /// Answer a single question as an inline check
    Check {
        /// JSON file to load the questions from
        #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
        questions: PathBuf,

        /// Id of the question to ask
        #[arg(long)]
        id: String,
    },

    /// Check question bank files for content defects
    Validate {
        /// Bank files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_config = match cli.command {
        Commands::Validate { .. } => LogConfig::batch(cli.log_file.clone(), cli.verbose),
        _ => LogConfig::interactive(cli.log_file.clone(), cli.verbose),
    };
    if let Err(e) = logging::init(&log_config) {
        eprintln!("Failed to open log file: {}", e);
        process::exit(1);
    }

    let code = match cli.command {
        Commands::Run {
            questions,
            exam,
            seed,
            questions_limit,
        } => run_quiz(questions, exam, seed, questions_limit),
        Commands::Check { questions, id } => run_check(questions, &id),
        Commands::Validate { files } => validate(&files),
    };

    process::exit(code);
}

fn run_quiz(path: PathBuf, exam: bool, seed: Option<u64>, limit: Option<usize>) -> i32 {
    let quiz = if exam {
        CourseQuiz::exam_from_json(&path, seed, limit)
    } else {
        CourseQuiz::from_json(&path)
    };

    let quiz = match quiz {
        Ok(quiz) => quiz,
        Err(e) => {
            error!(error = %e, "could not start quiz");
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match quiz.run() {
        Ok(score) => {
            println!(
                "Score: {}/{} ({:.0}%)",
                score.correct,
                score.total,
                score.percentage()
            );
            0
        }
        Err(e) => {
            eprintln!("Error running quiz: {}", e);
            1
        }
    }
}

fn run_check(path: PathBuf, id: &str) -> i32 {
    let check = match QuickCheck::from_json(&path, &QuestionId::parse(id)) {
        Ok(check) => check,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match check.run() {
        Ok(Some(true)) => {
            println!("Correct");
            0
        }
        Ok(Some(false)) => {
            println!("Incorrect");
            0
        }
        Ok(None) => 0,
        Err(e) => {
            eprintln!("Error running check: {}", e);
            1
        }
    }
}

fn validate(files: &[PathBuf]) -> i32 {
    let mut all_valid = true;

    for path in files {
        match validate_bank(path) {
            Ok(report) if report.is_valid() => {
                let exam = if report.has_exam { ", exam config OK" } else { "" };
                println!(
                    "{}: {} questions{}",
                    report.path.display(),
                    report.question_count,
                    exam
                );
            }
            Ok(report) => {
                all_valid = false;
                println!(
                    "{}: {} defect(s)",
                    report.path.display(),
                    report.defects.len()
                );
                for defect in &report.defects {
                    println!("  - {}", defect);
                }
            }
            Err(e) => {
                all_valid = false;
                println!("{}", e);
            }
        }
    }

    if all_valid {
        println!("All question banks valid");
        0
    } else {
        1
    }
}
