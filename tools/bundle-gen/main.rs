use clap::{Parser, ValueEnum};
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;
use shindan::prelude::*;
use std::fs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GateCli {
    Ungated,
    PreGated,
    PostGated,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoringCli {
    DecisionTree,
    Points,
}

/// A CLI tool to generate random assessment bundles for soak-testing the engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the bundle to (.json for JSON, anything else for bincode)
    #[arg(short, long, default_value = "generated_assessment.json")]
    output: String,

    /// Number of questions to generate
    #[arg(short, long, default_value_t = 12)]
    questions: usize,

    /// Maximum number of answers per question
    #[arg(long, default_value_t = 4)]
    max_answers: usize,

    /// Allow answers to route back to earlier questions
    #[arg(long)]
    allow_cycles: bool,

    #[arg(long, value_enum, default_value_t = GateCli::Ungated)]
    gate: GateCli,

    #[arg(long, value_enum, default_value_t = ScoringCli::DecisionTree)]
    scoring: ScoringCli,
}

const BUCKETS: [(&str, f64, f64); 3] = [
    ("starter", 0.0, 9.0),
    ("growth", 10.0, 19.0),
    ("scale", 20.0, 1000.0),
];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    // Validate before generating anything
    if cli.questions == 0 || cli.max_answers == 0 {
        eprintln!("Error: --questions and --max-answers must both be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating assessment ({} questions, up to {} answers each, cycles {})...",
        cli.questions,
        cli.max_answers,
        if cli.allow_cycles { "allowed" } else { "forbidden" }
    );

    let questions = generate_questions(&mut rng, cli.questions);
    let answers = generate_answers(&mut rng, &cli);
    let buckets = generate_buckets();

    let bundle = AssessmentBundle {
        config: AssessmentConfig {
            id: "generated".to_string(),
            slug: "generated".to_string(),
            title: "Generated assessment".to_string(),
            description: None,
            entry_question_id: None,
            scoring_method: match cli.scoring {
                ScoringCli::DecisionTree => ScoringMethod::DecisionTree,
                ScoringCli::Points => ScoringMethod::Points,
            },
            gate_behavior: match cli.gate {
                GateCli::Ungated => GateBehavior::Ungated,
                GateCli::PreGated => GateBehavior::PreGated,
                GateCli::PostGated => GateBehavior::PostGated,
            },
            published: true,
        },
        questions,
        answers,
        buckets,
    };

    if cli.output.ends_with(".json") {
        fs::write(&cli.output, bundle.to_json()?)?;
    } else {
        bundle.save(&cli.output)?;
    }

    println!("Successfully generated and saved bundle to '{}'", cli.output);
    Ok(())
}

fn question_id(index: usize) -> String {
    format!("q{}", index + 1)
}

fn answer_id(question: usize, answer: usize) -> String {
    format!("q{}-a{}", question + 1, answer + 1)
}

/// Generates questions; roughly a quarter depend on an answer of an earlier question.
fn generate_questions(rng: &mut ThreadRng, count: usize) -> Vec<Question> {
    let questions: Vec<Question> = (0..count)
        .map(|index| {
            let conditional_logic = (index > 0 && rng.random_bool(0.25)).then(|| {
                let parent = rng.random_range(0..index);
                EncodedPayload::from_json(&json!({
                    "questionId": question_id(parent),
                    "answerId": answer_id(parent, 0),
                }))
            });
            Question {
                id: question_id(index),
                order: index as i32 + 1,
                question_text: format!("Generated question {}", index + 1),
                description: None,
                conditional_logic,
            }
        })
        .collect();
    println!("-> Generated {} questions.", questions.len());
    questions
}

/// Generates answers with a mix of explicit edges, terminal buckets, points and junk payloads.
fn generate_answers(rng: &mut ThreadRng, cli: &Cli) -> Vec<Answer> {
    let mut answers = Vec::new();
    for question in 0..cli.questions {
        let count = rng.random_range(1..=cli.max_answers);
        for index in 0..count {
            let roll = rng.random_range(0..100);
            let value = match roll {
                0..50 if cli.allow_cycles || question + 1 < cli.questions => {
                    let target = if cli.allow_cycles {
                        rng.random_range(0..cli.questions)
                    } else {
                        rng.random_range(question + 1..cli.questions)
                    };
                    json!({
                        "nextQuestionId": question_id(target),
                        "points": rng.random_range(0..10),
                    })
                }
                0..65 => {
                    let (key, _, _) = BUCKETS[rng.random_range(0..BUCKETS.len())];
                    json!({ "resultBucketKey": key })
                }
                65..80 => json!({ "nextQuestionId": "missing-question" }),
                80..90 => json!({ "points": rng.random_range(0..10) }),
                _ => json!("not json"),
            };
            answers.push(Answer {
                id: answer_id(question, index),
                question_id: question_id(question),
                order: index as i32 + 1,
                answer_text: format!("Answer {}", index + 1),
                answer_value: EncodedPayload::from_json(&value),
            });
        }
    }
    println!("-> Generated {} answers.", answers.len());
    answers
}

fn generate_buckets() -> Vec<ResultBucket> {
    BUCKETS
        .iter()
        .enumerate()
        .map(|(index, (key, min, max))| ResultBucket {
            bucket_key: key.to_string(),
            bucket_name: key.to_string(),
            title: format!("Result: {}", key),
            content: String::new(),
            min_score: Some(*min),
            max_score: Some(*max),
            order: index as i32,
        })
        .collect()
}
