use clap::Parser;
use serde::Deserialize;
use shindan::error::ConversionError;
use shindan::prelude::*;
use shindan::telemetry;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

// --- JSON Deserialization Structs (Admin Export Format) ---
// The admin tool exports questions with their answers nested inside. These structs are
// only used here for conversion into an `AssessmentBundle`.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminExport {
    assessment: AssessmentConfig,
    questions: Vec<AdminQuestion>,
    #[serde(default)]
    result_buckets: Vec<ResultBucket>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminQuestion {
    id: String,
    order: i32,
    question_text: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    conditional_logic: Option<EncodedPayload>,
    #[serde(default)]
    answers: Vec<AdminAnswer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminAnswer {
    id: String,
    order: i32,
    answer_text: String,
    #[serde(default)]
    answer_value: EncodedPayload,
}

// --- Converter Implementation ---

impl IntoAssessment for AdminExport {
    fn into_assessment(self) -> std::result::Result<AssessmentBundle, ConversionError> {
        if self.assessment.slug.trim().is_empty() {
            return Err(ConversionError::ValidationError(
                "assessment slug must not be empty".to_string(),
            ));
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        let mut answers = Vec::new();
        for question in self.questions {
            answers.extend(question.answers.into_iter().map(|a| Answer {
                id: a.id,
                question_id: question.id.clone(),
                order: a.order,
                answer_text: a.answer_text,
                answer_value: a.answer_value,
            }));
            questions.push(Question {
                id: question.id,
                order: question.order,
                question_text: question.question_text,
                description: question.description,
                conditional_logic: question.conditional_logic,
            });
        }

        Ok(AssessmentBundle {
            config: self.assessment,
            questions,
            answers,
            buckets: self.result_buckets,
        })
    }
}

/// Runs an assessment end-to-end against an in-memory data service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the assessment bundle (.json, or bincode for any other extension)
    bundle_path: String,

    /// Treat the JSON file as an admin export with answers nested under questions
    #[arg(long)]
    admin_export: bool,

    /// Comma-separated answer ids to select, in order
    #[arg(short, long, value_delimiter = ',')]
    answers: Vec<String>,

    /// Run in interactive mode to be prompted for answers and lead details
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,

    /// Lead name for gated assessments
    #[arg(long)]
    name: Option<String>,

    /// Lead email for gated assessments
    #[arg(long)]
    email: Option<String>,

    /// Lead company for gated assessments
    #[arg(long)]
    company: Option<String>,

    /// Write the bundle as bincode to this path before running
    #[arg(long)]
    save_bincode: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

const MAX_RETRIES: usize = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        exit_with_error(&format!("Failed to initialise logging: {}", e));
    }

    let total_start = Instant::now();

    // --- 1. Loading ---
    let bundle = load_bundle(&cli).unwrap_or_else(|e| exit_with_error(&e));
    if let Some(path) = &cli.save_bincode {
        bundle
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save bundle: {}", e)));
        println!("Saved bincode bundle to '{}'", path);
    }

    let slug = bundle.config.slug.clone();
    let service = Arc::new(InMemoryService::new().with_bundle(bundle));

    let mut flow = FlowController::load(service.clone(), &slug)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Cannot start assessment: {}", e)));

    println!(
        "\n{} ({} questions, {:?} scoring, {} gate)",
        flow.config().title,
        flow.graph().len(),
        flow.config().scoring_method,
        flow.config().gate_behavior
    );

    // --- 2. Run ---
    let mut scripted: VecDeque<String> = cli.answers.iter().cloned().collect();
    let mut retries = 0;
    loop {
        let outcome = match flow.phase() {
            Phase::Complete => break,
            phase if phase.is_lead_capture() => {
                let form = lead_form(&cli);
                flow.submit_lead(&form).await
            }
            _ if flow.is_pending() => flow.retry_submit().await,
            _ => {
                let Some(question) = flow.current_question() else {
                    exit_with_error("No active question");
                };
                let progress = flow.progress();
                println!(
                    "\n[{}/{}] {}",
                    progress.current, progress.total, question.question_text
                );
                let options = flow.graph().answers_for(&question.id);
                for (index, answer) in options.iter().enumerate() {
                    println!("  {}) {} [{}]", index + 1, answer.answer_text, answer.id);
                }
                let choice = if cli.human {
                    prompt_choice(options)
                } else {
                    scripted
                        .pop_front()
                        .or_else(|| options.first().map(|a| a.id.clone()))
                        .unwrap_or_else(|| {
                            exit_with_error(&format!("Question '{}' has no answers", question.id))
                        })
                };
                println!("  -> {}", choice);
                let outcome = flow.select_answer(&choice).await;
                if let Some(resolution) = flow.last_resolution() {
                    println!("     ({})", RouteFormatter::explain(resolution));
                }
                outcome
            }
        };

        match outcome {
            Ok(_) => retries = 0,
            Err(e) if e.is_retryable() && retries < MAX_RETRIES => {
                retries += 1;
                eprintln!("Error: {} (retry {}/{})", e, retries, MAX_RETRIES);
            }
            Err(FlowError::InvalidLead(e)) if cli.human => eprintln!("{}", e),
            Err(e) => exit_with_error(&e.to_string()),
        }
    }

    // --- 3. Report ---
    println!("\n--- Assessment Complete ---");
    if let Some(done) = flow.completion() {
        println!("Session:    {}", done.session_id);
        println!("Result URL: {}", done.result_url);
        match flow.result_bucket() {
            Some(bucket) => println!("Result:     {} ({})", bucket.title, bucket.bucket_key),
            None => {
                let assigned = service
                    .session(&done.session_id)
                    .and_then(|s| s.bucket_key.map(|key| (key, s.score)));
                match assigned {
                    Some((key, Some(score))) => println!("Result:     {} (score {})", key, score),
                    Some((key, None)) => println!("Result:     {}", key),
                    None => println!("Result:     no bucket assigned"),
                }
            }
        }
    }
    println!("Total time: {:?}", total_start.elapsed());
}

fn load_bundle(cli: &Cli) -> std::result::Result<AssessmentBundle, String> {
    if !cli.admin_export {
        return AssessmentBundle::from_file(&cli.bundle_path)
            .map_err(|e| format!("Failed to load bundle '{}': {}", cli.bundle_path, e));
    }
    let json = fs::read_to_string(&cli.bundle_path)
        .map_err(|e| format!("Failed to read '{}': {}", cli.bundle_path, e))?;
    let export: AdminExport = serde_json::from_str(&json)
        .map_err(|e| format!("Failed to parse admin export: {}", e))?;
    export
        .into_assessment()
        .map_err(|e| format!("Failed to convert admin export: {}", e))
}

fn lead_form(cli: &Cli) -> LeadForm {
    if cli.human {
        println!("\nPlease enter your details to continue.");
        let mut form = LeadForm::new(prompt("Name"), prompt("Email"));
        let company = prompt("Company (optional)");
        if !company.is_empty() {
            form = form.with_company(company);
        }
        return form;
    }
    let (Some(name), Some(email)) = (&cli.name, &cli.email) else {
        exit_with_error("This assessment is gated: pass --name and --email");
    };
    let form = LeadForm::new(name, email);
    match &cli.company {
        Some(company) => form.with_company(company),
        None => form,
    }
}

fn prompt_choice(options: &[Answer]) -> String {
    loop {
        let input = prompt("Choose an answer");
        if let Ok(index) = input.parse::<usize>() {
            if let Some(answer) = index.checked_sub(1).and_then(|i| options.get(i)) {
                return answer.id.clone();
            }
        }
        if let Some(answer) = options.iter().find(|a| a.id == input) {
            return answer.id.clone();
        }
        println!("Invalid choice. Enter a number between 1 and {}.", options.len());
    }
}

fn prompt(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from stdin");
    }
    line.trim().to_string()
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
