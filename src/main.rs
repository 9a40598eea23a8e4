use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use tg_onboarding::bridge::{Bridge, HeadlessHost, InitData, WebAppHost};
use tg_onboarding::cli::{Cli, Commands};
use tg_onboarding::client::{RecordService, TeableClient};
use tg_onboarding::core::{config, init_logger, log_record_api_configuration, AppError, AppResult, RecordApiConfig};
use tg_onboarding::flow::{Step, StepError, Wizard};
use tg_onboarding::photo::{PhotoState, StillImageCamera};
use tg_onboarding::testing::InMemoryRecords;

/// Typed at any prompt to go one step back.
const BACK: &str = ":back";

/// Questions served by `run --dry-run`.
const DRY_RUN_QUESTIONS: [&str; 2] = ["What are you working on right now?", "What do you hope to get from the club?"];

/// Main entry point
///
/// Parses CLI arguments and dispatches to the subcommand. Without a command,
/// prints the configuration check.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run {
            photo,
            init_data,
            dry_run,
        }) => {
            log::info!("Running onboarding (photo: {}, dry run: {})", photo.display(), dry_run);
            Ok(run_wizard(photo, init_data, dry_run).await?)
        }
        Some(Commands::Questions { json }) => run_questions(json).await,
        Some(Commands::CheckConfig) | None => Ok(run_check_config()?),
    }
}

/// Builds the host bridge from init data. Without init data we are not inside
/// Telegram and the bridge reports itself unavailable.
fn build_bridge(init_data: Option<String>) -> AppResult<Bridge> {
    let Some(raw) = init_data.or_else(|| config::INIT_DATA.clone()) else {
        log::info!("No init data supplied, running without a Telegram host");
        return Ok(Bridge::unavailable());
    };

    let parsed = InitData::parse(&raw)?;
    match config::BOT_TOKEN.as_deref() {
        Some(token) => {
            parsed.validate(token)?;
            log::info!("Init data signature verified");
        }
        None => log::warn!("BOT_TOKEN not set, init data is trusted without validation"),
    }

    Ok(Bridge::new(move || {
        let host: Box<dyn WebAppHost> = Box::new(HeadlessHost::new(parsed));
        Some(host)
    }))
}

fn build_records(dry_run: bool) -> AppResult<Arc<dyn RecordService>> {
    if dry_run {
        log::info!("Dry run: submissions stay in memory");
        return Ok(Arc::new(InMemoryRecords::new().with_questions(DRY_RUN_QUESTIONS)));
    }
    let api = RecordApiConfig::from_env()?;
    log_record_api_configuration(&api);
    Ok(Arc::new(TeableClient::new(api)?))
}

enum Input {
    Back,
    Text(String),
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, label: &str, current: &str) -> AppResult<Input> {
        if current.is_empty() {
            println!("{}:", label);
        } else {
            println!("{} [{}]:", label, current);
        }
        let line = self
            .lines
            .next_line()
            .await?
            .ok_or_else(|| AppError::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "Input closed")))?;
        let line = line.trim();
        if line == BACK {
            Ok(Input::Back)
        } else if line.is_empty() {
            Ok(Input::Text(current.to_string()))
        } else {
            Ok(Input::Text(line.to_string()))
        }
    }
}

/// Runs the whole wizard on stdin/stdout.
async fn run_wizard(photo: PathBuf, init_data: Option<String>, dry_run: bool) -> AppResult<()> {
    let bridge = build_bridge(init_data)?;
    let records = build_records(dry_run)?;
    let camera = StillImageCamera::new(photo);
    let mut wizard = Wizard::new(bridge, records, Box::new(camera));
    let mut prompt = Prompt::new();

    wizard.start();
    println!("Type {} at any prompt to go back.", BACK);

    loop {
        let step = wizard.current();
        println!();
        println!("== {} ==", step);

        let outcome = match step {
            Step::Welcome => match prompt.ask("Press Enter to get started", "").await? {
                Input::Back => Ok(()),
                Input::Text(_) => wizard.get_started().map(drop),
            },
            Step::Name => {
                let mut form = wizard.name_form();
                let Input::Text(first) = prompt.ask("First name", &form.first_name).await? else {
                    wizard.back();
                    continue;
                };
                let Input::Text(last) = prompt.ask("Last name", &form.last_name).await? else {
                    wizard.back();
                    continue;
                };
                form.first_name = first;
                form.last_name = last;
                wizard.submit_name(&form).map(drop)
            }
            Step::Socials => {
                let mut form = wizard.socials_form();
                let Input::Text(instagram) = prompt.ask("Instagram", &form.instagram).await? else {
                    wizard.back();
                    continue;
                };
                let Input::Text(linkedin) = prompt.ask("LinkedIn", &form.linkedin).await? else {
                    wizard.back();
                    continue;
                };
                form.instagram = instagram;
                form.linkedin = linkedin;
                wizard.submit_socials(&form).map(drop)
            }
            Step::AboutYou => {
                let mut form = wizard.about_form();
                let Input::Text(about) = prompt.ask("Tell us about yourself", &form.about).await? else {
                    wizard.back();
                    continue;
                };
                form.about = about;
                wizard.submit_about(&form).map(drop)
            }
            Step::Questions => run_questions_step(&mut wizard, &mut prompt).await?,
            Step::Referrals => {
                let mut form = wizard.referral_form();
                let Input::Text(source) = prompt.ask("How did you hear about us?", &form.referral_source).await? else {
                    wizard.back();
                    continue;
                };
                form.referral_source = source;
                wizard.submit_referral(&form).map(drop)
            }
            Step::Photo => run_photo_step(&mut wizard, &mut prompt).await?,
            Step::Confirmation => {
                println!("Thank you! Your application has been submitted.");
                wizard.close()?;
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            println!("  {}", e);
        }
    }
}

async fn run_questions_step(wizard: &mut Wizard, prompt: &mut Prompt) -> AppResult<Result<(), StepError>> {
    if wizard.questions().is_empty() {
        if let Err(e) = wizard.load_questions().await {
            println!("  {}", e);
            if let Input::Back = prompt.ask("Press Enter to retry", "").await? {
                wizard.back();
            }
            return Ok(Ok(()));
        }
    }

    let mut form = wizard.questions_form();
    let texts: Vec<String> = form.questions().iter().map(|q| q.text.clone()).collect();
    for (index, text) in texts.iter().enumerate() {
        let current = form.answers[index].clone();
        match prompt.ask(text, &current).await? {
            Input::Back => {
                wizard.back();
                return Ok(Ok(()));
            }
            Input::Text(answer) => {
                form.answer(index, answer);
            }
        }
    }
    Ok(wizard.submit_questions(&form).map(drop))
}

async fn run_photo_step(wizard: &mut Wizard, prompt: &mut Prompt) -> AppResult<Result<(), StepError>> {
    let state = wizard.photo().state();
    match state {
        PhotoState::Idle => {
            if let Err(e) = wizard.open_camera().await {
                return Ok(Err(e));
            }
            Ok(wizard.camera_ready())
        }
        PhotoState::RequestingCamera | PhotoState::Previewing { .. } => {
            if !wizard.photo().can_capture() {
                if let Err(e) = wizard.camera_ready() {
                    return Ok(Err(e));
                }
            }
            match prompt.ask("Camera ready. Press Enter to capture", "").await? {
                Input::Back => {
                    wizard.back();
                    Ok(Ok(()))
                }
                Input::Text(_) => Ok(wizard.capture()),
            }
        }
        PhotoState::Captured | PhotoState::Error | PhotoState::Submitting | PhotoState::Done => {
            if let Some(message) = wizard.photo().error() {
                println!("  {}", message);
            }
            let label = if wizard.photo().can_submit() {
                "Enter to submit, r to retake"
            } else {
                "r to retake"
            };
            match prompt.ask(label, "").await? {
                Input::Back => {
                    wizard.back();
                    Ok(Ok(()))
                }
                Input::Text(choice) if choice.eq_ignore_ascii_case("r") => Ok(wizard.retake().await),
                Input::Text(_) if wizard.photo().can_submit() => {
                    println!("Uploading...");
                    match wizard.submit_photo().await {
                        Ok(_) => Ok(Ok(())),
                        // Shown inline on the next pass with the submit button still enabled.
                        Err(StepError::Photo(e)) if e.is_retryable_submit() => {
                            log::warn!("Photo submission failed ({}), offering retry", e.subcategory());
                            Ok(Ok(()))
                        }
                        Err(e) => Ok(Err(e)),
                    }
                }
                Input::Text(_) => Ok(Ok(())),
            }
        }
    }
}

/// Prints the question list.
async fn run_questions(json: bool) -> Result<()> {
    let api = RecordApiConfig::from_env()?;
    let client = TeableClient::new(api)?;
    let questions = client.fetch_questions().await?;

    if json {
        let items: Vec<serde_json::Value> = questions
            .iter()
            .map(|q| serde_json::json!({ "id": q.id, "question": q.text }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if questions.is_empty() {
        println!("No questions found.");
    } else {
        for (i, q) in questions.iter().enumerate() {
            println!("{}. {}", i + 1, q.text);
        }
    }
    Ok(())
}

fn run_check_config() -> AppResult<()> {
    let api = RecordApiConfig::from_env()?;
    log_record_api_configuration(&api);
    println!("Record service: {}", api.base_url);
    println!("  submissions table: {}", api.table_id);
    println!("  photo field:       {}", api.photo_field_id);
    println!("  questions table:   {}", api.questions_table_id);
    println!(
        "Init data validation: {}",
        if config::BOT_TOKEN.is_some() {
            "enabled"
        } else {
            "disabled (BOT_TOKEN not set)"
        }
    );
    Ok(())
}
