use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AnswerService, AppServices, QuestionService};
use stepform_core::model::{CalculationId, StepCode};
use storage::HttpApiConfig;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidCalculationId { raw: String },
    InvalidSteps { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
            ArgsError::InvalidCalculationId { raw } => {
                write!(f, "invalid calculation id: {raw}")
            }
            ArgsError::InvalidSteps { raw } => write!(f, "invalid step list: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    steps: Vec<StepCode>,
    calculation_id: Option<CalculationId>,
}

impl UiApp for DesktopApp {
    fn question_service(&self) -> Arc<QuestionService> {
        self.services.questions()
    }

    fn answer_service(&self) -> Arc<AnswerService> {
        self.services.answers()
    }

    fn steps(&self) -> Vec<StepCode> {
        self.steps.clone()
    }

    fn calculation_id(&self) -> Option<CalculationId> {
        self.calculation_id
    }
}

#[derive(Debug)]
struct Args {
    api: HttpApiConfig,
    calculation_id: Option<CalculationId>,
    steps: Vec<StepCode>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui        [--api-url <url>] [--calculation-id <id>] [--steps <A,B,..>]");
    eprintln!("  cargo run -p app -- questions [--api-url <url>]   # list every question");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --api-url {}", storage::http::DEFAULT_API_URL);
    eprintln!("  no calculation (answers are not saved), no steps");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STEPFORM_API_URL, STEPFORM_CALCULATION_ID, STEPFORM_STEPS,");
    eprintln!("  STEPFORM_HTTP_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Questions,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "questions" => Some(Self::Questions),
            _ => None,
        }
    }
}

fn parse_calculation_id(raw: String) -> Result<CalculationId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidCalculationId { raw })
}

fn parse_steps(raw: String) -> Result<Vec<StepCode>, ArgsError> {
    let steps = StepCode::parse_list(&raw);
    if steps.is_empty() {
        return Err(ArgsError::InvalidSteps { raw });
    }
    Ok(steps)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

impl Args {
    /// Defaults from the environment; flags parsed later override them.
    fn from_env() -> Result<Self, ArgsError> {
        let calculation_id = non_empty_env("STEPFORM_CALCULATION_ID")
            .map(parse_calculation_id)
            .transpose()?;
        let steps = non_empty_env("STEPFORM_STEPS")
            .map(parse_steps)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            api: HttpApiConfig::from_env(),
            calculation_id,
            steps,
        })
    }

    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    self.api.base_url = value.trim().to_string();
                }
                "--calculation-id" => {
                    let value = require_value(args, "--calculation-id")?;
                    self.calculation_id = Some(parse_calculation_id(value)?);
                }
                "--steps" => {
                    let value = require_value(args, "--steps")?;
                    self.steps = parse_steps(value)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_questions(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let questions = runtime.block_on(services.questions().all_questions())?;
    for question in &questions {
        println!(
            "{}\t{}\t{}\t{}",
            question.step_code, question.code, question.question_type, question.label
        );
    }
    tracing::info!(count = questions.len(), "listed questions");
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::from_env()
        .and_then(|args| args.parse(&mut iter))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    init_tracing();
    let services = AppServices::new_http(&parsed.api)?;

    match cmd {
        Command::Questions => list_questions(&services),
        Command::Ui => {
            if parsed.steps.is_empty() {
                tracing::warn!("no steps configured; pass --steps or set STEPFORM_STEPS");
            }
            if parsed.calculation_id.is_none() {
                tracing::warn!("no calculation selected; answers will not be saved");
            }
            tracing::info!(
                steps = parsed.steps.len(),
                calculation_id = ?parsed.calculation_id,
                "launching questionnaire"
            );

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                steps: parsed.steps,
                calculation_id: parsed.calculation_id,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Stepform")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
