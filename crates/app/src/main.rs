use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use services::{
    Clock, ExamLoopService, SessionError, SessionHandle, SessionStatus, ShuffleOptions, Shuffler,
};
use storage::{ExamSource, JsonFileExamSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod input;
mod render;

use input::Input;

const DEFAULT_EXAM_PATH: &str = "exam-config.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidLogFilter { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidLogFilter { raw } => write!(f, "invalid --log filter: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  exam [run]  [--exam <path>] [--seed <u64>] [--no-shuffle] [--json] [--log <filter>]");
    eprintln!("  exam check  [--exam <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --exam {DEFAULT_EXAM_PATH}");
    eprintln!("  --log info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_CONFIG, EXAM_SEED, EXAM_LOG (RUST_LOG is honored when --log/EXAM_LOG are unset)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    exam_path: PathBuf,
    seed: Option<u64>,
    shuffle: bool,
    json: bool,
    log_filter: Option<String>,
}

impl Args {
    /// Parse flags, falling back to `env` for values not given on the command line.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut exam_path =
            env("EXAM_CONFIG").map_or_else(|| DEFAULT_EXAM_PATH.into(), PathBuf::from);
        let mut seed = env("EXAM_SEED")
            .map(|raw| raw.parse::<u64>().map_err(|_| ArgsError::InvalidSeed { raw }))
            .transpose()?;
        let mut log_filter = env("EXAM_LOG");
        let mut shuffle = true;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--exam" => exam_path = require_value(args, "--exam")?.into(),
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--no-shuffle" => shuffle = false,
                "--json" => json = true,
                "--log" => log_filter = Some(require_value(args, "--log")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            exam_path,
            seed,
            shuffle,
            json,
            log_filter,
        })
    }

    fn shuffler(&self) -> Shuffler {
        let options = if self.shuffle {
            ShuffleOptions::default()
        } else {
            ShuffleOptions::none()
        };
        Shuffler::new().with_options(options).with_seed(self.seed)
    }
}

fn init_tracing(log_filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match log_filter {
        Some(raw) => EnvFilter::try_new(raw).map_err(|_| ArgsError::InvalidLogFilter {
            raw: raw.to_owned(),
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Logs go to stderr so they never interleave with the exam on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| err.to_string().into())
}

async fn drive(handle: SessionHandle, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut updates = handle.subscribe();
    let mut notices = render::TimerNotices::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render::help());
    println!("{}", render::snapshot(&handle.snapshot()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed, submitting");
                    break;
                };
                match input::parse(&line) {
                    Ok(Input::Intent(intent)) => match handle.send(intent).await {
                        Ok(()) => {}
                        Err(SessionError::Closed) => break,
                        Err(err) => println!("! {err}"),
                    },
                    Ok(Input::Show) => {}
                    Ok(Input::Help) => println!("{}", render::help()),
                    Err(err) => println!("! {err}"),
                }

                let snapshot = handle.snapshot();
                if snapshot.status == SessionStatus::Completed {
                    break;
                }
                println!("{}", render::snapshot(&snapshot));
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let (status, remaining_secs) = {
                    let snapshot = updates.borrow_and_update();
                    (snapshot.status, snapshot.remaining_secs)
                };
                if status == SessionStatus::Completed {
                    break;
                }
                if status == SessionStatus::InProgress {
                    if let Some(notice) = notices.notice_for(remaining_secs) {
                        println!("{notice}");
                    }
                }
            }
        }
    }

    let summary = handle.submit().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", render::summary(&summary));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Run,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Run,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter(), |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.log_filter.as_deref())?;
    let source = Arc::new(JsonFileExamSource::new(&parsed.exam_path));

    match cmd {
        Command::Check => {
            info!(path = %source.path().display(), "checking exam definition");
            let exam = source.load_exam().await?;
            println!(
                "{}: {} question(s), {} minute(s), max score {}",
                exam.title(),
                exam.question_count(),
                exam.time_minutes(),
                exam.max_score()
            );
            Ok(())
        }
        Command::Run => {
            let loop_svc =
                ExamLoopService::new(Clock::system(), source).with_shuffler(parsed.shuffler());
            let handle = loop_svc.spawn_attempt().await.inspect_err(|err| {
                warn!(path = %parsed.exam_path.display(), error = %err, "could not start exam");
            })?;
            drive(handle, parsed.json).await
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
