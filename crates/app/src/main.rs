use std::fmt;

use quiz_core::model::{QuizId, QuizPhase};
use remote::{AuthSession, HttpSourceConfig, SourceConfig, SourceKind};
use services::{QuizController, QuizServices, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::render_session;
use ui::vm::{QuizStartVm, confirm_submit_message};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
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
    eprintln!("  cargo run -p app -- run      [--quiz-id <id>] [--api <url>] [--token <t>] [--fixtures]");
    eprintln!("  cargo run -p app -- attempts [--quiz-id <id>] [--api <url>] [--token <t>] [--fixtures]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --quiz-id 1");
    eprintln!("  --api http://localhost:3000/api");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LMS_QUIZ_ID, LMS_API_BASE_URL, LMS_AUTH_TOKEN, LMS_USE_FIXTURES, RUST_LOG");
}

fn print_commands() {
    eprintln!("Commands:");
    eprintln!("  s          start the quiz");
    eprintln!("  a <n>      pick option n for the current question");
    eprintln!("  n / p      next / previous question");
    eprintln!("  g <n>      go to question n");
    eprintln!("  submit     submit the attempt (y to confirm)");
    eprintln!("  r          back to the start screen");
    eprintln!("  q          quit");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Attempts,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "attempts" => Some(Self::Attempts),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    quiz_id: QuizId,
    source: SourceConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut quiz_id = match std::env::var("LMS_QUIZ_ID") {
            Ok(raw) => raw
                .parse::<QuizId>()
                .map_err(|_| ArgsError::InvalidQuizId { raw })?,
            Err(_) => QuizId::new(1),
        };
        let mut api = None;
        let mut token = None;
        let mut fixtures = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    quiz_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                }
                "--api" => api = Some(require_value(args, "--api")?),
                "--token" => token = Some(require_value(args, "--token")?),
                "--fixtures" => fixtures = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let kind = if fixtures {
            SourceKind::Fixture
        } else if let Some(raw) = api {
            let config =
                HttpSourceConfig::new(&raw).map_err(|_| ArgsError::InvalidApiUrl { raw })?;
            SourceKind::Live(config)
        } else {
            SourceKind::from_env().map_err(|_| ArgsError::InvalidApiUrl {
                raw: std::env::var("LMS_API_BASE_URL").unwrap_or_default(),
            })?
        };
        let auth = token.map_or_else(AuthSession::from_env, AuthSession::with_token);

        Ok(Self {
            quiz_id,
            source: SourceConfig { kind, auth },
        })
    }
}

/// One line typed at the quiz prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Start,
    Answer(usize),
    Next,
    Previous,
    GoTo(usize),
    Submit,
    Confirm,
    Restart,
    Help,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("type h for commands".into());
        };
        let number = |parts: &mut std::str::SplitWhitespace<'_>| {
            parts
                .next()
                .and_then(|raw| raw.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("{head} needs a number starting at 1"))
        };
        let input = match head {
            "s" | "start" => Self::Start,
            "a" | "answer" => Self::Answer(number(&mut parts)?),
            "n" | "next" => Self::Next,
            "p" | "prev" => Self::Previous,
            "g" | "goto" => Self::GoTo(number(&mut parts)?),
            "submit" => Self::Submit,
            "y" | "yes" => Self::Confirm,
            "r" | "restart" => Self::Restart,
            "h" | "help" => Self::Help,
            "q" | "quit" => Self::Quit,
            other => return Err(format!("unknown command: {other}")),
        };
        Ok(input)
    }
}

fn print_screen(quiz: &QuizController) {
    println!("\n{}", render_session(&quiz.snapshot()));
}

/// Apply one command. Returns whether a confirmation is now pending.
async fn handle(quiz: &QuizController, input: Input, confirming: bool) -> bool {
    let result = match input {
        Input::Start => quiz.start().await,
        Input::Answer(n) => {
            let snapshot = quiz.snapshot();
            match snapshot
                .current_question()
                .and_then(|q| q.options.get(n - 1).map(|o| (q.id, o.id)))
            {
                Some((question_id, option_id)) => quiz.select_answer(question_id, option_id),
                None => {
                    eprintln!("no option {n} here");
                    Ok(())
                }
            }
        }
        Input::Next => {
            quiz.next_question();
            Ok(())
        }
        Input::Previous => {
            quiz.previous_question();
            Ok(())
        }
        Input::GoTo(n) => {
            quiz.go_to_question(n - 1);
            Ok(())
        }
        Input::Submit => match quiz.request_submit().await {
            Ok(SubmitOutcome::NeedsConfirmation { unanswered }) => {
                eprintln!("{} [y/N]", confirm_submit_message(unanswered));
                return true;
            }
            Ok(SubmitOutcome::Submitted(_)) => Ok(()),
            Err(err) => Err(err),
        },
        Input::Confirm if confirming => quiz.confirm_submit().await.map(|_| ()),
        Input::Confirm => {
            eprintln!("nothing to confirm");
            Ok(())
        }
        Input::Restart => {
            quiz.restart();
            if let Err(err) = quiz.refresh_attempts().await {
                log::warn!("could not refresh attempts: {err}");
            }
            Ok(())
        }
        Input::Help => {
            print_commands();
            Ok(())
        }
        Input::Quit => Ok(()),
    };
    if let Err(err) = result {
        eprintln!("! {err}");
    }
    false
}

async fn run_quiz(quiz: QuizController) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = quiz.load().await {
        log::warn!("could not load quiz details: {err}");
    }
    print_screen(&quiz);
    print_commands();

    let mut phases = quiz.subscribe();
    phases.borrow_and_update();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut confirming = false;

    loop {
        tokio::select! {
            changed = phases.changed() => {
                if changed.is_err() {
                    break;
                }
                // Auto-submit finished while we were waiting on input.
                if *phases.borrow_and_update() == QuizPhase::Results {
                    confirming = false;
                    print_screen(&quiz);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = match Input::parse(&line) {
                    Ok(input) => input,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                };
                if input == Input::Quit {
                    break;
                }
                confirming = handle(&quiz, input, confirming).await;
                phases.borrow_and_update();
                print_screen(&quiz);
            }
        }
    }
    Ok(())
}

async fn print_attempts(quiz: QuizController) -> Result<(), Box<dyn std::error::Error>> {
    quiz.load().await?;
    let vm = QuizStartVm::from(&quiz.snapshot());
    println!("{}", vm.title);
    if vm.attempts.is_empty() {
        println!("No attempts yet.");
        return Ok(());
    }
    for row in &vm.attempts {
        println!(
            "#{:<3} {:>7}  {:<6}  {}",
            row.number, row.percentage, row.result_label, row.date
        );
    }
    if let Some(best) = &vm.best_attempt {
        println!("{best}");
    }
    Ok(())
}

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means take the quiz.
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

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();
    let services = QuizServices::from_config(parsed.source)?;
    let quiz = services.quiz(parsed.quiz_id);

    match cmd {
        Command::Run => run_quiz(quiz).await,
        Command::Attempts => print_attempts(quiz).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
