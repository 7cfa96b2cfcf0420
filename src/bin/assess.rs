//! Headless prediction from a JSON answer file.
//!
//! # Usage
//!
//! ```bash
//! assess [--model <path>] [<answers.json> | -]
//! ```
//!
//! Reads answers keyed by feature name (`age`, `sex`, `cp`, ...) from the file
//! or stdin and prints the assessment as JSON. Exit status is 0 on success,
//! 1 when the answers or the model are rejected, 2 on usage errors.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartcheck::adapters::sanitize::SanitizingMakeWriter;
use heartcheck::adapters::LogisticModel;
use heartcheck::application::PredictionService;
use heartcheck::config::AppConfig;
use heartcheck::RawAnswers;

const USAGE: &str = "Usage: assess [--model <path>] [<answers.json> | -]";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum UsageError {
    #[error("--model requires a path")]
    MissingModelPath,
    #[error("Unknown arg: {0}")]
    UnknownFlag(String),
    #[error("Only one input file may be given")]
    DuplicateInput,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    model: Option<PathBuf>,
    /// `None` reads stdin.
    input: Option<PathBuf>,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, UsageError> {
    let mut parsed = Args::default();
    let mut input_seen = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                let p = args.next().unwrap_or_default();
                if p.is_empty() {
                    return Err(UsageError::MissingModelPath);
                }
                parsed.model = Some(PathBuf::from(p));
            }
            "-h" | "--help" => parsed.help = true,
            other if other.starts_with("--") => {
                return Err(UsageError::UnknownFlag(other.to_string()));
            }
            other => {
                if input_seen {
                    return Err(UsageError::DuplicateInput);
                }
                input_seen = true;
                parsed.input = (other != "-").then(|| PathBuf::from(other));
            }
        }
    }

    Ok(parsed)
}

fn read_answers(input: Option<&PathBuf>, stdin: impl Read) -> Result<RawAnswers> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            let mut stdin = stdin;
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Answers are not valid JSON")
}

/// Load the model, then read and assess the answers.
///
/// The model is loaded before any input is read, so a bad artifact fails
/// without consuming stdin.
fn run(args: Args, mut config: AppConfig, stdin: impl Read, out: &mut impl Write) -> Result<()> {
    if args.model.is_some() {
        config.model_path = args.model;
    }

    let model_path = config.resolve_model_path()?;
    let model = LogisticModel::load(&model_path)?;
    let service = PredictionService::new(Arc::new(model));

    let answers = read_answers(args.input.as_ref(), stdin)?;
    let assessment = service.assess_raw(&answers)?;

    writeln!(out, "{}", serde_json::to_string(&assessment)?)?;
    Ok(())
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if args.help {
        println!(
            "{USAGE}\n\nReads answers as JSON from <answers.json> (or stdin when omitted or '-') and prints the prediction as JSON."
        );
        return;
    }

    // stdout carries the result, so logs always go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(std::io::stderr)),
        )
        .init();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(args, AppConfig::from_env(), std::io::stdin().lock(), &mut stdout) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write as _;

    const BUNDLED_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/model/heart_disease_model.json");

    const SCENARIO_A: &str = r#"{"age": 45, "sex": "Male", "cp": "Typical Angina",
        "trestbps": 120, "chol": 200, "fbs": "No", "restecg": "Normal", "thalach": 150,
        "exang": "No", "oldpeak": 1.0, "slope": "Upsloping", "ca": 0, "thal": "Normal"}"#;

    fn args(list: &[&str]) -> Result<Args, UsageError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    fn no_env() -> AppConfig {
        AppConfig::from_lookup(|_| None)
    }

    /// Reader that records whether anything tried to read it.
    struct Untouched<'a>(&'a Cell<bool>);

    impl Read for Untouched<'_> {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.set(true);
            Ok(0)
        }
    }

    #[test]
    fn test_parse_model_and_input() {
        let parsed = args(&["--model", "m.json", "answers.json"]).expect("Should parse");
        assert_eq!(parsed.model, Some(PathBuf::from("m.json")));
        assert_eq!(parsed.input, Some(PathBuf::from("answers.json")));

        let parsed = args(&["-"]).expect("Should parse");
        assert_eq!(parsed.input, None);
        assert_eq!(args(&[]).expect("Should parse"), Args::default());
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(
            args(&["--verbose"]),
            Err(UsageError::UnknownFlag("--verbose".into()))
        );
        assert_eq!(args(&["a.json", "b.json"]), Err(UsageError::DuplicateInput));
        assert_eq!(args(&["-", "b.json"]), Err(UsageError::DuplicateInput));
        assert_eq!(args(&["--model"]), Err(UsageError::MissingModelPath));
    }

    #[test]
    fn test_missing_model_fails_before_reading_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let read = Cell::new(false);
        let parsed = Args {
            model: Some(dir.path().join("absent.json")),
            ..Args::default()
        };

        let mut out = Vec::new();
        let err = run(parsed, no_env(), Untouched(&read), &mut out).expect_err("Should fail");

        assert!(!read.get());
        assert!(out.is_empty());
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_assesses_answers_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file");
        file.write_all(SCENARIO_A.as_bytes()).expect("Write answers");

        let parsed = Args {
            model: Some(PathBuf::from(BUNDLED_MODEL)),
            input: Some(file.path().to_path_buf()),
            help: false,
        };
        let mut out = Vec::new();
        run(parsed, no_env(), std::io::empty(), &mut out).expect("Should assess");

        let json: serde_json::Value =
            serde_json::from_slice(&out).expect("Output should be JSON");
        assert!(json.get("prediction").is_some());
        assert!(matches!(json["label"].as_i64(), Some(0 | 1)));
        assert!(json.get("assessed_at").is_some());
    }

    #[test]
    fn test_assesses_stdin() {
        let parsed = Args {
            model: Some(PathBuf::from(BUNDLED_MODEL)),
            ..Args::default()
        };
        let mut out = Vec::new();
        run(parsed, no_env(), SCENARIO_A.as_bytes(), &mut out).expect("Should assess");
        assert!(String::from_utf8_lossy(&out).contains("\"prediction\""));
    }

    #[test]
    fn test_invalid_answer_is_rejected() {
        let parsed = Args {
            model: Some(PathBuf::from(BUNDLED_MODEL)),
            ..Args::default()
        };
        let answers = SCENARIO_A.replace("\"Typical Angina\"", "true");
        let mut out = Vec::new();
        let err = run(parsed, no_env(), answers.as_bytes(), &mut out).expect_err("Should reject");

        assert!(out.is_empty());
        let err = err
            .downcast_ref::<heartcheck::HeartcheckError>()
            .expect("Should be a domain error");
        assert_eq!(err.field(), Some(heartcheck::Field::ChestPain));
    }
}
