//! Frame analysis from the command line.
//!
//! Loads a directory of reference exercises, builds every model once, then
//! analyses each request file and prints one JSON object per request to
//! stdout: the analysis response, or `{"error_msg": ...}` on failure.
//!
//! # Usage
//!
//! ```text
//! pose-score --references data/ [--config scoring.toml] [--verbose] frame1.json frame2.json
//! ```
//!
//! Each request file holds
//! `{"exercise_category": ..., "first_half": ..., "landmarks": [{id, x, y, z}, ...]}`.
//! Logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pose_angles::{AngleComputer, LayoutCatalog};
use pose_scoring::{
    AnalysisRequest, Analyzer, ErrorResponse, JsonDirectoryLibrary, ModelRegistry,
    ReferenceLibrary, ScoringConfig, ScoringError,
};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Score pose frames against recorded reference exercises
#[derive(Parser, Debug)]
#[command(name = "pose-score")]
#[command(about = "Score pose frames against recorded reference exercises", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory of `<exercise>.json` reference files
    #[arg(long, short)]
    references: PathBuf,

    /// TOML scoring configuration (defaults apply when omitted)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Pretty-print responses
    #[arg(long)]
    pretty: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Request files to analyse
    #[arg(name = "REQUEST")]
    requests: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdout = std::io::stdout();
    let all_ok = run(&cli, &mut stdout.lock())?;
    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs the command, writing output to `out`.
///
/// Returns `false` if any request failed.
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => ScoringConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScoringConfig::default(),
    };

    if cli.print_config {
        write!(out, "{}", config.to_toml_string()?)?;
        return Ok(true);
    }

    let catalog = LayoutCatalog::standard();
    let library =
        JsonDirectoryLibrary::open(&cli.references, &catalog, AngleComputer::new(config.use_2d))
            .with_context(|| format!("loading references from {}", cli.references.display()))?;
    let registry = ModelRegistry::build(&library, &catalog, &config)
        .context("building scoring models")?;
    info!(
        exercises = library.exercises().len(),
        models = registry.len(),
        "Ready"
    );
    let analyzer = Analyzer::new(registry, &config);

    let parsed: Vec<_> = cli.requests.iter().map(|path| read_request(path)).collect();
    let valid: Vec<AnalysisRequest> = parsed
        .iter()
        .filter_map(|request| request.as_ref().ok().cloned())
        .collect();
    let mut analysed = analyzer.analyze_batch(&valid).into_iter();

    let mut all_ok = true;
    for (path, request) in cli.requests.iter().zip(parsed) {
        let outcome = match request {
            Ok(_) => {
                let Some(outcome) = analysed.next() else {
                    bail!("missing analysis result for {}", path.display());
                };
                outcome
            }
            Err(err) => Err(err),
        };

        let json = match outcome {
            Ok(response) => to_json(&response, cli.pretty)?,
            Err(err) => {
                all_ok = false;
                warn!(request = %path.display(), error = %err, "Request failed");
                to_json(&ErrorResponse::from(&err), cli.pretty)?
            }
        };
        writeln!(out, "{json}")?;
    }

    Ok(all_ok)
}

fn read_request(path: &Path) -> pose_scoring::Result<AnalysisRequest> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ScoringError::Io(format!("{}: {e}", path.display())))?;
    AnalysisRequest::from_json_str(&contents)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CURL: &str = r#"{
        "first_half": [
            { "angles": [170.0, 170.0, 15.0, 15.0], "progress": 0.0 },
            { "angles": [40.0, 40.0, 15.0, 15.0], "progress": 1.0 }
        ],
        "second_half": [
            { "angles": [40.0, 40.0, 15.0, 15.0], "progress": 0.0 },
            { "angles": [170.0, 170.0, 15.0, 15.0], "progress": 1.0 }
        ]
    }"#;

    /// Arms hanging straight down: both elbows at 180 degrees.
    const STANDING: &str = r#"{
        "exercise_category": "Bicep_Curl",
        "first_half": false,
        "landmarks": [
            { "id": 11, "x": 0.40, "y": 0.30, "z": 0.0 },
            { "id": 12, "x": 0.60, "y": 0.30, "z": 0.0 },
            { "id": 13, "x": 0.40, "y": 0.45, "z": 0.0 },
            { "id": 14, "x": 0.60, "y": 0.45, "z": 0.0 },
            { "id": 15, "x": 0.40, "y": 0.60, "z": 0.0 },
            { "id": 16, "x": 0.60, "y": 0.60, "z": 0.0 },
            { "id": 23, "x": 0.42, "y": 0.60, "z": 0.0 },
            { "id": 24, "x": 0.58, "y": 0.60, "z": 0.0 }
        ]
    }"#;

    fn cli(references: &Path, requests: Vec<PathBuf>) -> Cli {
        Cli {
            references: references.to_path_buf(),
            config: None,
            pretty: false,
            print_config: false,
            verbose: false,
            requests,
        }
    }

    #[test]
    fn cli_parses_arguments() {
        let cli = Cli::try_parse_from([
            "pose-score",
            "--references",
            "data",
            "--verbose",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.references, PathBuf::from("data"));
        assert!(cli.verbose);
        assert_eq!(cli.requests.len(), 2);
        assert!(Cli::try_parse_from(["pose-score", "a.json"]).is_err());
    }

    #[test]
    fn analyses_requests_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let references = dir.path().join("references");
        std::fs::create_dir(&references).unwrap();
        std::fs::write(references.join("bicep_curl.json"), CURL).unwrap();

        let good = dir.path().join("good.json");
        std::fs::write(&good, STANDING).unwrap();
        let unknown = dir.path().join("unknown.json");
        std::fs::write(&unknown, STANDING.replace("Bicep_Curl", "plank")).unwrap();
        let missing = dir.path().join("missing.json");

        // Nearest-exemplar progress keeps the expected phase flip exact.
        let config = dir.path().join("scoring.toml");
        std::fs::write(&config, "k = 1\n").unwrap();
        let mut cli = cli(&references, vec![good, unknown, missing]);
        cli.config = Some(config);

        let mut out = Vec::new();
        let all_ok = run(&cli, &mut out).unwrap();
        assert!(!all_ok);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);

        // Extended arms finish the falling half.
        assert_eq!(lines[0]["finished_repetition"], true);
        assert_eq!(lines[0]["first_half"], true);
        assert!(lines[0]["correctness"].as_f64().unwrap() > 0.5);

        assert!(
            lines[1]["error_msg"]
                .as_str()
                .unwrap()
                .contains("plank")
        );
        assert!(lines[2]["error_msg"].as_str().unwrap().contains("IO error"));
    }

    #[test]
    fn print_config_emits_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("scoring.toml");
        std::fs::write(&config_path, "k = 2\n").unwrap();

        let mut cli = cli(dir.path(), Vec::new());
        cli.config = Some(config_path);
        cli.print_config = true;

        let mut out = Vec::new();
        assert!(run(&cli, &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("k = 2"));
        assert!(text.contains("use_2d = true"));
    }

    #[test]
    fn incomplete_references_fail_startup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("squat.json"),
            r#"{ "first_half": [{ "angles": [1, 2, 3, 4, 5, 6] }] }"#,
        )
        .unwrap();

        let err = run(&cli(dir.path(), Vec::new()), &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("no reference exemplars"));
    }
}
