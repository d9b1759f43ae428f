//! Command-line detection runner
//!
//! Ties a frame source, the detection pipeline and the persistence sink
//! together for one request:
//!
//! ```text
//! detect <profile-name> --image frame.png [--config config.yaml] [--out saved_images]
//! ```
//!
//! Prints a JSON detection report on stdout. Exit code 0 covers both
//! "detected" and "nothing detected" (the payload distinguishes them);
//! a non-zero code means the request itself failed.

use std::path::PathBuf;
use std::process;

use color_gauge::{
    detect, DetectionOutcome, DetectionReport, FileFrameSource, FrameSource, ImageSink,
    ProfileStore, Result,
};

struct Args {
    profile: String,
    image: PathBuf,
    config: PathBuf,
    out: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let argv: Vec<String> = std::env::args().collect();

    let mut profile = None;
    let mut image = None;
    let mut config = PathBuf::from("config.yaml");
    let mut out = None;

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--image" => {
                i += 1;
                image = Some(PathBuf::from(argv.get(i)?));
            }
            "--config" => {
                i += 1;
                config = PathBuf::from(argv.get(i)?);
            }
            "--out" => {
                i += 1;
                out = Some(PathBuf::from(argv.get(i)?));
            }
            "--help" | "-h" => {
                print_help(&argv[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") && profile.is_none() => {
                profile = Some(arg.to_string());
            }
            arg => {
                eprintln!("Unknown argument: {arg}");
                return None;
            }
        }
        i += 1;
    }

    Some(Args {
        profile: profile?,
        image: image?,
        config,
        out,
    })
}

fn print_help(prog: &str) {
    eprintln!("Usage: {prog} <profile-name> --image <frame.png> [--config <config.yaml>] [--out <dir>]");
    eprintln!();
    eprintln!("Runs one color detection and prints a JSON report.");
}

fn run(args: &Args) -> Result<DetectionReport> {
    let store = ProfileStore::load(&args.config)?;
    let frame = FileFrameSource::new(&args.image).grab()?;

    let report = match detect(&frame, &args.profile, &store)? {
        DetectionOutcome::Found {
            measurement,
            annotated,
        } => {
            let root = args
                .out
                .clone()
                .unwrap_or_else(|| store.snapshot().output_root.clone());
            let profile = store.resolve(&args.profile)?;
            let path = ImageSink::new(root).save(&annotated, &profile)?;
            DetectionReport::found(&args.profile, measurement.center, &path)
        }
        DetectionOutcome::NotFound => DetectionReport::not_found(&args.profile),
    };
    Ok(report)
}

fn main() {
    env_logger::init();

    let Some(args) = parse_args() else {
        print_help("detect");
        process::exit(2);
    };

    let report = match run(&args) {
        Ok(report) => report,
        Err(err) => {
            let report = DetectionReport::failure(err.to_string());
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            process::exit(1);
        }
    }
}
