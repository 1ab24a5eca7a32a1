use std::fs;
use std::io::{Seek, Write};
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "upload_notice_lambda";
const LAMBDA_BINARY: &str = "upload_notice";
const DIST_DIR: &str = "dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the upload notice workspace",
    long_about = "A unified CLI for CI checks, Lambda packaging, and sample\n\
                  S3 notification events in the upload notice workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::All)]
        job: CiJob,
    },
    /// Build the handler binary and package it as a Lambda zip
    Package {
        /// Compilation target triple for the Lambda binary
        #[arg(long, env = "LAMBDA_TARGET", default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
    /// Write an S3 ObjectCreated:Put notification for local invocation
    SampleEvent {
        /// Object key carried by the first record
        #[arg(long)]
        key: String,
        /// Bucket name carried by the first record
        #[arg(long, default_value = "upload-notice-sample")]
        bucket: String,
        /// Output file path; prints to stdout when omitted
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Check,
    /// Unit and integration tests
    Test,
    /// Run check + test
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_lambda(target: &str, profile: BuildProfile) {
    require_lambda_target(target);

    step("Build upload_notice binary");

    let mut cargo_args = vec![
        "build",
        "-p",
        LAMBDA_PACKAGE,
        "--target",
        target,
        "--bin",
        LAMBDA_BINARY,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Write bootstrap zip");
    let binary_path = Path::new("target")
        .join(target)
        .join(profile.dir_name())
        .join(binary_name(LAMBDA_BINARY, target));
    let binary = fs::read(&binary_path).unwrap_or_else(|error| {
        panic!(
            "upload_notice binary missing at '{}' after build: {error}",
            binary_path.display()
        )
    });

    fs::create_dir_all(DIST_DIR).expect("failed to create dist directory");
    let zip_path = Path::new(DIST_DIR).join(format!("{LAMBDA_BINARY}.zip"));
    let file = fs::File::create(&zip_path).expect("failed to create upload_notice zip");
    write_bootstrap_zip(file, &binary);

    eprintln!("\nLambda artifact:\n- {}", zip_path.display());
}

/// Panics when the cross-compilation target is not installed. Only warns when
/// `rustup` itself cannot be run.
fn require_lambda_target(target: &str) {
    let listing = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output.stdout,
        Ok(output) => panic!(
            "`rustup target list --installed` exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(error) => {
            eprintln!("warning: skipping target check, rustup unavailable ({error})");
            return;
        }
    };

    if !target_is_installed(&String::from_utf8_lossy(&listing), target) {
        panic!(
            "the upload_notice lambda is built for `{target}`, which is not installed; \
             run `rustup target add {target}` or pass another --target"
        );
    }
}

fn target_is_installed(rustup_listing: &str, target: &str) -> bool {
    rustup_listing.lines().any(|line| line.trim() == target)
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

/// Custom-runtime lambdas start the executable named `bootstrap` at the zip root.
fn write_bootstrap_zip<W: Write + Seek>(sink: W, binary: &[u8]) -> W {
    let mut zip = ZipWriter::new(sink);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to add bootstrap to zip");
    zip.write_all(binary).expect("failed to write bootstrap");
    zip.finish().expect("failed to finalize bootstrap zip")
}

fn sample_event(key: &str, bucket: &str) -> Value {
    json!({
        "Records": [
            {
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "1970-01-01T00:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "configurationId": "upload-notice",
                    "bucket": {
                        "name": bucket,
                        "arn": format!("arn:aws:s3:::{bucket}"),
                    },
                    "object": {
                        "key": key,
                        "size": 0,
                    }
                }
            }
        ]
    })
}

fn write_sample_event(key: &str, bucket: &str, output: Option<&str>) {
    let body = serde_json::to_string_pretty(&sample_event(key, bucket))
        .expect("sample event should serialize");

    match output {
        Some(path) => {
            fs::write(path, format!("{body}\n")).expect("failed to write sample event");
            eprintln!("Wrote sample event to {path}");
        }
        None => println!("{body}"),
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test upload_notice_core");
    run_cargo(&["test", "-p", "upload_notice_core"]);

    step("Test upload_notice_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Test => ci_test(),
                CiJob::All => {
                    ci_check();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::Package { target, profile } => {
            package_lambda(&target, profile);
        }
        Commands::SampleEvent {
            key,
            bucket,
            output,
        } => {
            write_sample_event(&key, &bucket, output.as_deref());
        }
    }
}
