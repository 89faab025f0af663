//! Wellspring CLI - Command-line interface for the Wellspring engine
//!
//! Commands:
//! - analyze: Build trend reports for one or all biometric domains
//! - plan: Generate a long-term transformation plan from a health snapshot
//! - days: Expand a plan into daily entries
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wellspring_engine::domains::{analyze_all_json, analyze_domain_json};
use wellspring_engine::planner::{
    BaselineDietSolver, BaselineExercisePlanner, HealthSnapshot, LongTermPlan, LongTermPlanner,
    PlanDuration, Season, UrgencyLevel,
};
use wellspring_engine::types::Domain;
use wellspring_engine::{EngineError, PlannerConfig, ENGINE_VERSION, PRODUCER_NAME};

/// Wellspring - On-device health trend analysis and transformation planning
#[derive(Parser)]
#[command(name = "wellspring")]
#[command(author = "Wellspring Health")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Analyze biometric trends and build transformation plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build trend reports from domain test and session records
    Analyze {
        /// Domain to analyze; omit to read an object keyed by domain name
        #[arg(short, long)]
        domain: Option<String>,

        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<String>,
    },

    /// Generate a long-term plan from a health snapshot
    Plan {
        /// Health snapshot file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Preset (three_months, six_months, one_year, two_years, five_years) or a day count
        #[arg(long, default_value = "six_months")]
        duration: String,

        /// Urgency level
        #[arg(long, default_value = "moderate")]
        urgency: String,

        /// Plan start (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<String>,

        /// Planner configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Expand a plan into daily entries
    Days {
        /// Plan file produced by `wellspring plan`
        #[arg(long)]
        plan: PathBuf,

        /// Health snapshot file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Season; defaults to the season of the plan start date
        #[arg(long)]
        season: Option<String>,

        /// Planner configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Planner configuration file to check
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (arrays are split into one item per line)
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WellspringCliError> {
    match cli.command {
        Commands::Analyze {
            domain,
            input,
            output,
            output_format,
            now,
        } => cmd_analyze(domain.as_deref(), &input, &output, output_format, now.as_deref()),

        Commands::Plan {
            input,
            output,
            duration,
            urgency,
            start,
            config,
            output_format,
        } => cmd_plan(
            &input,
            &output,
            &duration,
            &urgency,
            start.as_deref(),
            config.as_deref(),
            output_format,
        ),

        Commands::Days {
            plan,
            input,
            output,
            season,
            config,
            output_format,
        } => cmd_days(
            &plan,
            &input,
            &output,
            season.as_deref(),
            config.as_deref(),
            output_format,
        ),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_analyze(
    domain: Option<&str>,
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
    now: Option<&str>,
) -> Result<(), WellspringCliError> {
    let input_data = read_input(input)?;
    let now = parse_time(now, "--now")?;

    let reports = match domain {
        Some(name) => {
            let domain: Domain = name.parse()?;
            vec![analyze_domain_json(domain, &input_data, now)?]
        }
        None => analyze_all_json(&input_data, now)?,
    };

    write_output(output, &format_output(&reports, output_format)?)
}

fn cmd_plan(
    input: &Path,
    output: &Path,
    duration: &str,
    urgency: &str,
    start: Option<&str>,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), WellspringCliError> {
    let health = HealthSnapshot::from_json(&read_input(input)?)?;
    let duration: PlanDuration = duration.parse()?;
    let urgency: UrgencyLevel = urgency.parse()?;
    let start = parse_time(start, "--start")?;
    let planner = LongTermPlanner::new(load_config(config)?)?;

    let plan = planner.generate_plan(&health, duration, urgency, start);
    write_output(output, &format_output(std::slice::from_ref(&plan), output_format)?)
}

fn cmd_days(
    plan: &Path,
    input: &Path,
    output: &Path,
    season: Option<&str>,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), WellspringCliError> {
    let plan = LongTermPlan::from_json(&fs::read_to_string(plan)?)?;
    let health = HealthSnapshot::from_json(&read_input(input)?)?;
    let season = match season {
        Some(name) => name.parse::<Season>()?,
        None => Season::from_date(plan.start_date),
    };
    let planner = LongTermPlanner::new(load_config(config)?)?;

    let days = planner.generate_daily_plans(
        &plan,
        &health,
        season,
        &BaselineDietSolver,
        &BaselineExercisePlanner,
    );
    info!(days = days.len(), "daily plans expanded");

    write_output(output, &format_output(&days, output_format)?)
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), WellspringCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Wellspring engine version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "domains".to_string(),
        status: CheckStatus::Ok,
        message: format!(
            "{} domain analyzers: {}",
            Domain::ALL.len(),
            Domain::ALL
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    });

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            }
        } else {
            match fs::read_to_string(config_path) {
                Ok(content) => match PlannerConfig::from_json(&content) {
                    Ok(parsed) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Config valid (target BMI {}, {}-{} phases)",
                            parsed.target_bmi, parsed.min_phases, parsed.max_phases
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid config: {}", e),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (pass input files with -i)"
    } else {
        "stdin is a pipe (-i - will read it)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wellspring Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(WellspringCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, WellspringCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, content: &str) -> Result<(), WellspringCliError> {
    if output.to_string_lossy() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
    } else {
        fs::write(output, content)?;
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig, WellspringCliError> {
    match path {
        Some(path) => Ok(PlannerConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(PlannerConfig::default()),
    }
}

fn parse_time(value: Option<&str>, flag: &str) -> Result<DateTime<Utc>, WellspringCliError> {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| WellspringCliError::InvalidArgument(format!("{flag}: {e}"))),
        None => Ok(Utc::now()),
    }
}

/// Single items are written bare; ndjson puts one item per line
fn format_output<T: Serialize>(
    items: &[T],
    format: OutputFormat,
) -> Result<String, WellspringCliError> {
    let single = match items {
        [item] => Some(item),
        _ => None,
    };

    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for item in items {
                lines.push(serde_json::to_string(item)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => match single {
            Some(item) => Ok(serde_json::to_string(item)? + "\n"),
            None => Ok(serde_json::to_string(items)? + "\n"),
        },
        OutputFormat::JsonPretty => match single {
            Some(item) => Ok(serde_json::to_string_pretty(item)? + "\n"),
            None => Ok(serde_json::to_string_pretty(items)? + "\n"),
        },
    }
}

// Error types

#[derive(Debug)]
enum WellspringCliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    InvalidArgument(String),
    DoctorFailed,
}

impl From<io::Error> for WellspringCliError {
    fn from(e: io::Error) -> Self {
        WellspringCliError::Io(e)
    }
}

impl From<EngineError> for WellspringCliError {
    fn from(e: EngineError) -> Self {
        WellspringCliError::Engine(e)
    }
}

impl From<serde_json::Error> for WellspringCliError {
    fn from(e: serde_json::Error) -> Self {
        WellspringCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellspringCliError> for CliError {
    fn from(e: WellspringCliError) -> Self {
        match e {
            WellspringCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellspringCliError::Engine(e) => {
                let (code, hint) = match &e {
                    EngineError::UnknownDomain(_) => (
                        "UNKNOWN_DOMAIN",
                        "Use one of: sleep, hearing, vision, tactile, tongue, cognitive, journal, medical",
                    ),
                    EngineError::InvalidDuration(_) => (
                        "INVALID_DURATION",
                        "Use a preset such as six_months or a positive day count",
                    ),
                    EngineError::InvalidConfig(_) => (
                        "INVALID_CONFIG",
                        "Run 'wellspring doctor --config <file>' for details",
                    ),
                    EngineError::JsonError(_) => {
                        ("JSON_ERROR", "Check JSON syntax and field names")
                    }
                    EngineError::ParseError(_) => ("PARSE_ERROR", "Check input format"),
                    EngineError::EncodingError(_) => ("ENCODING_ERROR", "Report this as a bug"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            WellspringCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WellspringCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: Some("Timestamps use RFC 3339, e.g. 2024-01-01T00:00:00Z".to_string()),
            },
            WellspringCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
