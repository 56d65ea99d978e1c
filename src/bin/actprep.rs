//! actprep - command-line interface for the activity preprocessor
//!
//! Commands:
//! - process: Run the pipeline over an activity and write the encoded payload
//! - validate: Check records against the input schema
//! - config: Print the effective configuration

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{debug, info, warn, LevelFilter};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use activity_preprocessor::schema::{RawActivity, RawRecord, RecordAdapter};
use activity_preprocessor::{
    Activity, ActivityEncoder, PreprocessError, Preprocessor, PreprocessorConfig, SmoothingMode,
    Sport, Stages, PREPROCESSOR_VERSION,
};

/// actprep - Preprocess GPS/sensor activity records
#[derive(Parser)]
#[command(name = "actprep")]
#[command(version = PREPROCESSOR_VERSION)]
#[command(about = "Fill distance, speed, grade and pace in activity records", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over an activity
    Process {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,

        #[command(flatten)]
        settings: Settings,

        /// Sport, overriding the one in the input
        #[arg(long)]
        sport: Option<String>,

        /// Stages to skip (repeatable)
        #[arg(long, value_enum)]
        skip: Vec<StageName>,
    },

    /// Validate records against the input schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        settings: Settings,
    },
}

/// Configuration sources shared by `process` and `config`
#[derive(clap::Args)]
struct Settings {
    /// Load configuration from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Elevation smoothing window (meters)
    #[arg(long)]
    smoothing_distance: Option<f64>,

    /// Grade look-ahead window (meters)
    #[arg(long)]
    grade_distance: Option<f64>,

    /// Elevation smoothing mode
    #[arg(long)]
    smoothing_mode: Option<SmoothingModeArg>,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Activity document or JSON array of records
    Json,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON payload
    Json,
    /// Pretty-printed JSON payload
    JsonPretty,
    /// Processed records only, one per line
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum SmoothingModeArg {
    /// Average the unsmoothed altitudes
    Original,
    /// Average the already smoothed altitudes
    Progressive,
}

#[derive(Clone, Copy, ValueEnum)]
enum StageName {
    Aggregate,
    Distance,
    Elevation,
    Grade,
    Pace,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(verbose: u8) {
    let mut builder = Builder::from_default_env();

    if std::env::var_os("RUST_LOG").is_none() {
        let level = match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter_level(level);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {} {}] {}",
            buf.timestamp(),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder.init();
}

fn run(cli: Cli) -> Result<(), ActprepCliError> {
    match cli.command {
        Commands::Process {
            input,
            output,
            input_format,
            output_format,
            settings,
            sport,
            skip,
        } => cmd_process(
            &input,
            &output,
            input_format,
            output_format,
            &settings,
            sport.as_deref(),
            &skip,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Config { settings } => cmd_config(&settings),
    }
}

fn cmd_process(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    settings: &Settings,
    sport: Option<&str>,
    skip: &[StageName],
) -> Result<(), ActprepCliError> {
    let config = load_config(settings)?;
    let input_data = read_input(input)?;

    let mut activity = match input_format {
        InputFormat::Json if is_record_array(&input_data) => {
            Activity::new(Sport::default(), RecordAdapter::parse_array(&input_data)?)
        }
        InputFormat::Json => RecordAdapter::parse_activity(&input_data)?,
        InputFormat::Ndjson => {
            Activity::new(Sport::default(), RecordAdapter::parse_ndjson(&input_data)?)
        }
    };

    if let Some(name) = sport {
        activity.sport = Sport::from_name(name);
    }

    if activity.records.is_empty() {
        return Err(ActprepCliError::NoRecords);
    }

    let stages = stages_without(skip);
    info!(
        "processing {} {} records",
        activity.records.len(),
        activity.sport.as_str()
    );
    debug!("{:?}", &stages);

    Preprocessor::with_config(config).process_with(&mut activity, &stages);

    let encoder = ActivityEncoder::new();
    let output_data = match output_format {
        OutputFormat::Json => encoder.encode_to_json(&activity)? + "\n",
        OutputFormat::JsonPretty => encoder.encode_to_json_pretty(&activity)? + "\n",
        OutputFormat::Ndjson => encoder.encode_to_ndjson(&activity)?,
    };

    if output.to_string_lossy() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(output_data.as_bytes())?;
        stdout.flush()?;
    } else {
        fs::write(output, output_data)?;
        info!("wrote {}", output.display());
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), ActprepCliError> {
    let input_data = read_input(input)?;

    let records: Vec<RawRecord> = match input_format {
        InputFormat::Json if is_record_array(&input_data) => {
            RecordAdapter::parse_raw_array(&input_data)?
        }
        InputFormat::Json => serde_json::from_str::<RawActivity>(&input_data)?.records,
        InputFormat::Ndjson => RecordAdapter::parse_raw_ndjson(&input_data)?,
    };

    let results = RecordAdapter::validate_records(&records);

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - results.len(),
        invalid_records: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Record {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(ActprepCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_config(settings: &Settings) -> Result<(), ActprepCliError> {
    let config = load_config(settings)?;
    println!("{}", config.to_json()?);
    Ok(())
}

// Helper functions

/// Configuration file first, then command-line overrides
fn load_config(settings: &Settings) -> Result<PreprocessorConfig, ActprepCliError> {
    let mut config = match &settings.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            PreprocessorConfig::from_json(&fs::read_to_string(path)?)?
        }
        None => PreprocessorConfig::default(),
    };

    if let Some(meters) = settings.smoothing_distance {
        if !(meters.is_finite() && meters > 0.0) {
            return Err(ActprepCliError::InvalidArgument(format!(
                "--smoothing-distance must be a positive number, got {meters}"
            )));
        }
        config = config.with_smoothing_distance(meters);
    }
    if let Some(meters) = settings.grade_distance {
        if !(meters.is_finite() && meters > 0.0) {
            return Err(ActprepCliError::InvalidArgument(format!(
                "--grade-distance must be a positive number, got {meters}"
            )));
        }
        config = config.with_grade_distance(meters);
    }
    if let Some(mode) = &settings.smoothing_mode {
        config = config.with_smoothing_mode(match mode {
            SmoothingModeArg::Original => SmoothingMode::Original,
            SmoothingModeArg::Progressive => SmoothingMode::Progressive,
        });
    }

    Ok(config)
}

fn read_input(input: &Path) -> Result<String, ActprepCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            warn!("reading records from an interactive terminal, end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn is_record_array(input: &str) -> bool {
    input.trim_start().starts_with('[')
}

fn stages_without(skip: &[StageName]) -> Stages {
    let mut stages = Stages::all();
    for stage in skip {
        match stage {
            StageName::Aggregate => stages.aggregate = false,
            StageName::Distance => stages.distance = false,
            StageName::Elevation => stages.elevation = false,
            StageName::Grade => stages.grade = false,
            StageName::Pace => stages.pace = false,
        }
    }
    stages
}

// Error types

#[derive(Debug)]
enum ActprepCliError {
    Io(io::Error),
    Preprocess(PreprocessError),
    Json(serde_json::Error),
    InvalidArgument(String),
    NoRecords,
    ValidationFailed(usize),
}

impl From<io::Error> for ActprepCliError {
    fn from(e: io::Error) -> Self {
        ActprepCliError::Io(e)
    }
}

impl From<PreprocessError> for ActprepCliError {
    fn from(e: PreprocessError) -> Self {
        ActprepCliError::Preprocess(e)
    }
}

impl From<serde_json::Error> for ActprepCliError {
    fn from(e: serde_json::Error) -> Self {
        ActprepCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ActprepCliError> for CliError {
    fn from(e: ActprepCliError) -> Self {
        match e {
            ActprepCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ActprepCliError::Preprocess(PreprocessError::Config(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'actprep config' to see the expected layout".to_string()),
            },
            ActprepCliError::Preprocess(e @ PreprocessError::EncodingError(_)) => CliError {
                code: "ENCODING_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            ActprepCliError::Preprocess(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'actprep validate' for details".to_string()),
            },
            ActprepCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ActprepCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: Some("See 'actprep --help'".to_string()),
            },
            ActprepCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            ActprepCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}
