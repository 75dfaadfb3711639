use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use schemaform::{
    DocumentFormat, FormEngine, FormOptions, OutputDestination, OutputOptions, SimulatedEndpoint,
    SubmissionReport, emit, io::record_document_from_value, parse_document_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "schemaform",
    version,
    about = "Validate and submit signup records"
)]
struct Cli {
    /// Record spec: file path, inline payload, or "-" for stdin. Omit to use the defaults
    #[arg(short = 'r', long = "record", alias = "data", value_name = "SPEC")]
    record: Option<String>,

    /// Form options spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'c', long = "options", value_name = "SPEC")]
    options: Option<String>,

    /// Only run validation; nothing is submitted
    #[arg(long = "validate-only")]
    validate_only: bool,

    /// Make the simulated endpoint reject the submission with MESSAGE
    #[arg(long = "fail-with", value_name = "MESSAGE", conflicts_with = "validate_only")]
    fail_with: Option<String>,

    /// Simulated endpoint latency in milliseconds
    #[arg(long = "latency-ms", value_name = "MS", default_value_t = 0)]
    latency_ms: u64,

    /// Report destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let mut diagnostics = DiagnosticCollector::default();

    let record_spec = cli.record.as_deref();
    let options_spec = cli.options.as_deref();
    let both_stdin = record_spec == Some("-") && options_spec == Some("-");
    if both_stdin {
        diagnostics.push_input(
            "record/options",
            "cannot read record and options from stdin simultaneously; provide inline content or files",
        );
    }

    let record_hint = resolve_format_hint(record_spec, "record", &mut diagnostics);
    let options_hint = resolve_format_hint(options_spec, "options", &mut diagnostics);

    let record_value = load_optional_value(
        record_spec,
        record_hint.format,
        "record",
        record_hint.blocked || both_stdin,
        &mut diagnostics,
    );
    let options_value = load_optional_value(
        options_spec,
        options_hint.format,
        "options",
        options_hint.blocked || both_stdin,
        &mut diagnostics,
    );

    let (output, output_paths) =
        build_output_options(&cli, record_hint.extension_value(), &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);

    diagnostics.into_result()?;

    let options = match options_value {
        Some(value) => serde_json::from_value::<FormOptions>(value)
            .wrap_err("options document is not a valid form configuration")?,
        None => FormOptions::default(),
    };
    let mut engine = FormEngine::with_options(options);

    if let Some(value) = record_value {
        let document = record_document_from_value(&value).map_err(|err| eyre!("{err:#}"))?;
        engine
            .load_document(document)
            .wrap_err("record document holds a value the form cannot accept")?;
    }

    let report = if cli.validate_only {
        let outcome = engine.validate()?;
        SubmissionReport::validated(&engine, outcome)
    } else {
        let mut endpoint =
            SimulatedEndpoint::new().with_latency(Duration::from_millis(cli.latency_ms));
        if let Some(message) = cli.fail_with.as_ref() {
            endpoint = endpoint.failing_with(message.clone());
        }
        let result = engine.submit(&endpoint).await;
        SubmissionReport::submitted(&engine, result)
    };

    emit(&report, &output).map_err(|err| eyre!("{err:#}"))?;

    if report.is_success() {
        info!(outcome = ?report.outcome, "done");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(outcome = ?report.outcome, issues = report.errors.len(), "form not accepted");
        Ok(ExitCode::FAILURE)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[derive(Debug, Clone, Copy, Default)]
struct FormatHint {
    format: DocumentFormat,
    from_extension: bool,
    blocked: bool,
}

impl FormatHint {
    fn extension_value(&self) -> Option<DocumentFormat> {
        self.from_extension.then_some(self.format)
    }
}

fn resolve_format_hint(
    spec: Option<&str>,
    label: &str,
    diagnostics: &mut DiagnosticCollector,
) -> FormatHint {
    let Some(path) = spec.filter(|spec| *spec != "-") else {
        return FormatHint::default();
    };
    match probe_format_from_extension(Path::new(path)) {
        ExtensionFormat::Known(format) => FormatHint {
            format,
            from_extension: true,
            blocked: false,
        },
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => {
            diagnostics.push_input(
                label,
                format!(
                    "{label} '{path}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
                ),
            );
            FormatHint {
                blocked: true,
                ..FormatHint::default()
            }
        }
        ExtensionFormat::Unknown => FormatHint::default(),
    }
}

fn load_optional_value(
    spec: Option<&str>,
    format: DocumentFormat,
    label: &str,
    skip: bool,
    diagnostics: &mut DiagnosticCollector,
) -> Option<Value> {
    if skip {
        return None;
    }
    let raw = spec?;
    match load_value(raw, format, label) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_input(label, err.to_string());
            None
        }
    }
}

fn load_value(spec: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, label);
    }

    let path = PathBuf::from(spec);
    // Anything that is not an existing path is treated as an inline payload.
    if !path.exists() {
        let inline_label = format!("inline {label}");
        return parse_contents(spec, format, &inline_label);
    }
    let contents = read_from_source(&InputSource::File(path.clone()))
        .wrap_err_with(|| format!("failed to load {label} from {}", path.display()))?;
    parse_contents(&contents, format, label)
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

/// Parses with the hinted format first, then every other compiled-in format.
fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

/// Reports go to stdout unless `-o` names destinations. File destinations
/// decide the format; stdout follows the record's extension.
fn build_output_options(
    cli: &Cli,
    record_hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> (OutputOptions, Vec<PathBuf>) {
    let mut destinations = Vec::new();

    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let format = if file_paths.is_empty() {
        record_hint.unwrap_or_default()
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };

    (
        OutputOptions::new(format)
            .with_pretty(!cli.no_pretty)
            .with_destinations(destinations),
        file_paths,
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match probe_format_from_extension(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    if let Some(format) = DocumentFormat::from_path(path) {
        return ExtensionFormat::Known(format);
    }
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    match ext.to_string_lossy().to_ascii_lowercase().as_str() {
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}
