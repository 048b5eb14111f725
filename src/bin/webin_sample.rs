use std::fs;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use webin_sample_client::config::{ConfigLoader, ConfigOverrides};
use webin_sample_client::domain::SampleId;
use webin_sample_client::error::WebinError;
use webin_sample_client::output::{JsonOutput, OutputMode, TextOutput};
use webin_sample_client::reference::Sample;
use webin_sample_client::sample_xml::{SampleXmlClient, SampleXmlHttpClient, parse_sample};

#[derive(Parser)]
#[command(name = "webin-sample")]
#[command(about = "Fetch and inspect ENA sample records from the Webin REST service")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true, help = "Use the Webin test service")]
    test: bool,

    #[arg(long, global = true, help = "Print machine-readable JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Sample records")]
    Sample(SampleArgs),
}

#[derive(Args)]
struct SampleArgs {
    #[command(subcommand)]
    command: SampleCommand,
}

#[derive(Subcommand)]
enum SampleCommand {
    #[command(about = "Fetch a sample by accession or alias")]
    Fetch(FetchArgs),
    #[command(about = "Parse a local sample XML file")]
    Parse(ParseArgs),
}

#[derive(Args)]
struct FetchArgs {
    id: String,
}

#[derive(Args)]
struct ParseArgs {
    file: String,

    #[arg(long, help = "Sample id reported in errors (defaults to the file name)")]
    id: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(webin) = report.downcast_ref::<WebinError>() {
            return ExitCode::from(map_exit_code(webin));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &WebinError) -> u8 {
    match error {
        WebinError::InvalidSampleId(_)
        | WebinError::MissingConfig(_)
        | WebinError::ConfigRead(_)
        | WebinError::ConfigParse(_)
        | WebinError::InvalidBaseUri(_)
        | WebinError::MissingCredentials => 2,
        WebinError::SampleServiceValidation { .. } | WebinError::WebinHttp(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    match cli.command {
        Commands::Sample(args) => match args.command {
            SampleCommand::Fetch(args) => {
                let resolved = ConfigLoader::resolve(
                    cli.config.as_deref(),
                    ConfigOverrides::from_env(cli.test),
                )?;
                let id: SampleId = args.id.parse()?;
                let client = SampleXmlHttpClient::new(&resolved)?;
                let sample = client.get_sample(&id)?;
                print_sample(&sample, output_mode)
            }
            SampleCommand::Parse(args) => {
                let xml = fs::read_to_string(&args.file).map_err(|err| WebinError::Io {
                    path: args.file.clone().into(),
                    message: err.to_string(),
                })?;
                let id = args.id.unwrap_or_else(|| args.file.clone());
                let sample = parse_sample(&id, &xml)?;
                print_sample(&sample, output_mode)
            }
        },
    }
}

fn print_sample(sample: &Sample, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::Json => JsonOutput::print_sample(sample).into_diagnostic(),
        OutputMode::Text => TextOutput::print_sample(sample).into_diagnostic(),
    }
}
