use clap::{Args, Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use record_etl::config::Settings;
use record_etl::{Delimiter, HookRegistry, Job, OutputConfig, SourceReader};
use std::path::{Path, PathBuf};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Record ETL: move flat records between CSV, JSON and XML files
#[derive(Parser)]
#[command(name = "retl", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source default settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// CSV or JSON file to read
    source: PathBuf,

    /// Source format (CSV or JSON); inferred from the extension when omitted
    #[arg(long)]
    from: Option<String>,

    /// CSV field separator, a single character or TAB
    #[arg(short, long)]
    delimiter: Option<Delimiter>,

    /// Comma-separated field names for a CSV source without a header line
    #[arg(long, value_delimiter = ',')]
    header: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source file into CSV, JSON or XML
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        /// File to write; replaced if it exists
        destination: PathBuf,

        /// Destination format (CSV, JSON or XML); inferred from the extension when omitted
        #[arg(long)]
        to: Option<String>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a source file and summarise its records
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Convert {
            source,
            destination,
            to,
            json,
        } => {
            let delimiter = settings.delimiter_for(source.delimiter, &source.source);
            let reader = source_reader(&settings, &source, delimiter)?;
            let target = settings.target_format_for(to.as_deref(), &destination)?;

            log::info!(
                "Converting {} to {} ({})",
                source.source.display().bright_black(),
                destination.display().bright_black(),
                target.cyan()
            );

            let output = OutputConfig::new(&destination, target).with_delimiter(delimiter);
            let report = Job::new(reader, output, HookRegistry::new())?.run()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.written() {
                log::info!(
                    "✓ Wrote {} record(s) to {}",
                    report.loaded,
                    destination.display()
                );
            } else {
                log::warn!("No records to write, {} left untouched", destination.display());
            }
        }
        Commands::Inspect { source } => {
            let delimiter = settings.delimiter_for(source.delimiter, &source.source);
            let records = source_reader(&settings, &source, delimiter)?.read()?;

            println!("{} record(s)", records.len().cyan());
            if let Some(first) = records.first() {
                let fields: Vec<&str> = first.keys().map(String::as_str).collect();
                println!("fields: {}", fields.join(", ").green());
            }
        }
    }

    Ok(())
}

fn source_reader(settings: &Settings, args: &SourceArgs, delimiter: Delimiter) -> Result<SourceReader> {
    let format = settings.source_format_for(args.from.as_deref(), &args.source)?;
    let mut reader = SourceReader::new(&args.source, format).with_delimiter(delimiter);
    if let Some(header) = &args.header {
        reader = reader.with_header(header.clone());
    }
    Ok(reader)
}
