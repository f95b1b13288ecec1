use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use docmatch_core::config_file;
use docmatch_core::{
    MetadataRecord, NormalizerConfig, PayloadConfig, RecordSource, build_payload, extract_doi,
    normalize_author_list,
};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Normalize bibliographic metadata for record matching
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize author lists to "Surname, I; Surname, I"
    Normalize {
        /// One author list per argument
        #[arg(required = true)]
        authors: Vec<String>,

        /// Also print the collaboration, candidate scores and verdict
        #[arg(long)]
        explain: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Author lists longer than this many bytes are left as they are
        #[arg(long)]
        max_input_len: Option<usize>,
    },

    /// Extract DOIs from comment lines
    Doi {
        /// DOI already known for the record
        #[arg(long)]
        existing: Option<String>,

        /// Comment lines, in order
        comments: Vec<String>,
    },

    /// Build the matching payload for a metadata record
    Payload {
        /// Path to a JSON metadata record, or - for stdin
        record: PathBuf,

        /// Which side of the match the record is on
        #[arg(long, value_enum, default_value_t = SourceArg::Eprint)]
        source: SourceArg,

        /// Author lists longer than this many bytes are left as they are
        #[arg(long)]
        max_input_len: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SourceArg {
    Eprint,
    Article,
}

impl From<SourceArg> for RecordSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Eprint => RecordSource::Eprint,
            SourceArg::Article => RecordSource::Article,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Normalize {
            authors,
            explain,
            no_color,
            max_input_len,
        } => {
            let config = resolve_config(max_input_len);
            normalize(&authors, explain, ColorMode(!no_color), &config.normalizer)
        }
        Command::Doi { existing, comments } => doi(&comments, existing.as_deref()),
        Command::Payload {
            record,
            source,
            max_input_len,
        } => {
            let config = resolve_config(max_input_len);
            payload(&record, source.into(), &config)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the verbosity flag.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(max_input_len: Option<usize>) -> PayloadConfig {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = config_file::load_config().apply(PayloadConfig::default());
    let env_len = std::env::var("DOCMATCH_MAX_INPUT_LEN")
        .ok()
        .and_then(|v| v.parse().ok());

    let config = match max_input_len.or(env_len) {
        Some(len) => PayloadConfig {
            normalizer: NormalizerConfig::new().max_input_len(len),
            ..config
        },
        None => config,
    };
    tracing::debug!(
        max_input_len = config.normalizer.input_limit(),
        categories = ?config.must_match_categories,
        "resolved configuration"
    );
    config
}

fn normalize(
    authors: &[String],
    explain: bool,
    color: ColorMode,
    config: &NormalizerConfig,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for raw in authors {
        let result = normalize_author_list(raw, config);
        if explain {
            output::print_explanation(&mut stdout, &result, color)?;
        } else {
            writeln!(stdout, "{result}")?;
        }
    }
    Ok(())
}

fn doi(comments: &[String], existing: Option<&str>) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match extract_doi(comments, existing) {
        Some(dois) => {
            for doi in dois {
                writeln!(stdout, "{doi}")?;
            }
        }
        None => writeln!(stdout, "no DOI")?,
    }
    Ok(())
}

fn payload(path: &Path, source: RecordSource, config: &PayloadConfig) -> anyhow::Result<()> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let record: MetadataRecord =
        serde_json::from_str(&content).context("failed to parse metadata record")?;
    let payload = build_payload(&record, source, config)?;
    let json = serde_json::to_string_pretty(&payload)?;
    writeln!(std::io::stdout(), "{json}")?;
    Ok(())
}
