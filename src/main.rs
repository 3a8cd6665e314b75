use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use loader::LoadPolicy;
use tokenizer::Tokenizer;

mod aggregator;
mod analysis;
mod config;
mod debug_log;
mod error;
mod loader;
mod report;
mod tokenizer;
mod types;
mod utils;

#[derive(Parser)]
#[command(name = "smsstats")]
#[command(version)]
#[command(about = "Message length and word statistics for SMS backup exports")]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// SMS export to analyze (defaults to the configured file, then sms.xml)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output stats as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Skip malformed records instead of aborting the whole load
    #[arg(long)]
    skip_malformed: bool,

    /// Longest message length included in the histogram dumps
    #[arg(long)]
    max_length: Option<usize>,

    /// Number of word-frequency rows per report (0 = all)
    #[arg(long)]
    top_words: Option<usize>,

    /// Name used in report headings ("<name>'s sent messages")
    #[arg(long)]
    owner: Option<String>,

    /// Use comma-separated number formatting
    #[arg(long)]
    number_comma: bool,

    /// Locale for number formatting (en, de, fr, es, it, ja, ko, zh)
    #[arg(long)]
    locale: Option<String>,

    /// Number of decimal places for the average length
    #[arg(long)]
    decimal_places: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (default-file, skip-malformed, owner-name, max-histogram-length,
        /// top-words, stop-words, replace-builtin-stop-words, number-comma, locale, decimal-places)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    debug_log::init();
    let cli = Cli::parse();

    match cli.command {
        None => {
            if let Err(e) = run_report(cli) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config(config_args)) => {
            handle_config_subcommand(config_args);
        }
    }
}

fn run_report(cli: Cli) -> Result<()> {
    let mut config = config::Config::load()
        .context("Failed to load configuration")?
        .unwrap_or_default();

    // CLI flags override config values for this run
    if let Some(max_length) = cli.max_length {
        config.report.max_histogram_length = max_length;
    }
    if let Some(top_words) = cli.top_words {
        config.report.top_words = top_words;
    }
    if let Some(owner) = cli.owner {
        config.report.owner_name = owner;
    }
    if let Some(locale) = cli.locale {
        config.formatting.locale = locale;
    }
    if let Some(decimal_places) = cli.decimal_places {
        config.formatting.decimal_places = decimal_places;
    }
    config.formatting.number_comma |= cli.number_comma;
    config.input.skip_malformed |= cli.skip_malformed;

    let path = cli
        .file
        .unwrap_or_else(|| PathBuf::from(&config.input.default_file));
    let policy = if config.input.skip_malformed {
        LoadPolicy::SkipMalformed
    } else {
        LoadPolicy::Strict
    };

    let tokenizer = Tokenizer::new(config.stop_words());
    if tokenizer.stop_words().is_empty() {
        utils::warn_once("No stop words configured; every token will be counted");
    }
    debug_log::log(
        "TOKENIZER",
        "INIT",
        &format!("{} stop words", tokenizer.stop_words().len()),
    );

    let outcome = loader::load_file(&path, &tokenizer, policy)?;
    let summary = analysis::summarize(&outcome.messages, outcome.skipped.len())?;

    if cli.json {
        let json = simd_json::to_string_pretty(&summary)?;
        println!("{json}");
    } else {
        print!("{}", report::format_summary(&summary, &config.report_options()));
    }

    Ok(())
}

fn handle_config_subcommand(config_args: ConfigArgs) {
    match config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => {
            if let Err(e) = config::create_default_config(overwrite) {
                eprintln!("Error creating config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Show => {
            if let Err(e) = config::show_config() {
                eprintln!("Error showing config: {e}");
                std::process::exit(1);
            }
        }
        ConfigSubcommands::Set { key, value } => {
            if let Err(e) = config::set_config_value(&key, &value) {
                eprintln!("Error setting config: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "smsstats",
            "--file",
            "export.xml",
            "--skip-malformed",
            "--max-length",
            "160",
            "--owner",
            "Adam",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("export.xml")));
        assert!(cli.skip_malformed);
        assert_eq!(cli.max_length, Some(160));
        assert_eq!(cli.owner.as_deref(), Some("Adam"));
    }

    #[test]
    fn parses_config_set() {
        let args = ["smsstats", "config", "set", "owner-name", "Adam"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Config(ConfigArgs {
                subcommand: ConfigSubcommands::Set { key, value },
            })) => {
                assert_eq!(key, "owner-name");
                assert_eq!(value, "Adam");
            }
            _ => panic!("expected config set"),
        }
    }
}
