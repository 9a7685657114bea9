//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::trip::{MAX_DAYS, MAX_NIGHTS};

/// TravelGuide - custom itineraries for your next journey
#[derive(Parser)]
#[command(
    name = "tg",
    about = "Custom travel itineraries generated by Gemini",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to the interactive form)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the trip form interactively
    Form {
        /// Directory saved itineraries are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate one itinerary and exit
    Plan {
        /// Where you are going, e.g. "Paris, France"
        #[arg(short, long)]
        destination: String,

        /// Number of days
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i64).range(1..=MAX_DAYS))]
        days: i64,

        /// Number of nights
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(i64).range(0..=MAX_NIGHTS))]
        nights: i64,

        /// Interests, e.g. "museums, food, nightlife"
        #[arg(short, long)]
        interests: Option<String>,

        /// Save the itinerary as a text file
        #[arg(short, long)]
        save: bool,

        /// Directory to save into (implies --save)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the prompt instead of calling the API
        #[arg(long)]
        dry_run: bool,
    },

    /// List models that support text generation
    Models,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_form() {
        let cli = Cli::try_parse_from(["tg"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_plan_defaults() {
        let cli = Cli::try_parse_from(["tg", "plan", "-d", "Tokyo"]).unwrap();
        match cli.command {
            Some(Command::Plan {
                destination,
                days,
                nights,
                interests,
                save,
                output_dir,
                dry_run,
            }) => {
                assert_eq!(destination, "Tokyo");
                assert_eq!(days, 3);
                assert_eq!(nights, 2);
                assert!(interests.is_none());
                assert!(!save);
                assert!(output_dir.is_none());
                assert!(!dry_run);
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_rejects_out_of_range_counts() {
        assert!(Cli::try_parse_from(["tg", "plan", "-d", "Tokyo", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["tg", "plan", "-d", "Tokyo", "--days", "31"]).is_err());
        assert!(Cli::try_parse_from(["tg", "plan", "-d", "Tokyo", "--nights", "30"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["tg", "models", "--log-level", "debug", "-c", "x.yml"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
        assert!(matches!(cli.command, Some(Command::Models)));
    }
}
