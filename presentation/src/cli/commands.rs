//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for a discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every opinion followed by the consensus
    Full,
    /// Only the consensus summary
    Consensus,
    /// JSON output
    Json,
}

/// CLI arguments for panel-desk
#[derive(Parser, Debug)]
#[command(name = "panel-desk")]
#[command(author, version, about = "AI analyst panel discussions for financial news")]
#[command(long_about = r#"
panel-desk asks a panel of AI analysts (GPT-4, Claude, Gemini, Grok) to
discuss a news article and reach a consensus recommendation.

Finished discussions are cached per article for 24 hours. A cached
discussion is shown immediately; otherwise the backend generates one and
the analysts speak in turn.

Configuration files are loaded from (in priority order):
1. PANEL_DESK_* environment variables
2. --config <path>     Explicit config file
3. ./panel-desk.toml   Project-level config
4. ~/.config/panel-desk/config.toml   Global config

Example:
  panel-desk discuss 6f1c2a
  panel-desk discuss 6f1c2a --regenerate --language zh
  panel-desk cache list
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the panel discussion for an article, generating it if needed
    Discuss(DiscussArgs),

    /// Inspect or modify the local panel cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Args, Debug)]
pub struct DiscussArgs {
    /// Article identifier
    pub article_id: String,

    /// Discard any cached discussion and generate a new one
    #[arg(short, long)]
    pub regenerate: bool,

    /// Language of the discussion (overrides config)
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Reveal all opinions without pausing between speakers
    #[arg(long)]
    pub no_delay: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List every cached discussion
    List,

    /// Print a cached discussion without contacting the backend
    Show {
        article_id: String,

        /// Language of the cached discussion (overrides config)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,
    },

    /// Remove the cached discussion for an article
    Remove { article_id: String },

    /// Remove every cached discussion
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_discuss() {
        let cli = Cli::parse_from([
            "panel-desk",
            "-vv",
            "discuss",
            "a1",
            "--regenerate",
            "--language",
            "zh",
            "-o",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Discuss(args)) => {
                assert_eq!(args.article_id, "a1");
                assert!(args.regenerate);
                assert_eq!(args.language.as_deref(), Some("zh"));
                assert_eq!(args.output, Some(OutputFormat::Json));
                assert!(!args.no_delay);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_cache_commands() {
        let cli = Cli::parse_from(["panel-desk", "cache", "remove", "a1", "--quiet"]);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Some(Command::Cache {
                action: CacheCommand::Remove { ref article_id }
            }) if article_id == "a1"
        ));

        let cli = Cli::parse_from(["panel-desk", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
