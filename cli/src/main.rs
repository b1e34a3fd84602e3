//! CLI entrypoint for panel-desk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use panel_application::{
    DiscussionObserver, DiscussionView, KeyValueStore, LocaleProvider, NoDelay, PanelCacheStore,
    PanelDiscussionController, RevealDelay,
};
use panel_domain::{ArticleId, DiscussionPhase, Language};
use panel_infrastructure::{
    ConfigLoader, FileConfig, FileKeyValueStore, FixedLocale, HttpPanelGateway,
    MemoryKeyValueStore, SystemClock, TokioRevealDelay,
};
use panel_presentation::{
    CacheCommand, Cli, Command, ConsoleFormatter, DiscussArgs, OutputFormat, RevealReporter,
    SimpleReveal,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting panel-desk");

    let Some(command) = cli.command else {
        bail!("No command given. Run `panel-desk --help` for usage.");
    };

    match command {
        Command::Discuss(args) => run_discuss(&config, args, cli.quiet).await,
        Command::Cache { action } => {
            run_cache(&config, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize logging based on verbosity level, optionally into a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender =
                tracing_appender::rolling::never(directory.unwrap_or(Path::new(".")), file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Resolve the active language: command-line override, then config
fn active_language(config: &FileConfig, language: Option<&str>) -> Result<Language> {
    match language {
        Some(tag) => Language::new(tag).with_context(|| format!("Invalid language: {}", tag)),
        None => Ok(config.language()?),
    }
}

fn build_store(config: &FileConfig) -> Arc<dyn KeyValueStore> {
    if !config.cache.enabled {
        info!("Cache disabled; using in-memory store");
        return Arc::new(MemoryKeyValueStore::new());
    }

    match config
        .cache
        .directory
        .clone()
        .or_else(FileKeyValueStore::default_root)
    {
        Some(root) => {
            info!("Cache directory: {}", root.display());
            Arc::new(FileKeyValueStore::new(root))
        }
        None => {
            warn!("No cache directory available; using in-memory store");
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

fn build_cache(config: &FileConfig, locale: Arc<dyn LocaleProvider>) -> Arc<PanelCacheStore> {
    Arc::new(
        PanelCacheStore::new(build_store(config), Arc::new(SystemClock), locale)
            .with_params(config.cache_params()),
    )
}

fn output_format(config: &FileConfig, requested: Option<OutputFormat>) -> OutputFormat {
    requested
        .or_else(|| {
            config
                .output
                .format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or(OutputFormat::Full)
}

async fn run_discuss(config: &FileConfig, args: DiscussArgs, quiet: bool) -> Result<ExitCode> {
    let article_id = ArticleId::new(args.article_id.as_str())?;
    let language = active_language(config, args.language.as_deref())?;
    let format = output_format(config, args.output);

    // === Dependency Injection ===
    let locale: Arc<dyn LocaleProvider> = Arc::new(FixedLocale::new(language));
    let cache = build_cache(config, locale.clone());

    let mut gateway = HttpPanelGateway::new(&config.api.base_url, config.request_timeout())?;
    if let Some(token) = &config.api.auth_token {
        gateway = gateway.with_auth_token(token);
    }

    let delay: Arc<dyn RevealDelay> = if args.no_delay {
        Arc::new(NoDelay)
    } else {
        Arc::new(TokioRevealDelay::new(config.reveal_delay()))
    };

    let controller =
        PanelDiscussionController::new(article_id, Arc::new(gateway), cache, locale, delay);

    let phase = if args.regenerate {
        DiscussionPhase::Idle
    } else {
        controller.mount()
    };

    // Opinions are streamed during the reveal only for the full view
    let streamed = format == OutputFormat::Full && !quiet;
    if phase != DiscussionPhase::LoadedFromCache {
        if streamed {
            print!("{}", ConsoleFormatter::format_opening(Some(controller.article_id())));
        }
        let observer: Box<dyn DiscussionObserver> = if quiet || !std::io::stderr().is_terminal() {
            Box::new(SimpleReveal::new(streamed))
        } else {
            Box::new(RevealReporter::new(streamed))
        };

        if let Err(e) = controller.generate(args.regenerate, observer.as_ref()).await {
            warn!("Generation failed: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    }

    let view = controller.view();
    let output = match format {
        OutputFormat::Full if streamed && phase != DiscussionPhase::LoadedFromCache => {
            ConsoleFormatter::format_closing(&view)
        }
        OutputFormat::Full => ConsoleFormatter::format(&view),
        OutputFormat::Consensus => ConsoleFormatter::format_consensus(&view),
        OutputFormat::Json => ConsoleFormatter::format_json(&view),
    };
    println!("{}", output);

    Ok(ExitCode::SUCCESS)
}

fn run_cache(config: &FileConfig, action: CacheCommand) -> Result<()> {
    match action {
        CacheCommand::List => {
            let locale = Arc::new(FixedLocale::new(config.language()?));
            let cache = build_cache(config, locale);
            print!("{}", ConsoleFormatter::format_cache_list(&cache.list_panels()));
        }
        CacheCommand::Show {
            article_id,
            language,
        } => {
            let article_id = ArticleId::new(article_id)?;
            let language = active_language(config, language.as_deref())?;
            let cache = build_cache(config, Arc::new(FixedLocale::new(language)));
            match cache.get_panel(&article_id) {
                Some(panel) => {
                    let view = DiscussionView::from_cached(panel);
                    println!("{}", ConsoleFormatter::format(&view));
                }
                None => bail!("No cached discussion for {}", article_id),
            }
        }
        CacheCommand::Remove { article_id } => {
            let article_id = ArticleId::new(article_id)?;
            let cache = build_cache(config, Arc::new(FixedLocale::new(config.language()?)));
            cache.remove_panel(&article_id);
            println!("Removed cached discussion for {}", article_id);
        }
        CacheCommand::Clear => {
            let cache = build_cache(config, Arc::new(FixedLocale::new(config.language()?)));
            cache.clear_cache();
            println!("Cleared panel cache");
        }
    }
    Ok(())
}
