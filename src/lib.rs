pub mod config;
pub mod history;
pub mod model;
pub mod search;
pub mod session;
pub mod storage;
pub mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use config::SearchConfig;
use history::SearchHistory;
use model::types::Corpus;
use session::{SearchSession, SessionHandle};
use storage::{BlobStore, FileStore, MemoryStore};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "fsearch",
    version,
    about = "Faceted search over a small record set, with recent-query history"
)]
pub struct Cli {
    /// Directory for persisted history (defaults to platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON file with the records to search (defaults to the built-in sample)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Simulated search latency in milliseconds (0 = immediate)
    #[arg(long, global = true)]
    pub latency_ms: Option<u64>,

    /// Keep history in memory only; nothing is read from or written to disk
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and print the results
    Search {
        /// Text matched case-insensitively against titles and contents
        query: String,

        /// Category to restrict results to (`all` for every category)
        #[arg(long, default_value = model::types::ALL_FACET)]
        facet: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List available facets
    Facets {
        #[arg(long)]
        json: bool,
    },
    /// Show or clear recent searches
    History {
        /// Erase all recent searches
        #[arg(long)]
        clear: bool,

        #[arg(long)]
        json: bool,
    },
    /// Interactive search prompt on stdin/stdout
    Shell,
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

pub async fn run_with(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fsearch", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            return Ok(());
        }
        _ => {}
    }

    let config = SearchConfig::from_env().with_overrides(
        cli.data_dir,
        cli.latency_ms,
        cli.corpus,
        cli.ephemeral,
    );
    tracing::debug!(?config, "configuration resolved");
    let corpus = Arc::new(load_corpus(&config)?);
    let store = open_store(&config)?;

    match cli.command {
        Commands::Search { query, facet, json } => {
            let facet = corpus.parse_facet(&facet)?;
            let handle = open_session(corpus, store, &config);
            handle.on_facet_change(facet);
            handle.on_text_change(query);
            handle.on_submit().settled().await;
            let body = handle.read(|s| {
                if json {
                    serde_json::to_string_pretty(&ui::render::results_json(
                        s.corpus(),
                        &s.query().text,
                        &s.query().facet,
                        s.results(),
                    ))
                    .map(|mut body| {
                        body.push('\n');
                        body
                    })
                    .map_err(anyhow::Error::from)
                } else {
                    Ok(ui::render::format_session(s))
                }
            })?;
            print!("{body}");
        }
        Commands::Facets { json } => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ui::render::facets_json(&corpus))?
                );
            } else {
                print!(
                    "{}",
                    ui::render::format_facets(&corpus, &model::types::Facet::All)
                );
            }
        }
        Commands::History { clear, json } => {
            let mut history = SearchHistory::load(store);
            if clear {
                history.clear();
            }
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ui::render::history_json(history.entries()))?
                );
            } else {
                print!("{}", ui::render::format_history(history.entries()));
            }
        }
        Commands::Shell => {
            let handle = open_session(corpus, store, &config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            ui::shell::run_shell(&handle, stdin, &mut stdout).await?;
        }
        Commands::Completions { .. } | Commands::Man => {}
    }
    Ok(())
}

fn load_corpus(config: &SearchConfig) -> Result<Corpus> {
    match &config.corpus_path {
        Some(path) => Corpus::from_json_file(path)
            .with_context(|| format!("loading corpus from {}", path.display())),
        None => Corpus::sample().context("building the built-in corpus"),
    }
}

fn open_store(config: &SearchConfig) -> Result<Arc<dyn BlobStore>> {
    if config.ephemeral {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    Ok(Arc::new(store))
}

fn open_session(
    corpus: Arc<Corpus>,
    store: Arc<dyn BlobStore>,
    config: &SearchConfig,
) -> SessionHandle {
    let session = SearchSession::new(corpus, SearchHistory::load(store));
    SessionHandle::new(session, config.latency)
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "facet-search", "facet-search")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".facet-search"))
}
