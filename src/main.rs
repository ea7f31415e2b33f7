use clap::{Parser, ValueEnum};
use letterdrill::{
    config::{Config, ConfigStore, FileConfigStore},
    language::WordCorpus,
    server, Trainer,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// adaptive typing-practice backend
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Serves practice words to a typing front-end and steers each batch toward the letters you miss or rarely practice."
)]
pub struct Cli {
    /// newline-delimited word list to practice from
    #[clap(short = 'd', long)]
    dictionary: Option<PathBuf>,

    /// address to bind
    #[clap(long)]
    host: Option<String>,

    /// port to bind
    #[clap(short = 'p', long)]
    port: Option<u16>,

    /// JSON config file (defaults to the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// serve uniformly random words instead of adaptive batches
    #[clap(long)]
    random_words: bool,

    /// write the effective configuration back to the config file
    #[clap(long)]
    save_config: bool,

    /// log verbosity, ignored when RUST_LOG is set
    #[clap(short = 'l', long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// CLI flags win over the config file
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(ref dictionary) = self.dictionary {
            cfg.dictionary_path = dictionary.clone();
        }
        if let Some(ref host) = self.host {
            cfg.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if self.random_words {
            cfg.random_words = true;
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "letterdrill={level},tower_http={level}",
            level = cli.log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let store = match cli.config {
        Some(ref path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = cli.apply_to(store.load()?);
    if cli.save_config {
        store.save(&config)?;
        info!("Saved config to {}", store.path().display());
    }

    // The word list must be readable before anything is served
    let corpus = WordCorpus::load(&config.dictionary_path)?;
    let trainer = Trainer::from_config(corpus, &config);

    info!("letterdrill v{} starting", env!("CARGO_PKG_VERSION"));
    server::run(trainer, &config.bind_addr()).await
}
