use clap::{Parser, Subcommand};
use std::sync::Arc;

use zetsu_site::application::messaging::InputParser;
use zetsu_site::application::services::{ChatRelay, SiteRepository, VisitorTracker};
use zetsu_site::application::shell::AppShell;
use zetsu_site::domain::traits::DocumentStore;
use zetsu_site::infrastructure::adapters::console::{ConsoleAdapter, ConsoleDeviceLocator, ConsoleInput};
use zetsu_site::infrastructure::config::Config;
use zetsu_site::infrastructure::database::FirebaseStore;
use zetsu_site::infrastructure::geo::GeoJsLocator;
use zetsu_site::infrastructure::llm::{GeminiProvider, LLM};
use zetsu_site::infrastructure::storage::MemorySessionStore;

#[derive(Parser)]
#[command(name = "zetsu-site")]
#[command(about = "Zetsu security suite showcase, downloads and back-office", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the site in the console
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Seed the product catalog if the store is empty
    Seed,
    /// List logged visitors, newest first
    Visitors {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("zetsu-site v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
        Commands::Run => {
            let config = load_config(&cli.config);
            block_on(run_site(config));
        }
        Commands::Seed => {
            let config = load_config(&cli.config);
            block_on(async move {
                let repository = SiteRepository::new(build_store(&config));
                let catalog = repository.load_catalog().await;
                println!("{} logiciels au catalogue", catalog.len());
                for software in catalog {
                    println!("  {} {}", software.id.as_deref().unwrap_or("-"), software.name);
                }
            });
        }
        Commands::Visitors { limit } => {
            let config = load_config(&cli.config);
            block_on(async move {
                let repository = SiteRepository::new(build_store(&config));
                for visitor in repository.get_visitors().await.into_iter().take(limit) {
                    println!(
                        "{}  {:<15} {:<3} {:<20} {:<4} {}",
                        visitor.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        visitor.ip,
                        visitor.country_code,
                        visitor.city,
                        visitor.location_method.map(|m| m.as_str()).unwrap_or("IP"),
                        visitor.isp
                    );
                }
            });
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn block_on<F: std::future::Future<Output = ()>>(future: F) {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_store(config: &Config) -> Arc<dyn DocumentStore> {
    Arc::new(FirebaseStore::new(&config.store.base_url).with_auth(config.store.auth_token.clone()))
}

async fn run_site(config: Config) {
    tracing::info!("Starting {} site, store at {}", config.site.name, config.store.base_url);

    let repository = SiteRepository::new(build_store(&config));
    let input = ConsoleInput::stdin();

    let tracker = VisitorTracker::new(
        repository.clone(),
        Arc::new(MemorySessionStore::new()),
        Arc::new(GeoJsLocator::new(&config.geo.ip_endpoint)),
        Arc::new(ConsoleDeviceLocator::new(input.clone())),
    )
    .with_session_key(&config.site.session_key)
    .with_device_timeout(config.device_timeout());

    let shell = AppShell::new(repository, Arc::new(tracker), &config.site.admin_passphrase)
        .with_consent_delay(config.consent_delay());

    let api_key = config.llm.api_key().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("No Gemini API key configured, the assistant will answer with an error");
    }
    let mut provider = GeminiProvider::new(api_key);
    if let Some(base_url) = &config.llm.base_url {
        provider = provider.with_base_url(base_url);
    }
    tracing::info!("Assistant provider: {} ({})", provider.name(), config.llm.model);
    let relay = ChatRelay::new(Arc::new(provider), config.llm.chat_options());

    let adapter = ConsoleAdapter::new(shell, relay, InputParser::new(&config.console.prefix), input);
    adapter.run().await;
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("{}", e),
    }
}
