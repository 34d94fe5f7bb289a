pub mod commands;
pub mod config;
pub mod modules;
pub mod shared;

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::{render_snapshot, Console, Reply};
use config::AppConfig;
use modules::{
    cache::ResponseCache,
    content::{CatalogQueries, CatalogRepository, ContentSearchRepository, ContentStoreClient},
    search::SearchPipeline,
};
use shared::utils::init_logger;

pub fn run() {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_logger();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        eprintln!("Set CONTENT_STORE_URL and CONTENT_STORE_ANON_KEY (a .env file works too).");
        std::process::exit(1);
    });

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")
        .and_then(|runtime| runtime.block_on(serve(config)));

    if let Err(e) = result {
        eprintln!("marquee stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let client = Arc::new(
        ContentStoreClient::new(&config.store).context("failed to build the content store client")?,
    );
    let cache = Arc::new(ResponseCache::new(config.cache.clone()));

    // One client serves both the search overlay and the catalog rails
    let search_repo: Arc<dyn ContentSearchRepository> = client.clone();
    let catalog_repo: Arc<dyn CatalogRepository> = client;

    let pipeline = SearchPipeline::new(search_repo, config.search.clone());
    let catalog = CatalogQueries::new(catalog_repo, Arc::clone(&cache));

    let mut updates = pipeline.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if let Some(text) = render_snapshot(&snapshot) {
                println!("{}", text);
            }
        }
    });

    log_info!("marquee ready against {}", config.store.base_url);
    println!("type to search, :help for commands");

    let mut console = Console::new(pipeline, catalog);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match console.handle_line(&line).await {
            Reply::Print(text) => println!("{}", text),
            Reply::Silent => {}
            Reply::Quit => break,
        }
    }

    // Dropping the console drops the pipeline's last sender, ending the printer
    drop(console);
    printer.abort();
    cache.clear();
    log_info!("marquee shut down");
    Ok(())
}
