//! Console front end tests

mod utils;

use std::sync::Arc;
use std::time::Duration;

use marquee_lib::commands::{render_snapshot, Console, ConsoleCommand, Reply};
use marquee_lib::modules::cache::{CacheConfig, ResponseCache};
use marquee_lib::modules::content::domain::{CatalogRepository, ContentSearchRepository};
use marquee_lib::modules::content::CatalogQueries;
use marquee_lib::modules::search::{SearchConfig, SearchPipeline};
use utils::factories::{titled_results, ContentFactory};
use utils::fakes::{FakeCatalogRepository, ScriptedSearchRepository};

fn console() -> (Console, SearchPipeline, Arc<FakeCatalogRepository>) {
    let search: Arc<dyn ContentSearchRepository> = Arc::new(ScriptedSearchRepository::new(
        titled_results(&["Alien", "Aliens"]),
    ));
    let catalog_repo = Arc::new(FakeCatalogRepository::new(vec![ContentFactory::new()
        .title("Fresh")
        .new_release()
        .premium()
        .build_item()]));
    let catalog_dyn: Arc<dyn CatalogRepository> = catalog_repo.clone();

    let pipeline = SearchPipeline::new(search, SearchConfig::default());
    let catalog = CatalogQueries::new(
        catalog_dyn,
        Arc::new(ResponseCache::new(CacheConfig::default())),
    );
    (Console::new(pipeline.clone(), catalog), pipeline, catalog_repo)
}

fn printed(reply: Reply) -> String {
    match reply {
        Reply::Print(text) => text,
        other => panic!("expected printed output, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_typing_drives_the_search_overlay() {
    let (mut console, pipeline, _) = console();

    assert_eq!(console.handle_line("alien").await, Reply::Silent);
    tokio::time::sleep(Duration::from_millis(350)).await;

    let text = render_snapshot(&pipeline.snapshot()).expect("settled results render");
    assert!(text.contains("2 result(s)"));
    assert!(text.contains("1. Alien (movie)"));

    let opened = printed(console.handle_line(":open 2").await);
    assert_eq!(opened, "-> /watch/movie/c1");
    assert!(render_snapshot(&pipeline.snapshot()).is_none());
}

#[tokio::test]
async fn test_catalog_reads_are_cached_and_refreshable() {
    let (mut console, _, repo) = console();

    let first = printed(console.handle(ConsoleCommand::NewReleases).await);
    assert!(first.starts_with("[catalog:new_releases] fetched"));
    assert!(first.contains("Fresh (movie) [new] [premium]"));

    let second = printed(console.handle(ConsoleCommand::NewReleases).await);
    assert!(second.starts_with("[catalog:new_releases] cached"));

    let refreshed = printed(console.handle_line(":refresh").await);
    assert!(refreshed.starts_with("[catalog:new_releases] fetched"));
    assert_eq!(repo.calls().len(), 2);

    let focused = printed(console.handle_line(":focus").await);
    assert!(focused.contains("fetched"));

    let stats = printed(console.handle_line(":stats").await);
    assert!(stats.starts_with("cache: 1 entries"));
    assert!(stats.ends_with("search: 300ms debounce, 20 per page"));
}

#[tokio::test]
async fn test_console_reports_unusable_input() {
    let (mut console, _, _) = console();

    assert_eq!(
        printed(console.handle_line(":refresh").await),
        "no catalog view to refresh"
    );
    assert_eq!(printed(console.handle_line(":open 1").await), "no result #1");
    assert_eq!(
        printed(console.handle_line(":more").await),
        "nothing more to load"
    );
    assert!(printed(console.handle_line(":bogus").await).contains(":help"));
    assert_eq!(console.handle_line(":quit").await, Reply::Quit);
}
