use std::fmt::Write as _;

use crate::commands::registry::{ConsoleCommand, HELP};
use crate::modules::cache::{CachedQuery, CachedQueryOptions, FetchOutcome, QueryState};
use crate::modules::content::{CatalogQueries, ContentItem, WatchProgressEntry};
use crate::modules::search::{SearchPhase, SearchPipeline, SearchSnapshot};
use crate::shared::errors::AppError;
use crate::log_debug;

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    /// Output arrives later through the search subscription
    Silent,
    Quit,
}

/// The catalog read currently on screen; `:refresh` and `:focus` act on it
enum CatalogView {
    Items(CachedQuery<Vec<ContentItem>>),
    Progress(CachedQuery<Vec<WatchProgressEntry>>),
}

/// Terminal storefront: routes parsed commands to the search pipeline and
/// the cached catalog reads
pub struct Console {
    pipeline: SearchPipeline,
    catalog: CatalogQueries,
    current: Option<CatalogView>,
}

impl Console {
    pub fn new(pipeline: SearchPipeline, catalog: CatalogQueries) -> Self {
        Self {
            pipeline,
            catalog,
            current: None,
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Reply {
        self.handle(ConsoleCommand::parse(line.trim_end_matches(['\r', '\n'])))
            .await
    }

    pub async fn handle(&mut self, command: ConsoleCommand) -> Reply {
        log_debug!("console command: {:?}", command);

        match command {
            ConsoleCommand::Query(text) => {
                self.pipeline.set_query(&text).await;
                Reply::Silent
            }
            ConsoleCommand::LoadMore => {
                if self.pipeline.load_more().await {
                    Reply::Silent
                } else {
                    Reply::Print("nothing more to load".to_string())
                }
            }
            ConsoleCommand::Open(index) => match self.pipeline.select(index).await {
                Some(target) => Reply::Print(format!("-> {}", target.path())),
                None => Reply::Print(format!("no result #{}", index + 1)),
            },
            ConsoleCommand::NewReleases => {
                let query = self.catalog.new_releases(focus_options());
                self.show_items(query).await
            }
            ConsoleCommand::RecentlyAdded => {
                let query = self.catalog.recently_added(focus_options());
                self.show_items(query).await
            }
            ConsoleCommand::Listing { content_type, page } => {
                let query = self.catalog.listing(content_type, page, focus_options());
                self.show_items(query).await
            }
            ConsoleCommand::Genre {
                genre,
                content_type,
            } => {
                let query = self.catalog.by_genre(&genre, content_type, focus_options());
                self.show_items(query).await
            }
            ConsoleCommand::Progress { user_id } => {
                let query = self.catalog.watch_progress(&user_id, focus_options());
                let outcome = query.load().await;
                let text = render_progress(query.key(), outcome, &query.state());
                self.current = Some(CatalogView::Progress(query));
                Reply::Print(text)
            }
            ConsoleCommand::Refresh => self.refresh(false).await,
            ConsoleCommand::Focus => self.refresh(true).await,
            ConsoleCommand::Stats => {
                let stats = self.catalog.cache().stats();
                let search = self.pipeline.config();
                Reply::Print(format!(
                    "cache: {} entries, {} hits, {} misses ({:.0}% hit rate), {} expired, {} evicted\n\
                     search: {}ms debounce, {} per page",
                    stats.entries_count,
                    stats.hits,
                    stats.misses,
                    stats.hit_rate() * 100.0,
                    stats.expired_cleanups,
                    stats.evictions,
                    search.debounce.as_millis(),
                    search.page_size
                ))
            }
            ConsoleCommand::Help => Reply::Print(HELP.to_string()),
            ConsoleCommand::Quit => {
                self.pipeline.shutdown();
                Reply::Quit
            }
            ConsoleCommand::Invalid(reason) => Reply::Print(format!("{} (:help for commands)", reason)),
        }
    }

    async fn show_items(&mut self, query: CachedQuery<Vec<ContentItem>>) -> Reply {
        let outcome = query.load().await;
        let text = render_items(query.key(), outcome, &query.state());
        self.current = Some(CatalogView::Items(query));
        Reply::Print(text)
    }

    async fn refresh(&self, focus: bool) -> Reply {
        let Some(view) = &self.current else {
            return Reply::Print("no catalog view to refresh".to_string());
        };

        match view {
            CatalogView::Items(query) => {
                let outcome = if focus {
                    query.on_focus().await
                } else {
                    Some(query.refetch().await)
                };
                match outcome {
                    Some(outcome) => Reply::Print(render_items(query.key(), outcome, &query.state())),
                    None => Reply::Silent,
                }
            }
            CatalogView::Progress(query) => {
                let outcome = if focus {
                    query.on_focus().await
                } else {
                    Some(query.refetch().await)
                };
                match outcome {
                    Some(outcome) => {
                        Reply::Print(render_progress(query.key(), outcome, &query.state()))
                    }
                    None => Reply::Silent,
                }
            }
        }
    }
}

fn focus_options() -> CachedQueryOptions {
    CachedQueryOptions::default().refetch_on_focus(true)
}

fn outcome_label(outcome: FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::CacheHit => "cached",
        FetchOutcome::Fetched => "fetched",
        FetchOutcome::Failed => "failed",
        FetchOutcome::Throttled => "throttled",
        FetchOutcome::Disabled => "disabled",
    }
}

fn render_error(out: &mut String, error: &Option<AppError>) {
    if let Some(error) = error {
        let _ = writeln!(out, "  ! {}", error);
    }
}

pub fn render_items(
    key: &str,
    outcome: FetchOutcome,
    state: &QueryState<Vec<ContentItem>>,
) -> String {
    let mut out = format!("[{}] {}\n", key, outcome_label(outcome));
    render_error(&mut out, &state.error);

    match &state.data {
        Some(items) if items.is_empty() => out.push_str("  (empty)\n"),
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                let mut badges = String::new();
                if item.is_new {
                    badges.push_str(" [new]");
                }
                if item.is_premium {
                    badges.push_str(" [premium]");
                }
                let _ = writeln!(
                    out,
                    "  {:>2}. {} ({}){}",
                    i + 1,
                    item.title,
                    item.content_type,
                    badges
                );
            }
        }
        None => out.push_str("  (no data)\n"),
    }
    out.trim_end().to_string()
}

pub fn render_progress(
    key: &str,
    outcome: FetchOutcome,
    state: &QueryState<Vec<WatchProgressEntry>>,
) -> String {
    let mut out = format!("[{}] {}\n", key, outcome_label(outcome));
    render_error(&mut out, &state.error);

    match &state.data {
        Some(entries) if entries.is_empty() => out.push_str("  (nothing in progress)\n"),
        Some(entries) => {
            for entry in entries {
                let _ = writeln!(
                    out,
                    "  {} at {}m{:02}s, last watched {}",
                    entry.content.title,
                    entry.progress_seconds / 60,
                    entry.progress_seconds % 60,
                    entry.last_watched_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        None => out.push_str("  (no data)\n"),
    }
    out.trim_end().to_string()
}

/// Text for one search state change, or `None` for states not worth printing
pub fn render_snapshot(snapshot: &SearchSnapshot) -> Option<String> {
    if snapshot.query.trim().is_empty() || snapshot.phase == SearchPhase::Debouncing {
        return None;
    }
    if snapshot.is_loading {
        return Some(format!("searching \"{}\"...", snapshot.query));
    }
    if snapshot.is_loading_more {
        return Some(format!("loading page {}...", snapshot.page + 1));
    }
    if snapshot.shows_no_results() {
        return Some(match &snapshot.error {
            Some(error) => format!("no results for \"{}\" ({})", snapshot.query, error),
            None => format!("no results for \"{}\"", snapshot.query),
        });
    }
    if snapshot.results.is_empty() {
        return None;
    }

    let mut out = format!(
        "\"{}\": {} result(s){}\n",
        snapshot.query,
        snapshot.results.len(),
        if snapshot.has_more { ", :more for next page" } else { "" }
    );
    for (i, result) in snapshot.results.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {} ({})", i + 1, result.title, result.content_type);
    }
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "  ! {}", error);
    }
    Some(out.trim_end().to_string())
}
