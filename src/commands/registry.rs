use crate::shared::domain::value_objects::ContentType;

/// Every console command; parsing lives here so the help text and the
/// parser stay in one place
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Plain text: becomes the live search query
    Query(String),
    LoadMore,
    Open(usize),
    NewReleases,
    RecentlyAdded,
    Listing { content_type: ContentType, page: u32 },
    Genre { genre: String, content_type: ContentType },
    Progress { user_id: String },
    Refresh,
    Focus,
    Stats,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
type to search          text sets the live query (empty line clears it)
:more                   load the next page of results
:open N                 open result N (1-based)
:new | :recent          new releases | added in the last 15 days
:movies [page]          movie listing page (0-based)
:series [page]          series listing page (0-based)
:genre <name> <movie|series>
:progress <user-id>     continue-watching rail
:refresh                force refetch of the last catalog read
:focus                  simulate the window regaining focus
:stats                  cache statistics
:help | :quit";

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return ConsoleCommand::Query(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        match (name.as_str(), args.as_slice()) {
            ("more", []) => ConsoleCommand::LoadMore,
            ("open", [n]) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ConsoleCommand::Open(n - 1),
                _ => ConsoleCommand::Invalid(format!("not a result number: {}", n)),
            },
            ("new", []) => ConsoleCommand::NewReleases,
            ("recent", []) => ConsoleCommand::RecentlyAdded,
            ("movies", args) | ("series", args) if args.len() <= 1 => {
                let content_type = if name == "movies" {
                    ContentType::Movie
                } else {
                    ContentType::Series
                };
                match args.first().map(|p| p.parse::<u32>()).transpose() {
                    Ok(page) => ConsoleCommand::Listing {
                        content_type,
                        page: page.unwrap_or(0),
                    },
                    Err(_) => ConsoleCommand::Invalid(format!("bad page: {}", args[0])),
                }
            }
            ("genre", [genre @ .., kind]) if !genre.is_empty() => match kind.parse() {
                Ok(content_type) => ConsoleCommand::Genre {
                    genre: genre.join(" "),
                    content_type,
                },
                Err(e) => ConsoleCommand::Invalid(e.to_string()),
            },
            ("progress", [user_id]) => ConsoleCommand::Progress {
                user_id: user_id.to_string(),
            },
            ("refresh", []) => ConsoleCommand::Refresh,
            ("focus", []) => ConsoleCommand::Focus,
            ("stats", []) => ConsoleCommand::Stats,
            ("help", []) => ConsoleCommand::Help,
            ("quit", []) | ("q", []) => ConsoleCommand::Quit,
            _ => ConsoleCommand::Invalid(format!("unknown command: {}", line.trim())),
        }
    }
}
