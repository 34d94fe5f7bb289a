pub mod config;
pub mod session;

pub use config::SearchConfig;
pub use session::{
    ApplyOutcome, FetchTicket, QueryChange, SearchPhase, SearchSession, SearchSnapshot,
};
