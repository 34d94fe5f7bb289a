pub mod application;
pub mod domain;

pub use application::SearchPipeline;
pub use domain::{SearchConfig, SearchPhase, SearchSnapshot};
