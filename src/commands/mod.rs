pub mod console;
pub mod registry;

pub use console::{render_snapshot, Console, Reply};
pub use registry::ConsoleCommand;
