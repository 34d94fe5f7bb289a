// Shared kernel used by every module

pub mod application; // Shared application layer patterns
pub mod domain; // Shared domain concepts (value objects)
pub mod errors; // Shared error types
pub mod utils; // Logging and timing helpers
