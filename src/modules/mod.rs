pub mod cache; // TTL response cache and cached queries
pub mod content; // Content store client and catalog reads
pub mod search; // Debounced search pipeline
