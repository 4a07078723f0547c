pub mod config;
pub mod errors;
pub mod files;
pub mod listing;

pub use config::{AgentConfig, ParserConfig};
pub use errors::{CommandError, CoreError, ListingError};
pub use files::DirEntry;
pub use listing::{ListingFormat, ListingParser, ParseOutcome};
