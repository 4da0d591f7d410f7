//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod malformed_entry;
pub mod patch;
pub mod record;

// Re-export for convenience
pub use error::{AppError, FetchError, InputError, ParseError, SelectionError, TraceError};
pub use malformed_entry::MalformedEntry;
pub use patch::PatchResult;
pub use record::{ContentBlock, LoggedRecord, Message, MessageContent, RequestBody, Role, ToolDef};
