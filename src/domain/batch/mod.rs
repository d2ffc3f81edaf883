//! Batch domain - Request coalescing vocabulary

mod alias;
mod extractor;
mod fetch;
mod outcome;
mod request;

pub use alias::{forward_alias, is_global_alias, reverse_alias};
pub use extractor::Extractor;
pub use fetch::{FetchRequest, FetchState};
pub use outcome::FlushOutcome;
pub use request::{PendingQueue, PendingRequest};
