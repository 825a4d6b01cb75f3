//! Normalized emote model and the pure lookup algorithms
//!
//! Everything in this module is I/O-free: the types are built by provider
//! adapters at fetch time and consumed by the manager's read-side
//! operations (search, tokenization, URL mapping).

mod search;
mod tokenize;
mod types;

pub use search::search;
pub use tokenize::split_preserving_whitespace;
pub use types::{
    Emote, EmoteOwner, EmoteSize, EmoteUrls, MessageToken, Platform, ProviderKind,
};
