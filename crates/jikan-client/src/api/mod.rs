//! Jikan API v4 access layer.
//!
//! All outbound calls go through a [`Governor`], which serializes them and
//! spaces them to stay under the upstream rate ceiling. [`JikanClient`]
//! provides one method per catalog resource on top of it.

pub mod client;
pub mod error;
pub mod governor;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{
    AnimeDetailBundle, CharacterDetailBundle, JikanClient, MangaDetailBundle, PendingEnvelope,
    RandomKind,
};
pub use error::ApiError;
pub use governor::{
    Governor, GovernorConfig, GovernorStats, PendingResponse, DEFAULT_PACING_INTERVAL,
};
pub use request::RequestDescriptor;
pub use transport::{HttpTransport, Transport};
pub use types::*;
