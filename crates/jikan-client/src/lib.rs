//! Rate-governed client for the Jikan API v4 (MyAnimeList unofficial API).
//!
//! Many concurrent logical requests are accepted and emitted to the upstream
//! one at a time, spaced by a fixed pacing interval, with each caller
//! receiving its own success or failure.

pub mod api;

pub use api::{
    ApiError, Envelope, Governor, GovernorConfig, GovernorStats, HttpTransport, JikanClient,
    RequestDescriptor, Transport,
};
