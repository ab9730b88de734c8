//! Metadata provider integration - fetches release date, lyrics and link for a song.
//!
//! # Architecture
//!
//! Same split as any other external API in this crate:
//! - **Domain models** (`domain.rs`) - [`SongDetail`] and [`ProviderError`]
//! - **API DTOs** (`dto.rs`) - Exact response shape of the provider
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`client.rs`) - HTTP client with explicit timeouts
//! - **Traits** (`traits.rs`) - [`MusicInfoApi`] seam for mocking
//!
//! # Usage
//!
//! ```ignore
//! use songbook::musicinfo::{MusicInfoClient, MusicInfoApi};
//!
//! let client = MusicInfoClient::new("http://localhost:8081/info", Duration::from_secs(5))?;
//! let detail = client.song_detail("Muse", "Supermassive Black Hole").await?;
//! ```

pub mod adapter;
pub mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::MusicInfoClient;
pub use domain::{ProviderError, SongDetail};
pub use traits::MusicInfoApi;
