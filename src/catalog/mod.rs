//! Catalog orchestration - the operations exposed to a transport layer.
//!
//! - **Service** (`service.rs`) - enrich-then-store on create, listing,
//!   verse lookup, sparse update and delete
//! - **Update builder** (`update.rs`) - turns a [`SongPatch`](crate::model::SongPatch)
//!   into a parameterized `UPDATE`
//! - **Verses** (`verse.rs`) - lyrics segmentation
//! - **Context** (`context.rs`) - per-request tracing handle
//!
//! # Usage
//!
//! ```ignore
//! let service = CatalogService::new(pool, Some(Arc::new(client)));
//! let ctx = RequestContext::new("req-1");
//! let id = service.add_song(&ctx, &CreateSong::new("Muse", "Uprising")).await?;
//! let verse = service.get_verse(&ctx, id, 0).await?;
//! ```

pub mod context;
pub mod service;
pub mod update;
pub mod verse;

pub use context::RequestContext;
pub use service::{CatalogService, EnrichmentFailurePolicy};
pub use update::{Assignment, UpdateStatement};
