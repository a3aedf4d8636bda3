//! Device telemetry: callback envelope, runtime caches, state projection
//! and the ingestion pipeline.

pub mod cache;
pub mod events;
pub mod ingest;
pub mod projector;
