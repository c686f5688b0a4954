//! Snapshot graph and its document form.
//!
//! ## Responsibilities
//!
//! - Hold one snapshot's elements, revisions and relations in memory
//! - Answer by-identifier, by-kind and relation-traversal queries
//! - Convert to and from the serialized document shape
//!
//! ## Non-Responsibilities
//!
//! - File access (handled by `revline-store`)
//! - Deciding what history to keep (handled by `history`)

pub mod document;
pub mod store;

pub use document::{parse_snapshot, render_snapshot, SnapshotDocument, SNAPSHOT_SCHEMA_VERSION};
pub use store::{EntityKind, Snapshot};
