pub mod element;
pub mod metadata;
pub mod relation;
pub mod revision;

pub use element::Element;
pub use metadata::{MetadataAttachment, MetadataRecord};
pub use relation::{Assignment, Ordering};
pub use revision::Revision;

/// Generate a fresh persistent identifier (UUIDv7)
pub fn new_global_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
