//! Profile module: documents and selective field decryption.
//!
//! This module provides:
//! - `Document` parsing, rendering and owner edits (`document`)
//! - The per-field selective decryption walk (`walker`)

pub mod document;
pub mod walker;

// Re-export the most commonly used items.
pub use document::{
    attach_keys, own_keys, parse_document, render_document, seal_field, strip_private_key,
    Document,
};
pub use walker::{selectively_decrypt, walk, FieldOutcome, PassReason, WalkReport};
