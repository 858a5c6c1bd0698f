//! Coordinate types shared between the runtime and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down

mod resolution;

pub use resolution::Resolution;
