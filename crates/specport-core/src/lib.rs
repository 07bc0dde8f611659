// ABOUTME: Core library for specport, containing the specification record model and document handling.
// ABOUTME: Parsing, serialization, and x-kong annotation stripping live here, free of any I/O.

pub mod annotations;
pub mod document;
pub mod model;

pub use annotations::{KONG_ANNOTATION_PREFIX, is_kong_annotation};
pub use document::{DocumentError, SpecDocument};
pub use model::{ApiSpec, ContentType};
