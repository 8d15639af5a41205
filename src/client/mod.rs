//! # Query Client
//!
//! The network side of a conversation turn. [`QueryBackend`] is the seam the
//! runtime calls; [`HttpQueryClient`] is the production implementation.

pub mod backend;
pub mod http;
pub mod types;

pub use backend::{ClientError, QueryBackend};
pub use http::HttpQueryClient;
pub use types::{ImageAttachment, ImageRef, PickError, QueryRequest, mime_for_path};
