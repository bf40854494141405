//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for the relay endpoints
//! - **[`models`]**: Request/response data structures
//!
//! The surface is two POST routes: `/upload` (multipart) and `/delete`
//! (JSON). Both are documented with `utoipa` annotations; the rendered
//! documentation is served at `/docs`.

pub mod handlers;
pub mod models;
