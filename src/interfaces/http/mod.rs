//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: optional bearer authentication
//! - `modules`: endpoint handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
