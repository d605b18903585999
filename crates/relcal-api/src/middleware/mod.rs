//! # HTTP Middleware
//!
//! Layers applied around every route.

pub mod tracing_layer;
