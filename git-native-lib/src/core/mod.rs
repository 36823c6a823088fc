//! Cross-cutting concerns shared by the Git connection layer: configuration
//! keys, request-scoped context and output streaming.

pub mod config;
pub mod context;
pub mod output;
