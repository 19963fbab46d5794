#![deny(missing_docs)]

//! Document upload tester and Gemini-backed embedding/answer helpers.

/// Environment-driven configuration management.
pub mod config;
/// Embedding client abstraction and response normalization.
pub mod embedding;
/// Gemini REST client implementing the embedding and generation seams.
pub mod gemini;
/// Answer generation client abstraction and wire types.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Metadata flattening for embedding input.
pub mod metadata;
/// Embedding and question-answering service.
pub mod service;
/// Document upload endpoint client.
pub mod upload;
