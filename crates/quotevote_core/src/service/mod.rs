//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own transaction scope and connection lifetime per request.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod error;
pub mod quote_service;
pub mod vote_service;
