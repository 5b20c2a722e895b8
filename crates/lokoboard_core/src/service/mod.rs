//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into hierarchy-level operations.
//! - Keep presentation and CLI layers decoupled from storage details.

pub mod board_service;
