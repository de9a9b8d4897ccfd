//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the UI bridge decoupled from HTTP details.

pub mod classification_editor;
pub mod portal_service;
pub mod vocabulary;
pub mod week_service;
