//! Repository contracts and HTTP implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts over the press API.
//! - Keep endpoint paths and wire decoding out of services and the editor.
//!
//! # Invariants
//! - Write paths send only already-validated bodies.
//! - `404` responses surface as `RepoError::NotFound`, not transport errors.

pub mod news_repo;
pub mod portal_repo;
pub mod week_repo;
