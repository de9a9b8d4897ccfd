//! Client-side state stores.
//!
//! # Invariants
//! - Stores only ever hold server-confirmed values.

pub mod news_store;
