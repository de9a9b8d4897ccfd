//! Typed client-side model for the press-monitoring dashboard.
//!
//! # Responsibility
//! - Define the wire-compatible records exchanged with the press API.
//! - Own the classification invariants enforced on the client side.
//!
//! # Invariants
//! - Every record is identified by an ID assigned by the remote store.
//! - Classification fields cascade: subcategory needs category, category
//!   needs cycle, cycle needs the strategic flag.

pub mod date_range;
pub mod news_item;
pub mod portal;
pub mod sentiment;
pub mod strategic_week;
pub mod validation;
