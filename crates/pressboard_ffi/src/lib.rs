//! Dashboard-facing bridge over `pressboard_core`.

pub mod api;
