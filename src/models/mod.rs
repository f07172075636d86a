//! Data models for the TYTC backend.
//!
//! Field names serialize as camelCase to match the website's JSON contract.

mod member;
mod news;

pub use member::*;
pub use news::*;
