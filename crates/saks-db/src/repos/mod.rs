//! Repository modules for every Saks entity.
//!
//! Each module adds methods to `SaksService` via `impl SaksService` blocks.
//! The transactional bodies are free functions taking a `&libsql::Connection`
//! so they run unchanged on a plain connection or inside a write transaction.

pub mod attachment;
pub mod audit;
pub mod case;
pub mod comment;
pub mod meeting;
pub mod minutes;
pub mod pdf;
pub mod sequence;
pub mod timeline;
