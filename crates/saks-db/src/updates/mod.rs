//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields change; a nested `Option` distinguishes "clear" (`Some(None)`) from
//! "leave alone" (`None`).

pub mod agenda;
pub mod case;
pub mod minutes;
