//! Match-3 board engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `match3_board::{core, types}` and hosts the headless
//! simulator binary.

pub use match3_core as core;
pub use match3_types as types;
