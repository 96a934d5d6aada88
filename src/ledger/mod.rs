//! Ledger module containing the chart of accounts, posting, and the
//! coordinating `Ledger` store

pub mod chart;
pub mod core;
pub mod posting;

pub use chart::*;
pub use core::*;
pub use posting::*;
