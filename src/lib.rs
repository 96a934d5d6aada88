//! # Sika Wura Ledger
//!
//! The financial core behind the Sika Wura business suite: a hierarchical
//! chart of accounts, single-sided transaction posting with standard
//! debit/credit polarity, and bank statement reconciliation matching.
//!
//! ## Features
//!
//! - **Chart of accounts**: typed account forest (Asset, Liability, Equity,
//!   Revenue, Expense) with parent/child hierarchy, depth and path queries,
//!   and balance rollups
//! - **Posting**: validated transaction entry with the standard accounting
//!   sign convention (debits increase Assets/Expenses, credits increase the
//!   rest)
//! - **Reconciliation**: amount + date-window matching of transactions
//!   against imported bank statement lines, with atomic match commits
//! - **Advisory boundary**: the hosted generative-AI calls (document OCR,
//!   translation, advice, speech) live behind a single injected trait, so
//!   the core runs and tests without a network
//!
//! All state is in memory; there is no persistence layer. Mutations are
//! all-or-nothing and match suggestions are recomputed whenever their inputs
//! change.
//!
//! ## Quick Start
//!
//! ```rust
//! use sikawura_ledger::{AccountType, EntryType, Ledger};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let mut ledger = Ledger::new();
//! let cash = ledger
//!     .create_account("1000".into(), "Cash on Hand".into(), AccountType::Asset, None)
//!     .unwrap();
//! ledger
//!     .record_manual_entry(
//!         NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(),
//!         "Customer payment".into(),
//!         BigDecimal::from(450),
//!         EntryType::Debit,
//!         cash.id.clone(),
//!     )
//!     .unwrap();
//! assert_eq!(ledger.chart().get(&cash.id).unwrap().balance, BigDecimal::from(450));
//! ```

pub mod advisory;
pub mod ledger;
pub mod reconciliation;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use advisory::*;
pub use ledger::*;
pub use reconciliation::*;
pub use types::*;
