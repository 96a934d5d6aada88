//! Core types and data structures for the ledger system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account types following standard accounting principles
///
/// Declaration order is significant: it is the fixed grouping order used by
/// chart-of-accounts listings (Asset, Liability, Equity, Revenue, Expense).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Bank Accounts, Inventory, etc.)
    Asset,
    /// Liabilities - what the business owes (Accounts Payable, Loans, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned by the business
    Revenue,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Revenue normally carry credit balances.
    pub fn normal_balance(&self) -> EntryType {
        match self {
            AccountType::Asset | AccountType::Expense => EntryType::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                EntryType::Credit
            }
        }
    }

    /// All account types in chart grouping order
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];
}

/// Debit/credit polarity of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// Debit - increases Assets and Expenses, decreases the rest
    Debit,
    /// Credit - increases Liabilities, Equity, and Revenue, decreases the rest
    Credit,
}

/// A node in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Display code, unique within a type-root subtree; lexicographic sort key
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Optional parent account of the same type; `None` denotes a root
    pub parent_id: Option<String>,
    /// Current balance; sign semantics depend on `account_type`
    pub balance: BigDecimal,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(
        id: String,
        code: String,
        name: String,
        account_type: AccountType,
        parent_id: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            code,
            name,
            account_type,
            parent_id,
            balance: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the account balance for a posting.
    ///
    /// The balance increases when the posting lands on the account type's
    /// normal balance side and decreases otherwise.
    pub fn apply_posting(&mut self, entry_type: EntryType, amount: &BigDecimal) {
        match (self.account_type.normal_balance(), entry_type) {
            (EntryType::Debit, EntryType::Debit) | (EntryType::Credit, EntryType::Credit) => {
                self.balance += amount;
            }
            (EntryType::Debit, EntryType::Credit) | (EntryType::Credit, EntryType::Debit) => {
                self.balance -= amount;
            }
        }
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Lifecycle of a transaction: `Pending -> Cleared -> Reconciled`,
/// with `Reconciled` terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Cleared,
    Reconciled,
}

/// How a transaction entered the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSource {
    Manual,
    Scanned,
    Bank,
}

/// A single-sided posting against one chart-of-accounts node.
///
/// The ledger tracks one leg per transaction; there is no double-entry
/// counter-leg. Immutable after posting except for `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    /// Date when the transaction occurred
    pub date: NaiveDate,
    /// Description of the transaction
    pub description: String,
    /// Non-negative magnitude; polarity comes from `entry_type`
    pub amount: BigDecimal,
    /// Debit or credit against the target account
    pub entry_type: EntryType,
    /// The account this transaction posts to
    pub account_id: String,
    /// Reconciliation lifecycle state
    pub status: TransactionStatus,
    /// Where the transaction came from
    pub source: TransactionSource,
    /// Free-form category label (e.g. "Utilities", "Office")
    pub category: Option<String>,
    /// Link to a scanned receipt or other supporting document
    pub attachment_url: Option<String>,
    /// When the transaction was created
    pub created_at: NaiveDateTime,
    /// When the transaction was last updated
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Create a new pending transaction
    pub fn new(
        id: String,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        entry_type: EntryType,
        account_id: String,
        source: TransactionSource,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            date,
            description,
            amount,
            entry_type,
            account_id,
            status: TransactionStatus::Pending,
            source,
            category: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the category label
    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    /// Attach a supporting document URL
    pub fn with_attachment(mut self, url: String) -> Self {
        self.attachment_url = Some(url);
        self
    }
}

/// A line imported from an external bank statement.
///
/// `amount` is signed: negative values are outflows. A statement entry can be
/// matched to at most one transaction, and `reconciled` only ever flips
/// false -> true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankStatementEntry {
    /// Unique identifier for the statement line
    pub id: String,
    /// Value date reported by the bank
    pub date: NaiveDate,
    /// Narrative from the statement
    pub description: String,
    /// Signed amount; negative = outflow
    pub amount: BigDecimal,
    /// Bank reference string
    pub reference: String,
    /// Whether this line has been matched to a transaction
    pub reconciled: bool,
}

impl BankStatementEntry {
    /// Create a new unreconciled statement entry
    pub fn new(
        id: String,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        reference: String,
    ) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            reference,
            reconciled: false,
        }
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
    #[error("Invalid parent account: {0}")]
    InvalidParent(String),
    #[error("Parent cycle detected for account: {0}")]
    Cycle(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Already reconciled: {0}")]
    AlreadyReconciled(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Advisory service error: {0}")]
    Advisory(#[from] crate::advisory::AdvisoryError),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
