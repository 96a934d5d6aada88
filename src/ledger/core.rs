//! Main ledger orchestrator coordinating accounts, postings, and statements
//!
//! Owns the three in-memory snapshot stores (chart of accounts, journal,
//! bank statements) and the derived reconciliation suggestion view. Every
//! mutation validates first and mutates after, so a rejected operation
//! leaves all stores exactly as they were. The suggestion view is recomputed
//! after each mutation that touches either of its inputs, mirroring the
//! reactive-recompute model of the surrounding application.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::advisory::ScanReview;
use crate::ledger::chart::AccountTree;
use crate::ledger::posting::Journal;
use crate::reconciliation::{suggest_matches, MatchCandidate};
use crate::types::*;
use crate::utils::validation::{validate_account_code, validate_account_name};

/// In-memory ledger: chart of accounts, transaction journal, imported bank
/// statements, and the current match suggestions.
#[derive(Default)]
pub struct Ledger {
    chart: AccountTree,
    journal: Journal,
    statements: Vec<BankStatementEntry>,
    suggestions: Vec<MatchCandidate>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with an existing chart of accounts
    pub fn with_chart(chart: AccountTree) -> Self {
        Self {
            chart,
            ..Self::default()
        }
    }

    // Account operations

    /// Create a new account with a generated id
    pub fn create_account(
        &mut self,
        code: String,
        name: String,
        account_type: AccountType,
        parent_id: Option<String>,
    ) -> LedgerResult<Account> {
        validate_account_code(&code)?;
        validate_account_name(&name)?;
        let account = Account::new(
            Uuid::new_v4().to_string(),
            code,
            name,
            account_type,
            parent_id,
        );
        self.chart.insert(account.clone())?;
        Ok(account)
    }

    /// Update an existing account's code, name, type, or parent
    pub fn update_account(&mut self, account: Account) -> LedgerResult<()> {
        validate_account_code(&account.code)?;
        validate_account_name(&account.name)?;
        self.chart.update(account)
    }

    /// Delete an account; its children are promoted to roots
    pub fn delete_account(&mut self, account_id: &str) -> LedgerResult<Account> {
        self.chart.delete(account_id)
    }

    /// The chart of accounts
    pub fn chart(&self) -> &AccountTree {
        &self.chart
    }

    // Posting operations

    /// Post a transaction, updating the target account's balance
    pub fn post(&mut self, transaction: Transaction) -> LedgerResult<()> {
        self.journal.post(&mut self.chart, transaction)?;
        self.refresh_suggestions();
        Ok(())
    }

    /// Record a manual entry: builds a transaction with a generated id,
    /// posts it, and returns it
    pub fn record_manual_entry(
        &mut self,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        entry_type: EntryType,
        account_id: String,
    ) -> LedgerResult<Transaction> {
        let transaction = Transaction::new(
            Uuid::new_v4().to_string(),
            date,
            description,
            amount,
            entry_type,
            account_id,
            TransactionSource::Manual,
        );
        self.post(transaction.clone())?;
        Ok(transaction)
    }

    /// Accept a confirmed document scan: builds a Cleared, Scanned
    /// transaction from the extraction and posts it against `account_id`.
    ///
    /// The caller picks the account (usually the review's suggestion) and
    /// the entry polarity; nothing was posted while the review was pending.
    pub fn accept_scan(
        &mut self,
        review: &ScanReview,
        account_id: String,
        entry_type: EntryType,
    ) -> LedgerResult<Transaction> {
        let extraction = &review.extraction;
        let mut transaction = Transaction::new(
            Uuid::new_v4().to_string(),
            extraction.date,
            format!("{}: {}", extraction.vendor, extraction.description),
            extraction.amount.clone(),
            entry_type,
            account_id,
            TransactionSource::Scanned,
        )
        .with_category(extraction.category.clone());
        transaction.status = TransactionStatus::Cleared;
        self.post(transaction.clone())?;
        Ok(transaction)
    }

    /// Move a pending transaction to `Cleared`
    pub fn mark_cleared(&mut self, transaction_id: &str) -> LedgerResult<()> {
        self.journal.mark_cleared(transaction_id)?;
        self.refresh_suggestions();
        Ok(())
    }

    /// All transactions, most recent first
    pub fn transactions(&self) -> &[Transaction] {
        self.journal.entries()
    }

    /// Look up a transaction by id
    pub fn transaction(&self, transaction_id: &str) -> Option<&Transaction> {
        self.journal.get(transaction_id)
    }

    // Bank statement operations

    /// Append imported statement lines
    pub fn import_statements(&mut self, entries: Vec<BankStatementEntry>) {
        self.statements.extend(entries);
        self.refresh_suggestions();
    }

    /// All imported statement lines
    pub fn statements(&self) -> &[BankStatementEntry] {
        &self.statements
    }

    // Reconciliation

    /// Current match suggestions, recomputed whenever the journal or the
    /// statement list changes
    pub fn suggestions(&self) -> &[MatchCandidate] {
        &self.suggestions
    }

    /// Commit a match: mark the statement line and the transaction
    /// reconciled together.
    ///
    /// Fails with `NotFound` if either id is unknown and `AlreadyReconciled`
    /// if either side is already terminal; on failure neither record changes.
    pub fn commit_match(
        &mut self,
        statement_id: &str,
        transaction_id: &str,
    ) -> LedgerResult<()> {
        let statement_idx = self
            .statements
            .iter()
            .position(|s| s.id == statement_id)
            .ok_or_else(|| LedgerError::NotFound(statement_id.to_string()))?;
        let transaction = self
            .journal
            .get(transaction_id)
            .ok_or_else(|| LedgerError::NotFound(transaction_id.to_string()))?;

        if self.statements[statement_idx].reconciled {
            return Err(LedgerError::AlreadyReconciled(statement_id.to_string()));
        }
        if transaction.status == TransactionStatus::Reconciled {
            return Err(LedgerError::AlreadyReconciled(transaction_id.to_string()));
        }

        // Both checks passed; flip both sides together
        self.statements[statement_idx].reconciled = true;
        self.journal.mark_reconciled(transaction_id)?;
        self.refresh_suggestions();
        Ok(())
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggest_matches(self.journal.entries(), &self.statements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ledger_with_cash() -> (Ledger, Account) {
        let mut ledger = Ledger::new();
        let cash = ledger
            .create_account(
                "1000".to_string(),
                "Cash on Hand".to_string(),
                AccountType::Asset,
                None,
            )
            .unwrap();
        (ledger, cash)
    }

    #[test]
    fn manual_entry_updates_balance_and_journal() {
        let (mut ledger, cash) = ledger_with_cash();
        ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "AWS Cloud Services".to_string(),
                BigDecimal::from_str("450.00").unwrap(),
                EntryType::Credit,
                cash.id.clone(),
            )
            .unwrap();
        assert_eq!(
            ledger.chart().get(&cash.id).unwrap().balance,
            BigDecimal::from_str("-450.00").unwrap()
        );
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn failed_post_changes_nothing() {
        let (mut ledger, cash) = ledger_with_cash();
        let err = ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "Bad entry".to_string(),
                BigDecimal::from(0),
                EntryType::Debit,
                cash.id.clone(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert!(ledger.transactions().is_empty());
        assert_eq!(
            ledger.chart().get(&cash.id).unwrap().balance,
            BigDecimal::from(0)
        );
    }

    #[test]
    fn suggestions_refresh_on_import_and_post() {
        let (mut ledger, cash) = ledger_with_cash();
        assert!(ledger.suggestions().is_empty());

        let tx = ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "AWS Cloud Services".to_string(),
                BigDecimal::from_str("450.00").unwrap(),
                EntryType::Credit,
                cash.id.clone(),
            )
            .unwrap();
        assert!(ledger.suggestions().is_empty());

        ledger.import_statements(vec![BankStatementEntry::new(
            "s1".to_string(),
            d(2024, 5, 25),
            "AWS EMEA SARL".to_string(),
            BigDecimal::from_str("-450.00").unwrap(),
            "REF-001".to_string(),
        )]);
        assert_eq!(ledger.suggestions().len(), 1);
        assert_eq!(ledger.suggestions()[0].transaction_id, tx.id);
    }

    #[test]
    fn commit_match_flips_both_sides_and_clears_suggestion() {
        let (mut ledger, cash) = ledger_with_cash();
        let tx = ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "AWS Cloud Services".to_string(),
                BigDecimal::from_str("450.00").unwrap(),
                EntryType::Credit,
                cash.id.clone(),
            )
            .unwrap();
        ledger.import_statements(vec![BankStatementEntry::new(
            "s1".to_string(),
            d(2024, 5, 25),
            "AWS EMEA SARL".to_string(),
            BigDecimal::from_str("-450.00").unwrap(),
            "REF-001".to_string(),
        )]);

        ledger.commit_match("s1", &tx.id).unwrap();
        assert!(ledger.statements()[0].reconciled);
        assert_eq!(
            ledger.transaction(&tx.id).unwrap().status,
            TransactionStatus::Reconciled
        );
        assert!(ledger.suggestions().is_empty());
    }

    #[test]
    fn commit_on_reconciled_statement_fails_without_side_effects() {
        let (mut ledger, cash) = ledger_with_cash();
        let first = ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "AWS Cloud Services".to_string(),
                BigDecimal::from_str("450.00").unwrap(),
                EntryType::Credit,
                cash.id.clone(),
            )
            .unwrap();
        let second = ledger
            .record_manual_entry(
                d(2024, 5, 26),
                "AWS Cloud Services again".to_string(),
                BigDecimal::from_str("450.00").unwrap(),
                EntryType::Credit,
                cash.id.clone(),
            )
            .unwrap();
        ledger.import_statements(vec![BankStatementEntry::new(
            "s1".to_string(),
            d(2024, 5, 25),
            "AWS EMEA SARL".to_string(),
            BigDecimal::from_str("-450.00").unwrap(),
            "REF-001".to_string(),
        )]);

        ledger.commit_match("s1", &first.id).unwrap();
        let err = ledger.commit_match("s1", &second.id).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReconciled(_)));
        // The second transaction is untouched
        assert_eq!(
            ledger.transaction(&second.id).unwrap().status,
            TransactionStatus::Pending
        );
    }

    #[test]
    fn commit_with_unknown_ids_is_not_found() {
        let (mut ledger, _) = ledger_with_cash();
        assert!(matches!(
            ledger.commit_match("ghost", "ghost"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn delete_account_keeps_posted_transactions_visible() {
        let (mut ledger, cash) = ledger_with_cash();
        ledger
            .record_manual_entry(
                d(2024, 5, 25),
                "Entry".to_string(),
                BigDecimal::from(100),
                EntryType::Debit,
                cash.id.clone(),
            )
            .unwrap();
        ledger.delete_account(&cash.id).unwrap();
        assert!(ledger.chart().get(&cash.id).is_none());
        // The journal keeps the historical entry
        assert_eq!(ledger.transactions().len(), 1);
    }
}
