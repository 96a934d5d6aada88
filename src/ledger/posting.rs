//! Transaction posting against the chart of accounts

use crate::ledger::chart::AccountTree;
use crate::types::*;
use crate::utils::validation::validate_positive_amount;

/// Ordered transaction log.
///
/// Entries are kept most-recent-first; that ordering is a presentation
/// concern, not a storage invariant. There is no retract path: once posted, a
/// transaction only ever changes status.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<Transaction>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// All posted transactions, most recent first
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Look up a transaction by id
    pub fn get(&self, transaction_id: &str) -> Option<&Transaction> {
        self.entries.iter().find(|t| t.id == transaction_id)
    }

    /// Validate and append a transaction, updating the target account.
    ///
    /// Fails with `UnknownAccount` if the account is not in the chart and
    /// `InvalidAmount` if `amount <= 0`; both leave the journal and the chart
    /// untouched. On success the account balance moves by `+amount` when the
    /// entry lands on the account type's normal balance side and `-amount`
    /// otherwise.
    pub fn post(&mut self, chart: &mut AccountTree, transaction: Transaction) -> LedgerResult<()> {
        validate_positive_amount(&transaction.amount)?;
        chart.get_required(&transaction.account_id)?;

        chart.apply_posting(
            &transaction.account_id,
            transaction.entry_type,
            &transaction.amount,
        )?;
        self.entries.insert(0, transaction);
        Ok(())
    }

    /// Move a pending transaction to `Cleared`.
    ///
    /// Clearing is idempotent for already-cleared entries; a reconciled
    /// transaction is terminal and fails with `AlreadyReconciled`.
    pub fn mark_cleared(&mut self, transaction_id: &str) -> LedgerResult<()> {
        let tx = self.get_mut(transaction_id)?;
        if tx.status == TransactionStatus::Reconciled {
            return Err(LedgerError::AlreadyReconciled(transaction_id.to_string()));
        }
        tx.status = TransactionStatus::Cleared;
        tx.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    /// Move a transaction to `Reconciled`. Only the reconciliation commit
    /// path calls this; the caller has already checked the current status.
    pub(crate) fn mark_reconciled(&mut self, transaction_id: &str) -> LedgerResult<()> {
        let tx = self.get_mut(transaction_id)?;
        tx.status = TransactionStatus::Reconciled;
        tx.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    fn get_mut(&mut self, transaction_id: &str) -> LedgerResult<&mut Transaction> {
        self.entries
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| LedgerError::NotFound(transaction_id.to_string()))
    }
}
