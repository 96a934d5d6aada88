//! Bank statement reconciliation matching
//!
//! Proposes best-effort 1:1 matches between internal transactions and
//! imported bank statement lines. Matching is deliberately simple: amount
//! equality plus a strict date-proximity window, first qualifying transaction
//! in input order wins. Committing a match is handled by
//! [`Ledger::commit_match`](crate::ledger::Ledger::commit_match), which owns
//! both record lists.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{BankStatementEntry, Transaction, TransactionStatus};

/// Fixed confidence reported for every candidate. The matcher is a
/// heuristic, not a statistical model; the UI shows this constant as-is.
pub const MATCH_CONFIDENCE: u8 = 98;

/// Statement dates within strictly fewer than this many days of the
/// transaction date qualify; a delta of exactly 5 days does not.
pub const MATCH_WINDOW_DAYS: i64 = 5;

/// A proposed pairing of one statement line with one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub statement_id: String,
    pub transaction_id: String,
    pub confidence: u8,
}

/// Propose at most one candidate transaction per unreconciled statement line.
///
/// A transaction qualifies when it is not already reconciled, its magnitude
/// equals the statement amount's absolute value, and the dates are within the
/// window. Ties resolve to the first transaction in the given input order
/// (stable and deterministic, not smallest date delta). A transaction claimed
/// by an earlier statement line is not offered again, keeping candidates 1:1.
///
/// Pure over its inputs: calling it repeatedly with the same snapshot pair
/// yields the same candidate set.
pub fn suggest_matches(
    transactions: &[Transaction],
    statements: &[BankStatementEntry],
) -> Vec<MatchCandidate> {
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut candidates = Vec::new();

    for statement in statements.iter().filter(|s| !s.reconciled) {
        let hit = transactions.iter().find(|tx| {
            tx.status != TransactionStatus::Reconciled
                && !claimed.contains(tx.id.as_str())
                && tx.amount == statement.amount.abs()
                && within_window(tx, statement)
        });
        if let Some(tx) = hit {
            claimed.insert(tx.id.as_str());
            candidates.push(MatchCandidate {
                statement_id: statement.id.clone(),
                transaction_id: tx.id.clone(),
                confidence: MATCH_CONFIDENCE,
            });
        }
    }

    candidates
}

fn within_window(tx: &Transaction, statement: &BankStatementEntry) -> bool {
    tx.date
        .signed_duration_since(statement.date)
        .num_days()
        .abs()
        < MATCH_WINDOW_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryType, TransactionSource};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn tx(id: &str, amount: &str, date: NaiveDate) -> Transaction {
        Transaction::new(
            id.to_string(),
            date,
            "AWS Cloud Services".to_string(),
            BigDecimal::from_str(amount).unwrap(),
            EntryType::Credit,
            "a1".to_string(),
            TransactionSource::Bank,
        )
    }

    fn stmt(id: &str, amount: &str, date: NaiveDate) -> BankStatementEntry {
        BankStatementEntry::new(
            id.to_string(),
            date,
            "AWS EMEA SARL".to_string(),
            BigDecimal::from_str(amount).unwrap(),
            "REF-001".to_string(),
        )
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_day_equal_magnitude_matches() {
        let txs = vec![tx("t1", "450.00", d(2024, 5, 25))];
        let stmts = vec![stmt("s1", "-450.00", d(2024, 5, 25))];
        let candidates = suggest_matches(&txs, &stmts);
        assert_eq!(
            candidates,
            vec![MatchCandidate {
                statement_id: "s1".to_string(),
                transaction_id: "t1".to_string(),
                confidence: MATCH_CONFIDENCE,
            }]
        );
    }

    #[test]
    fn four_day_delta_matches_five_does_not() {
        let txs = vec![tx("t1", "450.00", d(2024, 5, 25))];

        let within = vec![stmt("s1", "-450.00", d(2024, 5, 29))];
        assert_eq!(suggest_matches(&txs, &within).len(), 1);

        // Exactly 5 days apart: strictly outside the window
        let boundary = vec![stmt("s2", "-450.00", d(2024, 5, 30))];
        assert!(suggest_matches(&txs, &boundary).is_empty());
    }

    #[test]
    fn amount_mismatch_does_not_match() {
        let txs = vec![tx("t1", "450.00", d(2024, 5, 25))];
        let stmts = vec![stmt("s1", "-450.01", d(2024, 5, 25))];
        assert!(suggest_matches(&txs, &stmts).is_empty());
    }

    #[test]
    fn first_transaction_in_input_order_wins() {
        let txs = vec![
            tx("t-first", "450.00", d(2024, 5, 28)),
            tx("t-closer", "450.00", d(2024, 5, 25)),
        ];
        let stmts = vec![stmt("s1", "-450.00", d(2024, 5, 25))];
        let candidates = suggest_matches(&txs, &stmts);
        // Input order, not smallest date delta
        assert_eq!(candidates[0].transaction_id, "t-first");
    }

    #[test]
    fn reconciled_sides_are_skipped() {
        let mut reconciled_tx = tx("t1", "450.00", d(2024, 5, 25));
        reconciled_tx.status = TransactionStatus::Reconciled;
        let stmts = vec![stmt("s1", "-450.00", d(2024, 5, 25))];
        assert!(suggest_matches(&[reconciled_tx], &stmts).is_empty());

        let txs = vec![tx("t1", "450.00", d(2024, 5, 25))];
        let mut done = stmt("s1", "-450.00", d(2024, 5, 25));
        done.reconciled = true;
        assert!(suggest_matches(&txs, &[done]).is_empty());
    }

    #[test]
    fn each_transaction_claimed_at_most_once() {
        let txs = vec![tx("t1", "450.00", d(2024, 5, 25))];
        let stmts = vec![
            stmt("s1", "-450.00", d(2024, 5, 25)),
            stmt("s2", "-450.00", d(2024, 5, 26)),
        ];
        let candidates = suggest_matches(&txs, &stmts);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].statement_id, "s1");
    }

    #[test]
    fn recomputation_is_idempotent() {
        let txs = vec![
            tx("t1", "450.00", d(2024, 5, 25)),
            tx("t2", "3200.00", d(2024, 5, 24)),
        ];
        let stmts = vec![
            stmt("s1", "-450.00", d(2024, 5, 25)),
            stmt("s2", "3200.00", d(2024, 5, 23)),
        ];
        let first = suggest_matches(&txs, &stmts);
        let second = suggest_matches(&txs, &stmts);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
