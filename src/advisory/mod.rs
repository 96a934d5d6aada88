//! External generative-AI boundary
//!
//! Everything the ledger asks of the hosted AI service goes through the
//! [`AdvisoryService`] trait: OCR-style document extraction, translation,
//! free-text advice, and speech synthesis. Business logic never talks to a
//! network client directly, so the whole crate is testable against a stub.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::chart::AccountTree;
use crate::types::{Account, AccountType, LedgerResult};

/// Failures at the external service boundary.
///
/// These are surfaced to the caller as a rejected action with a manual retry
/// affordance; they never partially apply extracted data to ledger state.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("Advisory service unreachable: {0}")]
    Unreachable(String),
    #[error("Advisory service returned a non-parseable response: {0}")]
    MalformedResponse(String),
}

/// Structured fields extracted from a scanned receipt or invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub vendor: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub date: NaiveDate,
    /// Category label, e.g. "Utilities", "Travel", "Inventory", "Office"
    pub category: String,
    /// Account the service thinks the posting belongs to; must be validated
    /// against the current chart before use
    pub suggested_account_id: Option<String>,
    pub tax_amount: BigDecimal,
    pub description: String,
    /// Extraction confidence reported by the service, 0-100
    pub confidence: u8,
}

/// Narrow request/response contract with the hosted generative-AI service
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Extract ledger-ready fields from a document image
    async fn extract_document_fields(
        &self,
        image: &[u8],
        known_accounts: &[Account],
    ) -> Result<DocumentExtraction, AdvisoryError>;

    /// Translate business text between two languages
    async fn translate(
        &self,
        text: &str,
        from_language: &str,
        to_language: &str,
    ) -> Result<String, AdvisoryError>;

    /// Free-text business advice, optionally grounded in financial context
    async fn get_advice(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<String, AdvisoryError>;

    /// Synthesize speech audio for the voice assistant overlay
    async fn synthesize_speech(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, AdvisoryError>;
}

/// Pick the target account for an extraction, in fixed priority order:
/// the service's suggestion when it names a real account, then a fuzzy
/// name-containment match on category or vendor, then the first Expense
/// account, then the first account overall. "First" follows the chart's
/// type-then-code ordering. Returns `None` only for an empty chart.
pub fn resolve_target_account<'a>(
    extraction: &DocumentExtraction,
    chart: &'a AccountTree,
) -> Option<&'a Account> {
    if let Some(id) = extraction.suggested_account_id.as_deref() {
        if let Some(account) = chart.get(id) {
            return Some(account);
        }
    }

    let category = extraction.category.to_lowercase();
    let vendor = extraction.vendor.to_lowercase();
    let fuzzy = chart.ordered_by_type_then_code().find(|account| {
        let name = account.name.to_lowercase();
        name.contains(&category) || category.contains(&name) || name.contains(&vendor)
    });
    if fuzzy.is_some() {
        return fuzzy;
    }

    chart
        .ordered_by_type_then_code()
        .find(|a| a.account_type == AccountType::Expense)
        .or_else(|| chart.ordered_by_type_then_code().next())
}

/// Result of a document scan, held for human confirmation.
///
/// Nothing is posted until the user accepts the review; a discarded review
/// leaves no trace in ledger state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReview {
    pub extraction: DocumentExtraction,
    /// Resolved target account suggestion, if the chart has any accounts
    pub suggested_account: Option<Account>,
}

/// Document intake workflow over an injected advisory service.
///
/// `scan` borrows immutably and owns no ledger state, so a failed call can
/// simply be retried by awaiting it again.
pub struct DocumentScanner<A: AdvisoryService> {
    advisory: A,
}

impl<A: AdvisoryService> DocumentScanner<A> {
    /// Wrap an advisory service implementation
    pub fn new(advisory: A) -> Self {
        Self { advisory }
    }

    /// Run OCR extraction on a document image and resolve a target-account
    /// suggestion against the current chart.
    ///
    /// On service failure the error propagates untouched and no state
    /// changes; the extraction is only ever presented for confirmation,
    /// never auto-posted.
    pub async fn scan(&self, image: &[u8], chart: &AccountTree) -> LedgerResult<ScanReview> {
        let known: Vec<Account> = chart.ordered_by_type_then_code().cloned().collect();
        let extraction = self.advisory.extract_document_fields(image, &known).await?;
        let suggested_account = resolve_target_account(&extraction, chart).cloned();
        Ok(ScanReview {
            extraction,
            suggested_account,
        })
    }

    /// The wrapped service, for the non-ledger calls (translate, advice,
    /// speech)
    pub fn advisory(&self) -> &A {
        &self.advisory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;

    fn extraction(suggested: Option<&str>, category: &str) -> DocumentExtraction {
        DocumentExtraction {
            vendor: "Papaye".to_string(),
            amount: BigDecimal::from(45),
            currency: "GHS".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 23).unwrap(),
            category: category.to_string(),
            suggested_account_id: suggested.map(str::to_string),
            tax_amount: BigDecimal::from(0),
            description: "Office supplies".to_string(),
            confidence: 92,
        }
    }

    fn acc(id: &str, code: &str, name: &str, t: AccountType) -> Account {
        Account::new(id.to_string(), code.to_string(), name.to_string(), t, None)
    }

    fn sample_chart() -> AccountTree {
        AccountTree::from_accounts(vec![
            acc("a1", "1000", "Cash on Hand", AccountType::Asset),
            acc("r1", "4000", "Sales Revenue", AccountType::Revenue),
            acc("e1", "5000", "Cost of Goods Sold", AccountType::Expense),
            acc("e2", "5200", "Office Expenses", AccountType::Expense),
        ])
        .unwrap()
    }

    #[test]
    fn valid_suggestion_wins() {
        let chart = sample_chart();
        let ext = extraction(Some("r1"), "Office");
        assert_eq!(resolve_target_account(&ext, &chart).unwrap().id, "r1");
    }

    #[test]
    fn invalid_suggestion_falls_back_to_fuzzy_match() {
        let chart = sample_chart();
        let ext = extraction(Some("ghost"), "Office");
        // "Office Expenses" contains "office"
        assert_eq!(resolve_target_account(&ext, &chart).unwrap().id, "e2");
    }

    #[test]
    fn no_fuzzy_hit_falls_back_to_first_expense() {
        let chart = sample_chart();
        let ext = extraction(None, "Travel");
        assert_eq!(resolve_target_account(&ext, &chart).unwrap().id, "e1");
    }

    #[test]
    fn no_expense_account_falls_back_to_first_overall() {
        let chart = AccountTree::from_accounts(vec![
            acc("r1", "4000", "Sales Revenue", AccountType::Revenue),
            acc("a1", "1000", "GCB Bank Account", AccountType::Asset),
        ])
        .unwrap();
        let ext = extraction(None, "Travel");
        // First in type-then-code order, i.e. the Asset account
        assert_eq!(resolve_target_account(&ext, &chart).unwrap().id, "a1");
    }

    #[test]
    fn empty_chart_yields_none() {
        let chart = AccountTree::new();
        let ext = extraction(None, "Travel");
        assert!(resolve_target_account(&ext, &chart).is_none());
    }
}
