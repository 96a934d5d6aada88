//! Basic ledger usage example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use sikawura_ledger::{AccountType, BankStatementEntry, EntryType, Ledger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Sika Wura Ledger - Basic Example\n");

    let mut ledger = Ledger::new();

    // 1. Build a small chart of accounts with a nested expense tree
    println!("📊 Setting up Chart of Accounts...");
    let cash = ledger.create_account(
        "1000".to_string(),
        "Cash on Hand".to_string(),
        AccountType::Asset,
        None,
    )?;
    let sales = ledger.create_account(
        "4000".to_string(),
        "Sales Revenue".to_string(),
        AccountType::Revenue,
        None,
    )?;
    let operating = ledger.create_account(
        "6000".to_string(),
        "Operating Expenses".to_string(),
        AccountType::Expense,
        None,
    )?;
    let utilities = ledger.create_account(
        "6100".to_string(),
        "Utilities".to_string(),
        AccountType::Expense,
        Some(operating.id.clone()),
    )?;
    let electricity = ledger.create_account(
        "6110".to_string(),
        "Electricity".to_string(),
        AccountType::Expense,
        Some(utilities.id.clone()),
    )?;

    for account in ledger.chart().ordered_by_type_then_code() {
        println!(
            "  ✓ {} {} ({:?}, depth {})",
            account.code,
            ledger.chart().display_path(&account.id)?,
            account.account_type,
            ledger.chart().depth_of(&account.id)?
        );
    }
    println!();

    // 2. Post some entries
    println!("💰 Posting transactions...");
    ledger.record_manual_entry(
        NaiveDate::from_ymd_opt(2024, 5, 24).unwrap(),
        "Customer Payment - Acme Corp".to_string(),
        BigDecimal::from_str("3200.00")?,
        EntryType::Credit,
        sales.id.clone(),
    )?;
    ledger.record_manual_entry(
        NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(),
        "AWS Cloud Services".to_string(),
        BigDecimal::from_str("450.00")?,
        EntryType::Credit,
        cash.id.clone(),
    )?;
    ledger.record_manual_entry(
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        "ECG prepaid units".to_string(),
        BigDecimal::from_str("180.00")?,
        EntryType::Debit,
        electricity.id.clone(),
    )?;

    println!(
        "  Sales Revenue balance:          {}",
        ledger.chart().get(&sales.id).unwrap().balance
    );
    println!(
        "  Operating Expenses (rolled up): {}",
        ledger.chart().rolled_up_balance(&operating.id)?
    );
    println!();

    // 3. Import a bank statement and reconcile
    println!("🏦 Importing bank statement...");
    ledger.import_statements(vec![BankStatementEntry::new(
        "stmt-1".to_string(),
        NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(),
        "AWS EMEA SARL".to_string(),
        BigDecimal::from_str("-450.00")?,
        "REF-9913".to_string(),
    )]);

    for candidate in ledger.suggestions().to_vec() {
        println!(
            "  Suggested match: statement {} -> transaction {} ({}%)",
            candidate.statement_id, candidate.transaction_id, candidate.confidence
        );
        ledger.commit_match(&candidate.statement_id, &candidate.transaction_id)?;
        println!("  ✓ Committed");
    }

    println!("\n✅ Done. {} transactions on file.", ledger.transactions().len());
    Ok(())
}
