//! Chart of accounts hierarchy
//!
//! The chart is a forest of typed account nodes. Parents and children always
//! share an [`AccountType`], the parent chain always terminates at a root,
//! and listings group by type then sort siblings by code (lexicographic).

use std::collections::HashMap;

use bigdecimal::BigDecimal;

use crate::types::*;

/// The full account set with hierarchy queries.
///
/// Lookups go through an adjacency map (`parent id -> child ids`) that is
/// rebuilt after every mutation, so `depth_of`/`path_of`/traversals never
/// re-scan the flat account list.
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    accounts: HashMap<String, Account>,
    /// Insertion order of ids, kept for stable rebuilds
    order: Vec<String>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl AccountTree {
    /// Create an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chart from an existing account list.
    ///
    /// Accounts are inserted in order; an account whose parent appears later
    /// in the list is rejected the same way as any other missing parent.
    pub fn from_accounts(accounts: Vec<Account>) -> LedgerResult<Self> {
        let mut tree = Self::new();
        for account in accounts {
            tree.insert(account)?;
        }
        Ok(tree)
    }

    /// Number of accounts in the chart
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the chart is empty
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Look up an account by id
    pub fn get(&self, account_id: &str) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    /// Look up an account by id, failing with `UnknownAccount` if missing
    pub fn get_required(&self, account_id: &str) -> LedgerResult<&Account> {
        self.accounts
            .get(account_id)
            .ok_or_else(|| LedgerError::UnknownAccount(account_id.to_string()))
    }

    /// Direct children of an account, in code order
    pub fn children_of(&self, account_id: &str) -> &[String] {
        self.children
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Insert a new account.
    ///
    /// Fails with `InvalidParent` if the parent is missing or of a different
    /// type, with `Cycle` if the account names itself as parent, and with
    /// `Validation` on a duplicate id. The tree is unchanged on failure.
    pub fn insert(&mut self, account: Account) -> LedgerResult<()> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::Validation(format!(
                "Account with ID '{}' already exists",
                account.id
            )));
        }
        self.check_parent(&account.id, account.parent_id.as_deref(), account.account_type)?;

        self.order.push(account.id.clone());
        self.accounts.insert(account.id.clone(), account);
        self.reindex();
        Ok(())
    }

    /// Replace an existing account's code, name, or parent.
    ///
    /// Reparenting runs the same cycle and type checks as `insert`. A type
    /// change is rejected with `InvalidParent` while the account still has a
    /// parent or any child of the old type, since every parent chain must be
    /// type-homogeneous.
    pub fn update(&mut self, account: Account) -> LedgerResult<()> {
        let existing = self
            .accounts
            .get(&account.id)
            .ok_or_else(|| LedgerError::NotFound(account.id.clone()))?;

        if account.account_type != existing.account_type {
            let has_typed_relatives = account
                .parent_id
                .is_some()
                || !self.children_of(&account.id).is_empty();
            if has_typed_relatives {
                return Err(LedgerError::InvalidParent(format!(
                    "Cannot change type of account '{}' while it is linked to accounts of type {:?}",
                    account.id, existing.account_type
                )));
            }
        }
        self.check_parent(&account.id, account.parent_id.as_deref(), account.account_type)?;

        let mut account = account;
        account.updated_at = chrono::Utc::now().naive_utc();
        self.accounts.insert(account.id.clone(), account);
        self.reindex();
        Ok(())
    }

    /// Delete an account, promoting its children to roots.
    ///
    /// Non-cascading: children keep their balances and subtrees, only their
    /// `parent_id` is cleared.
    pub fn delete(&mut self, account_id: &str) -> LedgerResult<Account> {
        let removed = self
            .accounts
            .remove(account_id)
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))?;
        self.order.retain(|id| id != account_id);

        for child in self.accounts.values_mut() {
            if child.parent_id.as_deref() == Some(account_id) {
                child.parent_id = None;
                child.updated_at = chrono::Utc::now().naive_utc();
            }
        }
        self.reindex();
        Ok(removed)
    }

    /// Depth of an account in its tree: 0 for roots, else 1 + parent depth
    pub fn depth_of(&self, account_id: &str) -> LedgerResult<usize> {
        let mut depth = 0;
        let mut current = self
            .accounts
            .get(account_id)
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))?;
        while let Some(parent_id) = current.parent_id.as_deref() {
            current = self
                .accounts
                .get(parent_id)
                .ok_or_else(|| LedgerError::NotFound(parent_id.to_string()))?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Ordered sequence of accounts from the top-level root down to and
    /// including this account
    pub fn path_of(&self, account_id: &str) -> LedgerResult<Vec<&Account>> {
        let mut path = Vec::new();
        let mut current = Some(account_id);
        while let Some(id) = current {
            let account = self
                .accounts
                .get(id)
                .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
            current = account.parent_id.as_deref();
            path.insert(0, account);
        }
        Ok(path)
    }

    /// Root-to-self account names joined with " / ", for dropdown labeling
    pub fn display_path(&self, account_id: &str) -> LedgerResult<String> {
        let names: Vec<&str> = self
            .path_of(account_id)?
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        Ok(names.join(" / "))
    }

    /// All accounts grouped by type in the fixed order Asset, Liability,
    /// Equity, Revenue, Expense; within each type a pre-order walk of the
    /// forest with roots and sibling groups in ascending lexicographic code
    /// order.
    pub fn ordered_by_type_then_code(&self) -> impl Iterator<Item = &Account> {
        let mut ordered: Vec<&Account> = Vec::with_capacity(self.accounts.len());
        for account_type in AccountType::ALL {
            let mut typed_roots: Vec<&String> = self
                .roots
                .iter()
                .filter(|id| self.accounts[*id].account_type == account_type)
                .collect();
            typed_roots.sort_by(|a, b| self.accounts[*a].code.cmp(&self.accounts[*b].code));
            for root in typed_roots {
                self.collect_preorder(root, &mut ordered);
            }
        }
        ordered.into_iter()
    }

    /// Own balance plus the balances of every descendant
    pub fn rolled_up_balance(&self, account_id: &str) -> LedgerResult<BigDecimal> {
        let account = self
            .accounts
            .get(account_id)
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))?;
        let mut total = account.balance.clone();
        for child_id in self.children_of(account_id).to_vec() {
            total += self.rolled_up_balance(&child_id)?;
        }
        Ok(total)
    }

    /// Apply a posting to an account's balance (see [`Account::apply_posting`])
    pub(crate) fn apply_posting(
        &mut self,
        account_id: &str,
        entry_type: EntryType,
        amount: &BigDecimal,
    ) -> LedgerResult<()> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| LedgerError::UnknownAccount(account_id.to_string()))?;
        account.apply_posting(entry_type, amount);
        Ok(())
    }

    /// Validate a prospective parent link for `account_id`.
    ///
    /// The walk is bounded by the account count, so a corrupt chain can never
    /// loop forever.
    fn check_parent(
        &self,
        account_id: &str,
        parent_id: Option<&str>,
        account_type: AccountType,
    ) -> LedgerResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };
        if parent_id == account_id {
            return Err(LedgerError::Cycle(account_id.to_string()));
        }
        let parent = self.accounts.get(parent_id).ok_or_else(|| {
            LedgerError::InvalidParent(format!("Parent account '{parent_id}' does not exist"))
        })?;
        if parent.account_type != account_type {
            return Err(LedgerError::InvalidParent(format!(
                "Parent account '{}' has type {:?}, expected {:?}",
                parent_id, parent.account_type, account_type
            )));
        }

        // Walk the ancestor chain; hitting the account itself means the new
        // link would close a loop.
        let mut current = Some(parent_id);
        let mut hops = 0;
        while let Some(id) = current {
            if id == account_id {
                return Err(LedgerError::Cycle(account_id.to_string()));
            }
            hops += 1;
            if hops > self.accounts.len() {
                return Err(LedgerError::Cycle(account_id.to_string()));
            }
            current = self
                .accounts
                .get(id)
                .and_then(|a| a.parent_id.as_deref());
        }
        Ok(())
    }

    fn collect_preorder<'a>(&'a self, account_id: &str, out: &mut Vec<&'a Account>) {
        if let Some(account) = self.accounts.get(account_id) {
            out.push(account);
            for child_id in self.children_of(account_id).to_vec() {
                self.collect_preorder(&child_id, out);
            }
        }
    }

    /// Rebuild the adjacency map and root list from the current account set
    fn reindex(&mut self) {
        self.children.clear();
        self.roots.clear();
        for id in &self.order {
            let account = &self.accounts[id];
            match account.parent_id.as_ref() {
                Some(parent_id) => self
                    .children
                    .entry(parent_id.clone())
                    .or_default()
                    .push(id.clone()),
                None => self.roots.push(id.clone()),
            }
        }
        for siblings in self.children.values_mut() {
            siblings.sort_by(|a, b| self.accounts[a].code.cmp(&self.accounts[b].code));
        }
    }
}
