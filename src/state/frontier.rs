//! Frontier queue and processed set
//!
//! The frontier is a FIFO of account ids waiting to have their match lists
//! expanded. It may hold the same id more than once; the processed set is
//! consulted on every dequeue so an account is expanded at most once.

use crate::state::AccountId;
use std::collections::{BTreeSet, VecDeque};

/// Breadth-first worklist of accounts plus the record of finished ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    pending: VecDeque<AccountId>,
    processed: BTreeSet<AccountId>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a frontier from persisted parts
    ///
    /// `pending` keeps its order; `processed` is treated as a set.
    pub fn from_parts(
        pending: impl IntoIterator<Item = AccountId>,
        processed: impl IntoIterator<Item = AccountId>,
    ) -> Self {
        Self {
            pending: pending.into_iter().collect(),
            processed: processed.into_iter().collect(),
        }
    }

    /// Pops the next account that has not been processed yet
    ///
    /// Already-processed entries at the head are discarded on the way.
    pub fn dequeue_next(&mut self) -> Option<AccountId> {
        while let Some(account) = self.pending.pop_front() {
            if self.processed.contains(&account) {
                tracing::trace!("Skipping already processed account {}", account);
                continue;
            }
            return Some(account);
        }
        None
    }

    /// Appends an account to the tail unless it was already processed
    ///
    /// # Returns
    ///
    /// `true` if the account was appended
    pub fn enqueue_if_new(&mut self, account: AccountId) -> bool {
        if self.processed.contains(&account) {
            return false;
        }
        self.pending.push_back(account);
        true
    }

    /// Records an account as fully processed. Idempotent.
    pub fn mark_processed(&mut self, account: AccountId) {
        self.processed.insert(account);
    }

    pub fn is_processed(&self, account: &AccountId) -> bool {
        self.processed.contains(account)
    }

    /// Pending entries in queue order (duplicates included)
    pub fn pending(&self) -> impl Iterator<Item = &AccountId> {
        self.pending.iter()
    }

    /// Processed accounts in sorted order
    pub fn processed(&self) -> impl Iterator<Item = &AccountId> {
        self.processed.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
