//! In-memory customer directory for one domain session.
//!
//! Entries keep insertion order. A customer being created is held as a
//! provisional entry keyed by its `CreationTicket` until the backend
//! confirms the authoritative id, at which point that one entry is
//! replaced in place.

use crate::types::CustomerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id:         CustomerId,
    pub name:       String,
    pub profile_id: CustomerId,
}

impl Customer {
    pub fn from_id(id: impl Into<CustomerId>) -> Self {
        let id = id.into();
        Self {
            name:       format!("Client {id}"),
            profile_id: id.clone(),
            id,
        }
    }
}

/// Handle for one in-flight creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreationTicket(Uuid);

impl CreationTicket {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    customer: Customer,
    pending:  Option<CreationTicket>,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    entries: Vec<Entry>,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from backend ids in the order they were returned.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CustomerId>,
    {
        let mut dir = Self::new();
        for id in ids {
            dir.insert(Customer::from_id(id));
        }
        dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.entries.iter().map(|e| &e.customer)
    }

    pub fn to_vec(&self) -> Vec<Customer> {
        self.customers().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.customers().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append unless an entry with the same id exists. Returns whether the
    /// customer was added.
    pub fn insert(&mut self, customer: Customer) -> bool {
        if self.contains(&customer.id) {
            return false;
        }
        self.entries.push(Entry { customer, pending: None });
        true
    }

    /// Replace the confirmed entries with a fresh server listing. Pending
    /// creations survive at the end of the list.
    pub fn replace_all(&mut self, fresh: CustomerDirectory) {
        let pending: Vec<Entry> = self
            .entries
            .drain(..)
            .filter(|e| e.pending.is_some())
            .collect();
        self.entries = fresh.entries;
        for entry in pending {
            if !self.contains(&entry.customer.id) {
                self.entries.push(entry);
            }
        }
    }

    /// Case-insensitive substring match on name or profile id. A blank
    /// query returns every customer in directory order. Surrounding
    /// whitespace in a non-blank query is part of the needle.
    pub fn search(&self, query: &str) -> Vec<Customer> {
        if query.trim().is_empty() {
            return self.to_vec();
        }
        let needle = query.to_lowercase();
        self.customers()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.profile_id.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    // ── Two-phase creation ────────────────────────────────────────

    /// Record a provisional entry under the client-generated placeholder id.
    pub fn begin_creation(&mut self, placeholder: impl Into<CustomerId>) -> CreationTicket {
        let ticket = CreationTicket::new();
        self.entries.push(Entry {
            customer: Customer::from_id(placeholder),
            pending:  Some(ticket),
        });
        ticket
    }

    /// Confirm the provisional entry for `ticket` under the authoritative
    /// id. If another entry already carries that id the provisional one is
    /// dropped instead, so the customer appears exactly once. Returns the
    /// confirmed customer, or `None` for an unknown ticket.
    pub fn commit_creation(
        &mut self,
        ticket: CreationTicket,
        authoritative: impl Into<CustomerId>,
    ) -> Option<Customer> {
        let authoritative = authoritative.into();
        let pos = self.position_of(ticket)?;

        let duplicate = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != pos && e.customer.id == authoritative);

        if duplicate {
            self.entries.remove(pos);
            return self.get(&authoritative).cloned();
        }

        let entry = &mut self.entries[pos];
        entry.customer = Customer::from_id(authoritative);
        entry.pending = None;
        Some(entry.customer.clone())
    }

    /// Drop the provisional entry for `ticket`.
    pub fn abort_creation(&mut self, ticket: CreationTicket) -> bool {
        match self.position_of(ticket) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.pending.is_some()).count()
    }

    fn position_of(&self, ticket: CreationTicket) -> Option<usize> {
        self.entries.iter().position(|e| e.pending == Some(ticket))
    }
}
