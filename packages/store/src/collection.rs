//! # Cached collection holder
//!
//! [`Collection`] holds the last list fetched for one resource together with the time
//! it was fetched. It answers a single question for the fetch layer:
//! [`needs_fetch`](Collection::needs_fetch), which is true when the holder is empty,
//! was explicitly invalidated, or is older than its time-to-live.
//!
//! Without a TTL a populated holder is never considered stale, which gives the
//! "fetch once, then serve from memory" behaviour list pages rely on.
//!
//! A holder also remembers the request that filled it. Asking for the same resource
//! with other filters ([`needs_fetch_for`](Collection::needs_fetch_for)) is a miss.

use chrono::{DateTime, Duration, Utc};

use crate::models::SelectOption;

#[derive(Clone, Debug)]
pub struct Collection<T> {
    items: Vec<T>,
    fetched_at: Option<DateTime<Utc>>,
    ttl: Option<Duration>,
    source: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            fetched_at: None,
            ttl: None,
            source: None,
        }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to expire the collection `ttl` after each fetch.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Replace the content with a fresh server response.
    pub fn set(&mut self, items: Vec<T>) {
        self.set_at(items, Utc::now());
    }

    pub fn set_at(&mut self, items: Vec<T>, now: DateTime<Utc>) {
        self.items = items;
        self.fetched_at = Some(now);
        self.source = None;
    }

    /// [`set`](Self::set), remembering the request the items answer.
    pub fn set_from(&mut self, items: Vec<T>, source: impl Into<String>) {
        self.set(items);
        self.source = Some(source.into());
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Mark the content stale without dropping it.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.fetched_at = None;
        self.source = None;
    }

    pub fn needs_fetch(&self) -> bool {
        self.needs_fetch_at(Utc::now())
    }

    pub fn needs_fetch_at(&self, now: DateTime<Utc>) -> bool {
        if self.items.is_empty() {
            return true;
        }
        match (self.fetched_at, self.ttl) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(at), Some(ttl)) => now - at >= ttl,
        }
    }

    /// [`needs_fetch`](Self::needs_fetch), also true when the content answers
    /// another request than `source`.
    pub fn needs_fetch_for(&self, source: &str) -> bool {
        self.needs_fetch() || self.source.as_deref().is_some_and(|s| s != source)
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Dropdown options for every item.
    pub fn options(&self) -> Vec<SelectOption>
    where
        for<'a> &'a T: Into<SelectOption>,
    {
        self.items.iter().map(|item| item.into()).collect()
    }
}
