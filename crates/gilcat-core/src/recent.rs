//! Caller-owned search-history ring.
//!
//! The buffer is an explicit value the caller owns and threads around, so
//! two independent surfaces never share history through a hidden global.
//! It serialises, so a caller may persist it between runs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearches {
  capacity: usize,
  entries:  VecDeque<String>,
}

impl RecentSearches {
  /// `capacity` is clamped to at least 1.
  pub fn new(capacity: usize) -> Self {
    Self { capacity: capacity.max(1), entries: VecDeque::new() }
  }

  /// Record `query` as the most recent search. Surrounding whitespace is
  /// trimmed and blank queries are dropped. An existing entry (compared
  /// case-insensitively) moves to the front instead of duplicating; past
  /// capacity the oldest entry is evicted.
  pub fn push(&mut self, query: &str) {
    let query = query.trim();
    if query.is_empty() {
      return;
    }
    let lowered = query.to_lowercase();
    self.entries.retain(|e| e.to_lowercase() != lowered);
    self.entries.push_front(query.to_string());
    self.entries.truncate(self.capacity);
  }

  /// Most-recent-first.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn newest_first() {
    let mut recent = RecentSearches::new(5);
    recent.push("tabby");
    recent.push("calico");
    assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["calico", "tabby"]);
  }

  #[test]
  fn capacity_evicts_oldest() {
    let mut recent = RecentSearches::new(2);
    recent.push("one");
    recent.push("two");
    recent.push("three");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["three", "two"]);
  }

  #[test]
  fn duplicates_move_to_front_case_insensitively() {
    let mut recent = RecentSearches::new(5);
    recent.push("Tabby");
    recent.push("calico");
    recent.push("tabby");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["tabby", "calico"]);
  }

  #[test]
  fn blank_queries_are_dropped() {
    let mut recent = RecentSearches::new(5);
    recent.push("   ");
    recent.push("");
    assert!(recent.is_empty());
  }

  #[test]
  fn zero_capacity_is_clamped() {
    let mut recent = RecentSearches::new(0);
    recent.push("x");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent.capacity(), 1);
  }

  #[test]
  fn round_trips_through_serde() {
    let mut recent = RecentSearches::new(3);
    recent.push("tabby");
    recent.push("market");
    let raw = serde_json::to_string(&recent).unwrap();
    let back: RecentSearches = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, recent);
  }
}
