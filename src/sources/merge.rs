//! Cross-source merge.
//!
//! Presence is first-seen-wins and ports are override-wins: a later source can
//! add new addresses and replace the port of an existing one only with an
//! explicit port. No source can remove an address.

use std::net::Ipv4Addr;

use indexmap::IndexMap;

use super::parse::SourceEntry;
use crate::config::DEFAULT_PORT;
use crate::models::Candidate;

/// Address-keyed candidate map preserving insertion order.
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    by_address: IndexMap<Ipv4Addr, u16>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one blob's entries. Blobs must be merged in priority order.
    pub fn merge(&mut self, entries: &[SourceEntry]) {
        for entry in entries {
            match self.by_address.get_mut(&entry.address) {
                None => {
                    self.by_address
                        .insert(entry.address, entry.port.unwrap_or(DEFAULT_PORT));
                }
                Some(port) => {
                    if let Some(explicit) = entry.port {
                        *port = explicit;
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    /// Emits candidates in insertion order, numbered by that order.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.by_address
            .into_iter()
            .enumerate()
            .map(|(ordinal, (address, port))| Candidate {
                address,
                port,
                ordinal,
            })
            .collect()
    }
}

/// Merges parsed blobs (highest priority first) into the final candidate list.
pub fn merge_sources<'a, I>(blobs: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = &'a [SourceEntry]>,
{
    let mut set = CandidateSet::new();
    for entries in blobs {
        set.merge(entries);
    }
    set.into_candidates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse::parse_blob;

    fn merged(blobs: &[&str]) -> Vec<(String, u16)> {
        let parsed: Vec<Vec<SourceEntry>> = blobs.iter().map(|b| parse_blob(b)).collect();
        merge_sources(parsed.iter().map(Vec::as_slice))
            .into_iter()
            .map(|c| (c.address.to_string(), c.port))
            .collect()
    }

    #[test]
    fn test_explicit_override_port_wins() {
        assert_eq!(
            merged(&["1.2.3.4", "1.2.3.4:8443"]),
            vec![("1.2.3.4".to_string(), 8443)]
        );
    }

    #[test]
    fn test_absent_override_port_never_downgrades() {
        assert_eq!(
            merged(&["1.2.3.4:8443", "1.2.3.4"]),
            vec![("1.2.3.4".to_string(), 8443)]
        );
    }

    #[test]
    fn test_primary_order_then_new_secondary() {
        assert_eq!(
            merged(&["2.2.2.2\n1.1.1.1:80", "3.3.3.3\n2.2.2.2:2053"]),
            vec![
                ("1.1.1.1".to_string(), 80),
                ("2.2.2.2".to_string(), 2053),
                ("3.3.3.3".to_string(), 443),
            ]
        );
    }

    #[test]
    fn test_secondary_cannot_remove_primary() {
        assert_eq!(
            merged(&["1.1.1.1\n2.2.2.2", ""]),
            vec![("1.1.1.1".to_string(), 443), ("2.2.2.2".to_string(), 443)]
        );
    }

    #[test]
    fn test_ordinals_follow_insertion_order() {
        let parsed = [parse_blob("9.9.9.9\n8.8.8.8"), parse_blob("7.7.7.7:1")];
        let candidates = merge_sources(parsed.iter().map(Vec::as_slice));
        let ordinals: Vec<usize> = candidates.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(candidates[2].address, Ipv4Addr::new(7, 7, 7, 7));
    }

    #[test]
    fn test_merge_is_deterministic() {
        let blobs = ["5.5.5.5:443\n6.6.6.6\n7.7.7.7", "6.6.6.6:2083\n8.8.8.8"];
        assert_eq!(merged(&blobs), merged(&blobs));
    }

    #[test]
    fn test_addresses_are_unique() {
        let result = merged(&["1.1.1.1\n1.1.1.1:80", "1.1.1.1:81\n1.1.1.1"]);
        assert_eq!(result, vec![("1.1.1.1".to_string(), 81)]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merged(&[]).is_empty());
        assert!(merged(&["", "# nothing"]).is_empty());
    }
}
