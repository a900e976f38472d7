//! Candidate text parsing.
//!
//! Turns one raw text blob into an ordered, per-blob deduplicated list of
//! address entries. Malformed tokens are skipped silently.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

/// `address:port` occurrences
static ADDRESS_PORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:\.\d{1,3}){3}):(\d+)").expect("address:port pattern is valid")
});

/// Bare dotted-quad occurrences
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}(?:\.\d{1,3}){3}\b").expect("address pattern is valid")
});

/// Marker that starts a trailing inline comment.
const INLINE_COMMENT_MARKER: &str = " #";

/// One address found in a blob.
///
/// `port` is `None` when the blob named the address without a port; the merge
/// step distinguishes an explicit port from a defaulted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEntry {
    pub address: Ipv4Addr,
    pub port: Option<u16>,
}

/// Drops blank lines, whole-line comments, and trailing inline comments.
pub fn strip_comments(text: &str) -> String {
    let mut cleaned = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let data = match line.split_once(INLINE_COMMENT_MARKER) {
            Some((data, _comment)) => data.trim_end(),
            None => line,
        };
        if !data.is_empty() {
            cleaned.push(data);
        }
    }
    cleaned.join("\n")
}

/// Parses a blob into entries.
///
/// All `address:port` tokens are taken first, in scan order, then every bare
/// address not already seen. The first occurrence of an address wins.
pub fn parse_blob(text: &str) -> Vec<SourceEntry> {
    let cleaned = strip_comments(text);
    let mut entries: Vec<SourceEntry> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for caps in ADDRESS_PORT_PATTERN.captures_iter(&cleaned) {
        let Some(address) = parse_address(&caps[1]) else {
            continue;
        };
        let Some(port) = parse_port(&caps[2]) else {
            log::debug!("Skipping {}:{} (port out of range)", &caps[1], &caps[2]);
            continue;
        };
        if seen.insert(address) {
            entries.push(SourceEntry {
                address,
                port: Some(port),
            });
        }
    }

    for m in ADDRESS_PATTERN.find_iter(&cleaned) {
        let Some(address) = parse_address(m.as_str()) else {
            continue;
        };
        if seen.insert(address) {
            entries.push(SourceEntry {
                address,
                port: None,
            });
        }
    }

    entries
}

/// Parses a dotted quad octet by octet, so zero-padded octets (`010`) read
/// as their decimal value.
fn parse_address(raw: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = raw.split('.');
    for octet in octets.iter_mut() {
        *octet = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(a: [u8; 4], port: Option<u16>) -> SourceEntry {
        SourceEntry {
            address: Ipv4Addr::from(a),
            port,
        }
    }

    #[test]
    fn test_strip_comments() {
        let text = "# header\n\n  1.1.1.1:443 # fast one\n2.2.2.2\n   # indented comment\n";
        assert_eq!(strip_comments(text), "1.1.1.1:443\n2.2.2.2");
    }

    #[test]
    fn test_hash_without_space_is_kept() {
        // Lines in our own output format carry `#CC` without a leading space
        assert_eq!(strip_comments("1.1.1.1:443#US"), "1.1.1.1:443#US");
        assert_eq!(
            parse_blob("1.1.1.1:443#US"),
            vec![entry([1, 1, 1, 1], Some(443))]
        );
    }

    #[test]
    fn test_explicit_ports_before_bare_addresses() {
        let text = "3.3.3.3\n1.1.1.1:8443\n2.2.2.2:2053";
        assert_eq!(
            parse_blob(text),
            vec![
                entry([1, 1, 1, 1], Some(8443)),
                entry([2, 2, 2, 2], Some(2053)),
                entry([3, 3, 3, 3], None),
            ]
        );
    }

    #[test]
    fn test_first_occurrence_wins_within_blob() {
        let text = "1.1.1.1:8443\n1.1.1.1:2096\n1.1.1.1";
        assert_eq!(parse_blob(text), vec![entry([1, 1, 1, 1], Some(8443))]);
    }

    #[test]
    fn test_explicit_port_later_in_blob_beats_bare_earlier() {
        let text = "1.1.1.1\n1.1.1.1:2053";
        assert_eq!(parse_blob(text), vec![entry([1, 1, 1, 1], Some(2053))]);
    }

    #[test]
    fn test_commented_out_address_is_ignored() {
        let text = "1.1.1.1 # was 9.9.9.9:80\n# 8.8.8.8";
        assert_eq!(parse_blob(text), vec![entry([1, 1, 1, 1], None)]);
    }

    #[test]
    fn test_malformed_tokens_skipped() {
        let text = "999.1.1.1\nhello world\n1.2.3\n4.4.4.4:0\n5.5.5.5:70000";
        // Out-of-range ports fall back to the bare pass with no explicit port
        assert_eq!(
            parse_blob(text),
            vec![entry([4, 4, 4, 4], None), entry([5, 5, 5, 5], None)]
        );
    }

    #[test]
    fn test_zero_padded_octets_are_normalized() {
        let text = "01.2.3.4:443\n010.0.0.1\n001.002.003.256";
        assert_eq!(
            parse_blob(text),
            vec![entry([1, 2, 3, 4], Some(443)), entry([10, 0, 0, 1], None)]
        );
    }

    #[test]
    fn test_addresses_embedded_in_free_text() {
        let text = "best: 104.16.1.1:443, backup 172.67.2.2 (slow)";
        assert_eq!(
            parse_blob(text),
            vec![entry([104, 16, 1, 1], Some(443)), entry([172, 67, 2, 2], None)]
        );
    }

    #[test]
    fn test_empty_blob() {
        assert!(parse_blob("").is_empty());
        assert!(parse_blob("# only comments\n\n").is_empty());
    }

    #[test]
    fn test_concatenated_blob_is_idempotent() {
        let text = "1.1.1.1:443\n2.2.2.2\n3.3.3.3:2053 # note\n";
        let twice = format!("{text}{text}");
        assert_eq!(parse_blob(text), parse_blob(&twice));
    }
}
