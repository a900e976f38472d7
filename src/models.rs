//! Records passed between pipeline stages.
//!
//! All of these live for a single run. Each stage hands the next one an owned,
//! immutable snapshot of its complete output.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::config::{TOTAL_PACKET_LOSS_PCT, UNKNOWN_COUNTRY_CODE, UNREACHABLE_LATENCY_MS};

/// An address/port pair eligible for testing.
///
/// Identity is the address alone. `ordinal` is the position at which the
/// address was first inserted into the merged set and is the final tie-break
/// for every ordering in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub address: Ipv4Addr,
    pub port: u16,
    pub ordinal: usize,
}

impl Candidate {
    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Outcome of the cheap TCP reachability probe for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub candidate: Candidate,
    /// Average over successful attempts, or the unreachable sentinel
    pub latency_ms: f64,
    /// In `[0, 100]`
    pub packet_loss_pct: f64,
}

impl ProbeResult {
    /// Result for a candidate with zero successful attempts.
    pub fn unreachable(candidate: Candidate) -> Self {
        Self {
            candidate,
            latency_ms: UNREACHABLE_LATENCY_MS,
            packet_loss_pct: TOTAL_PACKET_LOSS_PCT,
        }
    }
}

/// Outcome of the throughput stage for one shortlisted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualificationResult {
    pub candidate: Candidate,
    pub latency_ms: f64,
    pub packet_loss_pct: f64,
    /// Zero when no download succeeded or none was attempted
    pub download_speed_mbps: f64,
    pub qualified: bool,
}

impl QualificationResult {
    /// Result for a candidate whose worker never reported back.
    pub fn failed(candidate: Candidate) -> Self {
        Self {
            candidate,
            latency_ms: UNREACHABLE_LATENCY_MS,
            packet_loss_pct: TOTAL_PACKET_LOSS_PCT,
            download_speed_mbps: 0.0,
            qualified: false,
        }
    }
}

/// How the final list was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Candidates that passed the full latency, loss, and throughput gate,
    /// fastest first.
    Qualified,
    /// No candidate passed the throughput gate; quick-qualified candidates by
    /// ascending latency, download speed not measured.
    Fallback,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Qualified => "qualified",
            SelectionMode::Fallback => "fallback",
        }
    }
}

/// A ranked node before country annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedNode {
    pub candidate: Candidate,
    pub latency_ms: f64,
    pub packet_loss_pct: f64,
    pub download_speed_mbps: f64,
}

/// Ranked, bounded output of the selection engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mode: SelectionMode,
    pub nodes: Vec<SelectedNode>,
}

/// Two uppercase ASCII letters, or the unknown marker `XX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Accepts exactly two alphabetic ASCII characters, in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(CountryCode(raw.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn unknown() -> Self {
        CountryCode(UNKNOWN_COUNTRY_CODE.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_COUNTRY_CODE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The terminal, externally visible record.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalNode {
    pub candidate: Candidate,
    pub latency_ms: f64,
    pub packet_loss_pct: f64,
    pub download_speed_mbps: f64,
    pub country_code: CountryCode,
}

impl FinalNode {
    pub fn from_selected(node: SelectedNode, country_code: CountryCode) -> Self {
        Self {
            candidate: node.candidate,
            latency_ms: node.latency_ms,
            packet_loss_pct: node.packet_loss_pct,
            download_speed_mbps: node.download_speed_mbps,
            country_code,
        }
    }
}
