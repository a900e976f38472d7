//! Error type definitions.
//!
//! Component seams return these typed errors. Stages absorb them into sentinel
//! measurements and count them by `ErrorType`; only `PipelineError` ever
//! terminates a run.

use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Conditions that terminate a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Every configured source yielded zero candidates.
    #[error("no input: every source yielded zero candidates")]
    NoInput,
}

/// A single failed TCP connect attempt.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("connect to {addr} timed out after {timeout:?}")]
    Timeout {
        addr: SocketAddrV4,
        timeout: Duration,
    },

    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddrV4,
        #[source]
        source: io::Error,
    },
}

impl ProbeError {
    pub fn error_type(&self) -> ErrorType {
        match self {
            ProbeError::Timeout { .. } => ErrorType::TcpConnectTimeout,
            ProbeError::Connect { source, .. }
                if source.kind() == io::ErrorKind::ConnectionRefused =>
            {
                ErrorType::TcpConnectRefused
            }
            ProbeError::Connect { .. } => ErrorType::TcpConnectOther,
        }
    }
}

/// A failed download against one benchmark endpoint.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("invalid benchmark URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("benchmark endpoint returned HTTP {0}")]
    Status(u16),

    #[error("download timed out")]
    Timeout,

    #[error("download transport error: {0}")]
    Transport(#[source] ReqwestError),

    #[error("benchmark endpoint returned an empty body")]
    EmptyBody,
}

impl From<ReqwestError> for DownloadError {
    fn from(e: ReqwestError) -> Self {
        if e.is_timeout() {
            DownloadError::Timeout
        } else if let Some(status) = e.status() {
            DownloadError::Status(status.as_u16())
        } else {
            DownloadError::Transport(e)
        }
    }
}

impl DownloadError {
    pub fn error_type(&self) -> ErrorType {
        match self {
            DownloadError::InvalidUrl { .. } => ErrorType::DownloadInvalidUrl,
            DownloadError::Status(_) => ErrorType::DownloadHttpStatus,
            DownloadError::Timeout => ErrorType::DownloadTimeout,
            DownloadError::Transport(_) => ErrorType::DownloadTransport,
            DownloadError::EmptyBody => ErrorType::DownloadSizeMismatch,
        }
    }
}

/// A failed geolocation request.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Request(#[from] ReqwestError),

    #[error("geolocation service returned HTTP {0}")]
    Status(u16),

    #[error("malformed geolocation payload: {0}")]
    Payload(String),

    #[error("geolocation returned invalid country code {0:?}")]
    InvalidCode(String),
}

impl GeoError {
    pub fn error_type(&self) -> ErrorType {
        match self {
            GeoError::Request(_) => ErrorType::GeoRequestError,
            GeoError::Status(_) => ErrorType::GeoHttpStatus,
            GeoError::Payload(_) => ErrorType::GeoMalformedPayload,
            GeoError::InvalidCode(_) => ErrorType::GeoInvalidCode,
        }
    }
}

/// Failure categories counted during a run.
///
/// None of these abort the run; they are printed as a summary at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Sources
    SourceUnavailable,
    // Reachability
    TcpConnectRefused,
    TcpConnectTimeout,
    TcpConnectOther,
    // Throughput
    DownloadInvalidUrl,
    DownloadHttpStatus,
    DownloadTimeout,
    DownloadTransport,
    DownloadSizeMismatch,
    // Geolocation
    GeoRequestError,
    GeoHttpStatus,
    GeoMalformedPayload,
    GeoInvalidCode,
    GeoUnresolved,
    // Workers
    WorkerPanicked,
}

impl ErrorType {
    /// Human-readable label used in the end-of-run summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::SourceUnavailable => "Source unavailable or empty",
            ErrorType::TcpConnectRefused => "TCP connect refused",
            ErrorType::TcpConnectTimeout => "TCP connect timeout",
            ErrorType::TcpConnectOther => "TCP connect error",
            ErrorType::DownloadInvalidUrl => "Invalid benchmark URL",
            ErrorType::DownloadHttpStatus => "Benchmark HTTP status error",
            ErrorType::DownloadTimeout => "Benchmark download timeout",
            ErrorType::DownloadTransport => "Benchmark transport error",
            ErrorType::DownloadSizeMismatch => "Benchmark size mismatch",
            ErrorType::GeoRequestError => "Geolocation request error",
            ErrorType::GeoHttpStatus => "Geolocation HTTP status error",
            ErrorType::GeoMalformedPayload => "Geolocation malformed payload",
            ErrorType::GeoInvalidCode => "Geolocation invalid country code",
            ErrorType::GeoUnresolved => "Country code unresolved (XX)",
            ErrorType::WorkerPanicked => "Worker task panicked",
        }
    }
}
