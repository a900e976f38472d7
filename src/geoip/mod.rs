//! Country-code annotation of the selected nodes.
//!
//! Lookups are best effort: each address gets a fixed retry budget and
//! anything still unresolved is reported as `XX`.

mod lookup;

use std::net::Ipv4Addr;
use std::sync::Arc;

use log::{debug, info};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;

pub use lookup::{CountryLookup, IpApiLookup};

use crate::config::GeoSettings;
use crate::error_handling::{ErrorType, GeoError, ProcessingStats};
use crate::models::{CountryCode, FinalNode, Selection};
use crate::utils::run_bounded;

/// Retrying wrapper around a [`CountryLookup`].
#[derive(Clone)]
pub struct GeoLocator {
    lookup: Arc<dyn CountryLookup>,
    settings: GeoSettings,
    stats: Arc<ProcessingStats>,
}

impl GeoLocator {
    pub fn new(
        lookup: Arc<dyn CountryLookup>,
        settings: GeoSettings,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            lookup,
            settings,
            stats,
        }
    }

    async fn attempt(&self, ip: Ipv4Addr) -> Result<CountryCode, GeoError> {
        let outcome = match self.lookup.lookup(ip).await {
            Ok(raw) => CountryCode::parse(&raw).ok_or(GeoError::InvalidCode(raw)),
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            debug!("Geolocation of {} failed: {}", ip, e);
            self.stats.increment_error(e.error_type());
        }
        outcome
    }

    /// Country code for `ip`, or `XX` once the retry budget is spent.
    pub async fn resolve(&self, ip: Ipv4Addr) -> CountryCode {
        let strategy = FixedInterval::new(self.settings.retry_delay).take(self.settings.retries);
        match Retry::spawn(strategy, || self.attempt(ip)).await {
            Ok(code) => code,
            Err(_) => {
                self.stats.increment_error(ErrorType::GeoUnresolved);
                CountryCode::unknown()
            }
        }
    }

    /// Annotates every selected node, preserving selection order.
    pub async fn annotate(&self, selection: &Selection) -> Vec<FinalNode> {
        let items: Vec<_> = selection.nodes.iter().copied().enumerate().collect();
        let locator = self.clone();
        let mut outcomes = run_bounded(
            "geolocation",
            items,
            self.settings.concurrency,
            move |(_, node)| {
                let locator = locator.clone();
                async move {
                    let code = locator.resolve(node.candidate.address).await;
                    if !locator.settings.request_pause.is_zero() {
                        tokio::time::sleep(locator.settings.request_pause).await;
                    }
                    code
                }
            },
        )
        .await;
        outcomes.sort_by_key(|((index, _), _)| *index);

        let nodes: Vec<FinalNode> = outcomes
            .into_iter()
            .map(|((_, node), code)| {
                let code = code.unwrap_or_else(|| {
                    self.stats.increment_error(ErrorType::WorkerPanicked);
                    CountryCode::unknown()
                });
                FinalNode::from_selected(node, code)
            })
            .collect();

        info!(
            "Geolocation: {}/{} nodes resolved",
            nodes.iter().filter(|n| !n.country_code.is_unknown()).count(),
            nodes.len()
        );
        nodes
    }
}
