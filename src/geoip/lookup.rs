//! Country lookup seam and the ip-api.com client.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error_handling::GeoError;

/// A single, unretried country lookup.
///
/// Returns the raw country code as reported by the service; validation is
/// the caller's job.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn lookup(&self, ip: Ipv4Addr) -> Result<String, GeoError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    status: Option<String>,
    message: Option<String>,
}

/// JSON lookup against an ip-api.com style endpoint.
///
/// `api_url` is a template; `{ip}` is replaced by the address.
#[derive(Debug, Clone)]
pub struct IpApiLookup {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl IpApiLookup {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            timeout,
        }
    }

    fn url_for(&self, ip: Ipv4Addr) -> String {
        self.api_url.replace("{ip}", &ip.to_string())
    }
}

#[async_trait]
impl CountryLookup for IpApiLookup {
    async fn lookup(&self, ip: Ipv4Addr) -> Result<String, GeoError> {
        let response = self
            .client
            .get(self.url_for(ip))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: IpApiResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::Payload(e.to_string()))?;

        match payload.country_code {
            Some(code) => Ok(code),
            None => Err(GeoError::Payload(format!(
                "no countryCode (status: {}, message: {})",
                payload.status.as_deref().unwrap_or("-"),
                payload.message.as_deref().unwrap_or("-")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_template() {
        let lookup = IpApiLookup::new(
            reqwest::Client::new(),
            "http://ip-api.com/json/{ip}?fields=countryCode",
            Duration::from_secs(1),
        );
        assert_eq!(
            lookup.url_for(Ipv4Addr::new(1, 2, 3, 4)),
            "http://ip-api.com/json/1.2.3.4?fields=countryCode"
        );
    }

    #[test]
    fn test_response_parsing() {
        let ok: IpApiResponse =
            serde_json::from_str(r#"{"status":"success","countryCode":"DE","query":"1.2.3.4"}"#)
                .expect("valid");
        assert_eq!(ok.country_code.as_deref(), Some("DE"));

        let failed: IpApiResponse =
            serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).expect("valid");
        assert!(failed.country_code.is_none());
        assert_eq!(failed.message.as_deref(), Some("private range"));
    }
}
