use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::domain::CountryCode;
use crate::domain::errors::LookupFailure;
use crate::domain::ports::CountryLookup;
use crate::interface_adapters::protocol::CountryIsResponse;

// Thin reqwest client for the country.is IP -> country service.
#[derive(Clone)]
pub struct CountryIsClient {
    http: reqwest::Client,
    pub base_url: String,
}

impl CountryIsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, address: Ipv4Addr) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), address)
    }
}

#[async_trait]
impl CountryLookup for CountryIsClient {
    async fn resolve_country_code(
        &self,
        address: Ipv4Addr,
    ) -> Result<Option<CountryCode>, LookupFailure> {
        let response = self
            .http
            .get(self.url_for(address))
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| LookupFailure::Transport(e.to_string()))?;

        let status = response.status();
        // Unassigned or unknown ranges come back as 404.
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupFailure::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<CountryIsResponse>()
            .await
            .map_err(|e| LookupFailure::Decode(e.to_string()))?;

        Ok(body.country.as_deref().and_then(CountryCode::parse))
    }
}
