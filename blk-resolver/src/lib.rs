//! The one network-facing collaborator in the repo: a `ResolveByHash`
//! implementation that fills gaps in a locally built chain index by asking a
//! public block-explorer API, the same role `relayer::bitcoin_client::Client`
//! plays for the teacher's own external Bitcoin node endpoint.

use blk_core::{GapFill, ResolveByHash, ResolverError};
use blk_types::Hash32;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://blockchain.info/rawblock/{hash}";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct RawBlockResponse {
    hash: String,
    prev_block: String,
}

/// Blocking HTTP client resolving a display-hex block hash to its own and
/// parent hashes. Synchronous by design (§5 forbids the core from needing an
/// async runtime).
pub struct HttpResolver {
    endpoint_template: String,
    client: reqwest::blocking::Client,
}

impl HttpResolver {
    pub fn new(endpoint_template: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with a fixed, known-valid config");

        Self {
            endpoint_template: endpoint_template
                .unwrap_or_else(|| DEFAULT_ENDPOINT_TEMPLATE.to_string()),
            client,
        }
    }
}

impl Default for HttpResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ResolveByHash for HttpResolver {
    fn resolve(&self, hash_display_hex: &str) -> Result<GapFill, ResolverError> {
        let url = self.endpoint_template.replace("{hash}", hash_display_hex);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ResolverError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ResolverError::RequestFailed(e.to_string()))?;

        let body: RawBlockResponse = response
            .json()
            .map_err(|e| ResolverError::Unparseable(e.to_string()))?;

        let block_hash = Hash32::from_display_hex(&body.hash)
            .map_err(|e| ResolverError::Unparseable(format!("bad hash field: {e}")))?;
        let prev_block_hash = Hash32::from_display_hex(&body.prev_block)
            .map_err(|e| ResolverError::Unparseable(format!("bad prev_block field: {e}")))?;

        log::debug!("resolved {hash_display_hex} via {url}");

        Ok(GapFill {
            block_hash,
            prev_block_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_template_contains_placeholder() {
        let resolver = HttpResolver::default();
        assert!(resolver.endpoint_template.contains("{hash}"));
    }
}
