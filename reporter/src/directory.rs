//! Node directory fetch from the dashboard API.

use std::time::Duration;

use era_stats::{NodeDirectoryResponse, NodeRecord, StatsError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}

/// `GET {url}`, expecting `{"nodes": [...]}`. Any transport failure, non-2xx
/// status or malformed body is an upstream error.
pub async fn fetch_node_records(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<NodeRecord>, StatsError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(StatsError::upstream)?;

    let body: NodeDirectoryResponse = response.json().await.map_err(StatsError::upstream)?;
    log::info!("Node directory lists {} nodes", body.nodes.len());
    Ok(body.nodes)
}
