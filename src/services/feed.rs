use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;

use crate::types::models::Curve;

pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.goldsky.com/api/public/project_cmjjrebt3mxpt01rm9yi04vqq/subgraphs/pump-charts/v2/gn";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const LATEST_CURVES_QUERY: &str = r#"
  query LatestCurves($first: Int!) {
    curves(first: $first, orderBy: createdAt, orderDirection: desc) {
      id
      createdAt
      token
      name
      symbol
      uri
      creator
      graduated
      lastPriceUsd
      lastPriceEth
      totalVolumeEth
      tradeCount
      lastTradeAt
    }
  }
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<CurvesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct CurvesData {
    curves: Vec<Curve>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Client for the curves subgraph. Each call fetches a fresh batch;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    page_size: u32,
}

impl FeedClient {
    pub fn new(url: String, page_size: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            page_size,
        }
    }

    pub fn from_env() -> Self {
        let url = env::var("SUBGRAPH_URL").unwrap_or_else(|_| DEFAULT_SUBGRAPH_URL.to_string());
        let page_size = env::var("FEED_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self::new(url, page_size)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Latest curves, newest first, as the subgraph returns them.
    pub async fn latest_curves(&self) -> Result<Vec<Curve>> {
        let body = serde_json::json!({
            "query": LATEST_CURVES_QUERY,
            "variables": { "first": self.page_size },
        });

        let response = self.http.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Subgraph returned status {}", response.status()));
        }

        let payload: GraphQlResponse = response.json().await?;
        match payload.data {
            Some(data) => Ok(data.curves),
            None => {
                let message = payload
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "empty response".to_string());
                Err(anyhow!("Subgraph query failed: {}", message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_curves_payload() {
        let body = r#"{
            "data": {
                "curves": [
                    {
                        "id": "0x01",
                        "createdAt": "1700000000",
                        "token": "0xaa",
                        "name": "Pepe",
                        "symbol": "PEPE",
                        "uri": "ipfs://cid1",
                        "creator": "0xbb",
                        "graduated": true,
                        "lastPriceUsd": "0.0000082",
                        "lastPriceEth": "0.0000000031",
                        "totalVolumeEth": "12.5",
                        "tradeCount": "845",
                        "lastTradeAt": "1700000300"
                    },
                    {
                        "id": "0x02",
                        "createdAt": "1700000100",
                        "token": "0xcc",
                        "name": "Mog",
                        "symbol": "MOG",
                        "uri": "ipfs://cid2",
                        "creator": "0xdd",
                        "graduated": false,
                        "lastPriceUsd": "0",
                        "lastPriceEth": "0",
                        "totalVolumeEth": "0",
                        "tradeCount": "0",
                        "lastTradeAt": null
                    }
                ]
            }
        }"#;

        let payload: GraphQlResponse = serde_json::from_str(body).unwrap();
        let curves = payload.data.unwrap().curves;
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].symbol, "PEPE");
        assert!(curves[0].graduated);
        assert!(curves[1].last_trade_at.is_none());
    }

    #[test]
    fn surfaces_graphql_errors() {
        let body = r#"{
            "errors": [{ "message": "indexing_error" }]
        }"#;

        let payload: GraphQlResponse = serde_json::from_str(body).unwrap();
        assert!(payload.data.is_none());
        assert_eq!(payload.errors[0].message, "indexing_error");
    }
}
