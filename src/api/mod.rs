use anyhow::Result;
use std::time::Duration;

use crate::models::{FinancialStatement, StatementType};

pub mod yahoo_client;
pub use yahoo_client::YahooFundamentalsClient;

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// The opaque financial data provider boundary. One call returns the full
/// tabular statement for a ticker symbol and statement category.
#[async_trait::async_trait]
pub trait StatementProvider {
    async fn fetch_statement(
        &self,
        symbol: &str,
        statement_type: StatementType,
    ) -> Result<FinancialStatement>;
}
