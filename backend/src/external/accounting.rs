//! Accounting export
//!
//! Only a mocked Xero exporter exists. It waits for a configurable delay and reports
//! success; no payload is built or sent.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AccountingConfig;
use crate::error::AppResult;

/// Outcome of an export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub provider: String,
    pub success: bool,
    pub message: String,
    pub exported_at: DateTime<Utc>,
    /// True when no real accounting system was contacted
    pub mocked: bool,
}

#[async_trait]
pub trait AccountingExporter: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn export(&self) -> AppResult<ExportReceipt>;
}

/// Stand-in for a Xero integration
#[derive(Debug, Clone)]
pub struct MockXeroExporter {
    delay: Duration,
}

impl MockXeroExporter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &AccountingConfig) -> Self {
        Self::new(Duration::from_millis(config.export_delay_ms))
    }
}

#[async_trait]
impl AccountingExporter for MockXeroExporter {
    fn provider(&self) -> &'static str {
        "xero"
    }

    async fn export(&self) -> AppResult<ExportReceipt> {
        tracing::info!("Starting mocked Xero export ({}ms)", self.delay.as_millis());
        tokio::time::sleep(self.delay).await;

        Ok(ExportReceipt {
            provider: self.provider().to_string(),
            success: true,
            message: "Data successfully exported to Xero".to_string(),
            exported_at: Utc::now(),
            mocked: true,
        })
    }
}
