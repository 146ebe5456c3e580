// Repository trait for telemetry data access
use crate::domain::record::TelemetryRecord;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Run the fixed fleet-telemetry query and decode every row. Called
    /// once at startup; any failure aborts the process before the UI
    /// endpoint opens.
    async fn fetch_fleet_telemetry(&self) -> anyhow::Result<Vec<TelemetryRecord>>;
}
