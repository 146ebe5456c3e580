// In-memory telemetry dataset, immutable after load
use crate::domain::record::TelemetryRecord;
use anyhow::{Result, bail};
use chrono::NaiveDate;

/// The full telemetry table, loaded once at startup. Records are kept
/// sorted by timestamp ascending; all derived bounds are computed at
/// construction so state validation never re-scans the table.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<TelemetryRecord>,
    trucks: Vec<String>,
    min_date: NaiveDate,
    max_date: NaiveDate,
    min_kwh_per_km: f64,
    max_kwh_per_km: f64,
    total_energy_kwh: f64,
}

impl Dataset {
    pub fn new(mut records: Vec<TelemetryRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("telemetry query returned no rows; dataset bounds would be undefined");
        }

        records.sort_by_key(|r| r.date_time);

        let mut trucks: Vec<String> = Vec::new();
        for record in &records {
            if !trucks.iter().any(|t| t == &record.truck) {
                trucks.push(record.truck.clone());
            }
        }

        let min_date = records[0].date_time.date();
        let max_date = records[records.len() - 1].date_time.date();

        let mut min_kwh_per_km = f64::INFINITY;
        let mut max_kwh_per_km = f64::NEG_INFINITY;
        let mut total_energy_kwh = 0.0;
        for record in &records {
            min_kwh_per_km = min_kwh_per_km.min(record.kwh_per_km);
            max_kwh_per_km = max_kwh_per_km.max(record.kwh_per_km);
            total_energy_kwh += record.sum_kwh;
        }

        Ok(Self {
            records,
            trucks,
            min_date,
            max_date,
            min_kwh_per_km,
            max_kwh_per_km,
            total_energy_kwh,
        })
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    /// Distinct truck ids, in first-seen (timestamp) order.
    pub fn trucks(&self) -> &[String] {
        &self.trucks
    }

    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, self.max_date)
    }

    pub fn kwh_per_km_bounds(&self) -> (f64, f64) {
        (self.min_kwh_per_km, self.max_kwh_per_km)
    }

    /// Sum of sum_kwh over the whole table (the "Total" bar).
    pub fn total_energy_kwh(&self) -> f64 {
        self.total_energy_kwh
    }
}
