// Warehouse repository implementation
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::record::TelemetryRecord;
use crate::infrastructure::projection::lon_lat_to_easting_northing;
use crate::infrastructure::query::fleet_telemetry_query;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Telemetry loader over the warehouse SQL gateway. Runs the fixed query
/// once at startup and decodes every row; any failure is fatal, there is
/// no partial-load recovery.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    host: String,
    token: String,
    database: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<String>,
}

impl WarehouseRepository {
    pub fn new(host: String, token: String, database: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&q={}",
            self.host, self.database, encoded_query
        )
    }

    async fn execute_query(&self, query: &str) -> Result<QueryResponse> {
        let url = self.build_query_url(query);

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to the warehouse gateway")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Warehouse query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<QueryResponse>()
            .await
            .context("Failed to parse warehouse response")?;

        if let Some(error) = &data.error {
            anyhow::bail!("Warehouse query error: {}", error);
        }

        Ok(data)
    }
}

#[async_trait]
impl TelemetryRepository for WarehouseRepository {
    async fn fetch_fleet_telemetry(&self) -> Result<Vec<TelemetryRecord>> {
        let query = fleet_telemetry_query(&self.database);
        tracing::debug!("Executing fleet telemetry query against {}", self.host);
        let response = self.execute_query(&query).await?;
        tracing::debug!("Warehouse returned {} rows", response.rows.len());
        decode_records(&response)
    }
}

/// Decode gateway rows into records by column-name position lookup, so
/// the decoding is independent of column order.
fn decode_records(response: &QueryResponse) -> Result<Vec<TelemetryRecord>> {
    let column = |name: &str| -> Result<usize> {
        response
            .columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("warehouse response is missing column {:?}", name))
    };

    let truck_idx = column("truck")?;
    let date_time_idx = column("date_time")?;
    let lon_idx = column("lon")?;
    let lat_idx = column("lat")?;
    let speed_idx = column("speed_km_h")?;
    let altitude_idx = column("altitude_m")?;
    let avg_kwh_idx = column("avg_kwh")?;
    let sum_kwh_idx = column("sum_kwh")?;
    let distance_idx = column("distance_travelled_km")?;
    let samples_idx = column("nr_samples")?;
    let kwh_km_idx = column("kwh_km")?;

    let mut records = Vec::with_capacity(response.rows.len());
    for (row_nr, row) in response.rows.iter().enumerate() {
        let context = |what: &str| format!("row {}: bad {}", row_nr, what);

        let truck = row
            .get(truck_idx)
            .and_then(|v| v.as_str())
            .with_context(|| context("truck"))?
            .to_string();
        let date_time = parse_date_time(
            row.get(date_time_idx)
                .and_then(|v| v.as_str())
                .with_context(|| context("date_time"))?,
        )
        .with_context(|| context("date_time"))?;

        // The query filters null positions; a null here means the gateway
        // broke the contract, and startup must fail.
        let lon = number(row.get(lon_idx)).with_context(|| context("lon"))?;
        let lat = number(row.get(lat_idx)).with_context(|| context("lat"))?;
        let (easting, northing) = lon_lat_to_easting_northing(lon, lat);

        records.push(TelemetryRecord {
            truck,
            date_time,
            lon,
            lat,
            easting,
            northing,
            speed_km_h: number(row.get(speed_idx)).with_context(|| context("speed_km_h"))?,
            altitude_m: number(row.get(altitude_idx)).with_context(|| context("altitude_m"))?,
            distance_travelled_km: number(row.get(distance_idx))
                .with_context(|| context("distance_travelled_km"))?,
            avg_kwh: number(row.get(avg_kwh_idx)).with_context(|| context("avg_kwh"))?,
            sum_kwh: number(row.get(sum_kwh_idx)).with_context(|| context("sum_kwh"))?,
            kwh_per_km: number(row.get(kwh_km_idx)).with_context(|| context("kwh_km"))?,
            nr_samples: number(row.get(samples_idx)).with_context(|| context("nr_samples"))?
                as i64,
        });
    }

    Ok(records)
}

/// Gateways emit numerics either as JSON numbers or as decimal strings.
fn number(value: Option<&serde_json::Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn parse_date_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .with_context(|| format!("unparseable timestamp {:?}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(columns: &[&str], rows: serde_json::Value) -> QueryResponse {
        QueryResponse {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: serde_json::from_value(rows).unwrap(),
            error: None,
        }
    }

    const COLUMNS: [&str; 11] = [
        "truck",
        "date_time",
        "lon",
        "lat",
        "speed_km_h",
        "altitude_m",
        "avg_kwh",
        "sum_kwh",
        "distance_travelled_km",
        "nr_samples",
        "kwh_km",
    ];

    #[test]
    fn test_decode_row() {
        let response = response(
            &COLUMNS,
            json!([[
                "T-01",
                "2021-07-01 10:15:00.000000",
                18.0686,
                59.3293,
                55.0,
                "21.0",
                0.9,
                1.8,
                1.2,
                55,
                1.5
            ]]),
        );
        let records = decode_records(&response).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.truck, "T-01");
        assert_eq!(
            record.date_time,
            NaiveDateTime::parse_from_str("2021-07-01 10:15:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
        // String-encoded numerics decode too.
        assert_eq!(record.altitude_m, 21.0);
        assert_eq!(record.nr_samples, 55);
        assert!((record.easting - 2_011_387.0).abs() < 10.0);
        assert!(record.northing > 8_000_000.0);
    }

    #[test]
    fn test_decode_is_column_order_independent() {
        let mut shuffled: Vec<&str> = COLUMNS.to_vec();
        shuffled.reverse();
        let response = response(
            &shuffled,
            json!([[
                1.5,
                55,
                1.2,
                1.8,
                0.9,
                21.0,
                55.0,
                59.3293,
                18.0686,
                "2021-07-01 10:15:00",
                "T-01"
            ]]),
        );
        let records = decode_records(&response).unwrap();
        assert_eq!(records[0].truck, "T-01");
        assert_eq!(records[0].kwh_per_km, 1.5);
    }

    #[test]
    fn test_null_geometry_is_rejected() {
        let response = response(
            &COLUMNS,
            json!([[
                "T-01",
                "2021-07-01 10:15:00",
                null,
                59.3293,
                55.0,
                21.0,
                0.9,
                1.8,
                1.2,
                55,
                1.5
            ]]),
        );
        let error = decode_records(&response).unwrap_err();
        assert!(error.to_string().contains("lon"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let response = response(&COLUMNS[..10], json!([]));
        let error = decode_records(&response).unwrap_err();
        assert!(error.to_string().contains("kwh_km"));
    }

    #[test]
    fn test_query_url_encodes_sql() {
        let repository = WarehouseRepository::new(
            "https://warehouse.example.com/".to_string(),
            "secret".to_string(),
            "fleet_reporting".to_string(),
        );
        let url = repository.build_query_url("SELECT 1");
        assert_eq!(
            url,
            "https://warehouse.example.com/query?db=fleet_reporting&q=SELECT%201"
        );
    }
}
