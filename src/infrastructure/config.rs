use crate::application::dashboard_service::RenderSettings;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseConfig {
    pub warehouse: WarehouseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseSettings {
    pub host: String,
    pub token: String,
    pub database: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_plot_width")]
    pub plot_width: usize,
    #[serde(default = "default_plot_height")]
    pub plot_height: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_plot_width() -> usize {
    800
}

fn default_plot_height() -> usize {
    600
}

fn default_histogram_bins() -> usize {
    20
}

impl DashboardConfig {
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            plot_width: self.plot_width,
            plot_height: self.plot_height,
            histogram_bins: self.histogram_bins,
        }
    }
}

pub fn load_warehouse_config() -> anyhow::Result<WarehouseConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/warehouse"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_defaults() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        let settings = config.render_settings();
        assert_eq!(settings.plot_width, 800);
        assert_eq!(settings.plot_height, 600);
        assert_eq!(settings.histogram_bins, 20);
    }
}
