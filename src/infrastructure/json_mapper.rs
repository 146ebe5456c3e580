// Mapper between domain models and the JSON wire types
use crate::domain::aggregate::{AGGREGATIONS, Aggregation};
use crate::domain::basemap::{BASEMAPS, Basemap};
use crate::domain::dashboard::DashboardView;
use crate::domain::dataset::Dataset;
use crate::domain::mapping::{
    ENERGY_OVER_STEP, MAX_SPREADING, MappingState, StateUpdate, TruckSelection,
};
use crate::domain::raster::Extent;
use crate::domain::shade::{NORMALIZATIONS, Normalization, PALETTES, Palette};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const ALL_TRUCKS: &str = "All";
pub const OVERLAY_PATH: &str = "/dashboard/overlay.png";

#[derive(Debug, Serialize)]
pub struct OptionDto {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct RangeDto {
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ControlsDto {
    pub trucks: Vec<String>,
    pub start_date: DateBoundsDto,
    pub end_date: DateBoundsDto,
    pub energy_over: RangeDto,
    pub agg_fn: Vec<OptionDto>,
    pub normalization: Vec<OptionDto>,
    pub spreading: RangeDto,
    pub cmap: Vec<OptionDto>,
    pub basemap: Vec<OptionDto>,
    pub data_opacity: RangeDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateBoundsDto {
    pub min: String,
    pub max: String,
}

/// Widget-construction description for the presentation shell: every
/// selectable field with its options or bounds.
pub fn controls_to_dto(dataset: &Dataset) -> ControlsDto {
    let (min_date, max_date) = dataset.date_bounds();
    let (min_kwh, max_kwh) = dataset.kwh_per_km_bounds();
    let date_bounds = DateBoundsDto {
        min: min_date.to_string(),
        max: max_date.to_string(),
    };

    let mut trucks: Vec<String> = dataset.trucks().to_vec();
    trucks.push(ALL_TRUCKS.to_string());

    ControlsDto {
        trucks,
        start_date: date_bounds.clone(),
        end_date: date_bounds,
        energy_over: RangeDto {
            min: min_kwh,
            max: max_kwh,
            step: Some(ENERGY_OVER_STEP),
        },
        agg_fn: AGGREGATIONS
            .iter()
            .map(|a| OptionDto {
                key: a.key().to_string(),
                label: a.label().to_string(),
            })
            .collect(),
        normalization: NORMALIZATIONS
            .iter()
            .map(|n| OptionDto {
                key: n.key().to_string(),
                label: n.label().to_string(),
            })
            .collect(),
        spreading: RangeDto {
            min: 0.0,
            max: MAX_SPREADING as f64,
            step: Some(1.0),
        },
        cmap: PALETTES
            .iter()
            .map(|p| OptionDto {
                key: p.key().to_string(),
                label: p.key().to_string(),
            })
            .collect(),
        basemap: BASEMAPS
            .iter()
            .map(|b| OptionDto {
                key: b.key().to_string(),
                label: b.key().to_string(),
            })
            .collect(),
        data_opacity: RangeDto {
            min: 0.0,
            max: 1.0,
            step: None,
        },
    }
}

#[derive(Debug, Serialize)]
pub struct StateDto {
    pub start_date: String,
    pub end_date: String,
    pub truck: String,
    pub energy_over: f64,
    pub agg_fn: String,
    pub normalization: String,
    pub spreading: u8,
    pub cmap: String,
    pub basemap: String,
    pub data_opacity: f64,
}

pub fn state_to_dto(state: &MappingState) -> StateDto {
    StateDto {
        start_date: state.start_date.to_string(),
        end_date: state.end_date.to_string(),
        truck: match &state.truck {
            TruckSelection::All => ALL_TRUCKS.to_string(),
            TruckSelection::Named(name) => name.clone(),
        },
        energy_over: state.energy_over,
        agg_fn: state.agg_fn.key().to_string(),
        normalization: state.normalization.key().to_string(),
        spreading: state.spreading,
        cmap: state.cmap.key().to_string(),
        basemap: state.basemap.key().to_string(),
        data_opacity: state.data_opacity,
    }
}

/// Partial state patch as sent by the shell; unknown enum keys and
/// malformed dates are rejected before the domain bounds check runs.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateUpdateDto {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub truck: Option<String>,
    pub energy_over: Option<f64>,
    pub agg_fn: Option<String>,
    pub normalization: Option<String>,
    pub spreading: Option<u8>,
    pub cmap: Option<String>,
    pub basemap: Option<String>,
    pub data_opacity: Option<f64>,
}

pub fn state_update_from_dto(dto: StateUpdateDto) -> Result<StateUpdate> {
    let parse_date = |raw: &str| -> Result<NaiveDate> {
        raw.parse()
            .with_context(|| format!("unparseable date {:?}", raw))
    };

    let mut update = StateUpdate {
        energy_over: dto.energy_over,
        spreading: dto.spreading,
        data_opacity: dto.data_opacity,
        ..Default::default()
    };

    if let Some(raw) = &dto.start_date {
        update.start_date = Some(parse_date(raw)?);
    }
    if let Some(raw) = &dto.end_date {
        update.end_date = Some(parse_date(raw)?);
    }
    if let Some(truck) = dto.truck {
        update.truck = Some(if truck == ALL_TRUCKS {
            TruckSelection::All
        } else {
            TruckSelection::Named(truck)
        });
    }
    if let Some(key) = &dto.agg_fn {
        update.agg_fn = Some(match Aggregation::from_key(key) {
            Some(agg) => agg,
            None => bail!("unknown aggregation {:?}", key),
        });
    }
    if let Some(key) = &dto.normalization {
        update.normalization = Some(match Normalization::from_key(key) {
            Some(normalization) => normalization,
            None => bail!("unknown normalization {:?}", key),
        });
    }
    if let Some(key) = &dto.cmap {
        update.cmap = Some(match Palette::from_key(key) {
            Some(palette) => palette,
            None => bail!("unknown palette {:?}", key),
        });
    }
    if let Some(key) = &dto.basemap {
        update.basemap = Some(match Basemap::from_key(key) {
            Some(basemap) => basemap,
            None => bail!("unknown basemap {:?}", key),
        });
    }

    Ok(update)
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub map: MapDto,
    pub histogram: HistogramDto,
    pub energy: Vec<BarDto>,
}

#[derive(Debug, Serialize)]
pub struct MapDto {
    pub basemap: BasemapDto,
    pub overlay: OverlayDto,
}

#[derive(Debug, Serialize)]
pub struct BasemapDto {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Serialize)]
pub struct OverlayDto {
    pub url: String,
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<ExtentDto>,
}

#[derive(Debug, Serialize)]
pub struct ExtentDto {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Serialize)]
pub struct HistogramDto {
    pub title: String,
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct BarDto {
    pub label: String,
    pub kwh: f64,
}

pub fn dashboard_to_dto(view: &DashboardView) -> DashboardDto {
    DashboardDto {
        map: MapDto {
            basemap: BasemapDto {
                name: view.map.basemap.key().to_string(),
                url_template: view.map.basemap.url_template().to_string(),
                attribution: view.map.basemap.attribution().to_string(),
            },
            overlay: OverlayDto {
                url: OVERLAY_PATH.to_string(),
                width: view.map.overlay.width,
                height: view.map.overlay.height,
                extent: view.map.extent.map(extent_to_dto),
            },
        },
        histogram: HistogramDto {
            title: "kWh/km".to_string(),
            bin_edges: view.histogram.bin_edges.clone(),
            counts: view.histogram.counts.clone(),
        },
        energy: vec![
            BarDto {
                label: "Total".to_string(),
                kwh: view.energy.total_kwh,
            },
            BarDto {
                label: "Selected".to_string(),
                kwh: view.energy.selected_kwh,
            },
        ],
    }
}

fn extent_to_dto(extent: Extent) -> ExtentDto {
    ExtentDto {
        x_min: extent.x_min,
        x_max: extent.x_max,
        y_min: extent.y_min,
        y_max: extent.y_max,
    }
}
