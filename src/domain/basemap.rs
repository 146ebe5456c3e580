// Basemap tile providers
/// Tile layer rendered below the data overlay. The client fetches tiles
/// itself; the service only describes the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basemap {
    EsriImagery,
    EsriUsaTopo,
    EsriTerrain,
    CartoDark,
    StamenWatercolor,
    StamenTonerBackground,
}

pub const BASEMAPS: [Basemap; 6] = [
    Basemap::EsriImagery,
    Basemap::EsriUsaTopo,
    Basemap::EsriTerrain,
    Basemap::CartoDark,
    Basemap::StamenWatercolor,
    Basemap::StamenTonerBackground,
];

impl Basemap {
    pub fn key(&self) -> &'static str {
        match self {
            Basemap::EsriImagery => "EsriImagery",
            Basemap::EsriUsaTopo => "EsriUSATopo",
            Basemap::EsriTerrain => "EsriTerrain",
            Basemap::CartoDark => "CartoDark",
            Basemap::StamenWatercolor => "StamenWatercolor",
            Basemap::StamenTonerBackground => "StamenTonerBackground",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        BASEMAPS.iter().copied().find(|b| b.key() == key)
    }

    pub fn url_template(&self) -> &'static str {
        match self {
            Basemap::EsriImagery => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{Z}/{Y}/{X}"
            }
            Basemap::EsriUsaTopo => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/USA_Topo_Maps/MapServer/tile/{Z}/{Y}/{X}"
            }
            Basemap::EsriTerrain => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Terrain_Base/MapServer/tile/{Z}/{Y}/{X}"
            }
            Basemap::CartoDark => "https://cartodb-basemaps-4.global.ssl.fastly.net/dark_all/{Z}/{X}/{Y}.png",
            Basemap::StamenWatercolor => "https://tiles.stadiamaps.com/tiles/stamen_watercolor/{Z}/{X}/{Y}.jpg",
            Basemap::StamenTonerBackground => {
                "https://tiles.stadiamaps.com/tiles/stamen_toner_background/{Z}/{X}/{Y}.png"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Basemap::EsriImagery | Basemap::EsriUsaTopo | Basemap::EsriTerrain => "© Esri",
            Basemap::CartoDark => "© CartoDB, © OpenStreetMap contributors",
            Basemap::StamenWatercolor | Basemap::StamenTonerBackground => {
                "© Stamen Design, © Stadia Maps, © OpenStreetMap contributors"
            }
        }
    }
}
