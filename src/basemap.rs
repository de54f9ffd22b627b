use std::{fs, path::Path, str::FromStr, time::Duration};

use geo::{Area, Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;
use log::info;
use reqwest::blocking::Client;
use thiserror::Error;

/// Części wielokąta mniejsze niż ten ułamek największej są pomijane.
const SLIVER_RATIO: f64 = 0.20;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum BasemapError {
    #[error("cannot read basemap file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid basemap GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("cannot download basemap: {0}")]
    Fetch(String),
}

/// Kontury tła rysowane pod wielokątami.
pub struct Basemap {
    outlines: Vec<MultiPolygon<f64>>,
}

impl Basemap {
    /// Wczytuje GeoJSON z pliku albo z adresu http(s); do adresu dokładany jest token mapy.
    pub fn load(source: &str, access_token: &str) -> Result<Self, BasemapError> {
        let text = if source.starts_with("http://") || source.starts_with("https://") {
            fetch(source, access_token)?
        } else {
            fs::read_to_string(Path::new(source))?
        };
        let basemap = Self::from_geojson(GeoJson::from_str(&text)?)?;
        info!("basemap {source}: {} outlines", basemap.outlines.len());
        Ok(basemap)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self, BasemapError> {
        let mut outlines = Vec::new();

        if let GeoJson::FeatureCollection(fc) = raw {
            for feature in fc.features {
                if let Some(gj) = feature.geometry {
                    let geom: Geometry<f64> = gj.value.try_into()?;
                    let mp = match geom {
                        Geometry::Polygon(p) => p.into(),
                        Geometry::MultiPolygon(m) => drop_slivers(m),
                        _ => continue,
                    };
                    outlines.push(mp);
                }
            }
        }

        Ok(Self { outlines })
    }

    pub fn outlines(&self) -> &[MultiPolygon<f64>] {
        &self.outlines
    }
}

/// Przy wielu częściach zostawia tylko te istotne.
fn drop_slivers(mp: MultiPolygon<f64>) -> MultiPolygon<f64> {
    if mp.0.len() <= 1 {
        return mp;
    }
    let max_area = mp.0.iter().map(|p| p.unsigned_area()).fold(0.0, f64::max);
    let threshold = max_area * SLIVER_RATIO;
    let kept: Vec<Polygon<f64>> = mp.0.iter().filter(|p| p.unsigned_area() >= threshold).cloned().collect();
    if kept.is_empty() { mp } else { MultiPolygon(kept) }
}

fn fetch(url: &str, access_token: &str) -> Result<String, BasemapError> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|err| BasemapError::Fetch(err.to_string()))?;
    let mut request = client.get(url);
    if !access_token.is_empty() {
        request = request.query(&[("access_token", access_token)]);
    }
    let response = request.send().map_err(|err| BasemapError::Fetch(err.to_string()))?;
    if !response.status().is_success() {
        return Err(BasemapError::Fetch(format!("{url} responded with {}", response.status())));
    }
    response.text().map_err(|err| BasemapError::Fetch(err.to_string()))
}
