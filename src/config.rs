use std::path::PathBuf;

/// Houston, Texas.
pub const DEFAULT_CENTER: (f64, f64) = (-95.358421, 29.749907);
pub const DEFAULT_LOG_FILE: &str = "polymap.log";

/// Ustawienia aplikacji budowane raz przy starcie i przekazywane dalej jawnie.
///
/// Brak wartości nie jest błędem: pusty adres API sprawi jedynie,
/// że zapytania się nie powiodą.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub map_access_token: String,
    /// Ścieżka lub URL pliku GeoJSON z konturami tła.
    pub basemap: Option<String>,
    pub log_file: PathBuf,
    /// (lon, lat) środka widoku.
    pub center: (f64, f64),
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: lookup("POLYMAP_API_URL").unwrap_or_default(),
            map_access_token: lookup("POLYMAP_MAP_TOKEN").unwrap_or_default(),
            basemap: non_empty("POLYMAP_BASEMAP"),
            log_file: non_empty("POLYMAP_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            center: non_empty("POLYMAP_CENTER")
                .and_then(|v| parse_center(&v))
                .unwrap_or(DEFAULT_CENTER),
        }
    }
}

/// "lon,lat" → (lon, lat)
fn parse_center(raw: &str) -> Option<(f64, f64)> {
    let (lon, lat) = raw.split_once(',')?;
    let lon: f64 = lon.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    ((-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)).then_some((lon, lat))
}
