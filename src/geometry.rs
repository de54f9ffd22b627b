//! Geometria do wyświetlania wyprowadzona z listy rekordów.

use geo::{Centroid, GeodesicArea, Point, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use log::debug;

use crate::model::PolygonRecord;

/// Minimalna liczba pozycji zamkniętego pierścienia.
pub const MIN_RING_POSITIONS: usize = 4;

/// Wielokąt gotowy do narysowania razem z wynikami analizy.
#[derive(Clone, Debug)]
pub struct RenderablePolygon {
    pub name: String,
    pub polygon: Polygon<f64>,
    /// Pole geodezyjne w m²; `None` dla współrzędnych spoza zakresu.
    pub area_m2: Option<f64>,
    pub centroid: Option<Point<f64>>,
}

/// Jeden obiekt na rekord: tylko pierwszy pierścień pierwszego narysowanego obiektu.
/// Rekord bez takiego kształtu daje obiekt bez geometrii.
pub fn derive_collection(records: &[PolygonRecord]) -> FeatureCollection {
    let features = records
        .iter()
        .map(|record| Feature {
            bbox: None,
            geometry: record.first_ring().map(|ring| {
                let ring = ring.iter().map(|pos| pos.to_vec()).collect();
                Geometry::new(Value::Polygon(vec![ring]))
            }),
            id: None,
            properties: Some(JsonObject::new()),
            foreign_members: None,
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}

fn outer_ring_len(feature: &Feature) -> usize {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => rings.first().map_or(0, |ring| ring.len()),
        _ => 0,
    }
}

/// Wielokąty do narysowania. Pierścienie krótsze niż [`MIN_RING_POSITIONS`]
/// są pomijane; rekordy zostają na liście bez zmian.
pub fn renderable_polygons(records: &[PolygonRecord]) -> Vec<RenderablePolygon> {
    let collection = derive_collection(records);

    records
        .iter()
        .zip(collection.features)
        .filter(|(_, feature)| outer_ring_len(feature) >= MIN_RING_POSITIONS)
        .filter_map(|(record, feature)| {
            let value = feature.geometry?.value;
            let polygon: Polygon<f64> = match value.try_into() {
                Ok(polygon) => polygon,
                Err(err) => {
                    debug!("polygon {:?} not renderable: {err}", record.polygon_name);
                    return None;
                }
            };
            Some(RenderablePolygon {
                name: record.polygon_name.clone(),
                area_m2: Some(polygon.geodesic_area_unsigned()).filter(|area| area.is_finite()),
                centroid: polygon.centroid(),
                polygon,
            })
        })
        .collect()
}

/// "1.23 km²" / "850 m²"
pub fn format_area(area_m2: f64) -> String {
    if area_m2 >= 1_000_000.0 {
        format!("{:.2} km²", area_m2 / 1_000_000.0)
    } else {
        format!("{:.0} m²", area_m2)
    }
}
