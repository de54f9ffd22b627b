use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

/// Geometria narysowanego obiektu: znacznik typu (np. "Polygon") i surowe współrzędne.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl FeatureGeometry {
    pub fn polygon(ring: &[[f64; 2]]) -> Self {
        Self { kind: "Polygon".to_string(), coordinates: json!([ring]) }
    }

    /// Pierwszy pierścień jako pary [lon, lat]; `None`, gdy kształt jest inny.
    pub fn first_ring(&self) -> Option<Vec<[f64; 2]>> {
        let ring = self.coordinates.as_array()?.first()?.as_array()?;
        ring.iter()
            .map(|pos| {
                let pos = pos.as_array()?;
                Some([pos.first()?.as_f64()?, pos.get(1)?.as_f64()?])
            })
            .collect()
    }
}

/// Obiekt wyemitowany przez narzędzie rysowania (GeoJSON Feature).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawnFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default = "feature_tag")]
    pub tag: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub geometry: Option<FeatureGeometry>,
}

fn feature_tag() -> String {
    "Feature".to_string()
}

impl DrawnFeature {
    pub fn polygon(id: impl Into<String>, ring: &[[f64; 2]]) -> Self {
        Self {
            id: Some(Value::String(id.into())),
            tag: feature_tag(),
            properties: Map::new(),
            geometry: Some(FeatureGeometry::polygon(ring)),
        }
    }

    pub fn first_ring(&self) -> Option<Vec<[f64; 2]>> {
        self.geometry.as_ref()?.first_ring()
    }
}

/// Zapisany wielokąt tak, jak zwraca go zdalne API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonRecord {
    #[serde(rename = "_id", default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub polygon_name: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub polygon_coordinates: Vec<DrawnFeature>,
}

impl PolygonRecord {
    /// Typ geometrii pierwszego obiektu albo pusty napis.
    pub fn geometry_type(&self) -> &str {
        self.polygon_coordinates
            .first()
            .and_then(|f| f.geometry.as_ref())
            .map(|g| g.kind.as_str())
            .unwrap_or("")
    }

    pub fn first_ring(&self) -> Option<Vec<[f64; 2]>> {
        self.polygon_coordinates.first()?.first_ring()
    }
}

/// Formularz tworzenia: nazwa i obiekty z ostatniego zdarzenia rysowania.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateForm {
    pub polygon_name: String,
    pub polygon_coordinates: Vec<DrawnFeature>,
}

impl CreateForm {
    pub fn is_submittable(&self) -> bool {
        !self.polygon_name.is_empty() && !self.polygon_coordinates.is_empty()
    }
}

/// Para `[id, nowa nazwa]` wysyłana w zbiorczej zmianie nazw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry(pub String, pub String);

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
