//! Klient zdalnego magazynu wielokątów (lista, tworzenie, zmiana nazw).

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::model::{CreateForm, PolygonRecord, RenameEntry};

/// Błąd sieci albo odpowiedź spoza zakresu 2xx.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("unreadable response from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Odpowiedź listy, której nie da się odczytać jako `{ data: [...] }`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field `data` is not a list (found {0})")]
    NotAList(&'static str),
}

/// Operacje zdalnego magazynu.
pub trait PolygonStore: Send + Sync {
    fn list(&self) -> Result<Vec<PolygonRecord>, FetchError>;

    fn create(&self, form: &CreateForm) -> Result<(), FetchError>;

    fn rename(&self, entries: &[RenameEntry]) -> Result<(), FetchError>;
}

/// Dekoduje treść odpowiedzi `GET /polygons`.
///
/// Element listy, który nie jest obiektem, zamienia się w pusty rekord.
pub fn decode_list(body: &[u8]) -> Result<Vec<PolygonRecord>, DecodeError> {
    let root: Value = serde_json::from_slice(body)?;
    let items = match root.get("data") {
        Some(Value::Array(items)) => items,
        Some(other) => return Err(DecodeError::NotAList(kind_of(other))),
        None => return Err(DecodeError::NotAList("nothing")),
    };

    Ok(items
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone()).unwrap_or_else(|err| {
                warn!("malformed polygon record {item}: {err}; using a blank row");
                PolygonRecord::default()
            })
        })
        .collect())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Magazyn po HTTP+JSON pod adresem bazowym z konfiguracji.
pub struct HttpPolygonStore {
    client: Client,
    base: String,
}

impl HttpPolygonStore {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        // zapytania czekają na odpowiedź bez limitu czasu
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| FetchError::Client(err.to_string()))?;
        Ok(Self { client, base: config.api_base_url.trim_end_matches('/').to_string() })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), FetchError> {
        let url = self.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|err| FetchError::Network { url: url.clone(), reason: err.to_string() })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }
        debug!("POST {url} -> {status}");
        Ok(())
    }
}

impl PolygonStore for HttpPolygonStore {
    fn list(&self) -> Result<Vec<PolygonRecord>, FetchError> {
        let url = self.endpoint("polygons");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| FetchError::Network { url: url.clone(), reason: err.to_string() })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }
        let body = response
            .bytes()
            .map_err(|err| FetchError::Body { url: url.clone(), reason: err.to_string() })?;

        match decode_list(&body) {
            Ok(records) => Ok(records),
            Err(DecodeError::Json(err)) => Err(FetchError::Body { url, reason: err.to_string() }),
            Err(err @ DecodeError::NotAList(_)) => {
                warn!("GET {url}: {err}; showing an empty list");
                Ok(Vec::new())
            }
        }
    }

    fn create(&self, form: &CreateForm) -> Result<(), FetchError> {
        self.post_json("polygons", form)
    }

    fn rename(&self, entries: &[RenameEntry]) -> Result<(), FetchError> {
        self.post_json("polygons/name", entries)
    }
}
