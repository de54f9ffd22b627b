#![allow(dead_code)]

use std::sync::Mutex;

use polymap::model::{CreateForm, PolygonRecord, RenameEntry};
use polymap::store::{FetchError, PolygonStore};
use polymap::worker::{Request, execute};
use polymap::screen::MapScreen;

/// Magazyn w pamięci zapisujący każde zapytanie.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<PolygonRecord>>,
    requests: Mutex<Vec<Request>>,
    next_id: Mutex<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl PolygonStore for MemoryStore {
    fn list(&self) -> Result<Vec<PolygonRecord>, FetchError> {
        self.requests.lock().unwrap().push(Request::List);
        Ok(self.records.lock().unwrap().clone())
    }

    fn create(&self, form: &CreateForm) -> Result<(), FetchError> {
        self.requests.lock().unwrap().push(Request::Create(form.clone()));
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.records.lock().unwrap().push(PolygonRecord {
            id: format!("id-{next_id}"),
            polygon_name: form.polygon_name.clone(),
            polygon_coordinates: form.polygon_coordinates.clone(),
        });
        Ok(())
    }

    fn rename(&self, entries: &[RenameEntry]) -> Result<(), FetchError> {
        self.requests.lock().unwrap().push(Request::Rename(entries.to_vec()));
        let mut records = self.records.lock().unwrap();
        for RenameEntry(id, name) in entries {
            if let Some(record) = records.iter_mut().find(|r| &r.id == id) {
                record.polygon_name = name.clone();
            }
        }
        Ok(())
    }
}

/// Wykonuje zapytanie i wszystkie następne, które ekran zleci w odpowiedzi.
pub fn run(store: &MemoryStore, screen: &mut MapScreen, request: Request) {
    let mut next = Some(request);
    while let Some(request) = next.take() {
        next = screen.apply(execute(store, request));
    }
}
