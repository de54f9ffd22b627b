//! Zapytania do magazynu wykonywane w tle, bez blokowania pętli zdarzeń.
//!
//! Każde zapytanie dostaje własny wątek, a wynik wraca kanałem i jest
//! odbierany przy następnym obrocie pętli. Nie ma deduplikacji, anulowania
//! ani ponowień: wyniki przychodzą w kolejności ukończenia.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::model::{CreateForm, PolygonRecord, RenameEntry};
use crate::store::{FetchError, PolygonStore};

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    List,
    Create(CreateForm),
    Rename(Vec<RenameEntry>),
}

#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<PolygonRecord>, FetchError>),
    Created { form: CreateForm, result: Result<(), FetchError> },
    Renamed { entries: Vec<RenameEntry>, result: Result<(), FetchError> },
}

/// Wykonuje jedno zapytanie synchronicznie.
pub fn execute(store: &dyn PolygonStore, request: Request) -> Outcome {
    match request {
        Request::List => Outcome::Listed(store.list()),
        Request::Create(form) => {
            let result = store.create(&form);
            Outcome::Created { form, result }
        }
        Request::Rename(entries) => {
            let result = store.rename(&entries);
            Outcome::Renamed { entries, result }
        }
    }
}

pub struct Worker {
    store: Arc<dyn PolygonStore>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl Worker {
    pub fn new(store: Arc<dyn PolygonStore>) -> Self {
        let (tx, rx) = unbounded();
        Self { store, tx, rx }
    }

    /// Wysyła zapytanie i od razu wraca.
    pub fn submit(&self, request: Request) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        debug!("dispatching {request:?}");
        thread::spawn(move || {
            let outcome = execute(store.as_ref(), request);
            // odbiorca znika tylko przy zamykaniu aplikacji
            let _ = tx.send(outcome);
        });
    }

    /// Wyniki ukończonych zapytań, bez czekania.
    pub fn drain(&self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }

    pub fn outcomes(&self) -> &Receiver<Outcome> {
        &self.rx
    }
}
