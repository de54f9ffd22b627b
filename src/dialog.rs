//! Okno z listą wielokątów i zbiorczą zmianą nazw.

use std::collections::BTreeMap;

use crossterm::event::KeyCode;

use crate::model::{PolygonRecord, RenameEntry};

/// Wiersz tabeli: numer, nazwa do edycji, typ geometrii.
#[derive(Clone, Debug, PartialEq)]
pub struct DialogRow {
    pub number: usize,
    pub name: String,
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DialogAction {
    Close,
    Update(Vec<RenameEntry>),
}

/// Stan okna żyje tylko tak długo, jak okno jest otwarte.
#[derive(Default)]
pub struct PolygonListDialog {
    selected: usize,
    staged: BTreeMap<String, String>,
}

impl PolygonListDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn staged(&self) -> &BTreeMap<String, String> {
        &self.staged
    }

    /// Zmieniona nazwa, jeśli jest, w przeciwnym razie zapisana.
    pub fn value_for<'a>(&'a self, record: &'a PolygonRecord) -> &'a str {
        self.staged.get(&record.id).map_or(record.polygon_name.as_str(), String::as_str)
    }

    pub fn rows(&self, records: &[PolygonRecord]) -> Vec<DialogRow> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| DialogRow {
                number: i + 1,
                name: self.value_for(record).to_string(),
                kind: record.geometry_type().to_string(),
            })
            .collect()
    }

    /// Zapisuje lokalnie nową nazwę wiersza; magazyn nie jest wołany.
    pub fn stage(&mut self, id: &str, value: impl Into<String>) {
        self.staged.insert(id.to_string(), value.into());
    }

    pub fn update_enabled(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Wszystkie zmiany jako jedna paczka, także te bez faktycznej różnicy.
    pub fn update_batch(&self) -> Option<Vec<RenameEntry>> {
        self.update_enabled().then(|| {
            self.staged
                .iter()
                .map(|(id, name)| RenameEntry(id.clone(), name.clone()))
                .collect()
        })
    }

    pub fn handle_input(&mut self, key: KeyCode, records: &[PolygonRecord]) -> Option<DialogAction> {
        use KeyCode::*;
        // lista mogła się skrócić po przeładowaniu
        self.selected = self.selected.min(records.len().saturating_sub(1));
        match key {
            Esc => return Some(DialogAction::Close),
            Enter => return self.update_batch().map(DialogAction::Update),
            Up => self.selected = self.selected.saturating_sub(1),
            Down => {
                if self.selected + 1 < records.len() {
                    self.selected += 1
                }
            }
            Char(c) => self.edit_selected(records, |name| name.push(c)),
            Backspace => self.edit_selected(records, |name| {
                name.pop();
            }),
            _ => {}
        }
        None
    }

    fn edit_selected(&mut self, records: &[PolygonRecord], edit: impl FnOnce(&mut String)) {
        let Some(record) = records.get(self.selected) else { return };
        let mut value = self.value_for(record).to_string();
        edit(&mut value);
        self.stage(&record.id, value);
    }
}
