use crossterm::event::KeyCode;
use log::{error, info};

use crate::{
    basemap::Basemap,
    config::Config,
    dialog::{DialogAction, PolygonListDialog},
    draw::{DrawControl, DrawEvent},
    geometry::{RenderablePolygon, renderable_polygons},
    model::{CreateForm, PolygonRecord},
    worker::{Outcome, Request},
};

pub const SUCCESS_BANNER: &str = "Polygon added successfully!";

/// Gdzie trafiają klawisze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Map,
    Name,
    Dialog,
}

/// Etap formularza tworzenia.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormPhase {
    /// Brak obiektów; nazwa może zostać po poprzednim dodaniu.
    Idle,
    Drawing,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Quit,
    Send(Request),
}

/// Ekran mapy: lista z magazynu, formularz tworzenia i okno listy.
pub struct MapScreen {
    polygons: Vec<PolygonRecord>,
    renderable: Vec<RenderablePolygon>,
    pub form: CreateForm,
    pub draw: DrawControl,
    pub dialog: Option<PolygonListDialog>,
    pub banner: Option<&'static str>,
    pub focus: Focus,
    pub basemap: Option<Basemap>,
}

impl MapScreen {
    pub const HELP_TEXT: &'static str = "\
Strzałki: kursor   +/-: zoom
Spacja: wierzchołek   u: cofnij
Enter: zamknij kształt
m: przesuń wierzchołek   d: usuń rysunek
Tab: nazwa   l: lista   r: odśwież
Esc: zamknij komunikat   q: wyjście";

    pub fn new(config: &Config, basemap: Option<Basemap>) -> Self {
        // przed pierwszym pobraniem lista ma jeden pusty wiersz
        let polygons = vec![PolygonRecord::default()];
        Self {
            renderable: renderable_polygons(&polygons),
            polygons,
            form: CreateForm::default(),
            draw: DrawControl::new(config.center),
            dialog: None,
            banner: None,
            focus: Focus::Map,
            basemap,
        }
    }

    /// Zapytanie wysyłane po zamontowaniu ekranu.
    pub fn mount(&self) -> Request {
        Request::List
    }

    pub fn polygons(&self) -> &[PolygonRecord] {
        &self.polygons
    }

    pub fn renderable(&self) -> &[RenderablePolygon] {
        &self.renderable
    }

    pub fn set_polygons(&mut self, polygons: Vec<PolygonRecord>) {
        self.renderable = renderable_polygons(&polygons);
        self.polygons = polygons;
    }

    pub fn phase(&self) -> FormPhase {
        if self.form.is_submittable() {
            FormPhase::Ready
        } else if self.form.polygon_coordinates.is_empty() {
            FormPhase::Idle
        } else {
            FormPhase::Drawing
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase() == FormPhase::Ready
    }

    pub fn on_draw_event(&mut self, event: DrawEvent) {
        match event {
            // ostatnie zdarzenie wygrywa
            DrawEvent::Create(features) | DrawEvent::Update(features) => {
                self.form.polygon_coordinates = features;
            }
            DrawEvent::Delete(features) => {
                info!("draw delete: {} feature(s), not persisted", features.len());
            }
        }
    }

    /// Wysyła formularz. Nazwa zostaje w polu także po udanym dodaniu.
    pub fn submit(&mut self) -> Option<Request> {
        self.can_submit().then(|| Request::Create(self.form.clone()))
    }

    /// Obsługa wyniku zapytania; zwraca ewentualne ponowne pobranie listy.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        match outcome {
            Outcome::Listed(Ok(polygons)) => {
                self.set_polygons(polygons);
                None
            }
            Outcome::Listed(Err(err)) => {
                error!("Error fetching polygons: {err}");
                None
            }
            Outcome::Created { form, result: Ok(()) } => {
                self.banner = Some(SUCCESS_BANNER);
                if self.form.polygon_coordinates == form.polygon_coordinates {
                    self.form.polygon_coordinates.clear();
                    self.draw.clear();
                }
                Some(Request::List)
            }
            Outcome::Created { result: Err(err), .. } => {
                error!("Error posting polygon: {err}");
                None
            }
            Outcome::Renamed { result: Ok(()), .. } => {
                self.banner = Some(SUCCESS_BANNER);
                Some(Request::List)
            }
            Outcome::Renamed { result: Err(err), .. } => {
                error!("Error posting name: {err}");
                None
            }
        }
    }

    pub fn open_dialog(&mut self) {
        self.dialog = Some(PolygonListDialog::new());
        self.focus = Focus::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.focus = Focus::Map;
    }

    pub fn handle_input(&mut self, key: KeyCode) -> Option<Action> {
        match self.focus {
            Focus::Map => self.handle_map_input(key),
            Focus::Name => self.handle_name_input(key),
            Focus::Dialog => self.handle_dialog_input(key),
        }
    }

    fn handle_map_input(&mut self, key: KeyCode) -> Option<Action> {
        use KeyCode::*;
        let event = match key {
            Char('q') => return Some(Action::Quit),
            Char('l') => {
                self.open_dialog();
                None
            }
            Char('r') => return Some(Action::Send(Request::List)),
            Tab => {
                self.focus = Focus::Name;
                None
            }
            Esc => {
                self.banner = None;
                None
            }
            Left => {
                self.draw.move_cursor(-1, 0);
                None
            }
            Right => {
                self.draw.move_cursor(1, 0);
                None
            }
            Up => {
                self.draw.move_cursor(0, 1);
                None
            }
            Down => {
                self.draw.move_cursor(0, -1);
                None
            }
            Char('+') | Char('=') => {
                self.draw.zoom_in();
                None
            }
            Char('-') => {
                self.draw.zoom_out();
                None
            }
            Char(' ') => {
                self.draw.place_vertex();
                None
            }
            Char('u') => {
                self.draw.undo_vertex();
                None
            }
            Enter => self.draw.finish(),
            Char('m') => self.draw.move_nearest_vertex(),
            Char('d') => self.draw.delete_all(),
            _ => None,
        };
        if let Some(event) = event {
            self.on_draw_event(event);
        }
        None
    }

    fn handle_name_input(&mut self, key: KeyCode) -> Option<Action> {
        use KeyCode::*;
        match key {
            Tab | Esc => self.focus = Focus::Map,
            Enter => return self.submit().map(Action::Send),
            Backspace => {
                self.form.polygon_name.pop();
            }
            Char(c) => self.form.polygon_name.push(c),
            _ => {}
        }
        None
    }

    fn handle_dialog_input(&mut self, key: KeyCode) -> Option<Action> {
        let dialog = self.dialog.as_mut()?;
        match dialog.handle_input(key, &self.polygons)? {
            DialogAction::Close => {
                self.close_dialog();
                None
            }
            DialogAction::Update(entries) => Some(Action::Send(Request::Rename(entries))),
        }
    }
}
