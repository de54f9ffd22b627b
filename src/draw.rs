//! Proste narzędzie rysowania: kursor, wierzchołki, zamykanie kształtu.
//!
//! Emituje zdarzenia tworzenia, aktualizacji i usunięcia z kompletem
//! narysowanych obiektów, tak jak kontrolka rysowania na mapie.

use rand::{Rng, rng};

use crate::model::{DrawnFeature, FeatureGeometry};

const CURSOR_STEPS: f64 = 40.0;
const MIN_SPAN: f64 = 0.0005;
const MAX_SPAN: f64 = 360.0;
/// Proporcja wysokości do szerokości widoku w stopniach (komórki terminala są wysokie).
const ASPECT: f64 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent {
    Create(Vec<DrawnFeature>),
    Update(Vec<DrawnFeature>),
    Delete(Vec<DrawnFeature>),
}

pub struct DrawControl {
    center: (f64, f64),
    span: f64,
    cursor: (f64, f64),
    pending: Vec<[f64; 2]>,
    features: Vec<DrawnFeature>,
}

impl DrawControl {
    pub fn new(center: (f64, f64)) -> Self {
        Self { center, span: 0.2, cursor: center, pending: Vec::new(), features: Vec::new() }
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn pending(&self) -> &[[f64; 2]] {
        &self.pending
    }

    pub fn features(&self) -> &[DrawnFeature] {
        &self.features
    }

    /// Zakresy [min, max] dla osi x (lon) i y (lat).
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half_x = self.span / 2.0;
        let half_y = self.span * ASPECT / 2.0;
        (
            [self.center.0 - half_x, self.center.0 + half_x],
            [self.center.1 - half_y, self.center.1 + half_y],
        )
    }

    /// Przesuwa kursor o `dx`/`dy` kroków; widok podąża za kursorem.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let step = self.span / CURSOR_STEPS;
        self.cursor.0 = (self.cursor.0 + dx as f64 * step).clamp(-180.0, 180.0);
        self.cursor.1 = (self.cursor.1 + dy as f64 * step).clamp(-90.0, 90.0);

        let ([x0, x1], [y0, y1]) = self.bounds();
        if self.cursor.0 < x0 {
            self.center.0 -= x0 - self.cursor.0;
        } else if self.cursor.0 > x1 {
            self.center.0 += self.cursor.0 - x1;
        }
        if self.cursor.1 < y0 {
            self.center.1 -= y0 - self.cursor.1;
        } else if self.cursor.1 > y1 {
            self.center.1 += self.cursor.1 - y1;
        }
    }

    pub fn zoom_in(&mut self) {
        self.span = (self.span / 2.0).max(MIN_SPAN);
        self.center = self.cursor;
    }

    pub fn zoom_out(&mut self) {
        self.span = (self.span * 2.0).min(MAX_SPAN);
    }

    pub fn place_vertex(&mut self) {
        self.pending.push([self.cursor.0, self.cursor.1]);
    }

    pub fn undo_vertex(&mut self) {
        self.pending.pop();
    }

    /// Zamyka rozpoczęty kształt. Potrzebne są co najmniej 3 wierzchołki.
    pub fn finish(&mut self) -> Option<DrawEvent> {
        if self.pending.len() < 3 {
            return None;
        }
        let mut ring = std::mem::take(&mut self.pending);
        ring.push(ring[0]);
        let feature = DrawnFeature::polygon(new_feature_id(), &ring);
        self.features.push(feature.clone());
        Some(DrawEvent::Create(vec![feature]))
    }

    /// Przenosi najbliższy kursorowi wierzchołek narysowanego obiektu na pozycję kursora.
    pub fn move_nearest_vertex(&mut self) -> Option<DrawEvent> {
        let (cx, cy) = self.cursor;
        let mut best: Option<(usize, usize, f64)> = None;
        for (fi, feature) in self.features.iter().enumerate() {
            let Some(ring) = feature.first_ring() else { continue };
            for (vi, [x, y]) in ring.iter().enumerate() {
                let dist = (x - cx).powi(2) + (y - cy).powi(2);
                if best.is_none_or(|(_, _, d)| dist < d) {
                    best = Some((fi, vi, dist));
                }
            }
        }

        let (fi, vi, _) = best?;
        let feature = &mut self.features[fi];
        let mut ring = feature.first_ring()?;
        let last = ring.len() - 1;
        ring[vi] = [cx, cy];
        // pierścień pozostaje zamknięty
        if vi == 0 {
            ring[last] = [cx, cy];
        } else if vi == last {
            ring[0] = [cx, cy];
        }
        feature.geometry = Some(FeatureGeometry::polygon(&ring));
        Some(DrawEvent::Update(vec![feature.clone()]))
    }

    /// Usuwa wszystkie narysowane obiekty z mapy.
    pub fn delete_all(&mut self) -> Option<DrawEvent> {
        if self.features.is_empty() {
            return None;
        }
        Some(DrawEvent::Delete(std::mem::take(&mut self.features)))
    }

    /// Czyści mapę po zapisaniu obiektów w magazynie.
    pub fn clear(&mut self) {
        self.features.clear();
    }
}

fn new_feature_id() -> String {
    format!("{:032x}", rng().random::<u128>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control_with_triangle() -> (DrawControl, DrawnFeature) {
        let mut draw = DrawControl::new((0.0, 0.0));
        draw.place_vertex();
        draw.move_cursor(4, 0);
        draw.place_vertex();
        draw.move_cursor(0, 4);
        draw.place_vertex();
        let Some(DrawEvent::Create(features)) = draw.finish() else {
            panic!("expected create event");
        };
        (draw, features[0].clone())
    }

    #[test]
    fn finish_needs_three_vertices() {
        let mut draw = DrawControl::new((0.0, 0.0));
        draw.place_vertex();
        draw.move_cursor(1, 0);
        draw.place_vertex();
        assert_eq!(draw.finish(), None);
        assert_eq!(draw.pending().len(), 2);
    }

    #[test]
    fn finish_closes_the_ring() {
        let (draw, feature) = control_with_triangle();
        let ring = feature.first_ring().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert!(draw.pending().is_empty());
        assert_eq!(draw.features().len(), 1);
        assert_eq!(feature.geometry.as_ref().unwrap().kind, "Polygon");
        assert!(matches!(&feature.id, Some(serde_json::Value::String(id)) if id.len() == 32));
    }

    #[test]
    fn moving_a_vertex_updates_the_same_feature() {
        let (mut draw, created) = control_with_triangle();
        // kursor stoi na trzecim wierzchołku
        draw.move_cursor(1, 1);
        let Some(DrawEvent::Update(features)) = draw.move_nearest_vertex() else {
            panic!("expected update event");
        };
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, created.id);
        assert_ne!(features[0], created);
        let ring = features[0].first_ring().unwrap();
        let (cx, cy) = draw.cursor();
        assert_eq!(ring[2], [cx, cy]);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn moving_first_vertex_keeps_ring_closed() {
        let (mut draw, _) = control_with_triangle();
        draw.move_cursor(-5, -5);
        let Some(DrawEvent::Update(features)) = draw.move_nearest_vertex() else {
            panic!("expected update event");
        };
        let ring = features[0].first_ring().unwrap();
        assert_eq!(ring[0], ring[3]);
        assert_eq!(ring[0], [draw.cursor().0, draw.cursor().1]);
    }

    #[test]
    fn delete_hands_back_all_features() {
        let (mut draw, created) = control_with_triangle();
        assert_eq!(draw.delete_all(), Some(DrawEvent::Delete(vec![created])));
        assert!(draw.features().is_empty());
        assert_eq!(draw.delete_all(), None);
        assert_eq!(draw.move_nearest_vertex(), None);
    }

    #[test]
    fn view_follows_cursor() {
        let mut draw = DrawControl::new((0.0, 0.0));
        for _ in 0..100 {
            draw.move_cursor(1, 0);
        }
        let ([x0, x1], _) = draw.bounds();
        let (cx, _) = draw.cursor();
        assert!(x0 <= cx && cx <= x1);
    }
}
