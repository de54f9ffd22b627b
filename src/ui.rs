use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
        canvas::{Canvas, Context, Line},
    },
    symbols::Marker,
};

use crate::geometry::format_area;
use crate::screen::{Focus, FormPhase, MapScreen};

pub fn draw(f: &mut Frame, screen: &MapScreen) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(f.area());

    // Lewa kolumna: komunikat, mapa, formularz
    let banner_height = if screen.banner.is_some() { 3 } else { 0 };
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    if let Some(text) = screen.banner {
        let banner = Paragraph::new(format!("{text}  (Esc: zamknij)"))
            .style(Style::default().fg(Color::Black).bg(Color::Green))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, left[0]);
    }

    draw_map(f, left[1], screen);
    draw_form(f, left[2], screen);
    draw_info(f, chunks[1], screen);

    if let Some(dialog) = &screen.dialog {
        let area = centered(f.area(), 70, 60);
        f.render_widget(Clear, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let rows: Vec<Row> = dialog
            .rows(screen.polygons())
            .into_iter()
            .map(|row| Row::new(vec![Cell::from(row.number.to_string()), Cell::from(row.name), Cell::from(row.kind)]))
            .collect();
        let selected = dialog.selected().min(screen.polygons().len().saturating_sub(1));
        let mut table_state = TableState::default().with_selected(Some(selected));
        let table = Table::new(rows, [Constraint::Length(4), Constraint::Fill(3), Constraint::Fill(1)])
            .header(
                Row::new(vec!["No", "Polygon Name", "Type"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(Block::default().borders(Borders::ALL).title("Polygon List"))
            .highlight_symbol(">> ")
            .row_highlight_style(Style::default().fg(Color::Red));
        f.render_stateful_widget(table, parts[0], &mut table_state);

        let update_style = if dialog.update_enabled() {
            Style::default().fg(Color::Black).bg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let footer = Paragraph::new(TextLine::from(vec![
            Span::styled(" Enter: Update ", update_style),
            Span::raw("   "),
            Span::raw(" Esc: Close "),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, parts[1]);
    }
}

fn draw_map(f: &mut Frame, area: Rect, screen: &MapScreen) {
    let (x_bounds, y_bounds) = screen.draw.bounds();
    let (cx, cy) = screen.draw.cursor();
    let title = format!("Mapa ({cx:.5}, {cy:.5})");

    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            // 1) Tło
            if let Some(basemap) = &screen.basemap {
                for mp in basemap.outlines() {
                    for poly in &mp.0 {
                        draw_ring(ctx, poly.exterior().0.iter().map(|c| (c.x, c.y)), Color::DarkGray);
                    }
                }
            }
            ctx.layer();

            // 2) Zapisane wielokąty z podpisami
            for item in screen.renderable() {
                draw_ring(ctx, item.polygon.exterior().0.iter().map(|c| (c.x, c.y)), Color::Blue);
            }
            for item in screen.renderable() {
                if let Some(c) = item.centroid {
                    ctx.print(c.x(), c.y(), item.name.clone());
                }
            }
            ctx.layer();

            // 3) Bieżący rysunek
            for feature in screen.draw.features() {
                if let Some(ring) = feature.first_ring() {
                    draw_ring(ctx, ring.into_iter().map(|[x, y]| (x, y)), Color::Green);
                }
            }
            for pair in screen.draw.pending().windows(2) {
                let ([x1, y1], [x2, y2]) = (pair[0], pair[1]);
                ctx.draw(&Line { x1, y1, x2, y2, color: Color::Yellow });
            }
            ctx.print(cx, cy, "+");
        });
    f.render_widget(canvas, area);
}

/// Rysuje zamknięty kontur.
fn draw_ring(ctx: &mut Context, coords: impl Iterator<Item = (f64, f64)>, color: Color) {
    let points: Vec<(f64, f64)> = coords.collect();
    for window in points.windows(2) {
        let ((x1, y1), (x2, y2)) = (window[0], window[1]);
        ctx.draw(&Line { x1, y1, x2, y2, color });
    }
    if let (Some(&(x2, y2)), Some(&(x1, y1))) = (points.first(), points.last()) {
        ctx.draw(&Line { x1, y1, x2, y2, color });
    }
}

fn draw_form(f: &mut Frame, area: Rect, screen: &MapScreen) {
    let focused = screen.focus == Focus::Name;
    let name = if screen.form.polygon_name.is_empty() && !focused {
        Span::styled("Enter Polygon Name", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(screen.form.polygon_name.clone())
    };
    let add_style = if screen.can_submit() {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = TextLine::from(vec![
        Span::raw("Nazwa: "),
        name,
        Span::raw("   "),
        Span::styled(" Add ", add_style),
        Span::raw("   l: View Polygon List"),
    ]);
    let border = if focused { Style::default().fg(Color::Yellow) } else { Style::default() };
    let form = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(border).title("Nowy wielokąt"));
    f.render_widget(form, area);
}

fn draw_info(f: &mut Frame, area: Rect, screen: &MapScreen) {
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let phase = match screen.phase() {
        FormPhase::Idle => "pusty",
        FormPhase::Drawing => "w toku",
        FormPhase::Ready => "gotowy do dodania",
    };
    let mut info = format!(
        "Wielokąty: {} (na mapie {})\nWierzchołki: {}\nObiekty: {}\nFormularz: {}\n",
        screen.polygons().len(),
        screen.renderable().len(),
        screen.draw.pending().len(),
        screen.form.polygon_coordinates.len(),
        phase,
    );
    for item in screen.renderable() {
        if let Some(area) = item.area_m2 {
            info.push_str(&format!("\n{}: {}", item.name, format_area(area)));
        }
    }
    let info_paragraph = Paragraph::new(info)
        .block(Block::default().borders(Borders::ALL).title("Informacje"))
        .wrap(Wrap { trim: true });
    f.render_widget(info_paragraph, right[0]);

    let help = Paragraph::new(MapScreen::HELP_TEXT)
        .block(Block::default().borders(Borders::ALL).title("Klawisze"))
        .wrap(Wrap { trim: true });
    f.render_widget(help, right[1]);
}

/// Prostokąt o zadanych procentach wymiarów, na środku `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(area);
    area
}
