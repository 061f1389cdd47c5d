use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap};
use ratatui::Frame;

use super::state::{
    detail_rows, map_points, recap_rows, DashboardData, DashboardState, DetailFocus, SortState, Tab,
};
use crate::dataset::GeoPoint;
use crate::render::{cluster_points, map_link, metrics, DETAIL_HEADER, RECAP_HEADER};
use crate::schema::{MarkerColor, KNOWN_FORMS};

const ORANGE: Color = Color::Rgb(255, 165, 0);

pub fn tui_color(color: MarkerColor) -> Color {
    match color {
        MarkerColor::Blue => Color::Blue,
        MarkerColor::Green => Color::Green,
        MarkerColor::Orange => ORANGE,
        MarkerColor::Red => Color::Red,
        MarkerColor::Gray => Color::Gray,
    }
}

fn border() -> Style {
    Style::default().fg(Color::Blue)
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub fn draw(frame: &mut Frame, data: &DashboardData, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", data.title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    draw_metrics(frame, data, chunks[1]);
    draw_tabs(frame, state, chunks[2]);

    match state.tab {
        Tab::Summary => draw_summary(frame, data, state, chunks[3]),
        Tab::Detail => draw_detail(frame, data, state, chunks[3]),
        Tab::Map => draw_map(frame, data, state, chunks[3]),
    }

    draw_footer(frame, data, state, chunks[4]);
}

fn draw_metrics(frame: &mut Frame, data: &DashboardData, area: Rect) {
    let values = metrics(&data.summary);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(area);

    for ((label, value), col) in values.iter().zip(cols.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", label))
            .border_style(border());
        let text = Paragraph::new(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .block(block);
        frame.render_widget(text, *col);
    }
}

fn draw_tabs(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL).border_style(border()))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn header_row<'a>(columns: &[&'a str], sort: SortState) -> Row<'a> {
    let cells = columns.iter().enumerate().map(|(i, name)| {
        let text = if i == sort.column {
            format!("{} {}", name, if sort.descending { "▼" } else { "▲" })
        } else {
            name.to_string()
        };
        Cell::from(text)
    });
    Row::new(cells).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

fn draw_summary(frame: &mut Frame, data: &DashboardData, state: &DashboardState, area: Rect) {
    let rows: Vec<Row> = recap_rows(data, state.recap_sort)
        .into_iter()
        .map(|r| {
            Row::new(vec![
                r.name.clone(),
                r.counts.sd.to_string(),
                r.counts.smp.to_string(),
                r.counts.mi.to_string(),
                r.counts.mts.to_string(),
                r.total.to_string(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(15),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&RECAP_HEADER, state.recap_sort))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Rekapitulasi Sekolah per Kecamatan ")
                .border_style(border()),
        )
        .row_highlight_style(highlight());

    let mut table_state = TableState::default().with_selected(Some(state.recap_selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_detail(frame: &mut Frame, data: &DashboardData, state: &DashboardState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    let focused = |f: DetailFocus| {
        if state.detail_focus == f {
            Style::default().fg(Color::Yellow)
        } else {
            border()
        }
    };

    let items: Vec<ListItem> = data
        .subdistricts
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Pilih Kecamatan ")
                .border_style(focused(DetailFocus::Subdistricts)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.subdistrict));
    frame.render_stateful_widget(list, cols[0], &mut list_state);

    let rows: Vec<Row> = detail_rows(data, state)
        .into_iter()
        .map(|r| {
            let link_style = if r.link.starts_with("http") {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let link_text = if r.link.starts_with("http") { "Lihat Peta" } else { "-" };
            Row::new(vec![
                Cell::from(r.npsn),
                Cell::from(r.name),
                Cell::from(r.address),
                Cell::from(r.form),
                Cell::from(Span::styled(link_text, link_style)),
            ])
        })
        .collect();

    let title = format!(
        " Daftar Sekolah di {} ",
        state.selected_subdistrict(data).unwrap_or("-")
    );
    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
        Constraint::Length(18),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&DETAIL_HEADER, state.detail_sort))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(focused(DetailFocus::Schools)),
        )
        .row_highlight_style(highlight());

    let selected = (state.detail_focus == DetailFocus::Schools).then_some(state.detail_selected);
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, cols[1], &mut table_state);
}

fn draw_map(frame: &mut Frame, data: &DashboardData, state: &DashboardState, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(36)])
        .split(area);

    let points = map_points(data, state);
    let view = state.viewport;

    // terminal cells are about twice as tall as they are wide
    let inner_w = cols[0].width.saturating_sub(2).max(1) as f64;
    let inner_h = cols[0].height.saturating_sub(2).max(1) as f64;
    let lat_span = view.span * (inner_h * 2.0) / inner_w;
    let x_bounds = [view.center.lon - view.span / 2.0, view.center.lon + view.span / 2.0];
    let y_bounds = [view.center.lat - lat_span / 2.0, view.center.lat + lat_span / 2.0];

    let coords: Vec<GeoPoint> = points.iter().map(|(_, p)| *p).collect();
    let clusters = cluster_points(&coords, view.cluster_cell());
    let popup_point = state.popup.and_then(|i| points.get(i)).map(|(_, p)| *p);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Peta Sekolah ")
                .border_style(border()),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for cluster in &clusters {
                if cluster.len() == 1 {
                    let (school, p) = &points[cluster.members[0]];
                    ctx.draw(&Points {
                        coords: &[(p.lon, p.lat)],
                        color: tui_color(school.form.color()),
                    });
                } else {
                    ctx.print(
                        cluster.center.lon,
                        cluster.center.lat,
                        Span::styled(
                            cluster.len().to_string(),
                            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            }
            if let Some(p) = popup_point {
                ctx.layer();
                ctx.print(p.lon, p.lat, Span::styled("◉", Style::default().fg(Color::Yellow)));
            }
        });
    frame.render_widget(canvas, cols[0]);

    draw_map_panel(frame, data, state, points.len(), cols[1]);
}

fn draw_map_panel(
    frame: &mut Frame,
    data: &DashboardData,
    state: &DashboardState,
    shown: usize,
    area: Rect,
) {
    let mut lines = vec![Line::from(Span::styled(
        "Tampilkan GIS:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (i, form) in KNOWN_FORMS.iter().enumerate() {
        let mark = if state.forms.contains(form) { "[x]" } else { "[ ]" };
        lines.push(Line::from(vec![
            Span::raw(format!(" {} {} ", i + 1, mark)),
            Span::styled("●", Style::default().fg(tui_color(form.color()))),
            Span::raw(format!(" {}", form)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Jumlah titik ditampilkan: {}", shown)));
    lines.push(Line::from(""));

    let points = map_points(data, state);
    if let Some((school, p)) = state.popup.and_then(|i| points.get(i)) {
        lines.push(Line::from(Span::styled(
            school.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(school.form.to_string()));
        lines.push(Line::from(school.subdistrict.clone()));
        lines.push(Line::from(Span::styled(
            map_link(Some(p.lat), Some(p.lon)),
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "n/p: show school popup",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(border()));
    frame.render_widget(panel, area);
}

fn draw_footer(frame: &mut Frame, data: &DashboardData, state: &DashboardState, area: Rect) {
    let hint = match state.tab {
        Tab::Summary => "Tab: switch view  ↑↓: scroll  s: sort column  r: reverse  q: quit".to_string(),
        Tab::Detail => {
            let link = (state.detail_focus == DetailFocus::Schools)
                .then(|| detail_rows(data, state))
                .and_then(|rows| rows.get(state.detail_selected).map(|r| r.link.clone()));
            match link {
                Some(link) => format!("Link GIS: {}", link),
                None => "↑↓: choose  Enter: schools  ←: back  s/r: sort  q: quit".to_string(),
            }
        }
        Tab::Map => "1-4: toggle form  arrows: pan  +/-: zoom  0: reset  n/p: popup  q: quit".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}
