//! Dashboard selection state and the views derived from it
//!
//! Every view is recomputed from `(DashboardData, DashboardState)` on each
//! frame; key handling only moves the selection.

use crossterm::event::KeyCode;
use std::cmp::Ordering;

use crate::dataset::{Dataset, GeoPoint, School, SubdistrictRow, Summary};
use crate::filter::FormSelection;
use crate::render::{DetailRow, MAP_CENTER};
use crate::schema::KNOWN_FORMS;

/// Immutable inputs of one dashboard session
pub struct DashboardData {
    pub title: String,
    pub dataset: Dataset,
    pub summary: Summary,
    pub subdistricts: Vec<String>,
}

impl DashboardData {
    pub fn new(title: impl Into<String>, dataset: Dataset) -> Self {
        let summary = dataset.summary();
        let subdistricts = dataset.subdistricts();
        Self {
            title: title.into(),
            dataset,
            summary,
            subdistricts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    Detail,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Summary, Tab::Detail, Tab::Map];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Summary => "Rekap per Kecamatan",
            Tab::Detail => "Detail Sekolah",
            Tab::Map => "Peta",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFocus {
    Subdistricts,
    Schools,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub descending: bool,
}

impl SortState {
    fn cycle(&mut self, columns: usize) {
        self.column = (self.column + 1) % columns.max(1);
        self.descending = false;
    }

    fn apply(&self, ord: Ordering) -> Ordering {
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Visible map window; `span` is the width in degrees of longitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub span: f64,
}

pub const DEFAULT_SPAN: f64 = 0.8;
const MIN_SPAN: f64 = 0.005;
const MAX_SPAN: f64 = 40.0;
const ZOOM_STEP: f64 = 1.5;
const PAN_STEP: f64 = 0.1;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: MAP_CENTER,
            span: DEFAULT_SPAN,
        }
    }
}

impl Viewport {
    fn zoom(&mut self, factor: f64) {
        self.span = (self.span * factor).clamp(MIN_SPAN, MAX_SPAN);
    }

    fn pan(&mut self, dlat: f64, dlon: f64) {
        self.center.lat = (self.center.lat + dlat * self.span).clamp(-90.0, 90.0);
        self.center.lon = (self.center.lon + dlon * self.span).clamp(-180.0, 180.0);
    }

    /// Cell size used to group nearby markers at this zoom
    pub fn cluster_cell(&self) -> f64 {
        self.span / 40.0
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub tab: Tab,
    pub recap_sort: SortState,
    pub recap_selected: usize,
    pub subdistrict: usize,
    pub detail_focus: DetailFocus,
    pub detail_sort: SortState,
    pub detail_selected: usize,
    pub forms: FormSelection,
    pub viewport: Viewport,
    pub popup: Option<usize>,
    pub should_quit: bool,
}

impl DashboardState {
    pub fn new(forms: FormSelection) -> Self {
        Self {
            tab: Tab::Summary,
            recap_sort: SortState::default(),
            recap_selected: 0,
            subdistrict: 0,
            detail_focus: DetailFocus::Subdistricts,
            detail_sort: SortState::default(),
            detail_selected: 0,
            forms,
            viewport: Viewport::default(),
            popup: None,
            should_quit: false,
        }
    }

    pub fn selected_subdistrict<'a>(&self, data: &'a DashboardData) -> Option<&'a str> {
        data.subdistricts.get(self.subdistrict).map(String::as_str)
    }

    pub fn handle_key(&mut self, code: KeyCode, data: &DashboardData) {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Summary => self.handle_summary_key(code, data),
            Tab::Detail => self.handle_detail_key(code, data),
            Tab::Map => self.handle_map_key(code, data),
        }
    }

    fn handle_summary_key(&mut self, code: KeyCode, data: &DashboardData) {
        let rows = data.summary.rows.len();
        match code {
            KeyCode::Up => self.recap_selected = self.recap_selected.saturating_sub(1),
            KeyCode::Down => self.recap_selected = step_down(self.recap_selected, rows),
            KeyCode::Char('s') => self.recap_sort.cycle(RECAP_COLUMNS),
            KeyCode::Char('r') => self.recap_sort.descending = !self.recap_sort.descending,
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode, data: &DashboardData) {
        match (self.detail_focus, code) {
            (DetailFocus::Subdistricts, KeyCode::Up) => {
                self.subdistrict = self.subdistrict.saturating_sub(1);
                self.detail_selected = 0;
            }
            (DetailFocus::Subdistricts, KeyCode::Down) => {
                self.subdistrict = step_down(self.subdistrict, data.subdistricts.len());
                self.detail_selected = 0;
            }
            (DetailFocus::Subdistricts, KeyCode::Enter | KeyCode::Right) => {
                self.detail_focus = DetailFocus::Schools;
            }
            (DetailFocus::Schools, KeyCode::Left | KeyCode::Esc) => {
                self.detail_focus = DetailFocus::Subdistricts;
            }
            (DetailFocus::Schools, KeyCode::Up) => {
                self.detail_selected = self.detail_selected.saturating_sub(1);
            }
            (DetailFocus::Schools, KeyCode::Down) => {
                let rows = self
                    .selected_subdistrict(data)
                    .map(|name| data.dataset.in_subdistrict(name).len())
                    .unwrap_or(0);
                self.detail_selected = step_down(self.detail_selected, rows);
            }
            (_, KeyCode::Char('s')) => self.detail_sort.cycle(DETAIL_COLUMNS),
            (_, KeyCode::Char('r')) => self.detail_sort.descending = !self.detail_sort.descending,
            _ => {}
        }
    }

    fn handle_map_key(&mut self, code: KeyCode, data: &DashboardData) {
        match code {
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.forms.toggle(&KNOWN_FORMS[idx]);
                self.popup = None;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.viewport.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.viewport.zoom(ZOOM_STEP),
            KeyCode::Char('0') => self.viewport = Viewport::default(),
            KeyCode::Up => self.viewport.pan(PAN_STEP, 0.0),
            KeyCode::Down => self.viewport.pan(-PAN_STEP, 0.0),
            KeyCode::Left => self.viewport.pan(0.0, -PAN_STEP),
            KeyCode::Right => self.viewport.pan(0.0, PAN_STEP),
            KeyCode::Char('n') | KeyCode::Char('p') => {
                let points = map_points(data, self);
                if points.is_empty() {
                    self.popup = None;
                    return;
                }
                let len = points.len();
                let next = match (self.popup, code) {
                    (None, KeyCode::Char('n')) => 0,
                    (None, _) => len - 1,
                    (Some(i), KeyCode::Char('n')) => (i + 1) % len,
                    (Some(i), _) => (i + len - 1) % len,
                };
                self.popup = Some(next);
                self.viewport.center = points[next].1;
            }
            KeyCode::Esc => self.popup = None,
            _ => {}
        }
    }
}

fn step_down(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1).min(len - 1)
    }
}

pub const RECAP_COLUMNS: usize = 6;
pub const DETAIL_COLUMNS: usize = 5;

/// Recap rows in the current sort order
pub fn recap_rows<'a>(data: &'a DashboardData, sort: SortState) -> Vec<&'a SubdistrictRow> {
    let mut rows: Vec<&SubdistrictRow> = data.summary.rows.iter().collect();
    let key = |r: &SubdistrictRow| match sort.column {
        1 => r.counts.sd,
        2 => r.counts.smp,
        3 => r.counts.mi,
        4 => r.counts.mts,
        _ => r.total,
    };
    rows.sort_by(|&a, &b| {
        let ord = if sort.column == 0 {
            a.name.to_uppercase().cmp(&b.name.to_uppercase())
        } else {
            key(a).cmp(&key(b)).then_with(|| a.name.cmp(&b.name))
        };
        sort.apply(ord)
    });
    rows
}

/// Detail rows of the selected subdistrict in the current sort order
pub fn detail_rows(data: &DashboardData, state: &DashboardState) -> Vec<DetailRow> {
    let Some(name) = state.selected_subdistrict(data) else {
        return Vec::new();
    };
    let mut rows: Vec<DetailRow> = data
        .dataset
        .in_subdistrict(name)
        .into_iter()
        .map(DetailRow::new)
        .collect();
    let column = state.detail_sort.column.min(DETAIL_COLUMNS - 1);
    rows.sort_by(|a, b| state.detail_sort.apply(a.cells()[column].cmp(&b.cells()[column])));
    rows
}

/// Schools drawn on the map under the current form filter
pub fn map_points<'a>(data: &'a DashboardData, state: &DashboardState) -> Vec<(&'a School, GeoPoint)> {
    data.dataset.map_points(&state.forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EducationForm;

    fn school(sub: &str, npsn: &str, form: &str, coords: Option<(f64, f64)>) -> School {
        School {
            subdistrict: sub.to_string(),
            npsn: npsn.to_string(),
            name: format!("Sekolah {}", npsn),
            form: EducationForm::parse(form),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            ..School::default()
        }
    }

    fn data() -> DashboardData {
        DashboardData::new(
            "Test",
            Dataset::from_schools(vec![
                school("Soreang", "3", "SD", Some((-7.03, 107.52))),
                school("Banjaran", "1", "SD", Some((-7.05, 107.59))),
                school("Banjaran", "2", "SMP", None),
                school("Banjaran", "4", "MI", Some((-7.04, 107.58))),
            ]),
        )
    }

    #[test]
    fn test_tabs_cycle() {
        let data = data();
        let mut state = DashboardState::new(FormSelection::all());
        state.handle_key(KeyCode::Tab, &data);
        assert_eq!(state.tab, Tab::Detail);
        state.handle_key(KeyCode::BackTab, &data);
        state.handle_key(KeyCode::BackTab, &data);
        assert_eq!(state.tab, Tab::Map);
    }

    #[test]
    fn test_recap_sort() {
        let data = data();
        let mut sort = SortState::default();
        let names: Vec<&str> = recap_rows(&data, sort).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Banjaran", "Soreang"]);

        sort.column = 5;
        sort.descending = false;
        let totals: Vec<usize> = recap_rows(&data, sort).iter().map(|r| r.total).collect();
        assert_eq!(totals, [1, 3]);
    }

    #[test]
    fn test_detail_selection() {
        let data = data();
        let mut state = DashboardState::new(FormSelection::all());
        state.tab = Tab::Detail;

        assert_eq!(state.selected_subdistrict(&data), Some("Banjaran"));
        assert_eq!(detail_rows(&data, &state).len(), 3);

        state.handle_key(KeyCode::Down, &data);
        assert_eq!(state.selected_subdistrict(&data), Some("Soreang"));
        state.handle_key(KeyCode::Down, &data);
        assert_eq!(state.selected_subdistrict(&data), Some("Soreang"));

        let rows = detail_rows(&data, &state);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].link, "https://www.google.com/maps?q=-7.03,107.52");
    }

    #[test]
    fn test_detail_placeholder_link() {
        let data = data();
        let state = DashboardState::new(FormSelection::all());
        let rows = detail_rows(&data, &state);
        let smp = rows.iter().find(|r| r.npsn == "2").unwrap();
        assert_eq!(smp.link, "-");
    }

    #[test]
    fn test_map_filter_toggle() {
        let data = data();
        let mut state = DashboardState::new(FormSelection::all());
        state.tab = Tab::Map;
        assert_eq!(map_points(&data, &state).len(), 3);

        // hide SMP and MI, leaving SD
        state.handle_key(KeyCode::Char('2'), &data);
        state.handle_key(KeyCode::Char('3'), &data);
        let points = map_points(&data, &state);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|(s, _)| s.form == EducationForm::Sd));
    }

    #[test]
    fn test_popup_cycles() {
        let data = data();
        let mut state = DashboardState::new(FormSelection::all());
        state.tab = Tab::Map;

        state.handle_key(KeyCode::Char('n'), &data);
        assert_eq!(state.popup, Some(0));
        state.handle_key(KeyCode::Char('p'), &data);
        assert_eq!(state.popup, Some(2));
        assert_eq!(state.viewport.center, map_points(&data, &state)[2].1);

        state.handle_key(KeyCode::Esc, &data);
        assert_eq!(state.popup, None);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let data = data();
        let mut state = DashboardState::new(FormSelection::all());
        state.tab = Tab::Map;
        for _ in 0..100 {
            state.handle_key(KeyCode::Char('+'), &data);
        }
        assert_eq!(state.viewport.span, MIN_SPAN);
        state.handle_key(KeyCode::Char('0'), &data);
        assert_eq!(state.viewport, Viewport::default());
    }
}
