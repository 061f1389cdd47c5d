//! School detail page extraction
//!
//! Fields are collected into a [`FieldMap`] keyed by their on-page label,
//! so a lookup tells "label not on the page" (`None`) apart from "label
//! present with an empty value" (`Some("")`).

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;

use super::listing::cell_text;

static IDENTITY_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".tabby-tab .tabby-content table").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static COORD_BOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.col-lg-4").expect("valid selector"));

pub const LATITUDE_LABEL: &str = "Lintang";
pub const LONGITUDE_LABEL: &str = "Bujur";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: HashMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated label overwrites the earlier value
    pub fn insert(&mut self, label: &str, value: &str) {
        let label = clean_label(label);
        if label.is_empty() {
            return;
        }
        self.fields.insert(label, value.trim().to_string());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(&clean_label(label)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn clean_label(label: &str) -> String {
    label.trim().trim_end_matches(':').trim().to_string()
}

/// Everything a detail page yields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolDetail {
    /// `None` when the page had no identity table at all
    pub identity: Option<FieldMap>,
    pub coordinates: FieldMap,
}

impl SchoolDetail {
    pub fn identity_field(&self, label: &str) -> Option<&str> {
        self.identity.as_ref().and_then(|map| map.get(label))
    }

    pub fn latitude(&self) -> Option<&str> {
        self.coordinates.get(LATITUDE_LABEL)
    }

    pub fn longitude(&self) -> Option<&str> {
        self.coordinates.get(LONGITUDE_LABEL)
    }
}

/// Split one table row into (label, value).
///
/// Rows on the directory look like `No | Label | : | Value`. The label is
/// the last non-empty cell before the lone `:`, the value everything after
/// it. Rows without a separator fall back to cells 2 and 4.
pub fn split_labeled_row(cells: &[String]) -> Option<(String, String)> {
    if let Some(sep) = cells.iter().position(|c| c.trim() == ":") {
        let label = cells[..sep].iter().rev().find(|c| !c.trim().is_empty())?;
        let value = cells[sep + 1..]
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        return Some((label.trim().to_string(), value));
    }
    if cells.len() >= 4 {
        return Some((cells[1].trim().to_string(), cells[3].trim().to_string()));
    }
    None
}

/// Read `Label: value` pairs out of free text, one per line.
///
/// A value runs to the end of its line or to the next known label.
pub fn parse_labeled_lines<'a>(lines: impl IntoIterator<Item = &'a str>, map: &mut FieldMap) {
    let tags = [LATITUDE_LABEL, LONGITUDE_LABEL].map(|label| (label, format!("{}:", label)));
    for line in lines {
        for (label, tag) in &tags {
            let Some(pos) = line.find(tag.as_str()) else {
                continue;
            };
            let rest = &line[pos + tag.len()..];
            let end = tags
                .iter()
                .filter_map(|(_, other)| rest.find(other.as_str()))
                .min()
                .unwrap_or(rest.len());
            map.insert(label, &rest[..end]);
        }
    }
}

pub fn parse_detail(html: &str) -> SchoolDetail {
    let document = Html::parse_document(html);

    let identity = document.select(&IDENTITY_TABLE).next().map(|table| {
        let mut map = FieldMap::new();
        for row in table.select(&ROW) {
            let cells: Vec<String> = row.select(&CELL).map(|c| cell_text(&c)).collect();
            if let Some((label, value)) = split_labeled_row(&cells) {
                map.insert(&label, &value);
            }
        }
        map
    });

    let mut coordinates = FieldMap::new();
    if let Some(container) = document.select(&COORD_BOX).next() {
        let text: String = container.text().collect();
        parse_labeled_lines(text.split('\n'), &mut coordinates);
    }

    SchoolDetail {
        identity,
        coordinates,
    }
}
