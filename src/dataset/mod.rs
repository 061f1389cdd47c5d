//! Loading and normalizing the harvested flat file
//!
//! The file is read once per view; nothing here writes back to it.

pub mod aggregate;
pub mod coord;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::filter::FormSelection;
use crate::schema::{EducationForm, SchoolRecord, REQUIRED_COLUMNS};

pub use aggregate::*;
pub use coord::*;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("input is missing required column '{0}'")]
    MissingColumn(String),
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A normalized school row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct School {
    pub subdistrict: String,
    pub npsn: String,
    pub name: String,
    pub address: String,
    pub status: String,
    pub form: EducationForm,
    pub level: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl School {
    pub fn from_record(record: SchoolRecord) -> Self {
        Self {
            subdistrict: normalize_subdistrict(&record.subdistrict),
            npsn: record.npsn.trim().to_string(),
            name: record.name.trim().to_string(),
            address: record.address.trim().to_string(),
            status: record.status.trim().to_string(),
            form: EducationForm::parse(&record.form),
            level: record.level.trim().to_string(),
            latitude: parse_latitude(&record.latitude),
            longitude: parse_longitude(&record.longitude),
        }
    }

    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

/// Trim and collapse inner whitespace, keeping the original casing for display
pub fn normalize_subdistrict(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folded grouping key for a subdistrict name
pub fn subdistrict_key(name: &str) -> String {
    normalize_subdistrict(name).to_uppercase()
}

/// Read a flat file, handing each normalized school to `f` without keeping rows
pub fn for_each_school<R: Read>(reader: R, mut f: impl FnMut(School)) -> Result<(), DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *col) {
            return Err(DatasetError::MissingColumn(col.to_string()));
        }
    }

    // short rows read as empty trailing fields
    for record in rdr.records() {
        let mut record = record?;
        while record.len() < headers.len() {
            record.push_field("");
        }
        let record: SchoolRecord = record.deserialize(Some(&headers))?;
        f(School::from_record(record));
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Aggregate a file in a single pass without materializing it
pub fn summarize_file(path: &Path) -> Result<Summary, DatasetError> {
    let mut agg = Aggregator::new();
    for_each_school(open(path)?, |school| agg.push(&school))?;
    Ok(agg.finish())
}

/// The full normalized table held in memory
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    schools: Vec<School>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let dataset = Self::from_reader(open(path)?)?;
        info!(
            "Loaded {} schools from {}",
            dataset.schools.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut schools = Vec::new();
        for_each_school(reader, |school| schools.push(school))?;
        let dataset = Self { schools };
        dataset.report_unrecognized_forms();
        Ok(dataset)
    }

    pub fn from_schools(schools: Vec<School>) -> Self {
        Self { schools }
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.schools)
    }

    /// Distinct subdistrict names, sorted alphabetically
    pub fn subdistricts(&self) -> Vec<String> {
        let mut names: BTreeMap<String, &str> = BTreeMap::new();
        for school in &self.schools {
            names
                .entry(subdistrict_key(&school.subdistrict))
                .or_insert(&school.subdistrict);
        }
        names.into_values().map(str::to_string).collect()
    }

    pub fn in_subdistrict(&self, name: &str) -> Vec<&School> {
        let key = subdistrict_key(name);
        self.schools
            .iter()
            .filter(|s| subdistrict_key(&s.subdistrict) == key)
            .collect()
    }

    /// Schools shown on the map: form selected and both coordinates present
    pub fn map_points(&self, selection: &FormSelection) -> Vec<(&School, GeoPoint)> {
        self.schools
            .iter()
            .filter(|s| selection.contains(&s.form))
            .filter_map(|s| s.location().map(|p| (s, p)))
            .collect()
    }

    /// Forms outside the fixed vocabulary with their row counts
    pub fn unrecognized_forms(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for school in &self.schools {
            if let EducationForm::Other(label) = &school.form {
                *counts.entry(label.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn report_unrecognized_forms(&self) {
        for (label, count) in self.unrecognized_forms() {
            warn!(
                "Unrecognized education form {:?} on {} rows; drawn gray and left out of form totals",
                label, count
            );
        }
    }
}
