use std::fmt::Write;

use crate::dataset::{School, Summary};
use super::links::map_link;

/// The six headline counters, in display order
pub fn metrics(summary: &Summary) -> [(&'static str, usize); 6] {
    [
        ("Total Kecamatan", summary.subdistricts),
        ("Total Sekolah", summary.schools),
        ("Total SD", summary.forms.sd),
        ("Total SMP", summary.forms.smp),
        ("Total MI", summary.forms.mi),
        ("Total MTs", summary.forms.mts),
    ]
}

pub const RECAP_HEADER: [&str; 6] = [
    "Nama Kecamatan",
    "Total SD",
    "Total SMP",
    "Total MI",
    "Total MTs",
    "Total Sekolah",
];

pub const DETAIL_HEADER: [&str; 5] = [
    "NPSN",
    "Nama Sekolah",
    "Alamat",
    "Bentuk Pendidikan",
    "Link GIS",
];

/// One row of the per-subdistrict detail table
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub npsn: String,
    pub name: String,
    pub address: String,
    pub form: String,
    pub link: String,
}

impl DetailRow {
    pub fn new(school: &School) -> Self {
        Self {
            npsn: school.npsn.clone(),
            name: school.name.clone(),
            address: school.address.clone(),
            form: school.form.label().to_string(),
            link: map_link(school.latitude, school.longitude),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.npsn.as_str(),
            self.name.as_str(),
            self.address.as_str(),
            self.form.as_str(),
            self.link.as_str(),
        ]
    }
}

/// Plain-text rendering of metrics and the recap table
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    for (label, value) in metrics(summary) {
        let _ = writeln!(out, "{:<16} {:>6}", label, value);
    }
    out.push('\n');

    let name_width = summary
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once(RECAP_HEADER[0].len()))
        .max()
        .unwrap_or(0);

    let _ = write!(out, "{:<width$}", RECAP_HEADER[0], width = name_width);
    for col in &RECAP_HEADER[1..] {
        let _ = write!(out, "  {:>13}", col);
    }
    out.push('\n');

    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<width$}  {:>13}  {:>13}  {:>13}  {:>13}  {:>13}",
            row.name,
            row.counts.sd,
            row.counts.smp,
            row.counts.mi,
            row.counts.mts,
            row.total,
            width = name_width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::summarize;
    use crate::schema::EducationForm;

    fn school(sub: &str, npsn: &str, form: &str) -> School {
        School {
            subdistrict: sub.to_string(),
            npsn: npsn.to_string(),
            form: EducationForm::parse(form),
            ..School::default()
        }
    }

    #[test]
    fn test_metrics_order() {
        let summary = summarize(&[school("A", "1", "SD"), school("B", "2", "MTs")]);
        let m = metrics(&summary);
        assert_eq!(m[0], ("Total Kecamatan", 2));
        assert_eq!(m[1], ("Total Sekolah", 2));
        assert_eq!(m[2], ("Total SD", 1));
        assert_eq!(m[5], ("Total MTs", 1));
    }

    #[test]
    fn test_format_summary() {
        let summary = summarize(&[school("Kec. A", "1", "SD"), school("Kec. A", "2", "SMP")]);
        let text = format_summary(&summary);
        assert!(text.contains("Total SD              1"));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("Kec. A"));
        assert!(last.trim_end().ends_with('2'));
    }

    #[test]
    fn test_detail_row_link() {
        let mut s = school("A", "1", "SD");
        assert_eq!(DetailRow::new(&s).link, "-");
        s.latitude = Some(-6.91);
        s.longitude = Some(107.61);
        assert_eq!(
            DetailRow::new(&s).link,
            "https://www.google.com/maps?q=-6.91,107.61"
        );
    }
}
