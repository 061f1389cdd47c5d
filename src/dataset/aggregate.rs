use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{subdistrict_key, School};
use crate::schema::EducationForm;

/// Counts for the fixed education-form vocabulary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormCounts {
    #[serde(rename = "SD")]
    pub sd: usize,
    #[serde(rename = "SMP")]
    pub smp: usize,
    #[serde(rename = "MI")]
    pub mi: usize,
    #[serde(rename = "MTs")]
    pub mts: usize,
}

impl FormCounts {
    /// Count one school; unrecognized forms are not counted
    pub fn add(&mut self, form: &EducationForm) {
        match form {
            EducationForm::Sd => self.sd += 1,
            EducationForm::Smp => self.smp += 1,
            EducationForm::Mi => self.mi += 1,
            EducationForm::Mts => self.mts += 1,
            EducationForm::Other(_) => {}
        }
    }

    pub fn get(&self, form: &EducationForm) -> usize {
        match form {
            EducationForm::Sd => self.sd,
            EducationForm::Smp => self.smp,
            EducationForm::Mi => self.mi,
            EducationForm::Mts => self.mts,
            EducationForm::Other(_) => 0,
        }
    }
}

/// One row of the per-subdistrict recap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubdistrictRow {
    pub name: String,
    #[serde(flatten)]
    pub counts: FormCounts,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub subdistricts: usize,
    pub schools: usize,
    pub forms: FormCounts,
    pub rows: Vec<SubdistrictRow>,
}

/// Single-pass accumulator over normalized schools
#[derive(Debug, Default)]
pub struct Aggregator {
    ids: HashSet<String>,
    totals: FormCounts,
    groups: BTreeMap<String, SubdistrictRow>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, school: &School) {
        if !school.npsn.is_empty() {
            self.ids.insert(school.npsn.clone());
        }
        self.totals.add(&school.form);

        let row = self
            .groups
            .entry(subdistrict_key(&school.subdistrict))
            .or_insert_with(|| SubdistrictRow {
                name: school.subdistrict.clone(),
                counts: FormCounts::default(),
                total: 0,
            });
        row.counts.add(&school.form);
        row.total += 1;
    }

    /// Rows come out ordered by subdistrict key
    pub fn finish(self) -> Summary {
        Summary {
            subdistricts: self.groups.len(),
            schools: self.ids.len(),
            forms: self.totals,
            rows: self.groups.into_values().collect(),
        }
    }
}

pub fn summarize<'a>(schools: impl IntoIterator<Item = &'a School>) -> Summary {
    let mut agg = Aggregator::new();
    for school in schools {
        agg.push(school);
    }
    agg.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::School;

    fn school(sub: &str, npsn: &str, form: &str) -> School {
        School {
            subdistrict: sub.to_string(),
            npsn: npsn.to_string(),
            name: format!("School {}", npsn),
            form: EducationForm::parse(form),
            ..School::default()
        }
    }

    #[test]
    fn test_three_rows() {
        let schools = vec![
            school("A", "1", "SD"),
            school("A", "2", "SMP"),
            school("B", "3", "SD"),
        ];
        let summary = summarize(&schools);

        assert_eq!(summary.subdistricts, 2);
        assert_eq!(summary.schools, 3);
        assert_eq!(summary.forms.sd, 2);
        assert_eq!(summary.rows.len(), 2);

        let a = &summary.rows[0];
        assert_eq!(a.name, "A");
        assert_eq!((a.counts.sd, a.counts.smp, a.total), (1, 1, 2));

        let b = &summary.rows[1];
        assert_eq!(b.name, "B");
        assert_eq!((b.counts.sd, b.counts.smp, b.total), (1, 0, 1));
    }

    #[test]
    fn test_group_sums_match_totals() {
        let schools = vec![
            school("Banjaran", "1", "SD"),
            school("banjaran", "2", "MI"),
            school("Soreang", "3", "mts"),
            school("Soreang", "4", "SMA"),
            school("Arjasari", "5", "SMP"),
            school("Arjasari", "5", "SD"),
        ];
        let summary = summarize(&schools);

        for form in crate::schema::KNOWN_FORMS {
            let sum: usize = summary.rows.iter().map(|r| r.counts.get(&form)).sum();
            assert_eq!(sum, summary.forms.get(&form), "mismatch for {}", form);
        }
        let rows: usize = summary.rows.iter().map(|r| r.total).sum();
        assert_eq!(rows, schools.len());
    }

    #[test]
    fn test_grouping_is_case_insensitive() {
        let schools = vec![school("Banjaran", "1", "SD"), school("BANJARAN", "2", "SD")];
        let summary = summarize(&schools);
        assert_eq!(summary.subdistricts, 1);
        assert_eq!(summary.rows[0].name, "Banjaran");
        assert_eq!(summary.rows[0].total, 2);
    }

    #[test]
    fn test_distinct_ids_skip_empty() {
        let schools = vec![
            school("A", "1", "SD"),
            school("A", "1", "SD"),
            school("A", "", "SD"),
        ];
        let summary = summarize(&schools);
        assert_eq!(summary.schools, 1);
        assert_eq!(summary.rows[0].total, 3);
    }

    #[test]
    fn test_unknown_form_opens_no_bucket() {
        let summary = summarize(&[school("A", "1", "SLB")]);
        assert_eq!(summary.forms, FormCounts::default());
        assert_eq!(summary.rows[0].total, 1);
    }
}
