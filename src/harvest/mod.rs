//! Sequential crawl of the school directory into a flat file
//!
//! listing page -> subdistrict pages -> school detail pages -> CSV row.
//! Requests are issued one at a time with a fixed pause after every
//! school; any network error aborts the run.

pub mod client;
pub mod config;
pub mod detail;
pub mod listing;
pub mod writer;

pub use client::*;
pub use config::*;
pub use detail::*;
pub use listing::*;
pub use writer::*;

use anyhow::{Context, Result};
use std::thread;
use tracing::{debug, info};

use crate::schema::{SchoolRecord, IDENTITY_LABELS};
use crate::ui::{Phase, Ui};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStats {
    pub subdistricts: usize,
    pub schools: u64,
    /// Detail pages without an identity table
    pub missing_identity: u64,
}

pub struct Harvester<'a, F: Fetch> {
    fetcher: &'a F,
    config: &'a HarvestConfig,
}

impl<'a, F: Fetch> Harvester<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a HarvestConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn list_subdistricts(&self) -> Result<Vec<SubdistrictLink>> {
        let html = self.fetcher.fetch(&self.config.listing_url())?;
        Ok(parse_subdistricts(&html, &self.config.base_url))
    }

    pub fn list_schools(&self, subdistrict: &SubdistrictLink) -> Result<Vec<SchoolLink>> {
        let html = self.fetcher.fetch(&subdistrict.url)?;
        Ok(parse_schools(&html, &self.config.base_url))
    }

    /// Fetch one detail page and build the flat record
    pub fn fetch_record(&self, subdistrict: &str, school: &SchoolLink) -> Result<(SchoolRecord, SchoolDetail)> {
        let html = self.fetcher.fetch(&school.url)?;
        let detail = parse_detail(&html);

        for label in IDENTITY_LABELS {
            if detail.identity.is_some() && detail.identity_field(label).is_none() {
                debug!("{}: no '{}' on detail page", school.npsn, label);
            }
        }

        let mut record = SchoolRecord {
            subdistrict: subdistrict.to_string(),
            npsn: school.npsn.clone(),
            name: school.name.clone(),
            latitude: detail.latitude().unwrap_or_default().to_string(),
            longitude: detail.longitude().unwrap_or_default().to_string(),
            ..SchoolRecord::default()
        };
        record.set_identity(|label| detail.identity_field(label));

        Ok((record, detail))
    }

    /// Run the whole crawl, writing each school as soon as it is extracted
    pub fn run(&self, ui: &mut impl Ui) -> Result<HarvestStats> {
        ui.set_phase(Phase::Listing);
        ui.set_info(self.config.listing_url());

        let subdistricts = self
            .list_subdistricts()
            .context("Failed to fetch subdistrict listing")?;
        info!("Total subdistricts: {}", subdistricts.len());
        ui.log(format!("Found {} subdistricts", subdistricts.len()));

        let mut writer = RecordWriter::create(&self.config.output)?;
        let mut stats = HarvestStats {
            subdistricts: subdistricts.len(),
            ..HarvestStats::default()
        };

        ui.set_phase(Phase::Harvesting);
        for (idx, subdistrict) in subdistricts.iter().enumerate() {
            info!("Scraping subdistrict: {}", subdistrict.name);
            ui.set_info(&subdistrict.name);
            ui.set_progress(
                idx as u64,
                subdistricts.len() as u64,
                format!("Subdistricts ({})", subdistrict.name),
            );

            let schools = self
                .list_schools(subdistrict)
                .with_context(|| format!("Failed to list schools of {}", subdistrict.name))?;
            ui.log(format!("{}: {} schools", subdistrict.name, schools.len()));

            for school in &schools {
                let (record, detail) = self
                    .fetch_record(&subdistrict.name, school)
                    .with_context(|| format!("Failed to fetch school {}", school.npsn))?;
                if detail.identity.is_none() {
                    stats.missing_identity += 1;
                }

                writer.write(&record)?;
                stats.schools += 1;
                debug!("Wrote {} {}", record.npsn, record.name);

                if !self.config.delay.is_zero() {
                    thread::sleep(self.config.delay);
                }
            }
        }

        let path = writer.finish()?;
        ui.clear_progress();
        ui.log(format!("Wrote {} schools to {:?}", stats.schools, path));
        info!("Done: {} schools written to {:?}", stats.schools, path);

        Ok(stats)
    }
}
