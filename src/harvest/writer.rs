use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::schema::{SchoolRecord, HEADER};

/// Flat-file writer for harvested records.
///
/// Rows go to `<output>.partial` and are flushed one by one. `finish`
/// renames the partial file over the output, so an interrupted run never
/// clobbers the last complete file.
pub struct RecordWriter {
    writer: Option<csv::Writer<File>>,
    partial_path: PathBuf,
    output_path: PathBuf,
    count: u64,
}

pub fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

impl RecordWriter {
    /// Truncate the partial file and write the header
    pub fn create(output: &Path) -> Result<Self> {
        let partial_path = partial_path(output);
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let file = File::create(&partial_path)
            .with_context(|| format!("Failed to create {:?}", partial_path))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HEADER).context("Failed to write header")?;
        writer.flush().context("Failed to write header")?;

        Ok(Self {
            writer: Some(writer),
            partial_path,
            output_path: output.to_path_buf(),
            count: 0,
        })
    }

    /// Append one record and flush it to disk
    pub fn write(&mut self, record: &SchoolRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .context("Record writer already finished")?;
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record {}", record.npsn))?;
        writer.flush().context("Failed to flush record")?;
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Flush, close and move the partial file into place
    pub fn finish(mut self) -> Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("Failed to flush output: {}", e.error()))?;
            file.sync_all().context("Failed to sync output")?;
        }
        fs::rename(&self.partial_path, &self.output_path).with_context(|| {
            format!(
                "Failed to move {:?} to {:?}",
                self.partial_path, self.output_path
            )
        })?;
        debug!("Wrote {} records to {:?}", self.count, self.output_path);
        Ok(self.output_path.clone())
    }
}

impl Drop for RecordWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            // Interrupted run: keep what we have next to the output
            writer.flush().ok();
            warn!(
                "Harvest stopped after {} records; partial output left at {:?}",
                self.count, self.partial_path
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(npsn: &str) -> SchoolRecord {
        SchoolRecord {
            subdistrict: "Kec. Ciwidey".to_string(),
            npsn: npsn.to_string(),
            name: "SDN 1, CIWIDEY".to_string(),
            form: "SD".to_string(),
            latitude: "-7,1".to_string(),
            longitude: "107,4".to_string(),
            ..SchoolRecord::default()
        }
    }

    #[test]
    fn test_header_then_rows() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sekolah.csv");

        let mut writer = RecordWriter::create(&out).unwrap();
        writer.write(&record("1")).unwrap();
        writer.write(&record("2")).unwrap();
        assert!(!out.exists());
        assert_eq!(writer.finish().unwrap(), out);

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(
            lines[1],
            "Kec. Ciwidey,1,\"SDN 1, CIWIDEY\",,,,,,,SD,,\"-7,1\",\"107,4\""
        );
        assert!(!partial_path(&out).exists());
    }

    #[test]
    fn test_rows_visible_before_finish() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sekolah.csv");

        let mut writer = RecordWriter::create(&out).unwrap();
        writer.write(&record("1")).unwrap();

        let partial = fs::read_to_string(partial_path(&out)).unwrap();
        assert_eq!(partial.lines().count(), 2);
        drop(writer);
    }

    #[test]
    fn test_drop_keeps_previous_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sekolah.csv");
        fs::write(&out, "previous run\n").unwrap();

        {
            let mut writer = RecordWriter::create(&out).unwrap();
            writer.write(&record("1")).unwrap();
        }

        assert_eq!(fs::read_to_string(&out).unwrap(), "previous run\n");
        assert!(partial_path(&out).exists());
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sekolah.csv");
        fs::write(&out, "previous run\n").unwrap();

        let writer = RecordWriter::create(&out).unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap().trim_end(), HEADER.join(","));
    }
}
