use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://referensi.data.kemendikdasmen.go.id";
/// Kabupaten Bandung
pub const DEFAULT_REGION: &str = "020800";
pub const DEFAULT_LEVEL: &str = "dikdas";
pub const DEFAULT_DELAY_MS: u64 = 200;
pub const DEFAULT_OUTPUT: &str = "sekolah_lengkap.csv";

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: Url,
    pub region: String,
    pub level: String,
    pub delay: Duration,
    pub output: PathBuf,
}

impl HarvestConfig {
    pub fn new(
        base_url: &str,
        region: impl Into<String>,
        level: impl Into<String>,
        delay_ms: u64,
        output: PathBuf,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        Ok(Self {
            base_url,
            region: region.into(),
            level: level.into(),
            delay: Duration::from_millis(delay_ms),
            output,
        })
    }

    /// Listing of all subdistricts of the region
    pub fn listing_url(&self) -> String {
        format!(
            "{}/pendidikan/{}/{}/2/all/all/all",
            self.base_url.as_str().trim_end_matches('/'),
            self.level,
            self.region
        )
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            region: DEFAULT_REGION.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}
