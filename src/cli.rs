use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::harvest::{DEFAULT_BASE_URL, DEFAULT_DELAY_MS, DEFAULT_LEVEL, DEFAULT_OUTPUT, DEFAULT_REGION};

#[derive(Parser, Debug)]
#[command(name = "school-atlas")]
#[command(version, about = "Harvest school records and map them by subdistrict")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the school directory into a CSV file
    Harvest {
        /// Output CSV path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Directory site root
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Regency code of the listing page
        #[arg(short, long, default_value = DEFAULT_REGION)]
        region: String,

        /// Education level segment of the listing URL
        #[arg(long, default_value = DEFAULT_LEVEL)]
        level: String,

        /// Pause after each school, in milliseconds
        #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
        delay_ms: u64,

        /// Print progress lines instead of the full-screen view
        #[arg(long)]
        plain: bool,
    },

    /// Interactive dashboard over a harvested CSV file
    Dashboard {
        /// Harvested CSV file
        input: PathBuf,

        /// Dashboard title
        #[arg(short, long, default_value = "Pemetaan Sekolah Kabupaten Bandung")]
        title: String,

        /// Only show these education forms on the map (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Hide these education forms on the map (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// Write the clustered school map as an HTML page
    Map {
        /// Harvested CSV file
        input: PathBuf,

        /// Output HTML path
        #[arg(short, long, default_value = "peta_sekolah.html")]
        output: PathBuf,

        /// Page title
        #[arg(short, long, default_value = "Pemetaan Sekolah Kabupaten Bandung")]
        title: String,

        /// Only include these education forms (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these education forms (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// Print headline counts and the per-subdistrict recap
    Summary {
        /// Harvested CSV file
        input: PathBuf,

        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_defaults() {
        let cli = Cli::try_parse_from(["school-atlas", "harvest"]).unwrap();
        match cli.command {
            Commands::Harvest {
                output,
                region,
                delay_ms,
                plain,
                ..
            } => {
                assert_eq!(output, PathBuf::from("sekolah_lengkap.csv"));
                assert_eq!(region, "020800");
                assert_eq!(delay_ms, 200);
                assert!(!plain);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_map_include_list() {
        let cli = Cli::try_parse_from(["school-atlas", "map", "data.csv", "-i", "SD,MTs"]).unwrap();
        match cli.command {
            Commands::Map { include, .. } => {
                assert_eq!(include, Some(vec!["SD".to_string(), "MTs".to_string()]));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
