use anyhow::{Context, Result};
use school_atlas::{
    cli::{Cli, Commands},
    dashboard::Dashboard,
    dataset::{summarize_file, Dataset},
    filter::resolve_forms,
    harvest::{HarvestConfig, Harvester, HttpFetcher},
    logging::{self, LogTarget},
    render::{format_summary, render_map_html, MapMarker},
    ui::{ConsoleUi, UiApp},
};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Harvest {
            output,
            base_url,
            region,
            level,
            delay_ms,
            plain,
        } => {
            let start = Instant::now();
            let config = HarvestConfig::new(&base_url, region, level, delay_ms, output)?;
            let fetcher = HttpFetcher::new()?;
            let harvester = Harvester::new(&fetcher, &config);

            if plain {
                logging::init(LogTarget::Stderr)?;
                let mut ui = ConsoleUi::new();
                let stats = harvester.run(&mut ui)?;
                println!(
                    "\nWrote {} schools from {} subdistricts to {:?} in {:.1}s",
                    stats.schools,
                    stats.subdistricts,
                    config.output,
                    start.elapsed().as_secs_f64()
                );
            } else {
                logging::init(LogTarget::File(logging::default_log_file()?))?;
                let mut ui = UiApp::new("School Harvester")?;
                let stats = match harvester.run(&mut ui) {
                    Ok(stats) => stats,
                    Err(e) => {
                        ui.restore()?;
                        return Err(e);
                    }
                };
                ui.finish(&format!(
                    "Wrote {} schools from {} subdistricts in {:.1}s",
                    stats.schools,
                    stats.subdistricts,
                    start.elapsed().as_secs_f64()
                ))?;
            }
        }

        Commands::Dashboard {
            input,
            title,
            include,
            exclude,
        } => {
            logging::init(LogTarget::File(logging::default_log_file()?))?;
            let forms = resolve_forms(include, exclude)?;
            let dataset = Dataset::load(&input)
                .with_context(|| format!("Failed to load {:?}", input))?;
            Dashboard::new(title, dataset, forms)?.run()?;
        }

        Commands::Map {
            input,
            output,
            title,
            include,
            exclude,
        } => {
            logging::init(LogTarget::Stderr)?;
            let forms = resolve_forms(include, exclude)?;
            let dataset = Dataset::load(&input)
                .with_context(|| format!("Failed to load {:?}", input))?;

            let markers: Vec<MapMarker> = dataset
                .map_points(&forms)
                .into_iter()
                .map(|(school, point)| MapMarker::new(school, point))
                .collect();
            let html = render_map_html(&title, &markers)?;
            std::fs::write(&output, html)
                .with_context(|| format!("Failed to write {:?}", output))?;

            println!("Jumlah titik ditampilkan: {}", markers.len());
            println!("Map written to {:?}", output);
        }

        Commands::Summary { input, json } => {
            logging::init(LogTarget::Stderr)?;
            let summary = summarize_file(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
                );
            } else {
                print!("{}", format_summary(&summary));
            }
        }
    }

    Ok(())
}
