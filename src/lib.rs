pub mod cli;
pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod harvest;
pub mod logging;
pub mod render;
pub mod schema;
pub mod ui;

pub use cli::{Cli, Commands};
pub use dataset::{Dataset, School, Summary};
pub use harvest::{Fetch, HarvestConfig, Harvester};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui, UiApp};
