//! View building shared by the terminal dashboard, the HTML map and the
//! `summary` command. Everything here is a pure function of the dataset.

pub mod cluster;
pub mod html;
pub mod links;
pub mod table;

pub use cluster::*;
pub use html::*;
pub use links::*;
pub use table::*;
