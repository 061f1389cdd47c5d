pub mod form;
pub mod record;

pub use form::*;
pub use record::*;
