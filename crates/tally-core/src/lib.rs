pub mod commit;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod loaded_files;
pub mod orchestrator;
pub mod sessions;
pub mod store;
pub mod tally;
pub mod unit_loader;

pub mod types;

pub use crate::config::Config;
pub use crate::error::TallyError;
pub use crate::orchestrator::LoadOptions;
pub use crate::store::Store;
pub use crate::tally::Tally;
