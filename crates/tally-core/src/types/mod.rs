pub mod entity;
pub mod event;
pub mod load;
pub mod loaded_file;
pub mod query;
pub mod session;

pub use entity::EntityRank;
pub use event::{ActivityEvent, Event};
pub use load::{LoadSummary, UnitOutcome, UnitStats};
pub use loaded_file::LoadedFile;
pub use query::{Window, WindowQuery};
pub use session::Session;
