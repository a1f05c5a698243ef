pub mod constants;
pub mod settings;

pub use settings::{AutoAdvanceSettings, CarouselSettings, SettingsError};
