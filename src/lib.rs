pub mod config;
pub mod error;
pub mod font;
pub mod generator;
pub mod icon;
pub mod logger;
pub mod manifest;
pub mod models;

pub use config::{Config, ICON_SIZES, IconStyle};
pub use error::IconError;
pub use generator::{GeneratedIcon, generate_icons, icon_file_name, run};
