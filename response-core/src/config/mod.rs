//! Response-calculation configuration

pub mod store;

pub use store::{load, load_from, ResponseConfig, CONFIG_FILE_NAME};
