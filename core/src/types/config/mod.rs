mod app;
mod core;
mod store;

pub use app::{
    AppConfig, AppConfigError, ImageConfig, MapConfig, MapProvider, ReportConfig, StatusConfig,
    StorageConfig,
};
pub use core::Config;
pub use store::StoreConfig;
