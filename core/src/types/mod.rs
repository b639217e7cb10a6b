pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, Config, ImageConfig, MapConfig, MapProvider, ReportConfig,
    StatusConfig, StorageConfig, StoreConfig,
};

pub(crate) mod report_id;
pub use report_id::{MAX_REPORT_ID_LENGTH, ReportId, ReportIdError};

pub(crate) mod status;
pub use status::{Status, UnknownStatus};

pub(crate) mod report;
pub use report::{Coordinates, NewReport, Report};
