pub mod logging;
pub mod nuxeo;
pub mod paths;
pub mod settings_repository;
pub mod storage;
pub mod thumbnail_cache;

pub use crate::nuxeo::{NuxeoClient, NuxeoConnector};
pub use crate::settings_repository::TomlSettingsRepository;
pub use crate::thumbnail_cache::ThumbnailCache;
