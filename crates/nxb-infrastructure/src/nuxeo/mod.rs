//! Nuxeo REST API access.

mod client;
mod dto;

use std::sync::Arc;

use nxb_core::Result;
use nxb_core::repository::{RemoteRepository, RepositoryConnector};
use nxb_core::settings::ConnectionSettings;

pub use client::{ApiUrls, NuxeoClient, basic_authorization};

/// Opens a fresh [`NuxeoClient`] for every connection request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NuxeoConnector;

impl RepositoryConnector for NuxeoConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn RemoteRepository>> {
        tracing::info!(server = %settings.server_url, user = %settings.username, "opening Nuxeo session");
        Ok(Arc::new(NuxeoClient::new(settings)?))
    }
}
