//! HTTP adapter for the Google Books volumes API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::VolumeMetadata;
use crate::domain::book::Isbn;
use crate::domain::ports::{MetadataSource, MetadataSourceError};

use super::dto::VolumesResponseDto;

/// Public volumes endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

const USER_AGENT: &str = concat!("bookrack/", env!("CARGO_PKG_VERSION"));

/// Metadata source querying the Google Books volumes API.
///
/// One [`MetadataSource::fetch`] call is exactly one outbound request with a
/// bounded timeout. Failure handling lives with the caller; this adapter only
/// classifies what went wrong.
#[derive(Clone)]
pub struct GoogleBooksSource {
    client: Client,
    endpoint: String,
}

impl GoogleBooksSource {
    /// Build a source against the given endpoint with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MetadataSource for GoogleBooksSource {
    async fn fetch(&self, isbn: &Isbn) -> Result<VolumeMetadata, MetadataSourceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", format!("isbn:{isbn}"))])
            .send()
            .await
            .map_err(|error| MetadataSourceError::transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataSourceError::status(status.as_u16()));
        }

        let decoded: VolumesResponseDto = response
            .json()
            .await
            .map_err(|error| MetadataSourceError::decode(error.to_string()))?;

        // The API orders matches by relevance; the first volume is the one
        // the original data set keys on.
        let Some(volume) = decoded.items.into_iter().next() else {
            return Err(MetadataSourceError::NoMatch);
        };
        Ok(volume.volume_info.into_metadata())
    }
}
