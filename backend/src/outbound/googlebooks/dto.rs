//! Wire shapes for the Google Books volumes API.
//!
//! DTOs mirror the JSON exactly and are converted into domain metadata at
//! the adapter edge; nothing outside this module sees the wire layout.

use serde::Deserialize;

use crate::domain::metadata::{VolumeMetadata, published_year};

/// Top-level response of `GET /books/v1/volumes?q=isbn:{isbn}`.
///
/// The service omits `items` entirely when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct VolumesResponseDto {
    #[serde(default)]
    pub items: Vec<VolumeDto>,
}

/// One matched volume.
#[derive(Debug, Deserialize)]
pub(crate) struct VolumeDto {
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfoDto,
}

/// The subset of `volumeInfo` this service consumes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumeInfoDto {
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f32>,
    #[serde(rename = "ratingsCount")]
    pub ratings_count: Option<i64>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

impl VolumeInfoDto {
    pub(crate) fn into_metadata(self) -> VolumeMetadata {
        VolumeMetadata {
            average_rating: self.average_rating,
            ratings_count: self.ratings_count,
            published_year: self.published_date.as_deref().and_then(published_year),
        }
    }
}
