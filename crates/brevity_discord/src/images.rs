//! Random fighter-jet photos from Flickr for term embeds.

use crate::{DiscordError, DiscordErrorKind, DiscordResult};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Flickr REST endpoint.
pub const FLICKR_ENDPOINT: &str = "https://www.flickr.com/services/rest/";
/// Flickr group the photos are drawn from.
pub const FIGHTER_JET_GROUP: &str = "38653945@N00";

const PHOTOS_PER_PAGE: u32 = 50;
const MAX_PAGE: u32 = 10;
// Licenses that allow reuse with attribution.
const LICENSES: &str = "1,2,4,5,7,9,10";

/// One photo from a Flickr search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlickrPhoto {
    /// Photo id
    pub id: String,
    /// Secret used to build the image URL
    pub secret: String,
    /// Server id
    pub server: String,
    /// Farm number
    pub farm: u32,
}

impl FlickrPhoto {
    /// Direct URL of the large (1024px) rendition.
    pub fn url(&self) -> String {
        format!(
            "https://farm{}.staticflickr.com/{}/{}_{}_b.jpg",
            self.farm, self.server, self.id, self.secret
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    stat: Option<String>,
    message: Option<String>,
    photos: Option<PhotoPage>,
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

/// Parses a `flickr.photos.search` JSON body.
pub fn parse_search(body: &str) -> DiscordResult<Vec<FlickrPhoto>> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
        DiscordError::new(DiscordErrorKind::ImageLookup(format!(
            "Malformed search response: {}",
            e
        )))
    })?;
    if response.stat.as_deref() == Some("fail") {
        return Err(DiscordError::new(DiscordErrorKind::ImageLookup(
            response
                .message
                .unwrap_or_else(|| "Flickr reported a failure".to_string()),
        )));
    }
    Ok(response.photos.map(|page| page.photo).unwrap_or_default())
}

/// Looks up random photos from the fighter-jet group.
#[derive(Debug, Clone)]
pub struct FlickrImages {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl FlickrImages {
    /// Creates a lookup using `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: FLICKR_ENDPOINT.to_string(),
        }
    }

    /// Points the lookup at another endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// URL of a random photo, or `None` when the lookup fails or finds nothing.
    pub async fn random_photo(&self) -> Option<String> {
        let page = rand::thread_rng().gen_range(1..=MAX_PAGE);
        match self.search(page).await {
            Ok(photos) => {
                let url = photos.choose(&mut rand::thread_rng()).map(FlickrPhoto::url);
                if url.is_none() {
                    debug!(page, "No photos on search page");
                }
                url
            }
            Err(e) => {
                warn!(error = %e, "Flickr image fetch failed");
                None
            }
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, page: u32) -> DiscordResult<Vec<FlickrPhoto>> {
        let query = [
            ("method", "flickr.photos.search".to_string()),
            ("api_key", self.api_key.clone()),
            ("group_id", FIGHTER_JET_GROUP.to_string()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
            ("per_page", PHOTOS_PER_PAGE.to_string()),
            ("page", page.to_string()),
            ("sort", "relevance".to_string()),
            ("content_type", "1".to_string()),
            ("media", "photos".to_string()),
            ("safe_search", "1".to_string()),
            ("license", LICENSES.to_string()),
        ];
        let body = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_search(&body)
    }
}
