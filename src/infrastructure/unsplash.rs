// SPDX-License-Identifier: MPL-2.0
//! Photo API adapter implementing the [`PhotoSource`] port.
//!
//! Talks to an Unsplash-compatible REST API:
//!
//! - `GET /photos?page&per_page` for the editorial listing
//! - `GET /search/photos?query&page&per_page` for text search
//! - `GET /photos/{id}` for single lookups
//!
//! Every request carries `Authorization: Client-ID <key>` and
//! `Accept-Version: v1`. Responses are decoded into private DTOs and mapped
//! onto domain [`Photo`]s.

use crate::app::config::USER_AGENT;
use crate::application::cancel::{run_cancellable, CancellationToken};
use crate::application::port::{PhotoSource, SearchPage};
use crate::domain::gallery::{Page, PageSize};
use crate::domain::photo::{Photo, PhotoId, PhotoUrls};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Version header pinned by the API.
const ACCEPT_VERSION: &str = "accept-version";

#[derive(Debug, Default, Deserialize)]
struct UrlsDto {
    #[serde(default)]
    raw: String,
    #[serde(default)]
    full: String,
    #[serde(default)]
    regular: String,
    #[serde(default)]
    small: String,
    #[serde(default)]
    thumb: String,
}

#[derive(Debug, Deserialize)]
struct PhotoDto {
    id: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    urls: UrlsDto,
}

impl From<PhotoDto> for Photo {
    fn from(dto: PhotoDto) -> Self {
        let mut photo = Photo::new(dto.id, dto.width, dto.height).with_urls(PhotoUrls {
            raw: dto.urls.raw,
            full: dto.urls.full,
            regular: dto.urls.regular,
            small: dto.urls.small,
            thumb: dto.urls.thumb,
        });
        photo.color = dto.color;
        photo.description = dto.description;
        photo.alt_description = dto.alt_description;
        photo
    }
}

#[derive(Debug, Deserialize)]
struct SearchDto {
    #[serde(default)]
    total: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    results: Vec<PhotoDto>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDto {
    #[serde(default)]
    errors: Vec<String>,
}

/// Builds the message of an API error from the response body.
fn api_error(status: reqwest::StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorDto>(body)
        .ok()
        .filter(|dto| !dto.errors.is_empty())
        .map(|dto| dto.errors.join("; "))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| body.trim().to_string(), str::to_string)
        });
    Error::Api {
        status: status.as_u16(),
        message,
    }
}

/// Picks the best available URL for a full-resolution download.
fn download_url(photo: &Photo) -> Option<&str> {
    [&photo.urls.full, &photo.urls.raw, &photo.urls.regular]
        .into_iter()
        .find(|url| !url.is_empty())
        .map(String::as_str)
}

/// HTTP client for the photo API.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    base_url: String,
}

impl UnsplashClient {
    /// Creates a client for `base_url` authenticated with `access_key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key cannot be sent as a header value,
    /// or [`Error::Http`] if the TLS backend fails to initialise.
    pub fn new(base_url: &str, access_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Client-ID {access_key}"))
            .map_err(|e| Error::Config(format!("invalid photo API key: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT_VERSION, HeaderValue::from_static("v1"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "photo API request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::Http(format!("invalid response from {path}: {e}")))
    }
}

fn paging(page: Page, per_page: PageSize) -> [(&'static str, String); 2] {
    [
        ("page", page.value().to_string()),
        ("per_page", per_page.value().to_string()),
    ]
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    async fn list(
        &self,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Photo>> {
        let query = paging(page, per_page);
        let photos: Vec<PhotoDto> = run_cancellable(cancel, self.get_json("photos", &query)).await?;
        Ok(photos.into_iter().map(Photo::from).collect())
    }

    async fn search(
        &self,
        query: &str,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<SearchPage> {
        let [page_param, per_page_param] = paging(page, per_page);
        let params = [("query", query.to_string()), page_param, per_page_param];
        let dto: SearchDto =
            run_cancellable(cancel, self.get_json("search/photos", &params)).await?;
        Ok(SearchPage {
            total: dto.total,
            total_pages: dto.total_pages,
            results: dto.results.into_iter().map(Photo::from).collect(),
        })
    }

    async fn photo(&self, id: &PhotoId, cancel: &CancellationToken) -> Result<Photo> {
        let path = format!("photos/{}", id.as_str());
        let dto: PhotoDto = run_cancellable(cancel, self.get_json(&path, &[])).await?;
        Ok(dto.into())
    }

    async fn download(&self, photo: &Photo, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let url = download_url(photo).ok_or_else(|| Error::Api {
            status: 404,
            message: format!("photo {} has no downloadable URL", photo.id),
        })?;

        run_cancellable(cancel, async {
            let response = self.http.get(url).send().await?.error_for_status()?;
            Ok::<_, Error>(response.bytes().await?.to_vec())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTO_JSON: &str = r##"{
        "id": "Dwu85P9SOIk",
        "width": 2448,
        "height": 3264,
        "color": "#6E633A",
        "description": "A man drinking a coffee.",
        "alt_description": "man holding cup",
        "likes": 24,
        "urls": {
            "raw": "https://images.test/raw",
            "full": "https://images.test/full",
            "regular": "https://images.test/regular",
            "small": "https://images.test/small",
            "thumb": "https://images.test/thumb"
        }
    }"##;

    #[test]
    fn photo_dto_maps_to_domain_photo() {
        let dto: PhotoDto = serde_json::from_str(PHOTO_JSON).unwrap();
        let photo = Photo::from(dto);

        assert_eq!(photo.id.as_str(), "Dwu85P9SOIk");
        assert_eq!((photo.width, photo.height), (2448, 3264));
        assert_eq!(photo.urls.small, "https://images.test/small");
        assert_eq!(photo.alt_description.as_deref(), Some("man holding cup"));
        assert_eq!(photo.color.as_deref(), Some("#6E633A"));
        assert!(photo.is_displayable());
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let dto: PhotoDto = serde_json::from_str(r#"{"id":"x","description":null}"#).unwrap();
        let photo = Photo::from(dto);
        assert_eq!(photo.width, 0);
        assert!(photo.urls.full.is_empty());
        assert!(!photo.is_displayable());
    }

    #[test]
    fn search_dto_parses_envelope() {
        let json = format!(r#"{{"total":133,"total_pages":23,"results":[{PHOTO_JSON}]}}"#);
        let dto: SearchDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.total, 133);
        assert_eq!(dto.total_pages, 23);
        assert_eq!(dto.results.len(), 1);
    }

    #[test]
    fn api_error_prefers_error_list() {
        let err = api_error(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"errors":["OAuth error: The access token is invalid"]}"#,
        );
        assert_eq!(
            err,
            Error::Api {
                status: 401,
                message: "OAuth error: The access token is invalid".into()
            }
        );
    }

    #[test]
    fn api_error_falls_back_to_reason_phrase() {
        let err = api_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "Rate Limit Exceeded");
        assert_eq!(
            err,
            Error::Api {
                status: 429,
                message: "Too Many Requests".into()
            }
        );
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = UnsplashClient::new("https://api.test/", "key").unwrap();
        assert_eq!(client.endpoint("/photos"), "https://api.test/photos");
        assert_eq!(client.endpoint("search/photos"), "https://api.test/search/photos");
    }

    #[test]
    fn invalid_key_is_a_config_error() {
        let err = UnsplashClient::new("https://api.test", "bad\nkey").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn download_prefers_full_resolution() {
        let dto: PhotoDto = serde_json::from_str(PHOTO_JSON).unwrap();
        let photo = Photo::from(dto);
        assert_eq!(download_url(&photo), Some("https://images.test/full"));
        assert_eq!(download_url(&Photo::new("x", 1, 1)), None);
    }
}
