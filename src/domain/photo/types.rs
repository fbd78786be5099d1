// SPDX-License-Identifier: MPL-2.0
//! Core photo types for the domain layer.

use std::fmt;

/// Identifier of a photo in the remote photo API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(String);

impl PhotoId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Image URLs at the resolutions offered by the photo API.
///
/// Missing resolutions are represented by empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// A photo as returned by the photo API.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    pub urls: PhotoUrls,
    pub alt_description: Option<String>,
    pub description: Option<String>,
    /// Dominant color as a CSS hex string (e.g. `#a3b1c2`).
    pub color: Option<String>,
}

impl Photo {
    /// Creates a photo with the given id and natural size and no URLs.
    #[must_use]
    pub fn new(id: impl Into<PhotoId>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            urls: PhotoUrls::default(),
            alt_description: None,
            description: None,
            color: None,
        }
    }

    /// Sets the URLs.
    #[must_use]
    pub fn with_urls(mut self, urls: PhotoUrls) -> Self {
        self.urls = urls;
        self
    }

    /// Sets the alternative text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt_description = Some(alt.into());
        self
    }

    /// Returns `height / width`, or 1.0 when either dimension is unknown.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.height as f32 / self.width as f32
    }

    /// Returns `true` if the photo can be placed in the grid.
    ///
    /// A displayable photo has an id, known dimensions and a grid-sized URL.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        !self.id.is_empty() && self.width > 0 && self.height > 0 && !self.urls.small.is_empty()
    }

    /// Returns `true` if `needle` occurs in the alt text or description,
    /// ignoring case. An empty needle matches every photo.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.alt_description, &self.description]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&needle))
    }

    /// File name used when the full-resolution image is saved to disk.
    ///
    /// The id comes from the remote API, so everything but ASCII
    /// alphanumerics, `-` and `_` is replaced with `_`. The result is always
    /// a single path component.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        let stem: String = self
            .id
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "photo.jpg".to_string()
        } else {
            format!("{stem}.jpg")
        }
    }
}
