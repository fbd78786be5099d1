// SPDX-License-Identifier: MPL-2.0
//! Interaction value types.
//!
//! The like value is binary (stored as 0/1) and never incremented past 1.
//! The download value is a strictly increasing counter.

use crate::domain::photo::PhotoId;
use std::fmt;

/// Opaque token scoping all interaction rows to one installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary key of an interaction row in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub i64);

/// Binary like state, persisted as `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeFlag(bool);

impl LikeFlag {
    pub const LIKED: Self = Self(true);
    pub const NOT_LIKED: Self = Self(false);

    #[must_use]
    pub fn new(liked: bool) -> Self {
        Self(liked)
    }

    /// Interprets a stored column value; any positive value counts as liked.
    #[must_use]
    pub fn from_stored(value: i64) -> Self {
        Self(value > 0)
    }

    #[must_use]
    pub fn is_liked(self) -> bool {
        self.0
    }

    /// Returns the value written to the store.
    #[must_use]
    pub fn stored(self) -> i64 {
        i64::from(self.0)
    }
}

/// Number of times the session downloaded an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DownloadCount(u32);

impl DownloadCount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn new(count: u32) -> Self {
        Self(count)
    }

    /// Interprets a stored column value; negative values read as zero.
    #[must_use]
    pub fn from_stored(value: i64) -> Self {
        Self(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the next count.
    #[must_use]
    pub fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Which interaction a query or a cache entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Like,
    Download,
}

impl InteractionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Like => "liked",
            InteractionKind::Download => "downloaded",
        }
    }
}

/// Persisted interaction row for one (image, session) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub row_id: RowId,
    pub likes: LikeFlag,
    pub downloads: DownloadCount,
}

impl Interaction {
    /// Returns `true` when both the like and the download count are at
    /// their zero baseline, the only state in which the row may be deleted.
    #[must_use]
    pub fn is_baseline(&self) -> bool {
        !self.likes.is_liked() && self.downloads.is_zero()
    }
}

/// Row to insert on the first like or the first download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteraction {
    pub image_id: PhotoId,
    pub session_id: SessionId,
    pub likes: LikeFlag,
    pub downloads: DownloadCount,
}

impl NewInteraction {
    #[must_use]
    pub fn first_like(image_id: PhotoId, session_id: SessionId) -> Self {
        Self {
            image_id,
            session_id,
            likes: LikeFlag::LIKED,
            downloads: DownloadCount::ZERO,
        }
    }

    #[must_use]
    pub fn first_download(image_id: PhotoId, session_id: SessionId) -> Self {
        Self {
            image_id,
            session_id,
            likes: LikeFlag::NOT_LIKED,
            downloads: DownloadCount::new(1),
        }
    }
}

/// Partial update of an existing row. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionPatch {
    pub likes: Option<LikeFlag>,
    pub downloads: Option<DownloadCount>,
}

impl InteractionPatch {
    #[must_use]
    pub fn likes(flag: LikeFlag) -> Self {
        Self {
            likes: Some(flag),
            downloads: None,
        }
    }

    #[must_use]
    pub fn downloads(count: DownloadCount) -> Self {
        Self {
            likes: None,
            downloads: Some(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_flag_is_binary() {
        assert!(LikeFlag::from_stored(1).is_liked());
        assert!(LikeFlag::from_stored(7).is_liked());
        assert!(!LikeFlag::from_stored(0).is_liked());
        assert_eq!(LikeFlag::from_stored(7).stored(), 1);
        assert_eq!(LikeFlag::NOT_LIKED.stored(), 0);
    }

    #[test]
    fn download_count_never_reads_negative() {
        assert_eq!(DownloadCount::from_stored(-3), DownloadCount::ZERO);
        assert_eq!(DownloadCount::from_stored(4).value(), 4);
    }

    #[test]
    fn download_count_increments_strictly() {
        let count = DownloadCount::new(2);
        assert!(count.incremented() > count);
        assert_eq!(DownloadCount::new(u32::MAX).incremented().value(), u32::MAX);
    }

    #[test]
    fn baseline_requires_both_zero() {
        let mut row = Interaction {
            row_id: RowId(1),
            likes: LikeFlag::NOT_LIKED,
            downloads: DownloadCount::ZERO,
        };
        assert!(row.is_baseline());
        row.downloads = DownloadCount::new(1);
        assert!(!row.is_baseline());
        row.downloads = DownloadCount::ZERO;
        row.likes = LikeFlag::LIKED;
        assert!(!row.is_baseline());
    }

    #[test]
    fn first_rows_have_expected_values() {
        let like = NewInteraction::first_like("p".into(), SessionId::new("s"));
        assert!(like.likes.is_liked());
        assert!(like.downloads.is_zero());

        let download = NewInteraction::first_download("p".into(), SessionId::new("s"));
        assert!(!download.likes.is_liked());
        assert_eq!(download.downloads.value(), 1);
    }
}
