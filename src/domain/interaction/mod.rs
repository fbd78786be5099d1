// SPDX-License-Identifier: MPL-2.0
//! Interaction domain types.
//!
//! An interaction row records, for one session, whether an image is liked
//! and how many times it was downloaded.

pub mod types;

pub use types::{
    DownloadCount, Interaction, InteractionKind, InteractionPatch, LikeFlag, NewInteraction,
    RowId, SessionId,
};
