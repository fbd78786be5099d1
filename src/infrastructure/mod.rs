// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. Both adapters speak JSON over HTTPS through `reqwest`.
//!
//! # Available Adapters
//!
//! - [`unsplash`]: Photo API client (implements [`PhotoSource`])
//! - [`supabase`]: PostgREST interaction table (implements [`InteractionStore`])
//!
//! # Design Notes
//!
//! - Wire formats are private DTOs mapped onto domain types
//! - Photo requests race their cancellation token; store calls run to completion
//!
//! [`PhotoSource`]: crate::application::port::PhotoSource
//! [`InteractionStore`]: crate::application::port::InteractionStore

pub mod supabase;
pub mod unsplash;

pub use supabase::{SupabaseStore, UnconfiguredStore};
pub use unsplash::UnsplashClient;
