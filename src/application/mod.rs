// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`interactions`]: Like/download rules on top of the interaction store
//! - [`interacted`]: Resolution of liked/downloaded ids into photos
//! - [`events`]: Invalidation channel for interaction changes
//! - [`cancel`]: Cooperative cancellation of remote calls
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services

pub mod cancel;
pub mod events;
pub mod interacted;
pub mod interactions;
pub mod port;
