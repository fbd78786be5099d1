// SPDX-License-Identifier: MPL-2.0
//! Gallery orchestrator.
//!
//! Owns the photo list and the paging state. Every trigger that changes the
//! query or the category restarts from page one: the in-flight request is
//! cancelled and a fresh [`RequestId`] is issued, so late responses of the
//! previous request are recognised and dropped.
//!
//! The liked and downloaded categories are not paged. They are resolved by
//! the interacted-photos loader, which streams its batches back as
//! [`Message::InteractedChunk`].

use crate::app::config::{GalleryConfig, LayoutConfig};
use crate::application::cancel::CancellationToken;
use crate::application::port::SearchPage;
use crate::domain::gallery::{compose_search_text, Category, Page, PageSize};
use crate::domain::interaction::InteractionKind;
use crate::domain::photo::{Photo, PhotoId};
use crate::error::{Error, Result};
use crate::layout::MasonryParams;
use std::borrow::Cow;
use std::collections::HashSet;

/// Identifies one query/category generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Payload of a successful page request.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Listing(Vec<Photo>),
    Search(SearchPage),
}

/// What the gallery should render besides the photos themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// First page (or first chunk) still pending.
    Loading,
    /// Interacted category with nothing in it; carries the message key.
    Empty(&'static str),
    NoResults,
    Ready,
}

/// Tunables taken from the `[gallery]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub per_page: PageSize,
    /// Distance to the bottom, in pixels, below which the next page loads.
    pub prefetch_distance: f32,
}

impl Settings {
    #[must_use]
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            per_page: config.page_size(),
            prefetch_distance: config.prefetch_distance(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

#[derive(Debug, Clone)]
struct ActiveRequest {
    id: RequestId,
    cancel: CancellationToken,
}

/// Gallery state.
#[derive(Debug)]
pub struct State {
    settings: Settings,
    query: String,
    category: Category,
    photos: Vec<Photo>,
    known_ids: HashSet<PhotoId>,
    page: Page,
    /// The first page failed; the next scroll requests it again.
    retry_first: bool,
    has_more: bool,
    loading: bool,
    near_bottom: bool,
    /// Held from a scroll-triggered fetch until the end of the frame.
    scroll_locked: bool,
    active: Option<ActiveRequest>,
    next_request: u64,
    interacted_photos: Vec<Photo>,
    interacted_ready: bool,
}

/// Messages for the gallery.
#[derive(Debug, Clone)]
pub enum Message {
    /// The gallery became visible.
    Mounted,
    /// Debounced text of the search field.
    QueryChanged(String),
    /// Explicit search submission.
    Search(String),
    CategorySelected(Category),
    Scrolled { distance_to_bottom: f32 },
    /// End of the current frame; releases the scroll lock.
    FrameEnded,
    PageLoaded {
        request: RequestId,
        page: Page,
        result: Result<Fetched>,
    },
    InteractedChunk {
        request: RequestId,
        photos: Vec<Photo>,
    },
    InteractedLoaded {
        request: RequestId,
        result: Result<Vec<Photo>>,
    },
    /// A like or download was recorded somewhere in the app.
    InteractionsChanged(InteractionKind),
}

/// Effects propagated to the shell.
#[derive(Debug, Clone)]
pub enum Effect {
    None,
    /// Fetch one page; `text` selects the search endpoint when present.
    FetchPage {
        request: RequestId,
        text: Option<String>,
        page: Page,
        per_page: PageSize,
        cancel: CancellationToken,
    },
    LoadInteracted {
        request: RequestId,
        kind: InteractionKind,
        cancel: CancellationToken,
    },
    /// A request failed; the list was left as it was.
    LoadFailed(Error),
}

impl Default for State {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl State {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            query: String::new(),
            category: Category::All,
            photos: Vec::new(),
            known_ids: HashSet::new(),
            page: Page::FIRST,
            retry_first: false,
            has_more: true,
            loading: false,
            near_bottom: false,
            scroll_locked: false,
            active: None,
            next_request: 0,
            interacted_photos: Vec::new(),
            interacted_ready: false,
        }
    }

    pub fn handle(&mut self, message: Message) -> Effect {
        match message {
            Message::Mounted => self.restart(),
            Message::QueryChanged(text) => {
                if self.category.is_interacted() {
                    // Liked and downloaded lists are filtered locally.
                    self.query = text;
                    return Effect::None;
                }
                if text.trim() == self.query.trim() {
                    return Effect::None;
                }
                self.query = text;
                self.restart()
            }
            Message::Search(query) => {
                self.query = query;
                self.category = Category::All;
                self.restart()
            }
            Message::CategorySelected(category) => {
                self.query.clear();
                self.category = category;
                self.restart()
            }
            Message::Scrolled { distance_to_bottom } => self.on_scroll(distance_to_bottom),
            Message::FrameEnded => {
                self.scroll_locked = false;
                Effect::None
            }
            Message::PageLoaded {
                request,
                page,
                result,
            } => self.on_page_loaded(request, page, result),
            Message::InteractedChunk { request, photos } => {
                if !self.is_active(request) {
                    tracing::debug!(request = request.0, "discarding stale interacted chunk");
                    return Effect::None;
                }
                for photo in photos {
                    if !self.interacted_photos.iter().any(|p| p.id == photo.id) {
                        self.interacted_photos.push(photo);
                    }
                }
                self.interacted_ready = true;
                Effect::None
            }
            Message::InteractedLoaded { request, result } => {
                if !self.is_active(request) {
                    tracing::debug!(request = request.0, "discarding stale interacted load");
                    return Effect::None;
                }
                self.loading = false;
                match result {
                    Ok(photos) => {
                        self.interacted_photos = photos;
                        self.interacted_ready = true;
                        Effect::None
                    }
                    Err(Error::Cancelled) => Effect::None,
                    Err(e) => {
                        self.interacted_ready = true;
                        Effect::LoadFailed(e)
                    }
                }
            }
            Message::InteractionsChanged(kind) => {
                if self.category.interaction_kind() == Some(kind) {
                    self.restart()
                } else {
                    Effect::None
                }
            }
        }
    }

    fn is_active(&self, request: RequestId) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == request)
    }

    fn restart(&mut self) -> Effect {
        if let Some(previous) = self.active.take() {
            previous.cancel.cancel();
        }
        self.photos.clear();
        self.known_ids.clear();
        self.interacted_photos.clear();
        self.interacted_ready = false;
        self.page = Page::FIRST;
        self.retry_first = false;
        self.has_more = true;
        self.near_bottom = false;
        self.scroll_locked = false;
        self.loading = true;

        self.next_request += 1;
        let active = ActiveRequest {
            id: RequestId(self.next_request),
            cancel: CancellationToken::new(),
        };
        let effect = match self.category.interaction_kind() {
            Some(kind) => Effect::LoadInteracted {
                request: active.id,
                kind,
                cancel: active.cancel.clone(),
            },
            None => self.fetch_effect(&active),
        };
        self.active = Some(active);
        effect
    }

    fn fetch_effect(&self, active: &ActiveRequest) -> Effect {
        Effect::FetchPage {
            request: active.id,
            text: compose_search_text(&self.query, self.category),
            page: self.page,
            per_page: self.settings.per_page,
            cancel: active.cancel.clone(),
        }
    }

    fn on_scroll(&mut self, distance_to_bottom: f32) -> Effect {
        self.near_bottom = distance_to_bottom <= self.settings.prefetch_distance;
        if !self.near_bottom
            || !self.has_more
            || self.loading
            || self.scroll_locked
            || self.category.is_interacted()
        {
            return Effect::None;
        }
        let Some(active) = self.active.clone() else {
            return Effect::None;
        };

        self.scroll_locked = true;
        self.loading = true;
        if self.retry_first {
            self.retry_first = false;
        } else {
            self.page = self.page.next();
        }
        self.fetch_effect(&active)
    }

    fn on_page_loaded(&mut self, request: RequestId, page: Page, result: Result<Fetched>) -> Effect {
        if !self.is_active(request) {
            tracing::debug!(request = request.0, page = page.value(), "discarding stale page");
            return Effect::None;
        }
        self.loading = false;

        match result {
            Ok(Fetched::Listing(photos)) => {
                self.has_more = self.settings.per_page.is_full(photos.len());
                self.append(photos);
                Effect::None
            }
            Ok(Fetched::Search(found)) => {
                self.has_more = found.has_more_after(page);
                self.append(found.results);
                Effect::None
            }
            Err(Error::Cancelled) => Effect::None,
            Err(e) => {
                tracing::warn!(page = page.value(), error = %e, "page request failed");
                // The next scroll retries the same page.
                if self.page == page {
                    if page.is_first() {
                        self.retry_first = true;
                    } else {
                        self.page = page.previous();
                    }
                }
                Effect::LoadFailed(e)
            }
        }
    }

    fn append(&mut self, photos: Vec<Photo>) {
        for photo in photos {
            if photo.is_displayable() && self.known_ids.insert(photo.id.clone()) {
                self.photos.push(photo);
            }
        }
    }

    /// Photos to render, in order.
    #[must_use]
    pub fn displayed(&self) -> Cow<'_, [Photo]> {
        if !self.category.is_interacted() {
            return Cow::Borrowed(&self.photos);
        }
        let needle = self.query.trim();
        if needle.is_empty() {
            Cow::Borrowed(&self.interacted_photos)
        } else {
            Cow::Owned(
                self.interacted_photos
                    .iter()
                    .filter(|photo| photo.matches_text(needle))
                    .cloned()
                    .collect(),
            )
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.category.is_interacted() {
            if !self.interacted_ready {
                return Status::Loading;
            }
            if self.displayed().is_empty() {
                return match self.category.empty_message_key() {
                    Some(key) if self.query.trim().is_empty() => Status::Empty(key),
                    _ => Status::NoResults,
                };
            }
            return Status::Ready;
        }

        if self.photos.is_empty() {
            if self.loading {
                Status::Loading
            } else {
                Status::NoResults
            }
        } else {
            Status::Ready
        }
    }

    /// Returns `true` when filler placeholders should pad the columns.
    #[must_use]
    pub fn show_placeholders(&self) -> bool {
        !self.category.is_interacted()
            && !self.page.is_first()
            && self.has_more
            && (self.loading || self.near_bottom)
    }

    /// Layout parameters for the current state and `layout` settings.
    #[must_use]
    pub fn masonry_params(&self, layout: &LayoutConfig) -> MasonryParams {
        MasonryParams::new(layout.column_count(), layout.container_width(), layout.gap())
            .with_placeholders(self.show_placeholders())
            .with_filler(layout.filler_spec())
    }

    /// Returns `true` while a page after the first is in flight.
    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.loading && !self.photos.is_empty()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn active_request(&self) -> Option<RequestId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Cancels the in-flight request, if any.
    pub fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        self.loading = false;
    }
}
