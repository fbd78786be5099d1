// SPDX-License-Identifier: MPL-2.0
//! Search bar: free-text query and category menu.
//!
//! Typing only edits the local text; the shell debounces the edits with a
//! [`Debouncer`] before the gallery sees them. Submitting and choosing a
//! category are immediate.

use crate::domain::gallery::Category;
use std::time::{Duration, Instant};

/// Search bar state.
#[derive(Debug, Clone, Default)]
pub struct State {
    query: String,
    category: Category,
    menu_open: bool,
}

/// Messages for the search bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Text input changed.
    QueryChanged(String),
    /// Enter pressed or search button clicked.
    Submit,
    ToggleMenu,
    /// Click outside the menu.
    CloseMenu,
    SelectCategory(Category),
}

/// Effects propagated to the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// The text changed; forward it once it settles.
    QueryEdited(String),
    /// Search for the trimmed query in all categories.
    Search(String),
    /// Show a category with an empty query.
    CategorySelected(Category),
}

impl State {
    pub fn handle(&mut self, message: Message) -> Effect {
        match message {
            Message::QueryChanged(text) => {
                self.query = text;
                Effect::QueryEdited(self.query.clone())
            }
            Message::Submit => {
                let query = self.query.trim().to_string();
                self.category = Category::All;
                self.menu_open = false;
                Effect::Search(query)
            }
            Message::ToggleMenu => {
                self.menu_open = !self.menu_open;
                Effect::None
            }
            Message::CloseMenu => {
                self.menu_open = false;
                Effect::None
            }
            Message::SelectCategory(category) => {
                // A category never mixes with an earlier query.
                self.query.clear();
                self.category = category;
                self.menu_open = false;
                Effect::CategorySelected(category)
            }
        }
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
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Menu entries with their label keys, in display order.
    #[must_use]
    pub fn menu_entries(&self) -> Vec<(Category, &'static str, bool)> {
        Category::menu()
            .into_iter()
            .map(|category| (category, category.i18n_key(), category == self.category))
            .collect()
    }
}

/// Holds back a value until it has been stable for a fixed delay.
///
/// Time is passed in explicitly so the shell can drive it from its own
/// clock and tests stay deterministic.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the delay.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending value becomes ready.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Returns the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}
