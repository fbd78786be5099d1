// SPDX-License-Identifier: MPL-2.0
//! Filter categories offered by the search bar.

use crate::domain::interaction::InteractionKind;
use std::fmt;
use std::str::FromStr;

/// Predefined topics, searchable by their term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Nature,
    People,
    Technology,
    Animals,
    Sports,
}

impl Topic {
    /// All topics in menu order.
    pub const ALL: [Topic; 5] = [
        Topic::Nature,
        Topic::People,
        Topic::Technology,
        Topic::Animals,
        Topic::Sports,
    ];

    /// Term appended to the search text when the topic is selected.
    #[must_use]
    pub fn search_term(self) -> &'static str {
        match self {
            Topic::Nature => "nature",
            Topic::People => "people",
            Topic::Technology => "technology",
            Topic::Animals => "animals",
            Topic::Sports => "sports",
        }
    }
}

/// Category selected in the filter bar.
///
/// `Liked` and `Downloaded` are virtual categories backed by the
/// interaction store rather than the photo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Topic(Topic),
    Liked,
    Downloaded,
}

impl Category {
    /// All categories in menu order.
    #[must_use]
    pub fn menu() -> Vec<Category> {
        let mut items = vec![Category::All];
        items.extend(Topic::ALL.into_iter().map(Category::Topic));
        items.push(Category::Liked);
        items.push(Category::Downloaded);
        items
    }

    /// Returns `true` for the categories backed by the interaction store.
    #[must_use]
    pub fn is_interacted(self) -> bool {
        self.interaction_kind().is_some()
    }

    /// Interaction backing this category, if any.
    #[must_use]
    pub fn interaction_kind(self) -> Option<InteractionKind> {
        match self {
            Category::Liked => Some(InteractionKind::Like),
            Category::Downloaded => Some(InteractionKind::Download),
            Category::All | Category::Topic(_) => None,
        }
    }

    /// Search term contributed by the category, if any.
    #[must_use]
    pub fn search_term(self) -> Option<&'static str> {
        match self {
            Category::Topic(topic) => Some(topic.search_term()),
            _ => None,
        }
    }

    /// Returns the i18n key of the menu label.
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            Category::All => "category-all",
            Category::Topic(Topic::Nature) => "category-nature",
            Category::Topic(Topic::People) => "category-people",
            Category::Topic(Topic::Technology) => "category-technology",
            Category::Topic(Topic::Animals) => "category-animals",
            Category::Topic(Topic::Sports) => "category-sports",
            Category::Liked => "category-liked",
            Category::Downloaded => "category-downloaded",
        }
    }

    /// Returns the i18n key of the message shown when an interacted
    /// category is empty.
    #[must_use]
    pub fn empty_message_key(self) -> Option<&'static str> {
        match self {
            Category::Liked => Some("gallery-empty-liked"),
            Category::Downloaded => Some("gallery-empty-downloaded"),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str("all"),
            Category::Topic(topic) => f.write_str(topic.search_term()),
            Category::Liked => f.write_str("liked"),
            Category::Downloaded => f.write_str("downloaded"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() || normalized == "all" {
            return Ok(Category::All);
        }
        match normalized.as_str() {
            "liked" => return Ok(Category::Liked),
            "downloaded" => return Ok(Category::Downloaded),
            _ => {}
        }
        Topic::ALL
            .into_iter()
            .find(|topic| topic.search_term() == normalized)
            .map(Category::Topic)
            .ok_or_else(|| format!("unknown category: {}", s.trim()))
    }
}

/// Joins the query and the category's search term with a space, skipping
/// empty parts. Returns `None` when nothing remains, meaning the plain
/// listing endpoint should be used.
#[must_use]
pub fn compose_search_text(query: &str, category: Category) -> Option<String> {
    let parts: Vec<&str> = [Some(query.trim()), category.search_term()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
