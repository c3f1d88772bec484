//! Blog articles and the category filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::BlogPostId;

/// A fixed blog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogCategory {
    Nutrition,
    Yoga,
    Meditation,
    LifeCoaching,
    Wellness,
    Lifestyle,
}

impl BlogCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Nutrition,
        Self::Yoga,
        Self::Meditation,
        Self::LifeCoaching,
        Self::Wellness,
        Self::Lifestyle,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nutrition => "Nutrition",
            Self::Yoga => "Yoga",
            Self::Meditation => "Meditation",
            Self::LifeCoaching => "Life Coaching",
            Self::Wellness => "Wellness",
            Self::Lifestyle => "Lifestyle",
        }
    }
}

/// Category filter for the blog list. `All` means unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(BlogCategory),
}

impl CategoryFilter {
    /// Label of the "no filter" choice.
    pub const ALL_LABEL: &'static str = "All";

    /// Resolve a label from the UI.
    ///
    /// Labels are compared case-sensitively against the fixed set; anything
    /// unrecognised (including a missing label) means `All`.
    ///
    /// ```
    /// use prana_core::{BlogCategory, CategoryFilter};
    ///
    /// assert_eq!(
    ///     CategoryFilter::from_label("Life Coaching"),
    ///     CategoryFilter::Only(BlogCategory::LifeCoaching)
    /// );
    /// assert_eq!(CategoryFilter::from_label("yoga"), CategoryFilter::All);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        BlogCategory::ALL
            .into_iter()
            .find(|category| category.label() == label)
            .map_or(Self::All, Self::Only)
    }

    /// Display label (`"All"` for the unfiltered choice).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(category) => category.label(),
        }
    }

    /// Value of the `category` query parameter sent to the backend.
    ///
    /// `None` for `All`, otherwise the label in lowercase.
    #[must_use]
    pub fn query_value(self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Only(category) => Some(category.label().to_lowercase()),
        }
    }

    /// Every choice the UI offers, starting with `All`.
    pub fn choices() -> impl Iterator<Item = Self> {
        std::iter::once(Self::All).chain(BlogCategory::ALL.into_iter().map(Self::Only))
    }
}

/// A published blog article as returned by the content backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(alias = "_id")]
    pub id: BlogPostId,
    pub title: String,
    /// Short teaser shown on the list page.
    #[serde(default)]
    pub small_description: String,
    /// Full article body, already rendered to HTML by the backend.
    #[serde(default)]
    pub main_description: String,
    #[serde(default)]
    pub author_name: String,
    /// Estimated read time in minutes.
    #[serde(default)]
    pub estimate_read_time: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blog_image: Option<String>,
    /// Publication time; `None` when the backend sends null or omits it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Case-insensitive substring match over the title and short description.
    ///
    /// An empty query matches every post.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.small_description.to_lowercase().contains(&needle)
    }
}
