//! Blog list view state: category filter, search query and pagination.
//!
//! Posts are fetched per category, then narrowed by the search query, then
//! paged. Backend order is kept throughout.

use std::fmt::Write as _;

use serde::Deserialize;

use prana_core::{BlogPost, CategoryFilter};

/// Posts per page.
pub const PAGE_SIZE: usize = 6;

/// Query string of the blog list (`/blog?category=Yoga&q=breath&page=2`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    /// Kept as text so a malformed page number falls back to page 1
    /// instead of rejecting the request.
    pub page: Option<String>,
}

/// What the visitor is looking at on the blog list.
///
/// Changing the category or the query always sends the visitor back to
/// page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogListState {
    category: CategoryFilter,
    query: String,
    page: usize,
}

impl Default for BlogListState {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            query: String::new(),
            page: 1,
        }
    }
}

impl From<BlogQuery> for BlogListState {
    fn from(params: BlogQuery) -> Self {
        let mut state = Self::default();
        state.set_category(
            params
                .category
                .as_deref()
                .map_or(CategoryFilter::All, CategoryFilter::from_label),
        );
        state.set_query(params.q.unwrap_or_default());
        state.go_to(
            params
                .page
                .and_then(|page| page.parse().ok())
                .unwrap_or(1),
        );
        state
    }
}

impl BlogListState {
    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Select a category; a different category resets to page 1.
    pub fn set_category(&mut self, category: CategoryFilter) {
        if category != self.category {
            self.category = category;
            self.page = 1;
        }
    }

    /// Change the search query; a different query resets to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    /// Request a page. Zero is treated as page 1; the upper bound is applied
    /// when the page is rendered.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Narrow `posts` by the query and cut out the requested page.
    #[must_use]
    pub fn apply<'a>(&self, posts: &'a [BlogPost]) -> Page<&'a BlogPost> {
        paginate(search(posts, &self.query), self.page)
    }

    /// Link to this state.
    #[must_use]
    pub fn href(&self) -> String {
        self.href_with_base("/blog")
    }

    /// Link to this state on a different path (e.g. the results fragment).
    #[must_use]
    pub fn href_with_base(&self, base: &str) -> String {
        let mut params = Vec::new();
        if let CategoryFilter::Only(_) = self.category {
            params.push(format!(
                "category={}",
                urlencoding::encode(self.category.label())
            ));
        }
        if !self.query.is_empty() {
            params.push(format!("q={}", urlencoding::encode(&self.query)));
        }
        if self.page > 1 {
            params.push(format!("page={}", self.page));
        }

        let mut href = base.to_string();
        if !params.is_empty() {
            let _ = write!(href, "?{}", params.join("&"));
        }
        href
    }

    /// Link to the same view with a different category (and page 1).
    #[must_use]
    pub fn href_for_category(&self, category: CategoryFilter) -> String {
        let mut next = self.clone();
        next.set_category(category);
        next.page = 1;
        next.href()
    }

    /// Link to another page of the same view.
    #[must_use]
    pub fn href_for_page(&self, page: usize) -> String {
        let mut next = self.clone();
        next.go_to(page);
        next.href()
    }
}

/// Case-insensitive search over title and short description.
#[must_use]
pub fn search<'a>(posts: &'a [BlogPost], query: &str) -> Vec<&'a BlogPost> {
    posts.iter().filter(|post| post.matches_query(query)).collect()
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown.
    pub number: usize,
    /// Zero when there is nothing to show.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Page numbers for the pager.
    pub fn numbers(&self) -> impl Iterator<Item = usize> {
        1..=self.total_pages
    }
}

/// Cut page `page` (1-based) out of `items`, [`PAGE_SIZE`] per page.
///
/// Out-of-range pages are clamped to the nearest existing page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE);
    let number = page.clamp(1, total_pages.max(1));

    let items = items
        .into_iter()
        .skip((number - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Page {
        items,
        number,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prana_core::BlogCategory;

    use super::*;

    fn post(id: u32, title: &str, small: &str) -> BlogPost {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "smallDescription": small,
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn posts(n: u32) -> Vec<BlogPost> {
        (1..=n).map(|i| post(i, &format!("Post {i}"), "")).collect()
    }

    #[test]
    fn test_search_hits_small_description_only_match() {
        let all = vec![
            post(1, "Sleep hygiene", "Wind down routines"),
            post(2, "Gut health", "Fermented foods and turmeric"),
        ];
        let hits = search(&all, "TURMERIC");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "2");
        assert!(search(&all, "ashwagandha").is_empty());
    }

    #[test]
    fn test_paginate_splits_by_six() {
        let page = paginate((1..=13).collect::<Vec<_>>(), 2);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_clamps_past_last_page() {
        let page = paginate((1..=13).collect::<Vec<_>>(), 99);
        assert_eq!(page.number, 3);
        assert_eq!(page.items, vec![13]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 4);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.numbers().count(), 0);
    }

    #[test]
    fn test_changing_category_resets_page() {
        let mut state = BlogListState::default();
        state.go_to(3);
        state.set_category(CategoryFilter::Only(BlogCategory::Yoga));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_same_category_keeps_page() {
        let mut state = BlogListState::default();
        state.set_category(CategoryFilter::Only(BlogCategory::Yoga));
        state.go_to(2);
        state.set_category(CategoryFilter::Only(BlogCategory::Yoga));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_changing_query_resets_page() {
        let mut state = BlogListState::default();
        state.go_to(2);
        state.set_query("yoga");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_from_query_keeps_requested_page() {
        let state = BlogListState::from(BlogQuery {
            category: Some("Life Coaching".to_string()),
            q: Some("habits".to_string()),
            page: Some("2".to_string()),
        });
        assert_eq!(state.page(), 2);
        assert_eq!(
            state.category(),
            CategoryFilter::Only(BlogCategory::LifeCoaching)
        );
        assert_eq!(state.href(), "/blog?category=Life%20Coaching&q=habits&page=2");
    }

    #[test]
    fn test_unknown_category_is_all() {
        let state = BlogListState::from(BlogQuery {
            category: Some("yoga".to_string()),
            ..BlogQuery::default()
        });
        assert_eq!(state.category(), CategoryFilter::All);
    }

    #[test]
    fn test_malformed_page_is_first_page() {
        let state = BlogListState::from(BlogQuery {
            page: Some("two".to_string()),
            ..BlogQuery::default()
        });
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_category_link_drops_page() {
        let mut state = BlogListState::default();
        state.go_to(3);
        assert_eq!(
            state.href_for_category(CategoryFilter::Only(BlogCategory::Wellness)),
            "/blog?category=Wellness"
        );
        assert_eq!(state.href_for_category(CategoryFilter::All), "/blog");
    }

    #[test]
    fn test_apply_filters_then_pages() {
        let all = posts(8);
        let mut state = BlogListState::default();
        state.go_to(2);
        let page = state.apply(&all);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Post 7");

        state.set_query("Post 8");
        let page = state.apply(&all);
        assert_eq!(page.number, 1);
        assert_eq!(page.items.len(), 1);
    }
}
