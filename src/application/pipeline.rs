//! Search and sort over the store's post list.
//!
//! Everything here is pure: the derived list is recomputed from its inputs and the
//! store's list is only ever borrowed.

use std::cmp::Ordering;

use crate::domain::posts::Post;
use crate::domain::types::SortOrder;

/// Inputs of the derived list besides the posts themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: String,
    pub sort: SortOrder,
}

impl PostQuery {
    pub fn new(search: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }
}

/// `sort(filter(posts, query.search), query.sort)`.
pub fn derive<'a>(posts: &'a [Post], query: &PostQuery) -> Vec<&'a Post> {
    let mut derived = filter(posts, &query.search);
    sort(&mut derived, query.sort);
    derived
}

/// Posts whose title or summary contains `search`, ignoring case. Empty search keeps all.
pub fn filter<'a>(posts: &'a [Post], search: &str) -> Vec<&'a Post> {
    if search.is_empty() {
        return posts.iter().collect();
    }

    let needle = search.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&needle)
                || post.summary.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn sort(posts: &mut [&Post], order: SortOrder) {
    match order {
        SortOrder::Default => {}
        SortOrder::Ascending => posts.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortOrder::Descending => {
            posts.sort_by(|a, b| compare_titles(&a.title, &b.title));
            posts.reverse();
        }
    }
}

/// Case-insensitive ordering first; on a case-only difference lowercase sorts first.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    left.chars()
        .zip(right.chars())
        .find_map(|(l, r)| match (l.is_lowercase(), r.is_lowercase()) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}
