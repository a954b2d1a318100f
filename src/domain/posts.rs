mod data;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::DomainError;

const CODE_FENCE: &str = "```";
const STRONG_MARKER: &str = "**";

/// Stable numeric identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u32);

impl PostId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{input}` is not a valid post id")]
pub struct InvalidPostId {
    pub input: String,
}

impl FromStr for PostId {
    type Err = InvalidPostId;

    /// Route segments are read the lenient way links produce them: leading whitespace
    /// and a sign are skipped, then the leading run of digits is the id and whatever
    /// follows it is ignored (`"3.0"` and `"2abc"` both resolve). No digits, a negative
    /// value or an overflow is invalid.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPostId {
            input: raw.to_string(),
        };

        let unsigned = raw.trim_start();
        let (negative, unsigned) = match unsigned.as_bytes().first() {
            Some(b'-') => (true, &unsigned[1..]),
            Some(b'+') => (false, &unsigned[1..]),
            _ => (false, unsigned),
        };
        let digits_end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());

        let value = unsigned[..digits_end]
            .parse::<u32>()
            .map_err(|_| invalid())?;
        if negative && value != 0 {
            return Err(invalid());
        }
        Ok(PostId(value))
    }
}

/// An immutable blog post as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub next_post_id: Option<PostId>,
}

impl Post {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
        next_post_id: Option<u32>,
    ) -> Self {
        Self {
            id: PostId(id),
            title: title.into(),
            summary: summary.into(),
            content: content.into(),
            next_post_id: next_post_id.map(PostId),
        }
    }

    /// Split the content into prose and fenced code blocks.
    pub fn blocks(&self) -> Vec<PostBlock> {
        parse_blocks(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBlock {
    Paragraph(Vec<Inline>),
    Code { language: String, code: String },
}

pub fn parse_blocks(content: &str) -> Vec<PostBlock> {
    content
        .split(CODE_FENCE)
        .enumerate()
        .filter_map(|(index, part)| {
            if index % 2 == 1 {
                Some(parse_code(part))
            } else {
                parse_paragraph(part)
            }
        })
        .collect()
}

fn parse_code(part: &str) -> PostBlock {
    let (language, code) = match part.find('\n') {
        Some(newline) => (&part[..newline], &part[newline..]),
        None => ("", part),
    };
    PostBlock::Code {
        language: language.trim().to_string(),
        code: code.trim().to_string(),
    }
}

fn parse_paragraph(part: &str) -> Option<PostBlock> {
    if part.trim().is_empty() {
        return None;
    }

    let inlines = part
        .split(STRONG_MARKER)
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(index, text)| {
            if index % 2 == 1 {
                Inline::Strong(text.to_string())
            } else {
                Inline::Text(text.to_string())
            }
        })
        .collect();

    Some(PostBlock::Paragraph(inlines))
}

/// Walk the `next_post_id` chain from its head.
///
/// The head is the only post no other post links to. Every post must be reached exactly
/// once; cycles, dangling links and disconnected chains are rejected.
pub fn reading_order(posts: &[Post]) -> Result<Vec<&Post>, DomainError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let by_id: HashMap<PostId, &Post> = posts.iter().map(|post| (post.id, post)).collect();
    if by_id.len() != posts.len() {
        return Err(DomainError::invariant("post ids are not unique"));
    }

    let linked: HashSet<PostId> = posts.iter().filter_map(|post| post.next_post_id).collect();
    let mut heads = posts.iter().filter(|post| !linked.contains(&post.id));
    let head = heads
        .next()
        .ok_or_else(|| DomainError::invariant("reading order has no starting post"))?;
    if let Some(extra) = heads.next() {
        return Err(DomainError::invariant(format!(
            "reading order has more than one starting post ({} and {})",
            head.id, extra.id
        )));
    }

    let mut order = Vec::with_capacity(posts.len());
    let mut seen = HashSet::with_capacity(posts.len());
    let mut cursor = Some(head);
    while let Some(post) = cursor {
        if !seen.insert(post.id) {
            return Err(DomainError::invariant(format!(
                "reading order loops back to post {}",
                post.id
            )));
        }
        order.push(post);
        cursor = match post.next_post_id {
            Some(next) => Some(by_id.get(&next).copied().ok_or_else(|| {
                DomainError::invariant(format!("post {} links to missing post {next}", post.id))
            })?),
            None => None,
        };
    }

    if order.len() != posts.len() {
        return Err(DomainError::invariant(format!(
            "reading order reaches {} of {} posts",
            order.len(),
            posts.len()
        )));
    }

    Ok(order)
}

/// The built-in lesson series served by the mock provider.
pub fn seed_posts() -> Vec<Post> {
    data::SEED
        .iter()
        .map(|seed| Post::new(seed.id, seed.title, seed.summary, seed.content, seed.next))
        .collect()
}
