//! Plain-text rendering of feed and post views for the terminal.

use std::fmt::Write as _;

use crate::application::detail::{DetailState, PostDetail};
use crate::application::feed::FeedView;
use crate::application::pipeline::PostQuery;
use crate::domain::posts::{Inline, PostBlock};
use crate::domain::types::SortOrder;

const LOADING: &str = "Loading posts...";
const CODE_INDENT: &str = "    ";

pub fn render_feed(view: &FeedView) -> String {
    match view {
        FeedView::Loading => format!("{LOADING}\n"),
        FeedView::Failed { message } => format!("Error: {message}\n"),
        FeedView::Ready { posts, query } => {
            let mut out = render_query(query);

            if posts.is_empty() {
                out.push_str("No posts match your search.\n");
                return out;
            }

            for post in posts {
                let _ = writeln!(out, "  #{:<3} {}", post.id.get(), post.title);
                let _ = writeln!(out, "        {}", post.summary);
            }
            out
        }
    }
}

pub fn render_detail(state: &DetailState) -> String {
    match state {
        DetailState::Ready(detail) => render_post(detail),
        DetailState::Failed { message } => format!("{message}\n"),
        DetailState::Cancelled => String::new(),
    }
}

fn render_query(query: &PostQuery) -> String {
    let mut out = String::new();
    if !query.search.is_empty() {
        let _ = write!(out, "search \"{}\"  ", query.search);
    }
    if query.sort != SortOrder::Default {
        let _ = write!(out, "sort {}  ", query.sort);
    }
    if !out.is_empty() {
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}

fn render_post(detail: &PostDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.post.title);
    let _ = writeln!(out, "{}", "=".repeat(detail.post.title.chars().count()));

    for block in &detail.blocks {
        out.push('\n');
        match block {
            PostBlock::Paragraph(inlines) => {
                let mut paragraph = String::new();
                for inline in inlines {
                    match inline {
                        Inline::Text(text) => paragraph.push_str(text),
                        Inline::Strong(text) => {
                            let _ = write!(paragraph, "*{text}*");
                        }
                    }
                }
                out.push_str(paragraph.trim());
                out.push('\n');
            }
            PostBlock::Code { language, code } => {
                if !language.is_empty() {
                    let _ = writeln!(out, "{CODE_INDENT}[{language}]");
                }
                for line in code.lines() {
                    let _ = writeln!(out, "{CODE_INDENT}{line}");
                }
            }
        }
    }

    out.push('\n');
    match detail.next_post_id() {
        Some(next) => {
            let _ = writeln!(out, "Next lesson: quire show {next}");
        }
        None => out.push_str("You reached the last lesson.\n"),
    }
    out
}
