//! Read-only blog content from the Blogger v3 API.
//!
//! Posts are fetched with bodies, mapped into [`BlogPost`] values, and
//! displayed as-is; nothing is ever written back. Post bodies arrive as
//! HTML, so a small tag stripper turns them into plain text for the
//! terminal (no crate in our stack covers this).

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;

const EXCERPT_CHARS: usize = 200;

/// One blog post, already flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub published: String,
    pub author: String,
    pub url: String,
    pub excerpt: String,
}

pub struct BlogClient {
    api_key: String,
    blog_id: String,
    api_base: String,
    client: reqwest::Client,
}

// --- API Response Types ---

#[derive(Deserialize, Debug)]
struct PostList {
    #[serde(default)]
    items: Vec<PostItem>,
}

#[derive(Deserialize, Debug)]
struct PostItem {
    id: String,
    title: String,
    #[serde(default)]
    content: String,
    published: String,
    author: PostAuthor,
    url: String,
}

#[derive(Deserialize, Debug)]
struct PostAuthor {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl BlogClient {
    pub fn new(api_key: String, blog_id: String) -> Self {
        Self {
            api_key,
            blog_id,
            api_base: "https://www.googleapis.com/blogger/v3".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_posts(&self) -> Result<Vec<BlogPost>> {
        let url = format!(
            "{}/blogs/{}/posts",
            self.api_base.trim_end_matches('/'),
            self.blog_id
        );
        let list: PostList = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("fetchBodies", "true")])
            .send()
            .await
            .context("Failed to fetch blog posts")?
            .json()
            .await
            .context("Failed to parse blog post list")?;

        Ok(list.items.into_iter().map(map_post).collect())
    }
}

fn map_post(item: PostItem) -> BlogPost {
    let text = strip_html(&item.content);
    let excerpt = make_excerpt(&text);
    BlogPost {
        id: item.id,
        title: item.title,
        content: text,
        published: format_date(&item.published),
        author: item.author.display_name,
        url: item.url,
        excerpt,
    }
}

/// First `EXCERPT_CHARS` characters with a trailing ellipsis when truncated.
fn make_excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

/// RFC 3339 timestamp to a human date ("March 5, 2025"); unparsable input
/// passes through untouched.
fn format_date(published: &str) -> String {
    match DateTime::parse_from_rfc3339(published) {
        Ok(dt) => dt.format("%B %-d, %Y").to_string(),
        Err(_) => published.to_string(),
    }
}

/// Drop HTML tags, decode the common entities, and collapse whitespace runs.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                if in_tag {
                    in_tag = false;
                    // Tag boundaries separate words in the rendered page.
                    out.push(' ');
                } else {
                    out.push(c);
                }
            }
            _ if in_tag => {}
            _ => out.push(c),
        }
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item(content: &str) -> PostItem {
        serde_json::from_value(json!({
            "id": "p1",
            "title": "Hello",
            "content": content,
            "published": "2025-03-05T10:30:00-07:00",
            "author": { "displayName": "Ada" },
            "url": "https://example.com/p1"
        }))
        .unwrap()
    }

    #[test]
    fn test_map_post_flattens_fields() {
        let post = map_post(sample_item("<p>Hello <b>world</b></p>"));
        assert_eq!(post.id, "p1");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.content, "Hello world");
        assert_eq!(post.published, "March 5, 2025");
    }

    #[test]
    fn test_short_content_has_no_ellipsis() {
        let post = map_post(sample_item("<p>short</p>"));
        assert_eq!(post.excerpt, "short");
    }

    #[test]
    fn test_long_content_is_truncated_with_ellipsis() {
        let body = "word ".repeat(100);
        let post = map_post(sample_item(&body));
        assert!(post.excerpt.ends_with("..."));
        assert!(post.excerpt.chars().count() <= EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_strip_html_removes_tags_and_entities() {
        assert_eq!(
            strip_html("<h1>Title</h1><p>a &amp; b &lt;c&gt;</p>"),
            "Title a & b <c>"
        );
    }

    #[test]
    fn test_strip_html_plain_text_passthrough() {
        assert_eq!(strip_html("no markup here"), "no markup here");
    }

    #[test]
    fn test_format_date_passthrough_on_garbage() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_post_list_parses_empty_payload() {
        let list: PostList = serde_json::from_value(json!({})).unwrap();
        assert!(list.items.is_empty());
    }
}
