//! Blog content loaded from markdown.
//!
//! Posts live in `{CONTENT_DIR}/blog/*.md` with YAML frontmatter. They are
//! parsed and rendered once at startup and served from memory.

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Average reading speed used for the "N min read" estimate.
const WORDS_PER_MINUTE: f32 = 200.0;

/// Frontmatter of a blog post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub published_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
}

/// A rendered blog post.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

/// In-memory blog, newest post first.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    /// Load every post under `content_dir/blog`.
    ///
    /// A missing directory yields an empty store. Individual files that fail
    /// to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the blog directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("blog");
        if !dir.exists() {
            tracing::warn!("Blog directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;
        let mut posts = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            match load_post(&path) {
                Ok(post) => {
                    tracing::info!("Loaded post: {}", post.slug);
                    posts.push(post);
                }
                Err(e) => {
                    tracing::error!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        Ok(Self::from_posts(posts))
    }

    /// Build a store from already-parsed posts.
    #[must_use]
    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));
        Self {
            posts: Arc::new(posts),
        }
    }

    /// A published post by slug. Drafts are not served.
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug && !p.meta.draft)
    }

    /// Published posts, newest first.
    pub fn published_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.draft)
    }

    /// Published posts carrying `tag`, ignoring case.
    pub fn posts_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> {
        self.published_posts()
            .filter(move |p| p.meta.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
    }

    /// Recent published posts, optionally excluding one slug.
    #[must_use]
    pub fn recent_posts(&self, limit: usize, exclude_slug: Option<&str>) -> Vec<&Post> {
        self.published_posts()
            .filter(|p| exclude_slug.is_none_or(|s| p.slug != s))
            .take(limit)
            .collect()
    }
}

fn load_post(path: &Path) -> Result<Post, ContentError> {
    let source = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;
    let file_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?;
    parse_post(file_stem, &source)
}

/// Parse a post from its file stem and markdown source.
///
/// # Errors
///
/// Returns [`ContentError::Parse`] if the frontmatter is missing or invalid.
pub fn parse_post(file_stem: &str, source: &str) -> Result<Post, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PostMeta> = matter
        .parse(source)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Post {
        slug: slug_from_file_stem(file_stem).to_string(),
        meta,
        content_html: render_markdown(&parsed.content),
        reading_time_minutes: reading_time_minutes(&parsed.content),
    })
}

/// `2025-01-15-choosing-a-diamond` becomes `choosing-a-diamond`.
fn slug_from_file_stem(stem: &str) -> &str {
    match (stem.get(..10), stem.get(10..11), stem.get(11..)) {
        (Some(date), Some("-"), Some(rest))
            if !rest.is_empty() && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() =>
        {
            rest
        }
        _ => stem,
    }
}

fn reading_time_minutes(markdown: &str) -> u32 {
    let word_count = markdown.split_whitespace().count();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let minutes = ((word_count as f32) / WORDS_PER_MINUTE).ceil() as u32;
    minutes.max(1)
}

/// Render markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Raw HTML in posts is escaped.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
