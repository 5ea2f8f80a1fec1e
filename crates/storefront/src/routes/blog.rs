//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use crate::content::Post;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Number of recent posts shown under an article.
const RECENT_POSTS_COUNT: usize = 3;

/// Post view for templates.
#[derive(Clone)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: NaiveDate,
    pub tags: Vec<String>,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            author: post.meta.author.clone(),
            published_at: post.meta.published_at,
            tags: post.meta.tags.clone(),
            content_html: post.content_html.clone(),
            reading_time_minutes: post.reading_time_minutes,
        }
    }
}

/// Optional tag filter on the index.
#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub tag: Option<String>,
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub layout: Layout,
    pub posts: Vec<PostView>,
    pub tag: Option<String>,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub layout: Layout,
    pub post: PostView,
    pub recent_posts: Vec<PostView>,
}

/// Display published posts, optionally filtered by tag.
#[instrument(skip(state, layout))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
    layout: Layout,
) -> impl IntoResponse {
    let tag = query.tag.filter(|t| !t.trim().is_empty());
    let posts: Vec<PostView> = match tag.as_deref() {
        Some(tag) => state.content().posts_by_tag(tag).map(PostView::from).collect(),
        None => state
            .content()
            .published_posts()
            .map(PostView::from)
            .collect(),
    };

    BlogIndexTemplate { layout, posts, tag }
}

/// Display a single blog post by slug.
///
/// # Errors
///
/// Returns 404 if the post doesn't exist or is a draft.
#[instrument(skip(state, layout))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let post = state
        .content()
        .get_post(&slug)
        .ok_or_else(|| AppError::NotFound("blog post".to_string()))?;

    let recent_posts = state
        .content()
        .recent_posts(RECENT_POSTS_COUNT, Some(&slug))
        .into_iter()
        .map(PostView::from)
        .collect();

    Ok(BlogShowTemplate {
        layout,
        post: PostView::from(post),
        recent_posts,
    })
}
