//! Blog CMS handlers.
//!
//! Published posts are publicly readable; writes require a profile flagged
//! as admin. Post content runs through FAQ extraction at create and update
//! time, so structured FAQ data stays in sync with the stored body.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use oracle_path_core::{extract_faqs, BlogPost, FaqSection, PostId};
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Default page size for post listings.
const DEFAULT_LIMIT: usize = 20;

/// Maximum page size for post listings.
const MAX_LIMIT: usize = 100;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Maximum number of posts to return.
    pub limit: Option<usize>,
    /// Number of posts to skip.
    pub offset: Option<usize>,
}

/// A post as returned to clients.
#[derive(Debug, Serialize)]
pub struct PostView {
    /// Post ID.
    pub id: String,
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Post body HTML.
    pub content: String,
    /// Short summary.
    pub excerpt: String,
    /// Author display name.
    pub author: String,
    /// Whether the post is publicly visible.
    pub published: bool,
    /// SEO title override.
    pub seo_title: String,
    /// SEO meta description.
    pub seo_description: String,
    /// SEO keywords.
    pub seo_keywords: Vec<String>,
    /// Extracted FAQ sections, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faqs: Option<Vec<FaqSection>>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&BlogPost> for PostView {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            published: post.published,
            seo_title: post.seo_title.clone(),
            seo_description: post.seo_description.clone(),
            seo_keywords: post.seo_keywords.clone(),
            faqs: post.faqs.clone(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Listing entry: everything but the full body.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    /// Post ID.
    pub id: String,
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Short summary.
    pub excerpt: String,
    /// Author display name.
    pub author: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Published posts, newest first.
    pub posts: Vec<PostSummary>,
    /// Number of posts in this page.
    pub count: usize,
}

/// List published posts, newest first. Public.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let posts = state.store.list_published_posts(limit, offset)?;
    let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
    let count = summaries.len();

    Ok(Json(ListResponse {
        posts: summaries,
        count,
    }))
}

/// Get a published post by slug. Public; drafts are invisible here.
pub async fn get_post_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostView>, ApiError> {
    let post = state
        .store
        .get_post_by_slug(&slug)?
        .ok_or_else(|| ApiError::NotFound(format!("Post not found: {slug}")))?;

    Ok(Json(PostView::from(&post)))
}

/// Post creation request.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    /// Post title.
    pub title: String,
    /// URL slug, unique among published posts.
    pub slug: String,
    /// Post body HTML, optionally carrying an FAQ marker block.
    pub content: String,
    /// Short summary for listings.
    #[serde(default)]
    pub excerpt: String,
    /// Author display name.
    #[serde(default)]
    pub author: String,
    /// Whether to publish immediately.
    #[serde(default)]
    pub published: bool,
    /// SEO title override.
    #[serde(default)]
    pub seo_title: String,
    /// SEO meta description.
    #[serde(default)]
    pub seo_description: String,
    /// SEO keywords.
    #[serde(default)]
    pub seo_keywords: Vec<String>,
}

/// Create a post. Admin only.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<Json<PostView>, ApiError> {
    require_admin(&state, &auth)?;

    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".into()));
    }
    if body.slug.trim().is_empty() {
        return Err(ApiError::BadRequest("Slug is required".into()));
    }

    let ingested = extract_faqs(&body.content);
    if let Some(parse_error) = &ingested.parse_error {
        tracing::warn!(
            slug = %body.slug,
            error = %parse_error,
            "FAQ marker block is malformed, storing content unchanged"
        );
    }

    let now = Utc::now();
    let post = BlogPost {
        id: PostId::generate(),
        title: body.title,
        slug: body.slug,
        content: ingested.content,
        excerpt: body.excerpt,
        author: body.author,
        published: body.published,
        seo_title: body.seo_title,
        seo_description: body.seo_description,
        seo_keywords: body.seo_keywords,
        faqs: ingested.faqs,
        created_at: now,
        updated_at: now,
    };

    state.store.put_post(&post)?;

    tracing::info!(
        post_id = %post.id,
        slug = %post.slug,
        published = %post.published,
        "Blog post created"
    );

    Ok(Json(PostView::from(&post)))
}

/// Post update request; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    /// New title.
    pub title: Option<String>,
    /// New slug.
    pub slug: Option<String>,
    /// New body HTML; re-runs FAQ extraction when supplied.
    pub content: Option<String>,
    /// New excerpt.
    pub excerpt: Option<String>,
    /// New author display name.
    pub author: Option<String>,
    /// New publish state.
    pub published: Option<bool>,
    /// New SEO title.
    pub seo_title: Option<String>,
    /// New SEO description.
    pub seo_description: Option<String>,
    /// New SEO keywords.
    pub seo_keywords: Option<Vec<String>>,
}

/// Update a post by ID. Admin only.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<PostView>, ApiError> {
    require_admin(&state, &auth)?;

    let post_id =
        PostId::from_str(&id).map_err(|_| ApiError::BadRequest("Invalid post ID".into()))?;

    let mut post = state
        .store
        .get_post(&post_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Post not found: {id}")))?;

    if let Some(title) = body.title {
        post.title = title;
    }
    if let Some(slug) = body.slug {
        post.slug = slug;
    }
    if let Some(content) = body.content {
        let ingested = extract_faqs(&content);
        if let Some(parse_error) = &ingested.parse_error {
            tracing::warn!(
                post_id = %post.id,
                error = %parse_error,
                "FAQ marker block is malformed, storing content unchanged"
            );
        }
        post.content = ingested.content;
        post.faqs = ingested.faqs;
    }
    if let Some(excerpt) = body.excerpt {
        post.excerpt = excerpt;
    }
    if let Some(author) = body.author {
        post.author = author;
    }
    if let Some(published) = body.published {
        post.published = published;
    }
    if let Some(seo_title) = body.seo_title {
        post.seo_title = seo_title;
    }
    if let Some(seo_description) = body.seo_description {
        post.seo_description = seo_description;
    }
    if let Some(seo_keywords) = body.seo_keywords {
        post.seo_keywords = seo_keywords;
    }
    post.updated_at = Utc::now();

    state.store.put_post(&post)?;

    tracing::info!(
        post_id = %post.id,
        slug = %post.slug,
        published = %post.published,
        "Blog post updated"
    );

    Ok(Json(PostView::from(&post)))
}

/// Reject callers whose profile lacks the admin flag.
fn require_admin(state: &AppState, auth: &AuthUser) -> Result<(), ApiError> {
    let is_admin = state
        .store
        .get_profile(&auth.user_id)?
        .is_some_and(|profile| profile.is_admin);

    if is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
