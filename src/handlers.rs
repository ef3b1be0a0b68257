// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the site service.
//!
//! Content routes are read-only views over [`ContentLibrary`]. Form routes
//! validate and record submissions; the contact route is rate limited per
//! client before anything else happens.

use crate::config::Config;
use crate::content::{
    adjacent_in, category_of, group_by_category, related_in, Adjacent, Article, Category,
    ContentLibrary, DEFAULT_RELATED_LIMIT,
};
use crate::error::{rate_limit_headers, AppError, Result};
use crate::limiter::{Clock, FixedWindowLimiter, UNKNOWN_CLIENT};
use crate::metrics::Metrics;
use crate::submissions::{ContactSubmission, SubmissionCounts, SubmissionStore};
use crate::validator::{ContactRequest, NewsletterRequest, SubmissionValidator, WaitlistRequest};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: FixedWindowLimiter,
    pub library: ContentLibrary,
    pub validator: SubmissionValidator,
    pub submissions: SubmissionStore,
    pub metrics: Metrics,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> prometheus::Result<Self> {
        Ok(Self {
            limiter: FixedWindowLimiter::with_clock(config.rate_limit.clone(), clock.clone()),
            library: ContentLibrary::new(config.content_dir.clone()),
            validator: SubmissionValidator::new(config.validation.clone()),
            submissions: SubmissionStore::new(),
            metrics: Metrics::new()?,
            clock,
            config,
        })
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/posts/:slug/related", get(related_posts))
        .route("/api/posts/:slug/adjacent", get(adjacent_posts))
        .route("/api/categories", get(list_categories))
        .route("/api/contact", post(contact))
        .route("/api/waitlist", post(waitlist))
        .route("/api/newsletter", post(newsletter))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/contacts", get(admin_contacts));

    if state.config.metrics.enabled {
        let path = state.config.metrics.path.clone();
        app = app.route(&path, get(scrape_metrics));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Client identifier for rate limiting: the first `X-Forwarded-For` hop,
/// then `X-Real-IP`, else the shared [`UNKNOWN_CLIENT`] bucket.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    forwarded
        .filter(|v| !v.is_empty())
        .or(real_ip.filter(|v| !v.is_empty()))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Category as shown alongside an article.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub slug: Category,
    pub name: &'static str,
    pub icon: &'static str,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            slug: category,
            name: category.label(),
            icon: category.icon(),
        }
    }
}

/// Article listing entry, without the body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: CategoryView,
}

impl From<Article> for PostSummary {
    fn from(article: Article) -> Self {
        let category = category_of(&article).into();
        Self {
            slug: article.slug,
            title: article.title,
            summary: article.summary,
            date: article.date,
            reading_time: article.reading_time,
            tags: article.tags,
            kind: article.kind,
            category,
        }
    }
}

/// Full article with its category.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub article: Article,
    pub category: CategoryView,
}

#[derive(Debug, Serialize)]
pub struct AdjacentResponse {
    pub previous: Option<PostSummary>,
    pub next: Option<PostSummary>,
}

impl From<Adjacent> for AdjacentResponse {
    fn from(adjacent: Adjacent) -> Self {
        Self {
            previous: adjacent.previous.map(Into::into),
            next: adjacent.next.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: CategoryView,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Form submission response.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_subscribed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub submissions: SubmissionCounts,
    pub posts: usize,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "marsala-site",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run a query over the merged article list off the async runtime.
async fn with_posts<T, F>(state: &AppState, route: &str, f: F) -> Result<T>
where
    F: FnOnce(Vec<Article>) -> T + Send + 'static,
    T: Send + 'static,
{
    state
        .metrics
        .content_requests
        .with_label_values(&[route])
        .inc();
    let library = state.library.clone();
    tokio::task::spawn_blocking(move || f(library.all_posts()))
        .await
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PostSummary>>> {
    let filter = query.category;
    let posts = with_posts(&state, "list", move |posts| {
        let wanted = filter.as_deref().map(Category::from_slug);
        posts
            .into_iter()
            .filter(|post| match wanted {
                None => true,
                Some(Some(category)) => category_of(post) == category,
                Some(None) => false,
            })
            .map(PostSummary::from)
            .collect::<Vec<_>>()
    })
    .await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>> {
    let wanted = slug.clone();
    let article = with_posts(&state, "post", move |posts| {
        posts.into_iter().find(|p| p.slug == wanted)
    })
    .await?
    .ok_or(AppError::NotFound(slug))?;

    let category = category_of(&article).into();
    Ok(Json(PostDetail { article, category }))
}

pub async fn related_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Result<Json<Vec<PostSummary>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    let related = with_posts(&state, "related", move |posts| {
        related_in(&posts, &slug, limit)
    })
    .await?;
    Ok(Json(related.into_iter().map(Into::into).collect()))
}

pub async fn adjacent_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<AdjacentResponse>> {
    let adjacent = with_posts(&state, "adjacent", move |posts| {
        adjacent_in(&posts, &slug)
    })
    .await?;
    Ok(Json(adjacent.into()))
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CategoryCount>>> {
    let groups = with_posts(&state, "categories", |posts| {
        group_by_category(&posts)
            .into_iter()
            .map(|(category, members)| (category, members.len()))
            .collect::<Vec<_>>()
    })
    .await?;

    Ok(Json(
        groups
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.into(),
                count,
            })
            .collect(),
    ))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| AppError::MalformedBody(err.to_string()))
}

/// Contact form endpoint. The rate limit is checked before the body is
/// parsed, so rejected payloads still count against the client.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let client = client_identifier(&headers);
    let decision = state.limiter.check(&client);
    state
        .metrics
        .tracked_identifiers
        .set(state.limiter.tracked_identifiers() as i64);

    if !decision.allowed {
        warn!(
            client = %client,
            retry_after_secs = decision.retry_after_secs,
            "Contact submission rate limited"
        );
        state
            .metrics
            .contact_submissions
            .with_label_values(&["rate_limited"])
            .inc();
        return Err(AppError::RateLimited(decision));
    }

    let outcome = parse_body::<ContactRequest>(&body)
        .and_then(|req| state.validator.validate_contact(&req).map_err(AppError::from));
    let valid = match outcome {
        Ok(valid) => valid,
        Err(err) => {
            debug!(client = %client, error = %err, "Contact submission rejected");
            state
                .metrics
                .contact_submissions
                .with_label_values(&["invalid"])
                .inc();
            let mut response = err.into_response();
            response.headers_mut().extend(rate_limit_headers(&decision));
            return Ok(response);
        }
    };

    state.submissions.add_contact(valid, state.clock.now()).await;
    state
        .metrics
        .contact_submissions
        .with_label_values(&["accepted"])
        .inc();
    info!(client = %client, remaining = decision.remaining, "Contact submission accepted");

    Ok((
        StatusCode::OK,
        rate_limit_headers(&decision),
        Json(SubmissionResponse {
            success: true,
            remaining: Some(decision.remaining),
            already_subscribed: None,
        }),
    )
        .into_response())
}

pub async fn waitlist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>> {
    let req: WaitlistRequest = parse_body(&body)?;
    let entry = state.validator.validate_waitlist(&req)?;
    let module = entry.module.clone();

    state.submissions.add_waitlist(entry, state.clock.now()).await;
    state
        .metrics
        .form_submissions
        .with_label_values(&["waitlist"])
        .inc();
    info!(module = ?module, "Waitlist signup accepted");

    Ok(Json(SubmissionResponse {
        success: true,
        remaining: None,
        already_subscribed: None,
    }))
}

pub async fn newsletter(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>> {
    let req: NewsletterRequest = parse_body(&body)?;
    let email = state.validator.validate_email(&req.email)?;

    let added = state.submissions.subscribe(&email).await;
    if added {
        state
            .metrics
            .form_submissions
            .with_label_values(&["newsletter"])
            .inc();
        info!("Newsletter subscription accepted");
    } else {
        debug!("Newsletter address already subscribed");
    }

    Ok(Json(SubmissionResponse {
        success: true,
        remaining: None,
        already_subscribed: Some(!added),
    }))
}

/// Require `Authorization: Bearer <admin_token>`.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Err(AppError::Unauthorized);
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if tokens_match(token, expected) => Ok(()),
        _ => {
            warn!("Rejected admin request");
            Err(AppError::Unauthorized)
        }
    }
}

/// Compare digests so the comparison time does not depend on where the
/// tokens first differ.
fn tokens_match(presented: &str, expected: &str) -> bool {
    blake3::hash(presented.as_bytes()) == blake3::hash(expected.as_bytes())
}

pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    authorize(&state, &headers)?;
    let posts = with_posts(&state, "admin_stats", |posts| posts.len()).await?;
    Ok(Json(StatsResponse {
        submissions: state.submissions.counts().await,
        posts,
    }))
}

pub async fn admin_contacts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContactSubmission>>> {
    authorize(&state, &headers)?;
    Ok(Json(state.submissions.contacts().await))
}

/// Prometheus scrape endpoint.
pub async fn scrape_metrics(State(state): State<Arc<AppState>>) -> Result<Response> {
    let body = state
        .metrics
        .render()
        .map_err(|err| AppError::Internal(err.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
