//! Serve command - runs the top-5 lists JSON API.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};

use topfive::{
    CommunityEntry, ListId, ListStore, SortKey, StoreState, Top5List, ViewMode,
    backend::ListBackend,
    constants::COMMENT_MAX_CHARS,
    user::{AccountService, Registration, UserProfile, UserSession},
};

use crate::backend::{self, Data};
use crate::cli::ServeArgs;
use crate::session::{Session, SessionStore};

const SESSION_COOKIE: &str = "topfive_session";

/// Shared application state
#[derive(Clone)]
struct AppState {
    data: Arc<Data>,
    sessions: SessionStore,
}

/// Run the top-5 lists server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data = Arc::new(backend::load(&args.data).await?);

    let app_state = AppState {
        data: data.clone(),
        sessions: SessionStore::new(),
    };

    let app = router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Listening on {local_addr}");
    println!("Top-5 lists server listening on http://{local_addr}");
    println!("Data directory: {}", data.dir.display());
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    backend::save(&data).await?;
    println!("Server shut down");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_me))
        .route("/lists", get(handle_lists).post(handle_create_list))
        .route("/lists/{id}", get(handle_get_list))
        .route("/lists/{id}/edit", post(handle_edit_list))
        .route("/lists/{id}/name", put(handle_change_list_name))
        .route("/lists/{id}/like", post(handle_like))
        .route("/lists/{id}/dislike", post(handle_dislike))
        .route("/lists/{id}/view", post(handle_view))
        .route("/lists/{id}/comments", post(handle_comment))
        .route("/lists/{id}/mark", post(handle_mark))
        .route("/draft/items/{index}", put(handle_update_item))
        .route("/draft/name", put(handle_rename_draft))
        .route("/draft/commit", post(handle_commit))
        .route("/draft/publish", post(handle_publish))
        .route("/draft/close", post(handle_close))
        .route("/marked", axum::routing::delete(handle_delete_marked))
        .route("/marked/unmark", post(handle_unmark))
        .route("/community", get(handle_community))
        .route("/community/views", post(handle_community_view))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to set up SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Maps library errors onto HTTP statuses.
enum ApiError {
    Lib(topfive::Error),
    Unauthorized,
    BadRequest(String),
    NotFound(String),
}

impl From<topfive::Error> for ApiError {
    fn from(err: topfive::Error) -> Self {
        ApiError::Lib(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "not logged in" }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Lib(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    tracing::error!(module = err.module(), "Request failed: {err}");
                } else {
                    tracing::debug!(module = err.module(), "Request refused: {err}");
                }
                let blockers = match &err {
                    topfive::Error::Store(store_err) => store_err.blockers().to_vec(),
                    _ => Vec::new(),
                };
                let body = json!({
                    "error": err.to_string(),
                    "module": err.module(),
                    "blockers": blockers,
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

fn status_for(err: &topfive::Error) -> StatusCode {
    if err.is_authentication_error() {
        StatusCode::UNAUTHORIZED
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_permission_denied() {
        StatusCode::FORBIDDEN
    } else if err.is_validation_error() {
        StatusCode::BAD_REQUEST
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else if matches!(err, topfive::Error::Store(e) if e.is_invalid_state()) {
        StatusCode::CONFLICT
    } else if err.is_persistence_error() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Sessions
// ============================================================================

async fn current_session(state: &AppState, cookies: &Cookies) -> ApiResult<Arc<RwLock<Session>>> {
    let token = cookies.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
    state
        .sessions
        .get(token.value())
        .await
        .ok_or(ApiError::Unauthorized)
}

/// Open a session for `profile` with a store showing their own lists.
async fn start_session(state: &AppState, cookies: &Cookies, profile: UserProfile) -> ApiResult<()> {
    let lists: Arc<dyn ListBackend> = state.data.lists.clone();
    let mut store = ListStore::new(lists, profile.identity());
    store.load_summaries(ViewMode::Mine).await?;

    let token = state
        .sessions
        .create_session(UserSession::new(profile), store)
        .await;
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookies.add(cookie);
    Ok(())
}

fn snapshot(store: &ListStore) -> Json<StoreState> {
    Json(StoreState::clone(&store.state()))
}

// ============================================================================
// Account Handlers
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    user_name: String,
    password: String,
}

/// Handler for POST /register - creates the account and logs it in
async fn handle_register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(registration): Json<Registration>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.data.users.register(registration).await?;
    start_session(&state, &cookies, profile.clone()).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Handler for POST /login
async fn handle_login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .data
        .users
        .login(&request.user_name, &request.password)
        .await?;
    start_session(&state, &cookies, profile.clone()).await?;
    Ok(Json(profile))
}

/// Handler for POST /logout
async fn handle_logout(State(state): State<AppState>, cookies: Cookies) -> StatusCode {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Some(session) = state.sessions.destroy_session(cookie.value()).await {
            let user = session.read().await.user.current_user();
            tracing::info!(user = %user.user_name, "Logged out");
        }
        cookies.remove(Cookie::from(SESSION_COOKIE));
    }
    StatusCode::NO_CONTENT
}

/// Handler for GET /me
async fn handle_me(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Json<UserProfile>> {
    let session = current_session(&state, &cookies).await?;
    let session = session.read().await;
    Ok(Json(session.user.profile().clone()))
}

// ============================================================================
// List Handlers
// ============================================================================

#[derive(Deserialize)]
struct ListsQuery {
    mode: Option<ViewMode>,
    q: Option<String>,
    sort: Option<SortKey>,
}

/// Handler for GET /lists - switch mode, search and sort, then return the view
async fn handle_lists(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<ListsQuery>,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    let store = &mut session.store;

    if let Some(mode) = params.mode
        && mode != store.state().mode
    {
        store.change_mode(mode).await?;
    }
    match params.q.as_deref() {
        Some(text) => store.search(text).await?,
        None => store.refresh().await?,
    }
    if let Some(key) = params.sort {
        store.sort(key);
    }
    Ok(snapshot(store))
}

/// Handler for POST /lists
async fn handle_create_list(
    State(state): State<AppState>,
    cookies: Cookies,
) -> ApiResult<(StatusCode, Json<Top5List>)> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.create_new_list().await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// Handler for GET /lists/{id}
async fn handle_get_list(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<Top5List>> {
    current_session(&state, &cookies).await?;
    Ok(Json(state.data.lists.get_list(id).await?))
}

/// Handler for POST /lists/{id}/edit - open a list for editing
async fn handle_edit_list(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.set_current(id).await?;
    Ok(snapshot(&session.store))
}

#[derive(Deserialize)]
struct NameRequest {
    name: String,
}

/// Handler for PUT /lists/{id}/name
async fn handle_change_list_name(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session
        .write()
        .await
        .store
        .change_list_name(id, &request.name)
        .await?;
    Ok(Json(list))
}

// ============================================================================
// Draft Handlers
// ============================================================================

#[derive(Deserialize)]
struct ValueRequest {
    value: String,
}

/// Handler for PUT /draft/items/{index}
async fn handle_update_item(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(index): Path<usize>,
    Json(request): Json<ValueRequest>,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.update_item(index, &request.value)?;
    Ok(snapshot(&session.store))
}

/// Handler for PUT /draft/name
async fn handle_rename_draft(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<ValueRequest>,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.rename_draft(&request.value)?;
    Ok(snapshot(&session.store))
}

/// Handler for POST /draft/commit
async fn handle_commit(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.commit_edits().await?;
    Ok(Json(list))
}

/// Handler for POST /draft/publish
async fn handle_publish(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.publish().await?;
    Ok(Json(list))
}

/// Handler for POST /draft/close - discards uncommitted edits
async fn handle_close(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.close_current();
    Ok(snapshot(&session.store))
}

// ============================================================================
// Engagement Handlers
// ============================================================================

/// Handler for POST /lists/{id}/like
async fn handle_like(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.like(id).await?;
    Ok(Json(list))
}

/// Handler for POST /lists/{id}/dislike
async fn handle_dislike(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.dislike(id).await?;
    Ok(Json(list))
}

/// Handler for POST /lists/{id}/view
async fn handle_view(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    let list = session.write().await.store.add_view(id).await?;
    Ok(Json(list))
}

#[derive(Deserialize)]
struct CommentRequest {
    text: String,
}

/// Handler for POST /lists/{id}/comments
async fn handle_comment(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<Json<Top5List>> {
    let session = current_session(&state, &cookies).await?;
    check_comment(&request.text)?;
    let list = session
        .write()
        .await
        .store
        .add_comment(id, &request.text)
        .await?;
    Ok(Json(list))
}

fn check_comment(text: &str) -> ApiResult<()> {
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("comment is empty".to_string()));
    }
    let chars = text.chars().count();
    if chars > COMMENT_MAX_CHARS {
        return Err(ApiError::BadRequest(format!(
            "comment is {chars} characters, the limit is {COMMENT_MAX_CHARS}"
        )));
    }
    Ok(())
}

// ============================================================================
// Deletion Handlers
// ============================================================================

/// Handler for POST /lists/{id}/mark
async fn handle_mark(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<ListId>,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.mark_for_deletion(id).await?;
    Ok(snapshot(&session.store))
}

/// Handler for POST /marked/unmark
async fn handle_unmark(State(state): State<AppState>, cookies: Cookies) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.unmark();
    Ok(snapshot(&session.store))
}

/// Handler for DELETE /marked
async fn handle_delete_marked(
    State(state): State<AppState>,
    cookies: Cookies,
) -> ApiResult<Json<StoreState>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    session.store.delete_marked().await?;
    Ok(snapshot(&session.store))
}

// ============================================================================
// Community Handlers
// ============================================================================

#[derive(Deserialize)]
struct CommunityQuery {
    q: Option<String>,
    sort: Option<SortKey>,
}

/// Handler for GET /community - aggregate afresh, then search and sort
async fn handle_community(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(params): Query<CommunityQuery>,
) -> ApiResult<Json<Vec<CommunityEntry>>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    let entries = community_view(&mut session.store, params.q.as_deref(), params.sort).await?;
    Ok(Json(entries))
}

/// Show the community in `store`, searched by `q` alone.
///
/// The search goes through the store, replacing whatever it was showing
/// before, so an earlier search never narrows this one.
async fn community_view(
    store: &mut ListStore,
    q: Option<&str>,
    sort: Option<SortKey>,
) -> topfive::Result<Vec<CommunityEntry>> {
    if store.state().mode != ViewMode::Community {
        store.change_mode(ViewMode::Community).await?;
    }
    store.search(q.unwrap_or("")).await?;
    if let Some(key) = sort {
        store.sort(key);
    }
    Ok(store.state().community_entries.clone())
}

#[derive(Deserialize)]
struct CommunityViewRequest {
    name: String,
}

/// Handler for POST /community/views
async fn handle_community_view(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(request): Json<CommunityViewRequest>,
) -> ApiResult<Json<CommunityEntry>> {
    let session = current_session(&state, &cookies).await?;
    let mut session = session.write().await;
    if !session.store.add_community_view(&request.name) {
        return Err(ApiError::NotFound(format!(
            "no community list named {:?}",
            request.name
        )));
    }
    session
        .store
        .state()
        .community_entry(&request.name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(request.name.clone()))
}

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    lists: usize,
    sessions: usize,
}

/// Handler for GET /health - Health check endpoint
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        lists: state.data.lists.len().await,
        sessions: state.sessions.session_count().await,
    })
}
