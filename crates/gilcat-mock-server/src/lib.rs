//! In-memory replica of the gilcat REST API, for integration tests.
//!
//! Speaks the same `{success, data, …}` envelope as production, over an
//! in-memory store. Dev-only: nothing shipped depends on this crate.
//!
//! Two test hooks drive the client's failure paths: [`MockState::fail_next`]
//! makes the next n cat-route calls return 500, and [`MockState::set_delay`]
//! stalls cat-route handlers to provoke client-side timeouts.

use std::{
  collections::HashMap,
  sync::{
    Arc,
    atomic::{AtomicU32, AtomicU64, Ordering},
  },
  time::Duration,
};

use axum::{
  Json, Router,
  extract::{Multipart, Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use chrono::Utc;
use gilcat_core::{
  cat::{Cat, CatPatch, NewCat, Reporter},
  community::{CommunityComment, CommunityPost, NewComment, NewPost},
  geo::GeoPoint,
  model::CatModel,
  query::{SearchFilters, SortContext, SortKey, SortOrder, filter_cats, sort_cats},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use uuid::Uuid;

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
struct UserRecord {
  id:     String,
  name:   String,
  email:  String,
  avatar: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
  user:     UserRecord,
  password: String,
}

#[derive(Default)]
struct Inner {
  cats:      RwLock<Vec<Cat>>,
  posts:     RwLock<Vec<CommunityPost>>,
  comments:  RwLock<HashMap<String, Vec<CommunityComment>>>,
  accounts:  RwLock<HashMap<String, Account>>,
  sessions:  RwLock<HashMap<String, UserRecord>>,
  fail_next: AtomicU32,
  delay_ms:  AtomicU64,
}

/// Shared state behind every handler. Clone freely.
#[derive(Clone, Default)]
pub struct MockState {
  inner: Arc<Inner>,
}

impl MockState {
  pub fn new() -> Self {
    Self::default()
  }

  /// The next `n` cat-route calls fail with a 500 before touching the
  /// store.
  pub fn fail_next(&self, n: u32) {
    self.inner.fail_next.store(n, Ordering::SeqCst);
  }

  /// Every subsequent cat-route handler sleeps this long before doing any
  /// work.
  pub fn set_delay(&self, delay: Duration) {
    self
      .inner
      .delay_ms
      .store(delay.as_millis() as u64, Ordering::SeqCst);
  }

  async fn gate(&self) -> Option<Response> {
    let delay = self.inner.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
      tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let injected = self
      .inner
      .fail_next
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
      .is_ok();
    injected
      .then(|| fail(StatusCode::INTERNAL_SERVER_ERROR, "injected failure"))
  }

  async fn session_user(&self, headers: &HeaderMap) -> Option<UserRecord> {
    let token = bearer(headers)?;
    self.inner.sessions.read().await.get(&token).cloned()
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn app(state: MockState) -> Router {
  Router::new()
    .route("/cats", get(list_cats).post(create_cat))
    .route("/cats/nearby", get(nearby_cats))
    .route("/cats/search", get(search_cats))
    .route("/cats/{id}", get(get_cat).put(update_cat).delete(delete_cat))
    .route("/cats/{id}/like", post(toggle_like))
    .route("/cats/{id}/images", post(upload_images))
    .route("/auth/login", post(login))
    .route("/auth/register", post(register))
    .route("/auth/logout", post(logout))
    .route("/auth/check", get(check_auth))
    .route("/community/posts", get(list_posts).post(create_post))
    .route("/community/posts/{id}", get(get_post))
    .route("/community/posts/{id}/like", post(toggle_post_like))
    .route(
      "/community/posts/{id}/comments",
      get(list_comments).post(add_comment),
    )
    .with_state(state)
}

/// Serve `app` on `listener` until the task is dropped.
pub async fn serve(
  listener: tokio::net::TcpListener,
  state: MockState,
) -> std::io::Result<()> {
  axum::serve(listener, app(state)).await
}

// ─── Envelope helpers ────────────────────────────────────────────────────────

fn ok<T: Serialize>(data: T) -> Response {
  Json(json!({ "success": true, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
  (
    status,
    Json(json!({ "success": false, "error": { "message": message } })),
  )
    .into_response()
}

fn invalid(details: Vec<(&str, &str)>) -> Response {
  let details: Vec<Value> = details
    .into_iter()
    .map(|(field, message)| json!({ "field": field, "message": message }))
    .collect();
  (
    StatusCode::UNPROCESSABLE_ENTITY,
    Json(json!({
      "success": false,
      "error": { "message": "validation failed", "details": details }
    })),
  )
    .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::to_string)
}

fn page_of<T: Clone>(items: &[T], page: u32, size: u32) -> (Vec<T>, u64) {
  let total = items.len() as u64;
  let size = size.max(1) as usize;
  let start = (page.max(1) as usize - 1) * size;
  let slice = items
    .iter()
    .skip(start)
    .take(size)
    .cloned()
    .collect::<Vec<_>>();
  (slice, total)
}

// ─── Cats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCatsParams {
  #[serde(default = "one")]
  page:            u32,
  #[serde(default = "twenty")]
  size:            u32,
  location:        Option<String>,
  gender:          Option<String>,
  is_neutered:     Option<bool>,
  /// Comma-separated list values.
  characteristics: Option<String>,
}

fn one() -> u32 {
  1
}

fn twenty() -> u32 {
  20
}

async fn list_cats(
  State(state): State<MockState>,
  Query(params): Query<ListCatsParams>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }

  let filters = SearchFilters {
    location:        params.location,
    gender:          params.gender.and_then(|g| g.parse().ok()),
    is_neutered:     params.is_neutered,
    characteristics: params
      .characteristics
      .map(|s| s.split(',').map(|t| t.trim().to_owned()).collect())
      .unwrap_or_default(),
    date_range:      None,
  };

  let cats = state.inner.cats.read().await;
  let models: Vec<CatModel> =
    cats.iter().cloned().map(CatModel::new).collect();
  let matching: Vec<Cat> = filter_cats(&models, &filters)
    .into_iter()
    .map(CatModel::into_record)
    .collect();
  let (items, total) = page_of(&matching, params.page, params.size);

  ok(json!({
    "items": items,
    "page": params.page,
    "size": params.size,
    "total": total,
  }))
}

async fn get_cat(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let cats = state.inner.cats.read().await;
  match cats.iter().find(|c| c.id == id) {
    Some(cat) => ok(cat),
    None => fail(StatusCode::NOT_FOUND, "cat not found"),
  }
}

async fn create_cat(
  State(state): State<MockState>,
  headers: HeaderMap,
  Json(draft): Json<NewCat>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }

  let mut details = Vec::new();
  if draft.name.trim().is_empty() {
    details.push(("name", "name must not be empty"));
  }
  if draft.characteristics.iter().all(|c| c.trim().is_empty()) {
    details.push(("characteristics", "at least one characteristic is required"));
  }
  if !draft.coordinates.is_valid() {
    details.push(("coordinates", "coordinates out of range"));
  }
  if !details.is_empty() {
    return invalid(details);
  }

  let reporter = state
    .session_user(&headers)
    .await
    .map(|u| Reporter { name: u.name, avatar: u.avatar })
    .unwrap_or(Reporter { name: "anonymous".to_string(), avatar: None });

  let cat = Cat {
    id:              Uuid::new_v4().to_string(),
    name:            draft.name,
    description:     draft.description,
    location:        draft.location,
    characteristics: draft.characteristics,
    estimated_age:   draft.estimated_age,
    gender:          draft.gender,
    image:           draft.image,
    lat:             draft.coordinates.lat,
    lng:             draft.coordinates.lng,
    likes:           0,
    comments:        0,
    report_count:    1,
    is_liked:        false,
    is_neutered:     draft.is_neutered,
    last_seen:       Utc::now(),
    reported_by:     reporter,
  };
  state.inner.cats.write().await.push(cat.clone());
  ok(cat)
}

async fn update_cat(
  State(state): State<MockState>,
  Path(id): Path<String>,
  Json(patch): Json<CatPatch>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let mut cats = state.inner.cats.write().await;
  match cats.iter_mut().find(|c| c.id == id) {
    Some(cat) => {
      *cat = CatModel::new(cat.clone()).apply(patch).into_record();
      ok(&*cat)
    }
    None => fail(StatusCode::NOT_FOUND, "cat not found"),
  }
}

async fn delete_cat(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let mut cats = state.inner.cats.write().await;
  let before = cats.len();
  cats.retain(|c| c.id != id);
  if cats.len() == before {
    return fail(StatusCode::NOT_FOUND, "cat not found");
  }
  ok(Value::Null)
}

async fn toggle_like(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let mut cats = state.inner.cats.write().await;
  match cats.iter_mut().find(|c| c.id == id) {
    Some(cat) => {
      let model = CatModel::new(cat.clone());
      let toggled = if cat.is_liked { model.unliked() } else { model.liked() };
      *cat = toggled.into_record();
      ok(json!({ "isLiked": cat.is_liked, "likeCount": cat.likes }))
    }
    None => fail(StatusCode::NOT_FOUND, "cat not found"),
  }
}

#[derive(Debug, Deserialize)]
struct NearbyParams {
  lat:    f64,
  lng:    f64,
  #[serde(default = "default_radius")]
  radius: f64,
  #[serde(default = "twenty")]
  limit:  u32,
}

fn default_radius() -> f64 {
  1_000.0
}

async fn nearby_cats(
  State(state): State<MockState>,
  Query(params): Query<NearbyParams>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let center = GeoPoint::new(params.lat, params.lng);
  let cats = state.inner.cats.read().await;
  let mut within: Vec<CatModel> = cats
    .iter()
    .cloned()
    .map(CatModel::new)
    .filter(|m| m.distance_from(center) <= params.radius)
    .collect();
  sort_cats(
    &mut within,
    SortKey::Distance,
    SortOrder::Asc,
    &SortContext::now().with_reference(center),
  );
  let items: Vec<Cat> = within
    .into_iter()
    .take(params.limit as usize)
    .map(CatModel::into_record)
    .collect();
  ok(items)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
  #[serde(default)]
  q: String,
}

async fn search_cats(
  State(state): State<MockState>,
  Query(params): Query<SearchParams>,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  let needle = params.q.to_lowercase();
  let cats = state.inner.cats.read().await;
  let items: Vec<Cat> = cats
    .iter()
    .filter(|c| {
      c.name.to_lowercase().contains(&needle)
        || c.description.to_lowercase().contains(&needle)
        || c.location.to_lowercase().contains(&needle)
    })
    .cloned()
    .collect();
  ok(items)
}

async fn upload_images(
  State(state): State<MockState>,
  Path(id): Path<String>,
  mut multipart: Multipart,
) -> Response {
  if let Some(resp) = state.gate().await {
    return resp;
  }
  if !state.inner.cats.read().await.iter().any(|c| c.id == id) {
    return fail(StatusCode::NOT_FOUND, "cat not found");
  }

  let mut urls = Vec::new();
  while let Ok(Some(field)) = multipart.next_field().await {
    let file_name = field
      .file_name()
      .map(str::to_string)
      .unwrap_or_else(|| format!("upload-{}", urls.len()));
    // Drain the body so the multipart stream stays consistent.
    if field.bytes().await.is_err() {
      return fail(StatusCode::BAD_REQUEST, "broken multipart body");
    }
    urls.push(format!("/media/cats/{id}/{file_name}"));
  }
  if urls.is_empty() {
    return invalid(vec![("images", "at least one image is required")]);
  }
  ok(urls)
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RegisterBody {
  name:     String,
  email:    String,
  password: String,
}

async fn register(
  State(state): State<MockState>,
  Json(body): Json<RegisterBody>,
) -> Response {
  let mut details = Vec::new();
  if body.name.trim().is_empty() {
    details.push(("name", "name must not be empty"));
  }
  if !body.email.contains('@') {
    details.push(("email", "email looks invalid"));
  }
  if body.password.len() < 4 {
    details.push(("password", "password too short"));
  }
  if !details.is_empty() {
    return invalid(details);
  }

  let mut accounts = state.inner.accounts.write().await;
  if accounts.contains_key(&body.email) {
    return fail(StatusCode::CONFLICT, "email already registered");
  }
  let user = UserRecord {
    id:     Uuid::new_v4().to_string(),
    name:   body.name,
    email:  body.email.clone(),
    avatar: None,
  };
  accounts.insert(
    body.email,
    Account { user: user.clone(), password: body.password },
  );
  drop(accounts);

  let token = Uuid::new_v4().to_string();
  state
    .inner
    .sessions
    .write()
    .await
    .insert(token.clone(), user.clone());
  ok(json!({ "token": token, "tokenType": "Bearer", "user": user }))
}

#[derive(Debug, Deserialize)]
struct LoginBody {
  email:    String,
  password: String,
}

async fn login(
  State(state): State<MockState>,
  Json(body): Json<LoginBody>,
) -> Response {
  let accounts = state.inner.accounts.read().await;
  let Some(account) = accounts.get(&body.email) else {
    return fail(StatusCode::UNAUTHORIZED, "unknown email or wrong password");
  };
  if account.password != body.password {
    return fail(StatusCode::UNAUTHORIZED, "unknown email or wrong password");
  }
  let user = account.user.clone();
  drop(accounts);

  let token = Uuid::new_v4().to_string();
  state
    .inner
    .sessions
    .write()
    .await
    .insert(token.clone(), user.clone());
  ok(json!({ "token": token, "tokenType": "Bearer", "user": user }))
}

async fn logout(State(state): State<MockState>, headers: HeaderMap) -> Response {
  if let Some(token) = bearer(&headers) {
    state.inner.sessions.write().await.remove(&token);
  }
  ok(Value::Null)
}

async fn check_auth(State(state): State<MockState>, headers: HeaderMap) -> Response {
  match state.session_user(&headers).await {
    Some(user) => ok(user),
    None => fail(StatusCode::UNAUTHORIZED, "not signed in"),
  }
}

// ─── Community ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PageParams {
  #[serde(default = "one")]
  page: u32,
  #[serde(default = "twenty")]
  size: u32,
}

async fn list_posts(
  State(state): State<MockState>,
  Query(params): Query<PageParams>,
) -> Response {
  let posts = state.inner.posts.read().await;
  let (items, total) = page_of(&posts, params.page, params.size);
  ok(json!({
    "items": items,
    "page": params.page,
    "size": params.size,
    "total": total,
  }))
}

async fn get_post(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  let posts = state.inner.posts.read().await;
  match posts.iter().find(|p| p.id == id) {
    Some(post) => ok(post),
    None => fail(StatusCode::NOT_FOUND, "post not found"),
  }
}

async fn create_post(
  State(state): State<MockState>,
  headers: HeaderMap,
  Json(draft): Json<NewPost>,
) -> Response {
  if draft.validate().is_err() {
    return invalid(vec![("content", "content must not be empty")]);
  }
  let author = state
    .session_user(&headers)
    .await
    .map(|u| Reporter { name: u.name, avatar: u.avatar })
    .unwrap_or(Reporter { name: "anonymous".to_string(), avatar: None });

  let post = CommunityPost {
    id:         Uuid::new_v4().to_string(),
    author,
    created_at: Utc::now(),
    content:    draft.content,
    likes:      0,
    comments:   0,
    is_liked:   false,
  };
  state.inner.posts.write().await.push(post.clone());
  ok(post)
}

async fn toggle_post_like(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  let mut posts = state.inner.posts.write().await;
  match posts.iter_mut().find(|p| p.id == id) {
    Some(post) => {
      if post.is_liked {
        post.likes = post.likes.saturating_sub(1);
        post.is_liked = false;
      } else {
        post.likes = post.likes.saturating_add(1);
        post.is_liked = true;
      }
      ok(json!({ "isLiked": post.is_liked, "likeCount": post.likes }))
    }
    None => fail(StatusCode::NOT_FOUND, "post not found"),
  }
}

async fn list_comments(
  State(state): State<MockState>,
  Path(id): Path<String>,
) -> Response {
  let comments = state.inner.comments.read().await;
  ok(comments.get(&id).cloned().unwrap_or_default())
}

async fn add_comment(
  State(state): State<MockState>,
  Path(id): Path<String>,
  headers: HeaderMap,
  Json(draft): Json<NewComment>,
) -> Response {
  if draft.validate().is_err() {
    return invalid(vec![("content", "content must not be empty")]);
  }
  let mut posts = state.inner.posts.write().await;
  let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
    return fail(StatusCode::NOT_FOUND, "post not found");
  };

  let author = state
    .session_user(&headers)
    .await
    .map(|u| Reporter { name: u.name, avatar: u.avatar })
    .unwrap_or(Reporter { name: "anonymous".to_string(), avatar: None });

  let comment = CommunityComment {
    id:         Uuid::new_v4().to_string(),
    author,
    created_at: Utc::now(),
    content:    draft.content,
    replies:    Vec::new(),
  };
  post.comments = post.comments.saturating_add(1);
  state
    .inner
    .comments
    .write()
    .await
    .entry(id)
    .or_default()
    .push(comment.clone());
  ok(comment)
}
