//! Cat resource endpoints.
//!
//! | Method   | Path                | Notes |
//! |----------|---------------------|-------|
//! | `GET`    | `/cats`             | paginated; filter query params |
//! | `GET`    | `/cats/{id}`        | |
//! | `POST`   | `/cats`             | body: [`NewCat`]; draft validated locally first |
//! | `PUT`    | `/cats/{id}`        | partial body ([`CatPatch`]) |
//! | `DELETE` | `/cats/{id}`        | exposed capability; no UI flow drives it |
//! | `POST`   | `/cats/{id}/like`   | toggles the viewer's like |
//! | `GET`    | `/cats/nearby`      | `?lat&lng&radius&limit` |
//! | `GET`    | `/cats/search`      | `?q=` free text |
//! | `POST`   | `/cats/{id}/images` | multipart upload |

use gilcat_core::{
  cat::{Cat, CatPatch, NewCat},
  geo::GeoPoint,
  query::SearchFilters,
};
use serde::{Deserialize, Serialize};

use crate::{
  client::{ApiClient, FilePart},
  envelope::Page,
  error::Result,
};

/// Result of `POST /cats/{id}/like`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
  pub is_liked:   bool,
  pub like_count: u32,
}

impl ApiClient {
  // ── Browse ────────────────────────────────────────────────────────────────

  /// `GET /cats?page&size[&location&gender&isNeutered&characteristics…]`
  ///
  /// `page` is 1-based. Only the filter fields that are set become query
  /// parameters; `date_range` is client-side only and never leaves the
  /// process.
  pub async fn list_cats(
    &self,
    page: u32,
    size: u32,
    filters: &SearchFilters,
  ) -> Result<Page<Cat>> {
    let mut query: Vec<(&str, String)> =
      vec![("page", page.to_string()), ("size", size.to_string())];
    if let Some(location) = &filters.location {
      query.push(("location", location.clone()));
    }
    if let Some(gender) = filters.gender {
      query.push(("gender", gender.as_str().to_string()));
    }
    if let Some(neutered) = filters.is_neutered {
      query.push(("isNeutered", neutered.to_string()));
    }
    if !filters.characteristics.is_empty() {
      // List parameters travel comma-separated.
      query.push(("characteristics", filters.characteristics.join(",")));
    }
    self.get_json("/cats", &query).await
  }

  /// `GET /cats/{id}`
  pub async fn get_cat(&self, id: &str) -> Result<Cat> {
    self.get_json(&format!("/cats/{id}"), &[]).await
  }

  // ── Register / edit ───────────────────────────────────────────────────────

  /// `POST /cats`. The draft is validated before any request goes out.
  pub async fn create_cat(&self, draft: &NewCat) -> Result<Cat> {
    draft.validate()?;
    self.post_json("/cats", draft).await
  }

  /// `PUT /cats/{id}` with a partial body.
  pub async fn update_cat(&self, id: &str, patch: &CatPatch) -> Result<Cat> {
    self.put_json(&format!("/cats/{id}"), patch).await
  }

  /// `DELETE /cats/{id}`
  pub async fn delete_cat(&self, id: &str) -> Result<()> {
    self.delete_json(&format!("/cats/{id}")).await
  }

  // ── Engagement ────────────────────────────────────────────────────────────

  /// `POST /cats/{id}/like` — toggles the viewer's like and returns the
  /// new state.
  pub async fn toggle_like(&self, id: &str) -> Result<LikeOutcome> {
    self.post_empty(&format!("/cats/{id}/like")).await
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// `GET /cats/nearby?lat&lng&radius&limit` — cats within `radius_m`
  /// metres of `center`, nearest first.
  pub async fn nearby_cats(
    &self,
    center: GeoPoint,
    radius_m: f64,
    limit: u32,
  ) -> Result<Vec<Cat>> {
    let query = [
      ("lat", center.lat.to_string()),
      ("lng", center.lng.to_string()),
      ("radius", radius_m.to_string()),
      ("limit", limit.to_string()),
    ];
    self.get_json("/cats/nearby", &query).await
  }

  /// `GET /cats/search?q=` — free-text search over names, descriptions,
  /// and locations.
  pub async fn search_cats(&self, q: &str) -> Result<Vec<Cat>> {
    self.get_json("/cats/search", &[("q", q.to_string())]).await
  }

  // ── Media ─────────────────────────────────────────────────────────────────

  /// `POST /cats/{id}/images` — multipart upload; returns the stored
  /// image URLs.
  pub async fn upload_images(
    &self,
    id: &str,
    images: &[FilePart],
  ) -> Result<Vec<String>> {
    self
      .upload_files(&format!("/cats/{id}/images"), "images", images)
      .await
  }
}
