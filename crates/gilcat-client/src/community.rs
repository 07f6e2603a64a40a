//! Community feed endpoints.
//!
//! | Method | Path                            | Notes |
//! |--------|---------------------------------|-------|
//! | `GET`  | `/community/posts`              | paginated |
//! | `POST` | `/community/posts`              | body: [`NewPost`] |
//! | `GET`  | `/community/posts/{id}`         | |
//! | `POST` | `/community/posts/{id}/like`    | toggle |
//! | `GET`  | `/community/posts/{id}/comments`| |
//! | `POST` | `/community/posts/{id}/comments`| body: [`NewComment`] |

use gilcat_core::community::{
  CommunityComment, CommunityPost, NewComment, NewPost,
};

use crate::{cats::LikeOutcome, client::ApiClient, envelope::Page, error::Result};

impl ApiClient {
  /// `GET /community/posts?page&size`
  pub async fn list_posts(&self, page: u32, size: u32) -> Result<Page<CommunityPost>> {
    let query = [("page", page.to_string()), ("size", size.to_string())];
    self.get_json("/community/posts", &query).await
  }

  /// `GET /community/posts/{id}`
  pub async fn get_post(&self, id: &str) -> Result<CommunityPost> {
    self.get_json(&format!("/community/posts/{id}"), &[]).await
  }

  /// `POST /community/posts`. The draft is validated locally first.
  pub async fn create_post(&self, draft: &NewPost) -> Result<CommunityPost> {
    draft.validate()?;
    self.post_json("/community/posts", draft).await
  }

  /// `POST /community/posts/{id}/like` — toggles the viewer's like.
  pub async fn toggle_post_like(&self, id: &str) -> Result<LikeOutcome> {
    self.post_empty(&format!("/community/posts/{id}/like")).await
  }

  /// `GET /community/posts/{id}/comments`
  pub async fn list_comments(&self, post_id: &str) -> Result<Vec<CommunityComment>> {
    self
      .get_json(&format!("/community/posts/{post_id}/comments"), &[])
      .await
  }

  /// `POST /community/posts/{id}/comments`. The draft is validated
  /// locally first.
  pub async fn add_comment(
    &self,
    post_id: &str,
    draft: &NewComment,
  ) -> Result<CommunityComment> {
    draft.validate()?;
    self
      .post_json(&format!("/community/posts/{post_id}/comments"), draft)
      .await
  }
}
