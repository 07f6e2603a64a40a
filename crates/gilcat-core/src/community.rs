//! Community feed types: posts, comments, and one level of replies.
//!
//! Replies get their own type rather than a recursive comment, which makes
//! the single observed nesting level a type-system fact.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, cat::Reporter};

// ─── Feed entities ───────────────────────────────────────────────────────────

/// A community update, as served by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
  pub id:         String,
  pub author:     Reporter,
  pub created_at: DateTime<Utc>,
  pub content:    String,
  pub likes:      u32,
  pub comments:   u32,
  pub is_liked:   bool,
}

impl CommunityPost {
  /// Coarse relative timestamp for feed rendering.
  pub fn age_label(&self, as_of: DateTime<Utc>) -> String {
    age_label(self.created_at, as_of)
  }
}

/// A comment on a community post, with its (flat) replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityComment {
  pub id:         String,
  pub author:     Reporter,
  pub created_at: DateTime<Utc>,
  pub content:    String,
  #[serde(default)]
  pub replies:    Vec<CommunityReply>,
}

impl CommunityComment {
  pub fn age_label(&self, as_of: DateTime<Utc>) -> String {
    age_label(self.created_at, as_of)
  }
}

/// A reply to a comment. Replies cannot nest further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityReply {
  pub id:         String,
  pub author:     Reporter,
  pub created_at: DateTime<Utc>,
  pub content:    String,
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

/// Body of `POST /community/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
  pub content: String,
}

impl NewPost {
  pub fn validate(&self) -> Result<()> {
    if self.content.trim().is_empty() {
      return Err(Error::EmptyContent);
    }
    Ok(())
  }
}

/// Body of `POST /community/posts/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
  pub content: String,
}

impl NewComment {
  pub fn validate(&self) -> Result<()> {
    if self.content.trim().is_empty() {
      return Err(Error::EmptyContent);
    }
    Ok(())
  }
}

// ─── Timestamp labels ────────────────────────────────────────────────────────

/// "just now" under a minute, then minutes, hours, and days; anything a
/// week or older falls back to the calendar date. Future timestamps (clock
/// skew between client and server) read as "just now".
pub fn age_label(created_at: DateTime<Utc>, as_of: DateTime<Utc>) -> String {
  let elapsed = as_of - created_at;
  if elapsed < Duration::minutes(1) {
    "just now".to_string()
  } else if elapsed < Duration::hours(1) {
    format!("{}m ago", elapsed.num_minutes())
  } else if elapsed < Duration::days(1) {
    format!("{}h ago", elapsed.num_hours())
  } else if elapsed < Duration::days(7) {
    format!("{}d ago", elapsed.num_days())
  } else {
    created_at.format("%Y-%m-%d").to_string()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 7, h, m, 0).unwrap()
  }

  #[test]
  fn age_labels_step_through_units() {
    let posted = at(12, 0);
    assert_eq!(age_label(posted, at(12, 0)), "just now");
    assert_eq!(age_label(posted, at(12, 12)), "12m ago");
    assert_eq!(age_label(posted, at(15, 0)), "3h ago");
    assert_eq!(
      age_label(posted, posted + Duration::days(3)),
      "3d ago"
    );
    assert_eq!(
      age_label(posted, posted + Duration::days(30)),
      "2026-08-07"
    );
  }

  #[test]
  fn future_timestamps_read_as_just_now() {
    assert_eq!(age_label(at(13, 0), at(12, 0)), "just now");
  }

  #[test]
  fn blank_drafts_are_rejected() {
    assert!(NewPost { content: " \n".into() }.validate().is_err());
    assert!(NewComment { content: String::new() }.validate().is_err());
    assert!(NewPost { content: "Found a new feeding spot".into() }
      .validate()
      .is_ok());
  }

  #[test]
  fn comment_decodes_with_missing_replies() {
    let comment: CommunityComment = serde_json::from_str(
      r#"{
        "id": "cm1",
        "author": { "name": "min" },
        "createdAt": "2026-08-07T12:00:00Z",
        "content": "Saw her this morning"
      }"#,
    )
    .unwrap();
    assert!(comment.replies.is_empty());
  }
}
