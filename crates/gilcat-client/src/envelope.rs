//! The uniform response envelope and pagination wrapper.

use serde::{Deserialize, Serialize};

/// Every response body follows this shape. `data` is present even for
/// operations with nothing to return (it is `null` there).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub data:    T,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errors:  Option<Vec<String>>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items: Vec<T>,
  /// 1-based page index.
  pub page:  u32,
  pub size:  u32,
  /// Total items across all pages.
  pub total: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn envelope_decodes_without_optional_fields() {
    let env: Envelope<Vec<u32>> =
      serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
    assert!(env.success);
    assert_eq!(env.data, vec![1, 2, 3]);
    assert!(env.message.is_none());
    assert!(env.errors.is_none());
  }

  #[test]
  fn envelope_decodes_null_data_as_unit() {
    let env: Envelope<()> =
      serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
    assert!(env.success);
  }

  #[test]
  fn page_decodes_camel_case() {
    let page: Page<String> = serde_json::from_str(
      r#"{"items":["a"],"page":2,"size":20,"total":41}"#,
    )
    .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page, 2);
    assert_eq!(page.total, 41);
  }
}
