//! Filtering and ordering over collections of [`CatModel`]s.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{cat::Gender, geo::GeoPoint, model::CatModel};

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Inclusive bounds on a cat's `last_seen` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: DateTime<Utc>,
  pub to:   DateTime<Utc>,
}

impl DateRange {
  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.from <= at && at <= self.to
  }
}

/// Query object for browsing the guide. Never persisted. Unset fields are
/// wildcards; set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
  /// Case-insensitive substring over the cat's location text.
  pub location:        Option<String>,
  pub gender:          Option<Gender>,
  pub is_neutered:     Option<bool>,
  /// A cat matches when *any* of these appears in *any* of its
  /// characteristics (case-insensitive substring).
  #[serde(default)]
  pub characteristics: Vec<String>,
  pub date_range:      Option<DateRange>,
}

impl SearchFilters {
  /// True when every field is a wildcard.
  pub fn is_empty(&self) -> bool {
    self.location.is_none()
      && self.gender.is_none()
      && self.is_neutered.is_none()
      && self.characteristics.is_empty()
      && self.date_range.is_none()
  }
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  /// Unicode code-point order over the cat's name. No locale tailoring.
  Name,
  LastSeen,
  Likes,
  Activity,
  /// Distance from [`SortContext::reference`]. With no reference point
  /// every comparison degrades to `Equal` and the input order is kept —
  /// an inherited quirk, preserved on purpose rather than made an error.
  Distance,
}

impl std::str::FromStr for SortKey {
  type Err = crate::Error;

  fn from_str(s: &str) -> crate::Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "name" => Ok(Self::Name),
      "last_seen" | "lastseen" => Ok(Self::LastSeen),
      "likes" => Ok(Self::Likes),
      "activity" => Ok(Self::Activity),
      "distance" => Ok(Self::Distance),
      other => Err(crate::Error::UnknownSortKey(other.to_string())),
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

/// Ambient inputs some sort keys need: the reference point for
/// [`SortKey::Distance`] and the ranking instant for [`SortKey::Activity`].
#[derive(Debug, Clone, Copy)]
pub struct SortContext {
  pub reference: Option<GeoPoint>,
  pub as_of:     DateTime<Utc>,
}

impl SortContext {
  pub fn now() -> Self {
    Self { reference: None, as_of: Utc::now() }
  }

  pub fn with_reference(mut self, reference: GeoPoint) -> Self {
    self.reference = Some(reference);
    self
  }
}

/// Stable in-place sort; `Desc` flips the comparator.
pub fn sort_cats(
  cats: &mut [CatModel],
  key: SortKey,
  order: SortOrder,
  ctx: &SortContext,
) {
  cats.sort_by(|a, b| {
    let ordering = compare(a, b, key, ctx);
    match order {
      SortOrder::Asc => ordering,
      SortOrder::Desc => ordering.reverse(),
    }
  });
}

fn compare(a: &CatModel, b: &CatModel, key: SortKey, ctx: &SortContext) -> Ordering {
  match key {
    SortKey::Name => a.record().name.cmp(&b.record().name),
    SortKey::LastSeen => a.record().last_seen.cmp(&b.record().last_seen),
    SortKey::Likes => a.record().likes.cmp(&b.record().likes),
    SortKey::Activity => {
      a.activity_score(ctx.as_of).cmp(&b.activity_score(ctx.as_of))
    }
    SortKey::Distance => match ctx.reference {
      Some(point) => a.distance_from(point).total_cmp(&b.distance_from(point)),
      None => Ordering::Equal,
    },
  }
}

/// The subset of `cats` matching `filters`, in input order. The empty
/// filter is the identity.
pub fn filter_cats(cats: &[CatModel], filters: &SearchFilters) -> Vec<CatModel> {
  cats.iter().filter(|c| c.matches(filters)).cloned().collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::cat::{Cat, Reporter};

  fn cat(id: &str, name: &str, likes: u32, lat: f64, lng: f64) -> CatModel {
    CatModel::new(Cat {
      id:              id.into(),
      name:            name.into(),
      description:     String::new(),
      location:        "Seoul".into(),
      characteristics: vec!["tabby".into()],
      estimated_age:   String::new(),
      gender:          Gender::Unknown,
      image:           None,
      lat,
      lng,
      likes,
      comments:        0,
      report_count:    0,
      is_liked:        false,
      is_neutered:     false,
      last_seen:       Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
      reported_by:     Reporter { name: "t".into(), avatar: None },
    })
  }

  fn ids(cats: &[CatModel]) -> Vec<&str> {
    cats.iter().map(|c| c.record().id.as_str()).collect()
  }

  #[test]
  fn empty_filter_is_identity() {
    let cats = vec![
      cat("a", "나비", 1, 37.0, 127.0),
      cat("b", "치즈", 2, 37.0, 127.0),
    ];
    let filtered = filter_cats(&cats, &SearchFilters::default());
    assert_eq!(ids(&filtered), ids(&cats));
  }

  #[test]
  fn filter_keeps_input_order() {
    let cats = vec![
      cat("a", "A", 1, 37.0, 127.0),
      cat("b", "B", 2, 37.0, 127.0),
      cat("c", "C", 3, 37.0, 127.0),
    ];
    let filters = SearchFilters {
      characteristics: vec!["tab".into()],
      ..SearchFilters::default()
    };
    assert_eq!(ids(&filter_cats(&cats, &filters)), vec!["a", "b", "c"]);
  }

  #[test]
  fn name_sort_handles_hangul() {
    let mut cats = vec![
      cat("b", "치즈", 0, 37.0, 127.0),
      cat("a", "나비", 0, 37.0, 127.0),
    ];
    let ctx = SortContext::now();
    sort_cats(&mut cats, SortKey::Name, SortOrder::Asc, &ctx);
    assert_eq!(ids(&cats), vec!["a", "b"]);

    sort_cats(&mut cats, SortKey::Name, SortOrder::Desc, &ctx);
    assert_eq!(ids(&cats), vec!["b", "a"]);
  }

  #[test]
  fn sort_is_stable() {
    // Equal keys keep their relative order.
    let mut cats = vec![
      cat("a", "same", 5, 37.0, 127.0),
      cat("b", "same", 5, 37.0, 127.0),
      cat("c", "same", 5, 37.0, 127.0),
    ];
    let ctx = SortContext::now();
    sort_cats(&mut cats, SortKey::Likes, SortOrder::Asc, &ctx);
    assert_eq!(ids(&cats), vec!["a", "b", "c"]);

    // Sorting an already-sorted list again is the identity.
    sort_cats(&mut cats, SortKey::Likes, SortOrder::Asc, &ctx);
    assert_eq!(ids(&cats), vec!["a", "b", "c"]);
  }

  #[test]
  fn likes_sort_descending() {
    let mut cats = vec![
      cat("a", "A", 1, 37.0, 127.0),
      cat("b", "B", 9, 37.0, 127.0),
      cat("c", "C", 4, 37.0, 127.0),
    ];
    sort_cats(&mut cats, SortKey::Likes, SortOrder::Desc, &SortContext::now());
    assert_eq!(ids(&cats), vec!["b", "c", "a"]);
  }

  #[test]
  fn distance_sort_orders_by_proximity_to_reference() {
    let mut cats = vec![
      cat("far", "F", 0, 35.1796, 129.0756),  // Busan
      cat("near", "N", 0, 37.5651, 126.9895), // Myeongdong
    ];
    let reference = GeoPoint::new(37.5665, 126.9780); // Seoul City Hall
    let ctx = SortContext::now().with_reference(reference);
    sort_cats(&mut cats, SortKey::Distance, SortOrder::Asc, &ctx);
    assert_eq!(ids(&cats), vec!["near", "far"]);
  }

  #[test]
  fn distance_sort_without_reference_keeps_input_order() {
    let mut cats = vec![
      cat("far", "F", 0, 35.1796, 129.0756),
      cat("near", "N", 0, 37.5651, 126.9895),
    ];
    sort_cats(&mut cats, SortKey::Distance, SortOrder::Asc, &SortContext::now());
    assert_eq!(ids(&cats), vec!["far", "near"]);
  }

  #[test]
  fn sort_key_parses_from_str() {
    assert_eq!("likes".parse::<SortKey>().unwrap(), SortKey::Likes);
    assert_eq!("last_seen".parse::<SortKey>().unwrap(), SortKey::LastSeen);
    assert_eq!("Distance".parse::<SortKey>().unwrap(), SortKey::Distance);
    assert!("size".parse::<SortKey>().is_err());
  }

  #[test]
  fn filters_emptiness() {
    assert!(SearchFilters::default().is_empty());
    assert!(
      !SearchFilters { gender: Some(Gender::Male), ..SearchFilters::default() }
        .is_empty()
    );
  }
}
