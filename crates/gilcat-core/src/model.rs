//! Copy-on-write wrapper over a [`Cat`] record.
//!
//! Every mutator consumes the wrapper and returns a fresh instance; the
//! underlying record is never edited in place. All operations here are
//! total — fallibility lives in the API layer, not in the model.

use chrono::{DateTime, Utc};

use crate::{
  cat::{Cat, CatPatch, Gender},
  geo::{self, GeoPoint},
  query::SearchFilters,
};

// Caps on the engagement contributions to the activity score.
const LIKES_CAP: f64 = 20.0;
const COMMENTS_CAP: f64 = 15.0;
const REPORTS_CAP: f64 = 10.0;

/// An immutable-value view of a [`Cat`] with derived, display-ready
/// accessors and the predicate/ordering logic the guide screens need.
#[derive(Debug, Clone, PartialEq)]
pub struct CatModel {
  record: Cat,
}

impl CatModel {
  pub fn new(record: Cat) -> Self {
    Self { record }
  }

  /// Borrow the wrapped record.
  pub fn record(&self) -> &Cat {
    &self.record
  }

  /// Defensive copy of the wrapped record. The caller gets no shared
  /// mutable state with this instance.
  pub fn to_record(&self) -> Cat {
    self.record.clone()
  }

  pub fn into_record(self) -> Cat {
    self.record
  }

  // ── Display-ready views ───────────────────────────────────────────────────

  pub fn gender_label(&self) -> &'static str {
    match self.record.gender {
      Gender::Male => "Male",
      Gender::Female => "Female",
      Gender::Unknown => "Unknown",
    }
  }

  pub fn neutered_label(&self) -> &'static str {
    if self.record.is_neutered {
      "Neutered"
    } else {
      "Not neutered"
    }
  }

  pub fn position(&self) -> GeoPoint {
    GeoPoint::new(self.record.lat, self.record.lng)
  }

  /// Great-circle distance in metres from this cat to `point`.
  /// See [`geo::haversine_m`] for the spherical approximation involved.
  pub fn distance_from(&self, point: GeoPoint) -> f64 {
    geo::haversine_m(self.position(), point)
  }

  // ── Predicate / ranking logic ─────────────────────────────────────────────

  /// True iff every *provided* filter field matches; unset fields are
  /// wildcards. Text fields match by case-insensitive substring, the
  /// characteristics list matches when any filter value appears in any of
  /// the cat's tags, enum and boolean fields match exactly, and the date
  /// range bounds `last_seen` inclusively.
  pub fn matches(&self, filters: &SearchFilters) -> bool {
    if let Some(location) = &filters.location
      && !contains_ci(&self.record.location, location)
    {
      return false;
    }
    if let Some(gender) = filters.gender
      && self.record.gender != gender
    {
      return false;
    }
    if let Some(neutered) = filters.is_neutered
      && self.record.is_neutered != neutered
    {
      return false;
    }
    if !filters.characteristics.is_empty() {
      let any = filters.characteristics.iter().any(|wanted| {
        self
          .record
          .characteristics
          .iter()
          .any(|have| contains_ci(have, wanted))
      });
      if !any {
        return false;
      }
    }
    if let Some(range) = &filters.date_range
      && !range.contains(self.record.last_seen)
    {
      return false;
    }
    true
  }

  /// Engagement heuristic for relative ranking: a recency bonus for the
  /// latest sighting plus capped contributions from likes, comments, and
  /// sighting reports. The absolute value carries no meaning.
  ///
  /// The ranking instant is an explicit parameter so the score is a pure
  /// function of its inputs.
  pub fn activity_score(&self, as_of: DateTime<Utc>) -> u32 {
    let days = (as_of.date_naive() - self.record.last_seen.date_naive()).num_days();
    let recency = match days {
      d if d <= 0 => 10.0,
      1..=3 => 5.0,
      4..=7 => 2.0,
      _ => 0.0,
    };
    let likes = (f64::from(self.record.likes) * 0.5).min(LIKES_CAP);
    let comments = f64::from(self.record.comments).min(COMMENTS_CAP);
    let reports = (f64::from(self.record.report_count) * 0.3).min(REPORTS_CAP);
    (recency + likes + comments + reports).round() as u32
  }

  // ── Copy-on-write mutators ────────────────────────────────────────────────

  /// New instance with the viewer's like recorded.
  pub fn liked(mut self) -> Self {
    self.record.likes = self.record.likes.saturating_add(1);
    self.record.is_liked = true;
    self
  }

  /// New instance with the viewer's like withdrawn. The counter saturates
  /// at zero.
  pub fn unliked(mut self) -> Self {
    self.record.likes = self.record.likes.saturating_sub(1);
    self.record.is_liked = false;
    self
  }

  /// New instance with the comment counter set to `max(0, count)`.
  pub fn with_comment_count(mut self, count: i64) -> Self {
    self.record.comments = count.max(0).min(i64::from(u32::MAX)) as u32;
    self
  }

  /// Shallow-merge `patch` onto the record; unset fields keep their
  /// current values.
  pub fn apply(mut self, patch: CatPatch) -> Self {
    let record = &mut self.record;
    if let Some(name) = patch.name {
      record.name = name;
    }
    if let Some(description) = patch.description {
      record.description = description;
    }
    if let Some(location) = patch.location {
      record.location = location;
    }
    if let Some(characteristics) = patch.characteristics {
      record.characteristics = characteristics;
    }
    if let Some(estimated_age) = patch.estimated_age {
      record.estimated_age = estimated_age;
    }
    if let Some(gender) = patch.gender {
      record.gender = gender;
    }
    if let Some(image) = patch.image {
      record.image = Some(image);
    }
    if let Some(lat) = patch.lat {
      record.lat = lat;
    }
    if let Some(lng) = patch.lng {
      record.lng = lng;
    }
    if let Some(is_neutered) = patch.is_neutered {
      record.is_neutered = is_neutered;
    }
    if let Some(last_seen) = patch.last_seen {
      record.last_seen = last_seen;
    }
    self
  }
}

impl From<Cat> for CatModel {
  fn from(record: Cat) -> Self {
    Self::new(record)
  }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{cat::Reporter, query::DateRange};

  fn cat() -> Cat {
    Cat {
      id:              "c1".into(),
      name:            "Cheese".into(),
      description:     "Orange tabby".into(),
      location:        "Mangwon market, Mapo".into(),
      characteristics: vec!["Orange".into(), "friendly".into()],
      estimated_age:   "about 2 years".into(),
      gender:          Gender::Male,
      image:           None,
      lat:             37.5558,
      lng:             126.9017,
      likes:           3,
      comments:        1,
      report_count:    4,
      is_liked:        false,
      is_neutered:     true,
      last_seen:       Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap(),
      reported_by:     Reporter { name: "jiyoung".into(), avatar: None },
    }
  }

  fn model() -> CatModel {
    CatModel::new(cat())
  }

  #[test]
  fn labels_are_total() {
    assert_eq!(model().gender_label(), "Male");
    assert_eq!(model().neutered_label(), "Neutered");

    let unknown = CatModel::new(Cat {
      gender: Gender::Unknown,
      is_neutered: false,
      ..cat()
    });
    assert_eq!(unknown.gender_label(), "Unknown");
    assert_eq!(unknown.neutered_label(), "Not neutered");
  }

  #[test]
  fn distance_to_own_position_is_zero() {
    let m = model();
    assert_eq!(m.distance_from(m.position()), 0.0);
  }

  #[test]
  fn like_unlike_round_trips() {
    let m = model();
    let liked = m.clone().liked();
    assert_eq!(liked.record().likes, 4);
    assert!(liked.record().is_liked);

    let back = liked.unliked();
    assert_eq!(back.record().likes, m.record().likes);
  }

  #[test]
  fn unlike_saturates_at_zero() {
    let m = CatModel::new(Cat { likes: 0, ..cat() });
    let m = m.unliked();
    assert_eq!(m.record().likes, 0);
  }

  #[test]
  fn comment_count_clamps_below_zero() {
    let m = model().with_comment_count(-5);
    assert_eq!(m.record().comments, 0);

    let m = m.with_comment_count(7);
    assert_eq!(m.record().comments, 7);
  }

  #[test]
  fn to_record_round_trips() {
    let m = model();
    let rebuilt = CatModel::new(m.to_record());
    assert_eq!(m, rebuilt);
  }

  #[test]
  fn to_record_is_a_defensive_copy() {
    let m = model();
    let mut copy = m.to_record();
    copy.likes = 999;
    assert_eq!(m.record().likes, 3);
  }

  #[test]
  fn apply_merges_shallowly() {
    let patched = model().apply(CatPatch {
      name: Some("Biscuit".into()),
      is_neutered: Some(false),
      ..CatPatch::default()
    });
    assert_eq!(patched.record().name, "Biscuit");
    assert!(!patched.record().is_neutered);
    // Untouched fields survive.
    assert_eq!(patched.record().location, "Mangwon market, Mapo");
    assert_eq!(patched.record().likes, 3);
  }

  // ── matches ───────────────────────────────────────────────────────────────

  #[test]
  fn empty_filters_match_everything() {
    assert!(model().matches(&SearchFilters::default()));
  }

  #[test]
  fn gender_mismatch_fails_regardless_of_other_fields() {
    let filters = SearchFilters {
      gender: Some(Gender::Female),
      is_neutered: Some(true),
      ..SearchFilters::default()
    };
    assert!(!model().matches(&filters));
  }

  #[test]
  fn location_matches_case_insensitive_substring() {
    let filters = SearchFilters {
      location: Some("mapo".into()),
      ..SearchFilters::default()
    };
    assert!(model().matches(&filters));

    let filters = SearchFilters {
      location: Some("Gangnam".into()),
      ..SearchFilters::default()
    };
    assert!(!model().matches(&filters));
  }

  #[test]
  fn characteristics_match_any_value() {
    let filters = SearchFilters {
      characteristics: vec!["black".into(), "ORANGE".into()],
      ..SearchFilters::default()
    };
    assert!(model().matches(&filters));

    let filters = SearchFilters {
      characteristics: vec!["black".into()],
      ..SearchFilters::default()
    };
    assert!(!model().matches(&filters));
  }

  #[test]
  fn date_range_bounds_are_inclusive() {
    let seen = cat().last_seen;
    let filters = SearchFilters {
      date_range: Some(DateRange { from: seen, to: seen }),
      ..SearchFilters::default()
    };
    assert!(model().matches(&filters));

    let filters = SearchFilters {
      date_range: Some(DateRange {
        from: seen + chrono::Duration::seconds(1),
        to: seen + chrono::Duration::days(1),
      }),
      ..SearchFilters::default()
    };
    assert!(!model().matches(&filters));
  }

  // ── activity score ────────────────────────────────────────────────────────

  #[test]
  fn activity_score_worked_example() {
    // Seen today, likes=10, comments=5, reports=20:
    // 10 + min(5, 20) + min(5, 15) + min(6, 10) = 26.
    let m = CatModel::new(Cat {
      likes: 10,
      comments: 5,
      report_count: 20,
      ..cat()
    });
    let as_of = cat().last_seen;
    assert_eq!(m.activity_score(as_of), 26);
  }

  #[test]
  fn recency_bonus_decays_in_steps() {
    let seen = cat().last_seen;
    let quiet = CatModel::new(Cat {
      likes: 0,
      comments: 0,
      report_count: 0,
      ..cat()
    });
    assert_eq!(quiet.activity_score(seen), 10);
    assert_eq!(quiet.activity_score(seen + chrono::Duration::days(2)), 5);
    assert_eq!(quiet.activity_score(seen + chrono::Duration::days(7)), 2);
    assert_eq!(quiet.activity_score(seen + chrono::Duration::days(30)), 0);
  }

  #[test]
  fn engagement_contributions_are_capped() {
    let m = CatModel::new(Cat {
      likes: 1_000,
      comments: 1_000,
      report_count: 1_000,
      ..cat()
    });
    let as_of = cat().last_seen + chrono::Duration::days(30);
    // 0 recency + 20 + 15 + 10.
    assert_eq!(m.activity_score(as_of), 45);
  }
}
