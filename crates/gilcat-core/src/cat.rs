//! Cat records — the central entity of the gilcat tracker.
//!
//! `Cat` mirrors the REST wire shape (camelCase field names). Server-side
//! aliases such as `imageBase64` are absorbed here at the decode boundary
//! and never travel further into the codebase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, geo::GeoPoint};

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Reported gender of a cat. Absence on the wire is `Unknown`, never null.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  #[default]
  Unknown,
}

impl Gender {
  /// The wire discriminant. Must match the `rename_all = "lowercase"`
  /// serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
      Self::Unknown => "unknown",
    }
  }
}

impl std::str::FromStr for Gender {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      "unknown" => Ok(Self::Unknown),
      other => Err(Error::UnknownGender(other.to_string())),
    }
  }
}

// ─── Attribution ─────────────────────────────────────────────────────────────

/// The original submitter of a cat record. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
  pub name:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}

// ─── Cat ─────────────────────────────────────────────────────────────────────

/// A registered stray cat, as served by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
  /// Opaque server-assigned identifier; immutable after creation.
  pub id:              String,
  pub name:            String,
  pub description:     String,
  /// Free-text address of the usual sighting area.
  pub location:        String,
  /// Ordered tags; duplicates are not prevented at this level.
  pub characteristics: Vec<String>,
  /// Free-text age label, e.g. "about 2 years".
  pub estimated_age:   String,
  #[serde(default)]
  pub gender:          Gender,
  /// Photo URL or embedded data. Some server builds send `imageBase64`
  /// instead; the alias is normalised away right here.
  #[serde(default, alias = "imageBase64", skip_serializing_if = "Option::is_none")]
  pub image:           Option<String>,
  pub lat:             f64,
  pub lng:             f64,
  pub likes:           u32,
  pub comments:        u32,
  /// Distinct sighting confirmations.
  pub report_count:    u32,
  /// Whether the current viewer has liked this cat.
  pub is_liked:        bool,
  pub is_neutered:     bool,
  pub last_seen:       DateTime<Utc>,
  pub reported_by:     Reporter,
}

// ─── NewCat ──────────────────────────────────────────────────────────────────

/// Registration draft sent to `POST /cats`. The server assigns `id`,
/// counters, and attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCat {
  pub name:            String,
  pub description:     String,
  pub location:        String,
  pub characteristics: Vec<String>,
  pub estimated_age:   String,
  #[serde(default)]
  pub gender:          Gender,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:           Option<String>,
  pub coordinates:     GeoPoint,
  pub is_neutered:     bool,
}

impl NewCat {
  /// The registration workflow's enforcement point: the model accepts any
  /// record, drafts do not.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    if self.characteristics.iter().all(|c| c.trim().is_empty()) {
      return Err(Error::NoCharacteristics);
    }
    if !self.coordinates.is_valid() {
      return Err(Error::InvalidCoordinates {
        lat: self.coordinates.lat,
        lng: self.coordinates.lng,
      });
    }
    Ok(())
  }
}

// ─── CatPatch ────────────────────────────────────────────────────────────────

/// Partial update, both the `PUT /cats/{id}` body and the input to
/// [`crate::model::CatModel::apply`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:            Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub characteristics: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub estimated_age:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender:          Option<Gender>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lat:             Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lng:             Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_neutered:     Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_seen:       Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> NewCat {
    NewCat {
      name:            "Cheese".into(),
      description:     "Orange tabby near the market".into(),
      location:        "Mangwon market, Mapo".into(),
      characteristics: vec!["orange".into(), "friendly".into()],
      estimated_age:   "about 2 years".into(),
      gender:          Gender::Male,
      image:           None,
      coordinates:     GeoPoint::new(37.5558, 126.9017),
      is_neutered:     false,
    }
  }

  #[test]
  fn valid_draft_passes() {
    assert!(draft().validate().is_ok());
  }

  #[test]
  fn blank_name_is_rejected() {
    let mut d = draft();
    d.name = "   ".into();
    assert!(matches!(d.validate(), Err(Error::EmptyName)));
  }

  #[test]
  fn empty_characteristics_are_rejected() {
    let mut d = draft();
    d.characteristics.clear();
    assert!(matches!(d.validate(), Err(Error::NoCharacteristics)));

    d.characteristics = vec!["  ".into()];
    assert!(matches!(d.validate(), Err(Error::NoCharacteristics)));
  }

  #[test]
  fn out_of_range_coordinates_are_rejected() {
    let mut d = draft();
    d.coordinates = GeoPoint::new(91.0, 0.0);
    assert!(matches!(
      d.validate(),
      Err(Error::InvalidCoordinates { .. })
    ));
  }

  #[test]
  fn cat_decodes_camel_case_wire_shape() {
    let cat: Cat = serde_json::from_str(
      r#"{
        "id": "c1",
        "name": "나비",
        "description": "",
        "location": "Hongdae",
        "characteristics": ["calico"],
        "estimatedAge": "kitten",
        "gender": "female",
        "lat": 37.55,
        "lng": 126.92,
        "likes": 3,
        "comments": 1,
        "reportCount": 2,
        "isLiked": false,
        "isNeutered": true,
        "lastSeen": "2026-08-01T09:00:00Z",
        "reportedBy": { "name": "jiyoung" }
      }"#,
    )
    .unwrap();
    assert_eq!(cat.name, "나비");
    assert_eq!(cat.gender, Gender::Female);
    assert_eq!(cat.report_count, 2);
    assert!(cat.is_neutered);
    assert!(cat.image.is_none());
  }

  #[test]
  fn image_base64_alias_is_absorbed() {
    let raw = r#"{
      "id": "c2",
      "name": "Mochi",
      "description": "",
      "location": "",
      "characteristics": [],
      "estimatedAge": "",
      "imageBase64": "data:image/png;base64,AAAA",
      "lat": 0.0,
      "lng": 0.0,
      "likes": 0,
      "comments": 0,
      "reportCount": 0,
      "isLiked": false,
      "isNeutered": false,
      "lastSeen": "2026-08-01T09:00:00Z",
      "reportedBy": { "name": "m" }
    }"#;
    let cat: Cat = serde_json::from_str(raw).unwrap();
    assert_eq!(cat.image.as_deref(), Some("data:image/png;base64,AAAA"));

    // The alias never survives re-serialisation.
    let out = serde_json::to_value(&cat).unwrap();
    assert!(out.get("image").is_some());
    assert!(out.get("imageBase64").is_none());
  }

  #[test]
  fn missing_gender_defaults_to_unknown() {
    let raw = r#"{
      "id": "c3",
      "name": "?",
      "description": "",
      "location": "",
      "characteristics": [],
      "estimatedAge": "",
      "lat": 0.0,
      "lng": 0.0,
      "likes": 0,
      "comments": 0,
      "reportCount": 0,
      "isLiked": false,
      "isNeutered": false,
      "lastSeen": "2026-08-01T09:00:00Z",
      "reportedBy": { "name": "m" }
    }"#;
    let cat: Cat = serde_json::from_str(raw).unwrap();
    assert_eq!(cat.gender, Gender::Unknown);
  }

  #[test]
  fn patch_serialises_only_set_fields() {
    let patch = CatPatch {
      name: Some("Biscuit".into()),
      is_neutered: Some(true),
      ..CatPatch::default()
    };
    let out = serde_json::to_value(&patch).unwrap();
    assert_eq!(out["name"], "Biscuit");
    assert_eq!(out["isNeutered"], true);
    assert!(out.get("location").is_none());
  }

  #[test]
  fn gender_round_trips_through_str() {
    for g in [Gender::Male, Gender::Female, Gender::Unknown] {
      assert_eq!(g.as_str().parse::<Gender>().unwrap(), g);
    }
    assert!("tomcat".parse::<Gender>().is_err());
  }
}
