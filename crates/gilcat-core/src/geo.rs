//! Great-circle geometry helpers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, as used by [`haversine_m`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lng: f64,
}

impl GeoPoint {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  /// Whether both components are finite and within WGS-84 bounds.
  pub fn is_valid(&self) -> bool {
    self.lat.is_finite()
      && self.lng.is_finite()
      && (-90.0..=90.0).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lng)
  }
}

/// Great-circle distance in metres between two points, by the haversine
/// formula on a sphere of mean radius 6 371 km.
///
/// The spherical model is off by up to ~0.5% against the true ellipsoid —
/// fine at city scale, not for geodesy.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
  let lat_a = a.lat.to_radians();
  let lat_b = b.lat.to_radians();
  let d_lat = (b.lat - a.lat).to_radians();
  let d_lng = (b.lng - a.lng).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

  // Clamp before asin: rounding can push h a hair past 1 near antipodes.
  2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
  use super::*;

  const SEOUL: GeoPoint = GeoPoint { lat: 37.5665, lng: 126.9780 };
  const BUSAN: GeoPoint = GeoPoint { lat: 35.1796, lng: 129.0756 };

  #[test]
  fn identical_points_are_zero_metres_apart() {
    assert_eq!(haversine_m(SEOUL, SEOUL), 0.0);
  }

  #[test]
  fn distance_is_symmetric() {
    let there = haversine_m(SEOUL, BUSAN);
    let back = haversine_m(BUSAN, SEOUL);
    assert!((there - back).abs() < 1e-6);
  }

  #[test]
  fn seoul_to_busan_is_about_325_km() {
    let d = haversine_m(SEOUL, BUSAN);
    assert!((d - 325_000.0).abs() < 3_000.0, "got {d} m");
  }

  #[test]
  fn distance_is_never_negative() {
    let d = haversine_m(GeoPoint::new(-89.0, -179.0), GeoPoint::new(89.0, 179.0));
    assert!(d >= 0.0);
  }

  #[test]
  fn validity_bounds() {
    assert!(GeoPoint::new(37.5, 127.0).is_valid());
    assert!(GeoPoint::new(-90.0, 180.0).is_valid());
    assert!(!GeoPoint::new(90.5, 0.0).is_valid());
    assert!(!GeoPoint::new(0.0, -180.5).is_valid());
    assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
  }
}
