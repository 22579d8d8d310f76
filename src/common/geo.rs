// src/common/geo.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Raio padrão da cerca virtual de uma obra, em metros.
pub const DEFAULT_GEOFENCE_RADIUS: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "geofence_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GeofenceStatus {
    Inside,
    Outside,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Distância em metros entre dois pontos (fórmula de Haversine).
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Classifica a posição do ponto em relação à cerca da obra.
/// Sem coordenadas de um dos lados, o status é `Unknown`.
pub fn geofence_status(
    position: Option<GeoPoint>,
    site: Option<GeoPoint>,
    radius_meters: Option<f64>,
) -> GeofenceStatus {
    match (position, site) {
        (Some(position), Some(site)) => {
            let radius = radius_meters.unwrap_or(DEFAULT_GEOFENCE_RADIUS);
            if distance_meters(position, site) <= radius {
                GeofenceStatus::Inside
            } else {
                GeofenceStatus::Outside
            }
        }
        _ => GeofenceStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: GeoPoint = GeoPoint { latitude: 43.6532, longitude: -79.3832 };

    #[test]
    fn same_point_is_zero_distance() {
        assert!(distance_meters(SITE, SITE).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let north = GeoPoint { latitude: SITE.latitude + 1.0, longitude: SITE.longitude };
        let d = distance_meters(SITE, north);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn classifies_against_radius() {
        // ~100 m ao norte
        let near = GeoPoint { latitude: SITE.latitude + 0.0009, longitude: SITE.longitude };
        // ~1 km ao norte
        let far = GeoPoint { latitude: SITE.latitude + 0.009, longitude: SITE.longitude };

        assert_eq!(geofence_status(Some(near), Some(SITE), None), GeofenceStatus::Inside);
        assert_eq!(geofence_status(Some(far), Some(SITE), None), GeofenceStatus::Outside);
        assert_eq!(geofence_status(Some(far), Some(SITE), Some(2_000.0)), GeofenceStatus::Inside);
    }

    #[test]
    fn missing_coordinates_are_unknown() {
        assert_eq!(geofence_status(None, Some(SITE), None), GeofenceStatus::Unknown);
        assert_eq!(geofence_status(Some(SITE), None, None), GeofenceStatus::Unknown);
    }
}
