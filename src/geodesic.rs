//! Geodesic distance between two coordinates on the WGS-84 ellipsoid.

use geo::{point, GeodesicDistance, VincentyDistance};
use log::trace;

/// Distance in meters between two lat/long pairs given in degrees.
///
/// Uses Vincenty's inverse formula. Vincenty can fail to converge for
/// nearly antipodal points; in that case the Karney geodesic is returned
/// instead, so a distance is always produced.
pub fn vincenty_distance(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    // n.b. x=long, y=lat.
    let p1 = point!(x: long1, y: lat1);
    let p2 = point!(x: long2, y: lat2);

    match p1.vincenty_distance(&p2) {
        Ok(distance) => distance,
        Err(_) => {
            trace!(
                "vincenty did not converge for ({lat1}, {long1}) -> ({lat2}, {long2}), using geodesic"
            );
            p1.geodesic_distance(&p2)
        }
    }
}
