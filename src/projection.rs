/// Geographic → planar coordinate projection.
///
/// River proximity and along-river ordering are computed in a planar,
/// metre-based coordinate system. Everything that needs planar coordinates
/// goes through the `Projection` trait so the classifier can be driven by
/// synthetic geometry in tests (`Identity`) and by real survey data in
/// production (`Utm`).

use geo::Point;
use serde::{Deserialize, Serialize};

/// A point in a planar projected coordinate system (`x` east, `y` north).
pub type PlanarPoint = Point<f64>;

/// Maps geographic coordinates (degrees) onto a planar system.
pub trait Projection {
    fn project(&self, latitude: f64, longitude: f64) -> PlanarPoint;
}

/// Treats longitude as `x` and latitude as `y` unchanged.
///
/// For inputs that are already planar, and for tests that want to place
/// points at round numbers along a synthetic river.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    fn project(&self, latitude: f64, longitude: f64) -> PlanarPoint {
        PlanarPoint::new(longitude, latitude)
    }
}

// ---------------------------------------------------------------------------
// UTM on the WGS84 ellipsoid
// ---------------------------------------------------------------------------

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

/// Universal Transverse Mercator forward projection (EPSG:326zz / 327zz).
///
/// Series expansion after Snyder, "Map Projections: A Working Manual",
/// eqs. 8-9 to 8-10. Sub-millimetre within a zone, which is far below the
/// river margins this service works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utm {
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl Utm {
    pub fn new(zone: u8, hemisphere: Hemisphere) -> Self {
        Utm { zone, hemisphere }
    }

    /// Central meridian of the zone, in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.zone) * 6.0 - 183.0
    }
}

impl Default for Utm {
    /// Zone 32N covers the Saarland basins the service was built for.
    fn default() -> Self {
        Utm::new(32, Hemisphere::North)
    }
}

impl Projection for Utm {
    fn project(&self, latitude: f64, longitude: f64) -> PlanarPoint {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);

        let phi = latitude.to_radians();
        let dlambda = (longitude - self.central_meridian()).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = sin_phi / cos_phi;

        let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = cos_phi * dlambda;

        // Meridional arc length from the equator
        let m = WGS84_A
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let x = UTM_K0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
            + FALSE_EASTING;

        let mut y = UTM_K0
            * (m + n
                * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        if self.hemisphere == Hemisphere::South {
            y += FALSE_NORTHING_SOUTH;
        }

        PlanarPoint::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
