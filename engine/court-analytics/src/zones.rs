//! Court zone classification
//!
//! Coordinates are in the provider's court units (centimetres) with the
//! basket at the origin and `y` growing away from the baseline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eleven court zones, or `Unknown` when a coordinate is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    AtTheRim,
    Short2ptLeft,
    Short2ptCenter,
    Short2ptRight,
    Mid2ptLeft,
    Mid2ptCenter,
    Mid2ptRight,
    Corner3Left,
    RightCorner3,
    LeftSide3,
    RightSide3,
    Top3,
    Unknown,
}

impl Zone {
    /// Every zone a located shot can land in
    pub const COURT: [Zone; 12] = [
        Zone::AtTheRim,
        Zone::Short2ptLeft,
        Zone::Short2ptCenter,
        Zone::Short2ptRight,
        Zone::Mid2ptLeft,
        Zone::Mid2ptCenter,
        Zone::Mid2ptRight,
        Zone::Corner3Left,
        Zone::RightCorner3,
        Zone::LeftSide3,
        Zone::RightSide3,
        Zone::Top3,
    ];

    /// Label stored in the `bin` column
    pub fn label(self) -> &'static str {
        match self {
            Zone::AtTheRim => "at the rim",
            Zone::Short2ptLeft => "short 2pt left",
            Zone::Short2ptCenter => "short 2pt center",
            Zone::Short2ptRight => "short 2pt right",
            Zone::Mid2ptLeft => "mid 2pt left",
            Zone::Mid2ptCenter => "mid 2pt center",
            Zone::Mid2ptRight => "mid 2pt right",
            Zone::Corner3Left => "corner 3 left",
            Zone::RightCorner3 => "right corner 3",
            Zone::LeftSide3 => "left side 3",
            Zone::RightSide3 => "right side 3",
            Zone::Top3 => "top 3",
            Zone::Unknown => "Unknown",
        }
    }

    pub fn is_three(self) -> bool {
        matches!(
            self,
            Zone::Corner3Left | Zone::RightCorner3 | Zone::LeftSide3 | Zone::RightSide3 | Zone::Top3
        )
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Court dimensions the classifier works from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtGeometry {
    pub basket_x: f64,
    pub basket_y: f64,
    pub three_point_radius: f64,
    /// Corner threes are taken at or beyond this |x|
    pub corner_line_x: f64,
    /// Where the straight corner line meets the arc
    pub corner_intersection_y: f64,
    pub restricted_area_radius: f64,
    /// Two-point shots closer than this are "short", the rest "mid"
    pub short_range_cutoff: f64,
    /// Half width of the centre lane for two-point zones
    pub center_band: f64,
    /// Half width of the three-point arc's centre wedge, in degrees
    pub top_wedge_degrees: f64,
}

impl Default for CourtGeometry {
    fn default() -> Self {
        Self {
            basket_x: 0.0,
            basket_y: 0.0,
            three_point_radius: 675.0,
            corner_line_x: 660.0,
            corner_intersection_y: 157.5,
            restricted_area_radius: 125.0,
            short_range_cutoff: 300.0,
            center_band: 50.0,
            top_wedge_degrees: 30.0,
        }
    }
}

impl CourtGeometry {
    /// Map a shot location to its zone
    pub fn classify(&self, x: Option<i32>, y: Option<i32>) -> Zone {
        let (Some(x), Some(y)) = (x, y) else {
            return Zone::Unknown;
        };
        self.classify_point(f64::from(x), f64::from(y))
    }

    pub fn classify_point(&self, x: f64, y: f64) -> Zone {
        let dx = x - self.basket_x;
        let dy = y - self.basket_y;
        let distance = dx.hypot(dy);
        // x is the first argument on purpose: 0 degrees points down the court
        let angle = dx.atan2(dy).to_degrees();

        let is_corner_three = x.abs() >= self.corner_line_x && y <= self.corner_intersection_y;
        let is_arc_three = distance >= self.three_point_radius && y > self.corner_intersection_y;

        if is_corner_three {
            return if x < 0.0 { Zone::Corner3Left } else { Zone::RightCorner3 };
        }

        if is_arc_three {
            return if angle < -self.top_wedge_degrees {
                Zone::RightSide3
            } else if angle > self.top_wedge_degrees {
                Zone::LeftSide3
            } else {
                Zone::Top3
            };
        }

        if distance <= self.restricted_area_radius {
            return Zone::AtTheRim;
        }

        let side = if x < -self.center_band {
            Side::Left
        } else if x > self.center_band {
            Side::Right
        } else {
            Side::Center
        };

        match (distance <= self.short_range_cutoff, side) {
            (true, Side::Left) => Zone::Short2ptLeft,
            (true, Side::Center) => Zone::Short2ptCenter,
            (true, Side::Right) => Zone::Short2ptRight,
            (false, Side::Left) => Zone::Mid2ptLeft,
            (false, Side::Center) => Zone::Mid2ptCenter,
            (false, Side::Right) => Zone::Mid2ptRight,
        }
    }
}

enum Side {
    Left,
    Center,
    Right,
}

/// Classify against the default court
pub fn classify_zone(x: Option<i32>, y: Option<i32>) -> Zone {
    CourtGeometry::default().classify(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_threes() {
        assert_eq!(classify_zone(Some(700), Some(100)), Zone::RightCorner3);
        assert_eq!(classify_zone(Some(-700), Some(100)), Zone::Corner3Left);
        // Exactly on the corner line still counts
        assert_eq!(classify_zone(Some(660), Some(0)), Zone::RightCorner3);
        assert_eq!(classify_zone(Some(-660), Some(-50)), Zone::Corner3Left);
    }

    #[test]
    fn test_arc_threes() {
        assert_eq!(classify_zone(Some(0), Some(800)), Zone::Top3);
        // atan2(x, y): positive x gives a positive angle, i.e. "left side"
        assert_eq!(classify_zone(Some(600), Some(400)), Zone::LeftSide3);
        assert_eq!(classify_zone(Some(-600), Some(400)), Zone::RightSide3);
    }

    #[test]
    fn test_arc_boundary_requires_y_above_corner_intersection() {
        // Beyond the arc radius but below the corner intersection and inside the corner line
        assert_eq!(classify_zone(Some(659), Some(157)), Zone::Mid2ptRight);
    }

    #[test]
    fn test_two_point_zones() {
        assert_eq!(classify_zone(Some(0), Some(0)), Zone::AtTheRim);
        assert_eq!(classify_zone(Some(0), Some(125)), Zone::AtTheRim);
        assert_eq!(classify_zone(Some(-200), Some(100)), Zone::Short2ptLeft);
        assert_eq!(classify_zone(Some(50), Some(200)), Zone::Short2ptCenter);
        assert_eq!(classify_zone(Some(200), Some(100)), Zone::Short2ptRight);
        assert_eq!(classify_zone(Some(-400), Some(300)), Zone::Mid2ptLeft);
        assert_eq!(classify_zone(Some(0), Some(500)), Zone::Mid2ptCenter);
        assert_eq!(classify_zone(Some(400), Some(300)), Zone::Mid2ptRight);
    }

    #[test]
    fn test_missing_coordinates() {
        assert_eq!(classify_zone(None, Some(100)), Zone::Unknown);
        assert_eq!(classify_zone(Some(100), None), Zone::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let geometry = CourtGeometry::default();
        for x in (-750..=750).step_by(75) {
            for y in (-100..=850).step_by(95) {
                let first = geometry.classify(Some(x), Some(y));
                assert_eq!(first, geometry.classify(Some(x), Some(y)));
                assert_ne!(first, Zone::Unknown);
            }
        }
    }

    #[test]
    fn test_custom_geometry() {
        let geometry = CourtGeometry { three_point_radius: 600.0, ..CourtGeometry::default() };
        assert_eq!(geometry.classify(Some(0), Some(620)), Zone::Top3);
        assert_eq!(classify_zone(Some(0), Some(620)), Zone::Mid2ptCenter);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Zone::COURT.len(), 11);
        assert_eq!(Zone::Short2ptCenter.label(), "short 2pt center");
        assert_eq!(Zone::Unknown.to_string(), "Unknown");
        assert!(Zone::Top3.is_three());
        assert!(!Zone::AtTheRim.is_three());
    }
}
