//! Polygon ring winding utilities
//!
//! Two winding rules are available. [`WindingRule::SignedArea`] is the
//! default and classifies rings by the sign of their shoelace area.
//! [`WindingRule::LegacyHeadingSum`] reproduces the heuristic of older NGI
//! tooling: the raw edge headings are summed and reduced modulo 2π. That sum
//! is invariant under reversal for even point counts, so it cannot tell the
//! two orientations of a square apart and reports most rings as
//! counter-clockwise.

use crate::constants::{MIN_RING_POINTS, WINDING_TOLERANCE};
use crate::models::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

/// Doubled signed areas at or below this magnitude (m²) are degenerate
const AREA_TOLERANCE: f64 = 1e-9;

/// Rotational sense of a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindingDirection {
    Ccw,
    Cw,
    Degenerate,
}

/// Rule used to classify ring orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindingRule {
    #[default]
    SignedArea,
    LegacyHeadingSum,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RingError {
    #[error("ring has {count} points after closure, at least {MIN_RING_POINTS} required")]
    TooFewPoints { count: usize },

    #[error("ring winding is degenerate")]
    Degenerate,
}

/// Closed, non-degenerate polygon ring
///
/// The ring remembers the winding rule it was validated under and uses it
/// for [`Ring::winding`] and [`Ring::oriented`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Point>,
    #[serde(skip)]
    rule: WindingRule,
}

impl Ring {
    /// Close `points` and validate them under the default winding rule
    pub fn new(points: Vec<Point>) -> Result<Self, RingError> {
        Self::with_rule(points, WindingRule::default())
    }

    /// Close `points` and validate them under `rule`
    pub fn with_rule(mut points: Vec<Point>, rule: WindingRule) -> Result<Self, RingError> {
        close(&mut points);
        if points.len() < MIN_RING_POINTS {
            return Err(RingError::TooFewPoints {
                count: points.len(),
            });
        }
        if winding_direction_with(&points, rule) == WindingDirection::Degenerate {
            return Err(RingError::Degenerate);
        }
        Ok(Self { points, rule })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn rule(&self) -> WindingRule {
        self.rule
    }

    pub fn winding(&self) -> WindingDirection {
        winding_direction_with(&self.points, self.rule)
    }

    /// Reorient to the requested direction under the ring's own rule
    pub fn oriented(self, want_ccw: bool) -> Self {
        let points = force_orientation_with(&self.points, want_ccw, self.rule);
        Self {
            points,
            rule: self.rule,
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Winding direction under the default rule
pub fn winding_direction(points: &[Point]) -> WindingDirection {
    winding_direction_with(points, WindingRule::default())
}

pub fn winding_direction_with(points: &[Point], rule: WindingRule) -> WindingDirection {
    if points.len() < 3 {
        return WindingDirection::Degenerate;
    }
    let open = open_ring(points);
    if open.len() < 3 {
        return WindingDirection::Degenerate;
    }

    match rule {
        WindingRule::SignedArea => {
            let doubled_area = doubled_signed_area(open);
            if doubled_area.abs() <= AREA_TOLERANCE {
                WindingDirection::Degenerate
            } else if doubled_area > 0.0 {
                WindingDirection::Ccw
            } else {
                WindingDirection::Cw
            }
        }
        WindingRule::LegacyHeadingSum => {
            let reduced = heading_sum(open).rem_euclid(TAU);
            if reduced.abs() < WINDING_TOLERANCE {
                WindingDirection::Degenerate
            } else if reduced > 0.0 {
                WindingDirection::Ccw
            } else {
                WindingDirection::Cw
            }
        }
    }
}

/// Force orientation under the default rule
pub fn force_orientation(points: &[Point], want_ccw: bool) -> Vec<Point> {
    force_orientation_with(points, want_ccw, WindingRule::default())
}

/// Reverse `points` when their direction differs from the requested one and
/// re-close the result. Degenerate input is returned unchanged.
pub fn force_orientation_with(points: &[Point], want_ccw: bool, rule: WindingRule) -> Vec<Point> {
    let direction = winding_direction_with(points, rule);
    if direction == WindingDirection::Degenerate {
        return points.to_vec();
    }

    let mut ring = points.to_vec();
    let is_ccw = direction == WindingDirection::Ccw;
    if is_ccw != want_ccw {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring.reverse();
    }
    close(&mut ring);
    ring
}

fn close(points: &mut Vec<Point>) {
    if let (Some(&first), Some(last)) = (points.first(), points.last()) {
        if first != *last {
            points.push(first);
        }
    }
}

fn open_ring(points: &[Point]) -> &[Point] {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if first == last => &points[..points.len() - 1],
        _ => points,
    }
}

fn edges(points: &[Point]) -> impl Iterator<Item = (&Point, &Point)> {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .take(points.len())
}

fn doubled_signed_area(points: &[Point]) -> f64 {
    edges(points).map(|(a, b)| a.x * b.y - b.x * a.y).sum()
}

fn heading_sum(points: &[Point]) -> f64 {
    edges(points).map(|(a, b)| (b.y - a.y).atan2(b.x - a.x)).sum()
}
