//! Scanner tests for the NGI parser

use crate::models::{Geometry, Point};

mod polygon_tests;

pub fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// `$LAYER_NAME` header followed by `body`
pub fn layer(name: &str, body: &[&str]) -> Vec<String> {
    let mut out = vec!["$LAYER_NAME".to_string(), format!("\"{}\"", name)];
    out.extend(body.iter().map(|s| s.to_string()));
    out
}

pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub fn outer_ring(geometry: &Geometry) -> Vec<Point> {
    match geometry {
        Geometry::Polygon(rings) => rings[0].points().to_vec(),
        other => panic!("expected polygon, got {:?}", other.kind()),
    }
}
