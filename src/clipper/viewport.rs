//! Screen-space clipping against the raster bounds.

use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// How line segments are fitted to the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewportClip {
    /// One edge at a time (left, right, top, bottom), rounding each moved
    /// endpoint to whole pixels. An endpoint past an edge slides along the
    /// segment onto it; when both are past the same edge both are clamped
    /// onto it. Earlier edges are not re-checked.
    #[default]
    Sequential,
    /// Liang–Barsky parametric clipping in floating point.
    Exact,
}

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    fn outside(self, p: Vec2, max: Vec2) -> bool {
        match self {
            Edge::Left => p.x < 0.0,
            Edge::Right => p.x > max.x,
            Edge::Top => p.y < 0.0,
            Edge::Bottom => p.y > max.y,
        }
    }

    /// Sets the coordinate this edge bounds to the edge's value.
    fn clamp(self, p: Vec2, max: Vec2) -> Vec2 {
        match self {
            Edge::Left => Vec2::new(0.0, p.y),
            Edge::Right => Vec2::new(max.x, p.y),
            Edge::Top => Vec2::new(p.x, 0.0),
            Edge::Bottom => Vec2::new(p.x, max.y),
        }
    }

    /// Moves `p` along the segment towards `q` onto this edge.
    fn intersect(self, p: Vec2, q: Vec2, max: Vec2) -> Vec2 {
        match self {
            Edge::Left | Edge::Right => {
                let x = if matches!(self, Edge::Left) { 0.0 } else { max.x };
                let y = p.y + (q.y - p.y) * (x - p.x) / (q.x - p.x);
                Vec2::new(x, y.round())
            }
            Edge::Top | Edge::Bottom => {
                let y = if matches!(self, Edge::Top) { 0.0 } else { max.y };
                let x = p.x + (q.x - p.x) * (y - p.y) / (q.y - p.y);
                Vec2::new(x.round(), y)
            }
        }
    }
}

impl ViewportClip {
    /// Clips a segment to `[0, width-1] x [0, height-1]`. Returns `None`
    /// for an empty raster, or in `Exact` mode when nothing of the segment
    /// remains.
    pub fn clip(self, a: Vec2, b: Vec2, width: u32, height: u32) -> Option<(Vec2, Vec2)> {
        if width == 0 || height == 0 {
            return None;
        }
        let max = Vec2::new((width - 1) as f32, (height - 1) as f32);
        match self {
            ViewportClip::Sequential => clip_sequential(a, b, max),
            ViewportClip::Exact => clip_liang_barsky(a, b, max),
        }
    }
}

fn round(p: Vec2) -> Vec2 {
    Vec2::new(p.x.round(), p.y.round())
}

fn clip_sequential(a: Vec2, b: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let (mut a, mut b) = (round(a), round(b));
    for edge in Edge::ALL {
        match (edge.outside(a, max), edge.outside(b, max)) {
            (true, true) => {
                a = edge.clamp(a, max);
                b = edge.clamp(b, max);
            }
            (true, false) => a = edge.intersect(a, b, max),
            (false, true) => b = edge.intersect(b, a, max),
            (false, false) => {}
        }
    }
    Some((a, b))
}

fn clip_liang_barsky(a: Vec2, b: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((round(a + d * t0), round(a + d * t1)))
}

/// Coarse patch rejection: true when every projected vertex lies beyond
/// the same raster edge. Patches straddling a corner are kept even if none
/// of their area is visible.
pub fn patch_outside(points: &[Vec2], width: u32, height: u32) -> bool {
    let max = Vec2::new(width as f32 - 1.0, height as f32 - 1.0);
    Edge::ALL
        .iter()
        .any(|&edge| points.iter().all(|&p| edge.outside(p, max)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_segment_is_clipped_on_both_sides() {
        let clipped = ViewportClip::Sequential
            .clip(Vec2::new(-5.0, 10.0), Vec2::new(15.0, 10.0), 20, 20)
            .unwrap();
        assert_eq!(clipped, (Vec2::new(0.0, 10.0), Vec2::new(15.0, 10.0)));

        let clipped = ViewportClip::Sequential
            .clip(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0), 10, 10)
            .unwrap();
        assert_eq!(clipped, (Vec2::new(0.0, 5.0), Vec2::new(9.0, 5.0)));
    }

    #[test]
    fn segment_below_the_raster_is_clamped_onto_the_bottom_row() {
        // x clipping yields (0,10)-(9,10); both then lie past the bottom edge
        // and are clamped onto row 9.
        let (a, b) = ViewportClip::Sequential
            .clip(Vec2::new(-5.0, 10.0), Vec2::new(15.0, 10.0), 10, 10)
            .unwrap();
        assert_eq!(a, Vec2::new(0.0, 9.0));
        assert_eq!(b, Vec2::new(9.0, 9.0));
        for p in [a, b] {
            assert!((0.0..=9.0).contains(&p.x) && (0.0..=9.0).contains(&p.y));
        }

        // The exact clipper finds nothing of the segment inside.
        assert!(ViewportClip::Exact
            .clip(Vec2::new(-5.0, 10.0), Vec2::new(15.0, 10.0), 10, 10)
            .is_none());
    }

    #[test]
    fn diagonal_uses_the_slope() {
        let (a, b) = ViewportClip::Sequential
            .clip(Vec2::new(-4.0, 0.0), Vec2::new(4.0, 8.0), 10, 10)
            .unwrap();
        assert_eq!(a, Vec2::new(0.0, 4.0));
        assert_eq!(b, Vec2::new(4.0, 8.0));
    }

    #[test]
    fn sequential_and_exact_agree_within_a_pixel() {
        let cases = [
            (Vec2::new(-30.0, -7.0), Vec2::new(50.0, 61.0)),
            (Vec2::new(12.0, -40.0), Vec2::new(20.0, 90.0)),
            (Vec2::new(5.0, 5.0), Vec2::new(30.0, 30.0)),
        ];
        for (a, b) in cases {
            let s = ViewportClip::Sequential.clip(a, b, 40, 30).unwrap();
            let e = ViewportClip::Exact.clip(a, b, 40, 30).unwrap();
            for (p, q) in [(s.0, e.0), (s.1, e.1)] {
                assert!((p.x - q.x).abs() <= 1.0 && (p.y - q.y).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn inside_segment_is_untouched() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(7.0, 3.0);
        assert_eq!(ViewportClip::Sequential.clip(a, b, 10, 10), Some((a, b)));
        assert_eq!(ViewportClip::Exact.clip(a, b, 10, 10), Some((a, b)));
    }

    #[test]
    fn patch_outside_needs_all_points_past_one_edge() {
        let left = [Vec2::new(-5.0, 1.0), Vec2::new(-1.0, 50.0), Vec2::new(-3.0, -9.0)];
        assert!(patch_outside(&left, 10, 10));
        let corner = [Vec2::new(-5.0, 5.0), Vec2::new(5.0, -5.0), Vec2::new(-5.0, -5.0)];
        assert!(!patch_outside(&corner, 10, 10));
    }
}
