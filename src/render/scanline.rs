//! Scanline triangle traversal with flat-top/flat-bottom decomposition.
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>      /----\<- split at v1.y
//!     /      \             v1   split
//!    /________\             \    /
//!   v1        v2             \  /
//!                             \/
//!                             v2
//! ```
//!
//! The traversal only produces horizontal spans; what gets written into them
//! (opaque fill or blend) is up to the caller. Every covered row is emitted
//! exactly once, so translucent fills are not blended twice along the split.

use super::canvas::Point;

/// Emits `(y, x_start, x_end)` for every row the triangle covers,
/// `x_start <= x_end` inclusive. A triangle with zero height emits nothing.
pub fn triangle_spans<F>(points: [Point; 3], mut span: F)
where
    F: FnMut(i32, i32, i32),
{
    let [mut v0, mut v1, mut v2] = points;
    sort_vertices(&mut v0, &mut v1, &mut v2);

    if v0.y == v2.y {
        return;
    }

    if v1.y == v2.y {
        fill_flat_bottom(v0, v1, v2, v0.y, v2.y, &mut span);
    } else if v0.y == v1.y {
        fill_flat_top(v0, v1, v2, v0.y, v2.y, &mut span);
    } else {
        // Point on the long edge v0 -> v2 at the height of v1.
        let t = (v1.y - v0.y) as f32 / (v2.y - v0.y) as f32;
        let split_x = v0.x as f32 + t * (v2.x - v0.x) as f32;
        let split = (split_x, v1.y);

        fill_flat_bottom_split(v0, v1, split, &mut span);
        fill_flat_top_split(v1, split, v2, &mut span);
    }
}

/// Sorts three points by Y, top to bottom.
fn sort_vertices(v0: &mut Point, v1: &mut Point, v2: &mut Point) {
    if v1.y < v0.y {
        std::mem::swap(v0, v1);
    }
    if v2.y < v1.y {
        std::mem::swap(v1, v2);
    }
    if v1.y < v0.y {
        std::mem::swap(v0, v1);
    }
}

fn emit<F>(y: i32, x1: f32, x2: f32, span: &mut F)
where
    F: FnMut(i32, i32, i32),
{
    let (left, right) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    span(y, left.round() as i32, right.round() as i32);
}

/// Apex `v0` above the flat edge `v1`-`v2`. Rows `y_start..=y_end`.
fn fill_flat_bottom<F>(v0: Point, v1: Point, v2: Point, y_start: i32, y_end: i32, span: &mut F)
where
    F: FnMut(i32, i32, i32),
{
    let height = (v1.y - v0.y) as f32;
    let inv_slope_1 = (v1.x - v0.x) as f32 / height;
    let inv_slope_2 = (v2.x - v0.x) as f32 / height;

    for y in y_start..=y_end {
        let dy = (y - v0.y) as f32;
        emit(
            y,
            v0.x as f32 + inv_slope_1 * dy,
            v0.x as f32 + inv_slope_2 * dy,
            span,
        );
    }
}

/// Flat edge `v0`-`v1` above the apex `v2`. Rows `y_start..=y_end`.
fn fill_flat_top<F>(v0: Point, v1: Point, v2: Point, y_start: i32, y_end: i32, span: &mut F)
where
    F: FnMut(i32, i32, i32),
{
    let height = (v2.y - v0.y) as f32;
    let inv_slope_1 = (v2.x - v0.x) as f32 / height;
    let inv_slope_2 = (v2.x - v1.x) as f32 / height;

    for y in y_start..=y_end {
        let dy = (y - v0.y) as f32;
        emit(
            y,
            v0.x as f32 + inv_slope_1 * dy,
            v1.x as f32 + inv_slope_2 * dy,
            span,
        );
    }
}

/// Upper half of a split triangle, including the split row.
fn fill_flat_bottom_split<F>(v0: Point, v1: Point, split: (f32, i32), span: &mut F)
where
    F: FnMut(i32, i32, i32),
{
    let height = (v1.y - v0.y) as f32;
    let inv_slope_1 = (v1.x - v0.x) as f32 / height;
    let inv_slope_2 = (split.0 - v0.x as f32) / height;

    for y in v0.y..=v1.y {
        let dy = (y - v0.y) as f32;
        emit(
            y,
            v0.x as f32 + inv_slope_1 * dy,
            v0.x as f32 + inv_slope_2 * dy,
            span,
        );
    }
}

/// Lower half of a split triangle, excluding the split row.
fn fill_flat_top_split<F>(v1: Point, split: (f32, i32), v2: Point, span: &mut F)
where
    F: FnMut(i32, i32, i32),
{
    let height = (v2.y - v1.y) as f32;
    let inv_slope_1 = (v2.x - v1.x) as f32 / height;
    let inv_slope_2 = (v2.x as f32 - split.0) / height;

    for y in (v1.y + 1)..=v2.y {
        let dy = (y - v1.y) as f32;
        emit(
            y,
            v1.x as f32 + inv_slope_1 * dy,
            split.0 + inv_slope_2 * dy,
            span,
        );
    }
}
