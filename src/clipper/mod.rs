//! Clipping stages of the pipeline.
//!
//! - [`near`]: camera space, before projection. Drops or shortens geometry
//!   behind the viewer and culls back faces.
//! - [`viewport`]: screen space, after projection. Fits line segments to the
//!   raster and coarsely rejects patches that lie entirely off-screen.

pub mod near;
pub mod viewport;

pub use near::NearClipper;
pub use viewport::{patch_outside, ViewportClip};
