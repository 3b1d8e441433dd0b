//! Flyer-vs-obstacle and flyer-vs-boundary tests.
//!
//! Two shape models are available and one is applied to every pair in an
//! episode:
//!
//! - [`CollisionModel::BoundingBox`]: the flyer sprite rotated by its tilt,
//!   reduced to an axis-aligned hull and intersected with the pipe rectangles.
//! - [`CollisionModel::PixelMask`]: a rasterized silhouette (an ellipse
//!   inscribed in the sprite) rotated by the tilt and compared bit by bit
//!   against solid pipe masks, at integer offsets with the flyer's `y` rounded.
//!
//! Rotated silhouettes are cached per whole-degree tilt bucket, which is
//! enough because tilt moves in fixed steps.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::flyer::Flyer;
use super::geometric_utils::rects_overlap;
use super::obstacle::Obstacle;
use super::params::Params;

/// Shape model used for intersection tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionModel {
    /// Axis-aligned hull of the rotated sprite rectangle.
    BoundingBox,
    /// Per-pixel silhouette masks from a headless rasterizer.
    PixelMask,
}

/// A 1-bit occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Creates a mask with every bit set.
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    /// Rasterizes an ellipse inscribed in a `width × height` sprite, rotated by
    /// `degrees` (positive is counter-clockwise on screen).
    ///
    /// The mask grows to the rotated extents, like a rotated sprite surface,
    /// and keeps the silhouette centred.
    pub fn rotated_ellipse(width: f32, height: f32, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let out_w = (width * cos.abs() + height * sin.abs()).ceil().max(1.0) as usize;
        let out_h = (width * sin.abs() + height * cos.abs()).ceil().max(1.0) as usize;

        let semi_x = width / 2.0;
        let semi_y = height / 2.0;
        let mut bits = vec![false; out_w * out_h];

        for py in 0..out_h {
            for px in 0..out_w {
                let dx = px as f32 + 0.5 - out_w as f32 / 2.0;
                let dy = py as f32 + 0.5 - out_h as f32 / 2.0;
                // back into unrotated sprite space
                let sx = dx * cos - dy * sin;
                let sy = dx * sin + dy * cos;
                if (sx / semi_x).powi(2) + (sy / semi_y).powi(2) <= 1.0 {
                    bits[py * out_w + px] = true;
                }
            }
        }

        Self {
            width: out_w,
            height: out_h,
            bits,
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads one bit; out-of-range coordinates are empty.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Checks whether `other`, placed at `offset` relative to this mask's
    /// origin, shares at least one set bit with this mask.
    pub fn overlaps(&self, other: &Mask, offset: (i64, i64)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i64).min(self.width as i64);
        let y1 = (oy + other.height as i64).min(self.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Rotated flyer silhouette placed in world space.
#[derive(Debug, Clone)]
pub struct PlacedMask {
    /// Integer world position of the mask's top-left pixel.
    pub origin: (i64, i64),
    /// The silhouette bits.
    pub mask: Arc<Mask>,
}

/// Cache of rasterized silhouettes keyed by whole-degree tilt.
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    flyer_masks: HashMap<i32, Arc<Mask>>,
    pipe_mask: Option<Arc<Mask>>,
}

impl SpriteAtlas {
    /// Returns the flyer silhouette for a tilt, rasterizing it on first use.
    pub fn flyer_mask(&mut self, tilt: f32, params: &Params) -> Arc<Mask> {
        let bucket = tilt.round() as i32;
        Arc::clone(self.flyer_masks.entry(bucket).or_insert_with(|| {
            Arc::new(Mask::rotated_ellipse(
                params.flyer_width,
                params.flyer_height,
                bucket as f32,
            ))
        }))
    }

    /// Returns the solid mask shared by both pipe pieces.
    pub fn pipe_mask(&mut self, params: &Params) -> Arc<Mask> {
        Arc::clone(self.pipe_mask.get_or_insert_with(|| {
            Arc::new(Mask::solid(
                params.pipe_width.round() as usize,
                params.pipe_height.round() as usize,
            ))
        }))
    }

    /// Number of cached tilt buckets.
    pub fn cached_tilts(&self) -> usize {
        self.flyer_masks.len()
    }
}

/// Runs intersection tests under one collision model.
#[derive(Debug, Clone)]
pub struct CollisionEngine {
    model: CollisionModel,
    atlas: SpriteAtlas,
}

impl CollisionEngine {
    /// Creates an engine for the given model.
    pub fn new(model: CollisionModel) -> Self {
        Self {
            model,
            atlas: SpriteAtlas::default(),
        }
    }

    /// The model this engine applies.
    pub fn model(&self) -> CollisionModel {
        self.model
    }

    /// The silhouette cache, populated only under [`CollisionModel::PixelMask`].
    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    /// Places the flyer's rotated silhouette in world space.
    ///
    /// The silhouette stays centred on the unrotated sprite, and `y` is rounded
    /// to the pixel grid.
    pub fn flyer_mask(&mut self, flyer: &Flyer, params: &Params) -> PlacedMask {
        let mask = self.atlas.flyer_mask(flyer.tilt, params);
        let centre_x = flyer.x + params.flyer_width / 2.0;
        let centre_y = flyer.y.round() + params.flyer_height / 2.0;
        let origin = (
            (centre_x - mask.width() as f32 / 2.0).round() as i64,
            (centre_y - mask.height() as f32 / 2.0).round() as i64,
        );
        PlacedMask { origin, mask }
    }

    /// Checks whether the flyer touches either pipe piece of the obstacle.
    pub fn flyer_hits_obstacle(
        &mut self,
        flyer: &Flyer,
        obstacle: &Obstacle,
        params: &Params,
    ) -> bool {
        match self.model {
            CollisionModel::BoundingBox => {
                let hull = flyer.bounding_shape(params);
                rects_overlap(&hull, &obstacle.top_rect(params))
                    || rects_overlap(&hull, &obstacle.bottom_rect(params))
            }
            CollisionModel::PixelMask => {
                let placed = self.flyer_mask(flyer, params);
                let pipe = self.atlas.pipe_mask(params);
                let (fx, fy) = placed.origin;
                let pipe_x = obstacle.x.round() as i64;

                [obstacle.top, obstacle.bot].into_iter().any(|piece_y| {
                    let offset = (pipe_x - fx, piece_y.round() as i64 - fy);
                    placed.mask.overlaps(&pipe, offset)
                })
            }
        }
    }

    /// Checks whether the flyer has hit the floor or left the top of the world.
    pub fn flyer_out_of_bounds(&self, flyer: &Flyer, params: &Params) -> bool {
        flyer.is_out_of_bounds(params.floor_y, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_overlap_respects_offsets() {
        let a = Mask::solid(4, 4);
        let b = Mask::solid(2, 2);
        assert!(a.overlaps(&b, (3, 3)));
        assert!(!a.overlaps(&b, (4, 0)));
        assert!(!a.overlaps(&b, (-2, 0)));
        assert!(a.overlaps(&b, (-1, -1)));
    }

    #[test]
    fn ellipse_fills_less_than_its_box() {
        let mask = Mask::rotated_ellipse(68.0, 48.0, 0.0);
        assert_eq!((mask.width(), mask.height()), (68, 48));
        let area = mask.count() as f32;
        let expected = std::f32::consts::PI * 34.0 * 24.0;
        assert!((area - expected).abs() / expected < 0.05);
        assert!(!mask.get(0, 0));
        assert!(mask.get(34, 24));
    }

    #[test]
    fn rotation_preserves_area() {
        let flat = Mask::rotated_ellipse(68.0, 48.0, 0.0).count() as f32;
        let tilted = Mask::rotated_ellipse(68.0, 48.0, 25.0).count() as f32;
        assert!((flat - tilted).abs() / flat < 0.05);
    }

    #[test]
    fn atlas_caches_per_tilt_bucket() {
        let params = Params::default();
        let mut atlas = SpriteAtlas::default();
        let a = atlas.flyer_mask(20.0, &params);
        let b = atlas.flyer_mask(20.2, &params);
        assert!(Arc::ptr_eq(&a, &b));
        atlas.flyer_mask(-90.0, &params);
        assert_eq!(atlas.cached_tilts(), 2);
    }

    #[test]
    fn mask_corner_gap_is_collision_free() {
        // The ellipse leaves the sprite corners empty, so a pipe corner
        // grazing the bounding box corner only collides under the box model.
        let params = Params::default();
        let flyer = Flyer::new(100.0, 300.0, &params);
        let obstacle = Obstacle::with_gap(100.0 + params.flyer_width - 3.0, 303, &params);

        let mut boxes = CollisionEngine::new(CollisionModel::BoundingBox);
        let mut masks = CollisionEngine::new(CollisionModel::PixelMask);
        assert!(boxes.flyer_hits_obstacle(&flyer, &obstacle, &params));
        assert!(!masks.flyer_hits_obstacle(&flyer, &obstacle, &params));
    }
}
