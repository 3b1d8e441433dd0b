//! Geometric utility functions for sprite hulls and rectangle overlap.

use geo::{BoundingRect, Coord, Rect, Rotate};

/// Builds the rectangle covering a sprite placed with its top-left corner at `(x, y)`.
pub fn sprite_rect(x: f32, y: f32, width: f32, height: f32) -> Rect<f32> {
    Rect::new(
        Coord { x, y },
        Coord {
            x: x + width,
            y: y + height,
        },
    )
}

/// Axis-aligned hull of a rectangle rotated about its centre.
///
/// `degrees` follows sprite convention: positive tilts the nose up, which is
/// counter-clockwise on a y-down screen.
///
/// # Arguments
///
/// * `rect` - Unrotated sprite rectangle
/// * `degrees` - Rotation angle in degrees
///
/// # Returns
///
/// The smallest axis-aligned rectangle containing the rotated sprite.
pub fn rotated_hull(rect: Rect<f32>, degrees: f32) -> Rect<f32> {
    if degrees == 0.0 {
        return rect;
    }
    // geo rotates counter-clockwise in y-up space, so flip the sign for screen space.
    rect.to_polygon()
        .rotate_around_center(-degrees)
        .bounding_rect()
        .unwrap_or(rect)
}

/// Strict rectangle intersection: rectangles that only share an edge do not overlap.
pub fn rects_overlap(a: &Rect<f32>, b: &Rect<f32>) -> bool {
    a.min().x < b.max().x && b.min().x < a.max().x && a.min().y < b.max().y && b.min().y < a.max().y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = sprite_rect(0.0, 0.0, 10.0, 10.0);
        let b = sprite_rect(10.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(&a, &b));
        let c = sprite_rect(9.5, 9.5, 10.0, 10.0);
        assert!(rects_overlap(&a, &c));
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let hull = rotated_hull(sprite_rect(0.0, 0.0, 40.0, 20.0), 90.0);
        assert!((hull.width() - 20.0).abs() < 1e-3);
        assert!((hull.height() - 40.0).abs() < 1e-3);
        assert!((hull.center().x - 20.0).abs() < 1e-3);
        assert!((hull.center().y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn tilted_hull_contains_sprite_centre_and_grows() {
        let rect = sprite_rect(230.0, 350.0, 68.0, 48.0);
        let hull = rotated_hull(rect, 25.0);
        assert!(hull.width() > 68.0 - 1e-3);
        assert!(hull.height() > 48.0);
        assert!((hull.center().y - rect.center().y).abs() < 1e-3);
    }
}
