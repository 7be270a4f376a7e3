//! Antialiased raster primitives over an RGBA image buffer
//!
//! The `image` crate provides buffers, resampling, and blur but no vector
//! drawing, so the handful of shapes the icon needs are rasterized per pixel:
//! coverage is derived from a signed distance (or a supersampled inside test
//! for polygons) and blended with the source-over operator. Every primitive
//! only visits its clipped bounding box.

use image::{Rgba, RgbaImage};

/// Linearly interpolates between two RGB colors, `t` in [0, 1].
pub fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
    ]
}

/// Composites `color` over the pixel at (x, y), scaling its alpha by
/// `coverage` in [0, 1]. Straight (non-premultiplied) alpha throughout.
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
    let sa = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let sc = color[c] as f32;
        let dc = dst[c] as f32;
        dst[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Signed distance from a point to the boundary of a rounded rectangle
/// spanning `bounds = [x0, y0, x1, y1]` with the given corner radius.
/// Negative inside the shape.
pub fn rounded_rect_distance(px: f32, py: f32, bounds: [f32; 4], radius: f32) -> f32 {
    let [x0, y0, x1, y1] = bounds;
    let cx = (x0 + x1) * 0.5;
    let cy = (y0 + y1) * 0.5;
    let hw = (x1 - x0) * 0.5 - radius;
    let hh = (y1 - y0) * 0.5 - radius;
    let qx = (px - cx).abs() - hw;
    let qy = (py - cy).abs() - hh;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// Antialiased fill coverage for a rounded rectangle at a pixel center,
/// with a ~1px feathered edge.
pub fn rounded_rect_coverage(px: f32, py: f32, bounds: [f32; 4], radius: f32) -> f32 {
    (0.5 - rounded_rect_distance(px, py, bounds, radius)).clamp(0.0, 1.0)
}

/// Fills a rounded rectangle.
pub fn fill_rounded_rect(img: &mut RgbaImage, bounds: [f32; 4], radius: f32, color: Rgba<u8>) {
    let (x0, y0, x1, y1) = clip_box(img, bounds[0], bounds[1], bounds[2], bounds[3], 1.0);
    for y in y0..y1 {
        for x in x0..x1 {
            let coverage = rounded_rect_coverage(x as f32 + 0.5, y as f32 + 0.5, bounds, radius);
            blend_pixel(img, x, y, color, coverage);
        }
    }
}

/// Strokes the outline of a rounded rectangle, centered on its boundary.
pub fn stroke_rounded_rect(
    img: &mut RgbaImage,
    bounds: [f32; 4],
    radius: f32,
    width: f32,
    color: Rgba<u8>,
) {
    let pad = width * 0.5 + 1.0;
    let (x0, y0, x1, y1) = clip_box(img, bounds[0], bounds[1], bounds[2], bounds[3], pad);
    for y in y0..y1 {
        for x in x0..x1 {
            let d = rounded_rect_distance(x as f32 + 0.5, y as f32 + 0.5, bounds, radius);
            let coverage = (width * 0.5 + 0.5 - d.abs()).clamp(0.0, 1.0);
            blend_pixel(img, x, y, color, coverage);
        }
    }
}

/// Fills a triangle with 2x2 supersampled edge antialiasing.
pub fn fill_triangle(
    img: &mut RgbaImage,
    a: (f32, f32),
    b: (f32, f32),
    c: (f32, f32),
    color: Rgba<u8>,
) {
    let min_x = a.0.min(b.0).min(c.0);
    let min_y = a.1.min(b.1).min(c.1);
    let max_x = a.0.max(b.0).max(c.0);
    let max_y = a.1.max(b.1).max(c.1);
    let (x0, y0, x1, y1) = clip_box(img, min_x, min_y, max_x, max_y, 1.0);

    const SAMPLES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
    for y in y0..y1 {
        for x in x0..x1 {
            let mut hits = 0u8;
            for (ox, oy) in SAMPLES {
                if point_in_triangle(x as f32 + ox, y as f32 + oy, a, b, c) {
                    hits += 1;
                }
            }
            if hits > 0 {
                blend_pixel(img, x, y, color, hits as f32 / SAMPLES.len() as f32);
            }
        }
    }
}

/// Strokes a circular arc. Angles are in degrees, measured clockwise from
/// 3 o'clock in y-down raster coordinates; the sweep runs from `start_deg`
/// to `end_deg` with modular wraparound, so 200°..160° passes through 0°.
pub fn stroke_arc(
    img: &mut RgbaImage,
    center: (f32, f32),
    radius: f32,
    start_deg: f32,
    end_deg: f32,
    width: f32,
    color: Rgba<u8>,
) {
    let pad = width * 0.5 + 1.0;
    let (x0, y0, x1, y1) = clip_box(
        img,
        center.0 - radius,
        center.1 - radius,
        center.0 + radius,
        center.1 + radius,
        pad,
    );
    let mut sweep = (end_deg - start_deg).rem_euclid(360.0);
    if sweep == 0.0 && end_deg != start_deg {
        sweep = 360.0;
    }
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - center.0;
            let dy = y as f32 + 0.5 - center.1;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (width * 0.5 + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let theta = dy.atan2(dx).to_degrees().rem_euclid(360.0);
            if (theta - start_deg).rem_euclid(360.0) <= sweep {
                blend_pixel(img, x, y, color, coverage);
            }
        }
    }
}

/// Strokes a line segment with round caps.
pub fn stroke_line(
    img: &mut RgbaImage,
    a: (f32, f32),
    b: (f32, f32),
    width: f32,
    color: Rgba<u8>,
) {
    let pad = width * 0.5 + 1.0;
    let (x0, y0, x1, y1) = clip_box(
        img,
        a.0.min(b.0),
        a.1.min(b.1),
        a.0.max(b.0),
        a.1.max(b.1),
        pad,
    );
    let vx = b.0 - a.0;
    let vy = b.1 - a.1;
    let len_sq = vx * vx + vy * vy;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5 - a.0;
            let py = y as f32 + 0.5 - a.1;
            let t = if len_sq > 0.0 {
                ((px * vx + py * vy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dx = px - t * vx;
            let dy = py - t * vy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (width * 0.5 + 0.5 - d).clamp(0.0, 1.0);
            blend_pixel(img, x, y, color, coverage);
        }
    }
}

// Clamps a padded fractional bounding box to the image's pixel grid.
fn clip_box(img: &RgbaImage, x0: f32, y0: f32, x1: f32, y1: f32, pad: f32) -> (u32, u32, u32, u32) {
    let w = img.width() as f32;
    let h = img.height() as f32;
    (
        (x0 - pad).floor().clamp(0.0, w) as u32,
        (y0 - pad).floor().clamp(0.0, h) as u32,
        (x1 + pad).ceil().clamp(0.0, w) as u32,
        (y1 + pad).ceil().clamp(0.0, h) as u32,
    )
}

fn point_in_triangle(px: f32, py: f32, a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> bool {
    let c1 = cross(b.0 - a.0, b.1 - a.1, px - a.0, py - a.1);
    let c2 = cross(c.0 - b.0, c.1 - b.1, px - b.0, py - b.1);
    let c3 = cross(a.0 - c.0, a.1 - c.1, px - c.0, py - c.1);
    let has_neg = (c1 < 0.0) || (c2 < 0.0) || (c3 < 0.0);
    let has_pos = (c1 > 0.0) || (c2 > 0.0) || (c3 > 0.0);
    !(has_neg && has_pos)
}

#[inline]
fn cross(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ax * by - ay * bx
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_lerp_rgb_endpoints() {
        let a = [29, 56, 140];
        let b = [89, 44, 180];
        assert_eq!(lerp_rgb(a, b, 0.0), a);
        assert_eq!(lerp_rgb(a, b, 1.0), b);
        let mid = lerp_rgb(a, b, 0.5);
        assert_eq!(mid, [59, 50, 160]);
    }

    #[test]
    fn test_blend_pixel_opaque_over() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]));
        blend_pixel(&mut img, 0, 0, WHITE, 1.0);
        assert_eq!(*img.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_blend_pixel_half_coverage() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        blend_pixel(&mut img, 0, 0, WHITE, 0.5);
        let px = img.get_pixel(0, 0);
        assert_eq!(px[3], 255);
        assert!((px[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_blend_pixel_onto_transparent() {
        let mut img = RgbaImage::new(1, 1);
        blend_pixel(&mut img, 0, 0, Rgba([22, 212, 255, 214]), 1.0);
        let px = img.get_pixel(0, 0);
        assert_eq!(px[3], 214);
        assert_eq!(px[0], 22);
        assert_eq!(px[1], 212);
        assert_eq!(px[2], 255);
    }

    #[test]
    fn test_rounded_rect_distance_signs() {
        let bounds = [0.0, 0.0, 100.0, 100.0];
        // well inside
        assert!(rounded_rect_distance(50.0, 50.0, bounds, 20.0) < 0.0);
        // exact corner lies outside the rounded corner
        assert!(rounded_rect_distance(0.5, 0.5, bounds, 20.0) > 0.0);
        // edge midpoint sits on the boundary
        let d = rounded_rect_distance(50.0, 0.0, bounds, 20.0);
        assert!(d.abs() < 0.01);
    }

    #[test]
    fn test_fill_rounded_rect_center_and_corner() {
        let mut img = RgbaImage::new(64, 64);
        fill_rounded_rect(&mut img, [8.0, 8.0, 56.0, 56.0], 10.0, WHITE);
        assert_eq!(img.get_pixel(32, 32)[3], 255);
        // the square corner of the bounds is clipped by the corner radius
        assert_eq!(img.get_pixel(8, 8)[3], 0);
        // outside the bounds entirely
        assert_eq!(img.get_pixel(2, 32)[3], 0);
    }

    #[test]
    fn test_stroke_rounded_rect_hits_edge_not_center() {
        let mut img = RgbaImage::new(64, 64);
        stroke_rounded_rect(&mut img, [4.0, 4.0, 60.0, 60.0], 8.0, 4.0, WHITE);
        // on the left edge midway down
        assert!(img.get_pixel(4, 32)[3] > 0);
        // interior stays untouched
        assert_eq!(img.get_pixel(32, 32)[3], 0);
    }

    #[test]
    fn test_fill_triangle_inside_outside() {
        let mut img = RgbaImage::new(64, 64);
        fill_triangle(&mut img, (10.0, 10.0), (50.0, 10.0), (30.0, 50.0), WHITE);
        assert_eq!(img.get_pixel(30, 20)[3], 255);
        assert_eq!(img.get_pixel(5, 5)[3], 0);
        assert_eq!(img.get_pixel(60, 60)[3], 0);
    }

    #[test]
    fn test_stroke_arc_respects_sweep() {
        let mut img = RgbaImage::new(100, 100);
        // 200°..160° wraps through 0°: the 3 o'clock point is drawn,
        // the 9 o'clock point falls in the 40° gap
        stroke_arc(&mut img, (50.0, 50.0), 20.0, 200.0, 160.0, 6.0, WHITE);
        assert!(img.get_pixel(70, 50)[3] > 0);
        assert_eq!(img.get_pixel(30, 50)[3], 0);
    }

    #[test]
    fn test_stroke_arc_ring_only() {
        let mut img = RgbaImage::new(100, 100);
        stroke_arc(&mut img, (50.0, 50.0), 20.0, 0.0, 360.0, 4.0, WHITE);
        // center is far from the ring
        assert_eq!(img.get_pixel(50, 50)[3], 0);
        // directly below the center on the ring
        assert!(img.get_pixel(50, 70)[3] > 0);
    }

    #[test]
    fn test_stroke_line_on_and_off_segment() {
        let mut img = RgbaImage::new(64, 64);
        stroke_line(&mut img, (10.0, 32.0), (54.0, 32.0), 3.0, WHITE);
        assert!(img.get_pixel(32, 32)[3] > 0);
        assert_eq!(img.get_pixel(32, 10)[3], 0);
    }
}
