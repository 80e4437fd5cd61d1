//! Overlay rendering: frame plus landmark sets onto a shared draw surface.
//!
//! The renderer is a pure transform. It always clears and fully redraws the
//! surface (no incremental diffing), so a prior frame can never leave stale
//! artifacts. Draw order is a contract, back to front: base frame image,
//! pose skeleton, left-hand skeleton, right-hand skeleton, face mesh last
//! with reduced stroke weight so hands stay visible above the mesh.

use crate::capture::VideoFrame;
use crate::defaults;
use crate::error::{Result, WeSignError};
use crate::landmarks::{
    FACE_CONTOURS, HAND_CONNECTIONS, LandmarkSet, LandmarkSets, POSE_CONNECTIONS,
    POSE_KEY_LANDMARKS,
};
use image::{Rgb, RgbImage};

/// Single shared, single-buffered render target.
///
/// Written once per frame by [`OverlayRenderer::render`] and read by the
/// inference dispatcher. Callers serialize access through a mutex; the
/// surface itself holds no locking.
#[derive(Debug, Clone)]
pub struct DrawSurface {
    image: RgbImage,
}

impl DrawSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgb([0, 0, 0]);
        }
    }

    /// Raw RGB bytes of the surface, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Export the surface as a compressed JPEG.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        encoder
            .encode(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| WeSignError::ImageEncode {
                message: e.to_string(),
            })?;
        Ok(buf)
    }

    fn put_px(&mut self, x: i64, y: i64, color: [u8; 3]) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if x >= 0 && x < w && y >= 0 && y < h {
            self.image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    fn blend_px(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if x < 0 || x >= w || y < 0 || y >= h {
            return;
        }
        let dst = self.image.get_pixel(x as u32, y as u32).0;
        let mix = |d: u8, s: u8| -> u8 {
            (d as f32 * (1.0 - alpha) + s as f32 * alpha).round().clamp(0.0, 255.0) as u8
        };
        self.image.put_pixel(
            x as u32,
            y as u32,
            Rgb([mix(dst[0], color[0]), mix(dst[1], color[1]), mix(dst[2], color[2])]),
        );
    }

    /// Plot a filled disc. Radius 0 degenerates to a single pixel.
    fn draw_disc(&mut self, cx: i64, cy: i64, radius: i64, color: [u8; 3]) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put_px(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line with a square brush of the given stroke width.
    fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, stroke: u32, color: [u8; 3]) {
        let brush = (stroke as i64 / 2).max(0);
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if brush == 0 {
                self.put_px(x, y, color);
            } else {
                self.draw_disc(x, y, brush, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Single-pixel line alpha-blended onto the surface.
    fn blend_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3], alpha: f32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_px(x, y, color, alpha);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Draws a frame plus its landmark sets onto a [`DrawSurface`].
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame. Identical `(frame, sets)` inputs produce
    /// identical surface content.
    pub fn render(&self, frame: &VideoFrame, sets: &LandmarkSets, surface: &mut DrawSurface) {
        surface.clear();
        self.blit_frame(frame, surface);

        if let Some(pose) = &sets.pose {
            self.draw_skeleton(
                pose,
                &POSE_CONNECTIONS,
                defaults::POSE_CONNECTOR_COLOR,
                surface,
            );
            self.draw_joints(
                pose,
                &POSE_KEY_LANDMARKS,
                defaults::POSE_JOINT_RADIUS,
                defaults::POSE_JOINT_COLOR,
                surface,
            );
        }

        if let Some(hand) = &sets.left_hand {
            self.draw_skeleton(
                hand,
                &HAND_CONNECTIONS,
                defaults::LEFT_HAND_CONNECTOR_COLOR,
                surface,
            );
            self.draw_all_joints(
                hand,
                defaults::HAND_JOINT_RADIUS,
                defaults::LEFT_HAND_JOINT_COLOR,
                surface,
            );
        }

        if let Some(hand) = &sets.right_hand {
            self.draw_skeleton(
                hand,
                &HAND_CONNECTIONS,
                defaults::RIGHT_HAND_CONNECTOR_COLOR,
                surface,
            );
            self.draw_all_joints(
                hand,
                defaults::HAND_JOINT_RADIUS,
                defaults::RIGHT_HAND_JOINT_COLOR,
                surface,
            );
        }

        // Face mesh goes last, thin and blended, so it never dominates
        // the hand or pose overlays.
        if let Some(face) = &sets.face {
            self.draw_face_contours(face, surface);
        }
    }

    /// Copy the frame onto the surface, nearest-neighbor scaled when the
    /// geometries differ.
    fn blit_frame(&self, frame: &VideoFrame, surface: &mut DrawSurface) {
        let (sw, sh) = (surface.width(), surface.height());
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        for y in 0..sh {
            let fy = (y as u64 * frame.height as u64 / sh as u64) as u32;
            for x in 0..sw {
                let fx = (x as u64 * frame.width as u64 / sw as u64) as u32;
                let idx = ((fy * frame.width + fx) * 3) as usize;
                let px = [
                    frame.pixels[idx],
                    frame.pixels[idx + 1],
                    frame.pixels[idx + 2],
                ];
                surface.image.put_pixel(x, y, Rgb(px));
            }
        }
    }

    fn to_pixel(&self, lm: &crate::landmarks::Landmark, surface: &DrawSurface) -> (i64, i64) {
        let x = (lm.x * surface.width() as f32).round() as i64;
        let y = (lm.y * surface.height() as f32).round() as i64;
        (x, y)
    }

    fn draw_skeleton(
        &self,
        set: &LandmarkSet,
        connections: &[(usize, usize)],
        color: [u8; 3],
        surface: &mut DrawSurface,
    ) {
        for &(a, b) in connections {
            let (Some(la), Some(lb)) = (set.get(a), set.get(b)) else {
                continue;
            };
            let (x0, y0) = self.to_pixel(la, surface);
            let (x1, y1) = self.to_pixel(lb, surface);
            surface.draw_line(x0, y0, x1, y1, defaults::SKELETON_STROKE, color);
        }
    }

    fn draw_joints(
        &self,
        set: &LandmarkSet,
        indices: &[usize],
        radius: u32,
        color: [u8; 3],
        surface: &mut DrawSurface,
    ) {
        for &idx in indices {
            let Some(lm) = set.get(idx) else { continue };
            let (x, y) = self.to_pixel(lm, surface);
            surface.draw_disc(x, y, radius as i64, color);
        }
    }

    fn draw_all_joints(
        &self,
        set: &LandmarkSet,
        radius: u32,
        color: [u8; 3],
        surface: &mut DrawSurface,
    ) {
        for lm in set {
            let (x, y) = self.to_pixel(lm, surface);
            surface.draw_disc(x, y, radius as i64, color);
        }
    }

    fn draw_face_contours(&self, face: &LandmarkSet, surface: &mut DrawSurface) {
        for ring in FACE_CONTOURS {
            for i in 0..ring.len() {
                let a = ring[i];
                let b = ring[(i + 1) % ring.len()];
                let (Some(la), Some(lb)) = (face.get(a), face.get(b)) else {
                    continue;
                };
                let (x0, y0) = self.to_pixel(la, surface);
                let (x1, y1) = self.to_pixel(lb, surface);
                surface.blend_line(
                    x0,
                    y0,
                    x1,
                    y1,
                    defaults::FACE_MESH_COLOR,
                    defaults::FACE_MESH_ALPHA,
                );
            }
        }
    }
}
