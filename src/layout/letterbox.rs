use crate::foundation::core::{Affine, Canvas, NormPoint, Point, Rect};
use crate::foundation::error::{PoppetError, PoppetResult};

/// Aspect-preserving, centered fit of an image into a canvas.
///
/// This is the single mapping between canvas pixels, normalized image coordinates and backing
/// buffer pixels. It must be recomputed whenever the canvas or the backing image changes size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    canvas: Canvas,
    image_width: u32,
    image_height: u32,
    offset_x: f64,
    offset_y: f64,
    drawn_width: f64,
    drawn_height: f64,
}

impl Letterbox {
    /// Fit an `image_width x image_height` image into `canvas`.
    ///
    /// A relatively wider canvas fits the image to its height and centers it horizontally;
    /// otherwise the image is fitted to the width and centered vertically.
    pub fn fit(canvas: Canvas, image_width: u32, image_height: u32) -> PoppetResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(PoppetError::validation("letterbox image must be non-empty"));
        }
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let image_ratio = f64::from(image_width) / f64::from(image_height);

        let (drawn_width, drawn_height, offset_x, offset_y) = if canvas.aspect() > image_ratio {
            let h = ch;
            let w = h * image_ratio;
            (w, h, (cw - w) / 2.0, 0.0)
        } else {
            let w = cw;
            let h = w / image_ratio;
            (w, h, 0.0, (ch - h) / 2.0)
        };

        Ok(Self {
            canvas,
            image_width,
            image_height,
            offset_x,
            offset_y,
            drawn_width,
            drawn_height,
        })
    }

    /// Canvas this fit was computed for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Backing image dimensions this fit was computed for.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Rectangle the image occupies on the canvas.
    pub fn drawn_rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.drawn_width,
            self.offset_y + self.drawn_height,
        )
    }

    /// Shorter side of the drawn image; normalized radii and sizes scale by this.
    pub fn min_side(&self) -> f64 {
        self.drawn_width.min(self.drawn_height)
    }

    /// Map a canvas-space pointer to normalized image coordinates.
    ///
    /// Returns `None` when the pointer lies outside the drawn image (edges are inclusive).
    pub fn to_normalized(&self, pointer: Point) -> Option<NormPoint> {
        let r = self.drawn_rect();
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return None;
        }
        if pointer.x < r.x0 || pointer.x > r.x1 || pointer.y < r.y0 || pointer.y > r.y1 {
            return None;
        }
        Some(NormPoint::new(
            (pointer.x - self.offset_x) / self.drawn_width,
            (pointer.y - self.offset_y) / self.drawn_height,
        ))
    }

    /// Whether a canvas-space pointer lies on the drawn image (edges inclusive).
    pub fn contains(&self, pointer: Point) -> bool {
        self.to_normalized(pointer).is_some()
    }

    /// Map normalized image coordinates to canvas pixels.
    pub fn to_canvas(&self, p: NormPoint) -> Point {
        Point::new(
            self.offset_x + p.x * self.drawn_width,
            self.offset_y + p.y * self.drawn_height,
        )
    }

    /// Map normalized image coordinates to backing-buffer pixels.
    pub fn to_buffer(&self, p: NormPoint) -> Point {
        Point::new(
            p.x * f64::from(self.image_width),
            p.y * f64::from(self.image_height),
        )
    }

    /// Transform placing the backing image (in its own pixel space) onto the canvas.
    pub fn image_transform(&self) -> Affine {
        Affine::translate((self.offset_x, self.offset_y))
            * Affine::scale_non_uniform(
                self.drawn_width / f64::from(self.image_width),
                self.drawn_height / f64::from(self.image_height),
            )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/letterbox.rs"]
mod tests;
