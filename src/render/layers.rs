use kurbo::{Cap, Join, Shape, Stroke, StrokeOpts};

use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::render::blend::BlendMode;
use crate::render::paint::Paint;

/// Flattening tolerance for curves, in canvas pixels.
pub const PATH_TOLERANCE: f64 = 0.1;

/// One draw operation: fill `shape` with `paint` using `blend`, scaled by `alpha`.
///
/// An entity renders as an ordered list of these.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Fill region in canvas pixels (non-zero winding).
    pub shape: BezPath,
    pub paint: Paint,
    pub blend: BlendMode,
    /// Global alpha in `[0, 1]`.
    pub alpha: f32,
}

impl Layer {
    pub fn new(shape: impl Shape, paint: Paint, blend: BlendMode) -> Self {
        Self {
            shape: shape.to_path(PATH_TOLERANCE),
            paint,
            blend,
            alpha: 1.0,
        }
    }

    pub fn solid(shape: impl Shape, color: Rgba8) -> Self {
        Self::new(shape, Paint::Solid(color), BlendMode::Normal)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn transformed(mut self, t: Affine) -> Self {
        self.shape.apply_affine(t);
        self
    }
}

/// Outline of `path` stroked at `width`, as a fillable path.
pub fn stroke_outline(path: &BezPath, width: f64, cap: Cap) -> BezPath {
    let style = Stroke::new(width).with_caps(cap).with_join(Join::Miter);
    kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), PATH_TOLERANCE)
}

/// Open polyline through `points`.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        p.move_to(*first);
        for pt in rest {
            p.line_to(*pt);
        }
    }
    p
}

/// A `vello_cpu` render context kept between draws and rebuilt only when the size changes.
pub(crate) struct ContextCache {
    ctx: Option<vello_cpu::RenderContext>,
}

impl ContextCache {
    pub(crate) fn new() -> Self {
        Self { ctx: None }
    }

    pub(crate) fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> PoppetResult<R>,
    ) -> PoppetResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

/// Rasterizes layer coverage with `vello_cpu` and composites shaded pixels in software.
pub(crate) struct LayerRasterizer {
    masks: ContextCache,
}

impl LayerRasterizer {
    pub(crate) fn new() -> Self {
        Self {
            masks: ContextCache::new(),
        }
    }

    /// Composite `layer` into a premultiplied RGBA8 frame of `width x height`.
    ///
    /// Layers with an empty or non-finite footprint are skipped.
    pub(crate) fn draw(
        &mut self,
        frame: &mut [u8],
        width: u32,
        height: u32,
        layer: &Layer,
    ) -> PoppetResult<()> {
        if layer.alpha <= 0.0 {
            return Ok(());
        }
        if !path_is_finite(&layer.shape) {
            return Ok(());
        }
        let bbox = layer.shape.bounding_box();
        let x0 = bbox.x0.floor().max(0.0);
        let y0 = bbox.y0.floor().max(0.0);
        let x1 = bbox.x1.ceil().min(f64::from(width));
        let y1 = bbox.y1.ceil().min(f64::from(height));
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let bw = u16::try_from((x1 - x0) as u32)
            .map_err(|_| PoppetError::render("layer footprint exceeds u16"))?;
        let bh = u16::try_from((y1 - y0) as u32)
            .map_err(|_| PoppetError::render("layer footprint exceeds u16"))?;

        let mut mask = vello_cpu::Pixmap::new(bw, bh);
        let cpu_path = bezpath_to_cpu(&layer.shape);
        self.masks.with_ctx_mut(bw, bh, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((-x0, -y0)));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&cpu_path);
            ctx.flush();
            ctx.render_to_pixmap(&mut mask);
            Ok(())
        })?;

        let blender = layer.blend.blender();
        let coverage = mask.data_as_u8_slice();
        let (ox, oy) = (x0 as usize, y0 as usize);
        let (bw, bh) = (usize::from(bw), usize::from(bh));
        let stride = width as usize * 4;

        for row in 0..bh {
            for col in 0..bw {
                let cov = coverage[(row * bw + col) * 4 + 3];
                if cov == 0 {
                    continue;
                }
                let k = f32::from(cov) / 255.0 * layer.alpha;
                let x = ox + col;
                let y = oy + row;
                let c = layer
                    .paint
                    .sample(Point::new(x as f64 + 0.5, y as f64 + 0.5));
                let src = [c[0] * k, c[1] * k, c[2] * k, c[3] * k];
                let i = y * stride + x * 4;
                blender.apply(&mut frame[i..i + 4], src);
            }
        }
        Ok(())
    }
}

fn path_is_finite(path: &BezPath) -> bool {
    use kurbo::PathEl;

    let ok = |p: &Point| p.x.is_finite() && p.y.is_finite();
    path.elements().iter().all(|el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => ok(p),
        PathEl::QuadTo(a, b) => ok(a) && ok(b),
        PathEl::CurveTo(a, b, c) => ok(a) && ok(b) && ok(c),
        PathEl::ClosePath => true,
    })
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
