use crate::foundation::core::TimeMs;
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::layout::letterbox::Letterbox;
use crate::render::backing::{BackingImage, encode_png_premul};
use crate::render::effects::{
    bruise_layers, crack_layers, dent_layers, needle_layers, slap_layers, spider_layers,
    swelling_layers,
};
use crate::render::layers::{ContextCache, Layer, LayerRasterizer, affine_to_cpu};
use crate::scene::store::EffectStore;
use crate::scene::timing::EffectTiming;

/// A rendered canvas frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Encode as a straight-alpha PNG.
    pub fn encode_png(&self) -> PoppetResult<Vec<u8>> {
        if !self.premultiplied {
            let mut data = self.data.clone();
            crate::foundation::math::premultiply_rgba8_in_place(&mut data);
            return encode_png_premul(self.width, self.height, &data);
        }
        encode_png_premul(self.width, self.height, &self.data)
    }
}

/// All layers for the current store state, in draw order.
///
/// Families stack dents, spiders, needles, bruises, swellings, cracks, then slaps; within a
/// family, creation order. Pure: same inputs give the same layers.
pub fn build_layers(
    store: &EffectStore,
    letterbox: &Letterbox,
    now: TimeMs,
    timing: &EffectTiming,
) -> Vec<Layer> {
    let mut out = Vec::new();
    for d in store.dents() {
        dent_layers(d, now, timing, letterbox, &mut out);
    }
    for s in store.spiders() {
        spider_layers(s, letterbox, &mut out);
    }
    for n in store.needles() {
        needle_layers(n, letterbox, &mut out);
    }
    for b in store.bruises() {
        bruise_layers(b, letterbox, &mut out);
    }
    for s in store.swellings() {
        swelling_layers(s, now, timing, letterbox, &mut out);
    }
    for c in store.cracks() {
        crack_layers(c, letterbox, &mut out);
    }
    for s in store.slaps() {
        slap_layers(s, now, timing, letterbox, &mut out);
    }
    out
}

struct CachedBase {
    revision: u64,
    size: (u32, u32),
    paint: vello_cpu::Image,
}

/// Draws the backing image and every live effect onto a canvas-sized frame.
///
/// Holds the raster contexts and the uploaded base image between frames.
pub struct Compositor {
    ctx: ContextCache,
    base: Option<CachedBase>,
    layers: LayerRasterizer,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            ctx: ContextCache::new(),
            base: None,
            layers: LayerRasterizer::new(),
        }
    }

    fn base_paint(&mut self, backing: &BackingImage) -> PoppetResult<vello_cpu::Image> {
        let size = (backing.width(), backing.height());
        if let Some(cached) = &self.base
            && cached.revision == backing.revision()
            && cached.size == size
        {
            return Ok(cached.paint.clone());
        }

        let pixmap = premul_bytes_to_pixmap(backing.data(), size.0, size.1)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.base = Some(CachedBase {
            revision: backing.revision(),
            size,
            paint: paint.clone(),
        });
        Ok(paint)
    }

    /// Compose one frame.
    ///
    /// Rendering does not mutate any state visible to the session; two calls with the same
    /// inputs produce identical pixels.
    #[tracing::instrument(skip_all, fields(now = now.0))]
    pub fn render(
        &mut self,
        backing: &BackingImage,
        store: &EffectStore,
        letterbox: &Letterbox,
        now: TimeMs,
        timing: &EffectTiming,
    ) -> PoppetResult<FrameRGBA> {
        if letterbox.image_size() != (backing.width(), backing.height()) {
            return Err(PoppetError::render(format!(
                "letterbox was fitted for {:?}, backing image is {}x{}",
                letterbox.image_size(),
                backing.width(),
                backing.height()
            )));
        }
        let canvas = letterbox.canvas();
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PoppetError::render("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PoppetError::render("canvas height exceeds u16"))?;

        let paint = self.base_paint(backing)?;
        let image_rect = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(backing.width()),
            f64::from(backing.height()),
        );
        let mut surface = vello_cpu::Pixmap::new(w, h);
        self.ctx.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(affine_to_cpu(letterbox.image_transform()));
            ctx.set_paint(paint);
            ctx.fill_rect(&image_rect);
            ctx.flush();
            ctx.render_to_pixmap(&mut surface);
            Ok(())
        })?;
        let mut data = surface.data_as_u8_slice().to_vec();

        let layers = build_layers(store, letterbox, now, timing);
        tracing::trace!(layers = layers.len(), "compose effects");
        for layer in &layers {
            self.layers
                .draw(&mut data, canvas.width, canvas.height, layer)?;
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PoppetResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PoppetError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PoppetError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PoppetError::render("backing image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
