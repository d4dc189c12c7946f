/// Canvas composite operations used by the effect layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    Multiply,
    Overlay,
    SoftLight,
    ColorBurn,
}

/// Separable per-layer compositing kernel; chosen once per layer, applied per pixel.
#[derive(Clone, Copy)]
pub(crate) struct Blender(fn(f32, f32) -> f32);

impl BlendMode {
    pub(crate) fn blender(self) -> Blender {
        match self {
            BlendMode::Normal => Blender(|s, _| s),
            BlendMode::Multiply => Blender(|s, d| s * d),
            BlendMode::Overlay => Blender(|s, d| {
                if d <= 0.5 {
                    2.0 * s * d
                } else {
                    1.0 - 2.0 * (1.0 - s) * (1.0 - d)
                }
            }),
            BlendMode::SoftLight => Blender(|s, d| {
                if s <= 0.5 {
                    d - (1.0 - 2.0 * s) * d * (1.0 - d)
                } else {
                    let g = if d <= 0.25 {
                        ((16.0 * d - 12.0) * d + 4.0) * d
                    } else {
                        d.sqrt()
                    };
                    d + (2.0 * s - 1.0) * (g - d)
                }
            }),
            BlendMode::ColorBurn => Blender(|s, d| {
                if d >= 1.0 {
                    1.0
                } else if s <= 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - d) / s).min(1.0)
                }
            }),
        }
    }
}

impl Blender {
    /// Composite one premultiplied float source pixel onto a premultiplied RGBA8 destination.
    #[inline]
    pub(crate) fn apply(self, d: &mut [u8], src: [f32; 4]) {
        let sa = src[3].clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dp = [
            f32::from(d[0]) / 255.0,
            f32::from(d[1]) / 255.0,
            f32::from(d[2]) / 255.0,
        ];
        let da = f32::from(d[3]) / 255.0;

        // Source-over with the blend applied to unpremultiplied channels:
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let mut out_p = [0.0f32; 3];
        for i in 0..3 {
            let sc = (src[i] / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 {
                (dp[i] / da).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let b = (self.0)(sc, dc).clamp(0.0, 1.0);
            out_p[i] = src[i] * (1.0 - da) + dp[i] * (1.0 - sa) + b * sa * da;
        }
        let out_a = sa + da * (1.0 - sa);

        let to_u8 = |v: f32| -> u8 { (v.clamp(0.0, 1.0) * 255.0).round() as u8 };
        let a = to_u8(out_a);
        d[3] = a;
        for i in 0..3 {
            // Keep the premultiplied invariant c <= a.
            d[i] = to_u8(out_p[i]).min(a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
