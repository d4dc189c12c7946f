use crate::scene::entities::FaceRegion;

/// Face box as reported by a detector, before unit normalization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawFaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Bring a detector's box into normalized image coordinates.
///
/// Detectors are inconsistent about reporting fractions or percentages. This is a heuristic: if
/// any component exceeds 1 the box is read as percentages. Boxes that fail the range check are
/// dropped, which leaves the whole image interactive.
pub fn normalize_face_box(raw: RawFaceBox) -> Option<FaceRegion> {
    let RawFaceBox {
        x,
        y,
        width,
        height,
    } = raw;
    let percent = x > 1.0 || y > 1.0 || width > 1.0 || height > 1.0;
    let divisor = if percent { 100.0 } else { 1.0 };
    match FaceRegion::new(x / divisor, y / divisor, width / divisor, height / divisor) {
        Ok(region) => Some(region),
        Err(err) => {
            tracing::debug!(%err, "discarding face box");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/face.rs"]
mod tests;
