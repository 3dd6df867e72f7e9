use crate::geometry::Rect;
use crate::session::Symbology;
use serde::{Deserialize, Serialize};

/// A code reported by the decoder for a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCandidate {
    /// Decoded string value; `None` when the code carried no string
    pub payload: Option<String>,
    /// Bounds in view coordinates
    pub bounds: Rect,
    pub symbology: Symbology,
}

impl ScanCandidate {
    /// Create a QR candidate with a decoded payload
    pub fn new<S: Into<String>>(payload: S, bounds: Rect) -> Self {
        Self {
            payload: Some(payload.into()),
            bounds,
            symbology: Symbology::Qr,
        }
    }

    /// Create a QR candidate whose string value could not be read
    pub fn without_payload(bounds: Rect) -> Self {
        Self {
            payload: None,
            bounds,
            symbology: Symbology::Qr,
        }
    }

    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = symbology;
        self
    }

    /// Payload if present and non-empty
    pub fn non_empty_payload(&self) -> Option<&str> {
        self.payload.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether the candidate lies fully inside `region`
    pub fn is_within(&self, region: &Rect) -> bool {
        region.contains_rect(&self.bounds)
    }

    /// Map bounds from a source frame (e.g. image pixels) onto a target region
    pub fn mapped_to(mut self, source: &Rect, target: &Rect) -> Self {
        if let Some(unit) = self.bounds.normalized_in(source) {
            self.bounds = Rect::new(
                target.x + unit.x * target.width,
                target.y + unit.y * target.height,
                unit.width * target.width,
                unit.height * target.height,
            );
        }
        self
    }
}
