//! Appearance streams for visible signature widgets

use crate::allocator::ObjectAllocator;
use crate::encode::pdf_string;
use crate::error::CollaboratorError;
use thiserror::Error;

/// Produces the object body of a normal appearance stream for a widget rectangle
///
/// The generator may register nested objects it needs through `allocator`.
pub trait AppearanceGenerator {
    fn appearance(
        &self,
        rect: [f64; 4],
        allocator: &mut dyn ObjectAllocator,
    ) -> Result<Vec<u8>, CollaboratorError>;
}

#[derive(Error, Debug, PartialEq)]
pub enum AppearanceError {
    #[error("Signature rectangle has zero area: {0:?}")]
    EmptyRect([f64; 4]),
}

/// Bordered box with a single line of Helvetica text
#[derive(Debug, Clone)]
pub struct SimpleAppearance {
    pub label: String,
}

impl SimpleAppearance {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn content(&self, width: f64, height: f64) -> String {
        let font_size = (height * 0.25).clamp(6.0, 10.0);
        let text_y = ((height - font_size) / 2.0).max(0.0);

        format!(
            "q\n\
0.9 0.95 1 rg\n\
0 0 {w} {h} re f\n\
0.2 0.4 0.8 RG\n\
1 w\n\
0.5 0.5 {w2} {h2} re S\n\
0 0 0 rg\n\
BT\n\
/F1 {fs} Tf\n\
4 {y} Td\n\
{label} Tj\n\
ET\n\
Q\n",
            w = width,
            h = height,
            w2 = (width - 1.0).max(0.0),
            h2 = (height - 1.0).max(0.0),
            fs = font_size,
            y = text_y,
            label = pdf_string(&self.label),
        )
    }
}

impl Default for SimpleAppearance {
    fn default() -> Self {
        Self::new("Digitally signed")
    }
}

impl AppearanceGenerator for SimpleAppearance {
    fn appearance(
        &self,
        rect: [f64; 4],
        _allocator: &mut dyn ObjectAllocator,
    ) -> Result<Vec<u8>, CollaboratorError> {
        // rect is [x1, y1, x2, y2]
        let width = (rect[2] - rect[0]).abs();
        let height = (rect[3] - rect[1]).abs();
        if width == 0.0 || height == 0.0 {
            return Err(AppearanceError::EmptyRect(rect).into());
        }

        let content = self.content(width, height);
        let body = format!(
            "<<\n  /Type /XObject\n  /Subtype /Form\n  /BBox [0 0 {w} {h}]\n  /Matrix [1 0 0 1 0 0]\n  /Resources << /Font << /F1 << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> >> >>\n  /Length {len}\n>>\nstream\n{content}endstream\n",
            w = width,
            h = height,
            len = content.len(),
            content = content,
        );
        Ok(body.into_bytes())
    }
}
