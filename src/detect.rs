use opencv::core::Mat;

use crate::error::LprError;

/// One bounding box returned by a detection or recognition model.
///
/// Coordinates are pixels in the image the model was run on, with
/// `x1 < x2` and `y1 < y2`. For the character recognizer the label is a
/// single plate character ("0".."9", "A".."Z").
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            label: label.into(),
            confidence,
        }
    }
}

/// The single interface the core requires from a model.
///
/// Both the plate detector and the character recognizer are supplied
/// through this trait, keeping the rectification/assembly/decoding core
/// free of any model-runtime dependency. Implementations are expected to
/// apply their own confidence and NMS thresholds before returning.
pub trait Detector {
    fn detect(&self, image: &Mat) -> Result<Vec<Detection>, LprError>;
}

impl<F> Detector for F
where
    F: Fn(&Mat) -> Result<Vec<Detection>, LprError>,
{
    fn detect(&self, image: &Mat) -> Result<Vec<Detection>, LprError> {
        self(image)
    }
}
