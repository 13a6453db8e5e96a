use opencv::core::Mat;
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decode::{decode, PlateInfo};
use crate::detect::Detector;
use crate::error::LprError;
use crate::rectify;
use crate::search;
use crate::utils::detection_roi;

/// Wire sentinel for a plate whose characters could not be read.
pub const UNKNOWN_PLATE: &str = "unknown";

const DEFAULT_MIN_CHAR_CONFIDENCE: f32 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One recognized plate, in the shape downstream tooling consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateResult {
    #[serde(rename = "plateNumber")]
    pub plate_number: String,
    pub confidence: f32,
    pub province: String,
    #[serde(rename = "vehicleType")]
    pub vehicle_type: String,
    pub bbox: BoundingBox,
}

/// Full frame-to-plate pipeline over two injected models: a plate
/// detector and a character recognizer.
///
/// The reader holds no mutable state; one instance can serve any number
/// of frames, and independent frames can be processed from separate
/// threads if the collaborators allow it.
pub struct PlateReader<'a> {
    detector: &'a dyn Detector,
    recognizer: &'a dyn Detector,
    min_char_confidence: f32,
}

impl<'a> PlateReader<'a> {
    pub fn new(detector: &'a dyn Detector, recognizer: &'a dyn Detector) -> Self {
        Self {
            detector,
            recognizer,
            min_char_confidence: DEFAULT_MIN_CHAR_CONFIDENCE,
        }
    }

    pub fn with_min_char_confidence(mut self, min_char_confidence: f32) -> Self {
        self.min_char_confidence = min_char_confidence;
        self
    }

    /// Locates every plate in the frame and reads each one.
    ///
    /// Plates whose characters cannot be resolved are still reported,
    /// with [`UNKNOWN_PLATE`] as the plate number and `Unknown` metadata.
    pub fn process(&self, frame: &Mat) -> Result<Vec<PlateResult>, LprError> {
        if frame.rows() == 0 || frame.cols() == 0 {
            return Err(LprError::InvalidImage);
        }

        let plates = self.detector.detect(frame)?;
        debug!(count = plates.len(), "plates detected");

        let mut results = Vec::with_capacity(plates.len());
        for plate in &plates {
            let roi = detection_roi(plate, frame.cols(), frame.rows());
            if roi.width <= 0 || roi.height <= 0 {
                debug!(?roi, "skipping degenerate plate region");
                continue;
            }

            let crop = Mat::roi(frame, roi)?.try_clone()?;
            let enhanced = rectify::enhance_contrast(&crop)?;

            let result = match search::read_plate(&enhanced, self.recognizer, self.min_char_confidence)
            {
                Some(read) => {
                    let info = decode(&read.text);
                    info!(plate = %read.text, province = %info.province, vehicle_type = %info.vehicle_type, "plate read");
                    PlateResult {
                        plate_number: read.text,
                        confidence: (plate.confidence + read.confidence) / 2.0,
                        province: info.province,
                        vehicle_type: info.vehicle_type,
                        bbox: BoundingBox {
                            x: roi.x,
                            y: roi.y,
                            width: roi.width,
                            height: roi.height,
                        },
                    }
                }
                None => {
                    info!("plate detected but not readable");
                    let info = PlateInfo::default();
                    PlateResult {
                        plate_number: UNKNOWN_PLATE.to_string(),
                        confidence: plate.confidence,
                        province: info.province,
                        vehicle_type: info.vehicle_type,
                        bbox: BoundingBox {
                            x: roi.x,
                            y: roi.y,
                            width: roi.width,
                            height: roi.height,
                        },
                    }
                }
            };
            results.push(result);
        }
        Ok(results)
    }
}
