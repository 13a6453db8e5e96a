use opencv::core::Mat;
use tracing::debug;

use crate::assemble::{assemble, mean_confidence};
use crate::detect::Detector;
use crate::error::LprError;
use crate::rectify;

/// One candidate combination of orientation-correction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hypothesis {
    pub flip: bool,
    pub rotate: bool,
}

impl Hypothesis {
    /// The four combinations, in the fixed order they are tried.
    pub const ALL: [Hypothesis; 4] = [
        Hypothesis { flip: false, rotate: false },
        Hypothesis { flip: false, rotate: true },
        Hypothesis { flip: true, rotate: false },
        Hypothesis { flip: true, rotate: true },
    ];
}

/// A successfully assembled plate string plus the mean confidence of the
/// character detections that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateRead {
    pub text: String,
    pub confidence: f32,
}

/// Tries every deskew hypothesis against the character recognizer until
/// one yields a non-empty string.
///
/// `None` is the "unknown" sentinel: either every hypothesis failed to
/// rectify, or none of the rectified images produced characters above the
/// confidence threshold. Bounded at four recognizer calls, first success
/// wins.
pub fn read_plate(
    image: &Mat,
    recognizer: &dyn Detector,
    min_confidence: f32,
) -> Option<PlateRead> {
    search_with(
        image,
        |image, hypothesis| rectify::deskew(image, hypothesis.flip, hypothesis.rotate),
        recognizer,
        min_confidence,
    )
}

/// The hypothesis loop itself, generic over the rectification step so the
/// state machine can be exercised with a fake rectifier in tests.
pub fn search_with<F>(
    image: &Mat,
    mut rectify: F,
    recognizer: &dyn Detector,
    min_confidence: f32,
) -> Option<PlateRead>
where
    F: FnMut(&Mat, Hypothesis) -> Result<Mat, LprError>,
{
    for hypothesis in Hypothesis::ALL {
        let rectified = match rectify(image, hypothesis) {
            Ok(rectified) => rectified,
            Err(err) => {
                debug!(?hypothesis, %err, "rectification failed, trying next hypothesis");
                continue;
            }
        };

        let detections = match recognizer.detect(&rectified) {
            Ok(detections) => detections,
            Err(err) => {
                debug!(?hypothesis, %err, "recognizer failed, trying next hypothesis");
                continue;
            }
        };

        if let Some(text) = assemble(&detections, min_confidence) {
            if !text.is_empty() {
                let confidence = mean_confidence(&detections, min_confidence).unwrap_or(0.0);
                debug!(?hypothesis, %text, "plate read");
                return Some(PlateRead { text, confidence });
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use crate::detect::Detection;

    use super::*;

    fn char_detections() -> Vec<Detection> {
        vec![
            Detection::new(50.0, 0.0, 60.0, 20.0, "5", 0.9),
            Detection::new(10.0, 0.0, 20.0, 20.0, "2", 0.8),
            Detection::new(30.0, 0.0, 40.0, 20.0, "B", 0.7),
        ]
    }

    #[test]
    fn stops_at_first_successful_hypothesis() {
        let tried = RefCell::new(Vec::new());
        let rectify = |_: &Mat, hypothesis: Hypothesis| {
            tried.borrow_mut().push(hypothesis);
            // Deskew fails for (0,0) and (0,1), succeeds from (1,0) on.
            if hypothesis.flip {
                Ok(Mat::default())
            } else {
                Err(LprError::NoContourFound)
            }
        };

        let calls = Cell::new(0usize);
        let recognizer = |_: &Mat| -> Result<Vec<Detection>, LprError> {
            calls.set(calls.get() + 1);
            Ok(char_detections())
        };

        let read = search_with(&Mat::default(), rectify, &recognizer, 0.25).unwrap();
        assert_eq!(read.text, "25B");
        assert_eq!(calls.get(), 1);
        assert_eq!(
            *tried.borrow(),
            vec![
                Hypothesis { flip: false, rotate: false },
                Hypothesis { flip: false, rotate: true },
                Hypothesis { flip: true, rotate: false },
            ]
        );
    }

    #[test]
    fn exhausted_hypotheses_yield_unknown() {
        let rectify = |_: &Mat, _: Hypothesis| Err(LprError::InvalidImage);
        let recognizer = |_: &Mat| -> Result<Vec<Detection>, LprError> {
            panic!("recognizer must not run when deskew fails")
        };
        assert_eq!(search_with(&Mat::default(), rectify, &recognizer, 0.25), None);
    }

    #[test]
    fn empty_reads_are_bounded_at_four_attempts() {
        let rectify = |_: &Mat, _: Hypothesis| Ok(Mat::default());
        let calls = Cell::new(0usize);
        let recognizer = |_: &Mat| -> Result<Vec<Detection>, LprError> {
            calls.set(calls.get() + 1);
            Ok(Vec::new())
        };
        assert_eq!(search_with(&Mat::default(), rectify, &recognizer, 0.25), None);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn recognizer_errors_advance_the_search() {
        let rectify = |_: &Mat, _: Hypothesis| Ok(Mat::default());
        let calls = Cell::new(0usize);
        let recognizer = |_: &Mat| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(LprError::InvalidImage)
            } else {
                Ok(char_detections())
            }
        };
        let read = search_with(&Mat::default(), rectify, &recognizer, 0.25).unwrap();
        assert_eq!(read.text, "25B");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn carries_mean_character_confidence() {
        let rectify = |_: &Mat, _: Hypothesis| Ok(Mat::default());
        let recognizer = |_: &Mat| -> Result<Vec<Detection>, LprError> { Ok(char_detections()) };
        let read = search_with(&Mat::default(), rectify, &recognizer, 0.25).unwrap();
        assert!((read.confidence - 0.8).abs() < 1e-6);
    }
}
