//! License-plate reading core.
//!
//! Everything between a raw model detection and a decoded plate string
//! lives here: CLAHE contrast normalization, contour-based deskew, a
//! bounded four-hypothesis orientation search, left-to-right character
//! assembly and rule-based decoding of Vietnamese province and vehicle
//! type codes. The detection and recognition models themselves stay
//! behind the [`detect::Detector`] trait.

pub mod assemble;
pub mod cli;
pub mod decode;
pub mod detect;
pub mod error;
pub mod pipeline;
pub mod rectify;
pub mod search;
pub mod utils;

pub use assemble::assemble;
pub use decode::{decode, PlateInfo};
pub use detect::{Detection, Detector};
pub use error::LprError;
pub use pipeline::{PlateReader, PlateResult};
pub use search::{Hypothesis, PlateRead};
