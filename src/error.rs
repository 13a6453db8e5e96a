use thiserror::Error;

/// Errors produced by the plate-reading core.
///
/// `InvalidImage` and `NoContourFound` are recoverable inside the
/// orientation search, which reacts by moving on to the next hypothesis.
/// A plate that simply cannot be read is not an error at all; that case
/// is the `None` sentinel returned by the search and the assembler.
#[derive(Debug, Error)]
pub enum LprError {
    #[error("input image is empty")]
    InvalidImage,

    #[error("no contour found in binarized image")]
    NoContourFound,

    #[error("invalid corner list: {0}")]
    BadCorners(String),

    #[error("opencv error: {0}")]
    OpenCv(#[from] opencv::Error),
}
