use crate::frame::Frame;

pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// A trained model that scores every row of a frame.
///
/// `transform` must return the input columns (in particular the explained
/// feature and any synthetic columns added by the explainer) alongside its
/// prediction columns, and must be deterministic for identical rows.
pub trait Model: Sync {
    fn transform(&self, frame: &Frame) -> Result<Frame, ModelError>;
}

impl<F> Model for F
where
    F: Fn(&Frame) -> Result<Frame, ModelError> + Sync,
{
    fn transform(&self, frame: &Frame) -> Result<Frame, ModelError> {
        self(frame)
    }
}
