pub use combine::{Aggregation, ColumnNaming};
pub use explainer::{ExplainError, Explainer, ExplainerOptions};
pub use feature::{CategoricalFeature, Feature, NumericFeature};
pub use frame::{Column, Frame, FrameError};
pub use grid::ValueGrid;
pub use model::{Model, ModelError};
pub use range::{Range, RangeError};
pub use target::{Target, TargetError, TargetSelector};
pub use validate::{ConfigError, ConfigIssue};
pub use value::{DataType, Decimal, Dependence, Value};

mod combine;
mod dependence;
mod explainer;
mod feature;
mod frame;
mod functions;
mod grid;
mod model;
mod range;
mod target;
mod validate;
mod value;
