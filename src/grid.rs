use crate::feature::{CategoricalFeature, NumericFeature};
use crate::frame::{Frame, FrameError};
use crate::range::Range;
use crate::value::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueGrid(Vec<Value>);

impl ValueGrid {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

/// The `top_values` most frequent values of the feature, most frequent first.
///
/// Nulls are not counted and never appear in the grid.
pub fn categorical(
    background: &Frame,
    feature: &CategoricalFeature,
) -> Result<ValueGrid, FrameError> {
    let values = background
        .value_counts(feature.name())?
        .into_iter()
        .take(feature.top_value_count())
        .map(|(v, _)| v)
        .collect::<Vec<_>>();
    debug!(feature = feature.name(), grid = values.len(), "categorical grid");
    Ok(ValueGrid(values))
}

/// Evenly spaced doubles over the feature's range.
///
/// Missing bounds come from the observed minimum and maximum (truncated to
/// integers for integral columns). An integral column whose range is no wider
/// than the split count yields every integer in the range instead. The grid is
/// empty when the range cannot be resolved.
pub fn numeric(background: &Frame, feature: &NumericFeature) -> Result<ValueGrid, FrameError> {
    let data_type = background.try_column(feature.name())?.data_type();
    let integral = data_type.is_integral();

    let (min, max) = match feature.bounds() {
        (Some(min), Some(max)) => (min, max),
        (min, max) => match background.min_max(feature.name())? {
            Some((lo, hi)) => {
                let observed = |v: &Value| {
                    let bound = if integral {
                        v.as_i64().map(|v| v as f64)
                    } else {
                        v.as_f64()
                    };
                    bound.ok_or_else(|| FrameError::InvalidCast {
                        value: v.to_string(),
                        data_type,
                    })
                };
                (
                    min.map_or_else(|| observed(&lo), Ok)?,
                    max.map_or_else(|| observed(&hi), Ok)?,
                )
            }
            None => {
                debug!(feature = feature.name(), "no observed values; empty grid");
                return Ok(ValueGrid::default());
            }
        },
    };

    let range = match Range::new(min, max) {
        Ok(range) => range,
        Err(e) => {
            debug!(feature = feature.name(), min, max, error = %e, "degenerate range; empty grid");
            return Ok(ValueGrid::default());
        }
    };
    let values = if integral && range.width() <= feature.split_count() as f64 {
        range.integers()
    } else {
        range.interpolate(feature.split_count())
    };
    debug!(
        feature = feature.name(),
        min,
        max,
        grid = values.len(),
        "numeric grid"
    );
    Ok(ValueGrid(values.into_iter().map(Value::Double).collect()))
}
