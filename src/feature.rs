use crate::frame::{Frame, FrameError};
use crate::grid::{self, ValueGrid};
use crate::range::{Range, RangeError};
use serde::{Deserialize, Serialize};

fn default_top_values() -> usize {
    100
}

fn default_splits() -> usize {
    10
}

fn dependence_col(name: &str) -> String {
    format!("{}_dependence", name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalFeature {
    name: String,
    #[serde(default = "default_top_values")]
    top_values: usize,
    #[serde(default)]
    output_col: Option<String>,
}

impl CategoricalFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            top_values: default_top_values(),
            output_col: None,
        }
    }

    pub fn top_values(mut self, k: usize) -> Self {
        self.top_values = k;
        self
    }

    pub fn output_col(mut self, col: impl Into<String>) -> Self {
        self.output_col = Some(col.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn top_value_count(&self) -> usize {
        self.top_values
    }

    pub fn output_name(&self) -> String {
        self.output_col
            .clone()
            .unwrap_or_else(|| dependence_col(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericFeature {
    name: String,
    #[serde(default = "default_splits")]
    splits: usize,
    #[serde(default)]
    range_min: Option<f64>,
    #[serde(default)]
    range_max: Option<f64>,
    #[serde(default)]
    output_col: Option<String>,
}

impl NumericFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            splits: default_splits(),
            range_min: None,
            range_max: None,
            output_col: None,
        }
    }

    pub fn splits(mut self, n: usize) -> Self {
        self.splits = n;
        self
    }

    pub fn range_min(mut self, v: f64) -> Self {
        self.range_min = Some(v);
        self
    }

    pub fn range_max(mut self, v: f64) -> Self {
        self.range_max = Some(v);
        self
    }

    pub fn output_col(mut self, col: impl Into<String>) -> Self {
        self.output_col = Some(col.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn split_count(&self) -> usize {
        self.splits
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.range_min, self.range_max)
    }

    pub fn output_name(&self) -> String {
        self.output_col
            .clone()
            .unwrap_or_else(|| dependence_col(&self.name))
    }

    pub fn check_range(&self) -> Result<(), RangeError> {
        match (self.range_min, self.range_max) {
            (Some(min), Some(max)) => Range::new(min, max).map(|_| ()),
            (Some(v), None) | (None, Some(v)) if !v.is_finite() => {
                Err(RangeError::NonFiniteValue)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Categorical(CategoricalFeature),
    Numeric(NumericFeature),
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Self::Categorical(f) => f.name(),
            Self::Numeric(f) => f.name(),
        }
    }

    pub fn output_name(&self) -> String {
        match self {
            Self::Categorical(f) => f.output_name(),
            Self::Numeric(f) => f.output_name(),
        }
    }

    pub fn build_grid(&self, background: &Frame) -> Result<ValueGrid, FrameError> {
        match self {
            Self::Categorical(f) => grid::categorical(background, f),
            Self::Numeric(f) => grid::numeric(background, f),
        }
    }
}

impl From<CategoricalFeature> for Feature {
    fn from(f: CategoricalFeature) -> Self {
        Self::Categorical(f)
    }
}

impl From<NumericFeature> for Feature {
    fn from(f: NumericFeature) -> Self {
        Self::Numeric(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_default_to_feature_name() {
        assert_eq!(CategoricalFeature::new("city").output_name(), "city_dependence");
        assert_eq!(
            Feature::from(NumericFeature::new("age").output_col("age_pdp")).output_name(),
            "age_pdp"
        );
    }

    #[test]
    fn range_checks() {
        assert_eq!(NumericFeature::new("x").check_range(), Ok(()));
        assert_eq!(NumericFeature::new("x").range_max(3.0).check_range(), Ok(()));
        assert_eq!(
            NumericFeature::new("x")
                .range_min(1.0)
                .range_max(0.0)
                .check_range(),
            Err(RangeError::Inverted { min: 1.0, max: 0.0 })
        );
        assert_eq!(
            NumericFeature::new("x").range_min(f64::INFINITY).check_range(),
            Err(RangeError::NonFiniteValue)
        );
    }

    #[test]
    fn deserializes_with_defaults() -> Result<(), anyhow::Error> {
        let f: NumericFeature = serde_json::from_str(r#"{"name": "x", "range_min": 0.5}"#)?;
        assert_eq!(f, NumericFeature::new("x").range_min(0.5));
        assert_eq!(f.split_count(), 10);

        let f: CategoricalFeature =
            serde_json::from_str(r#"{"name": "c", "top_values": 3, "output_col": "out"}"#)?;
        assert_eq!(f, CategoricalFeature::new("c").top_values(3).output_col("out"));

        assert!(serde_json::from_str::<CategoricalFeature>(r#"{"name": "c", "k": 3}"#).is_err());
        Ok(())
    }
}
