use crate::frame::Frame;
use crate::functions;
use crate::value::{DataType, Value};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum Target {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Target {
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Self::Scalar(v) => Some(v),
            Self::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(_) => None,
            Self::Vector(v) => Some(v),
        }
    }

    pub fn mean(targets: &[Target]) -> Result<Self, TargetError> {
        match targets.first() {
            None => Err(TargetError::EmptyGroup),
            Some(Self::Scalar(_)) => targets
                .iter()
                .map(|t| t.as_scalar().ok_or(TargetError::MixedShapes))
                .collect::<Result<Vec<_>, _>>()
                .map(|xs| Self::Scalar(functions::mean(xs.into_iter()))),
            Some(Self::Vector(first)) => {
                let len = first.len();
                let rows = targets
                    .iter()
                    .map(|t| match t.as_vector() {
                        Some(v) if v.len() == len => Ok(v),
                        Some(v) => Err(TargetError::ShapeMismatch {
                            expected: len,
                            found: v.len(),
                        }),
                        None => Err(TargetError::MixedShapes),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Vector(functions::vector_mean(rows.into_iter(), len)))
            }
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Target {}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Self::Vector(a), Self::Vector(b)) => a
                .iter()
                .map(|&v| OrderedFloat(v))
                .cmp(b.iter().map(|&v| OrderedFloat(v))),
            (Self::Scalar(_), Self::Vector(_)) => Ordering::Less,
            (Self::Vector(_), Self::Scalar(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{:?}", v),
            Self::Vector(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<f64> for Target {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for Target {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(v)
    }
}

/// Selects the model output to explain.
///
/// A scalar prediction column is reported as is. For a vector column (e.g.
/// class probabilities) the configured classes are reported, or every entry
/// when no class is configured. A per-row classes column, when set, overrides
/// the fixed classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSelector {
    col: String,
    classes: Vec<usize>,
    classes_col: Option<String>,
}

impl TargetSelector {
    pub fn new(col: impl Into<String>) -> Self {
        Self {
            col: col.into(),
            ..Self::default()
        }
    }

    pub fn classes(mut self, classes: Vec<usize>) -> Self {
        self.classes = classes;
        self
    }

    pub fn classes_col(mut self, col: impl Into<String>) -> Self {
        self.classes_col = Some(col.into());
        self
    }

    pub fn target_classes_col(&self) -> Option<&str> {
        self.classes_col.as_deref()
    }

    pub fn check_schema(&self, predicted: &Frame) -> Result<(), TargetError> {
        let data_type = predicted
            .data_type(&self.col)
            .ok_or_else(|| TargetError::MissingColumn {
                column: self.col.clone(),
            })?;
        if !(data_type.is_numeric() || data_type == DataType::Vector) {
            return Err(TargetError::UnsupportedType {
                column: self.col.clone(),
                data_type,
            });
        }
        if let Some(col) = &self.classes_col {
            match predicted.data_type(col) {
                Some(DataType::Vector) => {}
                Some(data_type) => {
                    return Err(TargetError::UnsupportedType {
                        column: col.clone(),
                        data_type,
                    })
                }
                None => return Err(TargetError::MissingColumn { column: col.clone() }),
            }
        }
        Ok(())
    }

    pub fn extract(&self, predicted: &Frame) -> Result<Vec<Target>, TargetError> {
        self.check_schema(predicted)?;
        let targets = predicted
            .column(&self.col)
            .expect("never fails")
            .values();
        let row_classes = self
            .classes_col
            .as_deref()
            .and_then(|col| predicted.column(col))
            .map(|c| c.values());

        targets
            .iter()
            .enumerate()
            .map(|(row, value)| -> Result<Target, TargetError> {
                let classes = match row_classes.map(|c| &c[row]) {
                    Some(Value::Vector(v)) => v
                        .iter()
                        .map(|&c| class_index(c))
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => self.classes.clone(),
                };
                match value {
                    Value::Null => Err(TargetError::NullTarget { row }),
                    Value::Vector(v) if classes.is_empty() => Ok(Target::Vector(v.clone())),
                    Value::Vector(v) => classes
                        .iter()
                        .map(|&class| {
                            v.get(class).copied().ok_or(TargetError::ClassOutOfRange {
                                class,
                                len: v.len(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()
                        .map(Target::Vector),
                    v => v.as_f64().map(Target::Scalar).ok_or(TargetError::NullTarget { row }),
                }
            })
            .collect()
    }
}

impl Default for TargetSelector {
    fn default() -> Self {
        Self {
            col: "probability".to_owned(),
            classes: Vec::new(),
            classes_col: None,
        }
    }
}

fn class_index(v: f64) -> Result<usize, TargetError> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
        Ok(v as usize)
    } else {
        Err(TargetError::InvalidClassIndex { value: v })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TargetError {
    #[error("target column `{column}` is missing from the predicted dataset")]
    MissingColumn { column: String },

    #[error("column `{column}` has type {data_type} which cannot be used as a target")]
    UnsupportedType { column: String, data_type: DataType },

    #[error("target of row {row} is null")]
    NullTarget { row: usize },

    #[error("class {class} is out of range for a target vector of length {len}")]
    ClassOutOfRange { class: usize, len: usize },

    #[error("{value} is not a valid class index")]
    InvalidClassIndex { value: f64 },

    #[error("cannot average target vectors of length {expected} and {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("cannot average scalar and vector targets together")]
    MixedShapes,

    #[error("cannot average an empty group of targets")]
    EmptyGroup,
}
