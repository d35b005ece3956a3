use crate::combine::{Aggregation, ColumnNaming};
use crate::feature::Feature;
use crate::frame::Frame;
use crate::range::RangeError;
use crate::target::TargetSelector;
use crate::value::DataType;
use itertools::Itertools as _;
use std::collections::BTreeMap;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigIssue {
    #[error("unknown aggregation `{0}`; expected `average` or `individual`")]
    UnknownAggregation(String),

    #[error("at least one categorical or numeric feature must be declared")]
    NoFeatures,

    #[error("features declared more than once: {}", .names.join(", "))]
    DuplicateFeatures { names: Vec<String> },

    #[error("feature `{feature}` is not a column of the dataset")]
    MissingColumn { feature: String },

    #[error("categorical feature `{feature}` has type {data_type}; expected string, boolean, byte, short, int or long")]
    CategoricalType { feature: String, data_type: DataType },

    #[error("numeric feature `{feature}` has type {data_type}; expected float, double or decimal")]
    NumericType { feature: String, data_type: DataType },

    #[error("categorical feature `{feature}` must keep at least one top value")]
    ZeroTopValues { feature: String },

    #[error("numeric feature `{feature}` must have at least one split")]
    ZeroSplits { feature: String },

    #[error("numeric feature `{feature}` has an invalid range: {source}")]
    InvalidRange { feature: String, source: RangeError },

    #[error("output column `{column}` is written more than once or overwrites a dataset column")]
    OutputConflict { column: String },

    #[error("target classes column `{column}` must be an existing vector column")]
    TargetClassesColumn { column: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid explainer configuration: {}", .issues.iter().join("; "))]
pub struct ConfigError {
    issues: Vec<ConfigIssue>,
}

impl ConfigError {
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

impl From<ConfigIssue> for ConfigError {
    fn from(issue: ConfigIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

pub fn validate(
    features: &[Feature],
    aggregation: Aggregation,
    naming: ColumnNaming,
    target: &TargetSelector,
    background: &Frame,
) -> Result<(), ConfigError> {
    let mut issues = Vec::new();

    if features.is_empty() {
        issues.push(ConfigIssue::NoFeatures);
    }

    let mut declared = BTreeMap::<&str, usize>::new();
    for feature in features {
        *declared.entry(feature.name()).or_insert(0) += 1;
    }
    let duplicates = declared
        .iter()
        .filter(|&(_, &n)| n > 1)
        .map(|(&name, _)| name.to_owned())
        .collect::<Vec<_>>();
    if !duplicates.is_empty() {
        issues.push(ConfigIssue::DuplicateFeatures { names: duplicates });
    }

    for feature in features {
        let name = feature.name().to_owned();
        let data_type = background.data_type(&name);
        match feature {
            Feature::Categorical(f) => {
                if f.top_value_count() == 0 {
                    issues.push(ConfigIssue::ZeroTopValues {
                        feature: name.clone(),
                    });
                }
                if let Some(data_type) = data_type.filter(|t| !t.is_categorical()) {
                    issues.push(ConfigIssue::CategoricalType {
                        feature: name.clone(),
                        data_type,
                    });
                }
            }
            Feature::Numeric(f) => {
                if f.split_count() == 0 {
                    issues.push(ConfigIssue::ZeroSplits {
                        feature: name.clone(),
                    });
                }
                if let Err(source) = f.check_range() {
                    issues.push(ConfigIssue::InvalidRange {
                        feature: name.clone(),
                        source,
                    });
                }
                if let Some(data_type) = data_type.filter(|t| !t.is_fractional()) {
                    issues.push(ConfigIssue::NumericType {
                        feature: name.clone(),
                        data_type,
                    });
                }
            }
        }
        if data_type.is_none() {
            issues.push(ConfigIssue::MissingColumn { feature: name });
        }
    }

    if naming == ColumnNaming::Output {
        let mut outputs = BTreeMap::<String, usize>::new();
        for feature in features {
            *outputs.entry(feature.output_name()).or_insert(0) += 1;
        }
        for (column, n) in outputs {
            let overwrites =
                aggregation == Aggregation::Individual && background.column(&column).is_some();
            if n > 1 || overwrites {
                issues.push(ConfigIssue::OutputConflict { column });
            }
        }
    }

    if let Some(column) = target.target_classes_col() {
        if background.data_type(column) != Some(DataType::Vector) {
            issues.push(ConfigIssue::TargetClassesColumn {
                column: column.to_owned(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ConfigError { issues })
    }
}
