use crate::feature::Feature;
use crate::frame::{Column, Frame, FrameError};
use crate::validate::{ConfigError, ConfigIssue};
use crate::value::Dependence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Aggregation {
    #[default]
    Average,
    Individual,
}

impl FromStr for Aggregation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(Self::Average),
            "individual" => Ok(Self::Individual),
            _ => Err(ConfigIssue::UnknownAggregation(s.to_owned()).into()),
        }
    }
}

impl TryFrom<String> for Aggregation {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Aggregation> for String {
    fn from(a: Aggregation) -> Self {
        a.to_string()
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::Individual => write!(f, "individual"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnNaming {
    #[default]
    Output,
    /// The raw feature name. In individual mode the dependence column takes
    /// the place of the feature column itself.
    Feature,
}

impl ColumnNaming {
    fn column_name(self, feature: &Feature) -> String {
        match self {
            Self::Output => feature.output_name(),
            Self::Feature => feature.name().to_owned(),
        }
    }
}

pub fn average(
    features: &[Feature],
    dependences: Vec<Dependence>,
    naming: ColumnNaming,
) -> Result<Frame, FrameError> {
    let columns = features
        .iter()
        .zip(dependences)
        .map(|(feature, dependence)| {
            Column::dependences(naming.column_name(feature), vec![dependence])
        })
        .collect();
    Frame::new(columns)
}

// Rows absent from a feature's table (e.g. when its grid is empty) get an
// empty mapping rather than being dropped.
pub fn individual(
    background: &Frame,
    id_col: &str,
    features: &[Feature],
    tables: Vec<BTreeMap<i64, Dependence>>,
    naming: ColumnNaming,
) -> Result<Frame, FrameError> {
    let ids = background
        .try_column(id_col)?
        .values()
        .iter()
        .map(|v| v.as_i64())
        .collect::<Vec<_>>();

    let mut frame = background.clone();
    for (feature, mut table) in features.iter().zip(tables) {
        let dependences = ids
            .iter()
            .map(|id| id.and_then(|id| table.remove(&id)).unwrap_or_default())
            .collect::<Vec<_>>();
        let column = Column::dependences(naming.column_name(feature), dependences);
        frame = frame.with_column(column)?;
    }
    Ok(frame.drop_column(id_col))
}
