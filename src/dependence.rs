use crate::explainer::ExplainError;
use crate::frame::{Frame, FrameError};
use crate::grid::ValueGrid;
use crate::model::Model;
use crate::target::{Target, TargetError, TargetSelector};
use crate::value::{DataType, Dependence, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub id: i64,
    pub value: Value,
    pub target: Target,
}

pub fn predict<M: Model + ?Sized>(
    model: &M,
    background: &Frame,
    id_col: &str,
    feature: &str,
    grid: &ValueGrid,
    target: &TargetSelector,
) -> Result<Vec<Prediction>, ExplainError> {
    let exploded = background.explode(feature, grid.values())?;
    debug!(
        feature,
        grid = grid.len(),
        rows = exploded.rows_len(),
        "scoring exploded background"
    );
    let predicted = model.transform(&exploded).map_err(ExplainError::Model)?;
    let targets = target.extract(&predicted)?;
    let ids = predicted.try_column(id_col)?.values();
    let values = predicted.try_column(feature)?.values();

    ids.iter()
        .zip(values)
        .zip(targets)
        .map(|((id, value), target)| -> Result<Prediction, ExplainError> {
            let id = id.as_i64().ok_or_else(|| FrameError::InvalidCast {
                value: id.to_string(),
                data_type: DataType::Long,
            })?;
            Ok(Prediction {
                id,
                value: value.clone(),
                target,
            })
        })
        .collect()
}

pub fn average(predictions: Vec<Prediction>) -> Result<Dependence, TargetError> {
    let mut groups = BTreeMap::<Value, Vec<Target>>::new();
    for p in predictions {
        groups.entry(p.value).or_default().push(p.target);
    }
    groups
        .into_iter()
        .map(|(value, targets)| -> Result<_, TargetError> {
            Ok((value, Target::mean(&targets)?))
        })
        .collect()
}

pub fn individual(predictions: Vec<Prediction>) -> BTreeMap<i64, Dependence> {
    let mut instances = BTreeMap::<i64, Dependence>::new();
    for p in predictions {
        instances.entry(p.id).or_default().insert(p.value, p.target);
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;
    use crate::model::ModelError;

    fn prediction(id: i64, value: f64, target: f64) -> Prediction {
        Prediction {
            id,
            value: Value::from(value),
            target: Target::Scalar(target),
        }
    }

    fn doubled(frame: &Frame) -> Result<Frame, ModelError> {
        let x = frame.try_column("x")?;
        let prediction = x.values().iter().map(|v| 2.0 * v.as_f64().unwrap_or(0.0));
        Ok(frame
            .clone()
            .with_column(Column::doubles("prediction", prediction))?)
    }

    #[test]
    fn predict_scores_every_grid_value_of_every_row() -> Result<(), anyhow::Error> {
        let background = Frame::new(vec![
            Column::longs("id", vec![0, 1]),
            Column::doubles("x", vec![5.0, 6.0]),
        ])?;
        let grid = ValueGrid::new(vec![Value::from(0.0), Value::from(1.0)]);
        let predictions = predict(
            &doubled,
            &background,
            "id",
            "x",
            &grid,
            &TargetSelector::new("prediction"),
        )?;
        assert_eq!(
            predictions,
            vec![
                prediction(0, 0.0, 0.0),
                prediction(0, 1.0, 2.0),
                prediction(1, 0.0, 0.0),
                prediction(1, 1.0, 2.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn model_failures_propagate() -> Result<(), anyhow::Error> {
        let background = Frame::new(vec![
            Column::longs("id", vec![0]),
            Column::doubles("x", vec![5.0]),
        ])?;
        let failing = |_: &Frame| -> Result<Frame, ModelError> { Err("model is offline".into()) };
        let grid = ValueGrid::new(vec![Value::from(0.0)]);
        let result = predict(&failing, &background, "id", "x", &grid, &TargetSelector::default());
        assert!(matches!(result, Err(ExplainError::Model(_))));
        Ok(())
    }

    #[test]
    fn average_groups_by_value() -> Result<(), anyhow::Error> {
        let dependence = average(vec![
            prediction(0, 1.0, 1.0),
            prediction(1, 1.0, 3.0),
            prediction(0, 2.0, 10.0),
        ])?;
        assert_eq!(
            dependence,
            [
                (Value::from(1.0), Target::Scalar(2.0)),
                (Value::from(2.0), Target::Scalar(10.0))
            ]
            .into_iter()
            .collect::<Dependence>()
        );
        assert!(average(Vec::new())?.is_empty());
        Ok(())
    }

    #[test]
    fn individual_groups_by_instance() {
        let instances = individual(vec![
            prediction(0, 1.0, 1.0),
            prediction(1, 1.0, 3.0),
            prediction(0, 2.0, 10.0),
        ]);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[&0].len(), 2);
        assert_eq!(instances[&0][&Value::from(2.0)], Target::Scalar(10.0));
        assert_eq!(instances[&1][&Value::from(1.0)], Target::Scalar(3.0));
    }
}
