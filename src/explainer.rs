use crate::combine::{self, Aggregation, ColumnNaming};
use crate::dependence::{self, Prediction};
use crate::feature::{CategoricalFeature, Feature, NumericFeature};
use crate::frame::{Column, Frame, FrameError};
use crate::model::{Model, ModelError};
use crate::target::{TargetError, TargetSelector};
use crate::validate::{self, ConfigError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplainerOptions {
    target: TargetSelector,
    aggregation: Aggregation,
    categorical: Vec<CategoricalFeature>,
    numeric: Vec<NumericFeature>,
    num_samples: Option<NonZeroUsize>,
    seed: Option<u64>,
    parallel: bool,
    column_naming: ColumnNaming,
}

impl ExplainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn categorical(mut self, feature: CategoricalFeature) -> Self {
        self.categorical.push(feature);
        self
    }

    pub fn numeric(mut self, feature: NumericFeature) -> Self {
        self.numeric.push(feature);
        self
    }

    pub fn num_samples(mut self, n: NonZeroUsize) -> Self {
        self.num_samples = Some(n);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn column_naming(mut self, naming: ColumnNaming) -> Self {
        self.column_naming = naming;
        self
    }

    pub fn features(&self) -> Vec<Feature> {
        self.categorical
            .iter()
            .cloned()
            .map(Feature::Categorical)
            .chain(self.numeric.iter().cloned().map(Feature::Numeric))
            .collect()
    }

    pub fn build<M: Model>(self, model: M) -> Explainer<M> {
        Explainer {
            model,
            options: self,
        }
    }
}

#[derive(Debug)]
pub struct Explainer<M> {
    model: M,
    options: ExplainerOptions,
}

impl<M: Model> Explainer<M> {
    pub fn validate(&self, background: &Frame) -> Result<(), ConfigError> {
        validate::validate(
            &self.options.features(),
            self.options.aggregation,
            self.options.column_naming,
            &self.options.target,
            background,
        )
    }

    pub fn explain(&self, background: &Frame) -> Result<Frame, ExplainError> {
        let seed = self.options.seed.unwrap_or_else(|| rand::thread_rng().gen());
        self.explain_with_rng(background, &mut StdRng::seed_from_u64(seed))
    }

    /// Like [`explain`](Self::explain), drawing the row sample from `rng`.
    pub fn explain_with_rng<R: Rng + ?Sized>(
        &self,
        background: &Frame,
        rng: &mut R,
    ) -> Result<Frame, ExplainError> {
        self.validate(background)?;
        let features = self.options.features();

        let sampled = match self.options.num_samples {
            Some(limit) => background.sample(rng, limit),
            None => background.clone(),
        };
        let outputs = features.iter().map(Feature::output_name).collect::<Vec<_>>();
        let id_col = sampled.unused_column_name("__instance_id", &outputs);
        let ids = Column::longs(&id_col, 0..sampled.rows_len() as i64);
        let sampled = sampled.with_column(ids)?;
        info!(
            aggregation = %self.options.aggregation,
            features = features.len(),
            rows = sampled.rows_len(),
            "explaining model"
        );

        let predict = |feature: &Feature| -> Result<Vec<Prediction>, ExplainError> {
            let grid = feature.build_grid(background)?;
            dependence::predict(
                &self.model,
                &sampled,
                &id_col,
                feature.name(),
                &grid,
                &self.options.target,
            )
        };

        let naming = self.options.column_naming;
        let frame = match self.options.aggregation {
            Aggregation::Average => {
                let dependences = self.for_each_feature(&features, |feature| {
                    Ok(dependence::average(predict(feature)?)?)
                })?;
                combine::average(&features, dependences, naming)?
            }
            Aggregation::Individual => {
                let tables = self.for_each_feature(&features, |feature| {
                    Ok(dependence::individual(predict(feature)?))
                })?;
                combine::individual(&sampled, &id_col, &features, tables, naming)?
            }
        };
        Ok(frame)
    }

    fn for_each_feature<T, F>(&self, features: &[Feature], f: F) -> Result<Vec<T>, ExplainError>
    where
        T: Send,
        F: Fn(&Feature) -> Result<T, ExplainError> + Sync + Send,
    {
        if self.options.parallel {
            features.par_iter().map(f).collect()
        } else {
            features.iter().map(f).collect()
        }
    }
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("model inference failed: {0}")]
    Model(#[source] ModelError),
}
