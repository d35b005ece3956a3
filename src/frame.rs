use crate::value::{DataType, Dependence, Value};
use itertools::{Itertools as _, MinMaxResult};
use rand::seq::SliceRandom as _;
use rand::Rng;
use std::collections::BTreeMap;
use std::iter;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data_type: DataType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        values: Vec<Value>,
    ) -> Result<Self, FrameError> {
        let name = name.into();
        if let Some(row) = values.iter().position(|v| !v.conforms_to(data_type)) {
            return Err(FrameError::TypeMismatch {
                column: name,
                row,
                data_type,
            });
        }
        Ok(Self {
            name,
            data_type,
            values,
        })
    }

    fn from_values<T: Into<Value>>(
        name: impl Into<String>,
        data_type: DataType,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn booleans(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::from_values(name, DataType::Boolean, values)
    }

    pub fn ints(name: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Self {
        Self::from_values(name, DataType::Int, values)
    }

    pub fn longs(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::from_values(name, DataType::Long, values)
    }

    pub fn floats(name: impl Into<String>, values: impl IntoIterator<Item = f32>) -> Self {
        Self::from_values(name, DataType::Float, values)
    }

    pub fn doubles(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::from_values(name, DataType::Double, values)
    }

    pub fn strings<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::from_values(
            name,
            DataType::String,
            values.into_iter().map(|s| Value::String(s.into())),
        )
    }

    pub fn vectors(name: impl Into<String>, values: impl IntoIterator<Item = Vec<f64>>) -> Self {
        Self::from_values(name, DataType::Vector, values)
    }

    pub fn dependences(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Dependence>,
    ) -> Self {
        Self::from_values(name, DataType::Dependence, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
    rows_len: usize,
}

impl Frame {
    pub fn new(columns: Vec<Column>) -> Result<Self, FrameError> {
        let rows_len = columns.first().map_or(0, Column::len);
        for (i, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(FrameError::EmptyName);
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(FrameError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
            if column.len() != rows_len {
                return Err(FrameError::RowSizeMismatch {
                    column: column.name.clone(),
                    expected: rows_len,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, rows_len })
    }

    pub fn column_names(&self) -> impl '_ + Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn try_column(&self, name: &str) -> Result<&Column, FrameError> {
        self.column(name).ok_or_else(|| FrameError::MissingColumn {
            column: name.to_owned(),
        })
    }

    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.column(name).map(Column::data_type)
    }

    pub fn rows_len(&self) -> usize {
        self.rows_len
    }

    pub fn is_empty(&self) -> bool {
        self.rows_len == 0
    }

    pub fn with_column(mut self, column: Column) -> Result<Self, FrameError> {
        if !self.columns.is_empty() && column.len() != self.rows_len {
            return Err(FrameError::RowSizeMismatch {
                column: column.name,
                expected: self.rows_len,
                found: column.values.len(),
            });
        }
        if column.name.is_empty() {
            return Err(FrameError::EmptyName);
        }
        self.rows_len = column.len();
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(c) => *c = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    pub fn drop_column(mut self, name: &str) -> Self {
        self.columns.retain(|c| c.name != name);
        if self.columns.is_empty() {
            self.rows_len = 0;
        }
        self
    }

    /// Builds a frame from the given rows, in order. Panics if a row is out of range.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data_type: c.data_type,
                values: rows.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Self {
            columns,
            rows_len: rows.len(),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, limit: NonZeroUsize) -> Self {
        let mut rows = (0..self.rows_len).collect::<Vec<_>>();
        rows.shuffle(rng);
        rows.truncate(limit.get());
        self.take_rows(&rows)
    }

    /// Repeats every row once per value in `values`, replacing column `name`
    /// with each value in turn (cast to the column's type).
    ///
    /// Row `i` of `self` expands to rows `i * values.len()..(i + 1) * values.len()`.
    pub fn explode(&self, name: &str, values: &[Value]) -> Result<Self, FrameError> {
        let data_type = self.try_column(name)?.data_type;
        let grid = values
            .iter()
            .map(|v| {
                v.cast(data_type).ok_or_else(|| FrameError::InvalidCast {
                    value: v.to_string(),
                    data_type,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = self
            .columns
            .iter()
            .map(|c| {
                let values = if c.name == name {
                    iter::repeat(&grid)
                        .take(self.rows_len)
                        .flatten()
                        .cloned()
                        .collect()
                } else {
                    c.values
                        .iter()
                        .flat_map(|v| iter::repeat(v).take(grid.len()))
                        .cloned()
                        .collect()
                };
                Column {
                    name: c.name.clone(),
                    data_type: c.data_type,
                    values,
                }
            })
            .collect();
        Ok(Self {
            columns,
            rows_len: self.rows_len * grid.len(),
        })
    }

    pub fn min_max(&self, name: &str) -> Result<Option<(Value, Value)>, FrameError> {
        let column = self.try_column(name)?;
        let result = match column.values.iter().filter(|v| !v.is_null()).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some((v.clone(), v.clone())),
            MinMaxResult::MinMax(min, max) => Some((min.clone(), max.clone())),
        };
        Ok(result)
    }

    /// Occurrences of each distinct non-null value, most frequent first.
    /// Values with equal counts are in ascending order.
    pub fn value_counts(&self, name: &str) -> Result<Vec<(Value, usize)>, FrameError> {
        let column = self.try_column(name)?;
        let mut counts = BTreeMap::new();
        for v in column.values.iter().filter(|v| !v.is_null()) {
            *counts.entry(v).or_insert(0) += 1;
        }
        let mut counts = counts
            .into_iter()
            .map(|(v, n)| (v.clone(), n))
            .collect::<Vec<_>>();
        counts.sort_by_key(|&(_, n)| std::cmp::Reverse(n));
        Ok(counts)
    }

    pub fn unused_column_name(&self, prefix: &str, reserved: &[String]) -> String {
        iter::once(prefix.to_owned())
            .chain((1..).map(|i| format!("{}_{}", prefix, i)))
            .find(|name| self.column(name).is_none() && !reserved.contains(name))
            .expect("never fails")
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("column names must not be empty")]
    EmptyName,

    #[error("column `{column}` appears more than once")]
    DuplicateColumn { column: String },

    #[error("column `{column}` has {found} rows but the frame has {expected}")]
    RowSizeMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} of column `{column}` does not hold a {data_type} value")]
    TypeMismatch {
        column: String,
        row: usize,
        data_type: DataType,
    },

    #[error("column `{column}` does not exist")]
    MissingColumn { column: String },

    #[error("cannot cast {value} to {data_type}")]
    InvalidCast { value: String, data_type: DataType },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng as _;

    fn frame() -> Result<Frame, FrameError> {
        Frame::new(vec![
            Column::longs("id", vec![10, 20, 30]),
            Column::ints("x", vec![3, 1, 3]),
            Column::strings("c", vec!["b", "a", "b"]),
        ])
    }

    #[test]
    fn rejects_malformed_frames() {
        assert_eq!(
            Frame::new(vec![Column::longs("a", vec![1]), Column::longs("a", vec![2])]),
            Err(FrameError::DuplicateColumn {
                column: "a".to_owned()
            })
        );
        assert_eq!(
            Frame::new(vec![Column::longs("a", vec![1]), Column::longs("b", vec![])]),
            Err(FrameError::RowSizeMismatch {
                column: "b".to_owned(),
                expected: 1,
                found: 0
            })
        );
        assert!(matches!(
            Column::new("a", DataType::Double, vec![Value::from(1i64)]),
            Err(FrameError::TypeMismatch { row: 0, .. })
        ));
    }

    #[test]
    fn explode_repeats_rows_and_casts_grid() -> Result<(), anyhow::Error> {
        let exploded = frame()?.explode("x", &[Value::from(0.0), Value::from(2.5)])?;
        assert_eq!(exploded.rows_len(), 6);
        assert_eq!(
            exploded.try_column("id")?.values(),
            &[10i64, 10, 20, 20, 30, 30].map(Value::from)
        );
        assert_eq!(
            exploded.try_column("x")?.values(),
            &[0i32, 2, 0, 2, 0, 2].map(Value::from)
        );
        assert_eq!(exploded.data_type("x"), Some(DataType::Int));

        assert!(matches!(
            frame()?.explode("c", &[Value::from(1.0)]),
            Err(FrameError::InvalidCast { .. })
        ));
        assert_eq!(frame()?.explode("x", &[])?.rows_len(), 0);
        Ok(())
    }

    #[test]
    fn summaries_ignore_nulls() -> Result<(), anyhow::Error> {
        let frame = Frame::new(vec![Column::new(
            "v",
            DataType::Double,
            vec![Value::Null, Value::from(2.0), Value::from(-1.0), Value::from(2.0)],
        )?])?;
        assert_eq!(
            frame.min_max("v")?,
            Some((Value::from(-1.0), Value::from(2.0)))
        );
        assert_eq!(
            frame.value_counts("v")?,
            vec![(Value::from(2.0), 2), (Value::from(-1.0), 1)]
        );

        let empty = Frame::new(vec![Column::doubles("v", vec![])])?;
        assert_eq!(empty.min_max("v")?, None);
        Ok(())
    }

    #[test]
    fn value_count_ties_are_ordered_by_value() -> Result<(), anyhow::Error> {
        let frame = Frame::new(vec![Column::strings("c", vec!["z", "y", "x", "y", "z"])])?;
        let counts = frame.value_counts("c")?;
        assert_eq!(
            counts,
            vec![
                (Value::from("y"), 2),
                (Value::from("z"), 2),
                (Value::from("x"), 1)
            ]
        );
        Ok(())
    }

    #[test]
    fn sample_is_reproducible_and_capped() -> Result<(), anyhow::Error> {
        let frame = frame()?;
        let limit = NonZeroUsize::new(2).expect("never fails");
        let a = frame.sample(&mut StdRng::seed_from_u64(7), limit);
        let b = frame.sample(&mut StdRng::seed_from_u64(7), limit);
        assert_eq!(a, b);
        assert_eq!(a.rows_len(), 2);

        let limit = NonZeroUsize::new(10).expect("never fails");
        let all = frame.sample(&mut StdRng::seed_from_u64(7), limit);
        assert_eq!(all.rows_len(), 3);
        Ok(())
    }

    #[test]
    fn with_column_replaces_in_place() -> Result<(), anyhow::Error> {
        let frame = frame()?.with_column(Column::doubles("x", vec![1.0, 2.0, 3.0]))?;
        assert_eq!(frame.column_names().collect::<Vec<_>>(), vec!["id", "x", "c"]);
        assert_eq!(frame.data_type("x"), Some(DataType::Double));
        assert_eq!(frame.unused_column_name("id", &[]), "id_1");
        assert_eq!(frame.unused_column_name("row", &[]), "row");
        let reserved = ["row".to_owned(), "row_1".to_owned()];
        assert_eq!(frame.unused_column_name("row", &reserved), "row_2");

        let frame = frame.drop_column("x");
        assert_eq!(frame.column_names().collect::<Vec<_>>(), vec!["id", "c"]);
        assert!(frame.with_column(Column::longs("y", vec![1])).is_err());
        Ok(())
    }
}
