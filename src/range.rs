use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, RangeError> {
        if !min.is_finite() || !max.is_finite() {
            Err(RangeError::NonFiniteValue)
        } else if min > max {
            Err(RangeError::Inverted { min, max })
        } else {
            Ok(Range { min, max })
        }
    }

    pub const fn min(&self) -> f64 {
        self.min
    }

    pub const fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn interpolate(&self, splits: usize) -> Vec<f64> {
        if splits == 0 {
            return Vec::new();
        }
        let step = self.width() / splits as f64;
        (0..=splits).map(|i| self.min + step * i as f64).collect()
    }

    pub fn integers(&self) -> Vec<f64> {
        let (start, end) = (self.min.ceil() as i64, self.max.floor() as i64);
        (start..=end).map(|v| v as f64).collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RangeError {
    #[error("range bounds must be finite numbers")]
    NonFiniteValue,

    #[error("range minimum {min} is greater than maximum {max}")]
    Inverted { min: f64, max: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_spans_both_bounds() -> Result<(), anyhow::Error> {
        let grid = Range::new(-1.0, 2.0)?.interpolate(3);
        assert_eq!(grid, vec![-1.0, 0.0, 1.0, 2.0]);

        let grid = Range::new(0.1, 0.7)?.interpolate(7);
        assert_eq!(grid.len(), 8);
        assert!(grid.windows(2).all(|w| w[0] <= w[1]));
        assert!((grid[0] - 0.1).abs() < 1e-12);
        assert!((grid[7] - 0.7).abs() < 1e-12);

        assert_eq!(Range::new(3.0, 3.0)?.interpolate(2), vec![3.0; 3]);
        Ok(())
    }

    #[test]
    fn integers_within_fractional_bounds() -> Result<(), anyhow::Error> {
        assert_eq!(Range::new(-1.5, 2.0)?.integers(), vec![-1.0, 0.0, 1.0, 2.0]);
        assert!(Range::new(0.2, 0.8)?.integers().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_invalid_bounds() {
        assert_eq!(Range::new(f64::NAN, 1.0), Err(RangeError::NonFiniteValue));
        assert_eq!(
            Range::new(2.0, 1.0),
            Err(RangeError::Inverted { min: 2.0, max: 1.0 })
        );
    }
}
