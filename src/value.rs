use crate::target::Target;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

pub type Dependence = BTreeMap<Value, Target>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    String,
    Vector,
    Dependence,
}

impl DataType {
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    pub fn is_fractional(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::Decimal { .. })
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_fractional()
    }

    pub fn is_categorical(self) -> bool {
        matches!(self, Self::String | Self::Boolean) || self.is_integral()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Byte => write!(f, "byte"),
            Self::Short => write!(f, "short"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            Self::String => write!(f, "string"),
            Self::Vector => write!(f, "vector"),
            Self::Dependence => write!(f, "map"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    unscaled: i128,
    scale: u8,
}

impl Decimal {
    pub const fn new(unscaled: i128, scale: u8) -> Self {
        Self { unscaled, scale }
    }

    pub fn from_f64(v: f64, scale: u8) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        let scaled = (v * 10f64.powi(i32::from(scale))).round();
        if scaled.abs() >= i128::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i128, scale))
    }

    pub fn to_f64(self) -> f64 {
        self.unscaled as f64 / 10f64.powi(i32::from(self.scale))
    }

    /// Returns `true` if the unscaled digits fit in `precision` digits.
    pub fn fits(self, precision: u8) -> bool {
        10u128
            .checked_pow(u32::from(precision))
            .map_or(true, |limit| self.unscaled.unsigned_abs() < limit)
    }

    pub const fn scale(self) -> u8 {
        self.scale
    }

    fn rescale(self, scale: u8) -> Option<i128> {
        let factor = 10i128.checked_pow(u32::from(scale.checked_sub(self.scale)?))?;
        self.unscaled.checked_mul(factor)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => OrderedFloat(self.to_f64()).cmp(&OrderedFloat(other.to_f64())),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = format!(
            "{:0>width$}",
            self.unscaled.unsigned_abs(),
            width = usize::from(self.scale) + 1
        );
        let (int, frac) = digits.split_at(digits.len() - usize::from(self.scale));
        write!(f, "{}{}.{}", sign, int, frac)
    }
}

/// Values of different types order by variant, so any mix can key a
/// [`Dependence`] map.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Vector(Vec<f64>),
    Dependence(Dependence),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn conforms_to(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Self::Null, _) => true,
            (Self::Boolean(_), DataType::Boolean)
            | (Self::Byte(_), DataType::Byte)
            | (Self::Short(_), DataType::Short)
            | (Self::Int(_), DataType::Int)
            | (Self::Long(_), DataType::Long)
            | (Self::Float(_), DataType::Float)
            | (Self::Double(_), DataType::Double)
            | (Self::String(_), DataType::String)
            | (Self::Vector(_), DataType::Vector)
            | (Self::Dependence(_), DataType::Dependence) => true,
            (Self::Decimal(d), DataType::Decimal { precision, scale }) => {
                d.scale() == scale && d.fits(precision)
            }
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Byte(v) => Some(f64::from(v)),
            Self::Short(v) => Some(f64::from(v)),
            Self::Int(v) => Some(f64::from(v)),
            Self::Long(v) => Some(v as f64),
            Self::Float(v) => Some(f64::from(v)),
            Self::Double(v) => Some(v),
            Self::Decimal(v) => Some(v.to_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(i64::from(v)),
            Self::Short(v) => Some(i64::from(v)),
            Self::Int(v) => Some(i64::from(v)),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric values convert between all numeric types. Integral targets
    /// truncate and decimal targets round, and the result must fit the type.
    pub fn cast(&self, data_type: DataType) -> Option<Self> {
        if self.conforms_to(data_type) {
            return Some(self.clone());
        }
        let v = self.as_f64()?;
        let integral = |min: f64, max: f64| {
            let v = v.trunc();
            (v.is_finite() && min <= v && v <= max).then(|| v)
        };
        match data_type {
            DataType::Byte => integral(i8::MIN.into(), i8::MAX.into()).map(|v| Self::Byte(v as i8)),
            DataType::Short => {
                integral(i16::MIN.into(), i16::MAX.into()).map(|v| Self::Short(v as i16))
            }
            DataType::Int => integral(i32::MIN.into(), i32::MAX.into()).map(|v| Self::Int(v as i32)),
            DataType::Long => {
                integral(i64::MIN as f64, i64::MAX as f64).map(|v| Self::Long(v as i64))
            }
            DataType::Float => Some(Self::Float(v as f32)),
            DataType::Double => Some(Self::Double(v)),
            DataType::Decimal { precision, scale } => Decimal::from_f64(v, scale)
                .filter(|d| d.fits(precision))
                .map(Self::Decimal),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Byte(_) => 2,
            Self::Short(_) => 3,
            Self::Int(_) => 4,
            Self::Long(_) => 5,
            Self::Float(_) => 6,
            Self::Double(_) => 7,
            Self::Decimal(_) => 8,
            Self::String(_) => 9,
            Self::Vector(_) => 10,
            Self::Dependence(_) => 11,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Byte(a), Self::Byte(b)) => a.cmp(b),
            (Self::Short(a), Self::Short(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Long(a), Self::Long(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Self::Double(a), Self::Double(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Self::Decimal(a), Self::Decimal(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Vector(a), Self::Vector(b)) => a
                .iter()
                .map(|&v| OrderedFloat(v))
                .cmp(b.iter().map(|&v| OrderedFloat(v))),
            (Self::Dependence(a), Self::Dependence(b)) => a.iter().cmp(b.iter()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Double(v) => write!(f, "{:?}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Vector(v) => write!(f, "{:?}", v),
            Self::Dependence(m) => {
                write!(f, "{{")?;
                for (i, (k, t)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, t)?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        })*
    };
}

impl_from!(
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Vec<f64> => Vector,
    Dependence => Dependence
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_totally_ordered() {
        let mut values = vec![
            Value::from(2.0),
            Value::Null,
            Value::from(f64::NAN),
            Value::from(-1.0),
            Value::from("a"),
            Value::from(1i64),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::from(1i64),
                Value::from(-1.0),
                Value::from(2.0),
                Value::from(f64::NAN),
                Value::from("a"),
            ]
        );
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    }

    #[test]
    fn numeric_casts() {
        assert_eq!(Value::from(2.9).cast(DataType::Long), Some(Value::Long(2)));
        assert_eq!(Value::from(300.0).cast(DataType::Byte), None);
        assert_eq!(Value::from(7i32).cast(DataType::Double), Some(Value::Double(7.0)));
        assert_eq!(
            Value::from(1.236).cast(DataType::Decimal {
                precision: 10,
                scale: 2
            }),
            Some(Value::Decimal(Decimal::new(124, 2)))
        );
        assert_eq!(
            Value::from(1234.5).cast(DataType::Decimal {
                precision: 4,
                scale: 1
            }),
            None
        );
        assert_eq!(Value::from("x").cast(DataType::Double), None);
        assert_eq!(Value::Null.cast(DataType::Double), Some(Value::Null));
    }

    #[test]
    fn decimals_compare_across_scales() {
        assert_eq!(Decimal::new(150, 2), Decimal::new(15, 1));
        assert!(Decimal::new(-1, 0) < Decimal::new(5, 3));
        assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
    }

    #[test]
    fn decimals_respect_precision() {
        let data_type = DataType::Decimal {
            precision: 3,
            scale: 1,
        };
        assert!(Value::Decimal(Decimal::new(999, 1)).conforms_to(data_type));
        assert!(Value::Decimal(Decimal::new(-999, 1)).conforms_to(data_type));
        assert!(!Value::Decimal(Decimal::new(1000, 1)).conforms_to(data_type));
        assert!(Decimal::new(i128::MAX, 0).fits(40));
    }
}
