use ndarray::prelude::*;
use serde::Serialize;

/// A `Property` is a piece of data that is written into [Results](crate::types::Results).
/// The idea of this enum is taken from Guillaume Fraux's (@Luthaf) Chemfiles library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Property {
    /// Boolean property
    Bool(bool),
    /// Unsigned integer property
    Int(usize),
    /// Floating point property
    Double(f64),
    /// String property
    String(String),
    /// Array<f64, Ix1> property
    Array1D(Array1<f64>),
    /// Array<f64, Ix2> property
    Array2D(Array2<f64>),
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<usize> for Property {
    fn from(value: usize) -> Self {
        Property::Int(value)
    }
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Double(value)
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::String(value)
    }
}

impl<'a> From<&'a str> for Property {
    fn from(value: &'a str) -> Self {
        Property::String(value.into())
    }
}

impl From<Array1<f64>> for Property {
    fn from(value: Array1<f64>) -> Self {
        Property::Array1D(value)
    }
}

impl From<ArrayView1<'_, f64>> for Property {
    fn from(value: ArrayView1<f64>) -> Self {
        Property::Array1D(value.to_owned())
    }
}

impl From<Vec<f64>> for Property {
    fn from(value: Vec<f64>) -> Self {
        Property::Array1D(Array1::from(value))
    }
}

impl From<Array2<f64>> for Property {
    fn from(value: Array2<f64>) -> Self {
        Property::Array2D(value)
    }
}

impl From<ArrayView2<'_, f64>> for Property {
    fn from(value: ArrayView2<f64>) -> Self {
        Property::Array2D(value.to_owned())
    }
}

impl Property {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Property::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<usize> {
        match self {
            Property::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Property::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array1(&self) -> Option<ArrayView1<f64>> {
        match self {
            Property::Array1D(value) => Some(value.view()),
            _ => None,
        }
    }

    pub fn as_array2(&self) -> Option<ArrayView2<f64>> {
        match self {
            Property::Array2D(value) => Some(value.view()),
            _ => None,
        }
    }
}
