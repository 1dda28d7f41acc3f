use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
}

impl LengthUnit {
    pub fn to_mm(&self, value: f64) -> f64 {
        match self {
            Self::Millimeter => value,
            Self::Centimeter => value * 10.0,
            Self::Meter => value * 1000.0,
            Self::Inch => value * 25.4,
            Self::Foot => value * 304.8,
        }
    }

    pub fn from_mm(&self, mm: f64) -> f64 {
        match self {
            Self::Millimeter => mm,
            Self::Centimeter => mm / 10.0,
            Self::Meter => mm / 1000.0,
            Self::Inch => mm / 25.4,
            Self::Foot => mm / 304.8,
        }
    }

    /// Convert a volume expressed in this unit cubed to mm³.
    pub fn volume_to_mm3(&self, volume: f64) -> f64 {
        let k = self.to_mm(1.0);
        volume * k * k * k
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => write!(f, "mm"),
            Self::Centimeter => write!(f, "cm"),
            Self::Meter => write!(f, "m"),
            Self::Inch => write!(f, "in"),
            Self::Foot => write!(f, "ft"),
        }
    }
}

/// Stock materials for mass estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Abs,
    Aluminum,
    Steel,
}

impl Material {
    /// Density in g/mm³.
    pub fn density(&self) -> f64 {
        match self {
            Self::Abs => 1020e-6,
            Self::Aluminum => 2700e-6,
            Self::Steel => 7800e-6,
        }
    }

    /// Mass in grams of `volume` mm³.
    pub fn mass(&self, volume: f64) -> f64 {
        volume * self.density()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abs => write!(f, "ABS"),
            Self::Aluminum => write!(f, "aluminum"),
            Self::Steel => write!(f, "steel"),
        }
    }
}
