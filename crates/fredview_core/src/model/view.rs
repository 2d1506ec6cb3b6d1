//! View selection model.
//!
//! # Responsibility
//! - Define transform/formula/theme tags with stable serialized names.
//! - Define the named, persisted `ViewConfig` bundle.
//!
//! # Invariants
//! - Serialized tags are stable: renaming a variant must keep its tag.
//! - `CombineOp` has no "none" state; code holding one can always combine.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Single-series numeric transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// Values as stored, after numeric coercion.
    #[default]
    #[serde(rename = "raw")]
    Raw,
    /// Percent change against the previous point.
    #[serde(rename = "pct_change_mom")]
    PctChangeMom,
    /// Percent change against the point twelve positions back.
    #[serde(rename = "pct_change_yoy")]
    PctChangeYoy,
    /// Rebased so the first point equals 100.
    #[serde(rename = "index_100")]
    Index100,
}

impl TransformKind {
    pub const ALL: [TransformKind; 4] = [
        TransformKind::Raw,
        TransformKind::PctChangeMom,
        TransformKind::PctChangeYoy,
        TransformKind::Index100,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::PctChangeMom => "pct_change_mom",
            Self::PctChangeYoy => "pct_change_yoy",
            Self::Index100 => "index_100",
        }
    }
}

/// Two-series formula selected for a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaKind {
    #[default]
    None,
    Difference,
    Ratio,
}

impl FormulaKind {
    pub const ALL: [FormulaKind; 3] = [
        FormulaKind::None,
        FormulaKind::Difference,
        FormulaKind::Ratio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Difference => "difference",
            Self::Ratio => "ratio",
        }
    }

    /// Returns the combine operation for this formula, or `None` when no
    /// formula is selected.
    pub fn combine_op(self) -> Option<CombineOp> {
        match self {
            Self::None => None,
            Self::Difference => Some(CombineOp::Difference),
            Self::Ratio => Some(CombineOp::Ratio),
        }
    }
}

/// Operation applied by the formula combiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// `a - b`
    Difference,
    /// `a / b`
    Ratio,
}

/// Display theme stored with a view. Not interpreted by core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Error for unknown transform/formula/theme tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl Display for UnknownTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown {} `{}`; expected {}",
            self.kind, self.value, self.expected
        )
    }
}

impl Error for UnknownTagError {}

impl FromStr for TransformKind {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownTagError {
                kind: "transform",
                value: value.to_string(),
                expected: "raw|pct_change_mom|pct_change_yoy|index_100",
            })
    }
}

impl FromStr for FormulaKind {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownTagError {
                kind: "formula",
                value: value.to_string(),
                expected: "none|difference|ratio",
            })
    }
}

impl FromStr for Theme {
    type Err = UnknownTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownTagError {
                kind: "theme",
                value: value.to_string(),
                expected: "light|dark",
            }),
        }
    }
}

impl Display for TransformKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for FormulaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection state that drives one browse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSelection {
    /// Series shown, in selection order.
    pub selected_series: Vec<String>,
    pub transform: TransformKind,
    pub formula: FormulaKind,
    /// Right-hand operand of the formula; the left one is the first selected
    /// series.
    pub second_series: Option<String>,
}

/// Named, persisted bundle of user selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    #[serde(default)]
    pub selected_series: Vec<String>,
    #[serde(default)]
    pub transform: TransformKind,
    #[serde(default)]
    pub formula: FormulaKind,
    #[serde(default)]
    pub second_series: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

impl ViewConfig {
    /// Creates a configuration with default transform, formula and theme.
    pub fn new(name: impl Into<String>, selected_series: Vec<String>) -> Self {
        Self {
            name: name.into(),
            selected_series,
            transform: TransformKind::default(),
            formula: FormulaKind::default(),
            second_series: None,
            theme: Theme::default(),
        }
    }

    /// Returns the pipeline-driving part of this configuration.
    pub fn selection(&self) -> ViewSelection {
        ViewSelection {
            selected_series: self.selected_series.clone(),
            transform: self.transform,
            formula: self.formula,
            second_series: self.second_series.clone(),
        }
    }
}
