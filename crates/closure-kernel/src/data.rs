//! Tagged CLOSURE payloads.
//!
//! Each producing operation hands its table over wrapped in the variant that
//! names it. The variant is the tag: a [`ClosureData::Combine`] cannot exist
//! without somebody having declared "this came from `closure_combine`".
//! Whether the shape still honours that declaration is what the checks in
//! [`crate::combine`] and [`crate::views`] decide.

use crate::column::{Column, ElementType};
use crate::failure::ClosureFailure;
use crate::scalar::{check_scale, check_value};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Runtime tag of a CLOSURE payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosureClass {
    ClosureCombineResult,
    ClosurePivotLongerResult,
    ClosureSummarizeResult,
}

impl ClosureClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::ClosureCombineResult => "ClosureCombineResult",
            Self::ClosurePivotLongerResult => "ClosurePivotLongerResult",
            Self::ClosureSummarizeResult => "ClosureSummarizeResult",
        }
    }

    /// The operation whose output carries this tag.
    pub fn producer(self) -> &'static str {
        match self {
            Self::ClosureCombineResult => "closure_combine",
            Self::ClosurePivotLongerResult => "closure_pivot_longer",
            Self::ClosureSummarizeResult => "closure_summarize",
        }
    }
}

impl std::fmt::Display for ClosureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ClosureClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClosureCombineResult" | "combine" => Ok(Self::ClosureCombineResult),
            "ClosurePivotLongerResult" | "pivot_longer" => Ok(Self::ClosurePivotLongerResult),
            "ClosureSummarizeResult" | "summarize" => Ok(Self::ClosureSummarizeResult),
            _ => Err(format!("unknown closure class: {s}")),
        }
    }
}

/// Inputs a combine producer may record next to its results.
///
/// Knowing the scale bounds fixes the number of `n<i>` columns independently
/// of what the table currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosureInputs {
    pub mean: f64,
    pub sd: f64,
    pub n: i32,
    pub scale_min: i32,
    pub scale_max: i32,
}

impl ClosureInputs {
    /// Number of scale categories, i.e. of `n<i>` columns in a combine table.
    pub fn categories(&self) -> usize {
        let width = i64::from(self.scale_max) - i64::from(self.scale_min) + 1;
        usize::try_from(width).unwrap_or(0)
    }

    /// Scale range and mean placement.
    pub fn validate(&self) -> Result<(), ClosureFailure> {
        check_scale(
            f64::from(self.scale_min),
            f64::from(self.scale_max),
            Some(self.mean),
        )
    }

    /// Build inputs from untyped arguments, checking each one by name.
    ///
    /// `mean` and `sd` may be any number; `n`, `scale_min`, and `scale_max`
    /// must be integers. An absent argument, `null`, or an array of only
    /// `null`s carries no type of its own and is read as missing values of
    /// the first allowed type. The scale is validated last.
    pub fn from_arguments(args: &Map<String, Value>) -> Result<Self, ClosureFailure> {
        let arg = |name: &str, allowed: &[ElementType]| -> Result<Column, ClosureFailure> {
            let fallback = allowed.first().copied().unwrap_or(ElementType::Logical);
            let column = match args.get(name) {
                None | Some(Value::Null) => Column::missing(fallback),
                Some(Value::Array(items)) if items.iter().all(Value::is_null) => {
                    Column::all_missing(fallback, items.len())
                }
                Some(value) => Column::from_json(value),
            };
            check_value(&column, allowed, name)?;
            Ok(column)
        };
        let integer: &[ElementType] = &[ElementType::Integer];

        let inputs = Self {
            mean: scalar_f64(&arg("mean", ElementType::NUMERIC)?),
            sd: scalar_f64(&arg("sd", ElementType::NUMERIC)?),
            n: scalar_i32(&arg("n", integer)?),
            scale_min: scalar_i32(&arg("scale_min", integer)?),
            scale_max: scalar_i32(&arg("scale_max", integer)?),
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

// Callers run `check_value` first; the fallbacks are unreachable.
fn scalar_f64(column: &Column) -> f64 {
    match column {
        Column::Integer(v) => v.first().copied().flatten().map_or(f64::NAN, f64::from),
        Column::Double(v) => v.first().copied().flatten().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn scalar_i32(column: &Column) -> i32 {
    column
        .as_integers()
        .and_then(|v| v.first().copied().flatten())
        .unwrap_or_default()
}

/// A table together with the tag of the operation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum ClosureData {
    /// Wide results: one row per distribution, columns `n1..nk`.
    #[serde(rename = "ClosureCombineResult")]
    Combine {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inputs: Option<ClosureInputs>,
        table: Table,
    },

    /// Long-format view with a nested `results` table of `(n, value)`.
    #[serde(rename = "ClosurePivotLongerResult")]
    PivotLonger { results: Table },

    /// Frequency table `(value, f_absolute, f_relative)`.
    #[serde(rename = "ClosureSummarizeResult")]
    Summarize { table: Table },

    /// A table without any CLOSURE tag.
    #[serde(rename = "data.frame")]
    Plain { table: Table },
}

/// Attach the tag for `class` to `table`.
pub fn add_class(table: Table, class: ClosureClass) -> ClosureData {
    match class {
        ClosureClass::ClosureCombineResult => ClosureData::Combine {
            inputs: None,
            table,
        },
        ClosureClass::ClosurePivotLongerResult => ClosureData::PivotLonger { results: table },
        ClosureClass::ClosureSummarizeResult => ClosureData::Summarize { table },
    }
}

impl ClosureData {
    /// A value with no tag at all.
    pub fn plain(table: Table) -> Self {
        Self::Plain { table }
    }

    pub fn class(&self) -> Option<ClosureClass> {
        match self {
            Self::Combine { .. } => Some(ClosureClass::ClosureCombineResult),
            Self::PivotLonger { .. } => Some(ClosureClass::ClosurePivotLongerResult),
            Self::Summarize { .. } => Some(ClosureClass::ClosureSummarizeResult),
            Self::Plain { .. } => None,
        }
    }

    pub fn has_class(&self, class: ClosureClass) -> bool {
        self.class() == Some(class)
    }

    /// The payload table; for long-format data, the nested `results`.
    pub fn table(&self) -> &Table {
        match self {
            Self::Combine { table, .. } | Self::Summarize { table } | Self::Plain { table } => {
                table
            }
            Self::PivotLonger { results } => results,
        }
    }

    pub fn inputs(&self) -> Option<&ClosureInputs> {
        match self {
            Self::Combine { inputs, .. } => inputs.as_ref(),
            _ => None,
        }
    }

    /// Record producer inputs. Only combine results carry them.
    pub fn with_inputs(self, inputs: ClosureInputs) -> Self {
        match self {
            Self::Combine { table, .. } => Self::Combine {
                inputs: Some(inputs),
                table,
            },
            other => other,
        }
    }

    /// Drop the tag, keeping the payload table.
    pub fn into_table(self) -> Table {
        match self {
            Self::Combine { table, .. } | Self::Summarize { table } | Self::Plain { table } => {
                table
            }
            Self::PivotLonger { results } => results,
        }
    }
}

impl AsRef<Table> for ClosureData {
    fn as_ref(&self) -> &Table {
        self.table()
    }
}

impl AsRef<Table> for Table {
    fn as_ref(&self) -> &Table {
        self
    }
}
