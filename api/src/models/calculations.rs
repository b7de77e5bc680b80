//! Models for the calculator API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PersistOutcome, StorageStatus};

/// The arithmetic operations the calculator supports
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MathOp {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

/// The value an operation produced
///
/// Division is true division, so its result is a float while the other
/// operations stay integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CalcValue {
    Int(i64),
    Float(f64),
}

impl MathOp {
    /// Apply this operation to two operands
    ///
    /// Returns None on divide by zero; that is a domain error, never a panic.
    ///
    /// # Arguments
    ///
    /// * `a` - The left operand
    /// * `b` - The right operand
    #[must_use]
    pub fn apply(self, a: i64, b: i64) -> Option<CalcValue> {
        match self {
            MathOp::Addition => Some(CalcValue::Int(a + b)),
            MathOp::Subtraction => Some(CalcValue::Int(a - b)),
            MathOp::Multiplication => Some(CalcValue::Int(a * b)),
            MathOp::Division => {
                if b == 0 {
                    None
                } else {
                    Some(CalcValue::Float(a as f64 / b as f64))
                }
            }
        }
    }
}

/// A computed calculation ready to persist and return
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Calculation {
    /// The operation that was applied
    pub operation: MathOp,
    /// The left operand
    pub a: i64,
    /// The right operand
    pub b: i64,
    /// The value the operation produced
    pub result: CalcValue,
}

/// A calculation whose domain logic rejected its inputs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FailedCalculation {
    /// The operation that was attempted
    pub operation: MathOp,
    /// The left operand
    pub a: i64,
    /// The right operand
    pub b: i64,
    /// Why the operation was rejected
    pub error: String,
}

/// The calculator response body
#[derive(Debug, Serialize, ToSchema)]
pub struct CalculationResponse {
    /// The operation that was applied
    pub operation: MathOp,
    /// The left operand
    pub a: i64,
    /// The right operand
    pub b: i64,
    /// The value the operation produced
    pub result: CalcValue,
    /// What happened to the persistence attempt
    pub storage_status: StorageStatus,
    /// The storage error if persistence failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl CalculationResponse {
    /// Build a response from a calculation and its persistence outcome
    ///
    /// # Arguments
    ///
    /// * `calc` - The computed calculation
    /// * `outcome` - What happened when we tried to persist it
    #[must_use]
    pub fn new(calc: Calculation, outcome: PersistOutcome) -> Self {
        let (storage_status, storage_error) = outcome.into_parts();
        CalculationResponse {
            operation: calc.operation,
            a: calc.a,
            b: calc.b,
            result: calc.result,
            storage_status,
            storage_error,
        }
    }
}

/// The calculator domain error body
#[derive(Debug, Serialize, ToSchema)]
pub struct CalculationError {
    /// Why the operation was rejected
    pub error: String,
    /// What happened to the persistence attempt
    pub storage_status: StorageStatus,
    /// The storage error if persistence failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl CalculationError {
    /// Build a domain error body from a message and a persistence outcome
    ///
    /// # Arguments
    ///
    /// * `error` - The domain error message
    /// * `outcome` - What happened when we tried to persist it
    #[must_use]
    pub fn new(error: &str, outcome: PersistOutcome) -> Self {
        let (storage_status, storage_error) = outcome.into_parts();
        CalculationError {
            error: error.to_owned(),
            storage_status,
            storage_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_matches_arithmetic() {
        assert_eq!(MathOp::Addition.apply(10, 5), Some(CalcValue::Int(15)));
        assert_eq!(MathOp::Subtraction.apply(10, 5), Some(CalcValue::Int(5)));
        assert_eq!(
            MathOp::Multiplication.apply(10, 5),
            Some(CalcValue::Int(50))
        );
        assert_eq!(MathOp::Division.apply(10, 4), Some(CalcValue::Float(2.5)));
    }

    #[test]
    fn divide_by_zero_is_a_domain_error() {
        for a in [-7, 0, 10, i64::MAX] {
            assert_eq!(MathOp::Division.apply(a, 0), None);
        }
    }

    #[test]
    fn values_serialize_as_bare_numbers() {
        // integral results must not pick up a float suffix
        assert_eq!(serde_json::to_string(&CalcValue::Int(15)).unwrap(), "15");
        assert_eq!(
            serde_json::to_string(&CalcValue::Float(2.5)).unwrap(),
            "2.5"
        );
    }

    #[test]
    fn operations_display_as_their_wire_names() {
        assert_eq!(MathOp::Addition.to_string(), "addition");
        assert_eq!(MathOp::Division.to_string(), "division");
    }
}
