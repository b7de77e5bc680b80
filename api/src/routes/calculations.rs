//! Routes for the calculator API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use crate::models::{
    Calculation, CalculationError, CalculationResponse, FailedCalculation, MathOp,
};
use crate::utils::AppState;

/// The fixed divide by zero message
pub const DIVIDE_BY_ZERO: &str = "you cannot divide by zero";

/// Compute one operation and run it through the persistence pipeline
///
/// A domain error is itself persisted as an error record and returned as a
/// 400; persistence problems only ever change the storage annotations on
/// the response, never the status code of a domain level success.
///
/// # Arguments
///
/// * `op` - The operation to apply
/// * `a` - The left operand
/// * `b` - The right operand
/// * `state` - Shared Matsight objects
async fn calculate(op: MathOp, a: i64, b: i64, state: &AppState) -> Response {
    match op.apply(a, b) {
        Some(result) => {
            let calc = Calculation {
                operation: op,
                a,
                b,
                result,
            };
            // the domain result is already in hand; persistence can only annotate it
            let outcome = calc.persist(&state.shared).await;
            Json(CalculationResponse::new(calc, outcome)).into_response()
        }
        None => {
            let failure = FailedCalculation {
                operation: op,
                a,
                b,
                error: DIVIDE_BY_ZERO.to_owned(),
            };
            // domain errors get persisted through the same pipeline
            let outcome = failure.persist(&state.shared).await;
            (
                StatusCode::BAD_REQUEST,
                Json(CalculationError::new(DIVIDE_BY_ZERO, outcome)),
            )
                .into_response()
        }
    }
}

/// Adds two integers
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `a` - The left operand
/// * `b` - The right operand
#[utoipa::path(
    get,
    path = "/add/{a}/{b}",
    params(
        ("a" = i64, Path, description = "The left operand"),
        ("b" = i64, Path, description = "The right operand"),
    ),
    responses(
        (status = 200, description = "The sum and its storage status", body = CalculationResponse),
    )
)]
#[instrument(name = "routes::calculations::add", skip(state))]
async fn add(State(state): State<AppState>, Path((a, b)): Path<(i64, i64)>) -> Response {
    calculate(MathOp::Addition, a, b, &state).await
}

/// Subtracts two integers
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `a` - The left operand
/// * `b` - The right operand
#[utoipa::path(
    get,
    path = "/subtract/{a}/{b}",
    params(
        ("a" = i64, Path, description = "The left operand"),
        ("b" = i64, Path, description = "The right operand"),
    ),
    responses(
        (status = 200, description = "The difference and its storage status", body = CalculationResponse),
    )
)]
#[instrument(name = "routes::calculations::subtract", skip(state))]
async fn subtract(State(state): State<AppState>, Path((a, b)): Path<(i64, i64)>) -> Response {
    calculate(MathOp::Subtraction, a, b, &state).await
}

/// Multiplies two integers
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `a` - The left operand
/// * `b` - The right operand
#[utoipa::path(
    get,
    path = "/multiply/{a}/{b}",
    params(
        ("a" = i64, Path, description = "The left operand"),
        ("b" = i64, Path, description = "The right operand"),
    ),
    responses(
        (status = 200, description = "The product and its storage status", body = CalculationResponse),
    )
)]
#[instrument(name = "routes::calculations::multiply", skip(state))]
async fn multiply(State(state): State<AppState>, Path((a, b)): Path<(i64, i64)>) -> Response {
    calculate(MathOp::Multiplication, a, b, &state).await
}

/// Divides two integers with true division
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `a` - The left operand
/// * `b` - The right operand
#[utoipa::path(
    get,
    path = "/divide/{a}/{b}",
    params(
        ("a" = i64, Path, description = "The left operand"),
        ("b" = i64, Path, description = "The right operand"),
    ),
    responses(
        (status = 200, description = "The quotient and its storage status", body = CalculationResponse),
        (status = 400, description = "The divisor was zero", body = CalculationError),
    )
)]
#[instrument(name = "routes::calculations::divide", skip(state))]
async fn divide(State(state): State<AppState>, Path((a, b)): Path<(i64, i64)>) -> Response {
    calculate(MathOp::Division, a, b, &state).await
}

/// Add the calculator routes to our router
///
/// # Arguments
///
/// * `router` - The router to add routes too
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/add/{a}/{b}", get(add))
        .route("/subtract/{a}/{b}", get(subtract))
        .route("/multiply/{a}/{b}", get(multiply))
        .route("/divide/{a}/{b}", get(divide))
}
