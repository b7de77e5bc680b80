//! Tests the calculator routes

use axum::http::StatusCode;

mod utils;

#[tokio::test]
async fn add_returns_the_sum() {
    let (status, body) = utils::get(utils::app(), "/add/10/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "addition");
    assert_eq!(body["a"], 10);
    assert_eq!(body["b"], 5);
    assert_eq!(body["result"], 15);
    // storage is disabled in tests, so the domain result is annotated, not blocked
    assert_eq!(body["storage_status"], "unavailable");
}

#[tokio::test]
async fn subtract_returns_the_difference() {
    let (status, body) = utils::get(utils::app(), "/subtract/10/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "subtraction");
    assert_eq!(body["result"], 5);
}

#[tokio::test]
async fn multiply_returns_the_product() {
    let (status, body) = utils::get(utils::app(), "/multiply/10/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "multiplication");
    assert_eq!(body["result"], 50);
}

#[tokio::test]
async fn divide_is_true_division() {
    let (status, body) = utils::get(utils::app(), "/divide/10/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"], "division");
    assert_eq!(body["result"], 2.5);
}

#[tokio::test]
async fn negative_operands_are_accepted() {
    let (status, body) = utils::get(utils::app(), "/add/-3/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], 2);
}

#[tokio::test]
async fn divide_by_zero_is_always_a_400() {
    // the fixed message holds for any numerator, even with storage down
    for a in ["10", "0", "-7"] {
        let (status, body) = utils::get(utils::app(), &format!("/divide/{a}/0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "you cannot divide by zero");
        assert_eq!(body["storage_status"], "unavailable");
    }
}

#[tokio::test]
async fn non_integer_operands_are_rejected() {
    let (status, _) = utils::get(utils::app(), "/add/1.5/2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = utils::get(utils::app(), "/add/ten/5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
