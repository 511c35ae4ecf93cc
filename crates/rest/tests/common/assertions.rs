//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}: {}",
        expected,
        actual,
        response.text()
    );
}

/// Asserts that the response is an error with the given code.
pub fn assert_error_code(response: &TestResponse, status: u16, code: &str) {
    assert_status(response, status);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], code, "unexpected error body: {}", body);
}

/// Asserts that the response has a Location header ending with `suffix`.
pub fn assert_location_ends_with(response: &TestResponse, suffix: &str) {
    let location = response
        .headers()
        .get("location")
        .expect("Expected Location header");
    let location = location.to_str().expect("Location is not ASCII");
    assert!(
        location.ends_with(suffix),
        "Location {} does not end with {}",
        location,
        suffix
    );
}

/// Returns the `items` array of a page body.
pub fn page_items(body: &Value) -> &Vec<Value> {
    body["items"].as_array().expect("page has no items array")
}
