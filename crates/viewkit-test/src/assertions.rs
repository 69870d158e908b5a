//! Assertions over [`TestResponse`]s.
//!
//! Each helper panics with the actual status, header or body so a failing
//! test shows what the view produced.

use crate::client::TestResponse;

/// Asserts the status code.
///
/// # Panics
///
/// Panics if the status differs.
pub fn assert_status(response: &TestResponse, expected: u16) {
    assert_eq!(
        response.status_code(),
        expected,
        "Expected status {expected}, got {}.\nBody: {}",
        response.status_code(),
        response.text()
    );
}

/// Asserts that the body contains `text`.
///
/// # Panics
///
/// Panics if `text` is missing.
pub fn assert_contains(response: &TestResponse, text: &str) {
    let body = response.text();
    assert!(
        body.contains(text),
        "Response body does not contain '{text}'.\nActual body: {body}"
    );
}

/// Asserts that the body does not contain `text`.
///
/// # Panics
///
/// Panics if `text` is present.
pub fn assert_not_contains(response: &TestResponse, text: &str) {
    let body = response.text();
    assert!(
        !body.contains(text),
        "Response body unexpectedly contains '{text}'.\nActual body: {body}"
    );
}

/// Asserts a 302 redirect to `expected_url`.
///
/// # Panics
///
/// Panics if the status is not 302 or `Location` differs.
pub fn assert_redirects(response: &TestResponse, expected_url: &str) {
    assert_status(response, 302);
    let location = response
        .location()
        .unwrap_or_else(|| panic!("Redirect response missing Location header"));
    assert_eq!(
        location, expected_url,
        "Expected redirect to '{expected_url}', got '{location}'"
    );
}

/// Asserts that the body shows `error` and that the form was re-rendered
/// rather than redirected.
///
/// # Panics
///
/// Panics if the status is not 200 or the message is missing.
pub fn assert_form_error(response: &TestResponse, field: &str, error: &str) {
    assert_status(response, 200);
    let body = response.text();
    assert!(
        body.contains(error),
        "Expected form error '{error}' for field '{field}'.\nActual body: {body}"
    );
}

/// Asserts that a header is present.
///
/// # Panics
///
/// Panics if the header is missing.
pub fn assert_has_header(response: &TestResponse, name: &str) {
    assert!(
        response.has_header(name),
        "Expected response to have header '{name}'"
    );
}

/// Asserts the JSON body equals `expected`.
///
/// # Panics
///
/// Panics if the body is not JSON or differs.
pub fn assert_json_eq(response: &TestResponse, expected: &serde_json::Value) {
    let actual: serde_json::Value = response
        .json()
        .unwrap_or_else(|e| panic!("Response is not JSON ({e}): {}", response.text()));
    assert_eq!(&actual, expected, "JSON body mismatch");
}
