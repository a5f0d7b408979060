use serde::Deserialize;
use serde_json::Value;

use crate::utils::truncate_chars;

use super::transport::HttpResponse;
use super::{ApiPayload, FetchFailure};

/// Body excerpt kept on `Unexpected` failures.
pub const BODY_EXCERPT_CHARS: usize = 200;
/// Size of the pretty-printed payload preview shown to users.
pub const PREVIEW_CHARS: usize = 500;

/// Map a completed HTTP exchange onto the payload or a failure kind.
pub fn classify_response(response: HttpResponse) -> Result<ApiPayload, FetchFailure> {
    match response.status {
        200 => parse_payload(&response.body).ok_or_else(|| FetchFailure::Unexpected {
            status: Some(200),
            detail: format!(
                "response is not a JSON object: {}",
                truncate_chars(&response.body, BODY_EXCERPT_CHARS)
            ),
        }),
        401 => Err(FetchFailure::AuthError),
        403 => Err(FetchFailure::Forbidden),
        404 => Err(FetchFailure::NotFound),
        status => Err(FetchFailure::Unexpected {
            status: Some(status),
            detail: truncate_chars(&response.body, BODY_EXCERPT_CHARS),
        }),
    }
}

fn parse_payload(body: &str) -> Option<ApiPayload> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// One daily bar from the provider's `results` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateBar {
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", default)]
    pub volume: Option<f64>,
}

/// Decode the bars carried in a payload, skipping rows that do not fit the shape.
pub fn aggregate_bars(payload: &ApiPayload) -> Vec<AggregateBar> {
    let Some(rows) = payload.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut bars: Vec<AggregateBar> = rows
        .iter()
        .filter_map(|row| AggregateBar::deserialize(row).ok())
        .collect();
    bars.sort_by_key(|bar| bar.timestamp_ms);
    bars
}

pub fn response_keys(payload: &ApiPayload) -> Vec<&str> {
    payload.keys().map(String::as_str).collect()
}

/// Pretty JSON, cut to `PREVIEW_CHARS`.
pub fn payload_preview(payload: &ApiPayload) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
    truncate_chars(&pretty, PREVIEW_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ApiPayload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn ok_with_object_body_is_success() {
        let result = classify_response(HttpResponse::new(200, r#"{"ticker":"AAPL","results":[]}"#));
        let map = result.expect("object body");
        assert_eq!(map.get("ticker"), Some(&json!("AAPL")));
    }

    #[test]
    fn ok_with_empty_object_is_success() {
        let map = classify_response(HttpResponse::new(200, "{}")).expect("empty object");
        assert!(map.is_empty());
    }

    #[test]
    fn ok_with_garbage_or_non_object_is_unexpected() {
        for body in ["<html>oops</html>", "[1,2,3]", ""] {
            let err = classify_response(HttpResponse::new(200, body)).unwrap_err();
            assert!(
                matches!(err, FetchFailure::Unexpected { status: Some(200), .. }),
                "{body:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn provider_statuses_map_to_failure_kinds() {
        assert_eq!(
            classify_response(HttpResponse::new(401, "")).unwrap_err(),
            FetchFailure::AuthError
        );
        assert_eq!(
            classify_response(HttpResponse::new(403, "")).unwrap_err(),
            FetchFailure::Forbidden
        );
        assert_eq!(
            classify_response(HttpResponse::new(404, "")).unwrap_err(),
            FetchFailure::NotFound
        );
    }

    #[test]
    fn other_statuses_keep_status_and_body_excerpt() {
        let long_body = "x".repeat(BODY_EXCERPT_CHARS + 50);
        let err = classify_response(HttpResponse::new(429, long_body)).unwrap_err();
        match err {
            FetchFailure::Unexpected { status, detail } => {
                assert_eq!(status, Some(429));
                assert_eq!(detail.chars().count(), BODY_EXCERPT_CHARS + 3);
            }
            other => panic!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn decodes_and_sorts_aggregate_bars() {
        let map = payload(json!({
            "ticker": "AAPL",
            "results": [
                {"t": 1704326400000_i64, "o": 2.0, "h": 3.0, "l": 1.5, "c": 2.5, "v": 100.0},
                {"t": 1704240000000_i64, "o": 1.0, "h": 2.0, "l": 0.5, "c": 1.5},
                {"t": "bad"}
            ]
        }));

        let bars = aggregate_bars(&map);

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp_ms < bars[1].timestamp_ms);
        assert_eq!(bars[0].volume, None);
        assert_eq!(bars[1].volume, Some(100.0));
    }

    #[test]
    fn missing_results_yield_no_bars() {
        assert!(aggregate_bars(&payload(json!({"status": "OK"}))).is_empty());
    }

    #[test]
    fn preview_is_truncated() {
        let big: Vec<u32> = (0..500).collect();
        let preview = payload_preview(&payload(json!({ "results": big })));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }
}
