//! Call-setup endpoint.
//!
//! Answers the telephony provider's call webhook with an XML document that
//! directs the call's media stream at this host's `/media-stream`
//! WebSocket. Accepts any HTTP method — providers differ on GET vs POST.

use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};

/// Handle an incoming-call webhook.
pub async fn incoming_call(headers: HeaderMap) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Connect>
        <Stream url="wss://{host}/media-stream" />
    </Connect>
</Response>"#
    );

    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}
