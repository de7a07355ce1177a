use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Receipt documents embed their own stylesheet and an inline data: logo.
fn is_document_route(path: &str) -> bool {
    path.starts_with("/receipts") || path.ends_with("/receipt")
}

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let is_document = is_document_route(req.uri().path());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );

    if is_document {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static(
                "default-src 'none'; style-src 'unsafe-inline'; img-src data:; frame-ancestors 'none'",
            ),
        );
    } else {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_routes_are_documents() {
        assert!(is_document_route("/receipts"));
        assert!(is_document_route("/transactions/abc/receipt"));
        assert!(!is_document_route("/transactions"));
    }
}
