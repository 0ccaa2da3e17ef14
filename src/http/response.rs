//! HTTP response building module
//!
//! Provides builders for the responses the file server emits, decoupled from the
//! file lookup logic.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};

/// Response body shared by fixed messages and streamed files
pub type ServeBody = UnsyncBoxBody<Bytes, std::io::Error>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

pub const FORBIDDEN_BODY: &str = "Forbidden";
pub const NOT_FOUND_BODY: &str = "Not found";
pub const READ_ERROR_BODY: &str = "Read error";

/// Fixed in-memory body
pub fn full_body(text: &'static str) -> ServeBody {
    Full::new(Bytes::from_static(text.as_bytes()))
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build 403 Forbidden response; no content type is set
pub fn build_403_response() -> Response<ServeBody> {
    Response::builder()
        .status(StatusCode::FORBIDDEN)
        .body(full_body(FORBIDDEN_BODY))
        .unwrap_or_else(|e| {
            log_build_error("403", &e);
            Response::new(full_body(FORBIDDEN_BODY))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ServeBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .body(full_body(NOT_FOUND_BODY))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full_body(NOT_FOUND_BODY))
        })
}

/// Build 500 response for a file that failed before any byte was sent
///
/// The content type chosen for the file is kept.
pub fn build_500_response(content_type: &str) -> Response<ServeBody> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, content_type)
        .body(full_body(READ_ERROR_BODY))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(full_body(READ_ERROR_BODY))
        })
}

/// Build 200 response streaming `body`
///
/// No Content-Length is sent: the body is chunked so a late read failure can
/// still terminate it.
pub fn build_file_response<B>(content_type: &str, body: B) -> Response<ServeBody>
where
    B: Body<Data = Bytes, Error = std::io::Error> + Send + 'static,
{
    match Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(())
    {
        Ok(head) => head.map(|()| body.boxed_unsync()),
        Err(e) => {
            log_build_error("200", &e);
            build_500_response(content_type)
        }
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(resp: Response<ServeBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_403_has_no_content_type() {
        let resp = build_403_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(body_text(resp).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_404_is_plain_text() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], TEXT_PLAIN);
        assert_eq!(body_text(resp).await, "Not found");
    }

    #[tokio::test]
    async fn test_500_keeps_file_content_type() {
        let resp = build_500_response("image/png");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
        assert_eq!(body_text(resp).await, "Read error");
    }

    #[tokio::test]
    async fn test_file_response_is_chunked() {
        let body = Full::new(Bytes::from_static(b"a{}"))
            .map_err(|never| -> std::io::Error { match never {} });
        let resp = build_file_response("application/json; charset=utf-8", body);
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(hyper::header::CONTENT_LENGTH).is_none());
        assert_eq!(body_text(resp).await, "a{}");
    }
}
