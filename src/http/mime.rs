//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Content type for extensions missing from the table
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension (without the leading dot)
///
/// Matching is case-insensitive.
///
/// # Examples
/// ```
/// use statik::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("HTML")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("mp4")), "application/octet-stream");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(extension) = extension else {
        return DEFAULT_CONTENT_TYPE;
    };

    match extension.to_ascii_lowercase().as_str() {
        // Text
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",

        // Scripts and data
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",

        // Images
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",

        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css; charset=utf-8");
        assert_eq!(
            get_content_type(Some("js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(
            get_content_type(Some("json")),
            "application/json; charset=utf-8"
        );
        assert_eq!(get_content_type(Some("svg")), "image/svg+xml");
        assert_eq!(get_content_type(Some("png")), "image/png");
        assert_eq!(get_content_type(Some("jpg")), "image/jpeg");
        assert_eq!(get_content_type(Some("jpeg")), "image/jpeg");
        assert_eq!(get_content_type(Some("txt")), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(get_content_type(Some("PNG")), "image/png");
        assert_eq!(get_content_type(Some("Jpeg")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("bin")), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type(Some("htm")), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type(Some("")), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type(None), DEFAULT_CONTENT_TYPE);
    }
}
