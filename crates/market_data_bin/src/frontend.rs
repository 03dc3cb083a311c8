use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use std::fs;
use std::path::Path;

pub const FRONTEND_FILE: &str = "index.html";

const MISSING_FRAGMENT: &str = "<h1>Error: Frontend file not found</h1>\
<p>Please make sure 'index.html' is in the working directory.</p>";

/// Reads the page fresh from disk on every request. A missing file is a 404
/// with a fixed fragment, never a panic.
pub fn render(path: &Path) -> HttpResponse {
    match fs::read_to_string(path) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(_) => HttpResponse::NotFound()
            .content_type(ContentType::html())
            .body(MISSING_FRAGMENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use std::env;

    #[actix_web::test]
    async fn render_pass_serves_raw_contents() {
        let path = env::temp_dir().join("frontend_render_test.html");
        fs::write(&path, "<html><body>signal app</body></html>").unwrap();

        let response = render(&path);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, "<html><body>signal app</body></html>".as_bytes());

        fs::remove_file(&path).ok();
    }

    #[actix_web::test]
    async fn render_fail_missing_file_is_404_fragment() {
        let response = render(Path::new("does_not_exist_anywhere.html"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("Frontend file not found"));
    }
}
