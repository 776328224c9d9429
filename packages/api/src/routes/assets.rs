//! Embedded single-page-app bundle.
//!
//! `web-dist/` is compiled into the binary. Paths that name no asset and do not
//! end in a known file extension are client-side routes and get `index.html`.

use axum::{
    http::{header, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::error::ApiError;

const INDEX: &str = "index.html";

#[derive(RustEmbed)]
#[folder = "web-dist"]
struct WebDist;

pub async fn serve(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { INDEX } else { path };

    if let Some(response) = embedded(path) {
        return response;
    }
    if !names_a_file(path) {
        if let Some(response) = embedded(INDEX) {
            return response;
        }
    }
    ApiError::NotFound.into_response()
}

/// Whether the last segment carries an extension of a known file type.
fn names_a_file(path: &str) -> bool {
    mime_guess::from_path(path).first().is_some()
}

fn embedded(path: &str) -> Option<Response> {
    let file = WebDist::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(([(header::CONTENT_TYPE, mime.essence_str())], file.data).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_a_file() {
        assert!(names_a_file("assets/index.js"));
        assert!(names_a_file("x.png"));
        assert!(!names_a_file(""));
        assert!(!names_a_file("notes/today"));
        assert!(!names_a_file("notes/v1.2"));
        assert!(!names_a_file("notes/v1.2/today"));
    }
}
