//! Request decoding failures as domain errors.
//!
//! Actix answers malformed bodies, queries and paths with plain-text 400s by
//! default. These configs route them through [`Error`] so every failure uses
//! the same JSON shape and carries the trace id.

use std::fmt::Display;

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

fn decode_error(source: &'static str, err: impl Display) -> actix_web::Error {
    debug!(source, error = %err, "request decoding failed");
    Error::invalid_request(format!("invalid {source}: {err}"))
        .with_details(json!({ "field": source, "code": "malformed" }))
        .into()
}

/// JSON body decoding.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| decode_error("body", err))
}

/// URL-encoded form decoding.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| decode_error("form", err))
}

/// Query string decoding.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| decode_error("query", err))
}

/// Path segment decoding.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| decode_error("path", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct Body {
        #[expect(dead_code, reason = "decoded only to exercise the extractor")]
        name: String,
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_uses_error_schema() {
        let app = actix_test::init_service(App::new().app_data(json_config()).route(
            "/",
            web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok().finish() }),
        ))
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["field"], "body");
    }

    #[rstest]
    #[actix_web::test]
    async fn non_numeric_path_id_is_bad_request() {
        let app = actix_test::init_service(App::new().app_data(path_config()).route(
            "/item/{id}",
            web::get().to(|_: web::Path<i32>| async { HttpResponse::Ok().finish() }),
        ))
        .await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/item/abc").to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], "path");
    }
}
