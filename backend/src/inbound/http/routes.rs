//! Route table for the HTTP API.
//!
//! [`configure`] registers every handler and the extractor error configs.
//! Callers supply `web::Data<HttpState>` and `web::Data<HealthState>`, and
//! wrap the app in [`AuthGate`](super::auth_gate::AuthGate) and
//! [`Trace`](crate::Trace).

use actix_web::web;

use super::validation::{form_config, json_config, path_config, query_config};
use super::{articles, auth, categories, health, users};

/// Register all routes on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog_backend::inbound::http::routes::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(auth::login)
        .service(auth::login_form)
        .service(auth::logout)
        .service(users::register)
        .service(users::send_test_email)
        .service(categories::create_category)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::delete_category)
        .service(articles::create_article)
        .service(articles::list_articles)
        .service(articles::get_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .service(health::ready)
        .service(health::live);
}
