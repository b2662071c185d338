use std::sync::Arc;

use async_trait::async_trait;
use axum::{response::Html, routing::get, Router};
use inout_kernel::Module;

const LANDING_PAGE: &str = include_str!("landing.html");

/// Static landing page served at `/`.
pub struct HomeModule;

impl HomeModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn root_routes(&self) -> Router {
        Router::new().route("/", get(landing_page))
    }
}

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Create a new instance of the home module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(HomeModule::new())
}
