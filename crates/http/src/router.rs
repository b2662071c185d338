//! Router builder for the HTTP server
//!
//! Routes are collected first; middleware is applied in `build` so that every
//! route and the fallback sit behind the same layers.

use axum::{
    http::StatusCode,
    middleware::{map_response, map_response_with_state},
    routing::{get, MethodRouter},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::SetRequestIdLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::{expose_stack, route_not_found, timeout_as_error, StackTraces},
    MakeRequestUuid,
};

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
    api: Router,
    api_mounted: bool,
    stack_traces: StackTraces,
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            api: Router::new(),
            api_mounted: false,
            stack_traces: StackTraces::Hide,
            tracing: false,
            cors: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Add a route at the site root
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Merge a router at the site root
    pub fn merge(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Add a module's routes to the `/api` tree
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        tracing::info!(module = module_name, "mounting module routes under /api");
        self.api = self.api.merge(module_router);
        self.api_mounted = true;
        self
    }

    /// Serve the given OpenAPI document at `/docs/openapi.json`
    pub fn with_openapi(mut self, spec: serde_json::Value) -> Self {
        if let Err(err) = crate::openapi::validate(&spec) {
            tracing::warn!(error = %err, "merged OpenAPI document failed validation");
        }

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(spec.clone()) }),
        );
        self
    }

    /// Choose whether error bodies carry their stack
    pub fn with_stack_traces(mut self, mode: StackTraces) -> Self {
        self.stack_traces = mode;
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware; `None` leaves requests unbounded
    pub fn with_timeout(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout = timeout_ms.map(Duration::from_millis);
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = self.router;
        if self.api_mounted {
            router = router.nest("/api", self.api);
        }

        // Unknown paths and known paths with an unsupported method both 404.
        let mut router = router
            .fallback(route_not_found)
            .method_not_allowed_fallback(route_not_found);

        // Inside the stack responder so a timeout renders like any other error.
        if let Some(timeout) = self.timeout {
            router = router
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    timeout,
                ))
                .layer(map_response(timeout_as_error));
        }

        let mut router = router.layer(map_response_with_state(self.stack_traces, expose_stack));
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }
        if self.request_id {
            router = router.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
