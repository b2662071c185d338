//! OpenAPI document assembled from module fragments

use inout_kernel::ModuleRegistry;
use serde_json::{json, Value};

/// Build the merged OpenAPI document for every registered module.
///
/// Module paths are relative to `/api`; their component schemas are merged
/// as-is, later modules overriding earlier ones on name clashes.
pub fn document(registry: &ModuleRegistry) -> Value {
    let mut spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "In-N-Out Books API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Book catalogue and login endpoints"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "enum": ["error"] },
            "status": { "type": "integer" },
            "message": { "type": "string" },
            "stack": {
                "type": "string",
                "description": "Only present in the development environment"
            }
        },
        "required": ["type", "status", "message"]
    });

    spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };

        if let Some(paths) = fragment.get("paths").and_then(Value::as_object) {
            for (path, item) in paths {
                spec["paths"][format!("/api{}", path)] = item.clone();
            }
        }

        if let Some(schemas) = fragment
            .pointer("/components/schemas")
            .and_then(Value::as_object)
        {
            for (name, schema) in schemas {
                spec["components"]["schemas"][name] = schema.clone();
            }
        }
    }

    spec
}

/// Check the merged document against utoipa's OpenAPI model.
pub fn validate(spec: &Value) -> Result<utoipa::openapi::OpenApi, serde_json::Error> {
    serde_json::from_value(spec.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use inout_kernel::Module;
    use std::sync::Arc;

    struct ShelfModule;

    #[async_trait]
    impl Module for ShelfModule {
        fn name(&self) -> &'static str {
            "shelf"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": {
                    "/shelves": {
                        "get": {
                            "summary": "List shelves",
                            "responses": { "200": { "description": "OK" } }
                        }
                    }
                },
                "components": {
                    "schemas": {
                        "Shelf": { "type": "object" }
                    }
                }
            }))
        }
    }

    #[test]
    fn module_paths_are_prefixed_with_api() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ShelfModule)).unwrap();

        let spec = document(&registry);
        assert!(spec["paths"]["/api/shelves"]["get"].is_object());
        assert!(spec["paths"]["/healthz"].is_object());
        assert!(spec["components"]["schemas"]["Shelf"].is_object());
        assert!(spec["components"]["schemas"]["ErrorResponse"].is_object());
    }

    #[test]
    fn merged_document_is_valid_openapi() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ShelfModule)).unwrap();

        assert!(validate(&document(&registry)).is_ok());
    }
}
