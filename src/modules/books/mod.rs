pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use inout_kernel::{InitCtx, Module};
use serde_json::json;

use crate::utils;
use store::SharedBookStore;

/// Book catalogue: CRUD over the injected store.
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new(store: SharedBookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.find().await?;
        tracing::info!(
            target: "project.modules",
            prefix = %utils::log_prefix(self.name()),
            environment = ?ctx.settings.environment,
            books = books.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        });
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "description": "Book identifier",
            "schema": { "type": "string" }
        });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": { "description": "Storage failure", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/CreatedBook" }
                                    }
                                }
                            },
                            "400": { "description": "Key set is not exactly id, title, author", "content": error },
                            "409": { "description": "Book id already taken", "content": error }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": { "description": "Id is not a number", "content": error },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Update a book's title and author",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPatch" }
                                }
                            }
                        },
                        "responses": {
                            "204": { "description": "Book updated" },
                            "400": { "description": "Id is not a number or key set is not exactly title, author", "content": error },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": { "description": "Book not found", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" }
                        },
                        "required": ["id", "title", "author"],
                        "additionalProperties": false
                    },
                    "BookPatch": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" }
                        },
                        "required": ["title", "author"],
                        "additionalProperties": false
                    },
                    "CreatedBook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedBookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
