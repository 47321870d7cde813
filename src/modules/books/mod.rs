pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use folio_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use store::SharedStore;

/// Module serving CRUD over the `books` table
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            in_memory = ctx.settings.database.in_memory,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books
                (
                    id BIGSERIAL,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    publisher TEXT NOT NULL,
                    date TEXT NOT NULL,
                    rating INTEGER NOT NULL DEFAULT 0,
                    status TEXT NOT NULL,
                    CONSTRAINT books_pkey PRIMARY KEY (id)
                );
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn json_body(schema: &str) -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });
    let text = |description: &str| json!({ "type": "string", "minLength": 1, "description": description });

    json!({
        "paths": {
            "/books": {
                "get": {
                    "summary": "List books ordered by id",
                    "tags": ["Books"],
                    "parameters": [
                        { "name": "start", "in": "query", "required": false, "schema": { "type": "integer", "minimum": 0 } },
                        { "name": "count", "in": "query", "required": false, "schema": { "type": "integer", "minimum": 0 } }
                    ],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        },
                        "400": error_response("Malformed query"),
                        "500": error_response("Storage failure")
                    }
                }
            },
            "/book": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": json_body("NewBook"),
                    "responses": {
                        "201": book_response("Created book"),
                        "400": error_response("Malformed or invalid payload"),
                        "500": error_response("Storage failure")
                    }
                }
            },
            "/book/{id}": {
                "get": {
                    "summary": "Fetch a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": book_response("The book"),
                        "400": error_response("Invalid book ID"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage failure")
                    }
                },
                "put": {
                    "summary": "Update a book with the provided fields",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": json_body("BookPatch"),
                    "responses": {
                        "200": book_response("Updated book"),
                        "400": error_response("Malformed or invalid payload"),
                        "404": error_response("Book not found"),
                        "500": error_response("Storage failure")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "200": {
                            "description": "Deleted, or nothing to delete",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "result": { "type": "string" } },
                                        "required": ["result"]
                                    }
                                }
                            }
                        },
                        "400": error_response("Invalid book ID"),
                        "500": error_response("Storage failure")
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
                        "title": text("Title of the book"),
                        "author": text("Author of the book"),
                        "publisher": text("Publisher of the book"),
                        "date": text("Publication date"),
                        "rating": { "type": "integer", "default": 0 },
                        "status": text("Circulation status, e.g. CheckedOut")
                    },
                    "required": ["id", "title", "author", "publisher", "date", "rating", "status"]
                },
                "NewBook": {
                    "type": "object",
                    "properties": {
                        "title": text("Title of the book"),
                        "author": text("Author of the book"),
                        "publisher": text("Publisher of the book"),
                        "date": text("Publication date"),
                        "rating": { "type": "integer", "default": 0 },
                        "status": text("Circulation status, e.g. CheckedOut")
                    },
                    "required": ["title", "author", "publisher", "date", "status"]
                },
                "BookPatch": {
                    "type": "object",
                    "properties": {
                        "title": text("Title of the book"),
                        "author": text("Author of the book"),
                        "publisher": text("Publisher of the book"),
                        "date": text("Publication date"),
                        "rating": { "type": "integer" },
                        "status": text("Circulation status, e.g. CheckedOut")
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::store::MemoryBookStore;
    use std::sync::Arc;

    #[test]
    fn migration_creates_books_table() {
        let module = BooksModule::new(Arc::new(MemoryBookStore::new()));
        let migrations = module.migrations();

        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }

    #[test]
    fn openapi_fragment_covers_every_route() {
        let spec = openapi_fragment();
        let paths = spec["paths"].as_object().unwrap();

        assert!(paths["/books"]["get"].is_object());
        assert!(paths["/book"]["post"].is_object());
        for verb in ["get", "put", "delete"] {
            assert!(paths["/book/{id}"][verb].is_object(), "missing {verb}");
        }
    }
}
