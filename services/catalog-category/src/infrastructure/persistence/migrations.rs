//! Schema migrations for the category service

use catalog_adapter_postgres::Migration;

/// Migrations applied at startup, before the server accepts traffic
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "create_categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    )]
}
