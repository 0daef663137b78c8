//! SQL DDL for the baseline schema.

/// MySQL `users` table:
/// - `id` INT AUTO_INCREMENT PRIMARY KEY
/// - `email` UNIQUE (creates an index implicitly)
/// - `created_at` defaults to insertion time
///
/// `IF NOT EXISTS` keeps repeated initialization a no-op.
pub const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(100) UNIQUE NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;
