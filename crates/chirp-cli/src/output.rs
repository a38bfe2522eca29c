//! Text and JSON output formatting for CLI commands.

use serde::Serialize;

use chirp_entity::User;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable key/value lines
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Print a single item as JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{}", json);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Print a user record
pub fn print_user(user: &User, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(user),
        OutputFormat::Text => {
            print_kv("ID", &user.id.to_string());
            print_kv("Email", &user.email);
            print_kv("Created", &user.created_at.to_rfc3339());
            print_kv("Updated", &user.updated_at.to_rfc3339());
        }
    }
}
