//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for database auth tokens, webhook signing keys and anything else that must
//! never show up in logs.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that derives
//! `Debug` and holds one gets safe logging behavior for free.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct DatabaseCredentials {
//!     url: String,
//!     auth_token: SecretString,
//! }
//!
//! let creds = DatabaseCredentials {
//!     url: "https://fairway.firebaseio.com".to_string(),
//!     auth_token: SecretString::from("db-secret"),
//! };
//!
//! // Safe: the token is redacted
//! println!("{:?}", creds);
//!
//! let token: &str = creds.auth_token.expose_secret();
//! # assert_eq!(token, "db-secret");
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretString};
