//! medcamp-auth
//!
//! Sign-in and session resolution: Cognito password auth, JWT verification,
//! and the `users/<uid>` role lookup that turns an identity into a
//! [`medcamp_core::models::user::Principal`].

pub mod client;
pub mod cognito;
pub mod error;
pub mod jwt;
pub mod provider;
pub mod session;
