//! TikTok Login Kit OAuth exchange proxy.
//!
//! Shields the client secret from browser code: the frontend sends the user to
//! `/auth/tiktok`, TikTok redirects back to `/auth/callback`, and this crate
//! performs the server-side authorization-code exchange and relays the token
//! payload (or error) to the caller.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tracing;

pub use config::ApiConfig;
pub use state::ApiState;
