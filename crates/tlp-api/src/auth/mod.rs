pub mod cookies;
pub mod csrf;
pub mod models;
pub mod tiktok;

pub use tiktok::routes::routes;
