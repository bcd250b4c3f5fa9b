// Library for tests to access modules

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod refresh;
pub mod router_client;
pub mod routes;
pub mod system;
pub mod traffic;
pub mod version;
