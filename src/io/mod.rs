//! IO modules - external system interfaces
//!
//! - `gateway` - HTTP client for the tracking and complaint endpoints
//! - `mock_server` - Local stand-in for those endpoints (hyper)

pub mod gateway;
pub mod mock_server;

pub use gateway::{GatewayError, HttpGateway, RemoteGateway};
pub use mock_server::{start_mock_server, MockBackend};
