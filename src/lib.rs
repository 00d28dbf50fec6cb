//! RAX Chat Server
//!
//! A multi-user chat service over TCP. Clients register a display name with
//! JOIN, exchange broadcast messages, query membership with WHO, and leave
//! with LEAVE. Membership lives in a bounded slot table shared by all
//! connection tasks.

pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use server::Server;
