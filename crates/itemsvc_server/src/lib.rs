//! HTTP front end for the item store.
//!
//! Raw request bytes go through [`router::Router`], which calls the store
//! and renders response bytes; [`server::Server`] moves those bytes over TCP.

pub mod config;
pub mod http;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use router::{Route, Router};
pub use server::{ConnectionOutcome, Server};
