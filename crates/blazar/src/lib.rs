pub mod client;
pub mod error;
pub mod lease;
pub mod params;
pub mod resolve;
pub mod resource;
pub mod timeutil;
pub mod v1;

/// A JSON object as returned by the service.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use client::{BlazarClient, ClientOptions};
pub use error::{Error, Result};
pub use resource::ResourceKind;
