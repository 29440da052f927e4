//! City Client - typed gateway to the asset management backend
//!
//! Every call carries the bearer token of the current [`Session`], read at
//! call time so a token rotated mid-session is picked up without rebuilding
//! the client. Failures surface directly to the caller: no retry, no
//! circuit breaking.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod query;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{AssetApi, Gateway, LoginResponse};
pub use http::{HttpClient, NetworkHttpClient};
pub use query::{Breakdown, Dimension, ListQuery, SortOrder};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionData, SessionStore};
