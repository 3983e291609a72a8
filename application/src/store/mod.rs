//! In-process session table

pub mod session_store;

pub use session_store::{SessionStore, StoreConfig, StoreError};
