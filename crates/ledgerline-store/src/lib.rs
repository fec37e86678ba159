//! Session persistence for Ledgerline.
//!
//! This crate is the only channel through which independent components
//! learn about session state:
//!
//! 1. **Session type**: the authenticated state ([`Session`])
//! 2. **Storage seam**: where the key-value pairs live ([`Storage`]
//!    trait, with in-memory and file-backed implementations)
//! 3. **Typed access**: [`SessionStore`], the shared view every
//!    component queries
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← sole writer: creates and clears the Session
//!     ↕
//! Store (this crate)  ← holds token, display name, demo flag
//!     ↕
//! Storage backend (below)  ← memory for tests, a JSON file for real runs
//! ```

mod error;
mod session;
mod storage;
mod store;

pub use error::StoreError;
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::SessionStore;
