//! Versioned draft storage
//!
//! One draft per user identity, with monotonic versioning and a documented
//! atomicity contract. The [`DraftStore`] trait is the single storage
//! contract; which backing a deployment uses is a wiring choice:
//!
//! - [`FileDraftStore`]: durable whole-file JSON mapping (the server's
//!   backing)
//! - [`MemoryDraftStore`]: in-process mapping (local mode and tests)
//! - [`HttpDraftStore`]: remote client speaking the server's wire protocol

pub mod draft;
pub mod error;
pub mod file;
pub mod memory;
pub mod remote;
pub mod store;

pub use draft::{Draft, DraftData};
pub use error::StoreError;
pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;
pub use remote::HttpDraftStore;
pub use store::DraftStore;
