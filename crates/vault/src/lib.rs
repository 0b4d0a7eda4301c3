//! Per-tenant credential vault for ad-platform secret bundles: schema
//! validation, keyed upserts, validation-state lifecycle, and tenant-isolated
//! reads.

pub mod store;
pub mod vault;

pub use store::{CredentialStore, InMemoryCredentialStore};
pub use vault::CredentialVault;
