pub mod config;
pub mod credentials;
pub mod error;
pub mod tenancy;

pub use config::AppConfig;
pub use error::{ProvisioningError, ProvisioningResult, VaultError, VaultResult};
