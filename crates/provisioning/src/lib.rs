//! Account provisioning: the signup saga that creates an authentication
//! identity, an owning tenant, and an owner membership as one unit, with
//! compensating rollback on partial failure.

pub mod gateway;
pub mod saga;
pub mod service;
pub mod stores;

pub use gateway::{IdentityGateway, InMemoryIdentityGateway, NewIdentity};
pub use service::{ProvisionOutcome, ProvisionRequest, ProvisioningService};
pub use stores::{
    InMemoryMembershipStore, InMemoryTenantStore, MembershipStore, NewTenant, TenantStore,
};
