//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, lookups, hashers) are implemented by outbound
//! adapters. Driving ports (commands and queries) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod address_query;
mod admin_command;
mod admin_query;
mod credential_hasher;
mod directory_query;
mod lead_unlock_command;
mod lead_unlock_repository;
mod login_service;
mod order_command;
mod order_query;
mod order_repository;
mod postal_code_lookup;
mod professional_repository;
mod profile_command;
mod review_command;
mod review_repository;
mod stats_repository;
mod user_repository;
mod users_query;

pub use account_command::{AccountCommand, AccountUpdate};
pub use address_query::AddressQuery;
pub use admin_command::AdminCommand;
pub use admin_query::AdminQuery;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
pub use directory_query::{DirectoryQuery, OwnProfile, ProfessionalPage, ReviewView};
pub use lead_unlock_command::{LeadUnlockCommand, UnlockReceipt};
#[cfg(test)]
pub use lead_unlock_repository::MockLeadUnlockRepository;
pub use lead_unlock_repository::{LeadUnlockError, LeadUnlockRepository, UnlockOutcome};
pub use login_service::LoginService;
pub use order_command::OrderCommand;
pub use order_query::{LeadFilter, OrderQuery};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderPersistenceError, OrderRepository};
#[cfg(test)]
pub use postal_code_lookup::MockPostalCodeLookup;
pub use postal_code_lookup::{PostalCodeLookup, PostalLookupError};
#[cfg(test)]
pub use professional_repository::MockProfessionalRepository;
pub use professional_repository::{ProfessionalPersistenceError, ProfessionalRepository};
pub use profile_command::ProfileCommand;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
pub use stats_repository::{StatsError, StatsRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewAccount, StoredCredentials, UserPersistenceError, UserRepository};
pub use users_query::UsersQuery;
