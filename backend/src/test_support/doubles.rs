//! Cheap stand-ins for the credential hasher and the postal lookup, plus
//! an HTTP state wired over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, NewAccount, PostalCodeLookup, PostalLookupError,
};
use crate::domain::{
    AddressSuggestion, Credits, PostalCode, ProfessionalProfile, RegionCode, Role, User,
};
use crate::inbound::http::state::{Adapters, HttpState, Pricing};
use crate::outbound::memory::InMemoryStore;

use super::fixtures;

/// Password every seeded account shares.
pub const FIXTURE_PASSWORD: &str = "senha-segura-123";

const PLAIN_PREFIX: &str = "plain$";

/// Reversible "hash" so tests do not pay for argon2.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        Ok(format!("{PLAIN_PREFIX}{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError> {
        hash.strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| CredentialHashError::malformed_hash("missing plain$ prefix"))
    }
}

/// Postal lookup answering from a fixed list, or failing every call.
#[derive(Debug, Clone, Default)]
pub struct StaticPostalLookup {
    known: Vec<AddressSuggestion>,
    offline: bool,
}

impl StaticPostalLookup {
    /// Lookup answering only for the `known` postal codes.
    pub fn new(known: Vec<AddressSuggestion>) -> Self {
        Self {
            known,
            offline: false,
        }
    }

    /// Lookup whose upstream always times out.
    pub fn offline() -> Self {
        Self {
            known: Vec::new(),
            offline: true,
        }
    }

    /// Lookup that knows the Avenida Paulista CEP `01310-100`.
    pub fn paulista() -> Self {
        Self::new(vec![AddressSuggestion {
            postal_code: PostalCode::new("01310100").expect("fixture postal code"),
            street: "Avenida Paulista".into(),
            neighborhood: "Bela Vista".into(),
            city: "São Paulo".into(),
            region: RegionCode::Sp,
        }])
    }
}

#[async_trait]
impl PostalCodeLookup for StaticPostalLookup {
    async fn lookup(
        &self,
        code: &PostalCode,
    ) -> Result<Option<AddressSuggestion>, PostalLookupError> {
        if self.offline {
            return Err(PostalLookupError::timeout("fixture lookup is offline"));
        }
        Ok(self
            .known
            .iter()
            .find(|suggestion| &suggestion.postal_code == code)
            .cloned())
    }
}

/// Default prices used by HTTP tests: 10 credits per lead, no welcome bonus.
pub const TEST_PRICING: Pricing = Pricing {
    lead_price: Credits::new(10),
    welcome_credits: Credits::new(0),
};

/// HTTP state backed by `store`, the plain hasher and `postal`.
pub fn memory_state(
    store: &Arc<InMemoryStore>,
    postal: StaticPostalLookup,
    clock: Arc<dyn Clock>,
) -> HttpState {
    HttpState::from_adapters(
        Adapters {
            users: store.clone(),
            professionals: store.clone(),
            orders: store.clone(),
            unlocks: store.clone(),
            reviews: store.clone(),
            stats: store.clone(),
            hasher: Arc::new(PlainHasher),
            postal: Arc::new(postal),
        },
        clock,
        TEST_PRICING,
    )
}

/// Seed an account that logs in with [`FIXTURE_PASSWORD`].
pub fn seed_user(store: &InMemoryStore, role: Role, display_name: &str, slug: &str) -> User {
    let user = fixtures::user(role, display_name, slug);
    let profile = (role == Role::Professional)
        .then(|| ProfessionalProfile::empty(user.id().clone(), Credits::ZERO));
    seed(store, user, profile)
}

/// Seed a professional listed under `category` in São Paulo with `credits`.
pub fn seed_professional(
    store: &InMemoryStore,
    display_name: &str,
    slug: &str,
    category: &str,
    credits: u32,
) -> User {
    let user = fixtures::user(Role::Professional, display_name, slug);
    let profile = fixtures::listed_profile(user.id(), category, RegionCode::Sp, credits);
    seed(store, user, Some(profile))
}

fn seed(store: &InMemoryStore, user: User, profile: Option<ProfessionalProfile>) -> User {
    let password_hash = PlainHasher
        .hash(FIXTURE_PASSWORD)
        .expect("plain hashing cannot fail");
    assert!(
        store.seed_account(NewAccount {
            user: user.clone(),
            password_hash,
            profile,
        }),
        "seeding the in-memory store"
    );
    user
}
