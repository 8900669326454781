//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, AddressQuery, AdminCommand, AdminQuery, CredentialHasher, DirectoryQuery,
    LeadUnlockCommand, LeadUnlockRepository, LoginService, OrderCommand, OrderQuery,
    OrderRepository, PostalCodeLookup, ProfessionalRepository, ProfileCommand, ReviewCommand,
    ReviewRepository, StatsRepository, UserRepository, UsersQuery,
};
use crate::domain::{
    AccountService, AddressLookupService, AdminRepositories, AdminService, Credits,
    DirectoryRepositories, DirectoryService, LeadUnlockService, OrderRepositories, OrderService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub directory: Arc<dyn DirectoryQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub leads: Arc<dyn LeadUnlockCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub addresses: Arc<dyn AddressQuery>,
}

/// Driven adapters the domain services are built on.
pub struct Adapters<U, P, O, L, R, S, H, C> {
    pub users: Arc<U>,
    pub professionals: Arc<P>,
    pub orders: Arc<O>,
    pub unlocks: Arc<L>,
    pub reviews: Arc<R>,
    pub stats: Arc<S>,
    pub hasher: Arc<H>,
    pub postal: Arc<C>,
}

/// Credit amounts applied by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Credits charged per lead unlock, fixed on each order at creation.
    pub lead_price: Credits,
    /// Opening balance of new professional profiles.
    pub welcome_credits: Credits,
}

impl HttpState {
    /// Build every domain service over `adapters` and expose them as ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use marketplace::domain::Credits;
    /// use marketplace::inbound::http::state::{Adapters, HttpState, Pricing};
    /// use marketplace::outbound::argon2_hasher::Argon2CredentialHasher;
    /// use marketplace::outbound::memory::InMemoryStore;
    /// use marketplace::outbound::postal::ViaCepLookup;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let postal = ViaCepLookup::new(
    ///     url::Url::parse("https://viacep.com.br/ws/").unwrap(),
    ///     std::time::Duration::from_secs(5),
    /// )
    /// .unwrap();
    /// let state = HttpState::from_adapters(
    ///     Adapters {
    ///         users: store.clone(),
    ///         professionals: store.clone(),
    ///         orders: store.clone(),
    ///         unlocks: store.clone(),
    ///         reviews: store.clone(),
    ///         stats: store,
    ///         hasher: Arc::new(Argon2CredentialHasher::new()),
    ///         postal: Arc::new(postal),
    ///     },
    ///     Arc::new(DefaultClock),
    ///     Pricing {
    ///         lead_price: Credits::new(10),
    ///         welcome_credits: Credits::new(0),
    ///     },
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn from_adapters<U, P, O, L, R, S, H, C>(
        adapters: Adapters<U, P, O, L, R, S, H, C>,
        clock: Arc<dyn Clock>,
        pricing: Pricing,
    ) -> Self
    where
        U: UserRepository + 'static,
        P: ProfessionalRepository + 'static,
        O: OrderRepository + 'static,
        L: LeadUnlockRepository + 'static,
        R: ReviewRepository + 'static,
        S: StatsRepository + 'static,
        H: CredentialHasher + 'static,
        C: PostalCodeLookup + 'static,
    {
        let Adapters {
            users,
            professionals,
            orders,
            unlocks,
            reviews,
            stats,
            hasher,
            postal,
        } = adapters;

        let accounts = Arc::new(AccountService::new(
            users.clone(),
            hasher,
            pricing.welcome_credits,
        ));
        let directory = Arc::new(DirectoryService::new(
            DirectoryRepositories {
                users: users.clone(),
                professionals: professionals.clone(),
                reviews,
                orders: orders.clone(),
            },
            clock.clone(),
        ));
        let order_service = Arc::new(OrderService::new(
            OrderRepositories {
                users: users.clone(),
                professionals: professionals.clone(),
                orders: orders.clone(),
            },
            clock.clone(),
            pricing.lead_price,
        ));
        let admin = Arc::new(AdminService::new(
            AdminRepositories {
                users: users.clone(),
                professionals,
                orders,
                stats,
            },
            clock.clone(),
            pricing.welcome_credits,
        ));

        Self {
            login: accounts.clone(),
            accounts: accounts.clone(),
            users: accounts,
            directory: directory.clone(),
            profiles: directory.clone(),
            reviews: directory,
            orders: order_service.clone(),
            orders_query: order_service,
            leads: Arc::new(LeadUnlockService::new(users, unlocks, clock)),
            admin_query: admin.clone(),
            admin,
            addresses: Arc::new(AddressLookupService::new(postal)),
        }
    }
}
