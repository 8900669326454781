//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::Trace;
use crate::inbound::http::api_routes;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::test_support::clock::MutableClock;
use crate::test_support::doubles::{FIXTURE_PASSWORD, StaticPostalLookup, memory_state};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory store, controllable clock and the HTTP state built over them.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl TestContext {
    /// Context whose postal lookup knows the Avenida Paulista fixtures.
    pub fn new() -> Self {
        Self::with_postal(StaticPostalLookup::paulista())
    }

    /// Context backed by `postal` for address lookups.
    pub fn with_postal(postal: StaticPostalLookup) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::at_fixture_time());
        let state = memory_state(&store, postal, clock.clone());
        Self {
            store,
            clock,
            state,
        }
    }

    /// Full `/api/v1` surface behind session and trace middleware.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(api_routes),
            )
    }
}

/// Log in as the seeded account behind `email` and return its session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": FIXTURE_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login as {email} failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
