//! Server harness and shared world for marketplace behaviour tests.
//!
//! Each scenario gets a real Actix server on an ephemeral port, backed by a
//! fresh in-memory store and a clock the steps can move forward. The harness
//! owns a single-threaded Tokio runtime plus a `LocalSet` because Actix uses
//! `spawn_local` internally. `WorldFixture` stops the server even if a step
//! panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use marketplace::Trace;
use marketplace::domain::{Role, TRACE_ID_HEADER, User};
use marketplace::inbound::http::api_routes;
use marketplace::inbound::http::state::HttpState;
use marketplace::outbound::memory::InMemoryStore;
use marketplace::test_support::clock::{MutableClock, fixture_time};
use marketplace::test_support::doubles::{
    FIXTURE_PASSWORD, StaticPostalLookup, memory_state, seed_professional, seed_user,
};
use marketplace::test_support::fixtures::open_order;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct MarketplaceWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) clock: Arc<MutableClock>,
    pub(crate) users: HashMap<String, User>,
    pub(crate) sessions: HashMap<String, String>,
    pub(crate) order_id: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<MarketplaceWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so the world stays
    // borrowed while calling `block_on`. The future must not touch the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

async fn spawn_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware(key.clone()))
                    .configure(api_routes),
            )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MutableClock::at_fixture_time());
    let http_state = memory_state(&store, StaticPostalLookup::paulista(), clock.clone());

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_server(http_state).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(MarketplaceWorld {
        runtime,
        local,
        base_url,
        server,
        store,
        clock,
        users: HashMap::new(),
        sessions: HashMap::new(),
        order_id: None,
        last_status: None,
        last_body: None,
        last_trace_id: None,
    }));

    WorldFixture { world }
}

/// Seed a client or admin account logging in as `{slug}@example.com`.
pub(crate) fn given_user(world: &SharedWorld, role: Role, display_name: &str, slug: &str) {
    let mut ctx = world.borrow_mut();
    let user = seed_user(&ctx.store, role, display_name, slug);
    ctx.users.insert(slug.to_owned(), user);
}

/// Seed a listed professional with `credits`.
pub(crate) fn given_professional(
    world: &SharedWorld,
    display_name: &str,
    slug: &str,
    category: &str,
    credits: u32,
) {
    let mut ctx = world.borrow_mut();
    let user = seed_professional(&ctx.store, display_name, slug, category, credits);
    ctx.users.insert(slug.to_owned(), user);
}

/// Seed an open order by `client`, optionally already unlocked by
/// `unlocked_by`, and remember its id.
pub(crate) fn given_open_order(
    world: &SharedWorld,
    client: &str,
    category: &str,
    price: u32,
    unlocked_by: Option<&str>,
) {
    let mut ctx = world.borrow_mut();
    let seeded = |slug: &str| {
        ctx.users
            .get(slug)
            .map(|user| user.id().clone())
            .unwrap_or_else(|| panic!("no user seeded as {slug}"))
    };
    let mut order = open_order(&seeded(client), category, price, fixture_time());
    if let Some(slug) = unlocked_by {
        order.unlocked_by.push(seeded(slug));
    }
    let order_id = order.id.to_string();
    assert!(ctx.store.seed_order(order), "seeding the order");
    ctx.order_id = Some(order_id);
}

/// Identifier of the user seeded under `slug`.
pub(crate) fn user_id(world: &SharedWorld, slug: &str) -> String {
    world
        .borrow()
        .users
        .get(slug)
        .map(|user| user.id().to_string())
        .unwrap_or_else(|| panic!("no user seeded as {slug}"))
}

/// Log in as `slug` and keep the session cookie for later requests.
pub(crate) fn log_in(world: &SharedWorld, slug: &str) {
    let email = format!("{slug}@example.com");
    let cookie = with_world_async(world, |base_url| async move {
        let response = Client::default()
            .post(format!("{base_url}/api/v1/login"))
            .send_json(&json!({ "email": email, "password": FIXTURE_PASSWORD }))
            .await
            .expect("login request");
        assert!(response.status().is_success(), "login failed");
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
            .expect("session cookie")
    });
    world.borrow_mut().sessions.insert(slug.to_owned(), cookie);
}

/// Send a request as `slug` (or anonymously) and record status, body and
/// trace id. A `Set-Cookie` on the reply replaces the stored session.
pub(crate) fn request(
    world: &SharedWorld,
    as_user: Option<&str>,
    method: Method,
    path: &str,
    payload: Option<Value>,
) {
    let cookie = as_user.map(|slug| {
        world
            .borrow()
            .sessions
            .get(slug)
            .cloned()
            .unwrap_or_else(|| panic!("{slug} has not logged in"))
    });
    let path = path.to_owned();
    let reply = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let response = match payload {
            Some(payload) => request.send_json(&payload).await,
            None => request.send().await,
        }
        .expect("request should complete");
        read_reply(response).await
    });
    record(world, as_user, reply);
}

/// Register a fresh account through the API and keep its session cookie
/// under `slug`.
pub(crate) fn register(world: &SharedWorld, slug: &str, display_name: &str, role: &str) {
    let payload = json!({
        "email": format!("{slug}@example.com"),
        "password": FIXTURE_PASSWORD,
        "displayName": display_name,
        "role": role,
    });
    let reply = with_world_async(world, |base_url| async move {
        let response = Client::default()
            .post(format!("{base_url}/api/v1/register"))
            .send_json(&payload)
            .await
            .expect("register request");
        read_reply(response).await
    });
    record(world, Some(slug), reply);
}

/// Attempt a login as `slug` with `password`, recording the outcome.
pub(crate) fn attempt_login(world: &SharedWorld, slug: &str, password: &str) {
    let payload = json!({ "email": format!("{slug}@example.com"), "password": password });
    let reply = with_world_async(world, |base_url| async move {
        let response = Client::default()
            .post(format!("{base_url}/api/v1/login"))
            .send_json(&payload)
            .await
            .expect("login request");
        read_reply(response).await
    });
    record(world, Some(slug), reply);
}

struct Reply {
    status: u16,
    body: Value,
    trace_id: Option<String>,
    cookie: Option<String>,
}

async fn read_reply<S>(mut response: awc::ClientResponse<S>) -> Reply
where
    S: futures_util::Stream<Item = Result<actix_web::web::Bytes, actix_http::error::PayloadError>>
        + Unpin,
{
    let header_value = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let trace_id = header_value(TRACE_ID_HEADER);
    let cookie = header_value(header::SET_COOKIE.as_str())
        .and_then(|value| value.split(';').next().map(str::to_owned));
    let status = response.status().as_u16();
    let bytes = response.body().await.expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        body,
        trace_id,
        cookie,
    }
}

fn record(world: &SharedWorld, as_user: Option<&str>, reply: Reply) {
    let mut ctx = world.borrow_mut();
    if let (Some(slug), Some(cookie)) = (as_user, reply.cookie) {
        ctx.sessions.insert(slug.to_owned(), cookie);
    }
    ctx.last_status = Some(reply.status);
    ctx.last_body = Some(reply.body);
    ctx.last_trace_id = reply.trace_id;
}

/// Status of the last response.
pub(crate) fn last_status(world: &SharedWorld) -> u16 {
    world.borrow().last_status.expect("a request was sent")
}

/// Body of the last response.
pub(crate) fn last_body(world: &SharedWorld) -> Value {
    world.borrow().last_body.clone().expect("a request was sent")
}

/// Order id remembered by an earlier step.
pub(crate) fn order_id(world: &SharedWorld) -> String {
    world.borrow().order_id.clone().expect("an order was created")
}

/// `trace-id` header of the last response.
pub(crate) fn last_trace_id(world: &SharedWorld) -> Option<String> {
    world.borrow().last_trace_id.clone()
}
