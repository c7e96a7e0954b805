//! Single binary web server: public storefront list and the admin back-office API.
//! Run with: cargo run --bin web
//! Configuration comes from the environment (see `esports_backoffice::config`);
//! listens on 0.0.0.0:8080 by default.

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use esports_backoffice::store::{load_csv, Direction, Field, Filter, Query, Value};
use esports_backoffice::{
    cancel_tournament, create_tournament, delete_tournament, edit_dates, run_sync, sync_all,
    AdminContext, AdminError, Config, InMemoryStore, NewTournament, StoreError, SyncReport,
    TournamentDates, TournamentId, TournamentStatus, TournamentStore, TournamentView,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;

/// Session key under which the logged-in admin is kept.
const ADMIN_SESSION_KEY: &str = "admin";

struct AppState {
    store: InMemoryStore,
    config: Config,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

/// Path segment: tournament id (e.g. /api/admin/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Serialize)]
struct AdminListResponse {
    tournaments: Vec<TournamentView>,
    /// None when the sync could not read the store; the stored data is listed anyway.
    sync: Option<SyncReport>,
}

fn error_json(builder: &mut actix_web::HttpResponseBuilder, message: impl ToString) -> HttpResponse {
    builder.json(serde_json::json!({ "error": message.to_string() }))
}

fn store_error_response(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => error_json(&mut HttpResponse::NotFound(), e),
        StoreError::Duplicate(_) | StoreError::Import { .. } => error_json(&mut HttpResponse::BadRequest(), e),
        StoreError::Unavailable(_) => error_json(&mut HttpResponse::InternalServerError(), e),
    }
}

fn admin_error_response(e: &AdminError) -> HttpResponse {
    match e {
        AdminError::Forbidden { .. } => error_json(&mut HttpResponse::Forbidden(), e),
        AdminError::NotFound(_) => error_json(&mut HttpResponse::NotFound(), e),
        AdminError::InvalidDates | AdminError::EmptyName => error_json(&mut HttpResponse::BadRequest(), e),
        AdminError::Store(inner) => store_error_response(inner),
        AdminError::Sync(_) | AdminError::StatusWrite(_) => {
            error_json(&mut HttpResponse::InternalServerError(), e)
        }
    }
}

/// Admin identity from the session, or a 401 response.
fn current_admin(session: &Session) -> Result<AdminContext, HttpResponse> {
    match session.get::<AdminContext>(ADMIN_SESSION_KEY) {
        Ok(Some(ctx)) => Ok(ctx),
        Ok(None) => Err(error_json(&mut HttpResponse::Unauthorized(), "Not logged in")),
        Err(e) => {
            log::warn!("Unreadable admin session: {}", e);
            session.purge();
            Err(error_json(&mut HttpResponse::Unauthorized(), "Not logged in"))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "esports-backoffice",
    })
}

/// Public storefront: every non-cancelled tournament, soonest play first. Does not sync.
#[get("/api/tournaments")]
async fn api_public_tournaments(state: State) -> HttpResponse {
    let query = Query::new()
        .filter(Filter::Neq(Field::Status, Value::Status(TournamentStatus::Cancelled)))
        .order_by(Field::PlayingStartDate, Direction::Asc);
    match state.store.find(&query) {
        Ok(rows) => {
            let views: Vec<_> = rows
                .iter()
                .map(|t| TournamentView::new(t, state.config.vocabulary))
                .collect();
            HttpResponse::Ok().json(views)
        }
        Err(e) => store_error_response(&e),
    }
}

#[post("/api/admin/login")]
async fn api_admin_login(state: State, session: Session, body: Json<LoginBody>) -> HttpResponse {
    let Some(expected) = state.config.admin_password.as_deref() else {
        return error_json(&mut HttpResponse::Forbidden(), "Admin login is disabled");
    };
    if body.username.trim() != state.config.admin_username || body.password != expected {
        log::warn!("Failed admin login for '{}'", body.username.trim());
        return error_json(&mut HttpResponse::Unauthorized(), "Invalid credentials");
    }
    let ctx = AdminContext::superuser(state.config.admin_username.clone());
    session.renew();
    if let Err(e) = session.insert(ADMIN_SESSION_KEY, &ctx) {
        log::error!("Could not store admin session: {}", e);
        return error_json(&mut HttpResponse::InternalServerError(), "session error");
    }
    log::info!("Admin '{}' logged in", ctx.username);
    HttpResponse::Ok().json(&ctx)
}

#[post("/api/admin/logout")]
async fn api_admin_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Admin tournament list. Loading it syncs statuses first.
#[get("/api/admin/tournaments")]
async fn api_admin_tournaments(state: State, session: Session) -> HttpResponse {
    if let Err(resp) = current_admin(&session) {
        return resp;
    }
    let today = state.config.today();
    let sync = match sync_all(&state.store, today, &state.config.lifecycle) {
        Ok(report) => Some(report),
        Err(e) => {
            log::error!("Status sync on admin list failed: {}", e);
            None
        }
    };
    let query = Query::new()
        .order_by(Field::PlayingStartDate, Direction::Desc)
        .order_by(Field::Name, Direction::Asc);
    match state.store.find(&query) {
        Ok(rows) => HttpResponse::Ok().json(AdminListResponse {
            tournaments: rows
                .iter()
                .map(|t| TournamentView::new(t, state.config.vocabulary))
                .collect(),
            sync,
        }),
        Err(e) => store_error_response(&e),
    }
}

#[post("/api/admin/tournaments")]
async fn api_admin_create(state: State, session: Session, body: Json<NewTournament>) -> HttpResponse {
    let ctx = match current_admin(&session) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let today = state.config.today();
    match create_tournament(&state.store, &ctx, body.into_inner(), today, &state.config.lifecycle) {
        Ok(t) => HttpResponse::Created().json(TournamentView::new(&t, state.config.vocabulary)),
        Err(e) => admin_error_response(&e),
    }
}

/// Replace a tournament's dates; its status is re-derived immediately.
#[put("/api/admin/tournaments/{id}/dates")]
async fn api_admin_edit_dates(
    state: State,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<TournamentDates>,
) -> HttpResponse {
    let ctx = match current_admin(&session) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let today = state.config.today();
    match edit_dates(&state.store, &ctx, path.id, body.into_inner(), today, &state.config.lifecycle) {
        Ok(t) => HttpResponse::Ok().json(TournamentView::new(&t, state.config.vocabulary)),
        Err(e) => admin_error_response(&e),
    }
}

#[post("/api/admin/tournaments/{id}/cancel")]
async fn api_admin_cancel(state: State, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = match current_admin(&session) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    match cancel_tournament(&state.store, &ctx, path.id) {
        Ok(t) => HttpResponse::Ok().json(TournamentView::new(&t, state.config.vocabulary)),
        Err(e) => admin_error_response(&e),
    }
}

#[delete("/api/admin/tournaments/{id}")]
async fn api_admin_delete(state: State, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = match current_admin(&session) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    match delete_tournament(&state.store, &ctx, path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => admin_error_response(&e),
    }
}

/// Run the status sync now and return its report.
#[post("/api/admin/sync")]
async fn api_admin_sync(state: State, session: Session) -> HttpResponse {
    let ctx = match current_admin(&session) {
        Ok(ctx) => ctx,
        Err(resp) => return resp,
    };
    let today = state.config.today();
    match run_sync(&state.store, &ctx, today, &state.config.lifecycle) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => admin_error_response(&e),
    }
}

fn seed_store(config: &Config) -> io::Result<InMemoryStore> {
    let Some(path) = &config.seed_csv else {
        return Ok(InMemoryStore::new());
    };
    let file = File::open(path)?;
    let rows = load_csv(file).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    log::info!("Seeded {} tournament(s) from {}", rows.len(), path.display());
    Ok(InMemoryStore::with_tournaments(rows))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    if config.admin_password.is_none() {
        log::warn!("ADMIN_PASSWORD is not set; admin login is disabled");
    }
    let store = seed_store(&config)?;
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState { store, config });

    // Background task: periodic status sync (first run at startup)
    if let Some(period) = state.config.sync_interval {
        let state_sync = state.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let today = state_sync.config.today();
                if let Err(e) = sync_all(&state_sync.store, today, &state_sync.config.lifecycle) {
                    log::error!("Scheduled status sync failed: {}", e);
                }
            }
        });
    }

    if !state.config.session_cookie_secure {
        log::warn!("SESSION_COOKIE_SECURE=false; admin session cookie will be sent over plain HTTP");
    }
    let cookie_secure = state.config.session_cookie_secure;
    let session_key = Key::generate();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .service(api_health)
            .service(api_public_tournaments)
            .service(api_admin_login)
            .service(api_admin_logout)
            .service(api_admin_tournaments)
            .service(api_admin_create)
            .service(api_admin_edit_dates)
            .service(api_admin_cancel)
            .service(api_admin_delete)
            .service(api_admin_sync)
    })
    .bind(bind)?
    .run()
    .await
}
