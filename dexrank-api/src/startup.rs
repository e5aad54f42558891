use crate::configuration::Settings;
use crate::routes::{
    dismiss_milestone, export_state, health_check, import_state, milestone_state, move_item,
    next_battle, ranking, reset_session, submit_choice,
};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use dex_skill::{Catalog, Clock, Session, SystemClock};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use tracing_actix_web::TracingLogger;

/// The one session shared by every handler. A single rater drives it, so a plain
/// mutex serializes all operations.
pub type SharedSession = web::Data<Mutex<Session>>;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: &Settings) -> anyhow::Result<Self> {
        Self::build_with_clock(configuration, Arc::new(SystemClock)).await
    }

    pub async fn build_with_clock(
        configuration: &Settings,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let catalog = Catalog::from_csv(&configuration.catalog.path)
            .with_context(|| format!("Failed to load catalog {}", configuration.catalog.path))?;
        let session = Session::new(catalog, configuration.session.clone(), clock)
            .context("Failed to start the ranking session")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, session)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, session: Session) -> Result<Server, std::io::Error> {
    let session_ptr = web::Data::new(Mutex::new(session));
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/battle/next", web::post().to(next_battle))
            .route("/battle/choice", web::post().to(submit_choice))
            .route("/ranking", web::get().to(ranking))
            .route("/ranking/move", web::post().to(move_item))
            .route("/milestone", web::get().to(milestone_state))
            .route("/milestone/dismiss", web::post().to(dismiss_milestone))
            .route("/session/reset", web::post().to(reset_session))
            .route("/session/state", web::get().to(export_state))
            .route("/session/state", web::post().to(import_state))
            .app_data(session_ptr.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
