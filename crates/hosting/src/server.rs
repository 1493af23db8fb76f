use crate::Desk;
use crate::Outbox;
use crate::Settings;
use crate::Store;
use crate::handlers;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use duel_bracket::Bracket;
use duel_bracket::Roster;
use duel_matchroom::Machine;
use std::sync::Arc;

/// Registers every route on an app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/message", web::post().to(handlers::message))
        .route("/messages/{channel}", web::get().to(handlers::messages))
        .route("/matches", web::post().to(handlers::open))
        .route("/matches/{channel}", web::get().to(handlers::status))
        .route("/matches/{channel}", web::delete().to(handlers::close));
}

/// Wires storage, the desk and the sweeper, then serves HTTP until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = Store::connect(settings.db_url.as_deref()).await?;
    let bracket: Arc<dyn Bracket> = match &settings.bracket {
        Some(path) => Arc::new(Roster::load(path)?),
        None => Arc::new(Roster::default()),
    };
    let outbox = Arc::new(Outbox::new());
    let machine = Machine::new(store, settings.rules.clone());
    let desk = Arc::new(Desk::new(machine, outbox.clone(), bracket, settings.admins.clone()));
    let sweeper = crate::sweep(desk.clone(), settings.window);
    let desk = web::Data::from(desk);
    let outbox = web::Data::from(outbox);
    log::info!("starting match server on {}", settings.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(desk.clone())
            .app_data(outbox.clone())
            .configure(routes)
    })
    .workers(4)
    .bind(&settings.bind)?
    .run()
    .await?;
    sweeper.abort();
    Ok(())
}
