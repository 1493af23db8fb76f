use crate::Desk;
use crate::Outbox;
use crate::Store;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use duel_core::Entrant;
use duel_core::Handle;
use duel_matchroom::MatchError;
use serde::Deserialize;

/// A chat message relayed by the chat bridge.
#[derive(Debug, Deserialize)]
pub struct Message {
    pub channel: String,
    pub author: String,
    pub text: String,
}

/// Round start for one channel.
#[derive(Debug, Deserialize)]
pub struct Opening {
    pub author: String,
    pub channel: String,
    pub racers: [Seating; 2],
}

#[derive(Debug, Deserialize)]
pub struct Seating {
    pub user: String,
    pub participant: Entrant,
}

#[derive(Debug, Deserialize)]
pub struct Author {
    pub author: String,
}

pub async fn health(desk: web::Data<Desk<Store>>) -> impl Responder {
    match desk.machine().repo().ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Runs a chat message and answers with everything queued for its channel.
pub async fn message(
    desk: web::Data<Desk<Store>>,
    outbox: web::Data<Outbox>,
    body: web::Json<Message>,
) -> impl Responder {
    let channel = Handle::from(body.channel.as_str());
    desk.handle(&channel, &Handle::from(body.author.as_str()), &body.text)
        .await;
    HttpResponse::Ok().json(serde_json::json!({ "messages": outbox.drain(&channel).await }))
}

/// Collects messages sent outside a request, such as sweeper output.
pub async fn messages(outbox: web::Data<Outbox>, path: web::Path<String>) -> impl Responder {
    let channel = Handle::from(path.into_inner());
    HttpResponse::Ok().json(serde_json::json!({ "messages": outbox.drain(&channel).await }))
}

pub async fn open(
    desk: web::Data<Desk<Store>>,
    outbox: web::Data<Outbox>,
    body: web::Json<Opening>,
) -> impl Responder {
    if !desk.is_admin(&Handle::from(body.author.as_str())) {
        return reply(MatchError::NotAdmin);
    }
    let channel = Handle::from(body.channel.as_str());
    let seats = body
        .racers
        .each_ref()
        .map(|s| (Handle::from(s.user.as_str()), s.participant));
    match desk.open(&channel, seats).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({ "messages": outbox.drain(&channel).await })),
        Err(e) => reply(e),
    }
}

pub async fn close(
    desk: web::Data<Desk<Store>>,
    outbox: web::Data<Outbox>,
    path: web::Path<String>,
    query: web::Query<Author>,
) -> impl Responder {
    if !desk.is_admin(&Handle::from(query.author.as_str())) {
        return reply(MatchError::NotAdmin);
    }
    let channel = Handle::from(path.into_inner());
    match desk.close(&channel).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "messages": outbox.drain(&channel).await })),
        Err(e) => reply(e),
    }
}

pub async fn status(desk: web::Data<Desk<Store>>, path: web::Path<String>) -> impl Responder {
    match desk.status(&Handle::from(path.into_inner())).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => reply(e),
    }
}

fn reply(e: MatchError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        MatchError::NotAdmin => HttpResponse::Forbidden().json(body),
        MatchError::NotAMatchChannel => HttpResponse::NotFound().json(body),
        MatchError::StorageFailure(_) => {
            log::error!("[http] {}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}
