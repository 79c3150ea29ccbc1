#![allow(clippy::new_without_default)]

use app::{App, AppError};
use config::Config;
use contracts::{ErrorReply, MessageEvent, MessageReply};
use database::{Database, ListStore, MemoryStore, RedisPool};
use hyper::{
    body::Buf,
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};
use serde::Serialize;
use std::sync::Arc;
use structopt::StructOpt;

pub mod app;
pub mod config;
pub mod controller;
pub mod locks;
pub mod reply;

#[macro_use]
extern crate log;

#[derive(StructOpt, Debug, Clone)]
pub struct Opts {
    #[structopt(long, env = "LISTTO_TOKEN", hide_env_values = true)]
    token: String,
    #[structopt(long, default_value = "^", env = "LISTTO_PREFIX")]
    prefix: String,
    #[structopt(long, default_value = "3000", env = "LISTTO_LISTEN_PORT")]
    port: u16,
    #[structopt(long, default_value = "redis://127.0.0.1/", env = "LISTTO_REDIS_ADDR")]
    redis_addr: String,
    /// Messages from this user id are ignored
    #[structopt(long, env = "LISTTO_BOT_ID")]
    bot_id: Option<String>,
    /// Keep lists in memory instead of redis
    #[structopt(
        long,
        env = "LISTTO_MEMORY_STORE",
        parse(try_from_str),
        default_value = "false"
    )]
    memory_store: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let opts = Opts::from_args();

    let config = match Config::new(&opts.token, &opts.prefix, opts.bot_id.clone()) {
        Ok(config) => config,
        Err(config_error) => {
            error!("invalid configuration: '{}'", config_error);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn ListStore> = if opts.memory_store {
        warn!("keeping lists in memory, they will be lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        match RedisPool::new(opts.redis_addr.clone()) {
            Ok(pool) => Arc::new(Database::new(pool)),
            Err(db_error) => {
                error!("could not open redis at '{}': '{}'", opts.redis_addr, db_error);
                std::process::exit(1);
            }
        }
    };

    let app = Arc::new(App::new(config.clone(), store));
    let webhook = Arc::new(Webhook::new(app, config));

    let addr = ([0, 0, 0, 0], opts.port).into();

    let service = make_service_fn(|_| {
        let webhook = webhook.clone();
        async {
            Ok::<_, hyper::Error>(service_fn(move |request| {
                let webhook = webhook.clone();
                entry_point(webhook, request)
            }))
        }
    });

    let server = Server::bind(&addr).serve(service);

    info!("starting listto on {:?} with prefix '{}'", addr, opts.prefix);
    if let Err(hyper_error) = server.await {
        error!("server stopped: '{}'", hyper_error);
    }
}

pub async fn entry_point(
    webhook: Arc<Webhook>,
    request: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    Ok(webhook.handle_request(request).await)
}

/// Receives chat messages relayed by the chat gateway
pub struct Webhook {
    app: Arc<App>,
    config: Config,
}

impl Webhook {
    pub fn new(app: Arc<App>, config: Config) -> Self {
        Self { app, config }
    }

    pub async fn handle_request(&self, request: Request<Body>) -> Response<Body> {
        let route = request.uri().path().to_string();
        match (request.method(), route.as_str()) {
            (&Method::POST, "/api/message") => match self.message_route(request).await {
                Ok(reply) => generic_json_response(reply, StatusCode::OK),
                Err((status, error)) => generic_json_response(error, status),
            },
            (&Method::GET, "/api/health") => {
                generic_json_response(MessageReply::new(None), StatusCode::OK)
            }
            _invalid => {
                error!("invalid http method or route request: '{:?}'", request);
                generic_json_response(ErrorReply::new("invalid route"), StatusCode::NOT_FOUND)
            }
        }
    }

    async fn message_route(
        &self,
        request: Request<Body>,
    ) -> Result<MessageReply, (StatusCode, ErrorReply)> {
        if let Err(auth_error) = self.authenticate(&request) {
            error!("error during authentication: '{}'", auth_error);
            return Err((StatusCode::UNAUTHORIZED, ErrorReply::new(auth_error.to_string())));
        }

        let event = Self::get_body_as_event(request).await.map_err(|error| {
            error!("error parsing request as message: '{:?}'", error.context);
            (StatusCode::BAD_REQUEST, ErrorReply::new(error.to_string()))
        })?;

        Ok(MessageReply::new(self.app.handle_message(&event).await))
    }

    fn authenticate(&self, request: &Request<Body>) -> Result<(), AppError> {
        match request.headers().get(AUTHORIZATION) {
            Some(value) => {
                let token = value
                    .to_str()
                    .ok()
                    .and_then(|tok| tok.strip_prefix("Bot "))
                    .ok_or_else(|| AppError::from(reply::hint("invalid 'Authorization' header")))?;

                if token != self.config.token() {
                    return Err(AppError::from(reply::hint("invalid token")));
                }

                Ok(())
            }
            None => Err(AppError::from(reply::hint(
                "missing 'Authorization' header",
            ))),
        }
    }

    /// Attempts to parse the body of a request as a chat message
    async fn get_body_as_event(request: Request<Body>) -> Result<MessageEvent, AppError> {
        let buf = hyper::body::aggregate(request).await.map_err(|hyper_error| {
            AppError::from(reply::hint("could not read request body")).with_context(&hyper_error)
        })?;
        let event = serde_json::from_reader(buf.reader()).map_err(|serde_error| {
            AppError::from(reply::hint("invalid message")).with_context(&serde_error)
        })?;

        Ok(event)
    }
}

fn generic_json_response<T>(body: T, status: StatusCode) -> Response<Body>
where
    T: Serialize,
{
    let (status, bytes) = match serde_json::to_vec(&body) {
        Ok(bytes) => (status, bytes),
        Err(serde_error) => {
            error!("could not serialize response: '{}'", serde_error);
            (StatusCode::INTERNAL_SERVER_ERROR, b"{}".to_vec())
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
