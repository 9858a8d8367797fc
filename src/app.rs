use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mockall_double::double;
use std::sync::Mutex;
use tracing::info;

#[double]
use crate::ai::Ai;
use crate::{
    ai::gemini::Gemini,
    config::Config,
    controllers::{
        analytics::{analytics_handler, AnalyticsController},
        history::{
            clear_history_handler, download_history_handler, list_history_handler,
            HistoryController,
        },
        recommendations::{
            create_recommendation_handler, download_recommendation_handler,
            recommendation_options_handler, RecommendationsController,
        },
        session::{
            forget_api_key_handler, session_status_handler, set_api_key_handler,
            SessionController,
        },
    },
    session::Session,
};

pub struct FarmingAssistantApp {
    pub config: Config,
    pub session: Mutex<Session>,
    pub recommendations_controller: RecommendationsController,
    pub analytics_controller: AnalyticsController,
    pub history_controller: HistoryController,
    pub session_controller: SessionController,
}

impl FarmingAssistantApp {
    pub fn new(config: Config) -> Self {
        let gemini = Gemini::new(&config.gemini_url, &config.model);
        let recommendations_controller = RecommendationsController::new(Ai::new(gemini));
        let session_controller = SessionController::new(&config.model);
        let session = Mutex::new(Session::new(config.api_key.clone()));

        Self {
            config,
            session,
            recommendations_controller,
            analytics_controller: AnalyticsController::new(),
            history_controller: HistoryController::new(),
            session_controller,
        }
    }

    pub async fn start(&'static self) -> std::io::Result<()> {
        info!(
            "Listening on {} using model {}",
            self.config.bind, self.config.model
        );

        HttpServer::new(move || {
            App::new()
                .wrap(self.cors())
                .app_data(web::Data::new(self))
                .service(session_status_handler)
                .service(set_api_key_handler)
                .service(forget_api_key_handler)
                .service(recommendation_options_handler)
                .service(create_recommendation_handler)
                .service(download_recommendation_handler)
                .service(analytics_handler)
                .service(list_history_handler)
                .service(clear_history_handler)
                .service(download_history_handler)
        })
        .bind(self.config.bind)?
        .run()
        .await
    }

    // With no origins configured, any front end may call in.
    fn cors(&self) -> Cors {
        if self.config.allowed_origins.is_empty() {
            return Cors::permissive();
        }

        self.config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_header(actix_web::http::header::CONTENT_TYPE)
    }
}
