use farming_assistant::{app::FarmingAssistantApp, config::Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let app = FarmingAssistantApp::new(Config::from_env());

    // The app lives for the whole process and handlers borrow it.
    let app: &'static FarmingAssistantApp = Box::leak(Box::new(app));

    app.start().await
}
