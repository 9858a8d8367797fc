use farming_assistant::{
    ai::{gemini::Gemini, Ai},
    config::Config,
    domain::FarmRequest,
};
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: recommend <location> <crop>, had: {args:?}");
        std::process::exit(1);
    }

    let request = FarmRequest {
        location: args[1].clone(),
        crop: args[2].clone(),
        ..FarmRequest::default()
    };
    if let Err(e) = request.validate() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let config = Config::from_env();
    let api_key = match config.api_key {
        Some(api_key) => api_key,
        None => {
            eprintln!("Must define $GEMINI_API_KEY");
            std::process::exit(1);
        }
    };

    let ai = Ai::new(Gemini::new(&config.gemini_url, &config.model));
    match ai.fetch_recommendation(&api_key, &request.trimmed()).await {
        Ok(recommendation) => println!("{recommendation}"),
        Err(e) => {
            eprintln!("Error generating recommendations: {e:#}");
            std::process::exit(1);
        }
    }
}
