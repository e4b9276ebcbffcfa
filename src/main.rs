use market_query::{AppConfig, QueryPipeline};
use tracing_subscriber::EnvFilter;

/// Run a handful of example questions through the pipeline and print the
/// answers. With no API keys in the environment everything comes from the
/// synthetic generators, which makes this a self-contained smoke run.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let pipeline = QueryPipeline::new(&config);

    let questions = [
        "What is the current oil price?",
        "Show me oil prices for the last 30 days",
        "What were oil prices between 2023-01-01 and 2023-03-31?",
        "What are current fuel prices in Germany?",
        "What are the current exchange rates for EUR, GBP, and JPY?",
        "What's the weather like in London today?",
    ];

    for question in questions {
        println!("\n> {}", question);
        let result = pipeline.process(question).await;
        println!("{}", result.response.text);

        if let Some(data) = &result.response.data {
            let payload = serde_json::to_value(data).unwrap_or_default();
            if let Some(viz) = payload.get("visualization") {
                println!(
                    "[chart: {} | {} points]",
                    viz["kind"].as_str().unwrap_or("?"),
                    viz["x_axis"].as_array().map(|a| a.len()).unwrap_or(0)
                );
            }
        }
    }
}
