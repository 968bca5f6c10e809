use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

use privsearch::api::create_router;
use privsearch::config::Config;
use privsearch::data_models::{Category, SearchRequestParams};
use privsearch::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "privsearch", about = "Privacy-preserving search with AI summaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Run one search against the configured upstreams and print the response.
    Search {
        query: String,
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long, default_value_t = 5)]
        num_results: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Bridge log crate -> tracing (so log::info! etc. work)
    LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pipeline = Arc::new(Pipeline::from_config(&config)?);

    match cli.command {
        Command::Serve { bind } => {
            let app = create_router(pipeline, &config.allowed_origins);
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            tracing::info!(
                "listening on {bind}, searxng at {}, context cap {}",
                config.searxng_url,
                config.context_cap
            );
            axum::serve(listener, app).await?;
        }
        Command::Search {
            query,
            category,
            language,
            num_results,
        } => {
            let params =
                SearchRequestParams::new(query, Category::parse(&category), language, num_results);
            let response = pipeline.search(&params).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
