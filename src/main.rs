use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use ragline::core::config::{AppPaths, EngineConfig};
use ragline::index::SqliteIndex;
use ragline::llm::OpenAiProvider;
use ragline::rag::{QueryOutcome, QueryPipeline};

fn parse_query() -> Option<String> {
    let mut args = env::args().skip(1);
    let query = args.next()?;
    if args.next().is_some() {
        return None;
    }
    Some(query)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let paths = AppPaths::new();
    ragline::logging::init(&paths);

    let Some(query) = parse_query() else {
        eprintln!("Usage: ragline \"<query text>\"");
        return Ok(ExitCode::from(2));
    };

    let config = EngineConfig::load(&AppPaths::config_path())?;
    let index_path = config
        .index
        .path
        .clone()
        .unwrap_or_else(|| paths.index_path.clone());

    let provider = Arc::new(OpenAiProvider::new(&config.provider)?);
    let index = Arc::new(SqliteIndex::open(&index_path).await?);
    let pipeline = QueryPipeline::new(&config, provider, index)?;

    match pipeline.answer(&query).await? {
        QueryOutcome::Answered { response, prompt } => {
            println!("{prompt}");
            println!("Response: {}", response.answer);
            println!("Sources: {}", response.sources.join(", "));
        }
        QueryOutcome::NoMatch => {
            println!("No matching results found.");
        }
    }

    Ok(ExitCode::SUCCESS)
}
