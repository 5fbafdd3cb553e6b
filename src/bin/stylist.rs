use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use stylist::catalog::{CatalogIndex, load_catalog, load_embeddings};
use stylist::llm::EmbeddingProviderFactory;
use stylist::{RecommendationPipeline, StylistConfig, StylistError, UserContext};
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const USAGE: &str = "Usage: stylist --catalog <items.json> [--embeddings <rows.json>] \
    --context <context.json> [--config <file>] [--top-k N] [--output <file>] [--stats]";


#[derive(Debug, Default)]
struct Args {
    catalog: Option<PathBuf>,
    embeddings: Option<PathBuf>,
    context: Option<PathBuf>,
    config: Option<PathBuf>,
    top_k: Option<usize>,
    output: Option<PathBuf>,
    stats: bool,
}

impl Args {
    fn parse(raw: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = Self::default();
        let mut raw = raw.into_iter();
        while let Some(flag) = raw.next() {
            let mut value = || raw.next().ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"));
            match flag.as_str() {
                "--catalog" => args.catalog = Some(value()?.into()),
                "--embeddings" => args.embeddings = Some(value()?.into()),
                "--context" => args.context = Some(value()?.into()),
                "--config" => args.config = Some(value()?.into()),
                "--output" => args.output = Some(value()?.into()),
                "--top-k" => {
                    let n = value()?;
                    args.top_k = Some(n.parse().with_context(|| format!("invalid --top-k: {n}"))?);
                }
                "--stats" => args.stats = true,
                "-h" | "--help" => bail!("{USAGE}"),
                other => bail!("unknown argument: {other}\n{USAGE}"),
            }
        }
        Ok(args)
    }
}


async fn run(args: Args) -> anyhow::Result<()> {
    let config = StylistConfig::load(args.config.as_deref())?;

    let catalog_path = args.catalog.ok_or_else(|| anyhow!("--catalog is required\n{USAGE}"))?;
    let items = load_catalog(&catalog_path)?;
    let embeddings = args.embeddings.map(load_embeddings).transpose()?;

    let encoders = if config.embedding.enabled {
        EmbeddingProviderFactory::candidates(&config.embedding).unwrap_or_else(|e| {
            warn!("Embedding client unavailable: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let index = CatalogIndex::load_with_encoders(
        items,
        embeddings,
        encoders,
        Duration::from_millis(config.embedding.timeout_ms),
    )
    .await?;

    let rendered = if args.stats {
        serde_json::to_string_pretty(&index.stats())?
    } else {
        let context_path = args.context.ok_or_else(|| anyhow!("--context is required\n{USAGE}"))?;
        let context = UserContext::load(&context_path)?;
        let pipeline = RecommendationPipeline::new(Arc::new(index), &config);
        let top_k = args.top_k.unwrap_or(config.search.top_k);
        pipeline.recommend_with_top_k(&context, top_k).await?.to_json()?
    };

    match args.output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}


#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,stylist=info")))
        .init();

    let outcome = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => run(args).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // user-facing errors are reported without the context chain
            match e.downcast_ref::<StylistError>() {
                Some(se) if se.is_user_facing() => error!("{}", se),
                _ => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
