use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::normalize_base_url, load_settings, AnalysisOutcome, ArticleCard, NewsSession,
    SearchOutcome, SearchRoute, TranslationOutcome,
};
use shared::domain::Language;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "biaslens", about = "Search, analyze and translate news articles")]
struct Cli {
    /// Overrides the configured backend base URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[arg(long, global = true)]
    search_route: Option<SearchRoute>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Search {
        query: String,
    },
    Analyze {
        query: String,
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Translate the summary into each language, in order.
        #[arg(long = "lang")]
        languages: Vec<Language>,
    },
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(raw) = &cli.api_base_url {
        settings.api_base_url = normalize_base_url(raw).context("invalid --api-base-url")?;
    }
    if let Some(route) = cli.search_route {
        settings.search_route = route;
    }
    let settings = settings.validated().context("invalid client settings")?;
    info!(
        api_base_url = %settings.api_base_url,
        search_route = ?settings.search_route,
        "cli: using backend"
    );
    let session = NewsSession::from_settings(&settings).context("building http client")?;

    match cli.command {
        Command::Search { query } => {
            if let Some(cards) = run_search(&session, &query).await {
                for card in &cards {
                    print_card(card);
                }
            }
        }
        Command::Analyze {
            query,
            index,
            languages,
        } => {
            let Some(cards) = run_search(&session, &query).await else {
                return Ok(());
            };
            let Some(card) = cards.get(index) else {
                bail!("no article at index {index}; search returned {}", cards.len());
            };
            print_card(card);
            let id = card.id();

            match session.analyze(id).await {
                Ok(AnalysisOutcome::Analyzed(result)) => {
                    println!("summary:   {}", result.summary);
                    println!("sentiment: {}", result.sentiment);
                    println!("bias:      {}", result.bias);
                }
                Ok(outcome) => {
                    warn!(?outcome, "cli: analysis not applied");
                    println!("analysis not applied: {outcome:?}");
                    return Ok(());
                }
                Err(err) => {
                    warn!(error = %err, "cli: analysis failed");
                    println!("analysis failed: {err}");
                    return Ok(());
                }
            }

            for language in languages {
                let outcome = session.translate(id, language).await?;
                let displayed = session
                    .card(id)
                    .await
                    .and_then(|card| {
                        card.analysis()
                            .analyzed()
                            .map(|a| a.translation().displayed_text().to_string())
                    })
                    .unwrap_or_default();
                match outcome {
                    TranslationOutcome::Applied => {
                        println!("[{}] {displayed}", language.name())
                    }
                    TranslationOutcome::Reverted => println!(
                        "[{}] translation failed, showing original: {displayed}",
                        language.name()
                    ),
                    TranslationOutcome::Discarded => {}
                }
            }
        }
        Command::Health => {
            session.health().await.context("backend health probe")?;
            println!("backend at {} is healthy", settings.api_base_url);
        }
    }

    Ok(())
}

async fn run_search(session: &NewsSession, query: &str) -> Option<Vec<ArticleCard>> {
    match session.search(query).await {
        Ok(SearchOutcome::Results(_)) => {
            let cards = session.snapshot().await.cards().to_vec();
            if cards.is_empty() {
                println!("no articles found for {query:?}");
            }
            Some(cards)
        }
        Ok(SearchOutcome::Ignored) => {
            println!("enter a search query");
            None
        }
        Ok(SearchOutcome::Superseded) => None,
        Err(err) => {
            println!("{err}");
            None
        }
    }
}

fn print_card(card: &ArticleCard) {
    let article = card.article();
    println!("{:>3}. {}", card.id().index, article.title);
    println!(
        "     {} | sentiment {} ({}) | bias {} ({})",
        article.source,
        article.sentiment,
        card.sentiment_badge().style_token(),
        article.bias,
        card.bias_badge().style_token(),
    );
    println!("     {}", article.url);
}
