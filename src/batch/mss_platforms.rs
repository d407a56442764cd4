use clap::Parser;
use storefront_linker::{
    api::{MsStoreScrape, WikidataApi},
    games::{self, PlatformQualifier},
    util::keys,
    Tracing,
};
use tracing::info;

/// Qualifies Microsoft Store ids on Wikidata with the platforms listed on
/// their product pages.
#[derive(Parser)]
struct Opts {
    /// File holding the Wikidata bot token.
    #[clap(long, default_value = "keys/wikidata.key")]
    wikidata_key: String,

    /// Process only these items instead of querying for candidates.
    #[clap(long)]
    item: Vec<String>,

    /// Process at most this many items.
    #[clap(long)]
    limit: Option<usize>,

    /// Log edits instead of sending them.
    #[clap(long)]
    dry_run: bool,

    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let opts: Opts = Opts::parse();
    Tracing::setup("batch/mss_platforms", opts.verbose)?;

    let token = match opts.dry_run {
        true => None,
        false => Some(keys::read_key(&opts.wikidata_key)?),
    };
    let wikidata = WikidataApi::new(token)?;
    let scraper = MsStoreScrape::new()?;
    let qualifier = PlatformQualifier::new(&wikidata, &scraper);

    let query = PlatformQualifier::<WikidataApi, MsStoreScrape>::query();
    let items = games::select_items(&wikidata, &query, opts.item, opts.limit).await?;
    let summary = games::run(&wikidata, &qualifier, &items).await;
    info!(
        "mss_platforms done: {} processed, {} failed",
        summary.processed, summary.failed
    );

    Ok(())
}
