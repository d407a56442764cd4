use clap::Parser;
use storefront_linker::{
    api::{RawgApi, WikidataApi},
    games::{self, Reconciler, SeekerConfig},
    util::keys::Keys,
    Tracing,
};
use tracing::info;

/// Links Wikidata game items to RAWG and imports the storefront ids RAWG
/// knows about.
#[derive(Parser)]
struct Opts {
    /// File holding the RAWG API key.
    #[clap(long, default_value = "keys/rawg.key")]
    rawg_key: String,

    /// File holding the Wikidata bot token.
    #[clap(long, default_value = "keys/wikidata.key")]
    wikidata_key: String,

    /// Storefront property used to search RAWG, e.g. P2725. Entities lacking
    /// it fall back to the Steam application id.
    #[clap(long)]
    matching_property: Option<String>,

    /// Process only these items instead of querying for candidates.
    #[clap(long)]
    item: Vec<String>,

    /// Process at most this many items.
    #[clap(long)]
    limit: Option<usize>,

    /// Number of RAWG search results to consider.
    #[clap(long, default_value = "3")]
    max_results: usize,

    /// Log edits instead of sending them.
    #[clap(long)]
    dry_run: bool,

    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let opts: Opts = Opts::parse();
    Tracing::setup("batch/seek_rawg_id", opts.verbose)?;

    let keys = Keys::from_files(&opts.rawg_key, &opts.wikidata_key, opts.dry_run)?;
    let rawg = RawgApi::new(&keys.rawg)?;
    let wikidata = WikidataApi::new(keys.wikidata)?;
    if wikidata.dry_run() {
        info!("Running without a Wikidata token, edits will not be sent");
    }

    let reconciler = Reconciler::new(
        SeekerConfig {
            matching_property: opts.matching_property,
            max_results: opts.max_results,
            ..SeekerConfig::rawg()
        },
        &wikidata,
        &rawg,
    )?;

    let items = games::select_items(&wikidata, &reconciler.query(), opts.item, opts.limit).await?;
    let summary = games::run(&wikidata, &reconciler, &items).await;
    info!(
        "seek_rawg_id done: {} processed, {} failed",
        summary.processed, summary.failed
    );

    Ok(())
}
