mod config;
mod detail;
mod feed;
mod listing;
mod model;
mod normalizer;
mod utils;

use chrono::Utc;
use config::{load_config, AppConfig};
use detail::{ListingCard, PageMeta, VehicleDetail};
use feed::{FeedState, FetchTicket, HttpFeed, VehicleFeed};
use futures::future::join_all;
use listing::{build_view, Pagination};
use model::{FeedError, VehicleRecord};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

type FetchResult = (FetchTicket, Result<Vec<VehicleRecord>, FeedError>);

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let feed: Arc<dyn VehicleFeed> = match HttpFeed::from_config(&config) {
        Ok(f) => Arc::new(f),
        Err(e) => {
            error!("Failed to initialize feed client: {}", e);
            return;
        }
    };

    info!(
        "🚀 Listing started: mode={}, query='{}', sort={}",
        config.search.mode, config.search.query, config.sort
    );

    let mut state = FeedState::default();
    let mut paging = Pagination::new(config.page_size);
    let (tx, mut rx) = mpsc::channel::<FetchResult>(8);
    let mut ticker = interval(Duration::from_secs(config.refresh_interval_seconds));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ticket = state.issue();
                spawn_fetch(feed.clone(), ticket, tx.clone());
            }
            Some((ticket, result)) = rx.recv() => {
                if !state.is_latest(ticket) {
                    info!("Fetch {:?} finished after a newer one was started.", ticket);
                }
                match result {
                    Ok(records) => {
                        if state.apply(ticket, records, Utc::now()) {
                            render_listing(&state, &config, &mut paging);
                            spawn_details(feed.clone(), config.clone());
                        }
                    }
                    Err(e) => warn!("Feed fetch {:?} failed, keeping previous listing: {}", ticket, e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Shutting down.");
                break;
            }
        }
    }
}

/// Runs one feed fetch in the background and reports back with its ticket.
fn spawn_fetch(feed: Arc<dyn VehicleFeed>, ticket: FetchTicket, tx: mpsc::Sender<FetchResult>) {
    tokio::spawn(async move {
        info!("Fetching vehicles ({:?})...", ticket);
        let result = feed.fetch_vehicles().await;
        if tx.send((ticket, result)).await.is_err() {
            warn!("Listing loop is gone, dropping fetch {:?}", ticket);
        }
    });
}

/// Detail lookups run off the loop so Ctrl-C and new fetches are not held up.
fn spawn_details(feed: Arc<dyn VehicleFeed>, config: Arc<AppConfig>) {
    if config.detail_stock_numbers.is_empty() {
        return;
    }
    tokio::spawn(async move {
        render_details(feed.as_ref(), &config).await;
    });
}

/// Rebuilds the view from the current snapshot and logs the revealed pages.
fn render_listing(state: &FeedState, config: &AppConfig, paging: &mut Pagination) {
    let records = state.records();
    let view = build_view(&records, &config.search, config.sort);

    paging.reset();
    for _ in 1..config.pages {
        if !paging.load_more(view.len()) {
            break;
        }
    }

    let visible = paging.visible(&view);
    info!(
        "Listing: showing {} of {} matching vehicles, {} per page ({} fetched at {})",
        visible.len(),
        view.len(),
        paging.page_size(),
        records.len(),
        state
            .fetched_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".into())
    );

    for record in visible {
        let card = ListingCard::from_record(record);
        info!(
            "🚗 #{} | {} | {} | {} | ${}",
            card.stock_number, card.title, card.subtitle, card.vin_text, card.final_bid
        );
    }

    if paging.has_more(view.len()) {
        info!("More vehicles available beyond page {}.", paging.pages_revealed());
    } else {
        info!("All vehicles loaded.");
    }
}

/// Looks up the configured stock numbers concurrently and logs their detail pages.
async fn render_details(feed: &dyn VehicleFeed, config: &AppConfig) {
    if config.detail_stock_numbers.is_empty() {
        return;
    }

    let lookups = config
        .detail_stock_numbers
        .iter()
        .map(|stock| async move { (stock, feed.fetch_stock(stock).await) });

    for (stock, result) in join_all(lookups).await {
        match result {
            Ok(Some(record)) => {
                let detail = VehicleDetail::from_record(&record);
                let meta = PageMeta::for_record(&record, &config.site_name);
                info!(
                    "📄 {} | #{} | VIN: {} | Final bid: {}",
                    meta.page_title, detail.stock_number, detail.composed_vin, detail.final_bid
                );
                info!(
                    "   {} images, 360 view: {}, {} detail fields, {} new fields",
                    detail.gallery.len(),
                    if detail.has_spin_view() { "yes" } else { "no" },
                    detail.legacy_fields.len(),
                    detail.fresh_fields.len()
                );
                info!("   {}", meta.description);
                let sections = [
                    ("Vehicle Details", &detail.legacy_fields),
                    ("New Details", &detail.fresh_fields),
                ];
                for (section, fields) in sections {
                    if fields.is_empty() {
                        continue;
                    }
                    debug!("   {}:", section);
                    for (name, value) in fields.iter() {
                        debug!("     {}: {}", name.replace('_', " "), value);
                    }
                }
                let page_url = record.stock_number_href.as_deref().unwrap_or_default();
                for (property, content) in meta.tags(page_url) {
                    debug!("   <meta {}=\"{}\">", property, content);
                }
            }
            Ok(None) => warn!("Vehicle not found: {}", stock),
            Err(e) => warn!("Detail lookup for {} failed: {}", stock, e),
        }
    }
}
