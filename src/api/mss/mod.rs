mod mss_scrape;

pub use mss_scrape::MsStoreScrape;
