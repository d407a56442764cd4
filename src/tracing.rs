use crate::Status;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub struct Tracing;

impl Tracing {
    /// Logs to stdout. `verbose` also surfaces debug events, including the
    /// encoded request events.
    pub fn setup(name: &str, verbose: bool) -> Result<(), Status> {
        let level = match verbose {
            true => LevelFilter::DEBUG,
            false => LevelFilter::INFO,
        };

        match tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::Layer::new()
                    .with_writer(std::io::stdout)
                    .with_filter(level),
            )
            .try_init()
        {
            Ok(()) => {
                ::tracing::info!("{name} started");
                Ok(())
            }
            Err(e) => {
                eprintln!("{e}");
                Err(Status::new("Failed to setup tracing", e))
            }
        }
    }
}
