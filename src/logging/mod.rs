use crate::cli::Args;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FALLBACK_FILTER: &str = "geoguess_server=info";

pub fn init(args: &Args) {
    let env_filter = EnvFilter::try_new(&args.log_filter).unwrap_or_else(|err| {
        eprintln!(
            "Invalid log filter `{}` ({err}), falling back to `{FALLBACK_FILTER}`.",
            args.log_filter
        );
        EnvFilter::new(FALLBACK_FILTER)
    });
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}
