use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "wingrid=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Output goes to stderr so it doesn't interleave with the console's tables on
/// stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let tree = HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_amount(2)
        .with_indent_lines(true)
        .with_targets(true)
        .with_deferred_spans(true)
        .with_span_retrace(true);

    // A second call (tests, embedding) keeps whatever is already installed.
    let _ = Registry::default().with(filter).with(tree).try_init();
}
