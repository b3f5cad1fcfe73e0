use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "info,holdem_service=debug";

/// Output format of the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Returns `false` when another subscriber was already installed.
pub fn init_logging(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    installed.is_ok()
}

/// One captured tracing event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Collects events in memory so tests can assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            sink: self,
            _subscriber: PhantomData,
        }
    }
}

pub struct TestLayer<S> {
    sink: TestLogSubscriber,
    _subscriber: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.sink.lock().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.store(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.store(field.name(), format!("{value:?}"));
    }
}

impl FieldVisitor {
    fn store(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((name.to_string(), value));
        }
    }
}

/// Installs a capturing subscriber once per process and hands out a cleared handle.
pub fn init_test_logging() -> TestLogSubscriber {
    static CAPTURE: OnceLock<TestLogSubscriber> = OnceLock::new();
    static INSTALLED: OnceLock<bool> = OnceLock::new();

    let capture = CAPTURE.get_or_init(TestLogSubscriber::new);
    INSTALLED.get_or_init(|| {
        let registry = Registry::default().with(capture.clone().into_layer::<Registry>());
        tracing::subscriber::set_global_default(registry).is_ok()
    });
    capture.clear();
    capture.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{error, info, warn};

    fn capture<F: FnOnce()>(f: F) -> Vec<LogEntry> {
        let sink = TestLogSubscriber::new();
        let registry = Registry::default().with(sink.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, f);
        sink.entries()
    }

    #[test]
    fn captures_levels_in_order() {
        let entries = capture(|| {
            info!("seated");
            warn!("idle");
            error!("deck ran out");
        });
        let levels: Vec<_> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![Level::INFO, Level::WARN, Level::ERROR]);
        assert!(entries[2].message.contains("deck ran out"));
    }

    #[test]
    fn captures_structured_fields() {
        let entries = capture(|| {
            info!(session = "42/7", player_id = 9_i64, "player joined");
        });
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field("session"), Some("42/7"));
        assert_eq!(entries[0].field("player_id"), Some("9"));
    }

    #[test]
    fn clear_drops_history() {
        let sink = TestLogSubscriber::new();
        let registry = Registry::default().with(sink.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, || info!("one"));
        sink.clear();
        assert!(sink.entries().is_empty());
    }
}
