#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! Verifies the `format_document` span and the diagnostic events emitted for
//! unsupported tags, cache traffic and the markup heuristic.
//!
//!   cargo test -p snippet-hl --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use snippet_hl::{DocumentCache, HighlightConfig, Language, format};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its recorded fields.
#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

/// A captured event with its level and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

/// A tracing Layer that captures spans (including late-recorded fields) and
/// events.
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    by_id: Arc<Mutex<HashMap<tracing::span::Id, usize>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Handle to read captured data after the closure ran.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    fn events_with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message() == message)
            .collect()
    }
}

/// Visitor that extracts fields as strings.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let mut spans = self.spans.lock().unwrap();
        self.by_id.lock().unwrap().insert(id.clone(), spans.len());
        spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        values.record(&mut visitor);

        let Some(&index) = self.by_id.lock().unwrap().get(id) else {
            return;
        };
        if let Some(span) = self.spans.lock().unwrap().get_mut(index) {
            span.fields.extend(visitor.0);
        }
    }

    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

/// Set up a tracing subscriber with capture and run a closure.
fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        by_id: Arc::new(Mutex::new(HashMap::new())),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn format_emits_document_span_with_fields() {
    let handle = with_capture(|| {
        format("let a = 1;\nlet b = 2;\n", "ts", None).unwrap();
    });

    let spans = handle.spans_named("format_document");
    assert_eq!(spans.len(), 1, "one span per formatting pass: {spans:?}");
    let fields = &spans[0].fields;
    assert_eq!(fields.get("language").map(String::as_str), Some("typescript"));
    assert_eq!(fields.get("bytes").map(String::as_str), Some("22"));
    assert_eq!(fields.get("lines").map(String::as_str), Some("3"));
}

#[test]
fn one_span_per_call() {
    let handle = with_capture(|| {
        for tag in ["json", "sh", "tsx"] {
            format("x", tag, None).unwrap();
        }
    });
    let languages: Vec<_> = handle
        .spans_named("format_document")
        .into_iter()
        .filter_map(|s| s.fields.get("language").cloned())
        .collect();
    assert_eq!(languages, vec!["json", "bash", "typescript"]);
}

#[test]
fn unsupported_tag_warns() {
    let handle = with_capture(|| {
        assert!(format("x", "kotlin", None).is_err());
    });

    let warnings = handle.events_with_message("unsupported language tag");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, tracing::Level::WARN);
    assert_eq!(
        warnings[0].fields.get("tag").map(String::as_str),
        Some("kotlin")
    );
    assert!(handle.spans_named("format_document").is_empty());
}

#[test]
fn cache_traffic_is_traced() {
    let handle = with_capture(|| {
        let mut cache = DocumentCache::new(4);
        let config = HighlightConfig::default();
        cache.get_or_format("ls", Language::Bash, None, &config);
        cache.get_or_format("ls", Language::Bash, None, &config);
    });

    assert_eq!(handle.events_with_message("document cache miss").len(), 1);
    assert_eq!(handle.events_with_message("document cache hit").len(), 1);
    // Only the miss formats.
    assert_eq!(handle.spans_named("format_document").len(), 1);
}

#[test]
fn markup_heuristic_adjustment_is_traced() {
    let handle = with_capture(|| {
        // `=>` gives a `>` with no `<`, which resets the markup context.
        format("<a\n  b={() => c}\nd", "tsx", None).unwrap();
    });

    let adjustments = handle.events_with_message("line heuristic adjusted markup context");
    assert_eq!(adjustments.len(), 1, "{adjustments:?}");
    assert_eq!(adjustments[0].level, tracing::Level::TRACE);
    assert_eq!(
        adjustments[0]
            .fields
            .get("in_markup_element")
            .map(String::as_str),
        Some("false")
    );
}
