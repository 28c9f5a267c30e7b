use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::event::Event;
use tracing::field::{Field, Visit};
use tracing::{span, Id, Metadata, Subscriber};

/// Prints every trace event as `[component]:<tabs> message`, the tabs coming from the event's
/// nesting depth.
pub struct SegmentPingSubscriber {
    ids: AtomicUsize,
}

impl SegmentPingSubscriber {
    pub fn new() -> Self {
        SegmentPingSubscriber {
            ids: AtomicUsize::new(1),
        }
    }
}

// https://docs.rs/tracing/0.1.7/tracing/subscriber/trait.Subscriber.html
impl Subscriber for SegmentPingSubscriber {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    // The simulation doesn't open spans, but hand out distinct ids anyway
    fn new_span(&self, _span: &span::Attributes) -> Id {
        let id = self.ids.fetch_add(1, Ordering::SeqCst);
        Id::from_u64(id as u64)
    }

    fn record(&self, _span: &Id, _values: &span::Record) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event) {
        let mut line = LineVisitor::default();
        event.record(&mut line);
        println!("[{}]:{}", line.component, line.message);
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[derive(Default)]
struct LineVisitor {
    component: String,
    message: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "component" {
            self.component = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        // the formatted message arrives as fmt::Arguments, whose Debug output is the plain text
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}
