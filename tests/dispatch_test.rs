//! End-to-end dispatch behavior: delivery, ordering, hierarchy, context
//! sharing, and the fail-fast failure policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use evoke::{
    impl_event, DispatchError, Event, EventManager, Group, HandlerError, Handlers, HandlerTable,
    NoParent,
};

#[derive(Default)]
struct CallLog {
    calls: Vec<String>,
}

struct Message {
    body: &'static str,
}
impl_event!(Message, context = CallLog);

// ---------------------------------------------------------------------------
// Priority ordering
// ---------------------------------------------------------------------------

struct Spread;

impl Spread {
    fn highest(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push("highest".into());
    }
    fn high_late(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push("high_late".into());
    }
    fn high_early(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push("high_early".into());
    }
    fn normal(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push("normal".into());
    }
    fn lowest(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push("lowest".into());
    }
}

impl Handlers for Spread {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("lowest", Self::lowest).handler().group(Group::Lowest);
        table.method("normal", Self::normal).handler();
        table
            .method("high_late", Self::high_late)
            .handler()
            .group(Group::High)
            .ordinal(-5);
        table
            .method("high_early", Self::high_early)
            .handler()
            .group(Group::High)
            .ordinal(5);
        table.method("highest", Self::highest).handler().group(Group::Highest);
    }
}

#[test]
fn test_handlers_run_in_group_then_ordinal_order() {
    let manager = EventManager::create();
    manager.register(Arc::new(Spread)).unwrap();

    let log = manager.invoke(&Message { body: "order" }).unwrap();
    assert_eq!(
        log.calls,
        vec!["highest", "high_early", "high_late", "normal", "lowest"]
    );
}

// ---------------------------------------------------------------------------
// Tie-break by registration order
// ---------------------------------------------------------------------------

struct Tagged {
    tag: &'static str,
}

impl Tagged {
    fn on_message(&self, _event: &Message, log: &mut CallLog) {
        log.calls.push(self.tag.into());
    }
}

impl Handlers for Tagged {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("on_message", Self::on_message).handler();
    }
}

#[test]
fn test_identical_priorities_tie_break_by_registration_order() {
    let manager = EventManager::create();
    for tag in ["a", "b", "c", "d"] {
        manager.register(Arc::new(Tagged { tag })).unwrap();
    }

    let log = manager.invoke(&Message { body: "ties" }).unwrap();
    assert_eq!(log.calls, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_every_matched_handler_runs_exactly_once_per_invoke() {
    let manager = EventManager::create();
    manager.register(Arc::new(Tagged { tag: "once" })).unwrap();

    let first = manager.invoke(&Message { body: "1" }).unwrap();
    let second = manager.invoke(&Message { body: "2" }).unwrap();
    assert_eq!(first.calls, vec!["once"]);
    assert_eq!(second.calls, vec!["once"]);
}

#[test]
fn test_invoke_without_handlers_returns_default_context() {
    let manager = EventManager::create();
    let log = manager.invoke(&Message { body: "void" }).unwrap();
    assert!(log.calls.is_empty());
}

// ---------------------------------------------------------------------------
// Event hierarchy
// ---------------------------------------------------------------------------

struct Lifecycle;
impl Event for Lifecycle {
    type Context = CallLog;
    type Parent = NoParent;
}

struct Started {
    base: Lifecycle,
}
impl Event for Started {
    type Context = CallLog;
    type Parent = Lifecycle;
    fn parent(&self) -> Option<&Lifecycle> {
        Some(&self.base)
    }
}

struct LifecycleWatcher;

impl LifecycleWatcher {
    fn on_any(&self, _event: &Lifecycle, log: &mut CallLog) {
        log.calls.push("any".into());
    }
    fn on_started(&self, _event: &Started, log: &mut CallLog) {
        log.calls.push("started".into());
    }
}

impl Handlers for LifecycleWatcher {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("on_any", Self::on_any).handler();
        table.method("on_started", Self::on_started).handler();
    }
}

#[test]
fn test_subtype_event_reaches_supertype_handlers() {
    let manager = EventManager::create();
    manager.register(Arc::new(LifecycleWatcher)).unwrap();

    let log = manager.invoke(&Started { base: Lifecycle }).unwrap();
    assert_eq!(log.calls.len(), 2);
    assert!(log.calls.contains(&"any".to_string()));
    assert!(log.calls.contains(&"started".to_string()));
}

#[test]
fn test_supertype_event_does_not_reach_subtype_handlers() {
    let manager = EventManager::create();
    manager.register(Arc::new(LifecycleWatcher)).unwrap();

    let log = manager.invoke(&Lifecycle).unwrap();
    assert_eq!(log.calls, vec!["any"]);
}

struct StartedOnly;

impl StartedOnly {
    // Receives the Lifecycle view, but only when a Started is published.
    fn on_lifecycle(&self, _event: &Lifecycle, log: &mut CallLog) {
        log.calls.push("narrowed".into());
    }
}

impl Handlers for StartedOnly {
    fn describe(table: &mut HandlerTable<Self>) {
        table
            .method("on_lifecycle", Self::on_lifecycle)
            .handler()
            .event::<Started>();
    }
}

#[test]
fn test_key_override_narrows_dispatch_to_the_marked_subtype() {
    let manager = EventManager::create();
    manager.register(Arc::new(StartedOnly)).unwrap();

    let on_base = manager.invoke(&Lifecycle).unwrap();
    assert!(on_base.calls.is_empty(), "must not fire for the bare supertype");

    let on_started = manager.invoke(&Started { base: Lifecycle }).unwrap();
    assert_eq!(on_started.calls, vec!["narrowed"]);
}

// ---------------------------------------------------------------------------
// Shared context
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Shared {
    value: String,
    observed: String,
}

struct Probe;
impl_event!(Probe, context = Shared);

struct Writer;
impl Writer {
    fn write(&self, _event: &Probe, shared: &mut Shared) {
        shared.value = "B".into();
    }
}
impl Handlers for Writer {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("write", Self::write).handler().group(Group::Highest);
    }
}

struct Reader;
impl Reader {
    fn read(&self, _event: &Probe, shared: &mut Shared) {
        shared.observed = shared.value.clone();
    }
}
impl Handlers for Reader {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("read", Self::read).handler().group(Group::Lowest);
    }
}

#[test]
fn test_context_mutations_are_visible_to_later_handlers() {
    let manager = EventManager::create();
    manager.register(Arc::new(Reader)).unwrap();
    manager.register(Arc::new(Writer)).unwrap();

    let shared = manager.invoke(&Probe).unwrap();
    assert_eq!(shared.value, "B");
    assert_eq!(shared.observed, "B", "the later handler must see the earlier write");
}

// ---------------------------------------------------------------------------
// Failure policy: fail-fast
// ---------------------------------------------------------------------------

struct Ping;
impl_event!(Ping);

struct Brittle {
    ran: Mutex<Vec<&'static str>>,
}

impl Brittle {
    fn before(&self, _event: &Ping) {
        self.ran.lock().unwrap().push("before");
    }
    fn failing(&self, _event: &Ping) -> Result<(), HandlerError> {
        self.ran.lock().unwrap().push("failing");
        Err("boom".into())
    }
    fn after(&self, _event: &Ping) {
        self.ran.lock().unwrap().push("after");
    }
}

impl Handlers for Brittle {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("before", Self::before).handler().group(Group::Highest);
        table.method("failing", Self::failing).handler();
        table.method("after", Self::after).handler().group(Group::Lowest);
    }
}

#[test]
fn test_first_failing_handler_aborts_the_rest() {
    let manager = EventManager::create();
    let brittle = Arc::new(Brittle {
        ran: Mutex::new(Vec::new()),
    });
    manager.register(brittle.clone()).unwrap();

    let err = manager.invoke(&Ping).unwrap_err();
    assert_eq!(err.as_label(), "handler_failed");
    match err {
        DispatchError::Handler { method, .. } => assert_eq!(method, "failing"),
        other => panic!("unexpected error: {other}"),
    }

    let ran = brittle.ran.lock().unwrap();
    assert_eq!(*ran, vec!["before", "failing"], "handlers after the failure must not run");
}

#[test]
fn test_failed_dispatch_leaves_the_registry_usable() {
    let manager = EventManager::create();
    let brittle = Arc::new(Brittle {
        ran: Mutex::new(Vec::new()),
    });
    manager.register(brittle.clone()).unwrap();

    assert!(manager.invoke(&Ping).is_err());
    assert!(manager.invoke(&Ping).is_err());

    // Two publishes, two identical fail-fast runs.
    let ran = brittle.ran.lock().unwrap();
    assert_eq!(*ran, vec!["before", "failing", "before", "failing"]);
}

// ---------------------------------------------------------------------------
// Context divergence across hierarchy levels
// ---------------------------------------------------------------------------

#[derive(Default, Debug)]
struct AlertNote {
    text: String,
}

struct Signal;
impl Event for Signal {
    type Context = ();
    type Parent = NoParent;
}

struct Alert {
    base: Signal,
}
impl Event for Alert {
    type Context = AlertNote;
    type Parent = Signal;
    fn parent(&self) -> Option<&Signal> {
        Some(&self.base)
    }
}

struct SignalCounter {
    hits: AtomicUsize,
}

impl SignalCounter {
    fn on_signal(&self, _event: &Signal, _note: &mut ()) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
}

impl Handlers for SignalCounter {
    fn describe(table: &mut HandlerTable<Self>) {
        table.method("on_signal", Self::on_signal).handler();
    }
}

#[test]
fn test_context_divergence_surfaces_payload_mismatch() {
    let manager = EventManager::create();
    let counter = Arc::new(SignalCounter {
        hits: AtomicUsize::new(0),
    });
    manager.register(counter.clone()).unwrap();

    // Published as the root: context types line up.
    manager.invoke(&Signal).unwrap();
    assert_eq!(counter.hits.load(Ordering::Relaxed), 1);

    // Published as the subtype: the subtype's context is AlertNote, the
    // handler declared the root's `()` context.
    let err = manager.invoke(&Alert { base: Signal }).unwrap_err();
    assert_eq!(err.as_label(), "payload_mismatch");
    assert_eq!(counter.hits.load(Ordering::Relaxed), 1);
}
