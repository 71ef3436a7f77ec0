use std::sync::{Arc, Mutex};

use json_view_store::{
    connect, shared, ActionChannel, AttributeStore, EventClass, HandlerError, Request, RequestKind,
    SharedBus, SharedStore, StoreError, VARIABLE_UPDATE,
};
use json_view_value::Node;
use serde_json::{json, Value};

struct Harness {
    channel: ActionChannel,
    store: SharedStore,
    bus: SharedBus,
}

impl Harness {
    fn new() -> Self {
        let (store, bus) = shared(AttributeStore::new());
        let mut channel = ActionChannel::new();
        connect(&mut channel, Arc::clone(&store), Arc::clone(&bus));
        Self { channel, store, bus }
    }

    fn seed(&self, rjv_id: &str, src: Value) -> Node {
        let node = Node::from(src);
        self.store.lock().unwrap().set_src(rjv_id, node.clone());
        node
    }

    fn src(&self, rjv_id: &str) -> Node {
        self.store.lock().unwrap().src(rjv_id).unwrap_or_default()
    }

    /// Records every event of `class` for `rjv_id`.
    fn record(&self, rjv_id: &str, class: EventClass) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        self.bus
            .lock()
            .unwrap()
            .subscribe(rjv_id, class, move |event| sink.lock().unwrap().push(event.name()));
        seen
    }
}

#[test]
fn update_nested_value_shares_siblings() {
    let mut h = Harness::new();
    let before = h.seed("A", json!({"a": {"b": 1}, "c": {"d": [1, 2]}}));
    let events = h.record("A", EventClass::VariableUpdate);

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableUpdated, "A")
                .with_namespace(["root", "a"])
                .with_name("b")
                .with_new_value(2i64),
        )
        .unwrap();

    let after = h.src("A");
    assert_eq!(after.to_value(), json!({"a": {"b": 2}, "c": {"d": [1, 2]}}));
    assert_eq!(before.to_value(), json!({"a": {"b": 1}, "c": {"d": [1, 2]}}));
    assert!(!after.get("a").unwrap().ptr_eq(before.get("a").unwrap()));
    assert!(after.get("c").unwrap().ptr_eq(before.get("c").unwrap()));
    assert_eq!(events.lock().unwrap().as_slice(), &["variable-update-A".to_string()]);
}

#[test]
fn remove_array_element() {
    let mut h = Harness::new();
    h.seed("A", json!({"list": [10, 20, 30]}));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableRemoved, "A")
                .with_namespace(["root", "list"])
                .with_name(1usize)
                .removed(),
        )
        .unwrap();

    assert_eq!(h.src("A").to_value(), json!({"list": [10, 30]}));
    let record = h
        .store
        .lock()
        .unwrap()
        .get_attribute("A", "action", VARIABLE_UPDATE, Node::Null);
    assert_eq!(record.get("type"), Some(&Node::from("variable-removed")));
}

#[test]
fn rename_key() {
    let mut h = Harness::new();
    h.seed("A", json!({"x": 1}));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableKeyUpdated, "A")
                .with_namespace(["root"])
                .with_name("x")
                .with_key_name("y")
                .with_existing_value(1i64)
                .key_updated(),
        )
        .unwrap();

    let src = h.src("A");
    assert_eq!(src.to_value(), json!({"y": 1}));
    assert_eq!(src.get("x"), None);
}

#[test]
fn rename_onto_existing_key_keeps_both() {
    let mut h = Harness::new();
    h.seed("A", json!({"x": 1, "y": 1}));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableKeyUpdated, "A")
                .with_namespace(["root"])
                .with_name("x")
                .with_key_name("y")
                .with_existing_value(1i64)
                .key_updated(),
        )
        .unwrap();

    assert_eq!(h.src("A").to_value(), json!({"y": 1, "y-copy": 1}));
}

#[test]
fn key_prompts_leave_src_alone() {
    let mut h = Harness::new();
    let before = h.seed("A", json!({"a": 1}));
    let adds = h.record("A", EventClass::AddKeyRequest);
    let edits = h.record("A", EventClass::EditKeyRequest);
    let updates = h.record("A", EventClass::VariableUpdate);

    h.channel
        .dispatch(&Request::new(RequestKind::AddKeyRequest, "A").with_namespace(["root"]))
        .unwrap();
    h.channel
        .dispatch(
            &Request::new(RequestKind::EditKeyRequest, "A")
                .with_namespace(["root"])
                .with_name("a"),
        )
        .unwrap();

    assert!(h.src("A").ptr_eq(&before));
    assert_eq!(adds.lock().unwrap().as_slice(), &["add-key-request-A".to_string()]);
    assert_eq!(edits.lock().unwrap().as_slice(), &["edit-key-request-A".to_string()]);
    assert!(updates.lock().unwrap().is_empty());
}

#[test]
fn two_phase_key_insert() {
    let mut h = Harness::new();
    h.seed("A", json!({"a": 1}));

    h.channel
        .dispatch(&Request::new(RequestKind::AddKeyRequest, "A").with_namespace(["root"]))
        .unwrap();
    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableAdded, "A")
                .with_namespace(["root"])
                .with_new_value(json!({"b": "typed by the user"})),
        )
        .unwrap();
    assert_eq!(h.src("A").to_value(), json!({"a": 1, "b": null}));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableUpdated, "A")
                .with_namespace(["root"])
                .with_name("b")
                .with_new_value("filled"),
        )
        .unwrap();
    assert_eq!(h.src("A").to_value(), json!({"a": 1, "b": "filled"}));
}

#[test]
fn reset_emits_without_changing_state() {
    let mut h = Harness::new();
    let before = h.seed("A", json!([1]));
    let resets = h.record("A", EventClass::Reset);
    let other = h.record("B", EventClass::Reset);

    h.channel.dispatch(&Request::reset("A")).unwrap();

    assert!(h.src("A").ptr_eq(&before));
    assert_eq!(resets.lock().unwrap().len(), 1);
    assert!(other.lock().unwrap().is_empty());
}

#[test]
fn listeners_can_read_the_store_during_emit() {
    let mut h = Harness::new();
    h.seed("A", json!({"n": 0}));
    let store = Arc::clone(&h.store);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.bus
        .lock()
        .unwrap()
        .subscribe("A", EventClass::VariableUpdate, move |event| {
            let src = store.lock().unwrap().src(&event.rjv_id).unwrap_or_default();
            sink.lock().unwrap().push(src.to_value());
        });

    for n in 1..=3i64 {
        h.channel
            .dispatch(
                &Request::new(RequestKind::VariableUpdated, "A")
                    .with_namespace(["root"])
                    .with_name("n")
                    .with_new_value(n),
            )
            .unwrap();
    }

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]
    );
}

#[test]
fn malformed_path_fails_loudly_and_keeps_state() {
    let mut h = Harness::new();
    let before = h.seed("A", json!({"a": {}}));
    let updates = h.record("A", EventClass::VariableUpdate);
    let after_store = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&after_store);
    h.channel.register(move |_| {
        *counter.lock().unwrap() += 1;
        Ok(())
    });

    let err = h
        .channel
        .dispatch(
            &Request::new(RequestKind::VariableUpdated, "A")
                .with_namespace(["root", "a", "stale"])
                .with_name("b")
                .with_new_value(1i64),
        )
        .unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert!(matches!(
        err.failures[0].1,
        HandlerError::Store(StoreError::Mutation { .. })
    ));
    assert_eq!(*after_store.lock().unwrap(), 1);
    assert!(h.src("A").ptr_eq(&before));
    assert!(updates.lock().unwrap().is_empty());
}

#[test]
fn index_past_end_fails_without_breaking_other_instances() {
    let mut h = Harness::new();
    let a_before = h.seed("A", json!({"list": [1]}));
    h.seed("B", json!({"n": 0}));
    let b_updates = h.record("B", EventClass::VariableUpdate);

    let request = Request::from_json(json!({
        "kind": "VARIABLE_UPDATED",
        "rjvId": "A",
        "name": u64::MAX,
        "namespace": ["root", "list"],
        "new_value": 2
    }))
    .unwrap();
    let err = h.channel.dispatch(&request).unwrap_err();
    assert!(matches!(
        err.failures[0].1,
        HandlerError::Store(StoreError::Mutation { .. })
    ));
    assert!(h.src("A").ptr_eq(&a_before));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableUpdated, "B")
                .with_namespace(["root"])
                .with_name("n")
                .with_new_value(1i64),
        )
        .unwrap();
    assert_eq!(h.src("B").to_value(), json!({"n": 1}));
    assert_eq!(b_updates.lock().unwrap().len(), 1);
}

#[test]
fn unknown_kind_is_ignored() {
    let mut h = Harness::new();
    let before = h.seed("A", json!({"a": 1}));
    let updates = h.record("A", EventClass::VariableUpdate);

    let request = Request::from_json(json!({"kind": "TOGGLE_THEME", "rjvId": "A"})).unwrap();
    h.channel.dispatch(&request).unwrap();

    assert!(h.src("A").ptr_eq(&before));
    assert!(updates.lock().unwrap().is_empty());
}

#[test]
fn json_payloads_from_a_viewer() {
    let mut h = Harness::new();
    h.seed("A", json!({"users": [{"name": "ann"}, {"name": "bob"}]}));

    let request = Request::from_json(json!({
        "kind": "VARIABLE_UPDATED",
        "rjvId": "A",
        "name": "name",
        "namespace": ["root", "users", 1],
        "new_value": "bea",
        "existing_value": "bob",
        "variable_removed": false
    }))
    .unwrap();
    h.channel.dispatch(&request).unwrap();

    assert_eq!(
        h.src("A").to_value(),
        json!({"users": [{"name": "ann"}, {"name": "bea"}]})
    );
}

#[test]
fn dispose_releases_state_and_subscriptions() {
    let mut h = Harness::new();
    h.seed("A", json!({"a": 1}));
    h.seed("B", json!({"b": 2}));
    let b_updates = h.record("B", EventClass::VariableUpdate);
    h.record("A", EventClass::VariableUpdate);

    assert!(h.store.lock().unwrap().dispose("A"));
    assert_eq!(h.bus.lock().unwrap().dispose("A"), 1);
    assert_eq!(h.store.lock().unwrap().src("A"), None);
    assert_eq!(h.src("B").to_value(), json!({"b": 2}));

    h.channel
        .dispatch(
            &Request::new(RequestKind::VariableUpdated, "B")
                .with_namespace(["root"])
                .with_name("b")
                .with_new_value(3i64),
        )
        .unwrap();
    assert_eq!(b_updates.lock().unwrap().len(), 1);
}
