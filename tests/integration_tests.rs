use context_help::{
    context, inspect, inspect_with_options, to_value, Category, Context, Error, FnDescriber,
    Hashing, InspectOptions, Inspector, Object, Record, Report, Shape, Status, TypeNameDescriber,
    Value, ValueMap,
};
use serde::Serialize;
use std::any::Any;
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct Customer {
    id: u32,
    name: String,
    vip: bool,
}

#[derive(Serialize)]
struct Line {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize)]
struct Order {
    order_id: u32,
    customer: Customer,
    lines: Vec<Line>,
    total: f64,
}

fn order() -> Order {
    Order {
        order_id: 1001,
        customer: Customer {
            id: 7,
            name: "Alice".to_string(),
            vip: true,
        },
        lines: vec![
            Line {
                sku: "PEN-1".to_string(),
                price: 1.5,
                quantity: 4,
            },
            Line {
                sku: "INK-2".to_string(),
                price: 6.0,
                quantity: 1,
            },
        ],
        total: 12.0,
    }
}

/// A paginator-like host object: a sequence of pages.
struct Pages(Vec<Value>);

impl Object for Pages {
    fn type_name(&self) -> &str {
        "Paginator"
    }
    fn repr(&self) -> String {
        format!("<Paginator of {}>", self.0.len())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn shape(&self) -> Shape {
        Shape::new().sequence()
    }
    fn size(&self) -> Option<usize> {
        Some(self.0.len())
    }
    fn elements(&self) -> Vec<Value> {
        self.0.clone()
    }
}

/// A lazily-evaluated value that refuses to be hashed.
struct Lazy(&'static str);

impl Object for Lazy {
    fn type_name(&self) -> &str {
        "LazyString"
    }
    fn repr(&self) -> String {
        self.0.to_string()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn hashing(&self) -> Hashing {
        Hashing::Unhashable
    }
}

#[test]
fn test_name_and_tags() {
    let report = inspect(&context!({"name": "Alice", "tags": ["a", "b", "c"]})).unwrap();

    let nodes = report.nodes();
    assert_eq!(nodes.len(), 2);

    let name = &nodes[0];
    assert_eq!(name.label, "name");
    assert_eq!(name.category, Some(Category::Scalar));
    assert_eq!(name.value_summary, "Alice");
    assert!(name.is_leaf());

    let tags = &nodes[1];
    assert_eq!(tags.label, "tags");
    assert_eq!(tags.category, Some(Category::Sequence));
    assert_eq!(tags.type_description, "list (3 items)");
    let summaries: Vec<_> = tags.children.iter().map(|c| c.value_summary.as_str()).collect();
    assert_eq!(summaries, vec!["a", "b", "c"]);
    assert!(tags
        .children
        .iter()
        .all(|c| c.is_leaf() && c.category == Some(Category::Scalar)));
}

#[test]
fn test_self_referencing_mapping() {
    let m = Value::map(Vec::<(String, Value)>::new());
    m.insert("self", m.clone());
    let mut context = Context::new();
    context.insert("self", m);

    let report = inspect(&context).unwrap();
    let node = report.find("self").unwrap();
    assert_eq!(node.category, Some(Category::Mapping));
    assert_eq!(node.status, Status::Ok);
    assert_eq!(node.children.len(), 1);

    let repeat = &node.children[0];
    assert_eq!(repeat.label, "self.self");
    assert_eq!(repeat.status, Status::CycleDetected);
    assert!(repeat.children.is_empty());
}

#[test]
fn test_transitive_cycle_marks_only_the_repeat() {
    let a = Value::list(Vec::new());
    let b = Value::list(vec![a.clone()]);
    a.push(b);
    let mut context = Context::new();
    context.insert("a", a);

    let report = inspect(&context).unwrap();
    let statuses: Vec<_> = report.walk().map(|n| (n.label.as_str(), n.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("a", Status::Ok),
            ("a.0", Status::Ok),
            ("a.0.0", Status::CycleDetected),
        ]
    );
}

#[test]
fn test_long_list_is_previewed() {
    let report = inspect(&context!({"big": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]})).unwrap();
    let big = report.find("big").unwrap();
    assert_eq!(big.type_description, "list (10 items)");
    let labels: Vec<_> = big.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["big.0", "big.1", "big.2", "big.3", "big.4"]);
}

#[test]
fn test_empty_context() {
    let report = inspect(&Context::new()).unwrap();
    assert_eq!(report, Report::NoEntries);
    assert!(report.nodes().is_empty());
    assert_eq!(report.to_string(), "No context given.\n");
}

#[test]
fn test_equal_mappings_describe_identically() {
    let report = inspect(&context!({
        "first": {"x": 1, "y": [1, 2]},
        "second": {"x": 1, "y": [1, 2]}
    }))
    .unwrap();

    let first = report.find("first").unwrap();
    let second = report.find("second").unwrap();
    assert_eq!(first.type_description, second.type_description);
    assert_eq!(first.value_summary, second.value_summary);
    assert_eq!(first.status, Status::Ok);
    assert_eq!(second.status, Status::CycleDetected);
    assert!(second.children.is_empty());
}

#[test]
fn test_inspection_is_idempotent() {
    let shared = Value::map(vec![("k", Value::from("v"))]);
    let set = Value::set(vec![Value::from("b"), Value::from("a"), Value::from(3)]);
    let mut context = Context::new();
    context.insert("set", set);
    context.insert("one", shared.clone());
    context.insert("two", shared);
    context.insert("order", to_value(&order()).unwrap());

    let first = inspect(&context).unwrap();
    let second = inspect(&context).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_depth_cap() {
    let context = context!({"a": {"b": {"c": {"d": {"e": {"f": {"g": 1}}}}}}});
    let report = inspect(&context).unwrap();

    assert_eq!(report.find("a.b.c.d.e.f").unwrap().status, Status::Ok);
    let marker = report.find("a.b.c.d.e.f.g").unwrap();
    assert_eq!(marker.status, Status::TooDeep);
    assert_eq!(marker.depth, 6);
    assert_eq!(marker.type_description, "Too much nesting in context");
    assert_eq!(marker.value_summary, "Giving up.");
    assert!(marker.is_leaf());

    for node in report.walk().filter(|n| n.status != Status::TooDeep) {
        assert!(node.depth <= 5, "{} expanded at depth {}", node.label, node.depth);
    }
}

#[test]
fn test_too_deep_branch_does_not_stop_siblings() {
    let options = InspectOptions::new().with_max_depth(0);
    let report =
        inspect_with_options(&context!({"deep": [[1]], "flat": "ok"}), options).unwrap();

    assert_eq!(report.find("deep.0").unwrap().status, Status::TooDeep);
    assert_eq!(report.find("flat").unwrap().value_summary, "ok");
}

#[test]
fn test_deeply_nested_value_on_small_stack() {
    let report = std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(|| {
            let mut chain = Value::from("bottom");
            for _ in 0..20_000 {
                chain = Value::list(vec![chain]);
            }
            let mut context = Context::new();
            context.insert("chain", chain);
            let report = inspect(&context);
            // Dropping the chain would recurse once per level.
            std::mem::forget(context);
            report
        })
        .unwrap()
        .join()
        .unwrap()
        .unwrap();

    let max_depth = InspectOptions::new().max_depth;
    assert_eq!(report.find("chain").unwrap().status, Status::Ok);
    assert!(report.walk().all(|node| node.depth <= max_depth + 1));
    let markers: Vec<_> = report
        .walk()
        .filter(|node| node.status == Status::TooDeep)
        .collect();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].depth, max_depth + 1);
}

#[test]
fn test_shared_subgraph_inspected_once_per_path() {
    let mut shared = Value::from(1);
    for _ in 0..48 {
        shared = Value::list(vec![shared.clone(), shared]);
    }
    let mut context = Context::new();
    context.insert("diamond", shared);

    let started = Instant::now();
    let report = inspect(&context).unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));

    let root = report.find("diamond").unwrap();
    assert_eq!(root.type_description, "list (2 items)");
    assert_eq!(root.children[0].status, Status::Ok);
    assert_eq!(root.children[1].status, Status::CycleDetected);
    assert!(report.walk().count() < 32);
}

/// A form whose bound field is built anew on every access.
struct Form(&'static str);

impl Object for Form {
    fn type_name(&self) -> &str {
        "Form"
    }
    fn repr(&self) -> String {
        format!("<Form {}>", self.0)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn shape(&self) -> Shape {
        Shape::new().record()
    }
    fn fields(&self) -> Vec<(String, Value)> {
        let mut field = Record::new("BoundField");
        field.insert("name", Value::from(self.0));
        vec![("field".to_string(), Value::record(field))]
    }
}

#[test]
fn test_fresh_records_from_views_are_not_repeats() {
    let mut context = Context::new();
    context.insert("a", Value::object(Form("username")));
    context.insert("b", Value::object(Form("email")));

    let report = inspect(&context).unwrap();
    for label in ["a.field", "b.field"] {
        let field = report.find(label).unwrap();
        assert_eq!(field.status, Status::Ok, "{}", label);
        assert_eq!(field.type_description, "BoundField (1 field)");
        assert_eq!(field.children.len(), 1);
    }
    assert_eq!(report.find("b.field.name").unwrap().value_summary, "email");
}

#[test]
fn test_long_summary_truncated() {
    let mut context = Context::new();
    context.insert("bio", "x".repeat(500));
    let report = inspect(&context).unwrap();

    let bio = report.find("bio").unwrap();
    assert_eq!(bio.value_summary.chars().count(), 100);
    assert!(bio.value_summary.ends_with("..."));
}

#[test]
fn test_typed_order() {
    let mut context = Context::new();
    context.insert("order", to_value(&order()).unwrap());
    let report = inspect(&context).unwrap();

    assert_eq!(report.find("order").unwrap().type_description, "Order (4 fields)");
    assert_eq!(report.find("order.customer.name").unwrap().value_summary, "Alice");
    assert_eq!(
        report.find("order.lines").unwrap().type_description,
        "list (2 items)"
    );
    assert_eq!(report.find("order.lines.1.sku").unwrap().value_summary, "INK-2");
    assert_eq!(report.find("order.total").unwrap().value_summary, "12");
}

#[test]
fn test_host_sequence_object() {
    let pages = Pages((1..=8).map(Value::from).collect());
    let mut context = Context::new();
    context.insert("page_obj", Value::object(pages));

    let report = inspect(&context).unwrap();
    let node = report.find("page_obj").unwrap();
    assert_eq!(node.category, Some(Category::Sequence));
    assert_eq!(node.type_description, "Paginator (8 items)");
    assert_eq!(node.children.len(), 5);
}

#[test]
fn test_unhashable_object_is_still_reported() {
    let mut context = Context::new();
    context.insert("title", Value::object(Lazy("Welcome")));
    let report = inspect(&context).unwrap();

    let title = report.find("title").unwrap();
    assert_eq!(title.status, Status::UnhashableFallback);
    assert_eq!(title.category, Some(Category::Opaque));
    assert_eq!(title.value_summary, "Welcome");
}

#[test]
fn test_describer_replaces_summary() {
    let mut request = Record::new("HttpRequest");
    request.insert("path", Value::from("/orders"));
    let mut context = Context::new();
    context.insert("request", Value::record(request));

    let inspector = Inspector::new(InspectOptions::new())
        .with_describer(TypeNameDescriber::new("HttpRequest", "see request docs"));
    let report = inspector.inspect(&context).unwrap();

    let node = report.find("request").unwrap();
    assert_eq!(node.value_summary, "see request docs");
    assert!(node.is_leaf());
}

#[test]
fn test_describer_failure_aborts() {
    let inspector = Inspector::default().with_describer(FnDescriber::new(
        "numbers",
        |v: &Value| v.is_number(),
        |_: &Value| Err("no docs available".into()),
    ));

    let err = inspector.inspect(&context!({"n": 1})).unwrap_err();
    assert!(matches!(err, Error::Describer { .. }));
    assert!(err.to_string().contains("no docs available"));
}

#[test]
fn test_layered_context_order() {
    let mut base = ValueMap::new();
    base.insert("User".to_string(), Value::from("anonymous"));
    base.insert("debug".to_string(), Value::from(true));
    let mut view = ValueMap::new();
    view.insert("User".to_string(), Value::from("alice"));
    view.insert("amount".to_string(), Value::from(3));

    let report = inspect(&Context::from_layers(vec![base, view])).unwrap();
    let labels: Vec<_> = report.nodes().iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["amount", "debug", "User"]);
    assert_eq!(report.find("User").unwrap().value_summary, "alice");
}

#[test]
fn test_json_rendering() {
    let report = inspect(&context!({"tags": ["a"]})).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["kind"], "entries");
    let tags = &json["entries"][0];
    assert_eq!(tags["label"], "tags");
    assert_eq!(tags["category"], "sequence");
    assert_eq!(tags["type_description"], "list (1 item)");
    assert_eq!(tags["children"][0]["value_summary"], "a");
}

#[test]
fn test_text_rendering() {
    let node = Value::map(Vec::<(String, Value)>::new());
    node.insert("self", node.clone());
    let mut context = Context::new();
    context.insert("node", node);
    context.insert("empty", Value::list(Vec::new()));

    let text = inspect(&context).unwrap().to_string();
    assert_eq!(
        text,
        "Context includes:\n\
         name | type | value\n\
         empty | list (0 items) | (empty)\n\
         node | map (1 item) |\n  \
         node.self | map (1 item) | Previously reached. Skipped\n\
         Context finished.\n"
    );
}

#[test]
fn test_options_from_json_config() {
    let options: InspectOptions =
        serde_json::from_str(r#"{"max_depth": 1, "max_sequence_preview": 2}"#).unwrap();
    assert_eq!(options.max_summary_len, 100);

    let report = inspect_with_options(&context!({"ids": [1, 2, 3]}), options).unwrap();
    assert_eq!(report.find("ids").unwrap().children.len(), 2);
}
