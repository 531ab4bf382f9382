//! Inspecting a template context built from dynamic and typed values.
//!
//! Run with: cargo run --example dynamic_values

use context_help::{
    context, to_value, InspectOptions, Inspector, Object, Shape, TypeNameDescriber, Value,
};
use serde::Serialize;
use std::any::Any;
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

/// A host paginator exposing its current page as a sequence.
struct Page {
    number: usize,
    items: Vec<Value>,
}

impl Object for Page {
    fn type_name(&self) -> &str {
        "Page"
    }

    fn repr(&self) -> String {
        format!("<Page {}>", self.number)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape {
        Shape::new().sequence()
    }

    fn elements(&self) -> Vec<Value> {
        self.items.clone()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut context = context!({
        "title": "Team overview",
        "features": ["auth", "logging", "metrics"],
        "settings": {"theme": "dark", "per_page": 2}
    });

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };
    context.insert("user", to_value(&user)?);

    // A node that points back at itself is reported once, then skipped.
    let menu = Value::map(vec![("label", Value::from("Home"))]);
    menu.insert("parent", menu.clone());
    context.insert("menu", menu);

    context.insert(
        "page_obj",
        Value::object(Page {
            number: 1,
            items: (1..=12).map(|i| Value::from(format!("item {}", i))).collect(),
        }),
    );

    let inspector = Inspector::new(InspectOptions::new().with_max_sequence_preview(3))
        .with_describer(TypeNameDescriber::new("Page", "a page of results (see pagination docs)"));

    let report = inspector.inspect(&context)?;

    println!("{}", report);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
