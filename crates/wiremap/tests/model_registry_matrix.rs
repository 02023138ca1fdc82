//! Type model caching across threads, recursive records, and round-trip
//! properties over generated scalar records.

use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;
use serde_json::{json, Value};
use wiremap::{
    decode, decode_value, encode_value, wire_equal, FieldCategory, FieldSet, ListValue,
    MaybeValue, NullableValue, Resource, ScalarKind, TypeModel,
};

// ---------------------------------------------------------------------------
// Concurrent construction
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Leaf {
    name: String,
}

impl Resource for Leaf {
    fn declare(fields: &mut FieldSet<Self>) {
        fields.primitive("name", |r| &r.name, |r| &mut r.name);
    }
}

#[derive(Debug, Default)]
struct Branch {
    leaf: Leaf,
    leaves: ListValue<Leaf>,
}

impl Resource for Branch {
    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .nested("leaf", |r| &r.leaf, |r| &mut r.leaf)
            .record_list("leaves", |r| &r.leaves, |r| &mut r.leaves);
    }
}

#[test]
fn concurrent_first_use_yields_one_model() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                TypeModel::<Branch>::of().unwrap() as *const TypeModel<Branch> as usize
            })
        })
        .collect();
    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(
        addrs[0],
        TypeModel::<Branch>::of().unwrap() as *const TypeModel<Branch> as usize
    );
}

#[test]
fn concurrent_decode_and_encode() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let input = json!({"leaf": {"name": format!("n{i}")}, "leaves": [{"name": "x"}]});
                let branch: Branch = decode_value(&input).unwrap();
                assert_eq!(branch.leaf.name, format!("n{i}"));
                encode_value(&branch).unwrap()
            })
        })
        .collect();
    for handle in handles {
        let out = handle.join().unwrap();
        assert_eq!(out["leaves"], json!([{"name": "x"}]));
    }
}

// ---------------------------------------------------------------------------
// Recursive records
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TreeNode {
    label: String,
    children: ListValue<TreeNode>,
    parent: Option<Box<TreeNode>>,
}

impl Resource for TreeNode {
    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .primitive("label", |r| &r.label, |r| &mut r.label)
            .record_list("children", |r| &r.children, |r| &mut r.children)
            .optional_nested("parent", |r| &r.parent, |r| &mut r.parent);
    }
}

#[test]
fn recursive_record_round_trip() {
    let input = json!({
        "label": "root",
        "children": [
            {"label": "a", "children": [], "parent": null},
            {"label": "b", "parent": {"label": "root", "parent": null}},
        ],
        "parent": null,
    });
    let tree: TreeNode = decode_value(&input).unwrap();
    assert_eq!(tree.children.len(), 2);
    assert!(tree.children.get(0).unwrap().children.is_present());
    assert!(tree.children.get(1).unwrap().children.is_absent());
    assert_eq!(
        tree.children.get(1).unwrap().parent.as_deref().map(|p| p.label.as_str()),
        Some("root")
    );
    assert!(wire_equal(&encode_value(&tree).unwrap(), &input));
}

#[test]
fn recursive_descriptors() {
    let model = TypeModel::<TreeNode>::of().unwrap();
    assert_eq!(model.len(), 3);
    assert!(matches!(
        model.descriptor("parent").map(|d| d.category),
        Some(FieldCategory::OptionalNestedRecord(_))
    ));
}

// ---------------------------------------------------------------------------
// Round-trip properties
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq)]
struct Sample {
    id: String,
    count: i64,
    enabled: bool,
    note: MaybeValue<String>,
    limit: NullableValue<i64>,
    tags: ListValue<String>,
}

impl Resource for Sample {
    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .primitive("id", |r| &r.id, |r| &mut r.id)
            .primitive("count", |r| &r.count, |r| &mut r.count)
            .primitive("enabled", |r| &r.enabled, |r| &mut r.enabled)
            .maybe("note", |r| &r.note, |r| &mut r.note)
            .nullable("limit", |r| &r.limit, |r| &mut r.limit)
            .list("tags", |r| &r.tags, |r| &mut r.tags);
    }
}

#[test]
fn sample_descriptor_kinds() {
    let model = TypeModel::<Sample>::of().unwrap();
    assert_eq!(
        model.descriptor("count").map(|d| d.category),
        Some(FieldCategory::Primitive(ScalarKind::Int))
    );
    assert_eq!(
        model.descriptor("note").map(|d| d.category),
        Some(FieldCategory::MaybeScalar(ScalarKind::String))
    );
}

fn arb_wire() -> impl Strategy<Value = Value> {
    (
        "[a-z0-9-]{1,12}",
        any::<i64>(),
        any::<bool>(),
        prop::option::of("[a-z ]{0,8}"),
        prop::option::of(any::<i64>()),
        prop::option::of(prop::collection::vec("[a-z]{0,4}", 0..4)),
    )
        .prop_map(|(id, count, enabled, note, limit, tags)| {
            let mut wire = json!({
                "id": id,
                "count": count,
                "enabled": enabled,
                "note": note,
                "limit": limit,
            });
            if let Some(tags) = tags {
                wire["tags"] = json!(tags);
            }
            wire
        })
}

proptest! {
    #[test]
    fn decode_then_encode_preserves_wire(input in arb_wire()) {
        let sample: Sample = decode_value(&input).unwrap();
        let output = encode_value(&sample).unwrap();
        prop_assert!(wire_equal(&output, &input), "{input} != {output}");
    }

    #[test]
    fn encode_then_decode_is_stable(input in arb_wire()) {
        let first: Sample = decode_value(&input).unwrap();
        let wire = encode_value(&first).unwrap();
        let Value::Object(map) = &wire else { unreachable!() };
        let second: Sample = decode(map).unwrap();
        prop_assert_eq!(first, second);
    }
}
