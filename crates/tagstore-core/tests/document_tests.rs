use tagstore_core::{decode_compound, decode_list, encode_compound, Compound, List};
use tagstore_core::{FlatStore, Leaf, TagStoreError, TaggedValue, YamlDocument};

fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

// ============================================================================
// Paths and sections
// ============================================================================

#[test]
fn set_creates_intermediate_sections() {
    let mut doc = YamlDocument::new();
    doc.set("a.b.c", Leaf::Int(1)).unwrap();

    assert!(doc.has("a"));
    assert!(doc.has("a.b"));
    assert!(doc.has("a.b.c"));
    assert_eq!(doc.get("a.b").unwrap(), None);
    assert_eq!(doc.get("a.b.c").unwrap(), Some(Leaf::Int(1)));
}

#[test]
fn set_overwrites_scalar_with_scalar() {
    let mut doc = YamlDocument::new();
    doc.set("x", Leaf::Int(1)).unwrap();
    doc.set("x", Leaf::from("one")).unwrap();
    assert_eq!(doc.get("x").unwrap(), Some(Leaf::from("one")));
}

#[test]
fn writing_below_a_scalar_replaces_it_with_a_section() {
    let mut doc = YamlDocument::new();
    doc.set("x", Leaf::Int(1)).unwrap();
    doc.set("x.y", Leaf::Int(2)).unwrap();

    assert_eq!(doc.get("x").unwrap(), None);
    assert_eq!(doc.get_int("x.y").unwrap(), 2);
}

#[test]
fn keys_under_lists_direct_children_only() {
    let mut doc = YamlDocument::new();
    doc.set("root.a.deep", Leaf::Int(1)).unwrap();
    doc.set("root.b", Leaf::Int(2)).unwrap();
    doc.set("other", Leaf::Int(3)).unwrap();

    assert_eq!(sorted(doc.keys_under("root").unwrap()), vec!["a", "b"]);
    assert_eq!(sorted(doc.keys_under("").unwrap()), vec!["other", "root"]);
    assert!(doc.keys_under("root.b").unwrap().is_empty());
    assert!(doc.keys_under("missing").unwrap().is_empty());
}

#[test]
fn clear_removes_subtree_only() {
    let mut doc = YamlDocument::new();
    doc.set("a.b.c", Leaf::Int(1)).unwrap();
    doc.set("a.d", Leaf::Int(2)).unwrap();

    doc.clear("a.b").unwrap();
    assert!(!doc.has("a.b"));
    assert!(!doc.has("a.b.c"));
    assert_eq!(doc.get_int("a.d").unwrap(), 2);
}

#[test]
fn clear_missing_path_is_a_no_op() {
    let mut doc = YamlDocument::new();
    doc.set("a", Leaf::Int(1)).unwrap();
    doc.clear("x.y.z").unwrap();
    doc.clear("a.b").unwrap();
    assert_eq!(doc.get_int("a").unwrap(), 1);
}

#[test]
fn clear_root_empties_document() {
    let mut doc = YamlDocument::new();
    doc.set("a", Leaf::Int(1)).unwrap();
    doc.clear("").unwrap();
    assert!(doc.is_empty());
}

#[test]
fn empty_segments_are_rejected_on_write() {
    let mut doc = YamlDocument::new();
    for path in ["", "a..b", ".a", "a."] {
        assert!(
            matches!(doc.set(path, Leaf::Int(1)), Err(TagStoreError::BackendWrite(_))),
            "path {path:?} should be rejected"
        );
    }
}

// ============================================================================
// Typed getters
// ============================================================================

#[test]
fn absent_paths_read_zero_values() {
    let doc = YamlDocument::new();
    assert_eq!(doc.get_string("nope").unwrap(), "");
    assert_eq!(doc.get_int("nope").unwrap(), 0);
    assert_eq!(doc.get_long("nope").unwrap(), 0);
    assert_eq!(doc.get_short("nope").unwrap(), 0);
    assert_eq!(doc.get_byte("nope").unwrap(), 0);
    assert_eq!(doc.get_float("nope").unwrap(), 0.0);
    assert_eq!(doc.get_double("nope").unwrap(), 0.0);
    assert!(!doc.get_bool("nope").unwrap());
}

#[test]
fn numeric_getters_convert_between_ints_and_floats() {
    let mut doc = YamlDocument::new();
    doc.set("i", Leaf::Int(3)).unwrap();
    doc.set("f", Leaf::Float(2.75)).unwrap();

    assert_eq!(doc.get_double("i").unwrap(), 3.0);
    assert_eq!(doc.get_float("i").unwrap(), 3.0);
    assert_eq!(doc.get_int("f").unwrap(), 2);
    assert_eq!(doc.get_long("f").unwrap(), 2);
}

#[test]
fn short_and_byte_truncate_from_int() {
    let mut doc = YamlDocument::new();
    doc.set("n", Leaf::Int(70_000)).unwrap();
    assert_eq!(doc.get_short("n").unwrap(), 70_000i32 as i16);
    assert_eq!(doc.get_byte("n").unwrap(), 70_000i32 as i8);
}

#[test]
fn get_string_formats_non_string_scalars() {
    let mut doc = YamlDocument::new();
    doc.set("i", Leaf::Int(42)).unwrap();
    doc.set("b", Leaf::Bool(true)).unwrap();
    assert_eq!(doc.get_string("i").unwrap(), "42");
    assert_eq!(doc.get_string("b").unwrap(), "true");
}

#[test]
fn numeric_getters_ignore_strings() {
    let mut doc = YamlDocument::new();
    doc.set("s", Leaf::from("12")).unwrap();
    assert_eq!(doc.get_int("s").unwrap(), 0);
    assert_eq!(doc.get_double("s").unwrap(), 0.0);
}

// ============================================================================
// YAML text
// ============================================================================

#[test]
fn empty_text_is_an_empty_document() {
    assert!(YamlDocument::from_yaml_str("").unwrap().is_empty());
    assert!(YamlDocument::from_yaml_str("  \n").unwrap().is_empty());
    assert!(YamlDocument::from_yaml_str("~").unwrap().is_empty());
}

#[test]
fn non_mapping_root_is_a_read_failure() {
    assert!(matches!(
        YamlDocument::from_yaml_str("- a\n- b\n"),
        Err(TagStoreError::BackendRead(_))
    ));
    assert!(matches!(
        YamlDocument::from_yaml_str("42"),
        Err(TagStoreError::BackendRead(_))
    ));
}

#[test]
fn invalid_yaml_is_a_yaml_error() {
    assert!(matches!(
        YamlDocument::from_yaml_str("a: [unclosed"),
        Err(TagStoreError::Yaml(_))
    ));
}

#[test]
fn yaml_tagged_values_are_read_failures() {
    let doc = YamlDocument::from_yaml_str("x: !custom 5\n").unwrap();
    assert!(matches!(doc.get("x"), Err(TagStoreError::BackendRead(_))));
}

#[test]
fn hand_written_list_with_integer_keys_decodes() {
    let text = "\
drops:
  1:
    format: string
    value: second
  0:
    format: int
    value: 7
";
    let doc = YamlDocument::from_yaml_str(text).unwrap();
    assert_eq!(sorted(doc.keys_under("drops").unwrap()), vec!["0", "1"]);

    let list = decode_list(&doc, "drops").unwrap();
    assert_eq!(
        list,
        List::from(vec![
            TaggedValue::Int32(7),
            TaggedValue::String("second".into())
        ])
    );
}

#[test]
fn keys_colliding_after_normalization_are_a_read_failure() {
    let text = "\
drops:
  0:
    format: int
    value: 1
  '0':
    format: int
    value: 2
";
    assert!(matches!(
        YamlDocument::from_yaml_str(text),
        Err(TagStoreError::BackendRead(_))
    ));
}

#[test]
fn non_finite_floats_survive_yaml_text() {
    let doc = YamlDocument::from_yaml_str("up: .inf\ndown: -.inf\n").unwrap();
    assert_eq!(doc.get_double("up").unwrap(), f64::INFINITY);
    assert_eq!(doc.get_double("down").unwrap(), f64::NEG_INFINITY);

    let reloaded = YamlDocument::from_yaml_str(&doc.to_yaml_string().unwrap()).unwrap();
    assert_eq!(reloaded, doc);
}

#[test]
fn hand_written_compound_decodes() {
    let text = "\
boss:
  name:
    type: string
    value: Skeleton King
  health:
    type: double
    value: 250
  pos:
    type: tag
    value:
      y:
        type: short
        value: 64
";
    let doc = YamlDocument::from_yaml_str(text).unwrap();
    let tree = decode_compound(&doc, "boss").unwrap();

    assert_eq!(tree.get_string("name"), Some("Skeleton King"));
    assert_eq!(tree.get_double("health"), Some(250.0));
    assert_eq!(tree.get_compound("pos").and_then(|p| p.get_short("y")), Some(64));
}

#[test]
fn encoded_tree_survives_yaml_text() {
    let mut inner = List::new();
    inner.push(1.25f32);
    inner.push("text with: colon");
    let tree = Compound::new()
        .with("big", 9_000_000_000i64)
        .unwrap()
        .with("half", 0.5f64)
        .unwrap()
        .with("numeric_string", "42")
        .unwrap()
        .with("items", inner)
        .unwrap();

    let mut doc = YamlDocument::new();
    encode_compound(&tree, &mut doc, "saved").unwrap();
    let text = doc.to_yaml_string().unwrap();
    let reloaded = YamlDocument::from_yaml_str(&text).unwrap();

    assert_eq!(decode_compound(&reloaded, "saved").unwrap(), tree);
}

// ============================================================================
// Sequences and subsections
// ============================================================================

#[test]
fn string_lists_round_trip_and_stringify_scalars() {
    let mut doc = YamlDocument::new();
    doc.set_string_list("names", &["a".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(doc.get_string_list("names"), vec!["a", "b"]);

    let parsed = YamlDocument::from_yaml_str("mixed: [x, 1, true, {k: v}]\n").unwrap();
    assert_eq!(parsed.get_string_list("mixed"), vec!["x", "1", "true"]);
    assert!(parsed.get_string_list("missing").is_empty());
}

#[test]
fn subsection_is_a_detached_copy() {
    let mut doc = YamlDocument::new();
    doc.set("mobs.boss.health", Leaf::Int(250)).unwrap();
    doc.set("mobs.boss.name", Leaf::from("King")).unwrap();

    let mut sub = doc.subsection("mobs.boss");
    assert_eq!(sorted(sub.keys_under("").unwrap()), vec!["health", "name"]);
    assert_eq!(sub.get_int("health").unwrap(), 250);

    sub.set("health", Leaf::Int(1)).unwrap();
    assert_eq!(doc.get_int("mobs.boss.health").unwrap(), 250);

    assert!(doc.subsection("mobs.boss.health").is_empty());
    assert!(doc.subsection("absent").is_empty());
}
