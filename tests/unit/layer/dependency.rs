use super::*;

#[test]
fn display_reads_as_render_position() {
    assert_eq!(Dependency::on("Base").to_string(), "after Base");

    let mut deps = Dependencies::new();
    deps.add("Mpls", true, false);
    deps.add("Routing", false, true);
    let text: Vec<String> = deps.iter().map(ToString::to_string).collect();
    assert_eq!(text, vec!["before Mpls", "after Routing (optional)"]);
}

#[test]
fn json_uses_layer_key_and_defaults_flags() {
    let dep: Dependency = serde_json::from_str(r#"{ "layer": "Base" }"#).unwrap();
    assert_eq!(dep, Dependency::on("Base"));

    let dep: Dependency =
        serde_json::from_str(r#"{ "layer": "Mpls", "reverse": true }"#).unwrap();
    assert!(dep.reverse);
    assert!(!dep.optional);
}

#[test]
fn collects_from_iterator_in_order() {
    let deps: Dependencies = ["A", "B", "A"].into_iter().map(Dependency::on).collect();
    let targets: Vec<&str> = (&deps).into_iter().map(|d| d.target.as_str()).collect();
    assert_eq!(targets, vec!["A", "B", "A"]);
    assert_eq!(deps.len(), 3);
}
