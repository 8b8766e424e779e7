use super::*;
use crate::{Registry, Renderer};

const SAMPLE: &str = r#"{
  "layers": [
    {
      "name": "Routing",
      "depends": [ { "layer": "Base" } ],
      "artifacts": [ { "scope": "seed", "kind": "proto", "name": "ospf", "value": { "area": 0 } } ]
    },
    {
      "name": "Base",
      "description": "autonomous systems and networks",
      "artifacts": [ { "scope": "seed", "kind": "net", "name": "n0", "value": "10.0.0.0/24" } ]
    },
    {
      "name": "Ebgp",
      "depends": [
        { "layer": "Routing" },
        { "layer": "Mpls", "optional": true }
      ]
    }
  ]
}"#;

#[test]
fn parses_defaults() {
    let m = Manifest::from_json_str(SAMPLE).unwrap();
    m.validate().unwrap();
    assert_eq!(m.layers.len(), 3);
    assert_eq!(m.layers[0].depends, vec![Dependency::on("Base")]);
    assert!(m.layers[2].depends[1].optional);
    assert!(!m.layers[2].depends[1].reverse);
    assert!(m.layers[2].artifacts.is_empty());
    assert_eq!(m.layers[1].description, "autonomous systems and networks");
    assert!(m.layers[0].fail.is_none());
}

#[test]
fn bad_json_is_a_serde_error() {
    let err = Manifest::from_json_str("{ \"layers\": [ { } ] }").unwrap_err();
    assert!(matches!(err, SeedsimError::Serde(_)));
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = Manifest::from_path("target/does-not-exist/manifest.json").unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn validate_rejects_duplicate_and_empty_names() {
    let mut m = Manifest::from_json_str(SAMPLE).unwrap();
    m.layers[2].name = "Base".to_string();
    assert!(m.validate().unwrap_err().to_string().contains("duplicate layer name 'Base'"));

    m.layers[2].name = "  ".to_string();
    assert!(matches!(m.validate(), Err(SeedsimError::Configuration(_))));
}

#[test]
fn validate_rejects_empty_dependency_target() {
    let mut m = Manifest::from_json_str(SAMPLE).unwrap();
    m.layers[2].depends.push(Dependency::on(""));
    assert!(m.validate().is_err());
}

#[test]
fn validate_rejects_bad_artifact_keys() {
    let mut m = Manifest::from_json_str(SAMPLE).unwrap();
    m.layers[0].artifacts[0].kind.clear();
    assert!(m.validate().unwrap_err().to_string().contains("empty kind"));

    let mut m = Manifest::from_json_str(SAMPLE).unwrap();
    let dup = m.layers[1].artifacts[0].clone();
    m.layers[2].artifacts.push(dup);
    assert!(
        m.validate()
            .unwrap_err()
            .to_string()
            .contains("'seed/net/n0' is produced more than once")
    );
}

#[test]
fn manifest_layers_render_artifacts_in_order() {
    let m = Manifest::from_json_str(SAMPLE).unwrap();
    let mut registry = Registry::new();
    let report = Renderer::run(m.into_layers(), &mut registry).unwrap();

    assert_eq!(report.order.names(), &["Base", "Routing", "Ebgp"]);
    assert_eq!(report.stats.edges_pruned, 1);
    let keys: Vec<String> = registry.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["seed/net/n0", "seed/proto/ospf"]);
    assert_eq!(
        registry.get::<serde_json::Value>("seed", "proto", "ospf"),
        Some(&serde_json::json!({ "area": 0 }))
    );
}

#[test]
fn fail_field_aborts_render() {
    let mut m = Manifest::from_json_str(SAMPLE).unwrap();
    m.layers[0].fail = Some("no ospf areas".to_string());
    let mut registry = Registry::new();
    let err = Renderer::run(m.into_layers(), &mut registry).unwrap_err();
    assert!(matches!(err, SeedsimError::Render { ref layer, .. } if layer == "Routing"));
    assert!(err.to_string().contains("no ospf areas"));
    assert!(registry.has("seed", "net", "n0"));
    assert!(!registry.has("seed", "proto", "ospf"));
}

#[test]
fn manifest_layer_describe_uses_description() {
    let m = Manifest::from_json_str(SAMPLE).unwrap();
    let layers = m.into_layers();
    assert_eq!(layers[0].describe(), "RoutingLayer");
    assert_eq!(
        layers[1].describe(),
        "BaseLayer: autonomous systems and networks"
    );
}

#[test]
fn manifest_layer_builder() {
    let layer = ManifestLayer::new("Base").with_artifact(ArtifactSpec {
        scope: "seed".into(),
        kind: "asn".into(),
        name: "150".into(),
        value: serde_json::json!(150),
    });
    assert_eq!(layer.artifacts().len(), 1);
    assert_eq!(layer.artifacts()[0].key().to_string(), "seed/asn/150");
    assert!(layer.dependencies().is_empty());
}

#[test]
fn serializes_back_to_equivalent_json() {
    let m = Manifest::from_json_str(SAMPLE).unwrap();
    let text = serde_json::to_string(&m).unwrap();
    assert_eq!(Manifest::from_json_str(&text).unwrap(), m);
}
