use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::Dependencies;

type Journal = Rc<RefCell<Vec<String>>>;

struct Step {
    name: String,
    deps: Dependencies,
    journal: Journal,
    fail: bool,
}

impl Layer for Step {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    fn dependencies_mut(&mut self) -> &mut Dependencies {
        &mut self.deps
    }

    fn on_render(&mut self, registry: &mut Registry) -> anyhow::Result<()> {
        self.journal.borrow_mut().push(self.name.clone());
        if self.fail {
            anyhow::bail!("{} ran out of addresses", self.name);
        }
        registry.register("test", "step", self.name.clone(), self.journal.borrow().len())?;
        Ok(())
    }
}

fn step(journal: &Journal, name: &str, deps: &[(&str, bool, bool)]) -> Box<dyn Layer> {
    let mut d = Dependencies::new();
    for &(t, r, o) in deps {
        d.add(t, r, o);
    }
    Box::new(Step {
        name: name.to_string(),
        deps: d,
        journal: journal.clone(),
        fail: false,
    })
}

fn failing(journal: &Journal, name: &str, deps: &[(&str, bool, bool)]) -> Box<dyn Layer> {
    let mut d = Dependencies::new();
    for &(t, r, o) in deps {
        d.add(t, r, o);
    }
    Box::new(Step {
        name: name.to_string(),
        deps: d,
        journal: journal.clone(),
        fail: true,
    })
}

#[test]
fn renders_every_layer_once_in_resolved_order() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    let report = Renderer::run(
        vec![
            step(&journal, "Ebgp", &[("Routing", false, false)]),
            step(&journal, "Routing", &[("Base", false, false)]),
            step(&journal, "Base", &[]),
        ],
        &mut registry,
    )
    .unwrap();

    assert_eq!(report.order.names(), &["Base", "Routing", "Ebgp"]);
    assert_eq!(*journal.borrow(), vec!["Base", "Routing", "Ebgp"]);
    assert_eq!(
        report.stats,
        RenderStats {
            layers_total: 3,
            layers_rendered: 3,
            edges: 2,
            edges_pruned: 0,
        }
    );

    let keys: Vec<&str> = registry.keys().map(|k| k.name.as_str()).collect();
    assert_eq!(keys, vec!["Base", "Routing", "Ebgp"]);
    assert_eq!(registry.get::<usize>("test", "step", "Ebgp"), Some(&3));
}

#[test]
fn failing_layer_stops_the_run_and_keeps_earlier_artifacts() {
    let journal = Journal::default();
    let mut renderer = Renderer::new();
    renderer.add_layer(step(&journal, "Base", &[])).unwrap();
    renderer
        .add_layer(failing(&journal, "Routing", &[("Base", false, false)]))
        .unwrap();
    renderer
        .add_layer(step(&journal, "Ebgp", &[("Routing", false, false)]))
        .unwrap();

    let mut registry = Registry::new();
    let err = renderer.render(&mut registry).unwrap_err();
    match &err {
        SeedsimError::Render { layer, source } => {
            assert_eq!(layer, "Routing");
            assert!(source.to_string().contains("ran out of addresses"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(*journal.borrow(), vec!["Base", "Routing"]);
    assert!(registry.has("test", "step", "Base"));
    assert!(!registry.has("test", "step", "Ebgp"));
    assert!(matches!(renderer.state(), RendererState::Failed { .. }));
}

#[test]
fn build_errors_render_nothing() {
    let journal = Journal::default();
    let mut registry = Registry::new();
    let err = Renderer::run(
        vec![
            step(&journal, "Base", &[]),
            step(&journal, "Ebgp", &[("Routing", false, false)]),
        ],
        &mut registry,
    )
    .unwrap_err();
    assert!(matches!(err, SeedsimError::MissingDependency { .. }));
    assert!(journal.borrow().is_empty());
    assert!(registry.is_empty());
}

#[test]
fn cycles_render_nothing() {
    let journal = Journal::default();
    let mut renderer = Renderer::new();
    renderer.add_layer(step(&journal, "Base", &[])).unwrap();
    renderer
        .add_layer(step(&journal, "X", &[("Y", false, false)]))
        .unwrap();
    renderer
        .add_layer(step(&journal, "Y", &[("X", false, false)]))
        .unwrap();

    let err = renderer.render(&mut Registry::new()).unwrap_err();
    assert!(matches!(err, SeedsimError::CycleDetected { .. }));
    assert!(journal.borrow().is_empty());
    assert_eq!(
        renderer.state(),
        &RendererState::Failed {
            reason: "dependency cycle detected: X -> Y -> X".to_string(),
        }
    );
}

#[test]
fn pruned_optional_edges_are_counted() {
    let journal = Journal::default();
    let report = Renderer::run(
        vec![
            step(&journal, "Base", &[]),
            step(&journal, "Ebgp", &[("Routing", false, true), ("Base", false, false)]),
        ],
        &mut Registry::new(),
    )
    .unwrap();
    assert_eq!(report.stats.edges, 1);
    assert_eq!(report.stats.edges_pruned, 1);
}

#[test]
fn renderer_runs_only_once() {
    let journal = Journal::default();
    let mut renderer = Renderer::new();
    renderer.add_layer(step(&journal, "Base", &[])).unwrap();

    let mut registry = Registry::new();
    renderer.render(&mut registry).unwrap();
    assert_eq!(renderer.state(), &RendererState::Done);

    let again = renderer.render(&mut registry).unwrap_err();
    assert!(matches!(again, SeedsimError::Lifecycle(_)));
    let late = renderer.add_layer(step(&journal, "Late", &[])).unwrap_err();
    assert!(matches!(late, SeedsimError::Lifecycle(_)));
    assert_eq!(*journal.borrow(), vec!["Base"]);
}

#[test]
fn plan_is_a_dry_run() {
    let journal = Journal::default();
    let mut renderer = Renderer::new();
    renderer.add_layer(step(&journal, "B", &[("A", false, false)])).unwrap();
    renderer.add_layer(step(&journal, "A", &[])).unwrap();

    assert_eq!(renderer.plan().unwrap().names(), &["A", "B"]);
    assert_eq!(renderer.state(), &RendererState::Idle);
    assert!(journal.borrow().is_empty());
}

#[test]
fn declarations_can_be_added_through_the_renderer() {
    let journal = Journal::default();
    let mut renderer = Renderer::new();
    renderer.add_layer(step(&journal, "A", &[])).unwrap();
    renderer.add_layer(step(&journal, "B", &[])).unwrap();
    renderer
        .layer_mut("A")
        .unwrap()
        .add_dependency("B", false, false);

    assert_eq!(renderer.layer("A").unwrap().dependencies().len(), 1);
    assert_eq!(renderer.plan().unwrap().names(), &["B", "A"]);
    let names: Vec<&str> = renderer.layers().map(|l| l.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn identical_inputs_render_identically() {
    let order = || {
        let journal = Journal::default();
        Renderer::run(
            vec![
                step(&journal, "D", &[("B", false, false), ("C", false, false)]),
                step(&journal, "C", &[("A", false, false)]),
                step(&journal, "B", &[("A", false, false)]),
                step(&journal, "A", &[]),
            ],
            &mut Registry::new(),
        )
        .unwrap()
        .order
    };
    let first = order();
    assert_eq!(first.names(), &["A", "B", "C", "D"]);
    assert_eq!(first, order());
}
