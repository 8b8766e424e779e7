//! seedsim renders composable *layers* into a shared [`Registry`] in dependency order.
//!
//! Each layer declares which other layers must render before it (regular dependencies) or after
//! it (reverse dependencies), and whether a missing target is fatal (optional dependencies are
//! dropped instead).
//!
//! # Pipeline overview
//!
//! 1. **Build**: `layers -> DependencyGraph` (declarations normalized into edges and validated)
//! 2. **Resolve**: `DependencyGraph -> RenderOrder` (deterministic depth-first topological sort)
//! 3. **Render**: each layer's [`Layer::on_render`] runs once, in order, against the [`Registry`]
//!
//! [`Renderer`] drives all three steps. A failure in build or resolve renders nothing; a failing
//! layer stops the run and leaves the artifacts of earlier layers in place.
//!
//! Layers can be implemented directly or described as data with a [`Manifest`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod graph;
mod layer;
mod manifest;
mod registry;
mod render;

pub use foundation::error::{SeedsimError, SeedsimResult};
pub use graph::builder::{DependencyGraph, Edge, PrunedEdge};
pub use graph::resolver::{RenderOrder, resolve};
pub use layer::contract::Layer;
pub use layer::dependency::{Dependencies, Dependency};
pub use manifest::layer::ManifestLayer;
pub use manifest::model::{ArtifactSpec, LayerSpec, Manifest};
pub use registry::store::{Registry, RegistryKey};
pub use render::pipeline::{RenderReport, RenderStats, Renderer, RendererState};
