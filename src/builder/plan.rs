//! Target planning.
//!
//! Expands a resolved configuration into the concrete artifacts to build,
//! ordered so that every target comes after the targets it depends on.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use thiserror::Error;

use crate::core::{Backend, BuildTarget, FlagId, TargetKind};
use crate::resolver::{Advisory, ResolvedConfiguration};

/// Name of the core codec library, always built.
pub const CORE_LIBRARY: &str = "openjpeg";

/// Name of the synthetic conformance-test target.
pub const TEST_TARGET: &str = "test";

/// Name of the documentation target.
pub const DOCS_TARGET: &str = "docs";

/// Artifacts of one optional component.
struct Component {
    library: Option<&'static str>,
    executables: &'static [&'static str],
    /// Library the executables link against
    links: &'static str,
}

const CODEC: Component = Component {
    library: None,
    executables: &["image_to_j2k", "j2k_to_image", "j2k_dump"],
    links: CORE_LIBRARY,
};

const MJ2: Component = Component {
    library: None,
    executables: &[
        "frames_to_mj2",
        "mj2_to_frames",
        "extract_j2k_from_mj2",
        "wrap_j2k_in_mj2",
    ],
    links: CORE_LIBRARY,
};

const JPWL: Component = Component {
    library: Some("openjpeg_JPWL"),
    executables: &["JPWL_image_to_j2k", "JPWL_j2k_to_image"],
    links: "openjpeg_JPWL",
};

const JP3D: Component = Component {
    library: Some("openjp3dvm"),
    executables: &["jp3d_to_volume", "volume_to_jp3d"],
    links: "openjp3dvm",
};

const INDEXER: Component = Component {
    library: None,
    executables: &["index_create"],
    links: CORE_LIBRARY,
};

/// Capabilities of the build host supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether Doxygen is available for the docs target
    pub doxygen: bool,
}

/// Error during planning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("target `{target}` depends on unknown target `{dependency}`")]
    UnknownDependency { target: String, dependency: String },

    #[error("cycle detected in target graph")]
    CycleDetected { targets: Vec<String> },
}

/// Ordered build targets plus planning advisories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub targets: Vec<BuildTarget>,
    pub advisories: Vec<Advisory>,
}

impl Plan {
    pub fn target(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.target(name).is_some()
    }

    pub fn has_kind(&self, kind: TargetKind) -> bool {
        self.targets.iter().any(|t| t.kind == kind)
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Expands configurations into ordered target lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetPlanner {
    host: HostCapabilities,
}

impl TargetPlanner {
    pub fn new(host: HostCapabilities) -> Self {
        TargetPlanner { host }
    }

    /// Plan the targets for a configuration.
    pub fn plan(&self, config: &ResolvedConfiguration) -> Result<Plan, PlanError> {
        let mut advisories = Vec::new();
        let mut targets = vec![BuildTarget::library(CORE_LIBRARY)];

        for component in self.components(config) {
            expand(component, &mut targets);
        }

        if config.enabled(FlagId::BuildDoc) {
            if self.host.doxygen {
                targets.push(BuildTarget::new(DOCS_TARGET, TargetKind::Docs));
            } else {
                tracing::debug!("doxygen not available, skipping docs target");
                advisories.push(Advisory::DocsSkipped);
            }
        }

        if config.enabled(FlagId::BuildTesting) {
            let mut test = BuildTarget::new(TEST_TARGET, TargetKind::Test);
            for target in targets.iter().filter(|t| t.kind.is_compiled()) {
                test.depends_on.insert(target.name.clone());
            }
            if let Some(root) = config
                .flag_set()
                .get_path(FlagId::Jpeg2000ConformanceDataRoot)
            {
                test = test.with_input(root);
            }
            targets.push(test);
        }

        let targets = order(targets)?;
        tracing::debug!("planned {} target(s)", targets.len());

        Ok(Plan {
            targets,
            advisories,
        })
    }

    /// Optional components enabled for the configuration's backend.
    fn components(&self, config: &ResolvedConfiguration) -> Vec<&'static Component> {
        let mut components = Vec::new();
        match config.backend() {
            Backend::ManualMakefile => {
                // The top-level Makefile only knows the library and the
                // WITH_* subdirectories.
                if config.enabled(FlagId::WithJpwl) {
                    components.push(&JPWL);
                }
                if config.enabled(FlagId::WithJp3d) {
                    components.push(&JP3D);
                }
            }
            Backend::Autotools | Backend::CMake => {
                if config.enabled(FlagId::BuildCodec) {
                    components.push(&CODEC);
                }
                if config.enabled(FlagId::BuildMj2) {
                    components.push(&MJ2);
                }
                if config.enabled(FlagId::BuildJpwl) {
                    components.push(&JPWL);
                }
                if config.enabled(FlagId::BuildJp3d) {
                    components.push(&JP3D);
                }
                if config.enabled(FlagId::BuildIndexerJpip) {
                    components.push(&INDEXER);
                }
            }
        }
        components
    }
}

fn expand(component: &Component, targets: &mut Vec<BuildTarget>) {
    if let Some(library) = component.library {
        targets.push(BuildTarget::library(library));
    }
    for exe in component.executables {
        targets.push(BuildTarget::executable(*exe).depends_on(component.links));
    }
}

/// Topologically sort targets over `depends_on`, breaking ties by
/// ascending name.
pub fn order(targets: Vec<BuildTarget>) -> Result<Vec<BuildTarget>, PlanError> {
    let mut graph: DiGraph<BuildTarget, ()> = DiGraph::new();
    let mut by_name: HashMap<String, NodeIndex> = HashMap::new();

    for target in targets {
        let name = target.name.clone();
        let node = graph.add_node(target);
        by_name.insert(name, node);
    }

    // Edge dependency -> dependent.
    for node in graph.node_indices().collect::<Vec<_>>() {
        let deps: Vec<String> = graph[node].depends_on.iter().cloned().collect();
        for dep in deps {
            let Some(&dep_node) = by_name.get(&dep) else {
                return Err(PlanError::UnknownDependency {
                    target: graph[node].name.clone(),
                    dependency: dep,
                });
            };
            graph.add_edge(dep_node, node, ());
        }
    }

    let mut in_degree: BTreeMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|n| (n, graph.neighbors_directed(n, Direction::Incoming).count()))
        .collect();

    let mut ready: BinaryHeap<Reverse<(String, NodeIndex)>> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(&n, _)| Reverse((graph[n].name.clone(), n)))
        .collect();

    let mut sorted = Vec::with_capacity(graph.node_count());
    while let Some(Reverse((_, node))) = ready.pop() {
        sorted.push(node);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if let Some(deg) = in_degree.get_mut(&next) {
                *deg -= 1;
                if *deg == 0 {
                    ready.push(Reverse((graph[next].name.clone(), next)));
                }
            }
        }
    }

    if sorted.len() != graph.node_count() {
        let mut targets: Vec<String> = in_degree
            .iter()
            .filter(|(_, deg)| **deg > 0)
            .map(|(&n, _)| graph[n].name.clone())
            .collect();
        targets.sort();
        return Err(PlanError::CycleDetected { targets });
    }

    Ok(sorted.into_iter().map(|n| graph[n].clone()).collect())
}
