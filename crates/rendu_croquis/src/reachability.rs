//! Render chain reachability.
//!
//! `A` can render `B` when `A` is `B`, or when `A` declares `@renders` of
//! some target that can render `B`. The walk is bounded by a depth limit and
//! a path-scoped visited set, so cycles and long chains fail only the branch
//! that hit them. Failures that no cycle cut short are remembered per node
//! and remaining depth, so shared subgraphs are explored once.

use rendu_carton::{FxHashMap, FxHashSet};

use crate::graph::RenderLookup;
use crate::identity::{ComponentRef, RefKey, RenderTarget};

/// Whether `actual` reaches one of `expected`.
pub fn can_render(
    actual: &ComponentRef,
    expected: &[RenderTarget],
    lookup: &dyn RenderLookup,
    max_depth: usize,
) -> bool {
    find_render_chain(actual, expected, lookup, max_depth).is_some()
}

/// The chain from `actual` to a matching target, both ends included.
///
/// A direct match is the one-element chain `[actual]`.
pub fn find_render_chain(
    actual: &ComponentRef,
    expected: &[RenderTarget],
    lookup: &dyn RenderLookup,
    max_depth: usize,
) -> Option<Vec<ComponentRef>> {
    let mut walker = Walker {
        expected,
        lookup,
        visited: FxHashSet::default(),
        failed: FxHashMap::default(),
        chain: vec![actual.clone()],
    };
    walker.visited.insert(actual.key());
    match walker.walk(actual, max_depth) {
        Walk::Found => Some(walker.chain),
        Walk::Failed { .. } => None,
    }
}

enum Walk {
    Found,
    /// `clean` is false when a branch was cut by the current path, so the
    /// failure does not hold for other paths into the same node.
    Failed { clean: bool },
}

struct Walker<'e, 'l> {
    expected: &'e [RenderTarget],
    lookup: &'l dyn RenderLookup,
    visited: FxHashSet<RefKey>,
    /// Largest remaining depth each node is known to fail with
    failed: FxHashMap<RefKey, usize>,
    chain: Vec<ComponentRef>,
}

impl Walker<'_, '_> {
    fn walk(&mut self, current: &ComponentRef, remaining: usize) -> Walk {
        if self.expected.iter().any(|target| current.compare(target).is_match()) {
            return Walk::Found;
        }
        if remaining == 0 {
            return Walk::Failed { clean: true };
        }
        let Some(declaration) = self.lookup.renders_of(current) else {
            return Walk::Failed { clean: true };
        };

        let mut clean = true;
        for next in &declaration.targets {
            let key = next.key();
            if self.failed.get(&key).is_some_and(|&depth| depth >= remaining - 1) {
                continue;
            }
            if !self.visited.insert(key.clone()) {
                clean = false;
                continue;
            }
            self.chain.push(next.clone());
            match self.walk(next, remaining - 1) {
                Walk::Found => return Walk::Found,
                Walk::Failed { clean: branch_clean } => {
                    if branch_clean {
                        let depth = self.failed.entry(key.clone()).or_insert(0);
                        *depth = (*depth).max(remaining - 1);
                    }
                    clean &= branch_clean;
                }
            }
            self.chain.pop();
            self.visited.remove(&key);
        }
        Walk::Failed { clean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RenderModifier;
    use crate::graph::RenderGraph;
    use crate::identity::{ComponentIdentity, RendersDeclaration};
    use rendu_carton::SmallVec;
    use rendu_relief::Span;

    fn component(name: &str) -> ComponentRef {
        ComponentRef::new(
            name,
            Some(ComponentIdentity::new(format!("src/{name}.tsx"), name)),
            "src/App.tsx",
        )
    }

    fn renders(targets: &[&str]) -> RendersDeclaration {
        RendersDeclaration {
            targets: targets.iter().map(|name| component(name)).collect::<SmallVec<_>>(),
            modifier: RenderModifier::Required,
            unchecked: false,
            span: Span::EMPTY,
        }
    }

    fn names(chain: &[ComponentRef]) -> Vec<&str> {
        chain.iter().map(|c| c.name.as_str()).collect()
    }

    /// `C0 → C1 → ... → C{len}`
    fn chain_graph(len: usize) -> RenderGraph {
        let mut graph = RenderGraph::new();
        for i in 0..len {
            let target = format!("C{}", i + 1);
            graph.insert(&component(&format!("C{i}")), renders(&[target.as_str()]));
        }
        graph
    }

    #[test]
    fn test_identity_and_single_level() {
        let mut graph = RenderGraph::new();
        graph.insert(&component("MyHeader"), renders(&["Header"]));

        let header = component("Header");
        assert!(can_render(&header, &[header.clone()], &graph, 10));
        assert!(can_render(&component("MyHeader"), &[header.clone()], &graph, 10));
        assert!(!can_render(&component("Footer"), &[header], &graph, 10));
    }

    #[test]
    fn test_union_targets() {
        let mut graph = RenderGraph::new();
        graph.insert(&component("Item"), renders(&["MenuItem", "Divider"]));
        graph.insert(&component("MenuItem"), renders(&["Row"]));

        let chain = find_render_chain(&component("Item"), &[component("Row")], &graph, 10);
        assert_eq!(names(&chain.unwrap()), ["Item", "MenuItem", "Row"]);
        assert!(can_render(&component("Item"), &[component("Divider")], &graph, 10));
    }

    #[test]
    fn test_cycle_is_safe() {
        let mut graph = RenderGraph::new();
        graph.insert(&component("A"), renders(&["B"]));
        graph.insert(&component("B"), renders(&["A"]));

        assert!(!can_render(&component("A"), &[component("C")], &graph, 10));
        assert!(can_render(&component("A"), &[component("B")], &graph, 10));
    }

    #[test]
    fn test_diamond_revisits_are_branch_local() {
        // A → {B, C}, B → D, C → D, D → E
        let mut graph = RenderGraph::new();
        graph.insert(&component("A"), renders(&["B", "C"]));
        graph.insert(&component("B"), renders(&["D"]));
        graph.insert(&component("C"), renders(&["D"]));
        graph.insert(&component("D"), renders(&["E"]));

        let chain = find_render_chain(&component("A"), &[component("E")], &graph, 10);
        assert_eq!(names(&chain.unwrap()), ["A", "B", "D", "E"]);
    }

    #[test]
    fn test_depth_bound() {
        let graph = chain_graph(11);
        let last = component("C11");
        assert!(!can_render(&component("C0"), &[last.clone()], &graph, 10));
        assert!(can_render(&component("C0"), &[last.clone()], &graph, 11));
        assert!(can_render(&component("C1"), &[last], &graph, 10));
    }

    /// Counts lookups made against the wrapped graph.
    struct Counting {
        graph: RenderGraph,
        lookups: std::cell::Cell<usize>,
    }

    impl RenderLookup for Counting {
        fn renders_of(&self, component: &ComponentRef) -> Option<RendersDeclaration> {
            self.lookups.set(self.lookups.get() + 1);
            self.graph.renders_of(component)
        }
    }

    #[test]
    fn test_wide_fan_out_failure_is_linear() {
        // Ten layers of four components, each rendering every component of
        // the next layer
        let mut graph = RenderGraph::new();
        for layer in 0..10 {
            let next: Vec<String> = (0..4).map(|i| format!("L{}_{i}", layer + 1)).collect();
            let next: Vec<&str> = next.iter().map(String::as_str).collect();
            for i in 0..4 {
                graph.insert(&component(&format!("L{layer}_{i}")), renders(&next));
            }
        }
        let lookup = Counting {
            graph,
            lookups: std::cell::Cell::new(0),
        };

        assert!(!can_render(&component("L0_0"), &[component("Missing")], &lookup, 10));
        assert!(lookup.lookups.get() <= 41, "{} lookups", lookup.lookups.get());

        assert!(can_render(&component("L0_0"), &[component("L10_3")], &lookup, 10));
        assert!(!can_render(&component("L0_0"), &[component("L10_3")], &lookup, 9));
    }

    #[test]
    fn test_failures_remembered_per_depth() {
        // S → {A, B}, A → B, B → D: B first fails at the depth left after A,
        // then succeeds when reached directly from S
        let mut graph = RenderGraph::new();
        graph.insert(&component("S"), renders(&["A", "B"]));
        graph.insert(&component("A"), renders(&["B"]));
        graph.insert(&component("B"), renders(&["D"]));

        let chain = find_render_chain(&component("S"), &[component("D")], &graph, 2);
        assert_eq!(names(&chain.unwrap()), ["S", "B", "D"]);
    }

    #[test]
    fn test_cycles_do_not_hide_other_paths() {
        // S → {A, C}, A → B, B → {A, E}, C → B
        let mut graph = RenderGraph::new();
        graph.insert(&component("S"), renders(&["A", "C"]));
        graph.insert(&component("A"), renders(&["B"]));
        graph.insert(&component("B"), renders(&["A", "E"]));
        graph.insert(&component("C"), renders(&["B"]));

        assert!(!can_render(&component("S"), &[component("D")], &graph, 10));
        assert!(can_render(&component("S"), &[component("E")], &graph, 10));
    }

    #[test]
    fn test_unresolved_names_match_within_unit() {
        let mut graph = RenderGraph::new();
        let local = ComponentRef::unresolved("Header", "src/App.tsx");
        graph.insert(
            &ComponentRef::unresolved("MyHeader", "src/App.tsx"),
            RendersDeclaration {
                targets: SmallVec::from_iter([local.clone()]),
                ..renders(&[])
            },
        );

        let actual = ComponentRef::unresolved("MyHeader", "src/App.tsx");
        assert!(can_render(&actual, &[local], &graph, 10));
        let elsewhere = ComponentRef::unresolved("Header", "src/Page.tsx");
        assert!(!can_render(&actual, &[elsewhere], &graph, 10));
    }
}
