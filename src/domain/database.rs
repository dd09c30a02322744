//! Project database: the exception-propagation analysis core.
//!
//! Holds the ingestion maps populated by a front-end, runs the build pipeline
//! (binding completion -> inheritance graph -> static edges -> devirtualized
//! edges -> dynamic call graph), then answers chain queries over the sealed
//! result. Data flow is strictly one-way; after `build()` every structure is
//! read-only and queries are safe to run from multiple threads.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::callgraph::{CallEdge, CallEdgeDyn, DynCallGraph};
use crate::domain::chain::{CallChain, ChainEntry};
use crate::domain::config::AnalysisConfig;
use crate::domain::inheritance::InheritanceGraph;
use crate::domain::method::{MethodInfo, MethodSignature};
use crate::ports::ClassBindingAdapter;

/// Build-order state machine. Mutating a sealed database or querying a
/// building one is a programmer error, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildState {
    Building,
    Sealed,
}

/// In-memory project database, generic over the front-end's opaque method
/// binding tokens `M` and class binding tokens `C`. The core never inspects
/// a token: method bindings only contribute extra method identities, class
/// bindings are converted to `ClassInfo` through the adapter port.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDatabase<M, C> {
    pub method_to_info: HashMap<MethodSignature, MethodInfo>,
    /// Methods known only by binding; completed into `method_to_info` stubs.
    pub method_to_binding: HashMap<MethodSignature, M>,
    /// Qualified class name -> class binding token.
    pub class_to_binding: HashMap<String, C>,

    pub inherit_graph: InheritanceGraph,
    pub original_call_edges: BTreeSet<CallEdge>,
    pub dyn_call_edges: BTreeSet<CallEdgeDyn>,
    /// callee -> caller -> edge, one bucket per known method.
    pub dyn_call_graph: DynCallGraph,

    config: AnalysisConfig,
    state: BuildState,
}

impl<M, C> Default for ProjectDatabase<M, C> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl<M, C> ProjectDatabase<M, C> {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            method_to_info: HashMap::new(),
            method_to_binding: HashMap::new(),
            class_to_binding: HashMap::new(),
            inherit_graph: InheritanceGraph::default(),
            original_call_edges: BTreeSet::new(),
            dyn_call_edges: BTreeSet::new(),
            dyn_call_graph: HashMap::new(),
            config,
            state: BuildState::Building,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn is_sealed(&self) -> bool {
        self.state == BuildState::Sealed
    }

    /// Run the pipeline stages in order and seal the database.
    pub fn build(&mut self, adapter: &dyn ClassBindingAdapter<C>) {
        assert_eq!(
            self.state,
            BuildState::Building,
            "build() called on a sealed database"
        );
        self.add_method_info_from_bindings();
        self.build_inheritance_graph(adapter);
        self.build_original_call_edges();
        self.build_dyn_call_edges();
        self.build_dyn_call_graph();
        self.state = BuildState::Sealed;
    }

    fn assert_sealed(&self) {
        assert_eq!(
            self.state,
            BuildState::Sealed,
            "query before build() completed"
        );
    }

    /// Some called methods have no declaration in the analyzed sources, only
    /// a binding. Give each of them a stub record so they become first-class
    /// graph nodes.
    fn add_method_info_from_bindings(&mut self) {
        for signature in self.method_to_binding.keys() {
            if !self.method_to_info.contains_key(signature) {
                self.method_to_info
                    .insert(signature.clone(), MethodInfo::stub(signature.clone()));
            }
        }
    }

    fn build_inheritance_graph(&mut self, adapter: &dyn ClassBindingAdapter<C>) {
        let infos = self
            .class_to_binding
            .iter()
            .map(|(name, binding)| adapter.class_info(name, binding))
            .collect();
        self.inherit_graph = InheritanceGraph::new(infos);
    }

    fn build_original_call_edges(&mut self) {
        for (method, info) in &self.method_to_info {
            for calling in &info.callings {
                self.original_call_edges.insert(CallEdge {
                    caller: method.clone(),
                    callee: calling.clone(),
                });
            }
        }
    }

    /// Expand each static edge into one edge per possible runtime target:
    /// every override below the declared receiver's static type, plus the
    /// declared target itself.
    fn build_dyn_call_edges(&mut self) {
        for edge in &self.original_call_edges {
            let mut candidates = self
                .inherit_graph
                .all_overridden_methods(&edge.callee.qualified_class_name, &edge.callee);
            candidates.insert(edge.callee.clone());
            for target in candidates {
                self.dyn_call_edges.insert(CallEdgeDyn {
                    caller: edge.caller.clone(),
                    callee: target,
                    original_callee: edge.callee.clone(),
                });
            }
        }
    }

    fn build_dyn_call_graph(&mut self) {
        // Every known method gets a bucket, even when it neither calls nor
        // is called; leaf queries need well-defined empty buckets.
        for method in self.method_to_info.keys() {
            self.dyn_call_graph.entry(method.clone()).or_default();
        }
        for edge in &self.dyn_call_edges {
            // Override targets may be absent from the method set.
            self.dyn_call_graph.entry(edge.caller.clone()).or_default();
            self.dyn_call_graph
                .entry(edge.callee.clone())
                .or_default()
                .insert(edge.caller.clone(), edge.clone());
        }
    }

    /// A method is an exception source when its body throws, or when it is a
    /// platform standard-library method with a non-empty throws clause.
    pub fn is_exception_source(&self, method: &MethodSignature) -> bool {
        self.assert_sealed();
        let info = match self.method_to_info.get(method) {
            Some(info) => info,
            None => return false,
        };
        if !info.throws_in_body.is_empty() {
            return true;
        }
        let platform = match &method.package_name {
            Some(package) => self.config.is_platform_package(package),
            None => false,
        };
        platform && !method.throws_declaration.is_empty()
    }

    /// All exception sources in the database, sorted for stable output.
    pub fn exception_sources(&self) -> Vec<MethodSignature> {
        self.assert_sealed();
        let mut sources: Vec<MethodSignature> = self
            .method_to_info
            .keys()
            .filter(|&m| self.is_exception_source(m))
            .cloned()
            .collect();
        sources.sort();
        sources
    }

    /// Enumerate propagation chains upward from `source`.
    ///
    /// Reverse BFS with parent pointers: each method is claimed by the first
    /// path that discovers it, so the result is a spanning forest of paths
    /// rather than all simple paths. Output size stays linear in the graph;
    /// see `exactly_all_chains_from_source` for the exhaustive variant.
    pub fn chains_from_source(&self, source: &MethodSignature) -> Vec<CallChain> {
        self.assert_sealed();
        let info = match self.method_to_info.get(source) {
            Some(info) => info,
            None => return Vec::new(),
        };
        let exceptions = Self::exceptions_of(info);
        let mut result = Vec::new();
        for sequence in self.bfs(source) {
            result.extend(self.make_call_chains(&sequence, &exceptions));
        }
        result
    }

    /// Exhaustive DFS over simple paths. Cardinality is exponential in graph
    /// shape; kept for validating the BFS approximation on small inputs.
    #[deprecated(note = "exponential in graph shape; use chains_from_source")]
    pub fn exactly_all_chains_from_source(&self, source: &MethodSignature) -> Vec<CallChain> {
        self.assert_sealed();
        let info = match self.method_to_info.get(source) {
            Some(info) => info,
            None => return Vec::new(),
        };
        let exceptions = Self::exceptions_of(info);
        let mut sequences = Vec::new();
        self.dfs(source, &mut Vec::new(), &mut HashSet::new(), &mut sequences);
        let mut result = Vec::new();
        for sequence in &sequences {
            result.extend(self.make_call_chains(sequence, &exceptions));
        }
        result
    }

    /// Exceptions a source propagates: declared in the signature or thrown
    /// in the body, deduplicated and sorted.
    fn exceptions_of(info: &MethodInfo) -> BTreeSet<String> {
        let mut exceptions: BTreeSet<String> =
            info.signature.throws_declaration.iter().cloned().collect();
        exceptions.extend(info.throws_in_body.iter().cloned());
        exceptions
    }

    /// Reverse BFS from `source` over callee -> caller edges. A visited
    /// method whose every caller was already claimed ends one path; walking
    /// parent pointers back to the source yields the sequence.
    fn bfs(&self, source: &MethodSignature) -> Vec<Vec<MethodSignature>> {
        let empty = BTreeMap::new();
        let mut sequences = Vec::new();
        let mut visited = HashSet::new();
        let mut parent: HashMap<MethodSignature, Option<MethodSignature>> = HashMap::new();
        let mut queue = VecDeque::new();

        visited.insert(source.clone());
        parent.insert(source.clone(), None);
        queue.push_back(source.clone());

        while let Some(u) = queue.pop_front() {
            let bucket = self.dyn_call_graph.get(&u).unwrap_or(&empty);
            let mut advanced = false;
            for edge in bucket.values() {
                debug_assert_eq!(edge.callee, u);
                let caller = &edge.caller;
                if visited.insert(caller.clone()) {
                    parent.insert(caller.clone(), Some(u.clone()));
                    queue.push_back(caller.clone());
                    advanced = true;
                }
            }
            if !advanced {
                // u is a leaf of the BFS forest.
                let mut sequence = Vec::new();
                let mut cursor = Some(&u);
                while let Some(node) = cursor {
                    sequence.push(node.clone());
                    cursor = parent.get(node).and_then(|p| p.as_ref());
                }
                sequence.reverse();
                sequences.push(sequence);
            }
        }
        sequences
    }

    fn dfs(
        &self,
        u: &MethodSignature,
        current: &mut Vec<MethodSignature>,
        on_path: &mut HashSet<MethodSignature>,
        sequences: &mut Vec<Vec<MethodSignature>>,
    ) {
        let empty = BTreeMap::new();
        current.push(u.clone());
        on_path.insert(u.clone());

        let bucket = self.dyn_call_graph.get(u).unwrap_or(&empty);
        let mut advanced = false;
        for edge in bucket.values() {
            let caller = &edge.caller;
            if !on_path.contains(caller) {
                advanced = true;
                self.dfs(caller, current, on_path, sequences);
            }
        }
        if !advanced {
            sequences.push(current.clone());
        }

        current.pop();
        on_path.remove(u);
    }

    /// One `CallChain` per exception for a single method sequence; each step
    /// above the source gets its handled flag resolved against the call site
    /// that reached it.
    fn make_call_chains(
        &self,
        sequence: &[MethodSignature],
        exceptions: &BTreeSet<String>,
    ) -> Vec<CallChain> {
        debug_assert!(!sequence.is_empty());
        let mut chains = Vec::new();
        for exception in exceptions {
            let mut entries = Vec::with_capacity(sequence.len().saturating_sub(1));
            for i in 1..sequence.len() {
                let callee = &sequence[i - 1];
                let caller = &sequence[i];
                entries.push(ChainEntry {
                    method: caller.clone(),
                    handled: self.resolve_handled(callee, caller, exception),
                });
            }
            chains.push(CallChain {
                throw_from: sequence[0].clone(),
                chain: entries,
                exception: exception.clone(),
            });
        }
        chains
    }

    /// Handler lookup keys on the call site as written: take the original
    /// callee off the devirtualized edge, then check the caller's enclosing
    /// catch clauses for a compatible handler.
    fn resolve_handled(
        &self,
        callee: &MethodSignature,
        caller: &MethodSignature,
        exception: &str,
    ) -> bool {
        let edge = match self
            .dyn_call_graph
            .get(callee)
            .and_then(|bucket| bucket.get(caller))
        {
            Some(edge) => edge,
            None => return false,
        };
        let caller_info = match self.method_to_info.get(caller) {
            Some(info) => info,
            None => return false,
        };
        match caller_info.calling_to_handlers.get(&edge.original_callee) {
            Some(handlers) => handlers
                .iter()
                .any(|handler| self.can_handle_exception(exception, handler)),
            None => false,
        }
    }

    /// Nominal catch matching. When either class has no binding the verdict
    /// falls back to the configured unknown-class default.
    fn can_handle_exception(&self, throw_name: &str, catch_name: &str) -> bool {
        if !self.class_to_binding.contains_key(throw_name)
            || !self.class_to_binding.contains_key(catch_name)
        {
            return self.config.unknown_class_handled;
        }
        self.inherit_graph.is_compatible(throw_name, catch_name)
    }
}
