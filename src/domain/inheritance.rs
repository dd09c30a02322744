//! Nominal inheritance graph.
//!
//! Directed acyclic supertype relation over class names, combining single
//! class extension and multiple interface implementation. Backs both
//! exception-type compatibility and virtual-dispatch candidate lookup.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::domain::class::ClassInfo;
use crate::domain::method::MethodSignature;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InheritanceGraph {
    classes: HashMap<String, ClassInfo>,
    /// name -> direct supertypes (extends then implements).
    supertypes: HashMap<String, Vec<String>>,
    /// name -> direct subtypes, sorted for stable traversal order.
    subtypes: HashMap<String, Vec<String>>,
    /// Memoized compatibility verdicts. Thread-safe so sealed databases can
    /// answer queries concurrently.
    #[serde(skip)]
    compat_cache: DashMap<(String, String), bool>,
}

impl InheritanceGraph {
    pub fn new(class_infos: Vec<ClassInfo>) -> Self {
        let mut classes = HashMap::new();
        let mut supertypes: HashMap<String, Vec<String>> = HashMap::new();
        let mut subtypes: HashMap<String, Vec<String>> = HashMap::new();

        for info in class_infos {
            let parents = info.supertype_names();
            for parent in &parents {
                subtypes.entry(parent.clone()).or_default().push(info.name.clone());
            }
            supertypes.insert(info.name.clone(), parents);
            classes.insert(info.name.clone(), info);
        }
        for children in subtypes.values_mut() {
            children.sort();
            children.dedup();
        }

        let graph = Self {
            classes,
            supertypes,
            subtypes,
            compat_cache: DashMap::new(),
        };
        graph.assert_acyclic();
        graph
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Whether `sub` equals `sup` or transitively extends/implements it.
    /// Unknown class names have empty neighborhoods, so anything not
    /// reachable is simply incompatible.
    pub fn is_compatible(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let key = (sub.to_string(), sup.to_string());
        if let Some(cached) = self.compat_cache.get(&key) {
            return *cached;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(sub);
        queue.push_back(sub);
        let mut reachable = false;
        while let Some(current) = queue.pop_front() {
            if current == sup {
                reachable = true;
                break;
            }
            if let Some(parents) = self.supertypes.get(current) {
                for parent in parents {
                    if visited.insert(parent.as_str()) {
                        queue.push_back(parent.as_str());
                    }
                }
            }
        }

        self.compat_cache.insert(key, reachable);
        reachable
    }

    /// Runtime dispatch candidates below `owner_class`: every signature a
    /// strict subtype declares whose name and parameter list match `sig`.
    /// The statically written target itself is not included.
    pub fn all_overridden_methods(
        &self,
        owner_class: &str,
        sig: &MethodSignature,
    ) -> BTreeSet<MethodSignature> {
        let mut found = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(owner_class);
        queue.push_back(owner_class);

        while let Some(current) = queue.pop_front() {
            if current != owner_class {
                if let Some(info) = self.classes.get(current) {
                    for declared in &info.methods {
                        if declared.overrides_key_matches(sig) {
                            found.insert(declared.clone());
                        }
                    }
                }
            }
            if let Some(children) = self.subtypes.get(current) {
                for child in children {
                    if visited.insert(child.as_str()) {
                        queue.push_back(child.as_str());
                    }
                }
            }
        }
        found
    }

    /// The supertype relation must be a DAG; a cycle means the front-end
    /// handed over malformed bindings and the analysis state is unusable.
    fn assert_acyclic(&self) {
        // DFS coloring: 0 = unvisited, 1 = on stack, 2 = done.
        let mut color: HashMap<&str, u8> = HashMap::new();
        let mut stack: Vec<(&str, usize)> = Vec::new();

        for start in self.classes.keys() {
            if color.get(start.as_str()).copied().unwrap_or(0) != 0 {
                continue;
            }
            color.insert(start.as_str(), 1);
            stack.push((start.as_str(), 0));
            while let Some((node, next)) = stack.pop() {
                let parents = self.supertypes.get(node).map(Vec::as_slice).unwrap_or(&[]);
                if next < parents.len() {
                    stack.push((node, next + 1));
                    let parent = parents[next].as_str();
                    match color.get(parent).copied().unwrap_or(0) {
                        0 => {
                            color.insert(parent, 1);
                            stack.push((parent, 0));
                        }
                        1 => panic!("inheritance cycle involving class {}", parent),
                        _ => {}
                    }
                } else {
                    color.insert(node, 2);
                }
            }
        }
    }
}
