use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::method::MethodSignature;

/// Nominal class or interface record derived from a front-end class binding.
/// Classes and interfaces share one node variant distinguished by
/// `is_interface`; the subtype relation treats them uniformly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Fully qualified name, e.g. "com.app.Service".
    pub name: String,
    /// Extended class, at most one.
    pub extends: Option<String>,
    /// Implemented interface names.
    pub implements: BTreeSet<String>,
    pub is_interface: bool,
    /// Method signatures this class declares itself.
    pub methods: BTreeSet<MethodSignature>,
}

impl ClassInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn extending(mut self, parent: &str) -> Self {
        self.extends = Some(parent.to_string());
        self
    }

    pub fn implementing(mut self, interface: &str) -> Self {
        self.implements.insert(interface.to_string());
        self
    }

    pub fn declaring(mut self, method: MethodSignature) -> Self {
        self.methods.insert(method);
        self
    }

    /// All direct supertype names: the extended class followed by the
    /// implemented interfaces.
    pub fn supertype_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(1 + self.implements.len());
        if let Some(parent) = &self.extends {
            names.push(parent.clone());
        }
        names.extend(self.implements.iter().cloned());
        names
    }
}
