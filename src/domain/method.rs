use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity key for a method. Two signatures are equal iff every component
/// is equal, including the declared-throws list.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Fully qualified name of the declaring class, e.g. "com.app.Service".
    pub qualified_class_name: String,
    pub name: String,
    /// Ordered parameter type names as written at the declaration.
    pub parameter_types: Vec<String>,
    pub package_name: Option<String>,
    /// Nominal exception class names from the throws clause.
    pub throws_declaration: Vec<String>,
}

impl MethodSignature {
    pub fn new(qualified_class_name: &str, name: &str, parameter_types: &[&str]) -> Self {
        Self {
            qualified_class_name: qualified_class_name.to_string(),
            name: name.to_string(),
            parameter_types: parameter_types.iter().map(|p| p.to_string()).collect(),
            package_name: None,
            throws_declaration: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.package_name = Some(package.to_string());
        self
    }

    pub fn with_throws(mut self, throws: &[&str]) -> Self {
        self.throws_declaration = throws.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Dispatch key match: name and parameter list only. Return type and
    /// throws clause never participate in override resolution.
    pub fn overrides_key_matches(&self, other: &MethodSignature) -> bool {
        self.name == other.name && self.parameter_types == other.parameter_types
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({})",
            self.qualified_class_name,
            self.name,
            self.parameter_types.join(", ")
        )
    }
}

/// Per-method facts extracted by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub signature: MethodSignature,
    /// Signatures statically invoked in the body, as written at the call site.
    pub callings: BTreeSet<MethodSignature>,
    /// Exception class names thrown by explicit throw statements in the body.
    pub throws_in_body: BTreeSet<String>,
    /// Called signature -> catch-clause exception class names textually
    /// enclosing that call site.
    pub calling_to_handlers: HashMap<MethodSignature, BTreeSet<String>>,
}

impl MethodInfo {
    /// Minimal record for a method known only through a binding: the
    /// signature is the only populated field.
    pub fn stub(signature: MethodSignature) -> Self {
        Self {
            signature,
            ..Self::default()
        }
    }
}
