//! JSON project ingestion.
//!
//! The parsing front-end is a separate tool; it hands the analyzer a project
//! facts document (methods, call sites, throw sites, catch clauses, class
//! declarations). This module defines that document and loads it into a
//! `ProjectDatabase`, sealing it in the process.

use std::collections::BTreeSet;
use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::class::ClassInfo;
use crate::domain::config::AnalysisConfig;
use crate::domain::database::ProjectDatabase;
use crate::domain::method::{MethodInfo, MethodSignature};
use crate::ports::ClassBindingAdapter;

/// A method signature as it appears in the facts document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureDoc {
    pub class: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub throws: Vec<String>,
}

impl SignatureDoc {
    pub fn to_signature(&self) -> MethodSignature {
        MethodSignature {
            qualified_class_name: self.class.clone(),
            name: self.name.clone(),
            parameter_types: self.params.clone(),
            package_name: self.package.clone(),
            throws_declaration: self.throws.clone(),
        }
    }
}

/// Catch clauses textually enclosing the call to `callee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerDoc {
    pub callee: SignatureDoc,
    #[serde(default)]
    pub catches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDoc {
    pub signature: SignatureDoc,
    #[serde(default)]
    pub calls: Vec<SignatureDoc>,
    #[serde(default)]
    pub throws_in_body: Vec<String>,
    #[serde(default)]
    pub handlers: Vec<HandlerDoc>,
}

/// Class binding token of the JSON front-end. Carried opaquely by the
/// database and adapted to `ClassInfo` at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDoc {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub methods: Vec<SignatureDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDoc {
    #[serde(default)]
    pub methods: Vec<MethodDoc>,
    /// Methods known only by binding, e.g. library methods without sources.
    #[serde(default)]
    pub bound_methods: Vec<SignatureDoc>,
    #[serde(default)]
    pub classes: Vec<ClassDoc>,
}

pub struct ClassDocAdapter;

impl ClassBindingAdapter<ClassDoc> for ClassDocAdapter {
    fn class_info(&self, name: &str, binding: &ClassDoc) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            extends: binding.extends.clone(),
            implements: binding.implements.iter().cloned().collect(),
            is_interface: binding.is_interface,
            methods: binding.methods.iter().map(SignatureDoc::to_signature).collect(),
        }
    }
}

pub struct ProjectLoader;

impl ProjectLoader {
    /// Load a facts file and return the sealed database.
    pub fn load_file(path: &str, config: AnalysisConfig) -> Result<ProjectDatabase<(), ClassDoc>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project facts file: {}", path))?;
        let doc: ProjectDoc = serde_json::from_str(&text)
            .with_context(|| format!("Invalid project facts JSON: {}", path))?;
        Ok(Self::from_doc(doc, config))
    }

    pub fn from_doc(doc: ProjectDoc, config: AnalysisConfig) -> ProjectDatabase<(), ClassDoc> {
        let mut db = ProjectDatabase::new(config);

        for method in doc.methods {
            let signature = method.signature.to_signature();
            let mut info = MethodInfo::stub(signature.clone());
            info.callings = method.calls.iter().map(SignatureDoc::to_signature).collect();
            info.throws_in_body = method.throws_in_body.iter().cloned().collect();
            for handler in &method.handlers {
                let catches: BTreeSet<String> = handler.catches.iter().cloned().collect();
                info.calling_to_handlers
                    .entry(handler.callee.to_signature())
                    .or_default()
                    .extend(catches);
            }
            db.method_to_info.insert(signature, info);
        }
        for bound in doc.bound_methods {
            db.method_to_binding.insert(bound.to_signature(), ());
        }
        for class in doc.classes {
            db.class_to_binding.insert(class.name.clone(), class);
        }

        db.build(&ClassDocAdapter);
        db
    }
}
