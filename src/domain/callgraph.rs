// Call graph structures for ThrowTrace.
// Static call edges, their devirtualized expansion, and the reverse index
// chain enumeration walks.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::method::MethodSignature;

/// A static call edge: caller invokes callee as written at the call site,
/// before dispatch resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: MethodSignature,
    pub callee: MethodSignature,
}

/// A devirtualized call edge. `callee` is one possible runtime target;
/// `original_callee` is the statically written target, retained because
/// handler lookup keys on the call site as written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CallEdgeDyn {
    pub caller: MethodSignature,
    pub callee: MethodSignature,
    pub original_callee: MethodSignature,
}

/// Reverse index over devirtualized edges: callee -> caller -> edge.
/// Every method known to the database gets a bucket, even when isolated.
/// Buckets are ordered by caller signature so traversal order is stable.
pub type DynCallGraph = HashMap<MethodSignature, BTreeMap<MethodSignature, CallEdgeDyn>>;
