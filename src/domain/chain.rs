use serde::{Deserialize, Serialize};

use crate::domain::method::MethodSignature;

/// One step of a propagation chain: a caller somewhere above the throw site,
/// flagged with whether a handler at that step catches the chain's exception.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainEntry {
    pub method: MethodSignature,
    pub handled: bool,
}

/// A call chain for one exception: the throw origin followed by the ordered
/// callers it propagates through. The origin itself carries no handled flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallChain {
    pub throw_from: MethodSignature,
    pub chain: Vec<ChainEntry>,
    /// Nominal class name of the exception being propagated.
    pub exception: String,
}

impl CallChain {
    /// True when some step of the chain catches the exception.
    pub fn is_handled_anywhere(&self) -> bool {
        self.chain.iter().any(|entry| entry.handled)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSignature> {
        std::iter::once(&self.throw_from).chain(self.chain.iter().map(|entry| &entry.method))
    }
}
