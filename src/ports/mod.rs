use crate::domain::chain::CallChain;
use crate::domain::class::ClassInfo;

/// Front-end-provided conversion from an opaque class binding token to the
/// nominal record the inheritance graph is built from.
pub trait ClassBindingAdapter<C> {
    fn class_info(&self, name: &str, binding: &C) -> ClassInfo;
}

/// Renders a chain list to a file.
pub trait ChainExporter {
    fn export(&self, chains: &[CallChain], path: &str) -> std::io::Result<()>;
}
