use serde::{Deserialize, Serialize};

/// Analysis configuration. Passed explicitly at database construction; there
/// is no global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Package-name prefixes identifying the platform standard library.
    /// A platform method with a non-empty throws clause counts as an
    /// exception source even without a body.
    pub platform_package_prefixes: Vec<String>,
    /// Verdict of `can_handle_exception` when the thrown or caught class has
    /// no binding. `true` assumes unknown classes may match, which stops
    /// propagation early; `false` keeps chains flowing upward instead.
    pub unknown_class_handled: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            platform_package_prefixes: vec!["java".to_string(), "javax".to_string()],
            unknown_class_handled: true,
        }
    }
}

impl AnalysisConfig {
    pub fn is_platform_package(&self, package: &str) -> bool {
        self.platform_package_prefixes
            .iter()
            .any(|prefix| package.starts_with(prefix.as_str()))
    }
}
