use rayon::prelude::*;

use crate::domain::chain::CallChain;
use crate::domain::database::ProjectDatabase;
use crate::ports::ChainExporter;

/// Analyze every exception source in a sealed database and export the
/// resulting chains.
pub struct AnalyzeUsecase<'a> {
    pub exporter: &'a dyn ChainExporter,
}

impl<'a> AnalyzeUsecase<'a> {
    /// Fan chain enumeration out across sources with rayon. Safe because a
    /// sealed database is read-only; the source list is sorted and per-source
    /// output is deterministic, so the collected order is stable.
    pub fn run<M, C>(
        &self,
        database: &ProjectDatabase<M, C>,
        export_path: &str,
    ) -> std::io::Result<Vec<CallChain>>
    where
        M: Sync,
        C: Sync,
    {
        let sources = database.exception_sources();
        let chains: Vec<CallChain> = sources
            .par_iter()
            .flat_map_iter(|source| database.chains_from_source(source))
            .collect();
        self.exporter.export(&chains, export_path)?;
        Ok(chains)
    }
}
