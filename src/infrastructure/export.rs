//! Chain exporters.
//!
//! JSON for downstream tooling, plain text for reading chains directly.

use std::fs;
use std::io;

use crate::domain::chain::CallChain;
use crate::ports::ChainExporter;

pub struct JsonChainExporter;

impl ChainExporter for JsonChainExporter {
    fn export(&self, chains: &[CallChain], path: &str) -> io::Result<()> {
        let body = serde_json::to_string_pretty(chains)?;
        fs::write(path, body)
    }
}

pub struct TextChainExporter;

impl TextChainExporter {
    /// One line per chain: exception, then the throw origin followed by its
    /// callers bottom-up, caught steps marked.
    fn render(chain: &CallChain) -> String {
        let mut line = format!("{}: {}", chain.exception, chain.throw_from);
        for entry in &chain.chain {
            line.push_str(" <- ");
            line.push_str(&entry.method.to_string());
            if entry.handled {
                line.push_str(" [caught]");
            }
        }
        line
    }
}

impl ChainExporter for TextChainExporter {
    fn export(&self, chains: &[CallChain], path: &str) -> io::Result<()> {
        let lines: Vec<String> = chains.iter().map(Self::render).collect();
        fs::write(path, lines.join("\n"))
    }
}
