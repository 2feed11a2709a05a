//! End-to-end analysis of one workbook, plus the optional memoization layer

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::annotate::RuleAnnotator;
use super::dependencies::resolve_dependencies;
use super::extractor::extract_references;
use super::graph::build_graph;
use crate::error::RangeGraphResult;
use crate::types::{DependencyMap, GraphDescription, References, TranslationResult};
use crate::workbook::{WorkbookAccessor, XlsxWorkbook};

/// Everything derived from one workbook
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub references: References,
    pub dependencies: DependencyMap,
    pub graph: GraphDescription,
    pub table: Vec<TranslationResult>,
}

/// Extract → resolve → build graph, and annotate with the rule-based
/// annotator.
pub fn analyze<W>(workbook: &W) -> RangeGraphResult<Analysis>
where
    W: WorkbookAccessor + ?Sized,
{
    let annotator = RuleAnnotator::new()?;

    let references = extract_references(workbook);
    let dependencies = resolve_dependencies(&references);
    let graph = build_graph(&dependencies);
    let table = annotator.annotate(&references);

    info!(
        references = references.len(),
        edges = graph.edge_count(),
        "workbook analyzed"
    );

    Ok(Analysis {
        graph: graph.describe(),
        references,
        dependencies,
        table,
    })
}

/// Load raw `.xlsx` bytes and analyze them. A load failure aborts the run.
pub fn analyze_bytes(bytes: &[u8]) -> RangeGraphResult<Analysis> {
    let workbook = XlsxWorkbook::from_bytes(bytes)?;
    analyze(&workbook)
}

/// Number of analyses an [`AnalysisCache`] keeps unless told otherwise
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Analyses keyed by the SHA-256 of the workbook bytes, least recently used
/// evicted first once `capacity` entries are held.
///
/// Owned by the caller; skipping it or clearing it never changes results.
/// A capacity of zero stores nothing.
#[derive(Debug)]
pub struct AnalysisCache {
    entries: HashMap<String, Arc<Analysis>>,
    /// Keys from least to most recently used
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Hex SHA-256 of `bytes`
    pub fn key(bytes: &[u8]) -> String {
        format!("{:x}", Sha256::digest(bytes))
    }

    /// Cached analysis under `key`, marking it most recently used
    pub fn get(&mut self, key: &str) -> Option<Arc<Analysis>> {
        let hit = Arc::clone(self.entries.get(key)?);
        self.touch(key);
        debug!(%key, "analysis cache hit");
        Some(hit)
    }

    /// Store an analysis, evicting the least recently used entries beyond
    /// capacity
    pub fn insert(&mut self, key: String, analysis: Arc<Analysis>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), analysis).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(key = %oldest, "analysis evicted");
        }
    }

    /// Cached analysis for `bytes`, computing and storing it on a miss.
    /// Failed loads are not cached.
    pub fn get_or_analyze(&mut self, bytes: &[u8]) -> RangeGraphResult<Arc<Analysis>> {
        let key = Self::key(bytes);
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let analysis = Arc::new(analyze_bytes(bytes)?);
        self.insert(key, Arc::clone(&analysis));
        Ok(analysis)
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
