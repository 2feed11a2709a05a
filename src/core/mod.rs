//! Core logic: extraction, dependency inference, graph, translation and
//! documentation

pub mod annotate;
pub mod dependencies;
pub mod docs;
pub mod extractor;
pub mod graph;
pub mod pipeline;
pub mod translator;

pub use annotate::{AssistConfig, AssistedAnnotator, PromptKind, RuleAnnotator, TextGenerator};
pub use dependencies::resolve_dependencies;
pub use docs::describe;
pub use extractor::extract_references;
pub use graph::{build_graph, DependencyGraph};
pub use pipeline::{analyze, analyze_bytes, Analysis, AnalysisCache, DEFAULT_CACHE_CAPACITY};
pub use translator::FormulaTranslator;
