//! Documentation table: per-reference documentation and translated
//! expression
//!
//! [`RuleAnnotator`] is deterministic and local. [`AssistedAnnotator`] asks
//! an external text generator instead, bounding every call and turning
//! failures into a visible placeholder for that cell only.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::docs::describe;
use super::translator::FormulaTranslator;
use crate::error::{RangeGraphError, RangeGraphResult};
use crate::types::{References, TranslationResult};

/// Documentation text used by the assisted path for formula-less references
pub const ASSISTED_NO_FORMULA: &str = "No formula.";

/// Deterministic annotator built from the keyword rules and the translator
#[derive(Debug, Clone)]
pub struct RuleAnnotator {
    translator: FormulaTranslator,
}

impl RuleAnnotator {
    pub fn new() -> RangeGraphResult<Self> {
        Ok(Self {
            translator: FormulaTranslator::new()?,
        })
    }

    pub fn annotate_formula(&self, name: &str, formula: Option<&str>) -> TranslationResult {
        TranslationResult {
            name: name.to_string(),
            documentation: describe(formula),
            excel_formula: formula.unwrap_or_default().to_string(),
            translated_expression: self.translator.translate(formula),
        }
    }

    /// One row per reference, in name order
    pub fn annotate(&self, references: &References) -> Vec<TranslationResult> {
        references
            .iter()
            .map(|(name, reference)| self.annotate_formula(name, reference.formula.as_deref()))
            .collect()
    }
}

//==============================================================================
// Assisted annotation
//==============================================================================

/// Prompt in, generated text or an error message out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Documentation,
    Translation,
}

impl PromptKind {
    pub fn prompt(self, formula: &str) -> String {
        match self {
            Self::Documentation => {
                format!("Explain what the following Excel formula does:\n{}", formula)
            }
            Self::Translation => format!(
                "Translate this Excel formula into a clean, readable Python expression:\n{}",
                formula
            ),
        }
    }
}

/// Limits for calls to the text generator
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Upper bound for a single call
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub max_retries: u32,
    pub max_tokens: usize,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            max_tokens: 100,
        }
    }
}

/// Annotator backed by a [`TextGenerator`].
///
/// Each (prompt kind, formula) pair is sent at most once: the outcome,
/// placeholder included, is remembered until [`clear`](Self::clear).
pub struct AssistedAnnotator<G> {
    generator: G,
    config: AssistConfig,
    memo: HashMap<(PromptKind, String), String>,
}

impl<G: TextGenerator> AssistedAnnotator<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, AssistConfig::default())
    }

    pub fn with_config(generator: G, config: AssistConfig) -> Self {
        Self {
            generator,
            config,
            memo: HashMap::new(),
        }
    }

    /// Number of remembered outcomes
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }

    /// One row per reference, in name order
    pub async fn annotate(&mut self, references: &References) -> Vec<TranslationResult> {
        let mut rows = Vec::with_capacity(references.len());
        for (name, reference) in references {
            let row = match reference.formula_text() {
                Some(formula) => TranslationResult {
                    name: name.clone(),
                    documentation: self.ask(PromptKind::Documentation, formula).await,
                    excel_formula: formula.to_string(),
                    translated_expression: self.ask(PromptKind::Translation, formula).await,
                },
                None => TranslationResult {
                    name: name.clone(),
                    documentation: ASSISTED_NO_FORMULA.to_string(),
                    excel_formula: String::new(),
                    translated_expression: String::new(),
                },
            };
            rows.push(row);
        }
        rows
    }

    async fn ask(&mut self, kind: PromptKind, formula: &str) -> String {
        let key = (kind, formula.to_string());
        if let Some(hit) = self.memo.get(&key) {
            return hit.clone();
        }

        let text = match self.call(&kind.prompt(formula)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(?kind, formula, error = %e, "text generation failed");
                e.placeholder()
            }
        };
        self.memo.insert(key, text.clone());
        text
    }

    async fn call(&self, prompt: &str) -> RangeGraphResult<String> {
        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            let pending = self.generator.generate(prompt, self.config.max_tokens);
            match tokio::time::timeout(self.config.timeout, pending).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => last_error = e,
                Err(_) => last_error = format!("timed out after {:?}", self.config.timeout),
            }
            debug!(attempt, error = %last_error, "text generation attempt failed");
        }
        Err(RangeGraphError::ExternalService(last_error))
    }
}
