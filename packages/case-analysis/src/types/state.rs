//! Case state threaded through the analysis pipeline.
//!
//! A [`CaseState`] is created once per analysis request and advanced by
//! applying [`CaseDelta`]s returned from pipeline nodes. Result fields are
//! filled strictly in the order router → retrieval → specialist → drafter;
//! `error` may short-circuit at any point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::traits::model::ModelTier;
use crate::types::retrieval::{FusedResult, GraphHit, VectorHit};

/// Pipeline stage.
///
/// `Complete` and `Error` are terminal: the runner stops advancing once
/// the supervisor returns either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Router,
    Retrieval,
    Specialist,
    Drafter,
    Complete,
    Error,
}

impl Stage {
    /// Whether the runner stops at this stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete | Stage::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Router => "router",
            Stage::Retrieval => "retrieval",
            Stage::Specialist => "specialist",
            Stage::Drafter => "drafter",
            Stage::Complete => "complete",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal matter assigned by the router (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegalMatter {
    #[default]
    Civil,
    Criminal,
    Labor,
    Tax,
}

impl LegalMatter {
    pub const ALL: [LegalMatter; 4] = [
        LegalMatter::Civil,
        LegalMatter::Criminal,
        LegalMatter::Labor,
        LegalMatter::Tax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LegalMatter::Civil => "civil",
            LegalMatter::Criminal => "criminal",
            LegalMatter::Labor => "labor",
            LegalMatter::Tax => "tax",
        }
    }

    /// How specialized the domain is (0-1), one of the complexity signals.
    pub fn specialization(self) -> f64 {
        match self {
            LegalMatter::Civil => 0.3,
            LegalMatter::Labor => 0.5,
            LegalMatter::Criminal => 0.6,
            LegalMatter::Tax => 0.8,
        }
    }
}

impl fmt::Display for LegalMatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalMatter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        LegalMatter::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| format!("unknown legal matter: {s}"))
    }
}

/// Kind of decision the document calls for (closed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionType {
    /// Provisional injunctive relief
    Liminar,
    /// Final judgment on the merits
    Sentenca,
    /// Procedural order (non-substantive)
    #[default]
    Despacho,
    /// Appellate court decision
    Acordao,
}

impl DecisionType {
    pub const ALL: [DecisionType; 4] = [
        DecisionType::Liminar,
        DecisionType::Sentenca,
        DecisionType::Despacho,
        DecisionType::Acordao,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionType::Liminar => "liminar",
            DecisionType::Sentenca => "sentenca",
            DecisionType::Despacho => "despacho",
            DecisionType::Acordao => "acordao",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DecisionType::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("unknown decision type: {s}"))
    }
}

/// Classification produced by the router stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterResult {
    pub legal_matter: LegalMatter,
    pub decision_type: DecisionType,

    /// Authoritative 0-100 score computed from text heuristics
    pub complexity: u8,

    /// Router confidence, clamped to [0, 1]
    pub confidence: f64,

    /// Tier chosen for the specialist and drafter stages
    pub selected_model: ModelTier,

    /// Free-text justification from the classifier
    pub reasoning: String,

    /// Complexity self-reported by the classifier model.
    ///
    /// Recorded for observability only; scoring never reads it.
    #[serde(default)]
    pub complexity_hint: Option<f64>,
}

/// Context gathered by the retrieval stage.
///
/// An empty context (all lists empty) is still a produced context: it
/// means retrieval ran and found nothing, or failed non-fatally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalContext {
    pub vector_hits: Vec<VectorHit>,
    pub graph_hits: Vec<GraphHit>,
    pub fused: Vec<FusedResult>,
}

impl RetrievalContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vector_hits.is_empty() && self.graph_hits.is_empty() && self.fused.is_empty()
    }

    /// Fused passages joined for prompt inclusion, or `None` when empty.
    pub fn fused_text(&self) -> Option<String> {
        if self.fused.is_empty() {
            return None;
        }
        Some(
            self.fused
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

/// Structured legal analysis (facts / issue / rule / application / conclusion).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub facts: String,
    pub issue: String,
    pub rule: String,
    pub application: String,
    pub conclusion: String,
}

/// The single record threaded through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseState {
    pub extraction_id: String,
    pub document_id: String,
    pub user_id: String,

    /// Full extracted document text; never modified by the pipeline
    pub raw_text: String,

    /// Last stage the runner dispatched (informational, not authoritative)
    pub current_step: Stage,

    pub router_result: Option<RouterResult>,
    pub retrieval_context: Option<RetrievalContext>,
    pub analysis_result: Option<AnalysisResult>,
    pub draft_text: Option<String>,

    /// Identifier of the model actually invoked for analysis
    pub model_used: Option<String>,

    pub tokens_input: u64,
    pub tokens_output: u64,
    pub latency_ms: u64,

    /// Terminal failure message, prefixed with the failing node's name
    pub error: Option<String>,
}

impl CaseState {
    /// Create the initial state for one analysis request.
    pub fn new(
        extraction_id: impl Into<String>,
        document_id: impl Into<String>,
        user_id: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            extraction_id: extraction_id.into(),
            document_id: document_id.into(),
            user_id: user_id.into(),
            raw_text: raw_text.into(),
            current_step: Stage::Router,
            router_result: None,
            retrieval_context: None,
            analysis_result: None,
            draft_text: None,
            model_used: None,
            tokens_input: 0,
            tokens_output: 0,
            latency_ms: 0,
            error: None,
        }
    }

    /// Merge a node's delta into this state.
    ///
    /// Result fields are only ever set, never cleared. Counters in the
    /// delta are increments, so totals never decrease.
    pub fn apply(&mut self, delta: CaseDelta) {
        if let Some(router_result) = delta.router_result {
            self.router_result = Some(router_result);
        }
        if let Some(context) = delta.retrieval_context {
            self.retrieval_context = Some(context);
        }
        if let Some(analysis) = delta.analysis_result {
            self.analysis_result = Some(analysis);
        }
        if let Some(draft) = delta.draft_text {
            self.draft_text = Some(draft);
        }
        if let Some(model) = delta.model_used {
            self.model_used = Some(model);
        }
        if let Some(error) = delta.error {
            self.error = Some(error);
        }
        self.tokens_input = self.tokens_input.saturating_add(delta.tokens_input);
        self.tokens_output = self.tokens_output.saturating_add(delta.tokens_output);
        self.latency_ms = self.latency_ms.saturating_add(delta.latency_ms);
    }

    /// Whether the pipeline produced a draft without error.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.draft_text.is_some()
    }
}

/// The fields a node changed. Everything left `None` / zero is untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseDelta {
    pub router_result: Option<RouterResult>,
    pub retrieval_context: Option<RetrievalContext>,
    pub analysis_result: Option<AnalysisResult>,
    pub draft_text: Option<String>,
    pub model_used: Option<String>,
    pub tokens_input: u64,
    pub tokens_output: u64,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl CaseDelta {
    /// A delta carrying only a fatal error for `node`.
    pub fn failed(node: Stage, message: impl fmt::Display) -> Self {
        Self {
            error: Some(format!("{node} failed: {message}")),
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
