//! Supervisor: decides which stage runs next from the fields already set.
//!
//! Pure and idempotent, so a persisted state can be resumed by calling it
//! again. `current_step` is never consulted.

use crate::types::state::{CaseState, Stage};

/// Next stage for `state`. First match wins:
///
/// 1. `error` set → [`Stage::Error`]
/// 2. `draft_text` set → [`Stage::Complete`]
/// 3. `analysis_result` set → [`Stage::Drafter`]
/// 4. `retrieval_context` and `router_result` set → [`Stage::Specialist`]
/// 5. `router_result` set → [`Stage::Retrieval`]
/// 6. otherwise → [`Stage::Router`]
pub fn next_stage(state: &CaseState) -> Stage {
    if state.error.is_some() {
        Stage::Error
    } else if state.draft_text.is_some() {
        Stage::Complete
    } else if state.analysis_result.is_some() {
        Stage::Drafter
    } else if state.router_result.is_some() && state.retrieval_context.is_some() {
        Stage::Specialist
    } else if state.router_result.is_some() {
        Stage::Retrieval
    } else {
        Stage::Router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::model::ModelTier;
    use crate::types::state::{
        AnalysisResult, DecisionType, LegalMatter, RetrievalContext, RouterResult,
    };

    fn fresh() -> CaseState {
        CaseState::new("ext", "doc", "user", "texto")
    }

    fn routed() -> RouterResult {
        RouterResult {
            legal_matter: LegalMatter::Civil,
            decision_type: DecisionType::Sentenca,
            complexity: 40,
            confidence: 0.8,
            selected_model: ModelTier::Standard,
            reasoning: "contract dispute".into(),
            complexity_hint: None,
        }
    }

    #[test]
    fn test_fresh_state_goes_to_router() {
        assert_eq!(next_stage(&fresh()), Stage::Router);
    }

    #[test]
    fn test_progression_by_field_presence() {
        let mut state = fresh();
        state.router_result = Some(routed());
        assert_eq!(next_stage(&state), Stage::Retrieval);

        state.retrieval_context = Some(RetrievalContext::empty());
        assert_eq!(next_stage(&state), Stage::Specialist);

        state.analysis_result = Some(AnalysisResult::default());
        assert_eq!(next_stage(&state), Stage::Drafter);

        state.draft_text = Some("minuta".into());
        assert_eq!(next_stage(&state), Stage::Complete);
    }

    #[test]
    fn test_retrieval_without_router_still_routes() {
        let mut state = fresh();
        state.retrieval_context = Some(RetrievalContext::empty());
        assert_eq!(next_stage(&state), Stage::Router);
    }

    #[test]
    fn test_error_wins_over_everything() {
        let mut state = fresh();
        state.router_result = Some(routed());
        state.retrieval_context = Some(RetrievalContext::empty());
        state.analysis_result = Some(AnalysisResult::default());
        state.draft_text = Some("minuta".into());
        state.error = Some("drafter failed: timeout".into());
        assert_eq!(next_stage(&state), Stage::Error);
    }

    #[test]
    fn test_current_step_is_ignored_and_calls_are_idempotent() {
        let mut state = fresh();
        state.current_step = Stage::Drafter;
        assert_eq!(next_stage(&state), Stage::Router);
        assert_eq!(next_stage(&state), next_stage(&state));
    }
}
