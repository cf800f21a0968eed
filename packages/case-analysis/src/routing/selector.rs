//! Complexity → model tier and reasoning budget.
//!
//! | score  | tier     | reasoning budget |
//! |--------|----------|------------------|
//! | < 30   | fast     | none             |
//! | 30-49  | standard | none             |
//! | 50-69  | standard | 10,000           |
//! | 70-89  | premium  | 16,000           |
//! | >= 90  | premium  | 32,000           |
//!
//! The specialist and drafter both call [`select_model`] with the router's
//! score, so a case is analyzed and drafted at the same capability.

use serde::{Deserialize, Serialize};

use crate::traits::model::ModelTier;

/// Tier plus optional reasoning budget for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub tier: ModelTier,
    pub reasoning_budget: Option<u32>,
}

pub fn select_model(complexity: u8) -> ModelSelection {
    let (tier, reasoning_budget) = match complexity {
        0..=29 => (ModelTier::Fast, None),
        30..=49 => (ModelTier::Standard, None),
        50..=69 => (ModelTier::Standard, Some(10_000)),
        70..=89 => (ModelTier::Premium, Some(16_000)),
        _ => (ModelTier::Premium, Some(32_000)),
    };
    ModelSelection {
        tier,
        reasoning_budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(tier: ModelTier, budget: Option<u32>) -> ModelSelection {
        ModelSelection {
            tier,
            reasoning_budget: budget,
        }
    }

    #[test]
    fn test_representative_scores() {
        assert_eq!(select_model(20), sel(ModelTier::Fast, None));
        assert_eq!(select_model(40), sel(ModelTier::Standard, None));
        assert_eq!(select_model(55), sel(ModelTier::Standard, Some(10_000)));
        assert_eq!(select_model(80), sel(ModelTier::Premium, Some(16_000)));
        assert_eq!(select_model(95), sel(ModelTier::Premium, Some(32_000)));
    }

    #[test]
    fn test_lower_bounds_are_inclusive() {
        assert_eq!(select_model(29).tier, ModelTier::Fast);
        assert_eq!(select_model(30), sel(ModelTier::Standard, None));
        assert_eq!(select_model(49).reasoning_budget, None);
        assert_eq!(select_model(50).reasoning_budget, Some(10_000));
        assert_eq!(select_model(69).tier, ModelTier::Standard);
        assert_eq!(select_model(70), sel(ModelTier::Premium, Some(16_000)));
        assert_eq!(select_model(89).reasoning_budget, Some(16_000));
        assert_eq!(select_model(90).reasoning_budget, Some(32_000));
        assert_eq!(select_model(100).reasoning_budget, Some(32_000));
    }

    #[test]
    fn test_tier_never_decreases_with_score() {
        let mut previous = select_model(0);
        for score in 1..=100u8 {
            let current = select_model(score);
            assert!(current.tier >= previous.tier);
            assert!(current.reasoning_budget >= previous.reasoning_budget);
            previous = current;
        }
    }
}
