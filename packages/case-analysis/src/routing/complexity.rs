//! Case complexity scoring.
//!
//! Seven independently normalized signals, weighted to a total of 100:
//!
//! | signal                 | weight | normalization        |
//! |------------------------|--------|----------------------|
//! | fact length (chars)    | 15     | `min(len / 4000, 1)` |
//! | question count         | 15     | `min(n / 5, 1)`      |
//! | claim count            | 20     | `min(n / 6, 1)`      |
//! | domain specialization  | 10     | identity             |
//! | distinct entities      | 15     | `min(n / 10, 1)`     |
//! | multi-party            | 10     | 0 or 1               |
//! | router confidence      | 15     | `1 - confidence`     |

use serde::{Deserialize, Serialize};

const FACT_LENGTH_WEIGHT: f64 = 15.0;
const QUESTION_WEIGHT: f64 = 15.0;
const CLAIM_WEIGHT: f64 = 20.0;
const DOMAIN_WEIGHT: f64 = 10.0;
const ENTITY_WEIGHT: f64 = 15.0;
const MULTI_PARTY_WEIGHT: f64 = 10.0;
const CONFIDENCE_WEIGHT: f64 = 15.0;

const FACT_LENGTH_SATURATION: f64 = 4000.0;
const QUESTION_SATURATION: f64 = 5.0;
const CLAIM_SATURATION: f64 = 6.0;
const ENTITY_SATURATION: f64 = 10.0;

/// Signals describing how demanding a case is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityInput {
    /// Length of the facts in characters
    pub fact_length: usize,

    /// Number of legal questions raised
    pub question_count: usize,

    /// Number of claims (requests for relief)
    pub claim_count: usize,

    /// 0-1, higher for more specialized domains
    pub domain_specialization: f64,

    /// Distinct named entities referenced
    pub entity_count: usize,

    /// More parties than a single plaintiff and defendant
    pub multi_party: bool,

    /// 0-1 router confidence; low confidence means an ambiguous case
    pub confidence: f64,
}

fn saturate(value: usize, saturation: f64) -> f64 {
    (value as f64 / saturation).min(1.0)
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Score a case 0-100.
///
/// This score, not any model's self-assessment, decides the model tier.
pub fn classify_complexity(input: &ComplexityInput) -> u8 {
    let total = saturate(input.fact_length, FACT_LENGTH_SATURATION) * FACT_LENGTH_WEIGHT
        + saturate(input.question_count, QUESTION_SATURATION) * QUESTION_WEIGHT
        + saturate(input.claim_count, CLAIM_SATURATION) * CLAIM_WEIGHT
        + unit(input.domain_specialization) * DOMAIN_WEIGHT
        + saturate(input.entity_count, ENTITY_SATURATION) * ENTITY_WEIGHT
        + if input.multi_party { MULTI_PARTY_WEIGHT } else { 0.0 }
        + (1.0 - unit(input.confidence)) * CONFIDENCE_WEIGHT;

    total.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn minimal() -> ComplexityInput {
        ComplexityInput {
            fact_length: 300,
            question_count: 1,
            claim_count: 1,
            domain_specialization: 0.1,
            entity_count: 2,
            multi_party: false,
            confidence: 0.95,
        }
    }

    fn maximal() -> ComplexityInput {
        ComplexityInput {
            fact_length: 12_000,
            question_count: 8,
            claim_count: 9,
            domain_specialization: 0.9,
            entity_count: 25,
            multi_party: true,
            confidence: 0.4,
        }
    }

    #[test]
    fn test_minimal_case_is_simple() {
        assert!(classify_complexity(&minimal()) < 30);
    }

    #[test]
    fn test_maximal_case_is_complex() {
        assert!(classify_complexity(&maximal()) > 70);
    }

    #[test]
    fn test_weights_sum_to_hundred() {
        let saturated = ComplexityInput {
            fact_length: 4000,
            question_count: 5,
            claim_count: 6,
            domain_specialization: 1.0,
            entity_count: 10,
            multi_party: true,
            confidence: 0.0,
        };
        assert_eq!(classify_complexity(&saturated), 100);

        let empty = ComplexityInput {
            fact_length: 0,
            question_count: 0,
            claim_count: 0,
            domain_specialization: 0.0,
            entity_count: 0,
            multi_party: false,
            confidence: 1.0,
        };
        assert_eq!(classify_complexity(&empty), 0);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let input = ComplexityInput {
            domain_specialization: 7.0,
            confidence: -3.0,
            ..maximal()
        };
        assert_eq!(classify_complexity(&input), 100);

        let input = ComplexityInput {
            domain_specialization: f64::NAN,
            confidence: f64::NAN,
            ..minimal()
        };
        assert!(classify_complexity(&input) <= 100);
    }

    fn arb_input() -> impl Strategy<Value = ComplexityInput> {
        (
            0usize..20_000,
            0usize..20,
            0usize..20,
            0.0f64..=1.0,
            0usize..40,
            any::<bool>(),
            0.0f64..=1.0,
        )
        .prop_map(|signals| ComplexityInput {
            fact_length: signals.0,
            question_count: signals.1,
            claim_count: signals.2,
            domain_specialization: signals.3,
            entity_count: signals.4,
            multi_party: signals.5,
            confidence: signals.6,
        })
    }

    proptest! {
        #[test]
        fn prop_score_in_range(input in arb_input()) {
            prop_assert!(classify_complexity(&input) <= 100);
        }

        #[test]
        fn prop_monotonic_in_each_factor(
            input in arb_input(),
            bump in 1usize..5000,
            delta in 0.0f64..1.0,
        ) {
            let base = classify_complexity(&input);

            let more_facts = ComplexityInput { fact_length: input.fact_length + bump, ..input };
            prop_assert!(classify_complexity(&more_facts) >= base);

            let more_questions = ComplexityInput {
                question_count: input.question_count + bump,
                ..input
            };
            prop_assert!(classify_complexity(&more_questions) >= base);

            let more_claims = ComplexityInput { claim_count: input.claim_count + bump, ..input };
            prop_assert!(classify_complexity(&more_claims) >= base);

            let more_entities = ComplexityInput {
                entity_count: input.entity_count + bump,
                ..input
            };
            prop_assert!(classify_complexity(&more_entities) >= base);

            let more_specialized = ComplexityInput {
                domain_specialization: (input.domain_specialization + delta).min(1.0),
                ..input
            };
            prop_assert!(classify_complexity(&more_specialized) >= base);

            let multi = ComplexityInput { multi_party: true, ..input };
            prop_assert!(classify_complexity(&multi) >= base);

            // Lower confidence raises complexity.
            let less_confident = ComplexityInput {
                confidence: (input.confidence - delta).max(0.0),
                ..input
            };
            prop_assert!(classify_complexity(&less_confident) >= base);
        }
    }
}
