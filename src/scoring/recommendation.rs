use crate::models::{Recommendation, RiskLevel};

/// Build the canned advisory payload for a risk level. Flagged question texts
/// are echoed back for every level so callers see the same shape regardless of
/// outcome.
pub fn build_recommendations(risk_level: RiskLevel, flagged_behaviors: &[String]) -> Recommendation {
    let (summary, suggested_action, next_steps) = match risk_level {
        RiskLevel::Low => (
            "Low risk observed. Continue regular monitoring.",
            "Re-screen in 3 months or sooner if concerns arise.",
            vec![
                "Keep engaging your child in interactive play and shared activities.",
                "Re-take the screening after three months, or earlier if new concerns appear.",
            ],
        ),
        RiskLevel::Medium => (
            "Moderate risk detected.",
            "Consult a pediatric specialist and consider scheduling a professional screening.",
            vec![
                "Schedule an appointment with a pediatric specialist.",
                "Bring the flagged behaviors from this screening to the consultation.",
                "Re-screen after the consultation to track changes.",
            ],
        ),
        RiskLevel::High => (
            "High risk detected for ASD indicators.",
            "Seek immediate consultation with a developmental pediatrician.",
            vec![
                "Contact a developmental pediatrician as soon as possible.",
                "Share this screening result, including the flagged behaviors, with the clinician.",
                "Ask about a full diagnostic evaluation.",
            ],
        ),
    };

    Recommendation {
        summary: summary.to_string(),
        suggested_action: suggested_action.to_string(),
        next_steps: next_steps.into_iter().map(String::from).collect(),
        flagged_behaviors: flagged_behaviors.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_next_steps() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            let rec = build_recommendations(level, &[]);
            assert!(!rec.summary.is_empty());
            assert!(!rec.suggested_action.is_empty());
            assert!(!rec.next_steps.is_empty());
        }
    }

    #[test]
    fn flagged_behaviors_are_echoed_in_order() {
        let flagged = vec!["Does not point".to_string(), "Avoids eye contact".to_string()];
        let rec = build_recommendations(RiskLevel::High, &flagged);
        assert_eq!(rec.flagged_behaviors, flagged);

        // Echoed for low risk too, uniformly.
        let rec = build_recommendations(RiskLevel::Low, &flagged);
        assert_eq!(rec.flagged_behaviors, flagged);
    }
}
