use crate::models::{InstrumentType, RiskLevel};

/// Score buckets for one instrument type. Scores below `medium_min` are low
/// risk, scores at or above `high_min` are high risk.
#[derive(Debug, Clone, Copy)]
pub struct RiskThresholds {
    pub medium_min: u32,
    pub high_min: u32,
}

/// Bucket boundaries are configuration keyed by instrument type, not derived
/// from `max_score`.
pub fn thresholds_for(instrument: InstrumentType) -> RiskThresholds {
    match instrument {
        InstrumentType::Mchat => RiskThresholds {
            medium_min: 3,
            high_min: 6,
        },
        InstrumentType::Qchat10 => RiskThresholds {
            medium_min: 7,
            high_min: 14,
        },
        InstrumentType::Qchat25 => RiskThresholds {
            medium_min: 16,
            high_min: 31,
        },
    }
}

pub fn classify_risk(instrument: InstrumentType, score: u32) -> RiskLevel {
    let thresholds = thresholds_for(instrument);
    if score >= thresholds.high_min {
        RiskLevel::High
    } else if score >= thresholds.medium_min {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_INSTRUMENTS: [InstrumentType; 3] = [
        InstrumentType::Mchat,
        InstrumentType::Qchat10,
        InstrumentType::Qchat25,
    ];

    #[test]
    fn mchat_buckets() {
        assert_eq!(classify_risk(InstrumentType::Mchat, 0), RiskLevel::Low);
        assert_eq!(classify_risk(InstrumentType::Mchat, 2), RiskLevel::Low);
        assert_eq!(classify_risk(InstrumentType::Mchat, 3), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Mchat, 5), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Mchat, 6), RiskLevel::High);
        assert_eq!(classify_risk(InstrumentType::Mchat, 23), RiskLevel::High);
    }

    #[test]
    fn qchat10_buckets() {
        assert_eq!(classify_risk(InstrumentType::Qchat10, 6), RiskLevel::Low);
        assert_eq!(classify_risk(InstrumentType::Qchat10, 7), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Qchat10, 13), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Qchat10, 14), RiskLevel::High);
    }

    #[test]
    fn qchat25_buckets() {
        assert_eq!(classify_risk(InstrumentType::Qchat25, 15), RiskLevel::Low);
        assert_eq!(classify_risk(InstrumentType::Qchat25, 16), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Qchat25, 30), RiskLevel::Medium);
        assert_eq!(classify_risk(InstrumentType::Qchat25, 31), RiskLevel::High);
    }

    #[test]
    fn risk_never_decreases_as_score_grows() {
        for instrument in ALL_INSTRUMENTS {
            let mut previous = RiskLevel::Low;
            for score in 0..=60 {
                let level = classify_risk(instrument, score);
                assert!(
                    level >= previous,
                    "{} dropped from {} to {} at score {}",
                    instrument,
                    previous,
                    level,
                    score
                );
                previous = level;
            }
        }
    }
}
