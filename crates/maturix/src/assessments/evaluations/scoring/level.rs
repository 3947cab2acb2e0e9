use serde::{Deserialize, Serialize};

/// Discrete maturity bands over the 0-5 score scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Initial,
    Defini,
    Mesure,
    Gere,
    Optimise,
}

impl MaturityLevel {
    /// Band lookup, total over the scale. Inputs outside [0, 5] are clamped.
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 5.0);
        if score < 1.5 {
            Self::Initial
        } else if score < 2.5 {
            Self::Defini
        } else if score < 3.5 {
            Self::Mesure
        } else if score < 4.5 {
            Self::Gere
        } else {
            Self::Optimise
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MaturityLevel::Initial => "Initial",
            MaturityLevel::Defini => "Défini",
            MaturityLevel::Mesure => "Mesuré",
            MaturityLevel::Gere => "Géré",
            MaturityLevel::Optimise => "Optimisé",
        }
    }
}

/// 0-5 score expressed as a rounded 0-100 percentage.
pub fn percentage(score: f64) -> u8 {
    (score.clamp(0.0, 5.0) / 5.0 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_hits_both_endpoints() {
        assert_eq!(percentage(0.0), 0);
        assert_eq!(percentage(5.0), 100);
    }

    #[test]
    fn percentage_is_monotonic_over_the_scale() {
        let mut previous = percentage(0.0);
        for step in 1..=100 {
            let score = f64::from(step) * 0.05;
            let current = percentage(score);
            assert!(current >= previous, "regression at score {score}");
            previous = current;
        }
    }

    #[test]
    fn percentage_rounds_to_the_nearest_point() {
        assert_eq!(percentage(10.0 / 3.0), 67);
        assert_eq!(percentage(2.5), 50);
    }

    #[test]
    fn percentage_clamps_out_of_scale_input() {
        assert_eq!(percentage(-1.0), 0);
        assert_eq!(percentage(7.2), 100);
    }

    #[test]
    fn bands_cover_the_documented_thresholds() {
        assert_eq!(MaturityLevel::from_score(0.0), MaturityLevel::Initial);
        assert_eq!(MaturityLevel::from_score(1.49), MaturityLevel::Initial);
        assert_eq!(MaturityLevel::from_score(1.5), MaturityLevel::Defini);
        assert_eq!(MaturityLevel::from_score(2.5), MaturityLevel::Mesure);
        assert_eq!(MaturityLevel::from_score(10.0 / 3.0), MaturityLevel::Mesure);
        assert_eq!(MaturityLevel::from_score(3.5), MaturityLevel::Gere);
        assert_eq!(MaturityLevel::from_score(4.5), MaturityLevel::Optimise);
        assert_eq!(MaturityLevel::from_score(5.0), MaturityLevel::Optimise);
    }

    #[test]
    fn labels_carry_the_product_wording() {
        assert_eq!(MaturityLevel::Initial.label(), "Initial");
        assert_eq!(MaturityLevel::Defini.label(), "Défini");
        assert_eq!(MaturityLevel::Mesure.label(), "Mesuré");
        assert_eq!(MaturityLevel::Gere.label(), "Géré");
        assert_eq!(MaturityLevel::Optimise.label(), "Optimisé");
    }
}
