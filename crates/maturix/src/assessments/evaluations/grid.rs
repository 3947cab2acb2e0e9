use serde::{Deserialize, Serialize};

use super::domain::FunctionId;

const BOUND_TOLERANCE: f64 = 1e-9;

/// One `[score_min, score_max]` range of the interpretation grid for a
/// function, carrying the maturity level wording shown to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub function: FunctionId,
    pub score_min: f64,
    pub score_max: f64,
    pub level_label: String,
    pub description: String,
    pub recommendation: String,
    pub display_order: u16,
}

impl GridRow {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.score_min && score <= self.score_max
    }

    pub fn interpretation(&self) -> Interpretation {
        Interpretation {
            level_label: self.level_label.clone(),
            description: self.description.clone(),
            recommendation: self.recommendation.clone(),
        }
    }
}

/// Customer-facing slice of a grid row, embedded in scorecards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub level_label: String,
    pub description: String,
    pub recommendation: String,
}

/// Score-range to maturity-level mapping, per function. Ranges for one
/// function must tile [0, 5] without gaps or overlaps; `validate` enforces
/// this when the grid is loaded so `resolve` stays a plain lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationGrid {
    rows: Vec<GridRow>,
}

/// Grid configuration and lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("no grid range matches score {score:.2} for function '{function}'")]
    NoMatchingRange { function: FunctionId, score: f64 },
    #[error("grid for function '{function}' has an inverted range at position {position}")]
    InvertedRange { function: FunctionId, position: u16 },
    #[error("grid for function '{function}' starts at {found:.2} instead of 0")]
    DoesNotStartAtZero { function: FunctionId, found: f64 },
    #[error("grid for function '{function}' ends at {found:.2} instead of 5")]
    DoesNotReachFive { function: FunctionId, found: f64 },
    #[error("grid for function '{function}' has a gap before score {at:.2}")]
    Gap { function: FunctionId, at: f64 },
    #[error("grid for function '{function}' has overlapping ranges around score {at:.2}")]
    Overlap { function: FunctionId, at: f64 },
}

impl InterpretationGrid {
    pub fn new(rows: Vec<GridRow>) -> Self {
        Self { rows }
    }

    /// Grid aligned with the standard questionnaire: five ranges per
    /// function matching the product's fixed maturity bands.
    pub fn standard() -> Self {
        let mut rows = Vec::new();
        rows.extend(standard_rows_for(
            "cyber",
            [
                "La sécurité repose sur des initiatives individuelles non coordonnées.",
                "Des pratiques de sécurité existent mais restent hétérogènes selon les équipes.",
                "Les pratiques de sécurité sont mesurées et pilotées par des indicateurs.",
                "La sécurité est gérée en continu et intégrée aux décisions métier.",
                "La sécurité est optimisée par des boucles d'amélioration systématiques.",
            ],
            [
                "Formaliser une politique de sécurité et nommer un responsable identifié.",
                "Harmoniser les pratiques entre équipes et déployer un socle commun.",
                "Étendre la couverture des indicateurs aux actifs critiques restants.",
                "Automatiser les contrôles récurrents et tester les plans de crise.",
                "Partager les retours d'expérience et challenger le dispositif par des exercices.",
            ],
        ));
        rows.extend(standard_rows_for(
            "devsecops",
            [
                "Les livraisons sont manuelles et la sécurité intervient en fin de cycle.",
                "Des chaînes d'intégration existent mais les contrôles restent optionnels.",
                "Les contrôles de sécurité bloquants sont mesurés sur les dépôts principaux.",
                "Le cycle de livraison intègre la sécurité de bout en bout.",
                "La chaîne de livraison s'améliore en continu via les retours de production.",
            ],
            [
                "Mettre en place une chaîne d'intégration continue sur les dépôts actifs.",
                "Rendre bloquants les contrôles de dépendances et d'analyse statique.",
                "Généraliser les contrôles bloquants à l'ensemble des dépôts.",
                "Raccourcir les boucles de retour entre production et développement.",
                "Mesurer la dérive des pratiques et entretenir l'outillage partagé.",
            ],
        ));
        Self::new(rows)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Rows configured for one function, in display order.
    pub fn rows_for(&self, function: &FunctionId) -> Vec<&GridRow> {
        let mut rows: Vec<&GridRow> = self
            .rows
            .iter()
            .filter(|row| &row.function == function)
            .collect();
        rows.sort_by_key(|row| row.display_order);
        rows
    }

    /// First row (in display order) whose range contains the score.
    ///
    /// Scores outside every configured range, and functions with no rows at
    /// all, both surface as `NoMatchingRange`; callers translate this into
    /// an empty result rather than a failure.
    pub fn resolve(&self, function: &FunctionId, score: f64) -> Result<&GridRow, GridError> {
        self.rows_for(function)
            .into_iter()
            .find(|row| row.contains(score))
            .ok_or_else(|| GridError::NoMatchingRange {
                function: function.clone(),
                score,
            })
    }

    /// Enforce the tiling invariant for every function present in the grid.
    pub fn validate(&self) -> Result<(), GridError> {
        let mut functions: Vec<&FunctionId> = self.rows.iter().map(|row| &row.function).collect();
        functions.sort();
        functions.dedup();

        for function in functions {
            let rows = self.rows_for(function);

            for row in &rows {
                if row.score_min > row.score_max {
                    return Err(GridError::InvertedRange {
                        function: function.clone(),
                        position: row.display_order,
                    });
                }
            }

            let first = rows.first().expect("function derived from its own rows");
            if first.score_min.abs() > BOUND_TOLERANCE {
                return Err(GridError::DoesNotStartAtZero {
                    function: function.clone(),
                    found: first.score_min,
                });
            }

            for pair in rows.windows(2) {
                let gap = pair[1].score_min - pair[0].score_max;
                if gap > BOUND_TOLERANCE {
                    return Err(GridError::Gap {
                        function: function.clone(),
                        at: pair[1].score_min,
                    });
                }
                if gap < -BOUND_TOLERANCE {
                    return Err(GridError::Overlap {
                        function: function.clone(),
                        at: pair[1].score_min,
                    });
                }
            }

            let last = rows.last().expect("function derived from its own rows");
            if (last.score_max - 5.0).abs() > BOUND_TOLERANCE {
                return Err(GridError::DoesNotReachFive {
                    function: function.clone(),
                    found: last.score_max,
                });
            }
        }

        Ok(())
    }
}

const STANDARD_BANDS: [(f64, f64, &str); 5] = [
    (0.0, 1.5, "Initial"),
    (1.5, 2.5, "Défini"),
    (2.5, 3.5, "Mesuré"),
    (3.5, 4.5, "Géré"),
    (4.5, 5.0, "Optimisé"),
];

fn standard_rows_for(
    function: &str,
    descriptions: [&str; 5],
    recommendations: [&str; 5],
) -> Vec<GridRow> {
    STANDARD_BANDS
        .iter()
        .zip(descriptions.iter().zip(recommendations.iter()))
        .enumerate()
        .map(
            |(index, ((score_min, score_max, label), (description, recommendation)))| GridRow {
                function: FunctionId(function.to_string()),
                score_min: *score_min,
                score_max: *score_max,
                level_label: (*label).to_string(),
                description: (*description).to_string(),
                recommendation: (*recommendation).to_string(),
                display_order: index as u16 + 1,
            },
        )
        .collect()
}
