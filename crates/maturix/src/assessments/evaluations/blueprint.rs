use std::collections::BTreeSet;

use super::domain::{FunctionId, MaturityFunction, Question, QuestionId, Theme, ThemeId};

/// Catalog of functions, themes, and weighted questions answered by an
/// evaluation. The catalog is fixed for the lifetime of an evaluation:
/// questions are never edited once answers exist against them.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireBlueprint {
    functions: Vec<MaturityFunction>,
    themes: Vec<Theme>,
    questions: Vec<Question>,
}

/// Validation errors raised when a blueprint is loaded.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    #[error("blueprint must contain at least one function, theme, and question")]
    EmptyCatalog,
    #[error("duplicate function id '{0}'")]
    DuplicateFunction(FunctionId),
    #[error("duplicate theme id '{0:?}'")]
    DuplicateTheme(ThemeId),
    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(QuestionId),
    #[error("theme '{theme:?}' references unknown function '{function}'")]
    UnknownFunction { theme: ThemeId, function: FunctionId },
    #[error("question '{question}' references unknown theme '{theme:?}'")]
    UnknownTheme { question: QuestionId, theme: ThemeId },
    #[error("question '{question}' has non-positive weight {weight}")]
    NonPositiveWeight { question: QuestionId, weight: f64 },
}

impl QuestionnaireBlueprint {
    pub fn new(
        functions: Vec<MaturityFunction>,
        themes: Vec<Theme>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            functions,
            themes,
            questions,
        }
    }

    /// Built-in digital maturity questionnaire covering cybersecurity and
    /// DevSecOps practices.
    pub fn standard() -> Self {
        let functions = vec![
            function("cyber", "Cybersécurité", 1),
            function("devsecops", "DevSecOps", 2),
        ];

        let themes = vec![
            theme("cyber-gouv", "cyber", "Gouvernance et organisation", 1),
            theme("cyber-prot", "cyber", "Protection des actifs", 2),
            theme("cyber-det", "cyber", "Détection des incidents", 3),
            theme("cyber-resil", "cyber", "Résilience et continuité", 4),
            theme("devsecops-culture", "devsecops", "Culture et collaboration", 1),
            theme("devsecops-auto", "devsecops", "Automatisation des pipelines", 2),
            theme("devsecops-sup", "devsecops", "Supervision et boucles de retour", 3),
        ];

        let questions = vec![
            question(
                "q-gouv-politique",
                "cyber-gouv",
                "Une politique de sécurité est formalisée et revue annuellement.",
                3.0,
                1,
            ),
            question(
                "q-gouv-roles",
                "cyber-gouv",
                "Les rôles et responsabilités sécurité sont attribués et connus.",
                2.0,
                2,
            ),
            question(
                "q-gouv-sensib",
                "cyber-gouv",
                "Les collaborateurs suivent un programme de sensibilisation régulier.",
                1.0,
                3,
            ),
            question(
                "q-prot-acces",
                "cyber-prot",
                "Les accès aux systèmes critiques suivent le principe du moindre privilège.",
                3.0,
                1,
            ),
            question(
                "q-prot-chiffrement",
                "cyber-prot",
                "Les données sensibles sont chiffrées au repos et en transit.",
                2.0,
                2,
            ),
            question(
                "q-prot-correctifs",
                "cyber-prot",
                "Les correctifs de sécurité sont appliqués selon un calendrier suivi.",
                2.0,
                3,
            ),
            question(
                "q-det-journaux",
                "cyber-det",
                "Les journaux des systèmes critiques sont centralisés et exploités.",
                2.0,
                1,
            ),
            question(
                "q-det-alertes",
                "cyber-det",
                "Des alertes qualifiées couvrent les scénarios d'attaque majeurs.",
                3.0,
                2,
            ),
            question(
                "q-resil-sauvegardes",
                "cyber-resil",
                "Les sauvegardes sont testées par des restaurations régulières.",
                3.0,
                1,
            ),
            question(
                "q-resil-crise",
                "cyber-resil",
                "Un plan de réponse à incident est exercé au moins une fois par an.",
                2.0,
                2,
            ),
            question(
                "q-culture-objectifs",
                "devsecops-culture",
                "Sécurité et développement partagent des objectifs communs.",
                2.0,
                1,
            ),
            question(
                "q-culture-relais",
                "devsecops-culture",
                "Des relais sécurité sont identifiés dans chaque équipe produit.",
                1.0,
                2,
            ),
            question(
                "q-auto-ci",
                "devsecops-auto",
                "Chaque dépôt passe par une chaîne d'intégration continue bloquante.",
                3.0,
                1,
            ),
            question(
                "q-auto-analyses",
                "devsecops-auto",
                "Des analyses de dépendances et de code sont intégrées aux pipelines.",
                2.0,
                2,
            ),
            question(
                "q-sup-metriques",
                "devsecops-sup",
                "Des métriques de livraison et d'incidents sont suivies en continu.",
                2.0,
                1,
            ),
            question(
                "q-sup-retour",
                "devsecops-sup",
                "Les incidents de production alimentent un processus d'amélioration.",
                2.0,
                2,
            ),
        ];

        Self::new(functions, themes, questions)
    }

    /// Check referential integrity and weight positivity before the catalog
    /// is handed to the scoring pipeline.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        if self.functions.is_empty() || self.themes.is_empty() || self.questions.is_empty() {
            return Err(BlueprintError::EmptyCatalog);
        }

        let mut function_ids = BTreeSet::new();
        for function in &self.functions {
            if !function_ids.insert(&function.id) {
                return Err(BlueprintError::DuplicateFunction(function.id.clone()));
            }
        }

        let mut theme_ids = BTreeSet::new();
        for theme in &self.themes {
            if !theme_ids.insert(&theme.id) {
                return Err(BlueprintError::DuplicateTheme(theme.id.clone()));
            }
            if !function_ids.contains(&theme.function) {
                return Err(BlueprintError::UnknownFunction {
                    theme: theme.id.clone(),
                    function: theme.function.clone(),
                });
            }
        }

        let mut question_ids = BTreeSet::new();
        for question in &self.questions {
            if !question_ids.insert(&question.id) {
                return Err(BlueprintError::DuplicateQuestion(question.id.clone()));
            }
            if !theme_ids.contains(&question.theme) {
                return Err(BlueprintError::UnknownTheme {
                    question: question.id.clone(),
                    theme: question.theme.clone(),
                });
            }
            if !(question.weight.is_finite() && question.weight > 0.0) {
                return Err(BlueprintError::NonPositiveWeight {
                    question: question.id.clone(),
                    weight: question.weight,
                });
            }
        }

        Ok(())
    }

    pub fn functions(&self) -> impl Iterator<Item = &MaturityFunction> {
        self.functions.iter()
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn themes_for_function(&self, function: &FunctionId) -> Vec<&Theme> {
        let mut themes: Vec<&Theme> = self
            .themes
            .iter()
            .filter(|theme| &theme.function == function)
            .collect();
        themes.sort_by_key(|theme| theme.display_order);
        themes
    }

    pub fn questions_for_theme(&self, theme: &ThemeId) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self
            .questions
            .iter()
            .filter(|question| &question.theme == theme)
            .collect();
        questions.sort_by_key(|question| question.display_order);
        questions
    }

    pub fn ordered_functions(&self) -> Vec<&MaturityFunction> {
        let mut functions: Vec<&MaturityFunction> = self.functions.iter().collect();
        functions.sort_by_key(|function| function.display_order);
        functions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|question| &question.id)
    }
}

fn function(id: &str, name: &str, display_order: u16) -> MaturityFunction {
    MaturityFunction {
        id: FunctionId(id.to_string()),
        name: name.to_string(),
        display_order,
    }
}

fn theme(id: &str, function: &str, name: &str, display_order: u16) -> Theme {
    Theme {
        id: ThemeId(id.to_string()),
        function: FunctionId(function.to_string()),
        name: name.to_string(),
        display_order,
    }
}

fn question(id: &str, theme: &str, statement: &str, weight: f64, display_order: u16) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        theme: ThemeId(theme.to_string()),
        statement: statement.to_string(),
        weight,
        display_order,
    }
}
