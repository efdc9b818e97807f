//! Classifiers the detection service is known to offer.
//!
//! Informational only: requests are never checked against this list.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "model1",
        name: "Random Forest Model",
    },
    ModelInfo {
        id: "model2",
        name: "Logistic Regression Model",
    },
    ModelInfo {
        id: "model3",
        name: "Support Vector Machine Model",
    },
    ModelInfo {
        id: "model4",
        name: "Naive Bayes Model",
    },
];

pub const DEFAULT_MODEL: &str = "model1";

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}
