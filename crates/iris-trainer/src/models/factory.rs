use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::DecisionTreeClassifier;
use crate::models::random_forest::RandomForestClassifier;

/// Build an untrained, boxed classifier from a `ModelConfig`.
pub fn build_model(params: &ModelConfig) -> Box<dyn ClassifierModel + Send> {
    match &params.model_type {
        ModelType::RandomForest { .. } => Box::new(
            RandomForestClassifier::from_model_type(&params.model_type).unwrap_or_default(),
        ),
        ModelType::DecisionTree { .. } => Box::new(
            DecisionTreeClassifier::from_model_type(&params.model_type).unwrap_or_default(),
        ),
    }
}
