pub mod cart;
pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod random_forest;

pub use classifier_trait::{ClassifierModel, ModelArtifact};
pub use decision_tree::DecisionTreeClassifier;
pub use random_forest::RandomForestClassifier;
