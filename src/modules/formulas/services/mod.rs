pub mod dependency_extractor;
pub mod dependency_graph;
pub mod expression;
pub mod formula_resolver;

pub use dependency_extractor::{extract_dependencies, find_references, FieldReference};
pub use dependency_graph::{DependencyGraph, EvaluationOrder};
pub use expression::ExpressionEvaluator;
pub use formula_resolver::{resolve_formula_fields, FormulaResolver};
