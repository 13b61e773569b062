//! Dependency graph over the custom fields of one template.
//!
//! Built fresh for every resolution and never stored. Ordering uses Kahn's
//! algorithm; cycle membership is checked separately with a three-colour
//! depth-first search so the two concerns can be tested on their own.

use std::collections::{HashMap, HashSet, VecDeque};

use super::dependency_extractor::extract_dependencies;
use crate::modules::formulas::models::FieldDefinition;

/// Result of ordering the formula fields of a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOrder {
    /// Formula fields, each after every formula field it depends on
    pub order: Vec<String>,
    /// Fields lying on a dependency cycle
    pub cyclic: Vec<String>,
    /// Fields not on a cycle but depending on one
    pub blocked: Vec<String>,
}

impl EvaluationOrder {
    pub fn position(&self, field_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == field_id)
    }

    pub fn has_cycles(&self) -> bool {
        !self.cyclic.is_empty()
    }

    /// Fields left out of the order
    pub fn unresolved(&self) -> impl Iterator<Item = &String> {
        self.cyclic.iter().chain(self.blocked.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// Field id → ids its formula references
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Field ids in definition order
    nodes: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
    formula_fields: HashSet<String>,
}

impl DependencyGraph {
    /// Build the graph for a template's field definitions.
    ///
    /// Dependencies are restricted to ids defined in `fields`. A repeated id
    /// keeps its first definition.
    pub fn build(fields: &[FieldDefinition]) -> Self {
        let mut graph = DependencyGraph::default();
        let known_ids: Vec<&str> = fields.iter().map(|field| field.id.as_str()).collect();

        for field in fields {
            if graph.dependencies.contains_key(&field.id) {
                tracing::warn!(field_id = %field.id, "Duplicate field definition ignored");
                continue;
            }

            let dependencies = match field.formula() {
                Some(formula) => {
                    graph.formula_fields.insert(field.id.clone());
                    extract_dependencies(formula, known_ids.iter().copied())
                }
                None => Vec::new(),
            };

            graph.nodes.push(field.id.clone());
            graph.dependencies.insert(field.id.clone(), dependencies);
        }

        graph
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.dependencies.contains_key(field_id)
    }

    pub fn has_formula(&self, field_id: &str) -> bool {
        self.formula_fields.contains(field_id)
    }

    /// Direct dependencies of a field, empty if it has no formula
    pub fn dependencies_of(&self, field_id: &str) -> &[String] {
        self.dependencies
            .get(field_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Formula-bearing field ids in definition order
    pub fn formula_field_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|id| self.formula_fields.contains(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Order every formula field of the template
    pub fn evaluation_order(&self) -> EvaluationOrder {
        let roots = self.formula_field_ids();
        self.topological_order(&roots)
    }

    /// Order the formula fields reachable from `roots`.
    ///
    /// Non-formula fields are leaves: they are always available and never
    /// appear in the order. Ties go to the field defined first.
    pub fn topological_order(&self, roots: &[&str]) -> EvaluationOrder {
        let scope = self.formula_closure(roots);
        let scoped: Vec<&str> = self
            .nodes
            .iter()
            .map(String::as_str)
            .filter(|id| scope.contains(id))
            .collect();

        let mut pending: HashMap<&str, usize> = HashMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for &field_id in &scoped {
            let mut count = 0;
            for dependency in self.dependencies_of(field_id) {
                if scope.contains(dependency.as_str()) {
                    count += 1;
                    dependents
                        .entry(dependency.as_str())
                        .or_default()
                        .push(field_id);
                }
            }
            pending.insert(field_id, count);
        }

        let mut ready: VecDeque<&str> = scoped
            .iter()
            .copied()
            .filter(|id| pending.get(id) == Some(&0))
            .collect();
        let mut order = Vec::with_capacity(scoped.len());

        while let Some(field_id) = ready.pop_front() {
            order.push(field_id.to_string());

            for &dependent in dependents.get(field_id).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(dependent);
                    }
                }
            }
        }

        let placed: HashSet<&str> = order.iter().map(String::as_str).collect();
        let mut cyclic = Vec::new();
        let mut blocked = Vec::new();

        for &field_id in scoped.iter().filter(|id| !placed.contains(*id)) {
            match self.cycle_through(field_id) {
                Some(path) => {
                    tracing::warn!(
                        field_id = %field_id,
                        cycle = %path.join(" -> "),
                        "Cyclic formula dependency detected"
                    );
                    cyclic.push(field_id.to_string());
                }
                None => {
                    tracing::debug!(field_id = %field_id, "Formula field blocked by a cycle");
                    blocked.push(field_id.to_string());
                }
            }
        }

        EvaluationOrder {
            order,
            cyclic,
            blocked,
        }
    }

    /// Whether `field_id` can reach itself through its dependencies
    pub fn is_cyclic(&self, field_id: &str) -> bool {
        self.cycle_through(field_id).is_some()
    }

    /// A dependency path leading from `start` back to itself, if one exists.
    ///
    /// Depth-first search rooted at `start`: `start` stays grey for the whole
    /// walk, so reaching a grey `start` again closes a cycle through it.
    pub fn cycle_through(&self, start: &str) -> Option<Vec<String>> {
        if !self.contains(start) {
            return None;
        }

        let mut colours: HashMap<&str, Colour> = HashMap::new();
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        colours.insert(start, Colour::Grey);

        while let Some((node, next)) = stack.last_mut() {
            let dependencies = self.dependencies_of(node);

            if *next >= dependencies.len() {
                colours.insert(*node, Colour::Black);
                stack.pop();
                continue;
            }

            let dependency = dependencies[*next].as_str();
            *next += 1;

            if dependency == start {
                let mut path: Vec<String> = stack.iter().map(|(id, _)| id.to_string()).collect();
                path.push(start.to_string());
                return Some(path);
            }

            match colours.get(dependency).copied().unwrap_or(Colour::White) {
                Colour::White => {
                    colours.insert(dependency, Colour::Grey);
                    stack.push((dependency, 0));
                }
                // A grey node other than `start` is a cycle that does not pass
                // through `start`; black nodes are fully explored.
                Colour::Grey | Colour::Black => {}
            }
        }

        None
    }

    /// Formula fields reachable from `roots` through formula fields
    fn formula_closure<'a>(&'a self, roots: &[&str]) -> HashSet<&'a str> {
        let mut scope: HashSet<&'a str> = HashSet::new();
        let mut frontier: Vec<&'a str> = roots
            .iter()
            .filter_map(|root| self.nodes.iter().find(|id| id.as_str() == *root))
            .map(String::as_str)
            .collect();

        while let Some(field_id) = frontier.pop() {
            if !self.formula_fields.contains(field_id) || !scope.insert(field_id) {
                continue;
            }
            frontier.extend(self.dependencies_of(field_id).iter().map(String::as_str));
        }

        scope
    }
}
