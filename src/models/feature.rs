use serde::{Deserialize, Serialize};

/// Name used when a feature file carries no usable feature title.
pub const DEFAULT_FEATURE_NAME: &str = "Feature";

/// A parsed feature file: the root of the diagram hierarchy.
///
/// Built once by [`crate::parser::parse`] and never mutated afterwards. Every
/// downstream stage (layout, geometry, tree preview) reads the same tree, so
/// step kinds are decided exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Total number of steps across all scenarios.
    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }

    /// Number of diagram nodes this feature produces: the feature itself,
    /// one per scenario and one per step.
    pub fn node_count(&self) -> usize {
        1 + self.scenarios.len() + self.step_count()
    }
}

impl Default for Feature {
    fn default() -> Self {
        Self {
            name: DEFAULT_FEATURE_NAME.to_string(),
            scenarios: Vec::new(),
        }
    }
}

/// A named scenario and its ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

/// One step line, kept verbatim (trimmed) together with its keyword kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    pub kind: StepKind,
}

impl Step {
    /// The step text without its leading keyword.
    pub fn body(&self) -> &str {
        crate::parser::strip_step_keyword(&self.text).unwrap_or(&self.text)
    }
}

/// The keyword class a step line started with.
///
/// `But` lines are folded into `And`: both continue the previous step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Given,
    When,
    Then,
    And,
}
