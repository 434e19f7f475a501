//! ASCII tree rendering for parsed feature files.

use crate::models::{Feature, StepKind};

const GIVEN: char = '◇';
const WHEN: char = '○';
const THEN: char = '●';
const AND: char = '+';

/// Get the symbol for a step kind.
fn kind_symbol(kind: StepKind) -> char {
    match kind {
        StepKind::Given => GIVEN,
        StepKind::When => WHEN,
        StepKind::Then => THEN,
        StepKind::And => AND,
    }
}

/// Render a feature as ASCII art with step symbols.
///
/// Example output:
/// ```text
/// Checkout
/// ├── Pay by card
/// │   ├── ◇ a cart with one item
/// │   ├── ○ the user pays by card
/// │   └── ● the order is confirmed
/// └── Empty cart
/// ```
pub fn render_feature(feature: &Feature) -> String {
    let mut output = String::new();
    output.push_str(&feature.name);
    output.push('\n');

    for (i, scenario) in feature.scenarios.iter().enumerate() {
        let is_last = i == feature.scenarios.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(branch);
        output.push_str(&scenario.name);
        output.push('\n');

        // Calculate prefix for steps
        let prefix = if is_last { "    " } else { "│   " };
        for (j, step) in scenario.steps.iter().enumerate() {
            let step_branch = if j == scenario.steps.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            output.push_str(prefix);
            output.push_str(step_branch);
            output.push(kind_symbol(step.kind));
            output.push(' ');
            output.push_str(step.body());
            output.push('\n');
        }
    }
    output
}
