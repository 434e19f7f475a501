//! Tiered tree layout.
//!
//! ```text
//!                 [ feature ]
//!        ┌────────────┼────────────┐
//!   [scenario]   [scenario]   [scenario]
//!        │            │            │
//!     [step]       [step]       [step]
//!        │            │
//!     [step]       [step]
//! ```
//!
//! The feature sits at a fixed height centered on the page, scenarios are
//! spread evenly around it on one row, and each scenario's steps hang below
//! it in a single column. Box sizes are fixed per tier. Long scenarios run
//! past the bottom of the page; there is no wrapping.

use crate::config::LayoutConfig;
use crate::models::*;

pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Position every node of `feature`, in tree order.
    pub fn layout(&self, feature: &Feature) -> Vec<LayoutNode> {
        let c = &self.config;
        let mut ids = IdAllocator::new();
        let mut nodes = Vec::with_capacity(feature.node_count());

        let root_x = c.page_width / 2.0;
        let root = LayoutNode {
            id: ids.next_id(),
            parent: None,
            source: NodeSource::Feature,
            tier: Tier::Feature,
            center: Point::new(root_x, c.feature_y),
            size: Size::new(c.feature_width, c.feature_height),
            style: StyleClass::Feature,
        };
        let root_id = root.id;
        nodes.push(root);

        // Neighbouring scenarios may touch but never overlap.
        let gap = c.scenario_gap.max(c.scenario_width);
        let scenario_y = c.feature_y - c.scenario_drop;
        let count = feature.scenarios.len();
        let start_x = root_x - (count.saturating_sub(1) as f64 * gap) / 2.0;

        for (si, scenario) in feature.scenarios.iter().enumerate() {
            let scenario_x = start_x + si as f64 * gap;
            let scenario_id = ids.next_id();
            nodes.push(LayoutNode {
                id: scenario_id,
                parent: Some(root_id),
                source: NodeSource::Scenario { scenario: si },
                tier: Tier::Scenario,
                center: Point::new(scenario_x, scenario_y),
                size: Size::new(c.scenario_width, c.scenario_height),
                style: StyleClass::Scenario,
            });

            let mut previous = scenario_id;
            let mut step_y = scenario_y - c.first_step_drop;
            for (ti, step) in scenario.steps.iter().enumerate() {
                let step_id = ids.next_id();
                nodes.push(LayoutNode {
                    id: step_id,
                    parent: Some(previous),
                    source: NodeSource::Step {
                        scenario: si,
                        step: ti,
                    },
                    tier: Tier::Step,
                    center: Point::new(scenario_x, step_y),
                    size: Size::new(c.step_width, c.step_height),
                    style: StyleClass::for_step(step.kind),
                });
                previous = step_id;
                step_y -= c.step_gap;
            }
        }

        tracing::debug!(
            nodes = nodes.len(),
            scenarios = count,
            "Laid out feature tree"
        );
        nodes
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const SAMPLE: &str = "Feature: F\n\
        Scenario: A\nGiven a1\nWhen a2\nThen a3\n\
        Scenario: B\nGiven b1\n\
        Scenario: C\n";

    #[test]
    fn test_feature_is_centered_on_page() {
        let nodes = LayoutEngine::default().layout(&parse("Feature: Lonely"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].center, Point::new(8.27 / 2.0, 10.0));
        assert_eq!(nodes[0].tier, Tier::Feature);
        assert!(nodes[0].parent.is_none());
    }

    #[test]
    fn test_ids_follow_tree_order() {
        let nodes = LayoutEngine::default().layout(&parse(SAMPLE));
        let ids: Vec<u32> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(nodes[1].source, NodeSource::Scenario { scenario: 0 });
        assert_eq!(
            nodes[3].source,
            NodeSource::Step {
                scenario: 0,
                step: 1
            }
        );
    }

    #[test]
    fn test_scenarios_are_spread_around_feature() {
        let nodes = LayoutEngine::default().layout(&parse(SAMPLE));
        let xs: Vec<f64> = nodes
            .iter()
            .filter(|n| n.tier == Tier::Scenario)
            .map(|n| n.center.x)
            .collect();
        assert_eq!(xs.len(), 3);
        let root_x = nodes[0].center.x;
        assert!((xs[1] - root_x).abs() < 1e-9);
        assert!((xs[1] - xs[0] - 3.0).abs() < 1e-9);
        assert!((xs[2] - xs[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenarios_never_overlap_even_with_tight_gap() {
        let config = LayoutConfig {
            scenario_gap: 0.5,
            ..LayoutConfig::default()
        };
        let nodes = LayoutEngine::new(config).layout(&parse(SAMPLE));
        let scenarios: Vec<&LayoutNode> =
            nodes.iter().filter(|n| n.tier == Tier::Scenario).collect();
        for pair in scenarios.windows(2) {
            assert!(pair[0].right() <= pair[1].left() + 1e-9);
        }
    }

    #[test]
    fn test_steps_chain_down_a_column() {
        let nodes = LayoutEngine::default().layout(&parse(SAMPLE));
        let scenario = &nodes[1];
        let steps = &nodes[2..5];
        assert_eq!(steps[0].parent, Some(scenario.id));
        assert_eq!(steps[1].parent, Some(steps[0].id));
        assert_eq!(steps[2].parent, Some(steps[1].id));
        for step in steps {
            assert_eq!(step.center.x, scenario.center.x);
        }
        assert!((scenario.center.y - steps[0].center.y - 1.2).abs() < 1e-9);
        assert!((steps[0].center.y - steps[1].center.y - 0.8).abs() < 1e-9);
        assert_eq!(steps[0].style, StyleClass::Given);
        assert_eq!(steps[1].style, StyleClass::When);
        assert_eq!(steps[2].style, StyleClass::Then);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let feature = parse(SAMPLE);
        let engine = LayoutEngine::default();
        assert_eq!(engine.layout(&feature), engine.layout(&feature));
    }
}
