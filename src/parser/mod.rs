//! Line-oriented parser for Gherkin feature files.
//!
//! The grammar is forgiving: every line is classified as a `Feature:`,
//! `Scenario:` or `Background:` marker or a step, and anything unrecognised
//! (including description text that merely starts with a keyword) is
//! skipped. Parsing never fails.

mod keywords;

use crate::models::{Feature, Scenario, Step, DEFAULT_FEATURE_NAME};

pub use keywords::COLONS;

/// Parse feature file text into a feature tree.
pub fn parse(text: &str) -> Feature {
    let mut parser = FeatureParser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Text of a step line after its keyword, if the line starts with one.
pub fn strip_step_keyword(text: &str) -> Option<&str> {
    keywords::match_step(text.trim()).map(|(_, rest)| rest.trim_start_matches(COLONS).trim())
}

#[derive(Default)]
struct FeatureParser {
    name: Option<String>,
    scenarios: Vec<Scenario>,
    /// Scenario receiving steps. Unnamed until a scenario marker is seen, and
    /// unnamed scenarios are dropped when flushed.
    current: Scenario,
}

impl FeatureParser {
    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
            return;
        }

        if let Some(name) = keywords::match_marker(line, keywords::FEATURE) {
            // A bare marker keeps any name already read.
            if !name.is_empty() {
                self.name = Some(name.to_string());
            }
        } else if let Some(name) = keywords::match_marker(line, keywords::SCENARIO) {
            self.open(name.to_string());
        } else if keywords::match_marker(line, keywords::BACKGROUND).is_some() {
            // Background steps are shared setup, not part of any scenario.
            self.open(String::new());
        } else if let Some((kind, _)) = keywords::match_step(line) {
            self.current.steps.push(Step {
                text: line.to_string(),
                kind,
            });
        } else {
            tracing::trace!(line, "Ignoring unrecognised line");
        }
    }

    fn open(&mut self, name: String) {
        let previous = std::mem::replace(
            &mut self.current,
            Scenario {
                name,
                steps: Vec::new(),
            },
        );
        self.flush(previous);
    }

    fn flush(&mut self, scenario: Scenario) {
        if scenario.name.is_empty() {
            if !scenario.steps.is_empty() {
                tracing::trace!(
                    steps = scenario.steps.len(),
                    "Dropping steps outside of a named scenario"
                );
            }
            return;
        }
        self.scenarios.push(scenario);
    }

    fn finish(mut self) -> Feature {
        let last = std::mem::take(&mut self.current);
        self.flush(last);
        Feature {
            name: self
                .name
                .unwrap_or_else(|| DEFAULT_FEATURE_NAME.to_string()),
            scenarios: self.scenarios,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepKind;

    #[test]
    fn test_basic_feature() {
        let feature = parse("Feature: X\nScenario: Y\nGiven a\nWhen b\nThen c\n");
        assert_eq!(feature.name, "X");
        assert_eq!(feature.scenarios.len(), 1);
        let steps = &feature.scenarios[0].steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].text, "Given a");
        assert_eq!(steps[0].kind, StepKind::Given);
        assert_eq!(steps[2].kind, StepKind::Then);
    }

    #[test]
    fn test_feature_without_colon_uses_placeholder() {
        assert_eq!(parse("Feature").name, DEFAULT_FEATURE_NAME);
        assert_eq!(parse("Feature:   ").name, DEFAULT_FEATURE_NAME);
        assert_eq!(parse("Scenario: only").name, DEFAULT_FEATURE_NAME);
    }

    #[test]
    fn test_full_width_colon() {
        let feature = parse("機能：商品管理\nシナリオ：登録\n前提 ログイン済み");
        assert_eq!(feature.name, "商品管理");
        assert_eq!(feature.scenarios[0].name, "登録");
        assert_eq!(feature.scenarios[0].steps[0].kind, StepKind::Given);
    }

    #[test]
    fn test_keyword_without_colon_is_description() {
        let feature = parse("Feature: F\nScenario: Pay\nGiven a\nScenario happy path\nWhen b");
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].steps.len(), 2);
    }

    #[test]
    fn test_bare_feature_marker_keeps_earlier_name() {
        assert_eq!(parse("Feature: Checkout\nFeature:").name, "Checkout");
        assert_eq!(parse("Feature:\nFeature: Checkout").name, "Checkout");
    }

    #[test]
    fn test_empty_scenario_name_is_dropped() {
        let feature = parse("Feature: F\nScenario:\nGiven lost\nScenario: Kept\nGiven kept");
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].name, "Kept");
        assert_eq!(feature.scenarios[0].steps.len(), 1);
    }

    #[test]
    fn test_background_steps_do_not_leak() {
        let text = "Feature: F\nScenario: A\nGiven a\nBackground:\nGiven shared\nScenario: B\nWhen b";
        let feature = parse(text);
        assert_eq!(feature.scenarios.len(), 2);
        assert_eq!(feature.scenarios[0].steps.len(), 1);
        assert_eq!(feature.scenarios[1].steps[0].text, "When b");
    }

    #[test]
    fn test_crlf_input() {
        let feature = parse("Feature: F\r\nScenario: S\r\nGiven a\r\n");
        assert_eq!(feature.scenarios[0].steps[0].text, "Given a");
    }

    #[test]
    fn test_strip_step_keyword() {
        assert_eq!(strip_step_keyword("Given a user"), Some("a user"));
        assert_eq!(strip_step_keyword("もし 保存する"), Some("保存する"));
        assert_eq!(strip_step_keyword("Scenario: x"), None);
    }
}
