use featuremap::models::*;
use featuremap::parser::parse;
use speculate2::speculate;

const CHECKOUT: &str = "\
@smoke
# Shopping cart checkout
Feature: Checkout

  Scenario: Pay by card
    Given a cart with one item
    When the user pays by card
    Then the order is confirmed
    And a receipt is sent

  Scenario: Empty cart
    Given an empty cart
    When the user opens checkout
    Then checkout is disabled
";

const JAPANESE: &str = "\
機能: 商品管理
  シナリオ: 商品を登録する
    前提 ログインしている
    もし 商品を登録する
    ならば 一覧に表示される
    かつ 件数が増える
";

speculate! {
    describe "feature markers" {
        it "reads the name after the colon" {
            assert_eq!(parse(CHECKOUT).name, "Checkout");
        }

        it "falls back to a placeholder without a feature line" {
            let feature = parse("Scenario: Lonely\nGiven a");
            assert_eq!(feature.name, DEFAULT_FEATURE_NAME);
            assert_eq!(feature.scenarios.len(), 1);
        }

        it "keeps the last feature line when there are several" {
            assert_eq!(parse("Feature: One\nFeature: Two").name, "Two");
        }

        it "ignores description lines that start with the keyword" {
            let feature = parse("Feature: Checkout\n  Feature flags control the new flow\nScenario: S\nGiven a");
            assert_eq!(feature.name, "Checkout");
        }

        it "ignores japanese description lines that start with the keyword" {
            let feature = parse("機能: 商品管理\n  機能一覧を表示する画面です\nシナリオ: 登録\n前提 ログイン済み");
            assert_eq!(feature.name, "商品管理");
        }
    }

    describe "scenarios" {
        it "keeps insertion order" {
            let feature = parse(CHECKOUT);
            let names: Vec<&str> = feature.scenarios.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Pay by card", "Empty cart"]);
        }

        it "attaches steps to the most recent scenario" {
            let feature = parse(CHECKOUT);
            assert_eq!(feature.scenarios[0].steps.len(), 4);
            assert_eq!(feature.scenarios[1].steps.len(), 3);
            assert_eq!(feature.scenarios[1].steps[0].text, "Given an empty cart");
        }

        it "drops steps that appear before any scenario" {
            let feature = parse("Feature: F\nGiven orphan\nScenario: S\nWhen b");
            assert_eq!(feature.scenarios.len(), 1);
            assert_eq!(feature.scenarios[0].steps.len(), 1);
            assert_eq!(feature.scenarios[0].steps[0].text, "When b");
        }

        it "does not open a scenario for description text" {
            let feature = parse("Feature: F\nScenario: Pay\nGiven a\n  Scenario coverage is partial here\nWhen b");
            let shape: Vec<(&str, usize)> = feature
                .scenarios
                .iter()
                .map(|s| (s.name.as_str(), s.steps.len()))
                .collect();
            assert_eq!(shape, vec![("Pay", 2)]);
        }

        it "treats scenario outlines as scenarios" {
            let feature = parse("Feature: F\nScenario Outline: Many\nGiven <x>\nExamples:\n| x |\n| 1 |");
            assert_eq!(feature.scenarios[0].name, "Many");
            assert_eq!(feature.scenarios[0].steps.len(), 1);
        }
    }

    describe "steps" {
        it "tags each step with its keyword kind" {
            let kinds: Vec<StepKind> = parse(CHECKOUT).scenarios[0]
                .steps
                .iter()
                .map(|s| s.kind)
                .collect();
            assert_eq!(kinds, vec![StepKind::Given, StepKind::When, StepKind::Then, StepKind::And]);
        }

        it "keeps the step line verbatim" {
            let step = &parse(CHECKOUT).scenarios[0].steps[1];
            assert_eq!(step.text, "When the user pays by card");
            assert_eq!(step.body(), "the user pays by card");
        }

        it "skips an unrecognised line between two steps" {
            let feature = parse("Feature: F\nScenario: S\nGiven a\nthis is just prose\nWhen b");
            let steps = &feature.scenarios[0].steps;
            assert_eq!(steps.len(), 2);
            assert_eq!(steps[0].text, "Given a");
            assert_eq!(steps[1].text, "When b");
        }

        it "does not mistake words starting with a keyword for steps" {
            let feature = parse("Feature: F\nScenario: S\nAndroid users\nGiven a");
            assert_eq!(feature.scenarios[0].steps.len(), 1);
        }
    }

    describe "japanese keywords" {
        it "parses the same structure" {
            let feature = parse(JAPANESE);
            assert_eq!(feature.name, "商品管理");
            assert_eq!(feature.scenarios[0].name, "商品を登録する");
            let kinds: Vec<StepKind> = feature.scenarios[0].steps.iter().map(|s| s.kind).collect();
            assert_eq!(kinds, vec![StepKind::Given, StepKind::When, StepKind::Then, StepKind::And]);
        }
    }

    describe "determinism" {
        it "produces equal trees for equal input" {
            assert_eq!(parse(CHECKOUT), parse(CHECKOUT));
        }

        it "never fails on garbage" {
            let feature = parse("\u{0}\u{1}:::\n@@@\n####\nScenario\n");
            assert_eq!(feature.name, DEFAULT_FEATURE_NAME);
            assert!(feature.scenarios.is_empty());
        }
    }
}
