use num_bigint::BigUint;
use test_log::test;

use pas_rs::bdd::BddConfig;
use pas_rs::error::Error;
use pas_rs::kb::Kb;
use pas_rs::models;
use pas_rs::numeric::NumericResolver;
use pas_rs::prob::{ExpansionComputer, ProbabilityComputer, Strategy};
use pas_rs::scenario::ScenarioAnalyzer;
use pas_rs::script;

const EPS: f64 = 1e-9;

fn strategies() -> [Strategy; 2] {
    [Strategy::default(), Strategy::Expansion]
}

/// A knowledge base with a non-trivial contradiction set.
fn station_kb() -> Kb {
    let mut kb = models::train_delay().unwrap();
    kb.create_assumption("Strike", 0.3).unwrap();
    kb.create_assumption("Signal_failure", 0.02).unwrap();
    kb.create_proposition("station_open").unwrap();
    kb.create_proposition("chaos").unwrap();
    kb.add_horn_text("Strike -> train_delay").unwrap();
    kb.add_horn_text("Heavy_rain -> station_open").unwrap();
    kb.add_horn_text("Signal_failure, train_delay -> chaos").unwrap();
    kb.add_horn_text("Strike, station_open -> false").unwrap();
    kb.add_horn_text("chaos, Person_sick -> false").unwrap();
    kb
}

#[test]
fn test_train_delay() {
    let kb = models::train_delay().unwrap();
    for strategy in strategies() {
        let numeric = NumericResolver::new(&kb, strategy);
        let qs = numeric.find_qs_text("train_delay").unwrap();
        assert_eq!(kb.render(&qs), "(Person_sick) + (Heavy_rain Rain_causes_train_problem)");
        assert!((numeric.calc_dqs_text("train_delay").unwrap() - 0.069).abs() < EPS);
        assert!((numeric.calc_normalised_dsp_text("train_delay").unwrap() - 0.069).abs() < EPS);
    }
}

#[test]
fn test_poker_pair() {
    let kb = models::poker_pair(13, 4).unwrap();
    for strategy in strategies() {
        let numeric = NumericResolver::new(&kb, strategy);
        assert!((numeric.calc_contradiction().unwrap() - 1.0 / 52.0).abs() < EPS);
        let dsp = numeric.calc_normalised_dsp_text("pair").unwrap();
        assert!((dsp - 78.0 / 1326.0).abs() < EPS, "dsp = {}", dsp);
    }
}

#[test]
fn test_small_deck_pair() {
    // 3 ranks × 2 suits: the second card matches with probability 1/5.
    let kb = models::poker_pair(3, 2).unwrap();
    let numeric = NumericResolver::new(&kb, Strategy::default());
    let dsp = numeric.calc_normalised_dsp_text("pair").unwrap();
    assert!((dsp - 0.2).abs() < EPS, "dsp = {}", dsp);
}

#[test]
fn test_strategies_agree() {
    let kb = station_kb();
    let hypotheses = [
        "train_delay",
        "chaos",
        "station_open",
        "(train_delay) (station_open)",
        "(chaos ~Heavy_rain)",
        "false",
    ];
    let bdd = NumericResolver::new(&kb, Strategy::default());
    let expansion = NumericResolver::new(&kb, Strategy::Expansion);
    for h in hypotheses {
        let a = bdd.calc_dqs_text(h).unwrap();
        let b = expansion.calc_dqs_text(h).unwrap();
        assert!((a - b).abs() < EPS, "dqs({}): {} != {}", h, a, b);

        let a = bdd.calc_normalised_dsp_text(h).unwrap();
        let b = expansion.calc_normalised_dsp_text(h).unwrap();
        assert!((a - b).abs() < EPS, "dsp({}): {} != {}", h, a, b);
    }
}

#[test]
fn test_normalisation_identity() {
    let kb = station_kb();
    let numeric = NumericResolver::new(&kb, Strategy::default());
    let contradiction = numeric.calc_dqs_text("false").unwrap();
    assert!(contradiction > 0.0);
    for h in ["train_delay", "chaos", "(station_open Strike)"] {
        let raw = numeric.calc_non_normalised_dsp_text(h).unwrap();
        let normalised = numeric.calc_normalised_dsp_text(h).unwrap();
        assert!((normalised - raw / (1.0 - contradiction)).abs() < EPS);
    }
}

#[test]
fn test_weakening_is_monotone() {
    let kb = station_kb();
    let numeric = NumericResolver::new(&kb, Strategy::default());
    // Each hypothesis is implied by the previous one.
    let chain = [
        "(train_delay) (chaos) (station_open)",
        "(train_delay) (chaos)",
        "(train_delay)",
        "(train_delay Heavy_rain)",
        "(train_delay Heavy_rain ~Strike)",
        "true",
    ];
    let mut previous = 0.0;
    for h in chain {
        let dqs = numeric.calc_dqs_text(h).unwrap();
        assert!(dqs + EPS >= previous, "dqs({}) = {} < {}", h, dqs, previous);
        previous = dqs;
    }
    assert!((previous - 1.0).abs() < EPS);
}

#[test]
fn test_script_roundtrip() {
    let kb = station_kb();
    let strategy = Strategy::Bdd(BddConfig::default().with_node_budget(4096));
    let text = script::dump(&kb, strategy);
    let console = script::replay(&text).unwrap();

    assert_eq!(console.strategy(), strategy);
    assert_eq!(console.kb().clauses(), kb.clauses());
    assert_eq!(console.kb().registry().weights(), kb.registry().weights());
    assert_eq!(
        console.kb().registry().propositions().map(|a| a.name.clone()).collect::<Vec<_>>(),
        kb.registry().propositions().map(|a| a.name.clone()).collect::<Vec<_>>()
    );

    let before = NumericResolver::new(&kb, strategy);
    let after = NumericResolver::new(console.kb(), console.strategy());
    for h in ["train_delay", "chaos"] {
        assert_eq!(
            before.calc_normalised_dsp_text(h).unwrap(),
            after.calc_normalised_dsp_text(h).unwrap()
        );
    }
    assert_eq!(script::dump(console.kb(), console.strategy()), text);
}

#[test]
fn test_scenarios_sum_to_direct_evaluation() {
    let kb = station_kb();
    let numeric = NumericResolver::new(&kb, Strategy::default());
    let computer = ExpansionComputer;
    let analyzer = ScenarioAnalyzer::new(&kb, &computer);
    let weights = kb.registry().weights();

    for h in ["train_delay", "chaos"] {
        let qs = numeric.find_qs_text(h).unwrap();
        let report = analyzer.analyze(&qs).unwrap();
        let direct = computer.probability(&qs, &weights).unwrap();
        assert!((report.hypothesis_mass - direct).abs() < EPS);
    }

    let contradiction = numeric.resolver().contradiction();
    let report = analyzer.analyze(&contradiction).unwrap();
    let direct = computer.probability(&contradiction, &weights).unwrap();
    assert!((report.contradiction_mass - direct).abs() < EPS);
    assert!((report.hypothesis_mass - direct).abs() < EPS);
}

#[test]
fn test_node_budget_exceeded() {
    let kb = models::poker_pair(13, 4).unwrap();
    let strategy = Strategy::Bdd(BddConfig::default().with_node_budget(10));
    let numeric = NumericResolver::new(&kb, strategy);
    assert_eq!(
        numeric.calc_dqs_text("pair"),
        Err(Error::NodeBudgetExceeded { budget: 10 })
    );
}

#[test]
fn test_count_qs_scenarios() {
    let kb = station_kb();
    let numeric = NumericResolver::new(&kb, Strategy::default());
    let h = kb.construct_cnf("false").unwrap();
    // (Heavy_rain Strike) + (Person_sick Signal_failure) over 5 assumptions:
    // 8 + 8 - 2 scenarios.
    assert_eq!(numeric.count_qs_scenarios(&h).unwrap(), BigUint::from(14u32));
}
