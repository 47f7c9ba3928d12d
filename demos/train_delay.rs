//! The train delay model, evaluated with both probability computers.
//!
//! Run with: `cargo run --example train_delay`

use std::rc::Rc;

use pas_rs::models;
use pas_rs::numeric::NumericResolver;
use pas_rs::prob::{ProbabilityComputer, Strategy};
use pas_rs::progress::LogObserver;
use pas_rs::scenario::ScenarioAnalyzer;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let kb = models::train_delay()?;
    println!("kb = {}", kb.render(kb.clauses()));

    for strategy in [Strategy::default(), Strategy::Expansion] {
        println!("----------------------------------");
        println!("strategy = {}", strategy);
        let numeric = NumericResolver::with_observer(&kb, strategy, Rc::new(LogObserver::new()));

        let qs = numeric.find_qs_text("train_delay")?;
        println!("QS(train_delay) = {}", kb.render(&qs));
        let sp = numeric.find_sp_text("train_delay")?;
        println!("SP(train_delay) = {}", kb.render(&sp));

        println!("dqs(train_delay) = {}", numeric.calc_dqs_text("train_delay")?);
        println!("dsp(train_delay) = {}", numeric.calc_normalised_dsp_text("train_delay")?);
        println!("dqs(false) = {}", numeric.calc_contradiction()?);

        let computer: &dyn ProbabilityComputer = numeric.computer();
        let report = ScenarioAnalyzer::new(&kb, computer).analyze(&qs)?;
        println!(
            "scenarios: {} total, {} satisfied, mass {}",
            report.num_scenarios(),
            report.satisfied,
            report.hypothesis_mass
        );
    }

    Ok(())
}
