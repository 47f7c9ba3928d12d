//! Probability of a pair when drawing two cards without repetition.
//!
//! Run with: `cargo run --example poker`
//! Smaller deck: `cargo run --example poker -- --ranks 4 --suits 2`

use std::time::Instant;

use clap::Parser;

use pas_rs::bdd::BddConfig;
use pas_rs::models;
use pas_rs::numeric::NumericResolver;
use pas_rs::prob::Strategy;

#[derive(Parser, Debug)]
#[command(name = "poker")]
#[command(about = "Pair probability in a two-card draw")]
struct Args {
    /// Number of ranks
    #[arg(long, default_value_t = 13)]
    ranks: usize,

    /// Number of suits
    #[arg(long, default_value_t = 4)]
    suits: usize,

    /// Node budget of the decision structure
    #[arg(long, default_value_t = 1 << 20)]
    budget: usize,

    /// Use inclusion–exclusion instead of the decision structure
    #[arg(long)]
    expansion: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();
    let cards = args.ranks * args.suits;

    let time_build = Instant::now();
    let kb = models::poker_pair(args.ranks, args.suits)?;
    println!(
        "Deck of {} cards: {} atoms, {} clauses (built in {:.3} s)",
        cards,
        kb.registry().len(),
        kb.clauses().len(),
        time_build.elapsed().as_secs_f64()
    );

    let strategy = if args.expansion {
        Strategy::Expansion
    } else {
        Strategy::Bdd(BddConfig::default().with_node_budget(args.budget))
    };
    let numeric = NumericResolver::new(&kb, strategy);

    let time_solve = Instant::now();
    let qs = numeric.find_qs_text("pair")?;
    println!("QS(pair): {} terms", qs.len());
    println!("dqs(pair)   = {}", numeric.calc_dqs_text("pair")?);
    println!("dqs(false)  = {}", numeric.calc_contradiction()?);
    let dsp = numeric.calc_normalised_dsp_text("pair")?;
    println!("dsp(pair)   = {}", dsp);

    let expected = (args.suits - 1) as f64 / (cards - 1) as f64;
    println!("expected    = {}", expected);
    println!("difference  = {:e}", (dsp - expected).abs());
    println!("Solved in {:.3} s", time_solve.elapsed().as_secs_f64());

    Ok(())
}
