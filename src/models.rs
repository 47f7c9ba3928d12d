//! Ready-made knowledge bases.
//!
//! Both models use only the public building API: atom creation and Horn
//! clauses. Exactly-one choices are encoded explicitly as sequential-choice
//! chains.

use crate::error::Result;
use crate::expr::Literal;
use crate::kb::Kb;
use crate::types::Var;

/// The train delay model: a delay is caused either by a sick person or by
/// heavy rain that happens to disturb the trains.
pub fn train_delay() -> Result<Kb> {
    let mut kb = Kb::new();
    kb.create_assumption("Person_sick", 0.05)?;
    kb.create_assumption("Heavy_rain", 0.1)?;
    kb.create_assumption("Rain_causes_train_problem", 0.2)?;
    kb.create_proposition("train_delay")?;
    kb.add_horn_text("Heavy_rain, Rain_causes_train_problem -> train_delay")?;
    kb.add_horn_text("Person_sick -> train_delay")?;
    Ok(kb)
}

/// Sequential choice of one of `n` options.
///
/// Option `k` (1-based) is chosen when choices `1..k` were declined and
/// choice `k` accepted. With `P(choice_k) = 1 / (n - k + 1)` every option is
/// equally likely; the last choice is certain.
pub fn choice_chain(kb: &mut Kb, prefix: &str, n: usize) -> Result<Vec<Var>> {
    let mut chain = Vec::with_capacity(n);
    for k in 1..=n {
        let p = 1.0 / (n - k + 1) as f64;
        chain.push(kb.create_assumption(&format!("{}{}", prefix, k), p)?);
    }
    Ok(chain)
}

/// Body literals selecting option `k` (1-based) of a chain.
///
/// # Panics
///
/// Panics if `k` is not in `1..=chain.len()`.
pub fn chosen(chain: &[Var], k: usize) -> Vec<Literal> {
    assert!(
        (1..=chain.len()).contains(&k),
        "Option {} is out of the chain range 1..={}",
        k,
        chain.len()
    );
    chain[..k - 1]
        .iter()
        .map(|&v| Literal::neg(v))
        .chain(std::iter::once(Literal::pos(chain[k - 1])))
        .collect()
}

/// Two cards drawn without repetition from a deck of `ranks × suits` cards;
/// the proposition `pair` holds when both have the same rank.
///
/// Card `k` (1-based) has rank `(k - 1) / suits`. Drawing the same card
/// twice is ruled out by integrity constraints.
pub fn poker_pair(ranks: usize, suits: usize) -> Result<Kb> {
    let mut kb = Kb::new();
    let n = ranks * suits;

    let chains = [choice_chain(&mut kb, "draw1_", n)?, choice_chain(&mut kb, "draw2_", n)?];

    let mut cards = [Vec::with_capacity(n), Vec::with_capacity(n)];
    let mut rank_props = [Vec::with_capacity(ranks), Vec::with_capacity(ranks)];
    for d in 0..2 {
        for k in 1..=n {
            cards[d].push(kb.create_proposition(&format!("card{}_{}", d + 1, k))?);
        }
        for r in 1..=ranks {
            rank_props[d].push(kb.create_proposition(&format!("rank{}_{}", d + 1, r))?);
        }
    }
    let pair = kb.create_proposition("pair")?;

    for d in 0..2 {
        for k in 1..=n {
            let card = cards[d][k - 1];
            kb.add_horn_clause(&chosen(&chains[d], k), Some(Literal::pos(card)))?;
            let rank = rank_props[d][(k - 1) / suits];
            kb.add_horn_clause(&[Literal::pos(card)], Some(Literal::pos(rank)))?;
        }
    }

    for r in 0..ranks {
        kb.add_horn_clause(
            &[Literal::pos(rank_props[0][r]), Literal::pos(rank_props[1][r])],
            Some(Literal::pos(pair)),
        )?;
    }

    for k in 0..n {
        kb.add_horn_clause(&[Literal::pos(cards[0][k]), Literal::pos(cards[1][k])], None)?;
    }

    Ok(kb)
}
