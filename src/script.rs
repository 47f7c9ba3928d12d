//! Persistence as a replayable console script.
//!
//! A dump starts with the `set_strategy` line, then creates every atom in
//! canonical index order and finally adds every clause. Replaying it in a
//! fresh [`Console`] yields the same indices, probabilities and clauses.

use crate::console::Console;
use crate::error::{Error, Result};
use crate::expr::Sentence;
use crate::kb::Kb;
use crate::prob::Strategy;

pub fn dump(kb: &Kb, strategy: Strategy) -> String {
    let mut lines = vec![format!("set_strategy: {}", strategy)];
    for atom in kb.registry().atoms() {
        lines.push(match atom.probability() {
            Some(p) => format!("create_assumption: {},{}", atom.name, p),
            None => format!("create_proposition: {}", atom.name),
        });
    }
    for clause in kb.clauses().iter() {
        lines.push(format!("add_clause: {}", kb.render(&Sentence::cnf([clause.clone()]))));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Run every line of `text` in a fresh console.
///
/// The first failing line aborts the replay with [`Error::Script`].
pub fn replay(text: &str) -> Result<Console> {
    let mut console = Console::new();
    for (i, line) in text.lines().enumerate() {
        console.execute(line).map_err(|e| Error::Script {
            line: i + 1,
            source: Box::new(e),
        })?;
    }
    Ok(console)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::bdd::BddConfig;

    fn kb() -> Kb {
        let mut kb = Kb::new();
        kb.create_assumption("a", 0.1).unwrap();
        kb.create_proposition("p").unwrap();
        kb.create_assumption("b", 1.0 / 3.0).unwrap();
        kb.add_horn_text("a, b -> p").unwrap();
        kb.add_horn_text("p -> false").unwrap();
        kb
    }

    #[test]
    fn test_dump() {
        let strategy = Strategy::Bdd(BddConfig::default().with_node_budget(500));
        assert_eq!(
            dump(&kb(), strategy),
            "set_strategy: bdd,500\n\
             create_assumption: a,0.1\n\
             create_proposition: p\n\
             create_assumption: b,0.3333333333333333\n\
             add_clause: (~a p ~b)\n\
             add_clause: (~p)\n"
        );
    }

    #[test]
    fn test_roundtrip() {
        let kb = kb();
        let console = replay(&dump(&kb, Strategy::Expansion)).unwrap();
        assert_eq!(console.strategy(), Strategy::Expansion);
        assert_eq!(console.kb().clauses(), kb.clauses());
        assert_eq!(console.kb().registry().weights(), kb.registry().weights());
        assert_eq!(
            console.kb().registry().atoms().collect::<Vec<_>>(),
            kb.registry().atoms().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_replay_error_line() {
        let text = "create_assumption: a,0.5\n\n# comment\nadd_horn: a -> q\n";
        assert_eq!(
            replay(text).err(),
            Some(Error::Script {
                line: 4,
                source: Box::new(Error::UnknownAtom("q".to_string())),
            })
        );
    }
}
