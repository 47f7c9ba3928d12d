//! Line-oriented command interpreter over one knowledge base.
//!
//! Each line reads `command[: parameter]`. The parameters of the create
//! commands are split on a separator (`,` by default); formula parameters
//! are passed to the parser whole. Blank lines and lines starting with `#`
//! are ignored.
//!
//! | Command | Parameter |
//! |---|---|
//! | `create_assumption` | `name,probability` |
//! | `create_proposition` | `name[,name…]` |
//! | `add_horn` | `body -> head` |
//! | `add_clause` | clause |
//! | `find_qs`, `find_sp` | hypothesis CNF |
//! | `calc_dqs`, `calc_dsp`, `calc_unnormalised_dsp` | hypothesis CNF |
//! | `scenarios` | DNF |
//! | `stats`, `reset`, `dump` | none |
//! | `set_strategy` | `bdd[,budget]` or `expansion` |

use std::rc::Rc;

use log::debug;

use crate::error::{Error, Result};
use crate::kb::Kb;
use crate::numeric::NumericResolver;
use crate::prob::Strategy;
use crate::progress::{NoopObserver, Observer};
use crate::scenario::ScenarioAnalyzer;
use crate::script;

pub struct Console {
    kb: Kb,
    strategy: Strategy,
    separator: char,
    observer: Rc<dyn Observer>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Self {
            kb: Kb::new(),
            strategy: Strategy::default(),
            separator: ',',
            observer: Rc::new(NoopObserver),
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_observer(mut self, observer: Rc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn kb(&self) -> &Kb {
        &self.kb
    }

    pub fn kb_mut(&mut self) -> &mut Kb {
        &mut self.kb
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    fn numeric(&self) -> NumericResolver<'_> {
        NumericResolver::with_observer(&self.kb, self.strategy, self.observer.clone())
    }

    /// Execute one line. Returns the text to show, if the command produces any.
    pub fn execute(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (command, parameter) = match line.split_once(':') {
            Some((command, parameter)) => (command.trim(), Some(parameter.trim())),
            None => (line, None),
        };
        debug!("execute `{}` with {:?}", command, parameter);

        let required = || {
            parameter.ok_or_else(|| Error::parse(command.len(), format!("`{}` needs a parameter", command)))
        };

        match command {
            "create_assumption" => {
                let fields = self.split(required()?);
                let [name, probability] = fields.as_slice() else {
                    return Err(Error::parse(
                        0,
                        format!("expected `name{}probability`, got {} fields", self.separator, fields.len()),
                    ));
                };
                let probability = probability.parse::<f64>().map_err(|e| {
                    Error::parse(name.len() + 1, format!("invalid probability `{}`: {}", probability, e))
                })?;
                self.kb.create_assumption(name, probability)?;
                Ok(None)
            }
            "create_proposition" => {
                let names = self.split(required()?);
                self.kb.create_propositions(names.as_slice())?;
                Ok(None)
            }
            "add_horn" => {
                self.kb.add_horn_text(required()?)?;
                Ok(None)
            }
            "add_clause" => {
                let cnf = self.kb.construct_cnf(required()?)?;
                for clause in cnf.iter() {
                    self.kb.add_clause(clause.clone())?;
                }
                Ok(None)
            }
            "find_qs" => {
                let qs = self.numeric().find_qs_text(required()?)?;
                Ok(Some(self.kb.render(&qs)))
            }
            "find_sp" => {
                let sp = self.numeric().find_sp_text(required()?)?;
                Ok(Some(self.kb.render(&sp)))
            }
            "calc_dqs" => {
                let p = self.numeric().calc_dqs_text(required()?)?;
                Ok(Some(p.to_string()))
            }
            "calc_dsp" => {
                let p = self.numeric().calc_normalised_dsp_text(required()?)?;
                Ok(Some(p.to_string()))
            }
            "calc_unnormalised_dsp" => {
                let p = self.numeric().calc_non_normalised_dsp_text(required()?)?;
                Ok(Some(p.to_string()))
            }
            "scenarios" => {
                let dnf = self.kb.construct_dnf(required()?)?;
                let numeric = self.numeric();
                let report = ScenarioAnalyzer::new(&self.kb, numeric.computer()).analyze(&dnf)?;
                Ok(Some(format!(
                    "scenarios: {}, satisfied: {}, partial: {}, inconsistent: {}, hypothesis: {}, contradiction: {}",
                    report.num_scenarios(),
                    report.satisfied,
                    report.partial,
                    report.inconsistent,
                    report.hypothesis_mass,
                    report.contradiction_mass
                )))
            }
            "stats" => {
                let registry = self.kb.registry();
                Ok(Some(format!(
                    "assumptions: {}, propositions: {}, clauses: {}, strategy: {}",
                    registry.num_assumptions(),
                    registry.num_propositions(),
                    self.kb.clauses().len(),
                    self.strategy
                )))
            }
            "set_strategy" => {
                self.strategy = required()?.parse()?;
                Ok(None)
            }
            "reset" => {
                self.kb.reset();
                Ok(None)
            }
            "dump" => Ok(Some(script::dump(&self.kb, self.strategy))),
            _ => Err(Error::UnknownCommand(command.to_string())),
        }
    }

    fn split(&self, parameter: &str) -> Vec<String> {
        parameter
            .split(self.separator)
            .map(|s| s.trim().to_string())
            .collect()
    }
}
