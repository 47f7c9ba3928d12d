//! # pas-rs: probabilistic assumption-based reasoning
//!
//! A knowledge base of Horn clauses over two kinds of atoms:
//!
//! - **assumptions**, independent Bernoulli variables with a known probability;
//! - **propositions**, derived facts without a probability of their own.
//!
//! For a hypothesis `H` the engine answers *how likely is it that `H` can be
//! derived from what we know?* in two steps:
//!
//! 1. **Symbolic.** The [`resolver`] eliminates every proposition by
//!    resolution and reduces `H` to its *quasi-support*: a DNF over
//!    assumptions whose terms each force `H`. The *support* further removes
//!    the scenarios under which the knowledge base contradicts itself.
//! 2. **Numeric.** A [`prob::ProbabilityComputer`] computes the probability
//!    mass of that DNF. The default computer builds a reduced ordered BDD
//!    with complement edges ([`bdd`]) and evaluates it bottom-up; the
//!    inclusion–exclusion computer serves as a cross-check.
//!
//! ## Basic usage
//!
//! ```rust
//! use pas_rs::kb::Kb;
//! use pas_rs::numeric::NumericResolver;
//! use pas_rs::prob::Strategy;
//!
//! let mut kb = Kb::new();
//! kb.create_assumption("Person_sick", 0.05).unwrap();
//! kb.create_assumption("Heavy_rain", 0.1).unwrap();
//! kb.create_assumption("Rain_causes_train_problem", 0.2).unwrap();
//! kb.create_proposition("train_delay").unwrap();
//! kb.add_horn_text("Heavy_rain, Rain_causes_train_problem -> train_delay").unwrap();
//! kb.add_horn_text("Person_sick -> train_delay").unwrap();
//!
//! let numeric = NumericResolver::new(&kb, Strategy::default());
//! let qs = numeric.find_qs_text("train_delay").unwrap();
//! assert_eq!(kb.render(&qs), "(Person_sick) + (Heavy_rain Rain_causes_train_problem)");
//!
//! let dqs = numeric.calc_dqs_text("train_delay").unwrap();
//! assert!((dqs - 0.069).abs() < 1e-12);
//! ```
//!
//! ## Core components
//!
//! - **[`kb`]**, **[`atoms`]**, **[`parser`]**: building the knowledge base.
//! - **[`expr`]**: literals, terms and two-level sentences.
//! - **[`resolver`]**, **[`numeric`]**: quasi-support, support and their degrees.
//! - **[`bdd`]**, **[`count`]**: the decision structure and model counting.
//! - **[`scenario`]**: exhaustive enumeration for cross-checking.
//! - **[`console`]**, **[`script`]**: the command language and persistence.
//! - **[`models`]**: the train delay and poker reference models.

pub mod atoms;
pub mod bdd;
pub mod cache;
pub mod console;
pub mod count;
pub mod error;
pub mod expr;
pub mod kb;
pub mod models;
pub mod node;
pub mod numeric;
pub mod parser;
pub mod prob;
pub mod progress;
pub mod reference;
pub mod resolver;
pub mod scenario;
pub mod script;
pub mod table;
pub mod types;
pub mod utils;
