//! Logical combinators
//!
//! `And` and `Or` only ever test the searched set, and stop as soon as it
//! runs dry. Operands never see the combinator's local candidate.

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::{InvarianceCache, Invariants};
use super::partition::transfer_all;
use super::{match_via_eval, Condition, ObjectSet, SearchDomain};
use crate::core::error::{EngineError, Result};

/// Matches every object
#[derive(Debug, Default)]
pub struct All;

impl Condition for All {
    fn eval<'a>(
        &self,
        _: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        transfer_all(matches, non_matches, domain, true);
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        local.local_candidate.is_some()
    }

    fn invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_ALL", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}All\n", indent(level))
    }
}

/// Matches no object
#[derive(Debug, Default)]
pub struct NoneOf;

impl Condition for NoneOf {
    fn eval<'a>(
        &self,
        _: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        transfer_all(matches, non_matches, domain, false);
    }

    fn match_local(&self, _: &ScriptingContext<'_>) -> bool {
        false
    }

    fn invariance(&self) -> Invariants {
        Invariants::ALL
    }

    fn initial_candidates<'a>(&self, _: &ScriptingContext<'a>) -> ObjectSet<'a> {
        Vec::new()
    }

    fn description(&self, negated: bool) -> String {
        describe("DESC_NONE", negated, &[])
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}None\n", indent(level))
    }
}

fn operand_invariance(operands: &[Box<dyn Condition>]) -> Invariants {
    operands
        .iter()
        .fold(Invariants::ALL, |acc, op| acc & op.invariance())
        .for_node()
}

fn dump_operands(name: &str, operands: &[Box<dyn Condition>], level: usize) -> String {
    let mut text = format!("{}{} [\n", indent(level), name);
    for operand in operands {
        text += &operand.dump_at(level + 1);
    }
    text + &format!("{}]\n", indent(level))
}

/// Join operand descriptions; a negated conjunction reads as a disjunction
/// of negations and vice versa
fn join_descriptions(operands: &[Box<dyn Condition>], negated: bool, plain: &str, flipped: &str) -> String {
    if let [only] = operands {
        return only.description(negated);
    }
    let separator = if negated { flipped } else { plain };
    operands
        .iter()
        .map(|op| op.description(negated))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Objects matching every operand
#[derive(Debug)]
pub struct And {
    operands: Vec<Box<dyn Condition>>,
    invariance: InvarianceCache,
}

impl And {
    pub fn new(operands: Vec<Box<dyn Condition>>) -> Result<Self> {
        if operands.is_empty() {
            return Err(EngineError::InvalidCondition("And requires at least one operand".into()));
        }
        Ok(Self {
            operands,
            invariance: InvarianceCache::new(),
        })
    }

    pub fn operands(&self) -> &[Box<dyn Condition>] {
        &self.operands
    }
}

impl Condition for And {
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        let local = ctx.without_candidate();
        match domain {
            SearchDomain::NonMatches => {
                let mut passing = Vec::with_capacity(non_matches.len());
                let (first, rest) = (&self.operands[0], &self.operands[1..]);
                first.eval(&local, &mut passing, non_matches, SearchDomain::NonMatches);
                for operand in rest {
                    if passing.is_empty() {
                        break;
                    }
                    operand.eval(&local, &mut passing, non_matches, SearchDomain::Matches);
                }
                matches.append(&mut passing);
            }
            SearchDomain::Matches => {
                for operand in &self.operands {
                    if matches.is_empty() {
                        break;
                    }
                    operand.eval(&local, matches, non_matches, SearchDomain::Matches);
                }
            }
        }
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        match_via_eval(self, "And", local)
    }

    fn invariance(&self) -> Invariants {
        self.invariance.get_or_compute(|| operand_invariance(&self.operands))
    }

    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        self.operands[0].initial_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        join_descriptions(&self.operands, negated, " and ", " or ")
    }

    fn dump_at(&self, level: usize) -> String {
        dump_operands("And", &self.operands, level)
    }
}

/// Objects matching at least one operand
#[derive(Debug)]
pub struct Or {
    operands: Vec<Box<dyn Condition>>,
    invariance: InvarianceCache,
}

impl Or {
    pub fn new(operands: Vec<Box<dyn Condition>>) -> Result<Self> {
        if operands.is_empty() {
            return Err(EngineError::InvalidCondition("Or requires at least one operand".into()));
        }
        Ok(Self {
            operands,
            invariance: InvarianceCache::new(),
        })
    }

    pub fn operands(&self) -> &[Box<dyn Condition>] {
        &self.operands
    }
}

impl Condition for Or {
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        let local = ctx.without_candidate();
        match domain {
            SearchDomain::NonMatches => {
                for operand in &self.operands {
                    if non_matches.is_empty() {
                        break;
                    }
                    operand.eval(&local, matches, non_matches, SearchDomain::NonMatches);
                }
            }
            SearchDomain::Matches => {
                let mut failing = Vec::with_capacity(matches.len());
                let (first, rest) = (&self.operands[0], &self.operands[1..]);
                first.eval(&local, matches, &mut failing, SearchDomain::Matches);
                for operand in rest {
                    if failing.is_empty() {
                        break;
                    }
                    operand.eval(&local, matches, &mut failing, SearchDomain::NonMatches);
                }
                non_matches.append(&mut failing);
            }
        }
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        match_via_eval(self, "Or", local)
    }

    fn invariance(&self) -> Invariants {
        self.invariance.get_or_compute(|| operand_invariance(&self.operands))
    }

    fn description(&self, negated: bool) -> String {
        join_descriptions(&self.operands, negated, " or ", " and ")
    }

    fn dump_at(&self, level: usize) -> String {
        dump_operands("Or", &self.operands, level)
    }
}

/// Objects not matching the operand
///
/// The operand runs with the two sets swapped and the opposite domain.
#[derive(Debug)]
pub struct Not {
    operand: Box<dyn Condition>,
}

impl Not {
    pub fn new(operand: Box<dyn Condition>) -> Self {
        Self { operand }
    }
}

impl Condition for Not {
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        let local = ctx.without_candidate();
        let flipped = match domain {
            SearchDomain::Matches => SearchDomain::NonMatches,
            SearchDomain::NonMatches => SearchDomain::Matches,
        };
        self.operand.eval(&local, non_matches, matches, flipped);
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        match_via_eval(self, "Not", local)
    }

    fn invariance(&self) -> Invariants {
        self.operand.invariance().for_node()
    }

    fn description(&self, negated: bool) -> String {
        self.operand.description(!negated)
    }

    fn dump_at(&self, level: usize) -> String {
        format!("{}Not\n{}", indent(level), self.operand.dump_at(level + 1))
    }
}
