//! Counting and sampling over subcondition matches
//!
//! Both nodes evaluate their subcondition against their own candidates: the
//! context they pass down has no local candidate.

use std::collections::BTreeMap;

use ahash::AHashSet;
use ordered_float::OrderedFloat;

use super::context::ScriptingContext;
use super::describe::{describe, indent};
use super::invariance::{InvarianceCache, Invariants};
use super::partition::{eval_each, transfer, transfer_all};
use super::{match_via_eval, Condition, ObjectSet, SearchDomain};
use crate::core::error::{EngineError, Result};
use crate::universe::UniverseObject;
use crate::value_ref::{eval_opt, opt_description, opt_invariance, ValueRef};

/// Matches every candidate when the number of objects satisfying the
/// subcondition lies in `[low, high]`, and none otherwise
///
/// Bounds default to zero and `i32::MAX`. Without a root candidate a
/// root-dependent subcondition is counted once per candidate, with that
/// candidate as the root.
#[derive(Debug)]
pub struct Number {
    low: Option<ValueRef<i32>>,
    high: Option<ValueRef<i32>>,
    condition: Box<dyn Condition>,
    invariance: InvarianceCache,
}

impl Number {
    pub fn new(low: Option<ValueRef<i32>>, high: Option<ValueRef<i32>>, condition: Box<dyn Condition>) -> Self {
        Self {
            low,
            high,
            condition,
            invariance: InvarianceCache::new(),
        }
    }

    pub fn between(low: i32, high: i32, condition: Box<dyn Condition>) -> Self {
        Self::new(Some(low.into()), Some(high.into()), condition)
    }

    fn bounds_invariance(&self) -> Invariants {
        opt_invariance(&self.low) & opt_invariance(&self.high)
    }

    /// Count subcondition matches in a candidate-free context
    fn count_in_range(&self, local: &ScriptingContext<'_>) -> bool {
        let (Some(low), Some(high)) = (eval_opt(&self.low, local), eval_opt(&self.high, local)) else {
            tracing::debug!(condition = "Number", "Bounds unresolved; no candidate matches");
            return false;
        };
        let low = low.unwrap_or(0).max(0);
        let high = high.unwrap_or(i32::MAX);
        let count = i32::try_from(self.condition.eval_all(local).len()).unwrap_or(i32::MAX);
        low <= count && count <= high
    }
}

impl Condition for Number {
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        let local = ctx.without_candidate();
        let bounds = self.bounds_invariance();
        if !bounds.local_candidate {
            tracing::error!(
                condition = "Number",
                "Bounds depend on the local candidate, but counting has no local candidate"
            );
        } else if local.root_candidate.is_none() && !bounds.root_candidate {
            tracing::error!(
                condition = "Number",
                "Bounds depend on the root candidate, but no root candidate is set"
            );
        }

        if local.root_candidate.is_none() && !self.is_root_invariant() {
            eval_each(self, &local, matches, non_matches, domain);
            return;
        }
        let in_range = self.count_in_range(&local);
        transfer_all(matches, non_matches, domain, in_range);
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        if local.local_candidate.is_none() {
            tracing::error!(condition = "Number", "Match requested without a candidate object");
            return false;
        }
        self.count_in_range(&local.without_candidate())
    }

    fn invariance(&self) -> Invariants {
        self.invariance
            .get_or_compute(|| (self.bounds_invariance() & self.condition.invariance()).for_node())
    }

    fn description(&self, negated: bool) -> String {
        describe(
            "DESC_NUMBER",
            negated,
            &[
                opt_description(&self.low, "0"),
                opt_description(&self.high, &i32::MAX.to_string()),
                self.condition.description(false),
            ],
        )
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!("{}Number", indent(level));
        if let Some(low) = &self.low {
            text += &format!(" low = {}", low.description());
        }
        if let Some(high) = &self.high {
            text += &format!(" high = {}", high.description());
        }
        text += " condition =\n";
        text + &self.condition.dump_at(level + 1)
    }
}

/// How `SortedNumberOf` picks among subcondition matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingMethod {
    /// Uniform sample without replacement
    Random,
    /// Largest sort keys first, ties in pool order
    Max,
    /// Smallest sort keys first, ties in pool order
    Min,
    /// Most frequent sort key values first
    Mode,
}

impl SortingMethod {
    fn dump_name(&self) -> &'static str {
        match self {
            SortingMethod::Random => "NumberOf",
            SortingMethod::Max => "MaximumNumberOf",
            SortingMethod::Min => "MinimumNumberOf",
            SortingMethod::Mode => "ModeNumberOf",
        }
    }
}

/// Selects `number` of the objects matching the subcondition
///
/// Objects that do not satisfy the subcondition keep their set. In the
/// non-matches domain selected objects join the matches; in the matches
/// domain only selected objects stay.
#[derive(Debug)]
pub struct SortedNumberOf {
    number: ValueRef<i32>,
    sort_key: Option<ValueRef<f64>>,
    method: SortingMethod,
    condition: Box<dyn Condition>,
    invariance: InvarianceCache,
}

impl SortedNumberOf {
    pub fn new(
        number: ValueRef<i32>,
        sort_key: Option<ValueRef<f64>>,
        method: SortingMethod,
        condition: Box<dyn Condition>,
    ) -> Result<Self> {
        if method != SortingMethod::Random && sort_key.is_none() {
            return Err(EngineError::InvalidCondition(format!(
                "{} requires a sort key",
                method.dump_name()
            )));
        }
        Ok(Self {
            number,
            sort_key,
            method,
            condition,
            invariance: InvarianceCache::new(),
        })
    }

    /// Random selection of `number` subcondition matches
    pub fn random(number: i32, condition: Box<dyn Condition>) -> Self {
        Self {
            number: number.into(),
            sort_key: None,
            method: SortingMethod::Random,
            condition,
            invariance: InvarianceCache::new(),
        }
    }

    /// Pick up to `number` objects of `pool`, which is in pool order
    fn select<'a>(
        &self,
        number: usize,
        pool: &[&'a UniverseObject],
        local: &ScriptingContext<'a>,
    ) -> Vec<&'a UniverseObject> {
        if self.method == SortingMethod::Random {
            let amount = number.min(pool.len());
            let mut rng = local.rng.borrow_mut();
            let mut picked: Vec<usize> = rand::seq::index::sample(&mut *rng, pool.len(), amount).into_vec();
            picked.sort_unstable();
            return picked.into_iter().map(|i| pool[i]).collect();
        }

        let Some(sort_key) = &self.sort_key else {
            tracing::error!(condition = "SortedNumberOf", "Sorting method needs a sort key");
            return Vec::new();
        };
        let mut keyed: Vec<(OrderedFloat<f64>, &'a UniverseObject)> = pool
            .iter()
            .filter_map(|&obj| match sort_key.eval(&local.with_candidate(obj)) {
                Some(key) => Some((OrderedFloat(key), obj)),
                None => {
                    tracing::debug!(object = %obj.id, "Sort key unresolved; object skipped");
                    None
                }
            })
            .collect();

        match self.method {
            SortingMethod::Min => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortingMethod::Max => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
            SortingMethod::Mode => {
                let mut histogram: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
                for (key, _) in &keyed {
                    *histogram.entry(*key).or_default() += 1;
                }
                // most frequent first; equally frequent values larger first
                let mut classes: Vec<(usize, OrderedFloat<f64>)> =
                    histogram.into_iter().map(|(key, count)| (count, key)).collect();
                classes.sort_by(|a, b| b.cmp(a));
                let rank: BTreeMap<OrderedFloat<f64>, usize> = classes
                    .iter()
                    .enumerate()
                    .map(|(rank, (_, key))| (*key, rank))
                    .collect();
                keyed.sort_by_key(|(key, _)| rank.get(key).copied().unwrap_or(usize::MAX));
            }
            SortingMethod::Random => {}
        }
        keyed.into_iter().take(number).map(|(_, obj)| obj).collect()
    }
}

impl Condition for SortedNumberOf {
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        let local = ctx.without_candidate();

        let mut pool = self.condition.eval_candidates(&local, matches.clone());
        pool.extend(self.condition.eval_candidates(&local, non_matches.clone()));

        let number = match self.number.eval(&local) {
            Some(n) => usize::try_from(n).unwrap_or(0),
            None => {
                tracing::debug!(condition = "SortedNumberOf", "Number unresolved; nothing selected");
                0
            }
        };
        let selected: AHashSet<_> = self
            .select(number, &pool, &local)
            .into_iter()
            .map(|obj| obj.id)
            .collect();

        transfer(matches, non_matches, domain, |obj| selected.contains(&obj.id));
    }

    fn match_local(&self, local: &ScriptingContext<'_>) -> bool {
        match_via_eval(self, "SortedNumberOf", local)
    }

    fn invariance(&self) -> Invariants {
        self.invariance.get_or_compute(|| {
            (self.number.invariance() & opt_invariance(&self.sort_key) & self.condition.invariance())
                .for_node()
        })
    }

    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        self.condition.initial_candidates(ctx)
    }

    fn description(&self, negated: bool) -> String {
        let number = self.number.description();
        let condition = self.condition.description(false);
        let sort_key = opt_description(&self.sort_key, "");
        match self.method {
            SortingMethod::Random => describe("DESC_SORTED_RANDOM", negated, &[number, condition]),
            SortingMethod::Max => describe("DESC_SORTED_MAX", negated, &[number, sort_key, condition]),
            SortingMethod::Min => describe("DESC_SORTED_MIN", negated, &[number, sort_key, condition]),
            SortingMethod::Mode => describe("DESC_SORTED_MODE", negated, &[number, sort_key, condition]),
        }
    }

    fn dump_at(&self, level: usize) -> String {
        let mut text = format!(
            "{}{} number = {}",
            indent(level),
            self.method.dump_name(),
            self.number.description()
        );
        if let Some(sort_key) = &self.sort_key {
            text += &format!(" sortby = {}", sort_key.description());
        }
        text += " condition =\n";
        text + &self.condition.dump_at(level + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::affiliation::{Affiliation, EmpireAffiliation};
    use crate::condition::object::Type;
    use crate::condition::testing::{fixture, ids, matching_ids, object, rng};
    use crate::universe::ObjectType;
    use crate::value_ref::{Property, ReferenceType};

    fn planets() -> Box<dyn Condition> {
        Box::new(Type::from(ObjectType::Planet))
    }

    fn x_key() -> Option<ValueRef<f64>> {
        Some(ValueRef::variable(ReferenceType::LocalCandidate, Property::X))
    }

    #[test]
    fn test_number_counts_whole_universe() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let total = universe.objects().len();
        assert!(matching_ids(&Number::between(2, 2, planets()), &ctx).is_empty());
        assert_eq!(matching_ids(&Number::between(4, 4, planets()), &ctx).len(), total);
        assert_eq!(matching_ids(&Number::new(None, Some(4.into()), planets()), &ctx).len(), total);
    }

    #[test]
    fn test_number_with_root_dependent_subcondition() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let same_owner_as_root = EmpireAffiliation::new(
            Affiliation::TheEmpire,
            Some(ValueRef::variable(ReferenceType::RootCandidate, Property::Owner)),
        );
        let condition = Number::between(5, 5, Box::new(same_owner_as_root));
        assert!(!condition.is_root_invariant());
        assert_eq!(matching_ids(&condition, &ctx), vec![11, 13, 40, 41, 42]);

        let rooted = ctx.with_candidate(object(&universe, 21)).without_candidate();
        assert!(matching_ids(&condition, &rooted).is_empty());
    }

    #[test]
    fn test_number_match_local_needs_candidate() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let condition = Number::between(4, 4, planets());
        assert!(!condition.match_local(&ctx));
        assert!(condition.match_local(&ctx.with_candidate(object(&universe, 60))));
    }

    #[test]
    fn test_sort_key_required() {
        assert!(SortedNumberOf::new(1.into(), None, SortingMethod::Max, planets()).is_err());
        assert!(SortedNumberOf::new(1.into(), None, SortingMethod::Random, planets()).is_ok());
    }

    #[test]
    fn test_max_and_min() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let max = SortedNumberOf::new(1.into(), x_key(), SortingMethod::Max, planets()).unwrap();
        assert_eq!(matching_ids(&max, &ctx), vec![21]);
        let min = SortedNumberOf::new(2.into(), x_key(), SortingMethod::Min, planets()).unwrap();
        assert_eq!(matching_ids(&min, &ctx), vec![11, 12]);
    }

    #[test]
    fn test_mode_prefers_most_frequent_value() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        // planet x values: 0, 0, 20, 10
        let mode = SortedNumberOf::new(2.into(), x_key(), SortingMethod::Mode, planets()).unwrap();
        assert_eq!(matching_ids(&mode, &ctx), vec![11, 12]);
        let mode = SortedNumberOf::new(3.into(), x_key(), SortingMethod::Mode, planets()).unwrap();
        // the remaining classes have one member each; the larger value goes first
        assert_eq!(matching_ids(&mode, &ctx), vec![11, 12, 21]);
    }

    #[test]
    fn test_random_cardinality() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let two = matching_ids(&SortedNumberOf::random(2, planets()), &ctx);
        assert_eq!(two.len(), 2);
        assert!(two.iter().all(|id| [11, 12, 21, 31].contains(id)));
        assert_eq!(matching_ids(&SortedNumberOf::random(10, planets()), &ctx), vec![11, 12, 21, 31]);
        assert!(matching_ids(&SortedNumberOf::random(0, planets()), &ctx).is_empty());
    }

    #[test]
    fn test_matches_domain_keeps_only_selected() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let max = SortedNumberOf::new(1.into(), x_key(), SortingMethod::Max, planets()).unwrap();

        let mut matches: ObjectSet = universe.objects().iter().collect();
        let mut non_matches = Vec::new();
        max.eval(&ctx, &mut matches, &mut non_matches, SearchDomain::Matches);
        assert_eq!(ids(&matches), vec![21]);
        assert_eq!(non_matches.len(), universe.objects().len() - 1);
    }

    #[test]
    fn test_non_matches_domain_leaves_matches_alone() {
        let universe = fixture();
        let rng = rng();
        let ctx = ScriptingContext::new(&universe, &rng);
        let max = SortedNumberOf::new(1.into(), x_key(), SortingMethod::Max, planets()).unwrap();

        // Qo'noS already matched, so the largest x among the remainder is not taken
        let mut matches = vec![object(&universe, 21), object(&universe, 60)];
        let mut non_matches = vec![object(&universe, 11), object(&universe, 31), object(&universe, 1)];
        max.eval(&ctx, &mut matches, &mut non_matches, SearchDomain::NonMatches);
        assert_eq!(ids(&matches), vec![21, 60]);
        assert_eq!(ids(&non_matches), vec![1, 11, 31]);
    }

    #[test]
    fn test_dump() {
        let number = Number::between(2, 2, planets());
        assert_eq!(number.dump(), "Number low = 2 high = 2 condition =\n    Planet\n");
        let max = SortedNumberOf::new(3.into(), x_key(), SortingMethod::Max, planets()).unwrap();
        assert_eq!(
            max.dump(),
            "MaximumNumberOf number = 3 sortby = LocalCandidate.X condition =\n    Planet\n"
        );
    }
}
