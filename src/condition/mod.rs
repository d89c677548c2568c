//! Condition trees: composable predicates that partition object sets
//!
//! Every node moves objects between a `matches` and a `non_matches` set.
//! The `SearchDomain` says which of the two is under test; objects in the
//! other set are never looked at. Combinators exploit this to short-circuit.

#[macro_use]
mod leaf;

pub mod affiliation;
pub mod chance;
pub mod combinators;
pub mod context;
pub mod describe;
pub mod design;
pub mod invariance;
pub mod meter;
pub mod object;
pub mod partition;
pub mod planet;
pub mod production;
pub mod selection;
pub mod spatial;
pub mod supply;
pub mod turn;

#[cfg(test)]
mod testing;

use std::fmt;

use crate::universe::UniverseObject;

pub use affiliation::{
    Affiliation, EmpireAffiliation, ExploredByEmpire, OwnerHasBuildingTypeAvailable,
    OwnerHasShipDesignAvailable, OwnerHasTech, ProducedByEmpire, VisibleToEmpire,
};
pub use chance::Chance;
pub use combinators::{All, And, NoneOf, Not, Or};
pub use context::ScriptingContext;
pub use design::{
    DesignHasHull, DesignHasPart, DesignHasPartClass, NumberedShipDesign, PredefinedShipDesign,
};
pub use invariance::Invariants;
pub use meter::{
    EmpireMeterValue, EmpireStockpileValue, MeterValue, ShipPartMeterValue, ValueTest,
};
pub use object::{
    Armed, Building, Capital, HasSpecial, HasTag, Homeworld, Monster, ObjectIdIs,
    OrderedBombarded, RootCandidate, Source, Stationary, Target, Type,
};
pub use planet::{
    CanColonize, CanProduceShips, FocusType, PlanetEnvironment, PlanetSize, PlanetType, Species,
    StarType,
};
pub use production::Enqueued;
pub use selection::{Number, SortedNumberOf, SortingMethod};
pub use spatial::{
    CanAddStarlaneConnection, ContainedBy, Contains, InSystem, WithinDistance, WithinStarlaneJumps,
};
pub use supply::{FleetSupplyableByEmpire, ResourceSupplyConnectedByEmpire};
pub use turn::{CreatedOnTurn, Turn};

/// Unordered, duplicate-free collection of object handles
pub type ObjectSet<'a> = Vec<&'a UniverseObject>;

/// Which of the two sets passed to `eval` is under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDomain {
    Matches,
    NonMatches,
}

/// A node of a condition tree
pub trait Condition: fmt::Debug + Send + Sync {
    /// Partition objects between `matches` and `non_matches`.
    ///
    /// Only objects of the set named by `domain` are tested and possibly
    /// moved; every object ends up in exactly one of the two sets.
    fn eval<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        matches: &mut ObjectSet<'a>,
        non_matches: &mut ObjectSet<'a>,
        domain: SearchDomain,
    ) {
        partition::eval_each(self, ctx, matches, non_matches, domain);
    }

    /// Test `local.local_candidate`; a context without one never matches
    fn match_local(&self, local: &ScriptingContext<'_>) -> bool;

    /// All objects matching, starting from [`initial_candidates`](Self::initial_candidates)
    fn eval_all<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        let mut non_matches = self.initial_candidates(ctx);
        let mut matches = Vec::with_capacity(non_matches.len());
        self.eval(ctx, &mut matches, &mut non_matches, SearchDomain::NonMatches);
        matches
    }

    /// Matches among a caller-supplied pool
    fn eval_candidates<'a>(
        &self,
        ctx: &ScriptingContext<'a>,
        candidates: ObjectSet<'a>,
    ) -> ObjectSet<'a> {
        let mut non_matches = candidates;
        let mut matches = Vec::with_capacity(non_matches.len());
        self.eval(ctx, &mut matches, &mut non_matches, SearchDomain::NonMatches);
        matches
    }

    fn matches_one<'a>(&self, ctx: &ScriptingContext<'a>, candidate: &'a UniverseObject) -> bool {
        let mut matches = Vec::with_capacity(1);
        let mut non_matches = vec![candidate];
        self.eval(ctx, &mut matches, &mut non_matches, SearchDomain::NonMatches);
        non_matches.is_empty()
    }

    fn invariance(&self) -> Invariants;

    fn is_root_invariant(&self) -> bool {
        self.invariance().root_candidate
    }

    fn is_target_invariant(&self) -> bool {
        self.invariance().target
    }

    fn is_source_invariant(&self) -> bool {
        self.invariance().source
    }

    /// A cheap superset of the objects this node can match
    fn initial_candidates<'a>(&self, ctx: &ScriptingContext<'a>) -> ObjectSet<'a> {
        ctx.universe.objects().iter().collect()
    }

    fn description(&self, negated: bool) -> String;

    /// Script-like rendering at an indentation level, newline terminated
    fn dump_at(&self, indent: usize) -> String;

    fn dump(&self) -> String {
        self.dump_at(0)
    }
}

/// Test a node whose only evaluation path is `eval` against one candidate
pub(crate) fn match_via_eval<C: Condition + ?Sized>(
    condition: &C,
    name: &'static str,
    local: &ScriptingContext<'_>,
) -> bool {
    match local.local_candidate {
        Some(candidate) => condition.matches_one(local, candidate),
        None => {
            tracing::error!(condition = name, "Match requested without a candidate object");
            false
        }
    }
}
