//! Scalar expressions used as condition parameters
//!
//! A value reference is either a constant, the current turn, a property of
//! one of the context objects, or arithmetic over other references. Its
//! invariance tells conditions whether it can be evaluated once per pass.

pub mod property;

use std::fmt;

use crate::condition::context::ScriptingContext;
use crate::condition::invariance::Invariants;
use crate::core::types::{DesignId, EmpireId, ObjectId};
use crate::universe::{ObjectType, PlanetEnvironment, PlanetSize, PlanetType, StarType};

pub use property::{Property, PropertyValue};

/// Which context object a variable reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    Source,
    EffectTarget,
    LocalCandidate,
    RootCandidate,
}

impl ReferenceType {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceType::Source => "Source",
            ReferenceType::EffectTarget => "Target",
            ReferenceType::LocalCandidate => "LocalCandidate",
            ReferenceType::RootCandidate => "RootCandidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
}

/// Types a value reference can produce
pub trait RefValue: Clone + fmt::Debug + Send + Sync + 'static {
    fn from_property(value: PropertyValue) -> Option<Self>;

    fn describe(&self) -> String;

    /// Arithmetic; only numeric types support it
    fn apply(_op: OpType, _lhs: Self, _rhs: Self) -> Option<Self> {
        None
    }
}

impl RefValue for i32 {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Int(v) => Some(v),
            PropertyValue::Real(v) => Some(v as i32),
            PropertyValue::Object(id) => Some(id.0),
            PropertyValue::Empire(id) => Some(id.0),
            PropertyValue::Design(id) => Some(id.0),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn apply(op: OpType, lhs: Self, rhs: Self) -> Option<Self> {
        match op {
            OpType::Add => lhs.checked_add(rhs),
            OpType::Sub => lhs.checked_sub(rhs),
            OpType::Mul => lhs.checked_mul(rhs),
            OpType::Div => lhs.checked_div(rhs),
            OpType::Min => Some(lhs.min(rhs)),
            OpType::Max => Some(lhs.max(rhs)),
        }
    }
}

impl RefValue for f64 {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Int(v) => Some(v as f64),
            PropertyValue::Real(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn apply(op: OpType, lhs: Self, rhs: Self) -> Option<Self> {
        let result = match op {
            OpType::Add => lhs + rhs,
            OpType::Sub => lhs - rhs,
            OpType::Mul => lhs * rhs,
            OpType::Div if rhs == 0.0 => return None,
            OpType::Div => lhs / rhs,
            OpType::Min => lhs.min(rhs),
            OpType::Max => lhs.max(rhs),
        };
        Some(result)
    }
}

impl RefValue for String {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

impl RefValue for ObjectId {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Object(id) => Some(id),
            PropertyValue::Int(v) => Some(ObjectId(v)),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl RefValue for EmpireId {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Empire(id) => Some(id),
            PropertyValue::Int(v) => Some(EmpireId(v)),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl RefValue for DesignId {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Design(id) => Some(id),
            PropertyValue::Int(v) => Some(DesignId(v)),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl RefValue for ObjectType {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::ObjectType(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl RefValue for PlanetType {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::PlanetType(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

impl RefValue for PlanetSize {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::PlanetSize(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

impl RefValue for StarType {
    fn from_property(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::StarType(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

impl RefValue for PlanetEnvironment {
    fn from_property(_value: PropertyValue) -> Option<Self> {
        None
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

#[derive(Debug, Clone)]
pub enum ValueRef<T: RefValue> {
    Constant(T),
    CurrentTurn,
    Variable {
        reference: ReferenceType,
        property: Property,
    },
    Operation {
        op: OpType,
        lhs: Box<ValueRef<T>>,
        rhs: Box<ValueRef<T>>,
    },
}

impl<T: RefValue> ValueRef<T> {
    pub fn variable(reference: ReferenceType, property: Property) -> Self {
        ValueRef::Variable {
            reference,
            property,
        }
    }

    pub fn operation(op: OpType, lhs: ValueRef<T>, rhs: ValueRef<T>) -> Self {
        ValueRef::Operation {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate in a context; `None` if a referenced object is absent or the
    /// property does not apply to it
    pub fn eval(&self, ctx: &ScriptingContext<'_>) -> Option<T> {
        match self {
            ValueRef::Constant(value) => Some(value.clone()),
            ValueRef::CurrentTurn => T::from_property(PropertyValue::Int(ctx.current_turn())),
            ValueRef::Variable {
                reference,
                property,
            } => {
                let obj = match reference {
                    ReferenceType::Source => ctx.source,
                    ReferenceType::EffectTarget => ctx.effect_target,
                    ReferenceType::LocalCandidate => ctx.local_candidate,
                    ReferenceType::RootCandidate => ctx.root_candidate,
                };
                let Some(obj) = obj else {
                    tracing::debug!(reference = reference.name(), "Referenced object not set");
                    return None;
                };
                T::from_property(property::read(obj, *property, ctx.universe)?)
            }
            ValueRef::Operation { op, lhs, rhs } => T::apply(*op, lhs.eval(ctx)?, rhs.eval(ctx)?),
        }
    }

    pub fn is_constant(&self) -> bool {
        match self {
            ValueRef::Constant(_) => true,
            ValueRef::CurrentTurn | ValueRef::Variable { .. } => false,
            ValueRef::Operation { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
        }
    }

    pub fn invariance(&self) -> Invariants {
        match self {
            ValueRef::Constant(_) | ValueRef::CurrentTurn => Invariants::ALL,
            ValueRef::Variable { reference, .. } => {
                let mut inv = Invariants::ALL;
                match reference {
                    ReferenceType::Source => inv.source = false,
                    ReferenceType::EffectTarget => inv.target = false,
                    ReferenceType::LocalCandidate => inv.local_candidate = false,
                    ReferenceType::RootCandidate => inv.root_candidate = false,
                }
                inv
            }
            ValueRef::Operation { lhs, rhs, .. } => lhs.invariance() & rhs.invariance(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            ValueRef::Constant(value) => value.describe(),
            ValueRef::CurrentTurn => "CurrentTurn".to_string(),
            ValueRef::Variable {
                reference,
                property,
            } => format!("{}.{}", reference.name(), property.name()),
            ValueRef::Operation { op, lhs, rhs } => {
                let (l, r) = (lhs.description(), rhs.description());
                match op {
                    OpType::Add => format!("({l} + {r})"),
                    OpType::Sub => format!("({l} - {r})"),
                    OpType::Mul => format!("({l} * {r})"),
                    OpType::Div => format!("({l} / {r})"),
                    OpType::Min => format!("min({l}, {r})"),
                    OpType::Max => format!("max({l}, {r})"),
                }
            }
        }
    }
}

impl<T: RefValue> From<T> for ValueRef<T> {
    fn from(value: T) -> Self {
        ValueRef::Constant(value)
    }
}

/// Invariance of an optional parameter; absent parameters depend on nothing
pub fn opt_invariance<T: RefValue>(value: &Option<ValueRef<T>>) -> Invariants {
    value.as_ref().map_or(Invariants::ALL, ValueRef::invariance)
}

/// Invariance of a parameter list
pub fn all_invariance<T: RefValue>(values: &[ValueRef<T>]) -> Invariants {
    values
        .iter()
        .fold(Invariants::ALL, |acc, v| acc & v.invariance())
}

/// `Some(None)` for an absent parameter, `None` when present but unresolved
pub fn eval_opt<T: RefValue>(
    value: &Option<ValueRef<T>>,
    ctx: &ScriptingContext<'_>,
) -> Option<Option<T>> {
    match value {
        None => Some(None),
        Some(v) => v.eval(ctx).map(Some),
    }
}

/// Description of an optional parameter, or `fallback` when absent
pub fn opt_description<T: RefValue>(value: &Option<ValueRef<T>>, fallback: &str) -> String {
    value
        .as_ref()
        .map_or_else(|| fallback.to_string(), ValueRef::description)
}

/// Evaluate every entry of a parameter list, dropping unresolved ones
pub fn eval_all<T: RefValue>(values: &[ValueRef<T>], ctx: &ScriptingContext<'_>) -> Vec<T> {
    values.iter().filter_map(|v| v.eval(ctx)).collect()
}

/// Descriptions of every entry of a parameter list
pub fn descriptions<T: RefValue>(values: &[ValueRef<T>]) -> Vec<String> {
    values.iter().map(ValueRef::description).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::seeded_rng;
    use crate::universe::{ObjectKind, Universe, UniverseObject};
    use std::cell::RefCell;

    #[test]
    fn test_constant_and_turn() {
        let universe = Universe::new(12);
        let rng = RefCell::new(seeded_rng());
        let ctx = ScriptingContext::new(&universe, &rng);

        assert_eq!(ValueRef::Constant(3).eval(&ctx), Some(3));
        assert_eq!(ValueRef::<i32>::CurrentTurn.eval(&ctx), Some(12));
        assert_eq!(ValueRef::<f64>::CurrentTurn.eval(&ctx), Some(12.0));
    }

    #[test]
    fn test_variable_reads_referenced_object() {
        let universe = Universe::new(1);
        let rng = RefCell::new(seeded_rng());
        let source = UniverseObject::new(ObjectId(5), "Src", ObjectKind::Field).at(2.0, 3.0);
        let ctx = ScriptingContext::new(&universe, &rng);

        let x: ValueRef<f64> = ValueRef::variable(ReferenceType::Source, Property::X);
        assert_eq!(x.eval(&ctx), None);
        assert_eq!(x.eval(&ctx.with_source(&source)), Some(2.0));
    }

    #[test]
    fn test_operation_arithmetic() {
        let universe = Universe::new(10);
        let rng = RefCell::new(seeded_rng());
        let ctx = ScriptingContext::new(&universe, &rng);

        let sum = ValueRef::operation(OpType::Add, ValueRef::CurrentTurn, ValueRef::Constant(5));
        assert_eq!(sum.eval(&ctx), Some(15));
        let div = ValueRef::operation(OpType::Div, ValueRef::Constant(4), ValueRef::Constant(0));
        assert_eq!(div.eval(&ctx), None);
        let max = ValueRef::operation(OpType::Max, ValueRef::Constant(2.5), ValueRef::Constant(1.0));
        assert_eq!(max.eval(&ctx), Some(2.5));
    }

    #[test]
    fn test_invariance_tracks_references() {
        let local: ValueRef<f64> = ValueRef::variable(ReferenceType::LocalCandidate, Property::X);
        let root: ValueRef<f64> = ValueRef::variable(ReferenceType::RootCandidate, Property::X);
        assert!(!local.invariance().local_candidate);
        assert!(local.invariance().root_candidate);

        let both = ValueRef::operation(OpType::Add, local, root);
        let inv = both.invariance();
        assert!(!inv.local_candidate);
        assert!(!inv.root_candidate);
        assert!(inv.source);
        assert!(inv.target);
        assert!(!both.is_constant());
        assert!(ValueRef::Constant(1.0).invariance() == Invariants::ALL);
    }

    #[test]
    fn test_description() {
        let owner: ValueRef<EmpireId> = ValueRef::variable(ReferenceType::Source, Property::Owner);
        assert_eq!(owner.description(), "Source.Owner");
        let sum = ValueRef::operation(OpType::Sub, ValueRef::CurrentTurn, ValueRef::Constant(2));
        assert_eq!(sum.description(), "(CurrentTurn - 2)");
    }
}
