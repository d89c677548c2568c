//! Evaluation context threaded through condition trees

use std::cell::RefCell;
use std::fmt;

use crate::core::config::EvalRng;
use crate::core::types::{ObjectId, Turn};
use crate::universe::{Universe, UniverseObject};

/// Immutable, copyable record of the objects an evaluation is relative to
///
/// Children derive their context with [`with_candidate`](Self::with_candidate)
/// or [`without_candidate`](Self::without_candidate); nothing else changes
/// between parent and child.
#[derive(Clone, Copy)]
pub struct ScriptingContext<'a> {
    pub universe: &'a Universe,
    pub rng: &'a RefCell<EvalRng>,
    pub source: Option<&'a UniverseObject>,
    pub effect_target: Option<&'a UniverseObject>,
    pub root_candidate: Option<&'a UniverseObject>,
    pub local_candidate: Option<&'a UniverseObject>,
}

impl<'a> ScriptingContext<'a> {
    pub fn new(universe: &'a Universe, rng: &'a RefCell<EvalRng>) -> Self {
        Self {
            universe,
            rng,
            source: None,
            effect_target: None,
            root_candidate: None,
            local_candidate: None,
        }
    }

    pub fn with_source(mut self, source: &'a UniverseObject) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: &'a UniverseObject) -> Self {
        self.effect_target = Some(target);
        self
    }

    /// Context for testing one candidate. The first candidate tested in a
    /// nested evaluation becomes the root for everything below it.
    pub fn with_candidate(&self, candidate: &'a UniverseObject) -> Self {
        Self {
            local_candidate: Some(candidate),
            root_candidate: self.root_candidate.or(Some(candidate)),
            ..*self
        }
    }

    /// Context for a subcondition that picks its own candidates
    pub fn without_candidate(&self) -> Self {
        Self {
            local_candidate: None,
            ..*self
        }
    }

    pub fn current_turn(&self) -> Turn {
        self.universe.current_turn()
    }

    pub fn object(&self, id: ObjectId) -> Option<&'a UniverseObject> {
        self.universe.object(id)
    }
}

impl fmt::Debug for ScriptingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = |obj: Option<&UniverseObject>| obj.map(|o| o.id);
        f.debug_struct("ScriptingContext")
            .field("source", &id(self.source))
            .field("effect_target", &id(self.effect_target))
            .field("root_candidate", &id(self.root_candidate))
            .field("local_candidate", &id(self.local_candidate))
            .finish()
    }
}
