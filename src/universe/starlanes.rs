//! Starlane graph queries

use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use super::object::{ObjectKind, UniverseObject};
use super::Universe;
use crate::core::config::config;
use crate::core::error::{EngineError, Result};
use crate::core::types::ObjectId;

impl Universe {
    /// Join two systems with a starlane (undirected)
    pub fn add_starlane(&mut self, a: ObjectId, b: ObjectId) -> Result<()> {
        for id in [a, b] {
            let is_system = self.objects.get(id).is_some_and(|obj| obj.as_system().is_some());
            if !is_system {
                return Err(EngineError::ObjectNotFound(id));
            }
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(ObjectKind::System(data)) = self.objects.get_mut(from).map(|obj| &mut obj.kind) {
                data.lanes.insert(to);
            }
        }
        Ok(())
    }

    fn lanes_of(&self, system_id: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .get(system_id)
            .and_then(|obj| obj.as_system())
            .into_iter()
            .flat_map(|system| system.lanes.iter().copied())
    }

    /// Breadth-first shortest starlane path between two systems, both ends included
    pub fn shortest_path(&self, start: ObjectId, goal: ObjectId) -> Option<Vec<ObjectId>> {
        if self.objects.get(start)?.as_system().is_none()
            || self.objects.get(goal)?.as_system().is_none()
        {
            return None;
        }

        if start == goal {
            return Some(vec![start]);
        }

        let mut came_from: AHashMap<ObjectId, ObjectId> = AHashMap::new();
        let mut visited: AHashSet<ObjectId> = AHashSet::new();
        let mut frontier = VecDeque::new();
        visited.insert(start);
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            if current == goal {
                let mut path = vec![goal];
                let mut step = goal;
                while let Some(&prev) = came_from.get(&step) {
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in self.lanes_of(current) {
                if visited.insert(neighbor) {
                    came_from.insert(neighbor, current);
                    frontier.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Number of starlane jumps between two systems, `None` when unconnected
    pub fn jump_distance(&self, a: ObjectId, b: ObjectId) -> Option<u32> {
        self.shortest_path(a, b).map(|path| (path.len() - 1) as u32)
    }

    /// Systems an object can be said to sit at: its own system, or for a
    /// fleet (or ship in a fleet) travelling between systems, both ends of
    /// the lane it is on.
    pub(crate) fn lane_anchors(&self, obj: &UniverseObject) -> Vec<ObjectId> {
        if obj.system_id.is_valid() {
            return vec![obj.system_id];
        }
        if obj.as_system().is_some() {
            return vec![obj.id];
        }
        let fleet = match obj.as_ship() {
            Some(ship) => self.object(ship.fleet_id).and_then(|f| f.as_fleet()),
            None => obj.as_fleet(),
        };
        fleet
            .map(|f| {
                [f.prev_system, f.next_system]
                    .into_iter()
                    .filter(|id| id.is_valid())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every system at most `limit` jumps from one of `sources`, with its
    /// jump count from the nearest source. One search covers all sources.
    pub fn systems_within_jumps<'o>(
        &self,
        sources: impl IntoIterator<Item = &'o UniverseObject>,
        limit: u32,
    ) -> AHashMap<ObjectId, u32> {
        let mut reached: AHashMap<ObjectId, u32> = AHashMap::new();
        let mut frontier = VecDeque::new();
        for obj in sources {
            for anchor in self.lane_anchors(obj) {
                let is_system = self.objects.get(anchor).is_some_and(|o| o.as_system().is_some());
                if is_system && reached.insert(anchor, 0).is_none() {
                    frontier.push_back((anchor, 0));
                }
            }
        }

        while let Some((current, jumps)) = frontier.pop_front() {
            if jumps >= limit {
                continue;
            }
            for neighbor in self.lanes_of(current) {
                if let Entry::Vacant(slot) = reached.entry(neighbor) {
                    slot.insert(jumps + 1);
                    frontier.push_back((neighbor, jumps + 1));
                }
            }
        }
        reached
    }

    /// Fewest jumps between two objects; unreachable pairs count as
    /// `many_jumps` from the engine config.
    pub fn jumps_between_objects(&self, a: &UniverseObject, b: &UniverseObject) -> u32 {
        let many_jumps = config().many_jumps;
        let anchors_a = self.lane_anchors(a);
        let anchors_b = self.lane_anchors(b);

        anchors_a
            .iter()
            .flat_map(|&from| anchors_b.iter().map(move |&to| (from, to)))
            .filter_map(|(from, to)| self.jump_distance(from, to))
            .min()
            .unwrap_or(many_jumps)
    }
}
