//! In-memory tile store.
//!
//! Tracks, per world, which tiles have ever been generated and which are
//! currently resident. Used by the simulated server and by tests to verify
//! that every tile of a region is materialized exactly once and released.

use crate::error::TileError;
use crate::host::{TileHost, WorldDirectory, WorldRef};
use crate::region::TilePos;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default, Clone)]
struct WorldTiles {
    generated: HashSet<TilePos>,
    resident: HashSet<TilePos>,
    saved: HashSet<TilePos>,
    materialize_counts: HashMap<TilePos, u32>,
}

/// Counters across all worlds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TileStats {
    pub materialize_calls: u64,
    pub release_calls: u64,
    pub peak_resident: usize,
}

#[derive(Debug, Default)]
pub struct MemoryWorlds {
    worlds: BTreeMap<WorldRef, WorldTiles>,
    failures: HashSet<(WorldRef, TilePos)>,
    stats: TileStats,
}

impl MemoryWorlds {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let worlds = names
            .into_iter()
            .map(|name| (WorldRef::new(name), WorldTiles::default()))
            .collect();
        Self {
            worlds,
            failures: HashSet::new(),
            stats: TileStats::default(),
        }
    }

    /// Make the next materialization of `pos` in `world` fail once.
    pub fn fail_once(&mut self, world: &WorldRef, pos: TilePos) {
        self.failures.insert((world.clone(), pos));
    }

    pub fn stats(&self) -> TileStats {
        self.stats
    }

    pub fn generated_count(&self, world: &WorldRef) -> usize {
        self.worlds.get(world).map_or(0, |w| w.generated.len())
    }

    pub fn resident_count(&self, world: &WorldRef) -> usize {
        self.worlds.get(world).map_or(0, |w| w.resident.len())
    }

    pub fn is_generated(&self, world: &WorldRef, pos: TilePos) -> bool {
        self.worlds
            .get(world)
            .is_some_and(|w| w.generated.contains(&pos))
    }

    pub fn is_saved(&self, world: &WorldRef, pos: TilePos) -> bool {
        self.worlds.get(world).is_some_and(|w| w.saved.contains(&pos))
    }

    /// Number of times `pos` was materialized.
    pub fn materialize_count(&self, world: &WorldRef, pos: TilePos) -> u32 {
        self.worlds
            .get(world)
            .and_then(|w| w.materialize_counts.get(&pos).copied())
            .unwrap_or(0)
    }

    fn total_resident(&self) -> usize {
        self.worlds.values().map(|w| w.resident.len()).sum()
    }
}

impl TileHost for MemoryWorlds {
    fn materialize(&mut self, world: &WorldRef, pos: TilePos) -> Result<(), TileError> {
        self.stats.materialize_calls += 1;
        if self.failures.remove(&(world.clone(), pos)) {
            return Err(TileError::Materialize {
                world: world.to_string(),
                x: pos.x,
                z: pos.z,
                reason: "injected failure".to_string(),
            });
        }
        let tiles = self
            .worlds
            .get_mut(world)
            .ok_or_else(|| TileError::Materialize {
                world: world.to_string(),
                x: pos.x,
                z: pos.z,
                reason: "world is not loaded".to_string(),
            })?;
        tiles.generated.insert(pos);
        tiles.resident.insert(pos);
        *tiles.materialize_counts.entry(pos).or_insert(0) += 1;

        let resident = self.total_resident();
        self.stats.peak_resident = self.stats.peak_resident.max(resident);
        Ok(())
    }

    fn release(
        &mut self,
        world: &WorldRef,
        pos: TilePos,
        save: bool,
        _safe: bool,
    ) -> Result<(), TileError> {
        self.stats.release_calls += 1;
        let tiles = self.worlds.get_mut(world).ok_or_else(|| TileError::Release {
            world: world.to_string(),
            x: pos.x,
            z: pos.z,
            reason: "world is not loaded".to_string(),
        })?;
        if tiles.resident.remove(&pos) && save {
            tiles.saved.insert(pos);
        }
        Ok(())
    }
}

impl WorldDirectory for MemoryWorlds {
    fn world(&self, name: &str) -> Option<WorldRef> {
        self.worlds.keys().find(|w| w.name() == name).cloned()
    }

    fn world_names(&self) -> Vec<String> {
        self.worlds.keys().map(|w| w.name().to_string()).collect()
    }
}
