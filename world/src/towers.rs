//! Authoritative tower state management.

use std::collections::BTreeMap;

use rampart_core::{CellCoord, TowerId, TowerKindId};

/// Mutable state of one placed tower.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKindId,
    pub(crate) cell: CellCoord,
    pub(crate) level: u32,
    /// Seconds until the tower may fire again; zero when ready.
    pub(crate) cooldown: f32,
}

impl TowerState {
    /// Builds an inactive slot for pool storage.
    pub(crate) fn inert() -> Self {
        Self {
            id: TowerId::new(0),
            kind: TowerKindId::new(0),
            cell: CellCoord::new(0, 0),
            level: 0,
            cooldown: 0.0,
        }
    }

    /// Re-initialises the slot for a fresh placement.
    pub(crate) fn activate(&mut self, id: TowerId, kind: TowerKindId, cell: CellCoord) {
        self.id = id;
        self.kind = kind;
        self.cell = cell;
        self.level = 1;
        self.cooldown = 0.0;
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: 0,
        }
    }

    /// Allocates the next tower identifier.
    pub(crate) fn allocate_id(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        id
    }

    pub(crate) fn insert(&mut self, state: TowerState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        self.entries.remove(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Iterator over tower states in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Reports whether any tower occupies the provided cell.
    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|tower| tower.cell == cell)
    }

    /// Empties the registry, yielding the stored states for pooling.
    ///
    /// Identifier allocation keeps running so recycled registries never
    /// reissue an id.
    pub(crate) fn drain(&mut self) -> Vec<TowerState> {
        let entries = std::mem::take(&mut self.entries);
        entries.into_values().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
