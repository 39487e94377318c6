//! The save aggregate: every packed table of one save slot
//!
//! A slot is three archives in one directory:
//! - `R{n}`: six records (base info, roles, items, sub-maps, skills, shops)
//! - `S{n}`: one layer grid per sub-map
//! - `D{n}`: one event table per sub-map
//!
//! `n` is empty for slot 0 (new-game defaults) and `1`..`3` for player saves.

use crate::archive::{self, Record};
use crate::records::{
    name_to_bytes, BaseInfo, EventObject, EventTable, Item, LayerGrid, Packed, RecordTable, Role,
    Shop, Skill, SubMapInfo,
};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Highest player save slot
pub const MAX_SLOT: u8 = 3;

const RECORD_COUNT: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveData {
    pub base: BaseInfo,
    pub roles: RecordTable<Role>,
    pub items: RecordTable<Item>,
    pub submaps: RecordTable<SubMapInfo>,
    pub skills: RecordTable<Skill>,
    pub shops: RecordTable<Shop>,
    /// Indexed by sub-map id
    pub layers: Vec<LayerGrid>,
    /// Indexed by sub-map id
    pub events: Vec<EventTable>,
}

/// The three archive base paths of a slot
pub fn slot_paths(dir: &Path, slot: u8) -> Result<(PathBuf, PathBuf, PathBuf), String> {
    if slot > MAX_SLOT {
        return Err(format!("Save slot {} out of range 0..={}", slot, MAX_SLOT));
    }
    let suffix = if slot == 0 {
        String::new()
    } else {
        slot.to_string()
    };
    Ok((
        dir.join(format!("R{suffix}")),
        dir.join(format!("S{suffix}")),
        dir.join(format!("D{suffix}")),
    ))
}

impl SaveData {
    /// A blank game with the given table sizes. Ids are filled in; everything else is zero
    /// and every team, bag and event-layer slot is empty.
    pub fn blank(roles: usize, items: usize, skills: usize, submaps: usize, shops: usize) -> Self {
        let roles = (0..roles)
            .map(|i| Role {
                id: i as i16,
                equip: [-1, -1],
                carry_items: [-1; 4],
                ..Default::default()
            })
            .collect();
        let items = (0..items)
            .map(|i| Item {
                id: i as i16,
                skill: -1,
                user: -1,
                equip_type: -1,
                only_role: -1,
                ..Default::default()
            })
            .collect();
        let skills = (0..skills)
            .map(|i| Skill {
                id: i as i16,
                ..Default::default()
            })
            .collect();
        let submap_infos = (0..submaps)
            .map(|i| SubMapInfo {
                id: i as i16,
                name: name_to_bytes(&format!("Scene {i}")),
                jump_submap: -1,
                ..Default::default()
            })
            .collect();
        SaveData {
            base: BaseInfo::blank(),
            roles: RecordTable::new(roles),
            items: RecordTable::new(items),
            submaps: RecordTable::new(submap_infos),
            skills: RecordTable::new(skills),
            shops: RecordTable::new(vec![Shop::default(); shops]),
            layers: vec![LayerGrid::blank(); submaps],
            events: vec![EventTable::default(); submaps],
        }
    }

    /// Load a slot from `dir`
    pub fn load(dir: &Path, slot: u8) -> Result<Self, String> {
        let (r, s, d) = slot_paths(dir, slot)?;
        let bundle = archive::load_base(&r)?;
        if bundle.len() < RECORD_COUNT {
            return Err(format!(
                "Save bundle {:?} has {} records, expected {}",
                r,
                bundle.len(),
                RECORD_COUNT
            ));
        }
        let base = BaseInfo::read_from(&bundle[0])
            .ok_or_else(|| format!("Base record in {:?} is truncated", r))?;

        let layers = archive::load_base(&s)?
            .iter()
            .map(|rec| LayerGrid::read_from(rec).unwrap_or_default())
            .collect();
        let events = archive::load_base(&d)?
            .iter()
            .map(|rec| EventTable::read_from(rec).unwrap_or_default())
            .collect();

        let save = SaveData {
            base,
            roles: RecordTable::from_bytes(&bundle[1]),
            items: RecordTable::from_bytes(&bundle[2]),
            submaps: RecordTable::from_bytes(&bundle[3]),
            skills: RecordTable::from_bytes(&bundle[4]),
            shops: RecordTable::from_bytes(&bundle[5]),
            layers,
            events,
        };
        if save.layers.len() != save.submaps.len() || save.events.len() != save.submaps.len() {
            warn!(
                "Slot {}: {} sub-maps but {} layer grids and {} event tables",
                slot,
                save.submaps.len(),
                save.layers.len(),
                save.events.len()
            );
        }
        info!(
            "Loaded slot {}: {} roles, {} items, {} skills, {} sub-maps",
            slot,
            save.roles.len(),
            save.items.len(),
            save.skills.len(),
            save.submaps.len()
        );
        Ok(save)
    }

    /// Replace `self` with slot contents. On failure `self` is left untouched.
    pub fn load_into(&mut self, dir: &Path, slot: u8) -> bool {
        match SaveData::load(dir, slot) {
            Ok(save) => {
                *self = save;
                true
            }
            Err(e) => {
                warn!("Failed to load slot {}: {}", slot, e);
                false
            }
        }
    }

    /// Write this aggregate as a slot in `dir`
    pub fn save(&self, dir: &Path, slot: u8) -> Result<(), String> {
        let (r, s, d) = slot_paths(dir, slot)?;
        let mut base = Vec::with_capacity(BaseInfo::SIZE);
        self.base.write_to(&mut base);
        let bundle: Vec<Record> = vec![
            base,
            self.roles.to_bytes(),
            self.items.to_bytes(),
            self.submaps.to_bytes(),
            self.skills.to_bytes(),
            self.shops.to_bytes(),
        ];
        archive::save_base(&r, &bundle)?;
        archive::save_base(&s, &packed_records(&self.layers))?;
        archive::save_base(&d, &packed_records(&self.events))?;
        info!("Saved slot {} to {:?}", slot, dir);
        Ok(())
    }

    pub fn layer(&self, submap: i16) -> Option<&LayerGrid> {
        usize::try_from(submap).ok().and_then(|i| self.layers.get(i))
    }

    pub fn layer_mut(&mut self, submap: i16) -> Option<&mut LayerGrid> {
        usize::try_from(submap)
            .ok()
            .and_then(move |i| self.layers.get_mut(i))
    }

    pub fn event_table(&self, submap: i16) -> Option<&EventTable> {
        usize::try_from(submap).ok().and_then(|i| self.events.get(i))
    }

    pub fn event_table_mut(&mut self, submap: i16) -> Option<&mut EventTable> {
        usize::try_from(submap)
            .ok()
            .and_then(move |i| self.events.get_mut(i))
    }

    pub fn event(&self, submap: i16, event: i16) -> Option<&EventObject> {
        self.event_table(submap)?.get(event)
    }

    pub fn event_mut(&mut self, submap: i16, event: i16) -> Option<&mut EventObject> {
        self.event_table_mut(submap)?.get_mut(event)
    }

    /// Team slot holding `role`
    pub fn team_slot(&self, role: i16) -> Option<usize> {
        self.base.team.iter().position(|&r| r == role && r >= 0)
    }

    /// Role in team slot 0, the protagonist
    pub fn lead_role(&self) -> Option<i16> {
        self.base.team_members().next()
    }
}

fn packed_records<T: Packed>(items: &[T]) -> Vec<Record> {
    items
        .iter()
        .map(|item| {
            let mut out = Vec::with_capacity(T::SIZE);
            item.write_to(&mut out);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Layer;
    use test_log::test;

    #[test]
    fn test_slot_names() {
        let dir = Path::new("/save");
        let (r, s, d) = slot_paths(dir, 0).unwrap();
        assert_eq!(r, dir.join("R"));
        assert_eq!(s, dir.join("S"));
        assert_eq!(d, dir.join("D"));
        let (r, _, _) = slot_paths(dir, 2).unwrap();
        assert_eq!(r, dir.join("R2"));
        assert!(slot_paths(dir, 4).is_err());
    }

    #[test]
    fn test_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut save = SaveData::blank(4, 10, 3, 2, 1);
        save.base.team[0] = 0;
        save.roles.get_mut(2).unwrap().attack = 33;
        save.layers[1].set(Layer::Event, 3, 3, 5);
        save.events[1].get_mut(5).unwrap().curr_tex = 900;

        save.save(dir.path(), 1).unwrap();
        let loaded = SaveData::load(dir.path(), 1).unwrap();

        assert_eq!(loaded, save);
    }

    #[test]
    fn test_failed_load_leaves_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut save = SaveData::blank(2, 2, 2, 1, 1);
        save.base.main_x = 77;
        assert!(!save.load_into(dir.path(), 3));
        assert_eq!(save.base.main_x, 77);
    }

    #[test]
    fn test_short_bundle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (r, _, _) = slot_paths(dir.path(), 1).unwrap();
        archive::save_base(&r, &[vec![0u8; 4]]).unwrap();
        assert!(SaveData::load(dir.path(), 1).is_err());
    }
}
