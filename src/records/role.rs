use crate::records::{name_from_bytes, packed_record};
use crate::sentinel::Slot;

/// Number of skill slots per character
pub const SKILL_SLOTS: usize = 10;
/// Items a character carries when recruited
pub const CARRY_SLOTS: usize = 4;

packed_record! {
    /// A character in the roster. The id doubles as the roster index.
    pub struct Role {
        pub id: i16,
        pub head_id: i16,
        /// HP gained per level
        pub hp_per_level: i16,
        pub unused: i16,
        pub name: [u8; 10],
        pub nick: [u8; 10],
        /// 0 male, 1 female, 2 other
        pub sex: i16,
        pub level: i16,
        pub exp: i16,
        pub hp: i16,
        pub max_hp: i16,
        pub hurt: i16,
        pub poisoned: i16,
        pub stamina: i16,
        pub exp_for_item: i16,
        /// Weapon and armour item ids, -1 when empty
        pub equip: [i16; 2],
        pub frames: [i16; 6],
        pub mp_type: i16,
        pub mp: i16,
        pub max_mp: i16,
        pub attack: i16,
        pub speed: i16,
        pub defence: i16,
        pub medic: i16,
        pub poison: i16,
        pub depoison: i16,
        pub anti_poison: i16,
        pub fist: i16,
        pub sword: i16,
        pub blade: i16,
        pub unusual: i16,
        pub hidden_weapon: i16,
        pub knowledge: i16,
        pub integrity: i16,
        pub attack_poison: i16,
        pub attack_twice: i16,
        pub reputation: i16,
        pub potential: i16,
        pub practice_item: i16,
        pub exp_for_book: i16,
        pub skills: [i16; 10],
        pub skill_levels: [i16; 10],
        pub carry_items: [i16; 4],
        pub carry_counts: [i16; 4],
    }
}

impl Role {
    pub fn name(&self) -> String {
        name_from_bytes(&self.name)
    }

    pub fn is_female(&self) -> bool {
        self.sex == 1
    }

    /// Equipped item ids with empty slots filtered out
    pub fn equipped(&self) -> impl Iterator<Item = i16> + '_ {
        self.equip.iter().filter_map(|&e| Slot::from_raw(e).id())
    }

    /// Slot index holding `skill`, if known
    pub fn skill_slot(&self, skill: i16) -> Option<usize> {
        self.skills.iter().position(|&s| s == skill && s > 0)
    }

    pub fn first_free_skill_slot(&self) -> Option<usize> {
        self.skills.iter().position(|&s| s <= 0)
    }

    /// Carried items with a positive count, as (item, count)
    pub fn carried(&self) -> Vec<(i16, i16)> {
        self.carry_items
            .iter()
            .zip(self.carry_counts.iter())
            .filter(|(&item, &count)| item >= 0 && count > 0)
            .map(|(&item, &count)| (item, count))
            .collect()
    }
}
