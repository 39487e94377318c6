//! Character and inventory mutation library
//!
//! Pure functions over roster records. Nothing here suspends or talks to the
//! frontend; the opcode handlers decide whether a change deserves a notice.

use crate::records::role::SKILL_SLOTS;
use crate::records::{Item, RecordTable, Role};

pub const MAX_LEVEL: i16 = 30;
pub const MAX_HP: i16 = 999;
pub const MAX_MP: i16 = 999;
pub const STAMINA_MAX: i16 = 100;
pub const POISONED_MAX: i16 = 100;
pub const HURT_MAX: i16 = 100;
pub const ATTACK_MAX: i16 = 100;
pub const SPEED_MAX: i16 = 100;
pub const DEFENCE_MAX: i16 = 100;
pub const INTEGRITY_MAX: i16 = 100;
pub const REPUTATION_MAX: i16 = 999;
pub const POTENTIAL_MAX: i16 = 100;
pub const SKILL_LEVEL_MAX: i16 = 999;
/// Skill level gained when a known skill is learned again
pub const SKILL_LEVEL_STEP: i16 = 100;

/// Experience needed to leave each level (index 0 = level 1)
pub const EXP_TABLE: [i16; 29] = [
    50, 150, 300, 500, 750, 1050, 1400, 1800, 2250, 2750, 3850, 5050, 6350, 7750, 9250, 10850,
    12550, 14350, 16250, 18250, 20350, 22550, 24850, 27250, 29750, 32350, 32500, 32600, 32700,
];

/// Experience required to advance from `level`, None at the cap or for invalid levels
pub fn exp_for_level(level: i16) -> Option<i16> {
    if level < 1 || level >= MAX_LEVEL {
        return None;
    }
    EXP_TABLE.get(level as usize - 1).copied()
}

/// Stats that scripts can raise with a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Speed,
    Attack,
    MaxHp,
    MaxMp,
    Integrity,
    Reputation,
    Potential,
}

impl Stat {
    pub fn label(self) -> &'static str {
        match self {
            Stat::Speed => "Speed",
            Stat::Attack => "Attack",
            Stat::MaxHp => "Max HP",
            Stat::MaxMp => "Max MP",
            Stat::Integrity => "Integrity",
            Stat::Reputation => "Reputation",
            Stat::Potential => "Potential",
        }
    }

    fn bounds(self) -> (i16, i16) {
        match self {
            Stat::Speed => (0, SPEED_MAX),
            Stat::Attack => (0, ATTACK_MAX),
            Stat::MaxHp => (1, MAX_HP),
            Stat::MaxMp => (0, MAX_MP),
            Stat::Integrity => (0, INTEGRITY_MAX),
            Stat::Reputation => (0, REPUTATION_MAX),
            Stat::Potential => (1, POTENTIAL_MAX),
        }
    }

    fn field(self, role: &mut Role) -> &mut i16 {
        match self {
            Stat::Speed => &mut role.speed,
            Stat::Attack => &mut role.attack,
            Stat::MaxHp => &mut role.max_hp,
            Stat::MaxMp => &mut role.max_mp,
            Stat::Integrity => &mut role.integrity,
            Stat::Reputation => &mut role.reputation,
            Stat::Potential => &mut role.potential,
        }
    }
}

fn clamp_add(value: i16, delta: i16, lo: i16, hi: i16) -> i16 {
    (value as i32 + delta as i32).clamp(lo as i32, hi as i32) as i16
}

/// Add to a stat within its bounds, returning the change actually applied.
/// Raising max HP or MP also raises the current value by the same amount.
pub fn add_stat(role: &mut Role, stat: Stat, delta: i16) -> i16 {
    let (lo, hi) = stat.bounds();
    let field = stat.field(role);
    let before = *field;
    *field = clamp_add(before, delta, lo, hi);
    let applied = *field - before;
    match stat {
        Stat::MaxHp => role.hp = clamp_add(role.hp, applied, 0, role.max_hp),
        Stat::MaxMp => role.mp = clamp_add(role.mp, applied, 0, role.max_mp),
        _ => {}
    }
    applied
}

/// Heal `target` by the caster's medic skill. Returns the HP actually restored,
/// or None when either id is out of range.
pub fn apply_medic(
    roles: &mut RecordTable<Role>,
    caster: i16,
    target: i16,
    stamina_cost: i16,
) -> Option<i16> {
    let medic = roles.get(caster)?.medic;
    let t = roles.get_mut(target)?;
    let before = t.hp;
    t.hp = clamp_add(t.hp, medic, 0, t.max_hp);
    let delta = t.hp - before;
    spend_stamina(roles, caster, stamina_cost);
    Some(delta)
}

/// Reduce `target`'s poisoning by a third of the caster's depoison skill.
/// Returns the (negative or zero) change in poisoning.
pub fn apply_depoison(
    roles: &mut RecordTable<Role>,
    caster: i16,
    target: i16,
    stamina_cost: i16,
) -> Option<i16> {
    let depoison = roles.get(caster)?.depoison;
    let t = roles.get_mut(target)?;
    let before = t.poisoned;
    t.poisoned = clamp_add(t.poisoned, -(depoison / 3), 0, POISONED_MAX);
    let delta = t.poisoned - before;
    spend_stamina(roles, caster, stamina_cost);
    Some(delta)
}

/// Poison `target` with the caster's poison skill, reduced by the target's resistance
pub fn apply_poison(
    roles: &mut RecordTable<Role>,
    caster: i16,
    target: i16,
    stamina_cost: i16,
) -> Option<i16> {
    let poison = roles.get(caster)?.poison;
    let t = roles.get_mut(target)?;
    let amount = (poison - t.anti_poison).max(0) / 3;
    let before = t.poisoned;
    t.poisoned = clamp_add(t.poisoned, amount, 0, POISONED_MAX);
    let delta = t.poisoned - before;
    spend_stamina(roles, caster, stamina_cost);
    Some(delta)
}

fn spend_stamina(roles: &mut RecordTable<Role>, caster: i16, cost: i16) {
    if cost > 0 {
        if let Some(c) = roles.get_mut(caster) {
            c.stamina = clamp_add(c.stamina, -cost, 0, STAMINA_MAX);
        }
    }
}

/// Take damage, returning the HP actually lost
pub fn apply_damage(role: &mut Role, amount: i16) -> i16 {
    let before = role.hp;
    role.hp = clamp_add(role.hp, -amount.max(0), 0, role.max_hp);
    before - role.hp
}

/// Full recovery used by the rest opcode
pub fn rest(role: &mut Role) {
    role.hp = role.max_hp;
    role.mp = role.max_mp;
    role.stamina = STAMINA_MAX;
    role.hurt = 0;
    role.poisoned = 0;
}

/// Apply as many level-ups as the role's experience allows. Returns levels gained.
pub fn level_up(role: &mut Role) -> i16 {
    let mut gained = 0;
    while let Some(need) = exp_for_level(role.level) {
        if role.exp < need {
            break;
        }
        role.level += 1;
        gained += 1;
        let hp_gain = role.hp_per_level * 3;
        let mp_gain = role.potential / 10 + 5;
        let combat_gain = role.potential / 15 + 1;
        add_stat(role, Stat::MaxHp, hp_gain);
        add_stat(role, Stat::MaxMp, mp_gain);
        add_stat(role, Stat::Attack, combat_gain);
        add_stat(role, Stat::Speed, combat_gain);
        role.defence = clamp_add(role.defence, combat_gain, 0, DEFENCE_MAX);
        rest(role);
    }
    gained
}

/// Outcome of teaching a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Learned {
    /// Placed into a new slot
    New(usize),
    /// Already known, level raised
    Improved(usize),
    /// All slots taken
    NoSlot,
}

pub fn learn_skill(role: &mut Role, skill: i16) -> Learned {
    if let Some(slot) = role.skill_slot(skill) {
        role.skill_levels[slot] = clamp_add(role.skill_levels[slot], SKILL_LEVEL_STEP, 0, SKILL_LEVEL_MAX);
        return Learned::Improved(slot);
    }
    match role.first_free_skill_slot() {
        Some(slot) => {
            role.skills[slot] = skill;
            role.skill_levels[slot] = 0;
            Learned::New(slot)
        }
        None => Learned::NoSlot,
    }
}

/// Overwrite a skill slot. Out-of-range slots are ignored.
pub fn set_skill(role: &mut Role, slot: i16, skill: i16, level: i16) -> bool {
    match usize::try_from(slot).ok().filter(|&s| s < SKILL_SLOTS) {
        Some(s) => {
            role.skills[s] = skill;
            role.skill_levels[s] = level.clamp(0, SKILL_LEVEL_MAX);
            true
        }
        None => false,
    }
}

/// Display colour for an MP type: yin, yang and balanced
pub fn mp_type_color(mp_type: i16) -> (u8, u8, u8) {
    match mp_type {
        0 => (208, 152, 208),
        1 => (236, 200, 40),
        _ => (252, 252, 252),
    }
}

/// Totals contributed by equipped items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipBonus {
    pub attack: i16,
    pub defence: i16,
    pub speed: i16,
    pub medic: i16,
    pub depoison: i16,
    pub anti_poison: i16,
    pub attack_poison: i16,
}

pub fn equip_bonus(role: &Role, items: &RecordTable<Item>) -> EquipBonus {
    role.equipped()
        .filter_map(|id| items.get(id))
        .fold(EquipBonus::default(), |acc, item| EquipBonus {
            attack: acc.attack.saturating_add(item.add_attack),
            defence: acc.defence.saturating_add(item.add_defence),
            speed: acc.speed.saturating_add(item.add_speed),
            medic: acc.medic.saturating_add(item.add_medic),
            depoison: acc.depoison.saturating_add(item.add_depoison),
            anti_poison: acc.anti_poison.saturating_add(item.add_anti_poison),
            attack_poison: acc.attack_poison.saturating_add(item.add_attack_poison),
        })
}
