use crate::records::{name_from_bytes, packed_record};

packed_record! {
    /// An item catalog entry
    pub struct Item {
        pub id: i16,
        pub name: [u8; 20],
        pub intro: [u8; 30],
        /// Skill taught by this item, -1 for none
        pub skill: i16,
        pub hidden_weapon_anim: i16,
        /// Role currently using or practising it, -1 for none
        pub user: i16,
        /// 0 weapon, 1 armour, -1 not equippable
        pub equip_type: i16,
        pub show_intro: i16,
        /// 0 plot, 1 equipment, 2 manual, 3 consumable, 4 hidden weapon
        pub item_type: i16,
        pub unused: [i16; 3],
        pub add_hp: i16,
        pub add_max_hp: i16,
        pub add_poisoned: i16,
        pub add_stamina: i16,
        pub change_mp_type: i16,
        pub add_mp: i16,
        pub add_max_mp: i16,
        pub add_attack: i16,
        pub add_speed: i16,
        pub add_defence: i16,
        pub add_medic: i16,
        pub add_poison: i16,
        pub add_depoison: i16,
        pub add_anti_poison: i16,
        pub add_fist: i16,
        pub add_sword: i16,
        pub add_blade: i16,
        pub add_unusual: i16,
        pub add_hidden_weapon: i16,
        pub add_knowledge: i16,
        pub add_integrity: i16,
        pub add_attack_twice: i16,
        pub add_attack_poison: i16,
        pub only_role: i16,
        pub need_mp_type: i16,
        pub need_mp: i16,
        pub need_attack: i16,
        pub need_speed: i16,
        pub need_poison: i16,
        pub need_medic: i16,
        pub need_depoison: i16,
        pub need_fist: i16,
        pub need_sword: i16,
        pub need_blade: i16,
        pub need_unusual: i16,
        pub need_hidden_weapon: i16,
        pub need_potential: i16,
        pub need_exp: i16,
        pub need_exp_for_item: i16,
        pub need_material: i16,
        pub products: [i16; 5],
        pub product_counts: [i16; 5],
    }
}

impl Item {
    pub fn name(&self) -> String {
        name_from_bytes(&self.name)
    }
}
