use crate::records::{name_from_bytes, packed_record};

packed_record! {
    /// A martial-art skill
    pub struct Skill {
        pub id: i16,
        pub name: [u8; 10],
        pub unused: [i16; 5],
        pub sound: i16,
        pub skill_type: i16,
        pub animation: i16,
        pub hurt_type: i16,
        pub attack_area_type: i16,
        pub mp_cost: i16,
        pub poison: i16,
        pub attack: [i16; 10],
        pub move_distance: [i16; 10],
        pub attack_distance: [i16; 10],
        pub add_mp: [i16; 10],
        pub hurt_mp: [i16; 10],
    }
}

impl Skill {
    pub fn name(&self) -> String {
        name_from_bytes(&self.name)
    }
}
