use crate::records::{packed_record, BAG_SLOTS, TEAM_SLOTS};
use crate::sentinel::Slot;

packed_record! {
    /// Player-wide state: position, team roster and the inventory slots
    pub struct BaseInfo {
        pub in_ship: i16,
        /// Current sub-map id, -1 on the overworld
        pub in_submap: i16,
        pub main_x: i16,
        pub main_y: i16,
        pub sub_x: i16,
        pub sub_y: i16,
        pub facing: i16,
        pub ship_x: i16,
        pub ship_y: i16,
        pub ship_x1: i16,
        pub ship_y1: i16,
        pub ship_facing: i16,
        pub team: [i16; 6],
        /// (item id, count) pairs, item -1 when the slot is empty
        pub bag: [[i16; 2]; 200],
    }
}

impl BaseInfo {
    /// A fresh base record: overworld, empty team and bag
    pub fn blank() -> Self {
        BaseInfo {
            in_submap: -1,
            team: [-1; TEAM_SLOTS],
            bag: [[-1, 0]; BAG_SLOTS],
            ..Default::default()
        }
    }

    pub fn team_members(&self) -> impl Iterator<Item = i16> + '_ {
        self.team.iter().filter_map(|&r| Slot::from_raw(r).id())
    }

    pub fn current_submap(&self) -> Option<i16> {
        Slot::from_raw(self.in_submap).id()
    }
}
