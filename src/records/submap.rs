use crate::records::{name_from_bytes, packed_record};

packed_record! {
    /// Sub-map (scene) catalog entry
    pub struct SubMapInfo {
        pub id: i16,
        pub name: [u8; 10],
        pub exit_music: i16,
        pub entry_music: i16,
        /// Sub-map reached through the jump cells, -1 for none
        pub jump_submap: i16,
        /// 0 open, 1 locked, 2 needs a fast team member
        pub enter_condition: i16,
        pub main_entry_y1: i16,
        pub main_entry_x1: i16,
        pub main_entry_y2: i16,
        pub main_entry_x2: i16,
        pub entry_y: i16,
        pub entry_x: i16,
        pub exit_y: [i16; 3],
        pub exit_x: [i16; 3],
        pub jump_y1: i16,
        pub jump_x1: i16,
        pub jump_y2: i16,
        pub jump_x2: i16,
    }
}

/// Entry rule decoded from `enter_condition`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRule {
    Open,
    Locked,
    NeedsSpeed(i16),
}

/// Speed a team member needs for condition 2 sub-maps
pub const ENTRY_SPEED: i16 = 70;

impl SubMapInfo {
    pub fn name(&self) -> String {
        name_from_bytes(&self.name)
    }

    pub fn entry_rule(&self) -> EntryRule {
        match self.enter_condition {
            0 => EntryRule::Open,
            2 => EntryRule::NeedsSpeed(ENTRY_SPEED),
            _ => EntryRule::Locked,
        }
    }

    pub fn is_exit(&self, x: i16, y: i16) -> bool {
        self.exit_x
            .iter()
            .zip(self.exit_y.iter())
            .any(|(&ex, &ey)| ex == x && ey == y && ex > 0)
    }
}
