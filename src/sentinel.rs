//! Wire sentinels decoded into explicit types
//!
//! Save files and event streams use `-1` for "no slot / none / current" and, in
//! event-object patches, `-2` for "leave unchanged". These types are the only
//! place those numbers are interpreted.

/// Raw value marking an empty slot
pub const EMPTY: i16 = -1;
/// Raw argument value meaning "keep the current field value"
pub const UNCHANGED: i16 = -2;

/// An id that may be the empty sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Id(i16),
}

impl Slot {
    /// Any negative value is treated as empty
    pub fn from_raw(raw: i16) -> Self {
        if raw < 0 {
            Slot::Empty
        } else {
            Slot::Id(raw)
        }
    }

    pub fn to_raw(self) -> i16 {
        match self {
            Slot::Empty => EMPTY,
            Slot::Id(id) => id,
        }
    }

    pub fn id(self) -> Option<i16> {
        match self {
            Slot::Empty => None,
            Slot::Id(id) => Some(id),
        }
    }
}

/// A field update read from a script argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    Unchanged,
    Set(i16),
}

impl Patch {
    pub fn from_raw(raw: i16) -> Self {
        if raw == UNCHANGED {
            Patch::Unchanged
        } else {
            Patch::Set(raw)
        }
    }

    /// Write the new value into `field` when one was given
    pub fn apply(self, field: &mut i16) {
        if let Patch::Set(v) = self {
            *field = v;
        }
    }
}

/// A target that is either named explicitly or "whatever is current"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Current,
    Id(i16),
}

impl Target {
    /// -1 (and the unchanged marker, which scripts also use here) selects the current one
    pub fn from_raw(raw: i16) -> Self {
        if raw < 0 {
            Target::Current
        } else {
            Target::Id(raw)
        }
    }

    pub fn resolve(self, current: i16) -> i16 {
        match self {
            Target::Current => current,
            Target::Id(id) => id,
        }
    }
}
