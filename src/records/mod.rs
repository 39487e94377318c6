//! Packed record store
//!
//! Every save-file table is a flat array of fixed-size little-endian records. The field
//! order, width and signedness of each layout is the wire format, so layouts are
//! declared once with `packed_record!` and both directions are generated from that.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor};

pub mod base;
pub mod grid;
pub mod item;
pub mod role;
pub mod shop;
pub mod skill;
pub mod submap;

pub use base::BaseInfo;
pub use grid::{EventObject, EventTable, Layer, LayerGrid};
pub use item::Item;
pub use role::Role;
pub use shop::Shop;
pub use skill::Skill;
pub use submap::{EntryRule, SubMapInfo};

/// Side length of a sub-map grid in cells
pub const GRID_SIZE: usize = 64;
/// Number of tile layers per sub-map
pub const LAYER_COUNT: usize = 6;
/// Event-object slots per sub-map
pub const EVENT_SLOTS: usize = 200;
/// Inventory slots in the base record
pub const BAG_SLOTS: usize = 200;
/// Team roster slots
pub const TEAM_SLOTS: usize = 6;

/// A value with a fixed little-endian encoding
pub trait PackedField: Sized {
    const SIZE: usize;
    fn zeroed() -> Self;
    fn read_field(r: &mut Cursor<&[u8]>) -> io::Result<Self>;
    fn write_field(&self, w: &mut Vec<u8>);
}

impl PackedField for i16 {
    const SIZE: usize = 2;

    fn zeroed() -> Self {
        0
    }

    fn read_field(r: &mut Cursor<&[u8]>) -> io::Result<Self> {
        r.read_i16::<LittleEndian>()
    }

    fn write_field(&self, w: &mut Vec<u8>) {
        // Writing into a Vec never fails
        let _ = w.write_i16::<LittleEndian>(*self);
    }
}

impl PackedField for u8 {
    const SIZE: usize = 1;

    fn zeroed() -> Self {
        0
    }

    fn read_field(r: &mut Cursor<&[u8]>) -> io::Result<Self> {
        r.read_u8()
    }

    fn write_field(&self, w: &mut Vec<u8>) {
        w.push(*self);
    }
}

impl<T: PackedField + Copy, const N: usize> PackedField for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn zeroed() -> Self {
        [T::zeroed(); N]
    }

    fn read_field(r: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let mut out = [T::zeroed(); N];
        for slot in out.iter_mut() {
            *slot = T::read_field(r)?;
        }
        Ok(out)
    }

    fn write_field(&self, w: &mut Vec<u8>) {
        for v in self.iter() {
            v.write_field(w);
        }
    }
}

/// A whole record with a fixed size
pub trait Packed: Sized {
    const SIZE: usize;

    /// Decode from the start of `bytes`, None when fewer than SIZE bytes are available
    fn read_from(bytes: &[u8]) -> Option<Self>;

    fn write_to(&self, out: &mut Vec<u8>);
}

/// Declare a packed record: the struct, its Default (all zero) and its Packed impl
macro_rules! packed_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty ),*
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
                    $( $field: <$ty as $crate::records::PackedField>::zeroed() ),*
                }
            }
        }

        impl $crate::records::Packed for $name {
            const SIZE: usize = 0 $( + <$ty as $crate::records::PackedField>::SIZE )*;

            fn read_from(bytes: &[u8]) -> Option<Self> {
                if bytes.len() < Self::SIZE {
                    return None;
                }
                let mut r = std::io::Cursor::new(bytes);
                Some($name {
                    $( $field: <$ty as $crate::records::PackedField>::read_field(&mut r).ok()? ),*
                })
            }

            fn write_to(&self, out: &mut Vec<u8>) {
                $( $crate::records::PackedField::write_field(&self.$field, out); )*
            }
        }
    };
}

pub(crate) use packed_record;

/// Decode as many whole records as fit, discarding a trailing partial record
pub fn decode_table<T: Packed>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::SIZE).filter_map(T::read_from).collect()
}

pub fn encode_table<T: Packed>(items: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(items.len() * T::SIZE);
    for item in items {
        item.write_to(&mut out);
    }
    out
}

/// Read a NUL-terminated fixed-width name field
pub fn name_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Write a name into a fixed-width field, truncating and NUL padding
pub fn name_to_bytes<const N: usize>(name: &str) -> [u8; N] {
    let mut out = [0u8; N];
    for (dst, src) in out.iter_mut().zip(name.bytes()) {
        *dst = src;
    }
    out
}

/// A catalog indexed by id. Ids double as positions; anything outside `[0, len)` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable<T> {
    items: Vec<T>,
}

impl<T: Packed> RecordTable<T> {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        RecordTable {
            items: decode_table(bytes),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode_table(&self.items)
    }
}

impl<T> RecordTable<T> {
    pub fn new(items: Vec<T>) -> Self {
        RecordTable { items }
    }

    pub fn get(&self, id: i16) -> Option<&T> {
        usize::try_from(id).ok().and_then(|i| self.items.get(i))
    }

    pub fn get_mut(&mut self, id: i16) -> Option<&mut T> {
        usize::try_from(id).ok().and_then(move |i| self.items.get_mut(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    packed_record! {
        pub struct Pair {
            pub a: i16,
            pub b: [u8; 3],
        }
    }

    #[test]
    fn test_size_is_sum_of_fields() {
        assert_eq!(Pair::SIZE, 5);
        assert_eq!(Role::SIZE, 164);
        assert_eq!(EventObject::SIZE, 22);
        assert_eq!(BaseInfo::SIZE, 24 + 12 + 800);
    }

    #[test]
    fn test_fields_are_little_endian_in_order() {
        let p = Pair { a: -2, b: [7, 8, 9] };
        let mut out = Vec::new();
        p.write_to(&mut out);
        assert_eq!(out, vec![0xFE, 0xFF, 7, 8, 9]);
        assert_eq!(Pair::read_from(&out), Some(p));
    }

    #[test]
    fn test_trailing_partial_record_is_discarded() {
        let bytes = [1u8, 0, 1, 2, 3, 2, 0, 4, 5, 6, 9, 9];
        let pairs: Vec<Pair> = decode_table(&bytes);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].a, 2);
    }

    #[test]
    fn test_out_of_range_id_is_none() {
        let table = RecordTable::new(vec![Pair::default(), Pair::default()]);
        assert!(table.get(-1).is_none());
        assert!(table.get(2).is_none());
        assert!(table.get(1).is_some());
    }

    #[test]
    fn test_names_round_trip_through_fixed_fields() {
        let raw: [u8; 10] = name_to_bytes("Hu Fei");
        assert_eq!(name_from_bytes(&raw), "Hu Fei");
        let long: [u8; 4] = name_to_bytes("abcdefg");
        assert_eq!(name_from_bytes(&long), "abcd");
    }
}
