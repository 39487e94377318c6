use crate::records::{decode_table, packed_record, Packed, EVENT_SLOTS, GRID_SIZE, LAYER_COUNT};
use crate::sentinel::Slot;
use byteorder::{ByteOrder, LittleEndian};

/// Tile layers of a sub-map, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Earth = 0,
    Building = 1,
    Decoration = 2,
    /// Cell → event-object id, -1 when the cell has none
    Event = 3,
    BuildingHeight = 4,
    DecorationHeight = 5,
}

impl Layer {
    pub fn from_index(index: i16) -> Option<Layer> {
        match index {
            0 => Some(Layer::Earth),
            1 => Some(Layer::Building),
            2 => Some(Layer::Decoration),
            3 => Some(Layer::Event),
            4 => Some(Layer::BuildingHeight),
            5 => Some(Layer::DecorationHeight),
            _ => None,
        }
    }
}

const CELLS_PER_LAYER: usize = GRID_SIZE * GRID_SIZE;

/// Six 64×64 layers of one sub-map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGrid {
    cells: Vec<i16>,
}

impl Default for LayerGrid {
    fn default() -> Self {
        LayerGrid::blank()
    }
}

impl LayerGrid {
    /// All layers zero except the event layer, which is empty (-1)
    pub fn blank() -> Self {
        let mut cells = vec![0; LAYER_COUNT * CELLS_PER_LAYER];
        let event = Layer::Event as usize * CELLS_PER_LAYER;
        cells[event..event + CELLS_PER_LAYER].fill(-1);
        LayerGrid { cells }
    }

    fn offset(layer: Layer, x: i16, y: i16) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < GRID_SIZE)?;
        let y = usize::try_from(y).ok().filter(|&y| y < GRID_SIZE)?;
        Some(layer as usize * CELLS_PER_LAYER + y * GRID_SIZE + x)
    }

    pub fn in_bounds(x: i16, y: i16) -> bool {
        Self::offset(Layer::Earth, x, y).is_some()
    }

    pub fn get(&self, layer: Layer, x: i16, y: i16) -> Option<i16> {
        Self::offset(layer, x, y).map(|i| self.cells[i])
    }

    /// Set a cell; out-of-range coordinates are ignored. Returns whether anything changed.
    pub fn set(&mut self, layer: Layer, x: i16, y: i16, value: i16) -> bool {
        match Self::offset(layer, x, y) {
            Some(i) if self.cells[i] != value => {
                self.cells[i] = value;
                true
            }
            _ => false,
        }
    }

    /// Event-object id placed on a cell
    pub fn event_at(&self, x: i16, y: i16) -> Option<i16> {
        self.get(Layer::Event, x, y)
            .and_then(|v| Slot::from_raw(v).id())
    }

    /// Replace every `old` in a layer with `new`, returning the touched cells
    pub fn replace_all(&mut self, layer: Layer, old: i16, new: i16) -> Vec<(i16, i16)> {
        let base = layer as usize * CELLS_PER_LAYER;
        let mut touched = Vec::new();
        for (i, cell) in self.cells[base..base + CELLS_PER_LAYER].iter_mut().enumerate() {
            if *cell == old {
                *cell = new;
                touched.push(((i % GRID_SIZE) as i16, (i / GRID_SIZE) as i16));
            }
        }
        touched
    }
}

impl Packed for LayerGrid {
    const SIZE: usize = LAYER_COUNT * CELLS_PER_LAYER * 2;

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut cells = vec![0; LAYER_COUNT * CELLS_PER_LAYER];
        LittleEndian::read_i16_into(&bytes[..Self::SIZE], &mut cells);
        Some(LayerGrid { cells })
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.resize(start + Self::SIZE, 0);
        LittleEndian::write_i16_into(&self.cells, &mut out[start..]);
    }
}

packed_record! {
    /// A scripted object placed on a sub-map cell
    pub struct EventObject {
        /// Non-zero blocks movement onto the cell
        pub blocked: i16,
        pub index: i16,
        /// Script ids for interact, use-item and step-onto triggers
        pub scripts: [i16; 3],
        pub curr_tex: i16,
        pub end_tex: i16,
        pub beg_tex: i16,
        pub tex_delay: i16,
        pub x: i16,
        pub y: i16,
    }
}

impl EventObject {
    pub fn is_blocking(&self) -> bool {
        self.blocked != 0
    }

    /// Script linked to a trigger slot, when one is set
    pub fn script(&self, slot: usize) -> Option<i16> {
        self.scripts.get(slot).copied().filter(|&s| s > 0)
    }

    pub fn has_ambient_animation(&self) -> bool {
        self.beg_tex > 0 && self.end_tex > self.beg_tex
    }
}

/// The 200 event-object slots of one sub-map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTable {
    objects: Vec<EventObject>,
}

impl Default for EventTable {
    fn default() -> Self {
        EventTable {
            objects: vec![EventObject::default(); EVENT_SLOTS],
        }
    }
}

impl EventTable {
    pub fn get(&self, id: i16) -> Option<&EventObject> {
        usize::try_from(id).ok().and_then(|i| self.objects.get(i))
    }

    pub fn get_mut(&mut self, id: i16) -> Option<&mut EventObject> {
        usize::try_from(id).ok().and_then(move |i| self.objects.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i16, &EventObject)> {
        self.objects.iter().enumerate().map(|(i, e)| (i as i16, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (i16, &mut EventObject)> {
        self.objects
            .iter_mut()
            .enumerate()
            .map(|(i, e)| (i as i16, e))
    }
}

impl Packed for EventTable {
    const SIZE: usize = EVENT_SLOTS * EventObject::SIZE;

    fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(EventTable {
            objects: decode_table(&bytes[..Self::SIZE]),
        })
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        for object in &self.objects {
            object.write_to(out);
        }
    }
}
