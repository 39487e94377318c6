use crate::records::packed_record;

packed_record! {
    /// Stock of one shop: five item lines
    pub struct Shop {
        pub items: [i16; 5],
        pub counts: [i16; 5],
        pub prices: [i16; 5],
    }
}
