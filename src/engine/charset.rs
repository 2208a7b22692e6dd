/// First printable character. Every stats table is indexed relative to it.
pub const FIRST_PRINTABLE: u8 = b' ';
/// Last printable character (`~`). DEL and everything above is rejected.
pub const LAST_PRINTABLE: u8 = b'~';
pub const ALPHABET_SIZE: usize = (LAST_PRINTABLE - FIRST_PRINTABLE + 1) as usize;

/// Dense index of a printable ASCII character: `code - FIRST_PRINTABLE`.
///
/// Only constructible from an in-range character, so table lookups keyed by a
/// `CharIndex` never go out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharIndex(u8);

impl CharIndex {
    pub const SPACE: CharIndex = CharIndex(0);

    pub fn from_byte(byte: u8) -> Option<Self> {
        if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&byte) {
            Some(Self(byte - FIRST_PRINTABLE))
        } else {
            None
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        u8::try_from(ch).ok().and_then(Self::from_byte)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < ALPHABET_SIZE {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn byte(self) -> u8 {
        self.0 + FIRST_PRINTABLE
    }

    pub fn to_char(self) -> char {
        self.byte() as char
    }

    pub fn all() -> impl Iterator<Item = CharIndex> {
        (0..ALPHABET_SIZE as u8).map(CharIndex)
    }
}
