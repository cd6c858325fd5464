use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a collision group. Up to 32 groups are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolidTag(u8);

impl SolidTag {
    pub const MAX_TAGS: u8 = 32;

    /// Group every solid joins unless told otherwise.
    pub const DEFAULT: Self = Self(0);

    /// Returns `None` when `index` is outside `0..MAX_TAGS`.
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::MAX_TAGS {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    const fn bit(self) -> u32 {
        1 << self.0
    }
}

impl Default for SolidTag {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SolidTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag{}", self.0)
    }
}

/// Set of [`SolidTag`]s stored as a bit mask, iterated in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TagSet(u32);

impl TagSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn single(tag: SolidTag) -> Self {
        Self(tag.bit())
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn with(mut self, tag: SolidTag) -> Self {
        self.insert(tag);
        self
    }

    pub fn insert(&mut self, tag: SolidTag) {
        self.0 |= tag.bit();
    }

    pub fn remove(&mut self, tag: SolidTag) {
        self.0 &= !tag.bit();
    }

    pub fn contains(self, tag: SolidTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: TagSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: TagSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn intersects(self, other: TagSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn iter(self) -> impl Iterator<Item = SolidTag> {
        (0..SolidTag::MAX_TAGS)
            .map(SolidTag)
            .filter(move |tag| self.contains(*tag))
    }
}

impl From<SolidTag> for TagSet {
    fn from(tag: SolidTag) -> Self {
        Self::single(tag)
    }
}

impl FromIterator<SolidTag> for TagSet {
    fn from_iter<I: IntoIterator<Item = SolidTag>>(iter: I) -> Self {
        iter.into_iter().fold(TagSet::EMPTY, TagSet::with)
    }
}
