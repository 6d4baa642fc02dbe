use std::fmt::{Display, Formatter, Result as FmtResult};

/// A compass bearing between two fused rings.
///
/// Bearings count in eighths of a turn, counter-clockwise, with 0 pointing right
/// (east) and 4 pointing left. `-4` and `4` both mean "behind" and are stored as `4`,
/// so a bearing is always in `-3..=4`.
///
/// Hexagons only ever use the bearings 0, 1, 3, 4, -3 and -1. Those six form their
/// own wheel, each step a turn of sixty degrees, so composing two hexagonal bearings
/// never yields the vertical bearings 2 and -2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Direction(i8);

/// The six hexagonal bearings in wheel order.
const HEX_WHEEL: [i8; 6] = [0, 1, 3, 4, -3, -1];

impl Direction {
    pub const EAST: Direction = Direction(0);
    pub const WEST: Direction = Direction(4);

    pub fn new(value: i8) -> Self {
        Self(wrap(value as i32))
    }

    pub fn value(&self) -> i8 {
        self.0
    }

    /// The bearing pointing the other way.
    pub fn opposite(&self) -> Self {
        match self.0 {
            0 => Direction(4),
            4 => Direction(0),
            d if d > 0 => Direction(d - 4),
            d => Direction(d + 4),
        }
    }

    fn hex_index(&self) -> Option<usize> {
        HEX_WHEEL.iter().position(|&d| d == self.0)
    }

    /// Compose a bearing relative to `self` into an absolute one.
    pub fn combine(&self, relative: Direction) -> Self {
        match (self.hex_index(), relative.hex_index()) {
            (Some(a), Some(b)) => Direction(HEX_WHEEL[(a + b) % 6]),
            _ => Direction::new(self.0 + relative.0),
        }
    }

    /// Turn this bearing so that `axis` becomes east.
    pub fn rotate(&self, axis: Direction) -> Self {
        self.combine(Direction::new(-axis.0))
    }

    /// A bearing and its opposite describe the same axis; this picks the one in `0..=3`.
    pub fn axis(&self) -> Self {
        if self.0 < 0 || self.0 == 4 {
            self.opposite()
        } else {
            *self
        }
    }

    /// Is this one of the vertical bearings, i.e. an elongated edge of a drawn ring?
    pub fn is_vertical(&self) -> bool {
        self.0.abs() == 2
    }

    /// The grid step taken when moving one ring along this bearing.
    pub fn delta(&self) -> (i32, i32) {
        match self.0 {
            0 => (2, 0),
            1 => (1, 1),
            2 => (0, 2),
            3 => (-1, 1),
            4 => (-2, 0),
            -3 => (-1, -1),
            -2 => (0, -2),
            _ => (1, -1),
        }
    }
}

fn wrap(value: i32) -> i8 {
    // Into -3..=4
    ((value + 3).rem_euclid(8) - 3) as i8
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
