use glam::IVec2;
use rand::{Rng, seq::SliceRandom};
use strum::{Display, EnumIter};

// The four axis directions a passage can be carved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    // The unit grid delta for this direction. Y grows upward.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Left => IVec2::new(-1, 0),
            Direction::Up => IVec2::new(0, 1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, -1),
        }
    }
}

// All four directions in uniformly random order. Fisher-Yates via
// `SliceRandom::shuffle`, so every one of the 24 orderings is equally
// likely.
pub fn random_order(rng: &mut impl Rng) -> [Direction; 4] {
    let mut directions = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
    directions.shuffle(rng);
    directions
}
