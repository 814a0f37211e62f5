//! Value objects - Immutable objects defined by their attributes

mod dice;
mod era;
mod gender;

pub use dice::{
    spread, DiceError, DiceExpression, DiceTerm, DieSpec, FixedTerm, D10, D100, D3, D4, D5, D6,
    D8, ROLL_2D6_PLUS_6, ROLL_3D6,
};
pub use era::Era;
pub use gender::Gender;
