mod face_numbering;
mod permutation;
mod sign;

pub use face_numbering::*;
pub use permutation::*;
pub use sign::*;

pub use num_integer::binomial;
