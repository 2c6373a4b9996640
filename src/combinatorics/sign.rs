/// Orientation of a simplex, or parity of a permutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
  #[default]
  Pos = 1,
  Neg = -1,
}

impl Sign {
  pub fn from_bool(b: bool) -> Self {
    match b {
      true => Self::Pos,
      false => Self::Neg,
    }
  }

  /// The sign of a permutation built from `n` transpositions.
  pub fn from_parity(n: usize) -> Self {
    Self::from_bool(n % 2 == 0)
  }

  pub fn as_i64(self) -> i64 {
    self as i64
  }

  pub fn is_pos(self) -> bool {
    self == Self::Pos
  }
  pub fn is_neg(self) -> bool {
    self == Self::Neg
  }
}

impl std::ops::Neg for Sign {
  type Output = Self;

  fn neg(self) -> Self::Output {
    Self::from_bool(self.is_neg())
  }
}
impl std::ops::Mul for Sign {
  type Output = Self;

  fn mul(self, other: Self) -> Self::Output {
    Self::from_bool(self == other)
  }
}

impl std::fmt::Display for Sign {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let c = match self {
      Sign::Pos => '+',
      Sign::Neg => '-',
    };
    write!(f, "{c}")
  }
}

/// Number of inversions of `a`, i.e. the number of adjacent swaps needed
/// to sort it.
pub fn count_inversions<T: Ord>(a: &[T]) -> usize {
  (0..a.len())
    .flat_map(|i| (i + 1..a.len()).map(move |j| (i, j)))
    .filter(|&(i, j)| a[i] > a[j])
    .count()
}

/// Sorts `a` in place and returns the sign of the sorting permutation.
pub fn sort_signed<T: Ord>(a: &mut [T]) -> Sign {
  let sign = Sign::from_parity(count_inversions(a));
  a.sort_unstable();
  sign
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn sign_algebra() {
    assert_eq!(Sign::Pos * Sign::Neg, Sign::Neg);
    assert_eq!(Sign::Neg * Sign::Neg, Sign::Pos);
    assert_eq!(-Sign::Pos, Sign::Neg);
    assert_eq!(Sign::from_parity(3), Sign::Neg);
    assert_eq!(Sign::Neg.to_string(), "-");
  }

  #[test]
  fn inversions() {
    assert_eq!(count_inversions(&[3, 2, 1, 0]), 6);
    let mut b = [1, 0, 2];
    assert_eq!(sort_signed(&mut b), Sign::Neg);
    assert_eq!(b, [0, 1, 2]);
    let mut c = [2, 0, 1];
    assert_eq!(sort_signed(&mut c), Sign::Pos);
  }
}
