use super::{sort_signed, Sign};

use std::{cmp::Ordering, fmt};

pub const fn factorial(num: usize) -> usize {
  let mut prod = 1;
  let mut i = 2;
  while i <= num {
    prod *= i;
    i += 1;
  }
  prod
}

/// Number of bits needed to store one image of a permutation on `n` elements.
const fn image_bits(n: usize) -> u32 {
  let mut bits = 1;
  while (1usize << bits) < n {
    bits += 1;
  }
  bits
}

/// A permutation of the fixed set `{0, ..., N-1}`.
///
/// The state is a single packed integer code: image `i` is stored in bits
/// `[i*B, (i+1)*B)` where `B` is the smallest bit width able to hold `N-1`.
/// For `N = 4` this is 2 bits per image (the identity has code 228),
/// for `N = 5` this is 3 bits per image.
///
/// Permutations are immutable values, all operations return new values.
/// Composition follows function composition: `(p * q).image(i) == p.image(q.image(i))`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Perm<const N: usize> {
  code: u64,
}

impl<const N: usize> Perm<N> {
  /// The number of permutations on `N` elements.
  pub const NPERMS: usize = factorial(N);

  const BITS: u32 = image_bits(N);
  const MASK: u64 = (1 << Self::BITS) - 1;
  const SUPPORTED: () = assert!(N >= 1 && N <= 16, "Perm supports 1 to 16 elements.");

  fn pack(images: &[usize; N]) -> Self {
    let () = Self::SUPPORTED;
    let code = images
      .iter()
      .enumerate()
      .fold(0, |code, (i, &img)| code | ((img as u64) << (i as u32 * Self::BITS)));
    Self { code }
  }

  fn is_bijection(images: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &img in images {
      if img >= N || seen[img] {
        return false;
      }
      seen[img] = true;
    }
    true
  }
}

/// constructors
impl<const N: usize> Perm<N> {
  pub fn identity() -> Self {
    Self::pack(&std::array::from_fn(|i| i))
  }

  /// The permutation swapping `a` and `b`. If `a == b` this is the identity.
  pub fn transposition(a: usize, b: usize) -> Self {
    assert!(a < N && b < N, "Transposition elements out of range.");
    let mut images: [usize; N] = std::array::from_fn(|i| i);
    images.swap(a, b);
    Self::pack(&images)
  }

  /// Builds the permutation mapping `i` to `images[i]`.
  ///
  /// Panics if `images` is not a bijection of `{0, ..., N-1}`.
  pub fn from_images(images: [usize; N]) -> Self {
    assert!(
      Self::is_bijection(&images),
      "Images {images:?} do not form a permutation."
    );
    Self::pack(&images)
  }
  pub fn try_from_images(images: [usize; N]) -> Option<Self> {
    Self::is_bijection(&images).then(|| Self::pack(&images))
  }

  pub fn from_perm_code(code: u64) -> Self {
    debug_assert!(Self::is_perm_code(code), "Invalid permutation code {code}.");
    Self { code }
  }
  pub fn is_perm_code(code: u64) -> bool {
    let used_bits = N as u32 * Self::BITS;
    if used_bits < 64 && code >> used_bits != 0 {
      return false;
    }
    let images = std::array::from_fn(|i| ((code >> (i as u32 * Self::BITS)) & Self::MASK) as usize);
    Self::is_bijection(&images)
  }

  /// The permutation at position `index` of the sign-alternating enumeration
  /// of all permutations.
  ///
  /// `sn(i)` is even iff `i` is even. Position `a * (N-1)! + j` holds the
  /// permutation mapping `0` to `a`, followed by entry `j` (or `j ^ 1` if `a`
  /// is odd) of the same enumeration applied to the remaining elements.
  pub fn sn(index: usize) -> Self {
    Self::unrank(index, true)
  }

  /// The permutation at position `index` of the lexicographic enumeration
  /// (ordered by image sequence) of all permutations.
  pub fn ordered_sn(index: usize) -> Self {
    Self::unrank(index, false)
  }

  fn unrank(index: usize, alternating: bool) -> Self {
    assert!(index < Self::NPERMS, "Permutation index {index} out of range.");
    let mut remaining: Vec<usize> = (0..N).collect();
    let mut images = [0; N];
    let mut i = index;
    for (k, image) in images.iter_mut().enumerate() {
      let block = factorial(N - 1 - k);
      let a = i / block;
      let mut j = i % block;
      if alternating && a % 2 == 1 && block >= 2 {
        j ^= 1;
      }
      *image = remaining.remove(a);
      i = j;
    }
    Self::pack(&images)
  }

  /// All permutations in [`Self::sn`] order.
  pub fn all() -> impl Iterator<Item = Self> {
    (0..Self::NPERMS).map(Self::sn)
  }
  /// All permutations in lexicographic order.
  pub fn all_ordered() -> impl Iterator<Item = Self> {
    (0..Self::NPERMS).map(Self::ordered_sn)
  }
}

/// queries
impl<const N: usize> Perm<N> {
  pub fn perm_code(self) -> u64 {
    self.code
  }

  pub fn image(self, source: usize) -> usize {
    debug_assert!(source < N);
    ((self.code >> (source as u32 * Self::BITS)) & Self::MASK) as usize
  }
  pub fn pre_image(self, image: usize) -> usize {
    debug_assert!(image < N);
    (0..N)
      .find(|&i| self.image(i) == image)
      .unwrap_or_else(|| unreachable!("Perm code always decodes to a bijection."))
  }
  pub fn images(self) -> [usize; N] {
    std::array::from_fn(|i| self.image(i))
  }

  pub fn inverse(self) -> Self {
    let mut inv = [0; N];
    for (i, img) in self.images().into_iter().enumerate() {
      inv[img] = i;
    }
    Self::pack(&inv)
  }

  pub fn sign(self) -> Sign {
    let mut images = self.images();
    sort_signed(&mut images)
  }
  pub fn is_even(self) -> bool {
    self.sign().is_pos()
  }

  pub fn is_identity(self) -> bool {
    self == Self::identity()
  }

  /// The permutation `q` with `q.image(i) == self.image(N - 1 - i)`.
  pub fn reverse(self) -> Self {
    Self::pack(&std::array::from_fn(|i| self.image(N - 1 - i)))
  }

  /// Number of later images smaller than each image (the Lehmer code).
  fn lehmer(self) -> [usize; N] {
    let images = self.images();
    std::array::from_fn(|k| images[k + 1..].iter().filter(|&&j| j < images[k]).count())
  }

  /// The position of `self` in [`Self::sn`].
  pub fn sn_index(self) -> usize {
    let ranks = self.lehmer();
    let mut idx = 0;
    for k in (0..N).rev() {
      let block = factorial(N - 1 - k);
      let tail = if ranks[k] % 2 == 1 && block >= 2 {
        idx ^ 1
      } else {
        idx
      };
      idx = ranks[k] * block + tail;
    }
    idx
  }

  /// The position of `self` in [`Self::ordered_sn`].
  pub fn ordered_sn_index(self) -> usize {
    self
      .lehmer()
      .into_iter()
      .enumerate()
      .map(|(k, r)| r * factorial(N - 1 - k))
      .sum()
  }

  /// Embeds `self` into a larger symmetric group, fixing the extra elements.
  pub fn extend<const M: usize>(self) -> Perm<M> {
    assert!(M >= N, "Cannot extend a permutation to fewer elements.");
    Perm::pack(&std::array::from_fn(|i| if i < N { self.image(i) } else { i }))
  }

  /// Restricts `self` to its first `M` elements.
  ///
  /// Returns `None` unless `self` maps `{0, ..., M-1}` onto itself.
  pub fn try_contract<const M: usize>(self) -> Option<Perm<M>> {
    assert!(M <= N, "Cannot contract a permutation to more elements.");
    let images: [usize; M] = std::array::from_fn(|i| self.image(i));
    images.iter().all(|&img| img < M).then(|| Perm::pack(&images))
  }
  pub fn contract<const M: usize>(self) -> Perm<M> {
    self
      .try_contract()
      .unwrap_or_else(|| panic!("{self} does not preserve the first {M} elements."))
  }

  /// The images of the first `len` elements as a string.
  pub fn trunc(self, len: usize) -> String {
    self.to_string().chars().take(len).collect()
  }
}

impl<const N: usize> Default for Perm<N> {
  fn default() -> Self {
    Self::identity()
  }
}

impl<const N: usize> std::ops::Mul for Perm<N> {
  type Output = Self;

  fn mul(self, other: Self) -> Self::Output {
    Self::pack(&std::array::from_fn(|i| self.image(other.image(i))))
  }
}

/// Lexicographic comparison of the image sequences.
impl<const N: usize> Ord for Perm<N> {
  fn cmp(&self, other: &Self) -> Ordering {
    self.images().cmp(&other.images())
  }
}
impl<const N: usize> PartialOrd for Perm<N> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<const N: usize> fmt::Display for Perm<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for img in self.images() {
      let c = char::from_digit(img as u32, 16).unwrap_or('?');
      write!(f, "{c}")?;
    }
    Ok(())
  }
}
impl<const N: usize> fmt::Debug for Perm<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Perm({self})")
  }
}

#[cfg(test)]
mod test {
  use super::{factorial, Perm};
  use crate::combinatorics::Sign;

  use itertools::Itertools as _;

  #[test]
  fn packed_codes() {
    assert_eq!(Perm::<4>::identity().perm_code(), 228);
    let p = Perm::<4>::from_images([1, 2, 3, 0]);
    assert!(Perm::<4>::is_perm_code(p.perm_code()));
    assert!(!Perm::<4>::is_perm_code(0));
    assert_eq!(Perm::<4>::from_perm_code(p.perm_code()), p);
    assert_eq!(Perm::<5>::identity().perm_code(), 0b100_011_010_001_000);
  }

  #[test]
  fn composition_and_inverse() {
    let p = Perm::<4>::from_images([1, 2, 3, 0]);
    let q = Perm::<4>::transposition(0, 1);
    assert_eq!((p * q).images(), [2, 1, 3, 0]);
    assert_eq!(p * p.inverse(), Perm::identity());
    assert_eq!(p.pre_image(0), 3);
    assert_eq!(p.reverse().images(), [0, 3, 2, 1]);
    assert!(Perm::<4>::try_from_images([0, 0, 1, 2]).is_none());
  }

  #[test]
  fn sign_alternating_s4_order() {
    #[rustfmt::skip]
    let expected = [
      [0,1,2,3], [0,1,3,2], [0,2,3,1], [0,2,1,3], [0,3,1,2], [0,3,2,1],
      [1,0,3,2], [1,0,2,3], [1,2,0,3], [1,2,3,0], [1,3,2,0], [1,3,0,2],
      [2,0,1,3], [2,0,3,1], [2,1,3,0], [2,1,0,3], [2,3,0,1], [2,3,1,0],
      [3,0,2,1], [3,0,1,2], [3,1,0,2], [3,1,2,0], [3,2,1,0], [3,2,0,1],
    ];
    for (i, images) in expected.into_iter().enumerate() {
      assert_eq!(Perm::<4>::sn(i).images(), images);
    }
  }

  fn check_indexing<const N: usize>() {
    assert_eq!(Perm::<N>::NPERMS, factorial(N));
    let all = Perm::<N>::all().collect_vec();
    assert_eq!(all.iter().unique().count(), Perm::<N>::NPERMS);
    for (i, p) in all.iter().enumerate() {
      assert_eq!(p.sn_index(), i);
      assert_eq!(p.sign(), Sign::from_parity(i));
    }
    let ordered = Perm::<N>::all_ordered().collect_vec();
    assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    for (i, p) in ordered.iter().enumerate() {
      assert_eq!(p.ordered_sn_index(), i);
    }
  }

  #[test]
  fn indexing() {
    check_indexing::<1>();
    check_indexing::<2>();
    check_indexing::<3>();
    check_indexing::<4>();
    check_indexing::<5>();
    check_indexing::<6>();
  }

  #[test]
  fn conversions() {
    let p = Perm::<4>::from_images([2, 0, 3, 1]);
    let ext: Perm<5> = p.extend();
    assert_eq!(ext.images(), [2, 0, 3, 1, 4]);
    assert_eq!(ext.contract::<4>(), p);
    assert!(Perm::<5>::transposition(0, 4).try_contract::<4>().is_none());
    assert_eq!(p.to_string(), "2031");
    assert_eq!(p.trunc(2), "20");
  }
}
