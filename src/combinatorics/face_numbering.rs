//! Numbering of the `subdim`-faces inside a single `dim`-simplex.
//!
//! Low-dimensional faces (`dim + 1 >= 2 * (subdim + 1)`) are numbered in
//! lexicographic order of their vertex sets. High-dimensional faces are
//! numbered through their complements: face `f` of dimension `subdim` is
//! spanned by the vertices *not* in face `f` of dimension `dim - subdim - 1`.
//! In particular facet `i` is the facet opposite vertex `i`.

use super::{binomial, Perm, Sign};
use crate::Dim;

use std::sync::LazyLock;

/// Edge number of the edge joining vertices `i` and `j` of a tetrahedron.
#[rustfmt::skip]
pub const EDGE_NUMBER_3: [[i8; 4]; 4] = [
  [-1,  0,  1,  2],
  [ 0, -1,  3,  4],
  [ 1,  3, -1,  5],
  [ 2,  4,  5, -1],
];
/// Vertices of each tetrahedron edge, in increasing order.
pub const EDGE_VERTEX_3: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Edge number of the edge joining vertices `i` and `j` of a pentachoron.
#[rustfmt::skip]
pub const EDGE_NUMBER_4: [[i8; 5]; 5] = [
  [-1,  0,  1,  2,  3],
  [ 0, -1,  4,  5,  6],
  [ 1,  4, -1,  7,  8],
  [ 2,  5,  7, -1,  9],
  [ 3,  6,  8,  9, -1],
];
/// Vertices of each pentachoron edge, in increasing order.
#[rustfmt::skip]
pub const EDGE_VERTEX_4: [[usize; 2]; 10] = [
  [0, 1], [0, 2], [0, 3], [0, 4], [1, 2],
  [1, 3], [1, 4], [2, 3], [2, 4], [3, 4],
];

/// Triangle number of the triangle spanned by vertices `i`, `j`, `k` of a pentachoron.
/// Triangle `t` is the triangle opposite edge `t`.
#[rustfmt::skip]
pub const TRIANGLE_NUMBER_4: [[[i8; 5]; 5]; 5] = [
  [
    [-1, -1, -1, -1, -1],
    [-1, -1,  9,  8,  7],
    [-1,  9, -1,  6,  5],
    [-1,  8,  6, -1,  4],
    [-1,  7,  5,  4, -1],
  ],
  [
    [-1, -1,  9,  8,  7],
    [-1, -1, -1, -1, -1],
    [ 9, -1, -1,  3,  2],
    [ 8, -1,  3, -1,  1],
    [ 7, -1,  2,  1, -1],
  ],
  [
    [-1,  9, -1,  6,  5],
    [ 9, -1, -1,  3,  2],
    [-1, -1, -1, -1, -1],
    [ 6,  3, -1, -1,  0],
    [ 5,  2, -1,  0, -1],
  ],
  [
    [-1,  8,  6, -1,  4],
    [ 8, -1,  3, -1,  1],
    [ 6,  3, -1, -1,  0],
    [-1, -1, -1, -1, -1],
    [ 4,  1,  0, -1, -1],
  ],
  [
    [-1,  7,  5,  4, -1],
    [ 7, -1,  2,  1, -1],
    [ 5,  2, -1,  0, -1],
    [ 4,  1,  0, -1, -1],
    [-1, -1, -1, -1, -1],
  ],
];
/// Vertices of each pentachoron triangle, in increasing order.
#[rustfmt::skip]
pub const TRIANGLE_VERTEX_4: [[usize; 3]; 10] = [
  [2, 3, 4], [1, 3, 4], [1, 2, 4], [1, 2, 3], [0, 3, 4],
  [0, 2, 4], [0, 2, 3], [0, 1, 4], [0, 1, 3], [0, 1, 2],
];

/// Canonical orderings of the pentachoron edges: the edge vertices, then the
/// other three vertices in increasing order.
#[rustfmt::skip]
pub const EDGE_ORDERING_4: [[usize; 5]; 10] = [
  [0, 1, 2, 3, 4], [0, 2, 1, 3, 4], [0, 3, 1, 2, 4], [0, 4, 1, 2, 3], [1, 2, 0, 3, 4],
  [1, 3, 0, 2, 4], [1, 4, 0, 2, 3], [2, 3, 0, 1, 4], [2, 4, 0, 1, 3], [3, 4, 0, 1, 2],
];
/// Canonical orderings of the pentachoron triangles: the triangle vertices,
/// then the opposite edge, swapped where needed to make every ordering even.
#[rustfmt::skip]
pub const TRIANGLE_ORDERING_4: [[usize; 5]; 10] = [
  [2, 3, 4, 0, 1], [1, 3, 4, 2, 0], [1, 2, 4, 0, 3], [1, 2, 3, 4, 0], [0, 3, 4, 1, 2],
  [0, 2, 4, 3, 1], [0, 2, 3, 1, 4], [0, 1, 4, 2, 3], [0, 1, 3, 4, 2], [0, 1, 2, 3, 4],
];

pub const DIM_PRECOMPUTED: Dim = 4;

/// Canonical vertex orderings `[dim][subdim][face]` for all dimensions up to
/// [`DIM_PRECOMPUTED`].
static ORDERINGS: LazyLock<Vec<Vec<Vec<Vec<usize>>>>> = LazyLock::new(|| {
  (0..=DIM_PRECOMPUTED)
    .map(|dim| {
      (0..dim)
        .map(|subdim| {
          let numbering = FaceNumbering::new(dim, subdim);
          (0..numbering.nfaces())
            .map(|face| numbering.compute_ordering(face))
            .collect()
        })
        .collect()
    })
    .collect()
});

pub fn nfaces(dim: Dim, subdim: Dim) -> usize {
  binomial(dim + 1, subdim + 1)
}

/// The numbering scheme of `subdim`-faces inside a `dim`-simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceNumbering {
  dim: Dim,
  subdim: Dim,
}

impl FaceNumbering {
  pub fn new(dim: Dim, subdim: Dim) -> Self {
    assert!(
      subdim < dim,
      "Face dimension {subdim} must be below simplex dimension {dim}."
    );
    Self { dim, subdim }
  }

  pub fn dim(&self) -> Dim {
    self.dim
  }
  pub fn subdim(&self) -> Dim {
    self.subdim
  }
  pub fn nfaces(&self) -> usize {
    nfaces(self.dim, self.subdim)
  }
  pub fn nface_vertices(&self) -> usize {
    self.subdim + 1
  }

  /// Whether faces are numbered lexicographically by their own vertices
  /// (otherwise they are numbered by their complements).
  pub fn is_lexicographic(&self) -> bool {
    self.dim + 1 >= 2 * (self.subdim + 1)
  }

  /// The complementary numbering, whose face `f` spans the vertices not in face `f`.
  fn complement(&self) -> Self {
    Self::new(self.dim, self.dim - self.subdim - 1)
  }

  /// The vertices of `face`, in increasing order.
  pub fn face_vertices(&self, face: usize) -> Vec<usize> {
    assert!(face < self.nfaces(), "Face number {face} out of range.");
    let n = self.dim + 1;
    if self.is_lexicographic() {
      subset_unrank(n, self.subdim + 1, face)
    } else {
      let opposite = self.complement().face_vertices(face);
      (0..n).filter(|v| !opposite.contains(v)).collect()
    }
  }

  /// Images of the canonical ordering of `face`.
  ///
  /// The first `subdim + 1` images are the face vertices in increasing order.
  /// For lexicographic faces the remaining images make the permutation even
  /// (whenever at least two images remain), for the others they are the
  /// remaining vertices in decreasing order. Pentachoron edges and triangles
  /// are the exception and follow [`EDGE_ORDERING_4`] and
  /// [`TRIANGLE_ORDERING_4`].
  pub fn ordering_images(&self, face: usize) -> Vec<usize> {
    match ORDERINGS
      .get(self.dim)
      .and_then(|d| d.get(self.subdim))
      .and_then(|s| s.get(face))
    {
      Some(images) => images.clone(),
      None => self.compute_ordering(face),
    }
  }

  fn compute_ordering(&self, face: usize) -> Vec<usize> {
    match (self.dim, self.subdim) {
      (4, 1) => return EDGE_ORDERING_4[face].to_vec(),
      (4, 2) => return TRIANGLE_ORDERING_4[face].to_vec(),
      _ => {}
    }
    let n = self.dim + 1;
    if self.subdim == 0 && self.is_lexicographic() {
      return vertex_ordering(n, face);
    }
    let vertices = self.face_vertices(face);
    let mut rest: Vec<usize> = (0..n).filter(|v| !vertices.contains(v)).collect();
    if self.is_lexicographic() {
      let mut images = [vertices, rest].concat();
      make_even(&mut images, self.subdim + 1);
      images
    } else {
      rest.reverse();
      [vertices, rest].concat()
    }
  }

  pub fn ordering<const N: usize>(&self, face: usize) -> Perm<N> {
    assert_eq!(N, self.dim + 1, "Permutation size must match the simplex.");
    let images = self.ordering_images(face);
    Perm::from_images(std::array::from_fn(|i| images[i]))
  }

  /// The face spanned by the images `0..=subdim` of `vertices`.
  pub fn face_number<const N: usize>(&self, vertices: Perm<N>) -> usize {
    assert_eq!(N, self.dim + 1, "Permutation size must match the simplex.");
    let images = vertices.images();
    self.face_number_of(&images[..=self.subdim])
  }

  /// The face spanned by the given distinct vertices, in any order.
  pub fn face_number_of(&self, vertices: &[usize]) -> usize {
    assert_eq!(vertices.len(), self.subdim + 1, "Wrong number of face vertices.");
    if self.subdim == 0 {
      return vertices[0];
    }
    if self.subdim + 1 == self.dim {
      // A facet is numbered by its opposite vertex.
      return (0..=self.dim)
        .find(|v| !vertices.contains(v))
        .unwrap_or_else(|| panic!("Facet vertices {vertices:?} are not distinct."));
    }
    let table = match (self.dim, self.subdim) {
      (3, 1) => Some(EDGE_NUMBER_3[vertices[0]][vertices[1]]),
      (4, 1) => Some(EDGE_NUMBER_4[vertices[0]][vertices[1]]),
      (4, 2) => Some(TRIANGLE_NUMBER_4[vertices[0]][vertices[1]][vertices[2]]),
      _ => None,
    };
    if let Some(face) = table {
      assert!(face >= 0, "Face vertices {vertices:?} are not distinct.");
      return face as usize;
    }

    let n = self.dim + 1;
    let mut sorted = vertices.to_vec();
    sorted.sort_unstable();
    if self.is_lexicographic() {
      subset_rank(n, &sorted)
    } else {
      let opposite: Vec<usize> = (0..n).filter(|v| !sorted.contains(v)).collect();
      subset_rank(n, &opposite)
    }
  }

  pub fn contains_vertex(&self, face: usize, vertex: usize) -> bool {
    match (self.dim, self.subdim) {
      (_, 0) => face == vertex,
      (d, s) if s + 1 == d => face != vertex,
      (3, 1) => EDGE_VERTEX_3[face].contains(&vertex),
      (4, 1) => EDGE_VERTEX_4[face].contains(&vertex),
      (4, 2) => TRIANGLE_VERTEX_4[face].contains(&vertex),
      _ => self.face_vertices(face).contains(&vertex),
    }
  }
}

/// `(f, f+1, ..., f+dim)` cyclically, replaced by `(f, f-1, ..., f-dim)` if
/// the rotation is odd.
fn vertex_ordering(n: usize, face: usize) -> Vec<usize> {
  let rotation: Vec<usize> = (0..n).map(|i| (face + i) % n).collect();
  if sign_of(&rotation).is_pos() {
    return rotation;
  }
  let mut reflection: Vec<usize> = (0..n).map(|i| (face + n - i) % n).collect();
  make_even(&mut reflection, 1);
  reflection
}

/// Swaps the last two images if `images` is odd and at least two images
/// follow the first `fixed` ones.
fn make_even(images: &mut [usize], fixed: usize) {
  let n = images.len();
  if n >= fixed + 2 && sign_of(images).is_neg() {
    images.swap(n - 2, n - 1);
  }
}

fn sign_of(images: &[usize]) -> Sign {
  let mut sorted = images.to_vec();
  super::sort_signed(&mut sorted)
}

/// Position of the increasing `subset` of `{0, ..., n-1}` among all subsets of
/// the same size in lexicographic order.
fn subset_rank(n: usize, subset: &[usize]) -> usize {
  let k = subset.len();
  let mut rank = 0;
  let mut next = 0;
  for (i, &c) in subset.iter().enumerate() {
    rank += (next..c).map(|v| binomial(n - 1 - v, k - 1 - i)).sum::<usize>();
    next = c + 1;
  }
  rank
}

fn subset_unrank(n: usize, k: usize, mut rank: usize) -> Vec<usize> {
  let mut subset = Vec::with_capacity(k);
  let mut v = 0;
  for i in 0..k {
    loop {
      let count = binomial(n - 1 - v, k - 1 - i);
      if rank < count {
        break;
      }
      rank -= count;
      v += 1;
    }
    subset.push(v);
    v += 1;
  }
  subset
}
