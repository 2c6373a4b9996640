//! Ready-made triangulations.

use crate::{combinatorics::Perm, triangulation::Triangulation};

/// constructors
impl<const N: usize> Triangulation<N> {
  /// A single simplex with all facets on the boundary.
  pub fn ball() -> Self {
    Self::with_simplices(1)
  }

  /// Two simplices with every facet glued to its counterpart by the identity.
  pub fn sphere() -> Self {
    let mut tri = Self::with_simplices(2);
    for facet in 0..N {
      tri.set_gluing(0, facet, 1, Perm::identity());
    }
    tri
  }

  /// The boundary of a simplex with `N + 1` vertices.
  ///
  /// Simplex `i` spans all vertices except vertex `i`, listed in increasing
  /// order.
  pub fn simplex_boundary() -> Self {
    let global = |i: usize, k: usize| if k < i { k } else { k + 1 };
    let local = |i: usize, v: usize| if v < i { v } else { v - 1 };

    let mut tri = Self::with_simplices(N + 1);
    for i in 0..=N {
      for j in i + 1..=N {
        let perm = Perm::from_images(std::array::from_fn(|k| match global(i, k) {
          v if v == j => local(j, i),
          v => local(j, v),
        }));
        tri.set_gluing(i, local(i, j), j, perm);
      }
    }
    tri
  }
}

/// two-simplex surfaces
impl Triangulation<3> {
  /// The torus from two triangles.
  pub fn torus() -> Self {
    Self::two_triangles([[0, 2, 1], [2, 1, 0], [1, 0, 2]])
  }

  /// The Klein bottle from two triangles.
  pub fn klein_bottle() -> Self {
    Self::two_triangles([[0, 2, 1], [2, 1, 0], [1, 2, 0]])
  }

  /// The real projective plane from two triangles.
  pub fn projective_plane() -> Self {
    Self::two_triangles([[0, 2, 1], [1, 2, 0], [1, 2, 0]])
  }

  /// Glues facets 1, 2 and 0 of triangle 0 to triangle 1 by the given images.
  fn two_triangles(perms: [[usize; 3]; 3]) -> Self {
    let mut tri = Self::with_simplices(2);
    for (facet, images) in [1, 2, 0].into_iter().zip(perms) {
      tri.set_gluing(0, facet, 1, Perm::from_images(images));
    }
    tri
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn spheres() {
    let sphere = Triangulation::<4>::sphere();
    sphere.check_consistency().unwrap();
    assert!(sphere.is_closed() && sphere.is_orientable() && sphere.is_valid());
    assert_eq!(sphere.nvertices(), 4);
    assert_eq!(sphere.euler_char(), 0);

    let boundary = Triangulation::<3>::simplex_boundary();
    boundary.check_consistency().unwrap();
    assert_eq!(boundary.size(), 4);
    assert_eq!((boundary.nvertices(), boundary.nedges()), (4, 6));
    assert_eq!(boundary.euler_char(), 2);
    assert!(boundary.is_closed() && boundary.is_orientable());

    let boundary = Triangulation::<5>::simplex_boundary();
    boundary.check_consistency().unwrap();
    assert_eq!(boundary.size(), 6);
    assert_eq!((boundary.nvertices(), boundary.nedges()), (6, 15));
    assert_eq!(boundary.euler_char(), 2);
    assert!(boundary.is_closed() && boundary.is_valid());

    let ball = Triangulation::<4>::ball();
    assert_eq!(ball.boundary_components().len(), 1);
  }

  #[test]
  fn surfaces() {
    let torus = Triangulation::torus();
    torus.check_consistency().unwrap();
    assert!(torus.is_orientable() && torus.is_closed() && torus.is_valid());
    assert_eq!(torus.nvertices(), 1);
    assert_eq!(torus.euler_char(), 0);

    let klein = Triangulation::klein_bottle();
    klein.check_consistency().unwrap();
    assert!(!klein.is_orientable() && klein.is_closed());
    assert_eq!(klein.euler_char(), 0);

    let rp2 = Triangulation::projective_plane();
    rp2.check_consistency().unwrap();
    assert!(!rp2.is_orientable() && rp2.is_closed());
    assert_eq!(rp2.nvertices(), 2);
    assert_eq!(rp2.euler_char(), 1);

    assert!(torus.is_isomorphic_to(&klein).is_none());
  }
}
