pub mod search;

use crate::{
  combinatorics::Perm,
  triangulation::{Gluing, Simplex, SimplexIdx, Triangulation},
};

use itertools::Itertools;
use std::fmt;

/// A map between the simplices of two triangulations.
///
/// Simplex `i` maps to simplex `simp_image[i]`, and vertex `v` of simplex
/// `i` maps to vertex `facet_perm[i][v]` of its image (equivalently facet `f`
/// maps to facet `facet_perm[i][f]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isomorphism<const N: usize> {
  simp_image: Vec<SimplexIdx>,
  facet_perm: Vec<Perm<N>>,
}

impl<const N: usize> Isomorphism<N> {
  pub fn new(simp_image: Vec<SimplexIdx>, facet_perm: Vec<Perm<N>>) -> Self {
    assert_eq!(
      simp_image.len(),
      facet_perm.len(),
      "Every simplex needs both an image and a facet permutation."
    );
    Self {
      simp_image,
      facet_perm,
    }
  }

  pub fn identity(size: usize) -> Self {
    Self::new((0..size).collect(), vec![Perm::identity(); size])
  }

  pub fn size(&self) -> usize {
    self.simp_image.len()
  }
  pub fn simp_image(&self, simplex: SimplexIdx) -> SimplexIdx {
    self.simp_image[simplex]
  }
  pub fn facet_perm(&self, simplex: SimplexIdx) -> Perm<N> {
    self.facet_perm[simplex]
  }
  pub fn simp_images(&self) -> &[SimplexIdx] {
    &self.simp_image
  }
  pub fn facet_perms(&self) -> &[Perm<N>] {
    &self.facet_perm
  }

  /// The image simplex and facet of `facet` of `simplex`.
  pub fn facet_image(&self, simplex: SimplexIdx, facet: usize) -> (SimplexIdx, usize) {
    (self.simp_image[simplex], self.facet_perm[simplex].image(facet))
  }

  pub fn is_identity(&self) -> bool {
    self.simp_image.iter().enumerate().all(|(i, &s)| i == s)
      && self.facet_perm.iter().all(|p| p.is_identity())
  }

  /// Whether the simplex map is a bijection of `{0, ..., size-1}`.
  pub fn is_bijective(&self) -> bool {
    let mut seen = vec![false; self.size()];
    self.simp_image.iter().all(|&s| {
      let fresh = s < seen.len() && !seen[s];
      if fresh {
        seen[s] = true;
      }
      fresh
    })
  }

  pub fn inverse(&self) -> Self {
    assert!(self.is_bijective(), "Only bijections can be inverted.");
    let mut simp_image = vec![0; self.size()];
    let mut facet_perm = vec![Perm::identity(); self.size()];
    for (i, (&s, &p)) in self.simp_image.iter().zip(&self.facet_perm).enumerate() {
      simp_image[s] = i;
      facet_perm[s] = p.inverse();
    }
    Self::new(simp_image, facet_perm)
  }

  /// The composition applying `self` first and `next` afterwards.
  pub fn then(&self, next: &Self) -> Self {
    let (simp_image, facet_perm) = self
      .simp_image
      .iter()
      .zip(&self.facet_perm)
      .map(|(&s, &p)| (next.simp_image[s], next.facet_perm[s] * p))
      .unzip();
    Self::new(simp_image, facet_perm)
  }

  /// The relabelled copy of `tri`: simplex `i` becomes simplex
  /// `simp_image[i]` and its vertices are renamed by `facet_perm[i]`.
  pub fn apply(&self, tri: &Triangulation<N>) -> Triangulation<N> {
    assert_eq!(tri.size(), self.size(), "Isomorphism size must match.");
    assert!(self.is_bijective(), "Only bijections can be applied.");

    let mut simplices: Vec<Option<Simplex<N>>> = vec![None; tri.size()];
    for (i, source) in tri.simplices().iter().enumerate() {
      let p = self.facet_perm[i];
      let mut simplex = source.clone();
      for facet in 0..N {
        let gluing = source.gluing(facet).map(|g| Gluing {
          simplex: self.simp_image[g.simplex],
          perm: self.facet_perm[g.simplex] * g.perm * p.inverse(),
        });
        simplex.gluings_mut()[p.image(facet)] = gluing;
      }
      simplices[self.simp_image[i]] = Some(simplex);
    }
    Triangulation::from_simplices(simplices.into_iter().flatten().collect())
  }

  pub fn apply_in_place(&self, tri: &mut Triangulation<N>) {
    *tri = self.apply(tri);
  }

  /// Whether `self` maps `src` onto `dst`, with boundary facets mapping to
  /// boundary facets.
  pub fn is_isomorphism_between(&self, src: &Triangulation<N>, dst: &Triangulation<N>) -> bool {
    src.size() == self.size()
      && dst.size() == self.size()
      && self.is_bijective()
      && self.preserves_gluings(src, dst, true)
  }

  /// Whether `self` embeds `src` into `dst` as a subcomplex: injective, and
  /// every gluing of `src` is a gluing of `dst`.
  pub fn is_embedding_between(&self, src: &Triangulation<N>, dst: &Triangulation<N>) -> bool {
    src.size() == self.size()
      && self.simp_image.iter().all(|&s| s < dst.size())
      && self.simp_image.iter().all_unique()
      && self.preserves_gluings(src, dst, false)
  }

  fn preserves_gluings(&self, src: &Triangulation<N>, dst: &Triangulation<N>, complete: bool) -> bool {
    (0..src.size()).cartesian_product(0..N).all(|(i, facet)| {
      let (image, image_facet) = self.facet_image(i, facet);
      match (src.adjacent(i, facet), dst.adjacent(image, image_facet)) {
        (Some(g), Some(h)) => {
          h.simplex == self.simp_image[g.simplex]
            && h.perm == self.facet_perm[g.simplex] * g.perm * self.facet_perm[i].inverse()
        }
        (Some(_), None) => false,
        (None, Some(_)) => !complete,
        (None, None) => true,
      }
    })
  }
}

impl<const N: usize> fmt::Display for Isomorphism<N> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, (s, p)) in self.simp_image.iter().zip(&self.facet_perm).enumerate() {
      writeln!(f, "{i} -> {s} ({p})")?;
    }
    Ok(())
  }
}
