//! Relabelling a connected triangulation into its canonical form.
//!
//! Every choice of starting simplex and starting vertex permutation defines a
//! relabelling: the starting simplex becomes simplex 0 and further simplices
//! are numbered in the order in which a breadth-first walk over the relabelled
//! simplices discovers them. The canonical form is the relabelling whose
//! gluing table (adjacent simplex, then gluing permutation, facet by facet) is
//! lexicographically smallest.

use crate::{
  combinatorics::Perm,
  error::TriangulationError,
  isomorphism::Isomorphism,
  triangulation::{SimplexIdx, Triangulation},
};

use std::cmp::Ordering;
use tracing::debug;

impl<const N: usize> Triangulation<N> {
  /// Relabels `self` in place into its canonical form.
  ///
  /// Returns whether anything changed. Isomorphic connected triangulations
  /// have identical canonical forms.
  pub fn make_canonical(&mut self) -> Result<bool, TriangulationError> {
    let Some(best) = self.canonical_isomorphism()? else {
      return Ok(false);
    };
    if best.is_identity() {
      debug!(size = self.size(), "triangulation already canonical");
      return Ok(false);
    }
    best.apply_in_place(self);
    debug!(size = self.size(), "relabelled triangulation into canonical form");
    Ok(true)
  }

  /// The relabelling taking `self` to its canonical form, `None` if empty.
  pub fn canonical_isomorphism(&self) -> Result<Option<Isomorphism<N>>, TriangulationError> {
    if self.is_empty() {
      return Ok(None);
    }
    if !self.is_connected() {
      return Err(TriangulationError::Disconnected {
        ncomponents: self.ncomponents(),
      });
    }

    let mut best = Labelling::identity(self.size());
    let mut current = Labelling::new(self.size());
    for simplex in 0..self.size() {
      for perm in Perm::<N>::all() {
        if current.extend(self, simplex, perm, &best) {
          std::mem::swap(&mut best, &mut current);
        }
      }
    }
    Ok(Some(best.into_isomorphism()))
  }
}

/// A relabelling under construction, with its inverse.
#[derive(Debug, Clone)]
struct Labelling<const N: usize> {
  image: Vec<Option<SimplexIdx>>,
  perm: Vec<Perm<N>>,
  preimage: Vec<SimplexIdx>,
}

impl<const N: usize> Labelling<N> {
  fn new(size: usize) -> Self {
    Self {
      image: vec![None; size],
      perm: vec![Perm::identity(); size],
      preimage: Vec::with_capacity(size),
    }
  }

  fn identity(size: usize) -> Self {
    Self {
      image: (0..size).map(Some).collect(),
      perm: vec![Perm::identity(); size],
      preimage: (0..size).collect(),
    }
  }

  fn into_isomorphism(self) -> Isomorphism<N> {
    Isomorphism::new(self.image.into_iter().flatten().collect(), self.perm)
  }

  /// Image simplex (with `size` standing for boundary) and gluing
  /// permutation of facet `facet` of image simplex `simplex`.
  fn gluing(&self, tri: &Triangulation<N>, simplex: SimplexIdx, facet: usize) -> (usize, Option<Perm<N>>) {
    let orig = self.preimage[simplex];
    let orig_facet = self.perm[orig].pre_image(facet);
    match tri.adjacent(orig, orig_facet) {
      None => (tri.size(), None),
      Some(g) => {
        let adj_image = self.image[g.simplex].unwrap_or(tri.size());
        let perm = self.perm[g.simplex] * g.perm * self.perm[orig].inverse();
        (adj_image, Some(perm))
      }
    }
  }

  /// Builds the relabelling anchored at `(start, perm)` and compares it with
  /// `best` along the way. Returns true iff it is strictly smaller.
  fn extend(&mut self, tri: &Triangulation<N>, start: SimplexIdx, perm: Perm<N>, best: &Self) -> bool {
    let n = tri.size();
    self.image.iter_mut().for_each(|i| *i = None);
    self.preimage.clear();
    self.image[start] = Some(0);
    self.perm[start] = perm;
    self.preimage.push(start);

    let mut better = false;
    for simplex in 0..n {
      let orig = self.preimage[simplex];
      for facet in 0..N {
        let orig_facet = self.perm[orig].pre_image(facet);
        if let Some(g) = tri.adjacent(orig, orig_facet) {
          if self.image[g.simplex].is_none() {
            self.image[g.simplex] = Some(self.preimage.len());
            self.perm[g.simplex] = self.perm[orig] * g.perm.inverse();
            self.preimage.push(g.simplex);
          }
        }
        if better {
          continue;
        }

        let (adj, glu) = self.gluing(tri, simplex, facet);
        let (best_adj, best_glu) = best.gluing(tri, simplex, facet);
        match adj.cmp(&best_adj).then_with(|| glu.cmp(&best_glu)) {
          Ordering::Less => better = true,
          Ordering::Greater => return false,
          Ordering::Equal => {}
        }
      }
    }
    better
  }
}
