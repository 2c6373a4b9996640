//! Isomorphisms and subcomplex embeddings between two triangulations.
//!
//! Each source component is anchored by mapping its first simplex to an
//! unused destination simplex under every vertex permutation. The rest of the
//! component is forced by the gluings, so branching only happens per
//! component.

use super::Isomorphism;
use crate::{
  combinatorics::{FaceNumbering, Perm},
  triangulation::{SimplexIdx, Triangulation},
};

use indexmap::IndexMap;
use std::{collections::VecDeque, hash::Hash};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
  /// Bijections mapping boundary facets to boundary facets.
  #[default]
  Complete,
  /// Injective maps preserving every gluing of the source, possibly landing
  /// on glued facets of the destination.
  Subcomplex,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IsomorphismSearch {
  pub mode: SearchMode,
  /// Stop after the first result.
  pub first_only: bool,
}

impl IsomorphismSearch {
  pub fn complete() -> Self {
    Self {
      mode: SearchMode::Complete,
      first_only: false,
    }
  }
  pub fn subcomplex() -> Self {
    Self {
      mode: SearchMode::Subcomplex,
      first_only: false,
    }
  }
  pub fn first_only(mut self) -> Self {
    self.first_only = true;
    self
  }
}

impl<const N: usize> Triangulation<N> {
  /// All isomorphisms (or subcomplex embeddings) from `self` into `other`.
  pub fn find_isomorphisms(&self, other: &Self, search: IsomorphismSearch) -> Vec<Isomorphism<N>> {
    let complete = search.mode == SearchMode::Complete;
    if self.is_empty() {
      if complete && !other.is_empty() {
        return Vec::new();
      }
      return vec![Isomorphism::identity(0)];
    }
    if !self.compatible_with(other, complete) {
      debug!(mode = ?search.mode, "isomorphism search rejected by invariants");
      return Vec::new();
    }
    let results = Search::new(self, other, search).run();
    debug!(mode = ?search.mode, nresults = results.len(), "isomorphism search finished");
    results
  }

  pub fn is_isomorphic_to(&self, other: &Self) -> Option<Isomorphism<N>> {
    self
      .find_isomorphisms(other, IsomorphismSearch::complete().first_only())
      .pop()
  }
  pub fn find_all_isomorphisms(&self, other: &Self) -> Vec<Isomorphism<N>> {
    self.find_isomorphisms(other, IsomorphismSearch::complete())
  }
  /// An embedding of `self` as a subcomplex of `other`.
  pub fn is_contained_in(&self, other: &Self) -> Option<Isomorphism<N>> {
    self
      .find_isomorphisms(other, IsomorphismSearch::subcomplex().first_only())
      .pop()
  }
  pub fn find_all_subcomplexes_in(&self, other: &Self) -> Vec<Isomorphism<N>> {
    self.find_isomorphisms(other, IsomorphismSearch::subcomplex())
  }

  /// Cheap invariants that any isomorphism must preserve.
  fn compatible_with(&self, other: &Self, complete: bool) -> bool {
    if !complete {
      return self.size() <= other.size() && (self.is_orientable() || !other.is_orientable());
    }
    if self.size() != other.size() {
      return false;
    }
    let dim = self.dim();
    if (0..dim).any(|d| self.nfaces(d) != other.nfaces(d))
      || self.ncomponents() != other.ncomponents()
      || self.boundary_components().len() != other.boundary_components().len()
      || self.is_orientable() != other.is_orientable()
    {
      return false;
    }
    // Faces of dimension dim - 1 always have degree one or two, which the
    // boundary component sizes already account for.
    let degrees_match = (0..dim.saturating_sub(1)).all(|d| {
      histogram(self.faces(d).iter().map(|f| f.degree()))
        == histogram(other.faces(d).iter().map(|f| f.degree()))
    });
    degrees_match
      && histogram(self.components().iter().map(|c| c.size()))
        == histogram(other.components().iter().map(|c| c.size()))
      && histogram(self.boundary_components().iter().map(|b| b.size()))
        == histogram(other.boundary_components().iter().map(|b| b.size()))
  }
}

/// Occurrence counts, sorted by key.
fn histogram<T: Hash + Eq + Ord>(items: impl Iterator<Item = T>) -> Vec<(T, usize)> {
  let mut counts: IndexMap<T, usize> = IndexMap::new();
  for item in items {
    *counts.entry(item).or_default() += 1;
  }
  counts.sort_keys();
  counts.into_iter().collect()
}

struct Search<'a, const N: usize> {
  src: &'a Triangulation<N>,
  dst: &'a Triangulation<N>,
  complete: bool,
  first_only: bool,
  numberings: Vec<FaceNumbering>,
  image: Vec<Option<SimplexIdx>>,
  perm: Vec<Perm<N>>,
  /// The source component claiming each destination simplex.
  which_comp: Vec<Option<usize>>,
}

impl<'a, const N: usize> Search<'a, N> {
  fn new(src: &'a Triangulation<N>, dst: &'a Triangulation<N>, search: IsomorphismSearch) -> Self {
    Self {
      src,
      dst,
      complete: search.mode == SearchMode::Complete,
      first_only: search.first_only,
      numberings: (0..src.dim()).map(|d| FaceNumbering::new(src.dim(), d)).collect(),
      image: vec![None; src.size()],
      perm: vec![Perm::identity(); src.size()],
      which_comp: vec![None; dst.size()],
    }
  }

  fn run(mut self) -> Vec<Isomorphism<N>> {
    let ncomps = self.src.ncomponents();
    let mut results = Vec::new();
    // Per component: the destination simplex and permutation index to try next.
    let mut start = vec![(0, 0); ncomps];

    let mut comp = 0;
    loop {
      if comp == ncomps {
        results.push(self.current());
        if self.first_only {
          break;
        }
        comp -= 1;
        self.clear(comp);
        Self::advance(&mut start[comp]);
        continue;
      }

      let (dest, perm_index) = start[comp];
      if dest == self.dst.size() {
        if comp == 0 {
          break;
        }
        comp -= 1;
        self.clear(comp);
        Self::advance(&mut start[comp]);
        continue;
      }

      let src_start = self.src.components()[comp].simplices()[0];
      let size_mismatch = self.complete
        && self.dst.simplex_component(dest).size() != self.src.components()[comp].size();
      if self.which_comp[dest].is_some() || size_mismatch {
        start[comp] = (dest + 1, 0);
        continue;
      }

      if self.extend(comp, src_start, dest, Perm::sn(perm_index)) {
        comp += 1;
        if comp < ncomps {
          start[comp] = (0, 0);
        }
      } else {
        self.clear(comp);
        Self::advance(&mut start[comp]);
      }
    }
    results
  }

  fn advance(start: &mut (SimplexIdx, usize)) {
    start.1 += 1;
    if start.1 == Perm::<N>::NPERMS {
      *start = (start.0 + 1, 0);
    }
  }

  fn current(&self) -> Isomorphism<N> {
    Isomorphism::new(self.image.iter().flatten().copied().collect(), self.perm.clone())
  }

  fn clear(&mut self, comp: usize) {
    for &s in self.src.components()[comp].simplices() {
      self.image[s] = None;
    }
    for owner in self.which_comp.iter_mut() {
      if *owner == Some(comp) {
        *owner = None;
      }
    }
  }

  /// Maps `simplex` to `dest` with `perm` and propagates through the whole
  /// component. Returns false as soon as a forced choice conflicts.
  fn extend(&mut self, comp: usize, simplex: SimplexIdx, dest: SimplexIdx, perm: Perm<N>) -> bool {
    if !self.assign(comp, simplex, dest, perm) {
      return false;
    }
    let mut queue = VecDeque::from([simplex]);
    while let Some(s) = queue.pop_front() {
      let (d, p) = (self.image[s], self.perm[s]);
      let Some(d) = d else { continue };
      for facet in 0..N {
        let dest_facet = p.image(facet);
        let dest_gluing = self.dst.adjacent(d, dest_facet);
        let Some(gluing) = self.src.adjacent(s, facet) else {
          if self.complete && dest_gluing.is_some() {
            return false;
          }
          continue;
        };
        let Some(dest_gluing) = dest_gluing else {
          return false;
        };
        let adj_perm = dest_gluing.perm * p * gluing.perm.inverse();
        match self.image[gluing.simplex] {
          Some(existing) => {
            if existing != dest_gluing.simplex || self.perm[gluing.simplex] != adj_perm {
              return false;
            }
          }
          None => {
            if !self.assign(comp, gluing.simplex, dest_gluing.simplex, adj_perm) {
              return false;
            }
            queue.push_back(gluing.simplex);
          }
        }
      }
    }
    true
  }

  fn assign(&mut self, comp: usize, simplex: SimplexIdx, dest: SimplexIdx, perm: Perm<N>) -> bool {
    if self.which_comp[dest].is_some() {
      return false;
    }
    self.image[simplex] = Some(dest);
    self.perm[simplex] = perm;
    self.which_comp[dest] = Some(comp);
    !self.complete || self.simplices_compatible(simplex, dest, perm)
  }

  /// Face degrees and vertex link properties agree under `perm`.
  fn simplices_compatible(&self, simplex: SimplexIdx, dest: SimplexIdx, perm: Perm<N>) -> bool {
    self.numberings.iter().enumerate().all(|(subdim, numbering)| {
      (0..numbering.nfaces()).all(|local| {
        let dest_local = numbering.face_number(perm * numbering.ordering::<N>(local));
        let a = self.src.face(subdim, self.src.simplex_face(simplex, subdim, local));
        let b = self.dst.face(subdim, self.dst.simplex_face(dest, subdim, dest_local));
        a.degree() == b.degree()
          && (subdim != 0
            || (a.is_boundary() == b.is_boundary()
              && a.is_ideal() == b.is_ideal()
              && a.is_link_orientable() == b.is_link_orientable()))
      })
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use itertools::Itertools;

  fn two_tetrahedra() -> Triangulation<4> {
    let mut tri = Triangulation::<4>::with_simplices(2);
    tri.join(0, 3, 1, Perm::identity()).unwrap();
    tri
  }

  #[test]
  fn automorphisms_of_a_single_simplex() {
    let tri = Triangulation::<4>::with_simplices(1);
    let isos = tri.find_all_isomorphisms(&tri);
    assert_eq!(isos.len(), 24);
    assert!(isos.iter().all(|iso| iso.is_isomorphism_between(&tri, &tri)));
    assert!(isos.iter().map(|iso| iso.facet_perm(0)).all_unique());
  }

  #[test]
  fn automorphisms_of_two_glued_tetrahedra() {
    let tri = two_tetrahedra();
    // Swap the two tetrahedra or not, times the symmetries of the shared triangle.
    assert_eq!(tri.find_all_isomorphisms(&tri).len(), 12);
  }

  #[test]
  fn subcomplexes() {
    let single = Triangulation::<4>::with_simplices(1);
    let pair = two_tetrahedra();
    assert!(single.is_isomorphic_to(&pair).is_none());
    let embeddings = single.find_all_subcomplexes_in(&pair);
    assert_eq!(embeddings.len(), 48);
    assert!(embeddings.iter().all(|e| e.is_embedding_between(&single, &pair)));
    assert!(pair.is_contained_in(&single).is_none());
  }

  #[test]
  fn empty_source() {
    let empty = Triangulation::<4>::new();
    let single = Triangulation::<4>::with_simplices(1);
    assert_eq!(empty.find_all_isomorphisms(&empty).len(), 1);
    assert!(empty.is_isomorphic_to(&single).is_none());
    assert_eq!(empty.find_all_subcomplexes_in(&single).len(), 1);
  }

  #[test]
  fn disconnected_components_do_not_share_images() {
    let mut tri = Triangulation::<3>::with_simplices(2);
    let isos = tri.find_all_isomorphisms(&tri);
    // Two isolated triangles: swap or not, times 6 * 6 vertex permutations.
    assert_eq!(isos.len(), 2 * 36);
    assert!(isos.iter().all(|iso| iso.is_bijective()));

    tri.join(0, 0, 1, Perm::identity()).unwrap();
    let other = Triangulation::<3>::with_simplices(2);
    assert!(tri.is_isomorphic_to(&other).is_none());
  }
}
