pub mod link;
pub mod skeleton;

use crate::{
  combinatorics::{FaceNumbering, Perm, Sign},
  error::TriangulationError,
  Dim,
};
use skeleton::{BoundaryComponent, Component, Face, Skeleton};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use std::fmt::{self, Write};

pub type SimplexIdx = usize;

/// The identification of one facet with a facet of an adjacent simplex.
///
/// Vertex `i` of the glued simplex is identified with vertex `perm[i]` of
/// `simplex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gluing<const N: usize> {
  pub simplex: SimplexIdx,
  pub perm: Perm<N>,
}

/// A top-dimensional simplex with `N` vertices and `N` facets.
/// Facet `i` is the facet opposite vertex `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplex<const N: usize> {
  gluings: [Option<Gluing<N>>; N],
  description: String,
}

impl<const N: usize> Simplex<N> {
  fn new(description: String) -> Self {
    Self {
      gluings: [None; N],
      description,
    }
  }

  pub fn description(&self) -> &str {
    &self.description
  }
  pub fn set_description(&mut self, description: impl Into<String>) {
    self.description = description.into();
  }

  pub fn gluing(&self, facet: usize) -> Option<Gluing<N>> {
    self.gluings[facet]
  }
  pub fn gluings(&self) -> &[Option<Gluing<N>>; N] {
    &self.gluings
  }
  pub(crate) fn gluings_mut(&mut self) -> &mut [Option<Gluing<N>>; N] {
    &mut self.gluings
  }
  pub fn adjacent_simplex(&self, facet: usize) -> Option<SimplexIdx> {
    self.gluings[facet].map(|g| g.simplex)
  }
  pub fn adjacent_gluing(&self, facet: usize) -> Option<Perm<N>> {
    self.gluings[facet].map(|g| g.perm)
  }
  pub fn adjacent_facet(&self, facet: usize) -> Option<usize> {
    self.gluings[facet].map(|g| g.perm.image(facet))
  }
  pub fn has_boundary(&self) -> bool {
    self.gluings.iter().any(Option::is_none)
  }
  pub fn is_isolated(&self) -> bool {
    self.gluings.iter().all(Option::is_none)
  }
}

/// A triangulation built from simplices with `N` vertices (of dimension `N - 1`)
/// glued along their facets.
///
/// The skeleton is derived lazily from the gluings and dropped on every
/// mutation.
#[derive(Debug, Clone)]
pub struct Triangulation<const N: usize> {
  simplices: Vec<Simplex<N>>,
  skeleton: OnceCell<Skeleton<N>>,
}

impl<const N: usize> Default for Triangulation<N> {
  fn default() -> Self {
    Self::new()
  }
}

/// constructors
impl<const N: usize> Triangulation<N> {
  pub fn new() -> Self {
    assert!(N >= 2, "Triangulations need simplices of dimension at least 1.");
    Self {
      simplices: Vec::new(),
      skeleton: OnceCell::new(),
    }
  }

  /// `n` simplices without any gluings.
  pub fn with_simplices(n: usize) -> Self {
    let mut tri = Self::new();
    for _ in 0..n {
      tri.add_simplex();
    }
    tri
  }

  /// Builds a triangulation from a list of gluings
  /// `(simplex, facet, adjacent simplex, gluing images)`.
  ///
  /// Each gluing needs to be listed only once. Listing the reverse gluing as
  /// well is accepted as long as it agrees.
  pub fn from_gluings(
    n: usize,
    gluings: &[(SimplexIdx, usize, SimplexIdx, [usize; N])],
  ) -> Result<Self, TriangulationError> {
    let mut tri = Self::with_simplices(n);
    for &(simplex, facet, other, images) in gluings {
      let perm = Perm::try_from_images(images)
        .ok_or(TriangulationError::InconsistentGluing { simplex, facet })?;
      tri.check_facet(simplex, facet)?;
      tri.check_simplex(other)?;
      let existing = tri.simplices[simplex].gluing(facet);
      if existing.is_some() && existing == Some(Gluing { simplex: other, perm }) {
        continue;
      }
      tri.join(simplex, facet, other, perm)?;
    }
    Ok(tri)
  }

  pub(crate) fn from_simplices(simplices: Vec<Simplex<N>>) -> Self {
    let tri = Self {
      simplices,
      skeleton: OnceCell::new(),
    };
    debug_assert!(tri.check_consistency().is_ok());
    tri
  }
}

/// mutation
impl<const N: usize> Triangulation<N> {
  pub fn add_simplex(&mut self) -> SimplexIdx {
    self.add_simplex_with_description(String::new())
  }

  pub fn add_simplex_with_description(&mut self, description: impl Into<String>) -> SimplexIdx {
    self.invalidate();
    self.simplices.push(Simplex::new(description.into()));
    self.simplices.len() - 1
  }

  pub fn simplex_mut(&mut self, simplex: SimplexIdx) -> &mut Simplex<N> {
    &mut self.simplices[simplex]
  }

  /// Removes a simplex, leaving its former neighbours with boundary facets.
  /// All later simplices move down by one index.
  pub fn remove_simplex(&mut self, simplex: SimplexIdx) -> Result<Simplex<N>, TriangulationError> {
    self.check_simplex(simplex)?;
    for facet in 0..N {
      self.unjoin(simplex, facet)?;
    }
    self.invalidate();
    let removed = self.simplices.remove(simplex);
    for gluing in self.simplices.iter_mut().flat_map(|s| s.gluings.iter_mut().flatten()) {
      if gluing.simplex > simplex {
        gluing.simplex -= 1;
      }
    }
    Ok(removed)
  }

  pub fn remove_all_simplices(&mut self) {
    self.invalidate();
    self.simplices.clear();
  }

  /// Glues `facet` of `simplex` to facet `perm[facet]` of `other`, mapping
  /// vertex `i` of `simplex` to vertex `perm[i]` of `other`.
  pub fn join(
    &mut self,
    simplex: SimplexIdx,
    facet: usize,
    other: SimplexIdx,
    perm: Perm<N>,
  ) -> Result<(), TriangulationError> {
    self.check_facet(simplex, facet)?;
    self.check_simplex(other)?;
    let other_facet = perm.image(facet);
    if simplex == other && other_facet == facet {
      return Err(TriangulationError::FacetGluedToItself { simplex, facet });
    }
    if self.simplices[simplex].gluings[facet].is_some() {
      return Err(TriangulationError::FacetAlreadyGlued { simplex, facet });
    }
    if self.simplices[other].gluings[other_facet].is_some() {
      return Err(TriangulationError::FacetAlreadyGlued {
        simplex: other,
        facet: other_facet,
      });
    }
    self.set_gluing(simplex, facet, other, perm);
    Ok(())
  }

  /// Turns `facet` of `simplex` (and its partner) into boundary, returning the
  /// former gluing.
  pub fn unjoin(
    &mut self,
    simplex: SimplexIdx,
    facet: usize,
  ) -> Result<Option<Gluing<N>>, TriangulationError> {
    self.check_facet(simplex, facet)?;
    let gluing = self.simplices[simplex].gluings[facet].take();
    if let Some(g) = gluing {
      self.simplices[g.simplex].gluings[g.perm.image(facet)] = None;
      self.invalidate();
    }
    Ok(gluing)
  }

  /// Writes both sides of a gluing without any checks.
  pub(crate) fn set_gluing(
    &mut self,
    simplex: SimplexIdx,
    facet: usize,
    other: SimplexIdx,
    perm: Perm<N>,
  ) {
    self.invalidate();
    self.simplices[simplex].gluings[facet] = Some(Gluing {
      simplex: other,
      perm,
    });
    self.simplices[other].gluings[perm.image(facet)] = Some(Gluing {
      simplex,
      perm: perm.inverse(),
    });
  }

  /// Appends copies of all simplices of `other`, keeping their gluings.
  /// Returns the index of the first inserted simplex.
  pub fn insert_triangulation(&mut self, other: &Self) -> SimplexIdx {
    self.invalidate();
    let offset = self.simplices.len();
    self.simplices.extend(other.simplices.iter().map(|s| {
      let mut s = s.clone();
      for g in s.gluings.iter_mut().flatten() {
        g.simplex += offset;
      }
      s
    }));
    offset
  }

  fn invalidate(&mut self) {
    self.skeleton.take();
  }

  fn check_simplex(&self, simplex: SimplexIdx) -> Result<(), TriangulationError> {
    if simplex < self.simplices.len() {
      Ok(())
    } else {
      Err(TriangulationError::SimplexOutOfRange {
        simplex,
        size: self.simplices.len(),
      })
    }
  }

  fn check_facet(&self, simplex: SimplexIdx, facet: usize) -> Result<(), TriangulationError> {
    self.check_simplex(simplex)?;
    if facet < N {
      Ok(())
    } else {
      Err(TriangulationError::FacetOutOfRange { facet, nfacets: N })
    }
  }
}

/// simplex access
impl<const N: usize> Triangulation<N> {
  pub fn dim(&self) -> Dim {
    N - 1
  }
  pub fn size(&self) -> usize {
    self.simplices.len()
  }
  pub fn is_empty(&self) -> bool {
    self.simplices.is_empty()
  }
  pub fn simplex(&self, simplex: SimplexIdx) -> &Simplex<N> {
    &self.simplices[simplex]
  }
  pub fn simplices(&self) -> &[Simplex<N>] {
    &self.simplices
  }
  pub fn adjacent(&self, simplex: SimplexIdx, facet: usize) -> Option<Gluing<N>> {
    self.simplices[simplex].gluings[facet]
  }

  pub fn has_boundary_facets(&self) -> bool {
    self.simplices.iter().any(Simplex::has_boundary)
  }

  /// Checks that every gluing is mirrored by its partner.
  pub fn check_consistency(&self) -> Result<(), TriangulationError> {
    for (simplex, s) in self.simplices.iter().enumerate() {
      for (facet, gluing) in s.gluings.iter().enumerate() {
        let Some(g) = gluing else { continue };
        let inconsistent = TriangulationError::InconsistentGluing { simplex, facet };
        let other_facet = g.perm.image(facet);
        if g.simplex >= self.simplices.len() || (g.simplex == simplex && other_facet == facet) {
          return Err(inconsistent);
        }
        let back = self.simplices[g.simplex].gluings[other_facet];
        if back != Some(Gluing { simplex, perm: g.perm.inverse() }) {
          return Err(inconsistent);
        }
      }
    }
    Ok(())
  }

  /// Same size and exactly the same gluings, simplex by simplex.
  pub fn is_identical_to(&self, other: &Self) -> bool {
    self.size() == other.size()
      && self
        .simplices
        .iter()
        .zip(&other.simplices)
        .all(|(a, b)| a.gluings == b.gluings)
  }
}

/// skeleton queries
impl<const N: usize> Triangulation<N> {
  pub fn skeleton(&self) -> &Skeleton<N> {
    self.skeleton.get_or_init(|| Skeleton::compute(&self.simplices))
  }

  pub fn nfaces(&self, subdim: Dim) -> usize {
    if subdim == self.dim() {
      self.size()
    } else {
      self.skeleton().faces(subdim).len()
    }
  }
  pub fn faces(&self, subdim: Dim) -> &[Face<N>] {
    self.skeleton().faces(subdim)
  }
  pub fn face(&self, subdim: Dim, face: usize) -> &Face<N> {
    &self.skeleton().faces(subdim)[face]
  }
  pub fn nvertices(&self) -> usize {
    self.nfaces(0)
  }
  pub fn vertices(&self) -> &[Face<N>] {
    self.faces(0)
  }
  pub fn nedges(&self) -> usize {
    self.nfaces(1)
  }
  pub fn edges(&self) -> &[Face<N>] {
    self.faces(1)
  }

  /// The global index of local face `face` of dimension `subdim` of `simplex`.
  pub fn simplex_face(&self, simplex: SimplexIdx, subdim: Dim, face: usize) -> usize {
    self.skeleton().simplex_face(simplex, subdim, face)
  }

  pub fn components(&self) -> &[Component] {
    self.skeleton().components()
  }
  pub fn ncomponents(&self) -> usize {
    self.components().len()
  }
  pub fn simplex_component(&self, simplex: SimplexIdx) -> &Component {
    &self.components()[self.skeleton().simplex_component(simplex)]
  }
  pub fn boundary_components(&self) -> &[BoundaryComponent] {
    self.skeleton().boundary_components()
  }

  pub fn is_connected(&self) -> bool {
    self.ncomponents() <= 1
  }
  pub fn is_orientable(&self) -> bool {
    self.components().iter().all(Component::is_orientable)
  }
  pub fn is_valid(&self) -> bool {
    self.skeleton().is_valid()
  }
  pub fn is_ideal(&self) -> bool {
    self.vertices().iter().any(Face::is_ideal)
  }
  /// No boundary components, real or ideal.
  pub fn is_closed(&self) -> bool {
    self.boundary_components().is_empty()
  }

  /// Alternating sum of the face counts of every dimension, top simplices included.
  pub fn euler_char(&self) -> i64 {
    (0..=self.dim())
      .map(|d| Sign::from_parity(d).as_i64() * self.nfaces(d) as i64)
      .sum()
  }

  /// The orientation of `simplex` relative to the first simplex of its
  /// component. Consistent across gluings iff the component is orientable.
  pub fn simplex_orientation(&self, simplex: SimplexIdx) -> Sign {
    self.skeleton().simplex_orientation(simplex)
  }

  /// One triangulation per component, each keeping the relative order of its
  /// simplices.
  pub fn split_into_components(&self) -> Vec<Self> {
    let mut new_index = vec![0; self.size()];
    let members = self
      .components()
      .iter()
      .map(|c| {
        let sorted = c.simplices().iter().copied().sorted().collect_vec();
        for (i, &s) in sorted.iter().enumerate() {
          new_index[s] = i;
        }
        sorted
      })
      .collect_vec();

    members
      .into_iter()
      .map(|sorted| {
        let simplices = sorted
          .iter()
          .map(|&s| {
            let mut simplex = self.simplices[s].clone();
            for g in simplex.gluings.iter_mut().flatten() {
              g.simplex = new_index[g.simplex];
            }
            simplex
          })
          .collect();
        Self::from_simplices(simplices)
      })
      .collect()
  }
}

/// text output
impl<const N: usize> Triangulation<N> {
  /// Skeleton sizes followed by the table of all gluings.
  ///
  /// Each facet column is labelled by the vertices of the facet, each entry
  /// names the adjacent simplex and the images of those vertices.
  pub fn detail(&self) -> String {
    let mut out = String::new();
    let counts = (0..=self.dim()).map(|d| self.nfaces(d)).join(", ");
    writeln!(out, "Size of the skeleton (by dimension): {counts}").unwrap();
    writeln!(
      out,
      "Components: {}, boundary components: {}",
      self.ncomponents(),
      self.boundary_components().len()
    )
    .unwrap();
    writeln!(out, "{}", self.gluing_table()).unwrap();
    out
  }

  fn gluing_table(&self) -> String {
    let facets = FaceNumbering::new(self.dim(), self.dim() - 1);
    let label = |facet: usize| facets.face_vertices(facet).iter().join("");
    let width = N + 4;

    let mut out = String::new();
    write!(out, "  Simplex  |  glued to:").unwrap();
    for facet in (0..N).rev() {
      write!(out, " {:>width$}", format!("({})", label(facet))).unwrap();
    }
    writeln!(out).unwrap();
    for (i, simplex) in self.simplices.iter().enumerate() {
      write!(out, "  {i:>7}  |           ").unwrap();
      for facet in (0..N).rev() {
        let entry = match simplex.gluings[facet] {
          None => "boundary".to_string(),
          Some(g) => {
            let images = facets
              .face_vertices(facet)
              .iter()
              .map(|&v| g.perm.image(v))
              .join("");
            format!("{} ({images})", g.simplex)
          }
        };
        write!(out, " {entry:>width$}").unwrap();
      }
      writeln!(out).unwrap();
    }
    out
  }
}

impl<const N: usize> fmt::Display for Triangulation<N> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let kind = match (self.is_empty(), self.is_orientable(), self.is_closed()) {
      (true, _, _) => "Empty",
      (false, true, true) => "Closed orientable",
      (false, false, true) => "Closed non-orientable",
      (false, true, false) => "Orientable",
      (false, false, false) => "Non-orientable",
    };
    write!(
      f,
      "{kind} {}-dimensional triangulation with {} simplices",
      self.dim(),
      self.size()
    )?;
    if self.ncomponents() > 1 {
      write!(f, " in {} components", self.ncomponents())?;
    }
    Ok(())
  }
}
