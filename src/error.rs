use crate::{Dim, SimplexIdx};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
  #[error("simplex {simplex} out of range for triangulation of size {size}")]
  SimplexOutOfRange { simplex: SimplexIdx, size: usize },
  #[error("facet {facet} out of range for a simplex with {nfacets} facets")]
  FacetOutOfRange { facet: usize, nfacets: usize },
  #[error("facet {facet} of simplex {simplex} is already glued")]
  FacetAlreadyGlued { simplex: SimplexIdx, facet: usize },
  #[error("facet {facet} of simplex {simplex} cannot be glued to itself")]
  FacetGluedToItself { simplex: SimplexIdx, facet: usize },
  #[error("gluing of facet {facet} of simplex {simplex} is not mutually consistent")]
  InconsistentGluing { simplex: SimplexIdx, facet: usize },
  #[error("operation requires a connected triangulation, found {ncomponents} components")]
  Disconnected { ncomponents: usize },
  #[error("expected dimension {expected}, found {found}")]
  DimensionMismatch { expected: Dim, found: Dim },
}

/// Reasons an isomorphism signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsoSigError {
  #[error("invalid character {0:?} in isomorphism signature")]
  InvalidCharacter(char),
  #[error("isomorphism signature ends prematurely")]
  Truncated,
  #[error("invalid facet action")]
  InvalidTrit,
  #[error("more facet actions than facets")]
  TooManyFacets,
  #[error("facet action padding is not zero")]
  NonZeroPadding,
  #[error("gluing permutation index {0} out of range")]
  PermIndexOutOfRange(usize),
  #[error("integer field of {0} characters overflows")]
  FieldTooWide(usize),
  #[error("component uses more than its {count} declared simplices")]
  SimplexCountOverflow { count: usize },
  #[error("gluing refers to simplex {dest} which has not been reached")]
  DanglingJoin { dest: usize },
  #[error("facet {facet} of simplex {simplex} is glued twice")]
  FacetAlreadyGlued { simplex: usize, facet: usize },
}
