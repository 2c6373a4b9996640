pub mod canonical;
pub mod combinatorics;
pub mod error;
pub mod factory;
pub mod isomorphism;
pub mod isosig;
pub mod triangulation;

pub use combinatorics::{FaceNumbering, Perm, Sign};
pub use error::{IsoSigError, TriangulationError};
pub use isomorphism::{
  search::{IsomorphismSearch, SearchMode},
  Isomorphism,
};
pub use triangulation::{
  link::{Link, LinkLookup},
  skeleton::{BoundaryComponent, Component, Embedding, Face, Skeleton},
  Gluing, Simplex, SimplexIdx, Triangulation,
};

pub type Dim = usize;

pub type Triangulation2 = Triangulation<3>;
pub type Triangulation3 = Triangulation<4>;
pub type Triangulation4 = Triangulation<5>;
