//! Faces of every dimension, components and boundary components derived from
//! the facet gluings of a triangulation.

use super::{Simplex, SimplexIdx};
use crate::{
  combinatorics::{FaceNumbering, Perm, Sign},
  Dim,
};

use itertools::Itertools;
use std::{collections::VecDeque, fmt};
use tracing::trace;

/// One appearance of a face inside a top simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Embedding<const N: usize> {
  pub simplex: SimplexIdx,
  /// Local face number inside `simplex`.
  pub face: usize,
  /// Images `0..=subdim` are the vertices of the face in `simplex`, labelled
  /// consistently across all embeddings of a valid face.
  pub vertices: Perm<N>,
}

#[derive(Debug, Clone)]
pub struct Face<const N: usize> {
  subdim: Dim,
  embeddings: Vec<Embedding<N>>,
  boundary: bool,
  valid: bool,
  link_orientable: bool,
  component: usize,
  link_euler_char: Option<i64>,
  ideal: bool,
}

impl<const N: usize> Face<N> {
  pub fn subdim(&self) -> Dim {
    self.subdim
  }
  /// Embeddings in the order they were discovered.
  pub fn embeddings(&self) -> &[Embedding<N>] {
    &self.embeddings
  }
  pub fn front(&self) -> Embedding<N> {
    self.embeddings[0]
  }
  pub fn degree(&self) -> usize {
    self.embeddings.len()
  }
  /// Lies in a boundary facet, or is an ideal vertex.
  pub fn is_boundary(&self) -> bool {
    self.boundary
  }
  /// False iff the face is identified with itself under a non-trivial
  /// permutation of its vertices.
  pub fn is_valid(&self) -> bool {
    self.valid
  }
  pub fn is_link_orientable(&self) -> bool {
    self.link_orientable
  }
  pub fn component(&self) -> usize {
    self.component
  }
  /// Euler characteristic of the link, only known for vertices.
  pub fn link_euler_char(&self) -> Option<i64> {
    self.link_euler_char
  }
  /// A vertex whose link is closed but has the wrong Euler characteristic
  /// for a sphere.
  pub fn is_ideal(&self) -> bool {
    self.ideal
  }
}

impl<const N: usize> fmt::Display for Face<N> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let kind = if self.boundary { "Boundary" } else { "Internal" };
    write!(f, "{kind} {}-face of degree {}", self.subdim, self.degree())?;
    let appearances = self
      .embeddings
      .iter()
      .map(|e| format!("{} ({})", e.simplex, e.vertices.trunc(self.subdim + 1)))
      .join(", ");
    write!(f, "\nAppears as: {appearances}")
  }
}

#[derive(Debug, Clone)]
pub struct Component {
  simplices: Vec<SimplexIdx>,
  orientable: bool,
  nboundary_facets: usize,
}

impl Component {
  /// Simplices in breadth-first order from the lowest index.
  pub fn simplices(&self) -> &[SimplexIdx] {
    &self.simplices
  }
  pub fn size(&self) -> usize {
    self.simplices.len()
  }
  pub fn is_orientable(&self) -> bool {
    self.orientable
  }
  pub fn nboundary_facets(&self) -> usize {
    self.nboundary_facets
  }
}

/// Boundary facets connected through shared ridges, or a single ideal vertex.
#[derive(Debug, Clone)]
pub struct BoundaryComponent {
  facets: Vec<usize>,
  ideal_vertex: Option<usize>,
  component: usize,
}

impl BoundaryComponent {
  /// Global indices of the boundary facets (faces of dimension `dim - 1`).
  pub fn facets(&self) -> &[usize] {
    &self.facets
  }
  pub fn size(&self) -> usize {
    self.facets.len()
  }
  pub fn is_ideal(&self) -> bool {
    self.ideal_vertex.is_some()
  }
  pub fn ideal_vertex(&self) -> Option<usize> {
    self.ideal_vertex
  }
  pub fn component(&self) -> usize {
    self.component
  }
}

#[derive(Debug, Clone)]
pub struct Skeleton<const N: usize> {
  /// `[subdim][face]` for `subdim < dim`.
  faces: Vec<Vec<Face<N>>>,
  /// `[subdim][simplex][local face]` to global face.
  simplex_faces: Vec<Vec<Vec<usize>>>,
  components: Vec<Component>,
  simplex_component: Vec<usize>,
  orientation: Vec<Sign>,
  boundary_components: Vec<BoundaryComponent>,
}

impl<const N: usize> Skeleton<N> {
  pub fn faces(&self, subdim: Dim) -> &[Face<N>] {
    assert!(
      subdim < N - 1,
      "Faces of dimension {subdim} are the top simplices themselves."
    );
    &self.faces[subdim]
  }
  pub fn simplex_face(&self, simplex: SimplexIdx, subdim: Dim, face: usize) -> usize {
    self.simplex_faces[subdim][simplex][face]
  }
  pub fn components(&self) -> &[Component] {
    &self.components
  }
  pub fn simplex_component(&self, simplex: SimplexIdx) -> usize {
    self.simplex_component[simplex]
  }
  pub fn simplex_orientation(&self, simplex: SimplexIdx) -> Sign {
    self.orientation[simplex]
  }
  pub fn boundary_components(&self) -> &[BoundaryComponent] {
    &self.boundary_components
  }
  pub fn is_valid(&self) -> bool {
    self.faces.iter().flatten().all(Face::is_valid)
  }
}

impl<const N: usize> Skeleton<N> {
  pub(crate) fn compute(simplices: &[Simplex<N>]) -> Self {
    let dim = N - 1;
    let (components, simplex_component, orientation) = compute_components(simplices);

    let mut faces: Vec<Vec<Face<N>>> = Vec::with_capacity(dim);
    let mut simplex_faces: Vec<Vec<Vec<usize>>> = Vec::with_capacity(dim);
    let mut link_euler_chars = Vec::new();
    for subdim in 0..dim {
      let classes = FaceClasses::compute(simplices, subdim, &simplex_component);
      if subdim == 0 {
        link_euler_chars = vec![0; classes.faces.len()];
      } else {
        // Each orbit of pointed faces is one cell of dimension `subdim - 1`
        // in the link of the pointed vertex.
        let cell_sign = Sign::from_parity(subdim - 1).as_i64();
        for (face, orbits) in classes.faces.iter().zip(&classes.orbits) {
          let front = face.front();
          for &position in orbits {
            let local_vertex = front.vertices.image(position);
            let vertex = simplex_faces[0][front.simplex][local_vertex];
            link_euler_chars[vertex] += cell_sign;
          }
        }
      }
      faces.push(classes.faces);
      simplex_faces.push(classes.simplex_faces);
    }

    let top_sign = Sign::from_parity(dim - 1).as_i64();
    let link_dim = dim - 1;
    for (vertex, chi) in faces[0].iter_mut().zip(link_euler_chars) {
      let chi = chi + top_sign * vertex.degree() as i64;
      let sphere_chi = 1 + Sign::from_parity(link_dim).as_i64();
      vertex.link_euler_char = Some(chi);
      vertex.ideal = !vertex.boundary && link_dim % 2 == 0 && chi != sphere_chi;
      vertex.boundary |= vertex.ideal;
    }

    let boundary_components =
      compute_boundary_components(&faces, &simplex_faces, &simplex_component);

    trace!(
      nsimplices = simplices.len(),
      face_counts = ?faces.iter().map(Vec::len).collect_vec(),
      ncomponents = components.len(),
      nboundary_components = boundary_components.len(),
      "computed skeleton"
    );

    Self {
      faces,
      simplex_faces,
      components,
      simplex_component,
      orientation,
      boundary_components,
    }
  }
}

/// All faces of one dimension.
struct FaceClasses<const N: usize> {
  faces: Vec<Face<N>>,
  simplex_faces: Vec<Vec<usize>>,
  /// Per face, one representative position `0..=subdim` per orbit of the
  /// face vertices under self-identifications.
  orbits: Vec<Vec<usize>>,
}

impl<const N: usize> FaceClasses<N> {
  fn compute(simplices: &[Simplex<N>], subdim: Dim, simplex_component: &[usize]) -> Self {
    let numbering = FaceNumbering::new(N - 1, subdim);
    let nlocal = numbering.nfaces();

    let mut global: Vec<Vec<Option<usize>>> = vec![vec![None; nlocal]; simplices.len()];
    let mut position = vec![vec![0; nlocal]; simplices.len()];
    let mut faces = Vec::new();
    let mut orbits = Vec::new();

    for (simplex, local) in (0..simplices.len()).cartesian_product(0..nlocal) {
      if global[simplex][local].is_some() {
        continue;
      }
      let index = faces.len();
      global[simplex][local] = Some(index);
      position[simplex][local] = 0;

      let mut embeddings = vec![Embedding {
        simplex,
        face: local,
        vertices: numbering.ordering(local),
      }];
      let mut link_signs = vec![Sign::Pos];
      let mut boundary = false;
      let mut link_orientable = true;
      let mut identified = UnionFind::new(subdim + 1);

      let mut next = 0;
      while let Some(&emb) = embeddings.get(next) {
        let link_sign = link_signs[next];
        next += 1;
        for facet in (0..N).filter(|&v| !numbering.contains_vertex(emb.face, v)) {
          let Some(gluing) = simplices[emb.simplex].gluing(facet) else {
            boundary = true;
            continue;
          };
          let vertices = gluing.perm * emb.vertices;
          let adj_local = numbering.face_number(vertices);
          if global[gluing.simplex][adj_local].is_none() {
            global[gluing.simplex][adj_local] = Some(index);
            position[gluing.simplex][adj_local] = embeddings.len();
            embeddings.push(Embedding {
              simplex: gluing.simplex,
              face: adj_local,
              vertices,
            });
            link_signs.push(-link_sign);
            continue;
          }

          let pos = position[gluing.simplex][adj_local];
          let existing = embeddings[pos];
          for i in 0..=subdim {
            let j = existing.vertices.pre_image(vertices.image(i));
            identified.union(i, j);
          }
          if link_signs[pos] * existing.vertices.sign() != -(link_sign * vertices.sign()) {
            link_orientable = false;
          }
        }
      }

      let reps = (0..=subdim).filter(|&i| identified.find(i) == i).collect_vec();
      let valid = reps.len() == subdim + 1;
      orbits.push(reps);
      faces.push(Face {
        subdim,
        embeddings,
        boundary,
        valid,
        link_orientable,
        component: simplex_component[simplex],
        link_euler_char: None,
        ideal: false,
      });
    }

    let simplex_faces = global
      .into_iter()
      .map(|locals| locals.into_iter().flatten().collect())
      .collect();
    Self {
      faces,
      simplex_faces,
      orbits,
    }
  }
}

fn compute_components<const N: usize>(
  simplices: &[Simplex<N>],
) -> (Vec<Component>, Vec<usize>, Vec<Sign>) {
  let mut components = Vec::new();
  let mut simplex_component = vec![None; simplices.len()];
  let mut orientation = vec![Sign::Pos; simplices.len()];

  for start in 0..simplices.len() {
    if simplex_component[start].is_some() {
      continue;
    }
    let icomp = components.len();
    simplex_component[start] = Some(icomp);
    let mut members = vec![start];
    let mut orientable = true;
    let mut nboundary_facets = 0;

    let mut queue = VecDeque::from([start]);
    while let Some(simplex) = queue.pop_front() {
      for gluing in simplices[simplex].gluings() {
        let Some(gluing) = gluing else {
          nboundary_facets += 1;
          continue;
        };
        let expected = -(gluing.perm.sign() * orientation[simplex]);
        if simplex_component[gluing.simplex].is_none() {
          simplex_component[gluing.simplex] = Some(icomp);
          orientation[gluing.simplex] = expected;
          members.push(gluing.simplex);
          queue.push_back(gluing.simplex);
        } else if orientation[gluing.simplex] != expected {
          orientable = false;
        }
      }
    }

    components.push(Component {
      simplices: members,
      orientable,
      nboundary_facets,
    });
  }

  let simplex_component = simplex_component.into_iter().flatten().collect();
  (components, simplex_component, orientation)
}

fn compute_boundary_components<const N: usize>(
  faces: &[Vec<Face<N>>],
  simplex_faces: &[Vec<Vec<usize>>],
  simplex_component: &[usize],
) -> Vec<BoundaryComponent> {
  let dim = N - 1;
  let facets = &faces[dim - 1];
  let boundary_facets = (0..facets.len())
    .filter(|&f| facets[f].is_boundary())
    .collect_vec();

  let mut joined = UnionFind::new(boundary_facets.len());
  if dim >= 2 {
    let ridges = FaceNumbering::new(dim, dim - 2);
    let mut owner = vec![None; faces[dim - 2].len()];
    for (k, &facet) in boundary_facets.iter().enumerate() {
      let emb = facets[facet].front();
      for ridge in (0..ridges.nfaces()).filter(|&r| !ridges.contains_vertex(r, emb.face)) {
        let ridge = simplex_faces[dim - 2][emb.simplex][ridge];
        match owner[ridge] {
          None => owner[ridge] = Some(k),
          Some(other) => joined.union(other, k),
        }
      }
    }
  }

  let mut components: Vec<BoundaryComponent> = Vec::new();
  let mut root_component: Vec<Option<usize>> = vec![None; boundary_facets.len()];
  for (k, &facet) in boundary_facets.iter().enumerate() {
    let root = joined.find(k);
    match root_component[root] {
      Some(c) => components[c].facets.push(facet),
      None => {
        root_component[root] = Some(components.len());
        components.push(BoundaryComponent {
          facets: vec![facet],
          ideal_vertex: None,
          component: simplex_component[facets[facet].front().simplex],
        });
      }
    }
  }

  for (v, vertex) in faces[0].iter().enumerate().filter(|(_, v)| v.is_ideal()) {
    components.push(BoundaryComponent {
      facets: Vec::new(),
      ideal_vertex: Some(v),
      component: vertex.component,
    });
  }
  components
}

struct UnionFind {
  parent: Vec<usize>,
}

impl UnionFind {
  fn new(n: usize) -> Self {
    Self {
      parent: (0..n).collect(),
    }
  }
  fn find(&mut self, mut i: usize) -> usize {
    while self.parent[i] != i {
      self.parent[i] = self.parent[self.parent[i]];
      i = self.parent[i];
    }
    i
  }
  /// Merges the classes of `a` and `b`, keeping the smaller root.
  fn union(&mut self, a: usize, b: usize) {
    let (a, b) = (self.find(a), self.find(b));
    if a != b {
      self.parent[a.max(b)] = a.min(b);
    }
  }
}

#[cfg(test)]
mod test {
  use crate::{
    combinatorics::{FaceNumbering, Perm},
    Triangulation,
  };

  #[test]
  fn single_tetrahedron() {
    let tri = Triangulation::<4>::with_simplices(1);
    assert_eq!(tri.nvertices(), 4);
    assert_eq!(tri.nedges(), 6);
    assert_eq!(tri.nfaces(2), 4);
    for v in tri.vertices() {
      assert!(v.is_boundary());
      assert_eq!(v.link_euler_char(), Some(1));
      assert!(!v.is_ideal());
    }
    assert_eq!(tri.boundary_components().len(), 1);
    assert_eq!(tri.boundary_components()[0].size(), 4);
    assert_eq!(tri.euler_char(), 1);
  }

  #[test]
  fn embeddings_agree_on_face_vertices() {
    let mut tri = Triangulation::<4>::with_simplices(2);
    let perm = Perm::from_images([1, 2, 3, 0]);
    tri.join(0, 0, 1, perm).unwrap();
    // two tetrahedra sharing a triangle
    assert_eq!((tri.nvertices(), tri.nedges(), tri.nfaces(2)), (5, 9, 7));

    for subdim in 0..3 {
      let numbering = FaceNumbering::new(3, subdim);
      for (index, face) in tri.faces(subdim).iter().enumerate() {
        for emb in face.embeddings() {
          assert_eq!(numbering.face_number(emb.vertices), emb.face);
          assert_eq!(tri.simplex_face(emb.simplex, subdim, emb.face), index);
        }
      }
    }

    let shared = tri.simplex_face(0, 2, 0);
    let [a, b] = tri.face(2, shared).embeddings() else {
      panic!("shared triangle must have two embeddings");
    };
    assert_eq!((a.simplex, b.simplex), (0, 1));
    for i in 0..3 {
      assert_eq!(b.vertices.image(i), perm.image(a.vertices.image(i)));
    }
  }

  #[test]
  fn invalid_edge_and_nonorientable_link() {
    // A triangle with two edges glued head to tail is a Moebius band.
    let mut tri = Triangulation::<3>::with_simplices(1);
    tri.join(0, 0, 0, Perm::from_images([1, 2, 0])).unwrap();
    assert!(!tri.is_orientable());
    assert_eq!(tri.nedges(), 2);
    assert!(tri.edges().iter().all(|e| e.is_valid()));

    // In dimension three, gluing two faces of a tetrahedron so that an edge is
    // mapped onto itself reversed makes that edge invalid.
    let mut tet = Triangulation::<4>::with_simplices(1);
    tet.join(0, 2, 0, Perm::from_images([1, 0, 3, 2])).unwrap();
    let invalid = tet.edges().iter().filter(|e| !e.is_valid()).count();
    assert_eq!(invalid, 1);
    assert!(!tet.is_valid());
  }

  #[test]
  fn suspended_torus_has_ideal_apexes() {
    // Two cones over the two-triangle torus, glued along their bases.
    let torus = Triangulation::torus();
    let mut tri = Triangulation::<4>::with_simplices(4);
    for offset in [0, 2] {
      for facet in [1, 2, 0] {
        let gluing = torus.adjacent(0, facet).unwrap();
        tri
          .join(offset, facet, offset + gluing.simplex, gluing.perm.extend())
          .unwrap();
      }
    }
    for simplex in 0..2 {
      tri.join(simplex, 3, simplex + 2, Perm::identity()).unwrap();
    }
    tri.check_consistency().unwrap();

    assert!(!tri.has_boundary_facets());
    assert_eq!(tri.nvertices(), 3);
    assert_eq!(tri.euler_char(), 2);

    let ideal = tri.vertices().iter().filter(|v| v.is_ideal()).collect::<Vec<_>>();
    assert_eq!(ideal.len(), 2);
    for v in &ideal {
      assert!(v.is_boundary(), "Ideal vertices count as boundary.");
      assert_eq!(v.link_euler_char(), Some(0));
      assert_eq!(v.degree(), 2);
    }
    let base = tri.vertices().iter().find(|v| !v.is_ideal()).unwrap();
    assert!(!base.is_boundary());
    assert_eq!(base.link_euler_char(), Some(2));

    assert!(tri.is_ideal() && !tri.is_closed());
    assert_eq!(tri.boundary_components().len(), 2);
    assert!(tri.boundary_components().iter().all(|b| b.is_ideal()));
  }
}
