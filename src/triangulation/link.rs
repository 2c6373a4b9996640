//! Links of faces as lower-dimensional triangulations.

use super::{SimplexIdx, Triangulation};
use crate::{
  combinatorics::{FaceNumbering, Perm},
  error::TriangulationError,
  isomorphism::Isomorphism,
  Dim,
};

use indexmap::IndexMap;

/// How link construction finds the embedding behind an adjacent simplex.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LinkLookup {
  /// Linear scan over all embeddings, quadratic in the degree of the face.
  #[default]
  Scan,
  /// Hash lookup keyed by simplex and local face.
  Indexed,
}

/// The link of a face, a triangulation of dimension `M - 1`, together with
/// its inclusion into the ambient triangulation.
#[derive(Debug, Clone)]
pub struct Link<const M: usize, const N: usize> {
  /// Link simplex `i` corresponds to embedding `i` of the face.
  pub triangulation: Triangulation<M>,
  /// Maps link simplex `i` to the simplex of embedding `i`. Link vertex `j`
  /// maps to the ambient vertex `inclusion.facet_perm(i)[j]`, the images
  /// `M..N` are the vertices of the face itself.
  pub inclusion: Isomorphism<N>,
}

impl<const N: usize> Triangulation<N> {
  /// The link of face `face` of dimension `subdim`, where `M == N - subdim - 1`.
  ///
  /// Returns `Ok(None)` for invalid faces, whose link is not defined.
  pub fn link<const M: usize>(
    &self,
    subdim: Dim,
    face: usize,
  ) -> Result<Option<Link<M, N>>, TriangulationError> {
    self.link_with(subdim, face, LinkLookup::default())
  }

  pub fn link_with<const M: usize>(
    &self,
    subdim: Dim,
    face: usize,
    lookup: LinkLookup,
  ) -> Result<Option<Link<M, N>>, TriangulationError> {
    if subdim + 2 > self.dim() || M + subdim + 1 != N {
      return Err(TriangulationError::DimensionMismatch {
        expected: self.dim().saturating_sub(subdim + 1),
        found: M.saturating_sub(1),
      });
    }
    Ok(self.build_link(subdim, face, lookup))
  }

  fn build_link<const M: usize>(
    &self,
    subdim: Dim,
    face: usize,
    lookup: LinkLookup,
  ) -> Option<Link<M, N>> {
    let face = self.face(subdim, face);
    if !face.is_valid() {
      return None;
    }
    let numbering = FaceNumbering::new(self.dim(), subdim);
    let embeddings = face.embeddings();
    let index: IndexMap<(SimplexIdx, usize), usize> = match lookup {
      LinkLookup::Scan => IndexMap::new(),
      LinkLookup::Indexed => embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| ((e.simplex, e.face), i))
        .collect(),
    };
    let find = |simplex: SimplexIdx, local: usize| -> usize {
      let found = match lookup {
        LinkLookup::Scan => embeddings
          .iter()
          .position(|e| e.simplex == simplex && e.face == local),
        LinkLookup::Indexed => index.get(&(simplex, local)).copied(),
      };
      found.unwrap_or_else(|| unreachable!("adjacent embedding belongs to the same face"))
    };

    // Link vertex `j` of embedding `i` is vertex `subdim + 1 + j` of its
    // vertex labelling.
    let shift = Perm::<N>::from_images(std::array::from_fn(|j| (j + subdim + 1) % N));
    let maps: Vec<Perm<N>> = embeddings.iter().map(|e| e.vertices * shift).collect();

    let mut link = Triangulation::<M>::new();
    for e in embeddings {
      link.add_simplex_with_description(format!(
        "{} ({})",
        e.simplex,
        e.vertices.trunc(subdim + 1)
      ));
    }
    for (i, e) in embeddings.iter().enumerate() {
      for j in 0..M {
        if link.adjacent(i, j).is_some() {
          continue;
        }
        let Some(gluing) = self.adjacent(e.simplex, maps[i].image(j)) else {
          continue;
        };
        let adj_local = numbering.face_number(gluing.perm * e.vertices);
        let k = find(gluing.simplex, adj_local);
        let perm = (maps[k].inverse() * gluing.perm * maps[i]).contract::<M>();
        link.set_gluing(i, j, k, perm);
      }
    }

    let inclusion = Isomorphism::new(embeddings.iter().map(|e| e.simplex).collect(), maps);
    Some(Link {
      triangulation: link,
      inclusion,
    })
  }
}

macro_rules! vertex_link {
  ($n:literal, $m:literal) => {
    impl Triangulation<$n> {
      /// The link of a vertex, `None` if the vertex is invalid.
      pub fn vertex_link(&self, vertex: usize) -> Option<Link<$m, $n>> {
        self.build_link(0, vertex, LinkLookup::Scan)
      }
    }
  };
}
vertex_link!(3, 2);
vertex_link!(4, 3);
vertex_link!(5, 4);

macro_rules! edge_link {
  ($n:literal, $m:literal) => {
    impl Triangulation<$n> {
      /// The link of an edge, `None` if the edge is invalid.
      pub fn edge_link(&self, edge: usize) -> Option<Link<$m, $n>> {
        self.build_link(1, edge, LinkLookup::Scan)
      }
    }
  };
}
edge_link!(4, 2);
edge_link!(5, 3);

#[cfg(test)]
mod test {
  use super::*;

  fn double_tetrahedron() -> Triangulation<4> {
    let mut tri = Triangulation::<4>::with_simplices(2);
    for facet in 0..4 {
      tri.join(0, facet, 1, Perm::identity()).unwrap();
    }
    tri
  }

  #[test]
  fn vertex_links_of_sphere() {
    let tri = double_tetrahedron();
    for v in 0..tri.nvertices() {
      let link = tri.vertex_link(v).unwrap();
      let link = &link.triangulation;
      assert_eq!(link.size(), 2);
      assert!(link.is_closed());
      assert_eq!(link.euler_char(), 2);
      link.check_consistency().unwrap();
    }
  }

  #[test]
  fn edge_link_is_a_circle() {
    let tri = double_tetrahedron();
    let link = tri.edge_link(0).unwrap();
    assert_eq!(link.triangulation.size(), 2);
    assert!(link.triangulation.is_closed());
    assert_eq!(link.triangulation.nvertices(), 2);
    assert_eq!(link.triangulation.simplex(0).description(), "0 (01)");
  }

  #[test]
  fn inclusion_maps_link_vertices_off_the_face() {
    let mut tri = Triangulation::<4>::with_simplices(2);
    tri.join(0, 1, 1, Perm::from_images([2, 0, 1, 3])).unwrap();
    for v in 0..tri.nvertices() {
      let Some(link) = tri.vertex_link(v) else {
        continue;
      };
      let vertex = tri.face(0, v);
      for (i, emb) in vertex.embeddings().iter().enumerate() {
        let map = link.inclusion.facet_perm(i);
        assert_eq!(link.inclusion.simp_image(i), emb.simplex);
        assert_eq!(map.image(3), emb.vertices.image(0));
        for j in 0..3 {
          assert_ne!(map.image(j), emb.vertices.image(0));
        }
      }
    }
  }

  fn assert_lookups_agree<const M: usize>(tri: &Triangulation<4>, subdim: Dim) {
    for face in 0..tri.nfaces(subdim) {
      let scan = tri.link_with::<M>(subdim, face, LinkLookup::Scan).unwrap().unwrap();
      let indexed = tri.link_with::<M>(subdim, face, LinkLookup::Indexed).unwrap().unwrap();
      assert!(scan.triangulation.is_identical_to(&indexed.triangulation));
      assert_eq!(scan.inclusion, indexed.inclusion);
    }
  }

  #[test]
  fn lookup_strategies_agree() {
    let mut tri = double_tetrahedron();
    tri.unjoin(0, 3).unwrap();
    assert_lookups_agree::<3>(&tri, 0);
    assert_lookups_agree::<2>(&tri, 1);
  }

  #[test]
  fn wrong_link_dimension() {
    let tri = double_tetrahedron();
    assert_eq!(
      tri.link::<2>(0, 0).unwrap_err(),
      TriangulationError::DimensionMismatch {
        expected: 2,
        found: 1
      }
    );
  }
}
