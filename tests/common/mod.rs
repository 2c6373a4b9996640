#![allow(dead_code)]

use proptest::prelude::*;
use triangulum::{Isomorphism, Perm, Triangulation};

/// Random triangulations built from a list of attempted gluings. Gluings
/// that clash with earlier ones are dropped.
pub fn triangulation<const N: usize>(max_size: usize) -> impl Strategy<Value = Triangulation<N>> {
  (1..=max_size).prop_flat_map(|size| {
    let gluing = (0..size, 0..N, 0..size, 0..Perm::<N>::NPERMS);
    prop::collection::vec(gluing, 0..=size * N).prop_map(move |gluings| {
      let mut tri = Triangulation::with_simplices(size);
      for (simplex, facet, other, perm) in gluings {
        let _ = tri.join(simplex, facet, other, Perm::sn(perm));
      }
      tri
    })
  })
}

pub fn connected_triangulation<const N: usize>(
  max_size: usize,
) -> impl Strategy<Value = Triangulation<N>> {
  triangulation(max_size).prop_filter("connected", |tri| tri.is_connected())
}

/// A random relabelling of a triangulation with `size` simplices.
pub fn relabelling<const N: usize>(size: usize) -> impl Strategy<Value = Isomorphism<N>> {
  let images = Just((0..size).collect::<Vec<_>>()).prop_shuffle();
  let perms = prop::collection::vec(0..Perm::<N>::NPERMS, size);
  (images, perms)
    .prop_map(|(images, perms)| Isomorphism::new(images, perms.into_iter().map(Perm::sn).collect()))
}

/// A triangulation together with a random relabelling of it.
pub fn relabelled<const N: usize>(
  max_size: usize,
) -> impl Strategy<Value = (Triangulation<N>, Isomorphism<N>)> {
  triangulation(max_size).prop_flat_map(|tri| {
    let size = tri.size();
    (Just(tri), relabelling(size))
  })
}

/// A connected triangulation together with a random relabelling of it.
pub fn connected_relabelled<const N: usize>(
  max_size: usize,
) -> impl Strategy<Value = (Triangulation<N>, Isomorphism<N>)> {
  connected_triangulation(max_size).prop_flat_map(|tri| {
    let size = tri.size();
    (Just(tri), relabelling(size))
  })
}

/// A chain of `size` tetrahedra, each glued to the next along one facet.
pub fn chain(size: usize) -> Triangulation<4> {
  let mut tri = Triangulation::with_simplices(size);
  for i in 1..size {
    tri.join(i - 1, 0, i, Perm::transposition(0, 1)).unwrap();
  }
  tri
}
