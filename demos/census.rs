//! Census of closed surfaces built from two triangles.
//!
//! Every way of pairing up the edges of the triangles is enumerated, and the
//! results are deduplicated by isomorphism signature.
//!
//! Run with `RUST_LOG=debug` for progress output.

use indexmap::IndexMap;
use tracing::info;
use triangulum::{Perm, Triangulation2};

const NTRIANGLES: usize = 2;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let mut census = IndexMap::new();
  close_up(&mut Triangulation2::with_simplices(NTRIANGLES), &mut census);
  census.sort_keys();
  info!(nclasses = census.len(), "census complete");

  for (sig, tri) in &census {
    println!("{sig:<12} chi = {:>2}, {tri}", tri.euler_char());
  }
}

/// Glues the first free edge to every later free edge in every possible way.
fn close_up(tri: &mut Triangulation2, census: &mut IndexMap<String, Triangulation2>) {
  let free = (0..tri.size())
    .flat_map(|s| (0..3).map(move |f| (s, f)))
    .find(|&(s, f)| tri.adjacent(s, f).is_none());
  let Some((simplex, facet)) = free else {
    if tri.is_connected() {
      census.entry(tri.iso_sig()).or_insert_with(|| tri.clone());
    }
    return;
  };

  for perm in Perm::<3>::all() {
    for other in simplex..tri.size() {
      if tri.join(simplex, facet, other, perm).is_ok() {
        close_up(tri, census);
        tri
          .unjoin(simplex, facet)
          .expect("the gluing was just made");
      }
    }
  }
}
