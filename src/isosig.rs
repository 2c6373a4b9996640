//! Isomorphism signatures.
//!
//! A signature is a short printable string that identifies a triangulation up
//! to relabelling: two triangulations have the same signature iff they are
//! combinatorially isomorphic. Each connected component is encoded separately
//! by walking it breadth first from the starting simplex and vertex ordering
//! that yields the smallest string. The component strings are then sorted and
//! concatenated.
//!
//! A component string consists of
//! - the number of simplices, prefixed by a width marker if it exceeds 62,
//! - one action per facet that is visited by the walk
//!   (`0` boundary, `1` first gluing into a new simplex, `2` any other gluing),
//!   packed three per character,
//! - the destination simplex of every `2` action,
//! - the lexicographic index of the gluing permutation of every `2` action.

pub mod codec;

use crate::{
  combinatorics::Perm,
  error::IsoSigError,
  isomorphism::Isomorphism,
  triangulation::{SimplexIdx, Triangulation},
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use itertools::Itertools;
use tracing::{debug, warn};

/// facet actions
const BOUNDARY: u8 = 0;
const NEW_SIMPLEX: u8 = 1;
const JOIN: u8 = 2;

impl<const N: usize> Triangulation<N> {
  const CHARS_PER_PERM: usize = codec::chars_per_perm(Perm::<N>::NPERMS);

  pub fn iso_sig(&self) -> String {
    if self.is_empty() {
      return codec::encode_char(0).to_string();
    }
    let mut sigs = self
      .components()
      .iter()
      .map(|c| self.component_sig(c.simplices()).0)
      .collect_vec();
    sigs.sort();
    debug!(ncomponents = sigs.len(), "computed isomorphism signature");
    sigs.concat()
  }

  /// The signature together with the relabelling that takes `self` onto the
  /// triangulation [`Self::from_iso_sig`] reconstructs from it.
  ///
  /// Only connected triangulations have a single such relabelling.
  pub fn iso_sig_with_relabelling(&self) -> Option<(String, Isomorphism<N>)> {
    if self.is_empty() {
      return Some((self.iso_sig(), Isomorphism::identity(0)));
    }
    if !self.is_connected() {
      warn!(
        ncomponents = self.ncomponents(),
        "no signature relabelling for a disconnected triangulation"
      );
      return None;
    }
    let (sig, start, vertices) = self.component_sig(self.components()[0].simplices());
    let walk = self.walk(start, vertices);
    let iso = Isomorphism::new(walk.image.into_iter().flatten().collect(), walk.vertex_map);
    Some((sig, iso))
  }

  /// Reconstructs a triangulation from its signature.
  ///
  /// Surrounding whitespace is ignored. The result is labelled exactly as the
  /// walk that produced the signature visited it.
  pub fn from_iso_sig(sig: &str) -> Result<Self, IsoSigError> {
    let result = Self::decode(sig.trim());
    if let Err(err) = &result {
      debug!(%err, sig, "rejected isomorphism signature");
    }
    result
  }

  /// Number of simplices in the first component encoded by `sig`.
  pub fn iso_sig_component_size(sig: &str) -> Result<usize, IsoSigError> {
    let mut reader = codec::Reader::new(sig.trim())?;
    reader.read_size().map(|(size, _)| size)
  }
}

/// encoding
impl<const N: usize> Triangulation<N> {
  /// Smallest component string over all starting choices, with the
  /// starting simplex and vertex ordering that produce it.
  fn component_sig(&self, simplices: &[SimplexIdx]) -> (String, SimplexIdx, Perm<N>) {
    let starts = simplices
      .iter()
      .copied()
      .cartesian_product(Perm::<N>::all_ordered().collect_vec())
      .collect_vec();

    #[cfg(feature = "rayon")]
    let best = starts
      .par_iter()
      .enumerate()
      .map(|(i, &(simplex, vertices))| (self.walk(simplex, vertices).encode(), i))
      .min();
    #[cfg(not(feature = "rayon"))]
    let best = starts
      .iter()
      .enumerate()
      .map(|(i, &(simplex, vertices))| (self.walk(simplex, vertices).encode(), i))
      .min();

    let (sig, i) = best.expect("components are never empty");
    (sig, starts[i].0, starts[i].1)
  }

  /// Breadth first walk from `start`, whose vertex `vertices[j]` is
  /// relabelled to `j`.
  fn walk(&self, start: SimplexIdx, vertices: Perm<N>) -> Walk<N> {
    let mut image = vec![None; self.size()];
    let mut vertex_map = vec![Perm::identity(); self.size()];
    let mut preimage = vec![start];
    image[start] = Some(0);
    vertex_map[start] = vertices.inverse();

    let mut actions = Vec::new();
    let mut joins = Vec::new();
    let mut simp_img = 0;
    while let Some(&src) = preimage.get(simp_img) {
      for facet_img in 0..N {
        let facet = vertex_map[src].pre_image(facet_img);
        let Some(g) = self.adjacent(src, facet) else {
          actions.push(BOUNDARY);
          continue;
        };
        let dest = g.simplex;
        match image[dest] {
          None => {
            image[dest] = Some(preimage.len());
            vertex_map[dest] = vertex_map[src] * g.perm.inverse();
            preimage.push(dest);
            actions.push(NEW_SIMPLEX);
          }
          Some(dest_img) => {
            let seen = dest_img < simp_img
              || (dest == src && vertex_map[src].image(g.perm.image(facet)) < facet_img);
            if seen {
              continue;
            }
            let perm = vertex_map[dest] * g.perm * vertex_map[src].inverse();
            joins.push((dest_img, perm.ordered_sn_index()));
            actions.push(JOIN);
          }
        }
      }
      simp_img += 1;
    }

    Walk {
      size: preimage.len(),
      actions,
      joins,
      image,
      vertex_map,
    }
  }
}

/// The record of one walk over a component.
struct Walk<const N: usize> {
  size: usize,
  actions: Vec<u8>,
  /// destination image and gluing index of every join
  joins: Vec<(usize, usize)>,
  image: Vec<Option<SimplexIdx>>,
  vertex_map: Vec<Perm<N>>,
}

impl<const N: usize> Walk<N> {
  fn encode(&self) -> String {
    let mut sig = String::new();
    let nchars = if self.size < 63 {
      1
    } else {
      let nchars = codec::field_width(self.size);
      sig.push(codec::encode_char(63));
      sig.push(codec::encode_char(nchars));
      nchars
    };
    codec::append_int(&mut sig, self.size, nchars);
    for trits in self.actions.chunks(3) {
      codec::append_trits(&mut sig, trits);
    }
    for &(dest, _) in &self.joins {
      codec::append_int(&mut sig, dest, nchars);
    }
    for &(_, perm) in &self.joins {
      codec::append_int(&mut sig, perm, Triangulation::<N>::CHARS_PER_PERM);
    }
    sig
  }
}

/// decoding
impl<const N: usize> Triangulation<N> {
  fn decode(sig: &str) -> Result<Self, IsoSigError> {
    let mut reader = codec::Reader::new(sig)?;
    let mut tri = Self::new();
    while !reader.is_empty() {
      let component = Self::decode_component(&mut reader)?;
      tri.insert_triangulation(&component);
    }
    Ok(tri)
  }

  fn decode_component(reader: &mut codec::Reader) -> Result<Self, IsoSigError> {
    let (size, nchars) = reader.read_size()?;
    if size == 0 {
      return Ok(Self::new());
    }

    let nfacets = N * size;
    let mut actions = Vec::new();
    let mut nfacets_read = 0;
    let mut njoins = 0;
    while nfacets_read < nfacets {
      for trit in reader.read_trits()? {
        if nfacets_read == nfacets {
          if trit != BOUNDARY {
            return Err(IsoSigError::NonZeroPadding);
          }
          continue;
        }
        nfacets_read += match trit {
          BOUNDARY => 1,
          NEW_SIMPLEX => 2,
          JOIN => {
            njoins += 1;
            2
          }
          _ => return Err(IsoSigError::InvalidTrit),
        };
        if nfacets_read > nfacets {
          return Err(IsoSigError::TooManyFacets);
        }
        actions.push(trit);
      }
    }

    let dests = (0..njoins)
      .map(|_| reader.read_int(nchars))
      .collect::<Result<Vec<_>, _>>()?;
    let perms = (0..njoins)
      .map(|_| {
        let index = reader.read_int(Self::CHARS_PER_PERM)?;
        if index < Perm::<N>::NPERMS {
          Ok(Perm::ordered_sn(index))
        } else {
          Err(IsoSigError::PermIndexOutOfRange(index))
        }
      })
      .collect::<Result<Vec<_>, _>>()?;

    let mut tri = Self::with_simplices(size);
    let mut actions = actions.into_iter();
    let mut joins = dests.into_iter().zip(perms);
    let mut next_unused = 1;
    for simplex in 0..size {
      if simplex >= next_unused {
        return Err(IsoSigError::DanglingJoin { dest: simplex });
      }
      for facet in 0..N {
        if tri.adjacent(simplex, facet).is_some() {
          continue;
        }
        match actions.next().ok_or(IsoSigError::Truncated)? {
          NEW_SIMPLEX => {
            if next_unused >= size {
              return Err(IsoSigError::SimplexCountOverflow { count: size });
            }
            tri.set_gluing(simplex, facet, next_unused, Perm::identity());
            next_unused += 1;
          }
          JOIN => {
            let (dest, perm) = joins.next().ok_or(IsoSigError::Truncated)?;
            if dest >= next_unused {
              return Err(IsoSigError::DanglingJoin { dest });
            }
            let dest_facet = perm.image(facet);
            if (dest, dest_facet) <= (simplex, facet) || tri.adjacent(dest, dest_facet).is_some() {
              return Err(IsoSigError::FacetAlreadyGlued {
                simplex: dest,
                facet: dest_facet,
              });
            }
            tri.set_gluing(simplex, facet, dest, perm);
          }
          _ => {}
        }
      }
    }
    Ok(tri)
  }
}
