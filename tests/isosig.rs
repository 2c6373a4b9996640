mod common;

use proptest::prelude::*;
use triangulum::{IsoSigError, Perm, Triangulation, Triangulation2, Triangulation3, Triangulation4};

#[test]
fn known_signatures() {
  let cases: [(Triangulation3, &str); 4] = [
    (Triangulation::new(), "a"),
    (Triangulation::ball(), "baa"),
    (Triangulation::sphere(), "cPcbbbaaa"),
    (common::chain(2), "caba"),
  ];
  for (tri, expected) in cases {
    let sig = tri.iso_sig();
    println!("{tri}: {sig}");
    assert_eq!(sig, expected, "Wrong signature for {tri}.");
  }
  assert_eq!(Triangulation2::sphere().iso_sig(), "cPbbaa");
}

#[test]
fn pentachoron_signatures() {
  assert_eq!(Triangulation4::ball().iso_sig(), "baa");
  let sphere = Triangulation4::sphere();
  // five actions in two characters, then four joins with two-character gluings
  assert_eq!(sphere.iso_sig(), "cPkbbbbaaaaaaaa");

  for tri in [sphere, Triangulation4::simplex_boundary()] {
    let sig = tri.iso_sig();
    assert_eq!(Triangulation4::iso_sig_component_size(&sig), Ok(tri.size()));
    let decoded = Triangulation4::from_iso_sig(&sig).unwrap();
    decoded.check_consistency().unwrap();
    assert_eq!(decoded.iso_sig(), sig);
    assert!(decoded.is_isomorphic_to(&tri).is_some(), "Decoding {sig} changed {tri}.");
  }
}

#[test]
fn order_of_gluing_does_not_matter() {
  let mut forward = Triangulation3::with_simplices(2);
  forward.join(0, 3, 1, Perm::from_images([1, 2, 0, 3])).unwrap();
  let mut backward = Triangulation3::with_simplices(2);
  backward.join(1, 2, 0, Perm::from_images([0, 3, 1, 2])).unwrap();
  assert_eq!(forward.iso_sig(), "caba");
  assert_eq!(backward.iso_sig(), "caba");
}

#[test]
fn surfaces_are_told_apart() {
  let sigs = [
    Triangulation2::torus().iso_sig(),
    Triangulation2::klein_bottle().iso_sig(),
    Triangulation2::projective_plane().iso_sig(),
    Triangulation2::sphere().iso_sig(),
  ];
  for (i, a) in sigs.iter().enumerate() {
    for b in &sigs[i + 1..] {
      assert_ne!(a, b);
    }
  }
  for sig in &sigs {
    let tri = Triangulation2::from_iso_sig(sig).unwrap();
    assert_eq!(&tri.iso_sig(), sig);
  }
}

#[test]
fn wide_size_field() {
  let tri = common::chain(70);
  let sig = tri.iso_sig();
  assert!(sig.starts_with("-c"), "Large components need a width marker: {sig}");
  assert_eq!(Triangulation3::iso_sig_component_size(&sig), Ok(70));
  let decoded = Triangulation3::from_iso_sig(&sig).unwrap();
  assert_eq!(decoded.size(), 70);
  assert_eq!(decoded.iso_sig(), sig);
}

#[test]
fn rejects_garbage() {
  for sig in ["caba!", "c aba", "ça"] {
    assert!(matches!(
      Triangulation3::from_iso_sig(sig),
      Err(IsoSigError::InvalidCharacter(_))
    ));
  }
  assert_eq!(
    Triangulation3::from_iso_sig("cab").err(),
    Some(IsoSigError::Truncated)
  );
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn round_trip(tri in common::triangulation::<4>(4)) {
    let sig = tri.iso_sig();
    let decoded = Triangulation3::from_iso_sig(&sig).unwrap();
    decoded.check_consistency().unwrap();
    prop_assert_eq!(decoded.size(), tri.size());
    prop_assert_eq!(decoded.iso_sig(), sig);
    prop_assert!(decoded.is_isomorphic_to(&tri).is_some());
  }

  #[test]
  fn invariant_under_relabelling((tri, iso) in common::relabelled::<4>(4)) {
    prop_assert_eq!(iso.apply(&tri).iso_sig(), tri.iso_sig());
  }

  #[test]
  fn pentachora_round_trip(tri in common::triangulation::<5>(3)) {
    let sig = tri.iso_sig();
    let decoded = Triangulation4::from_iso_sig(&sig).unwrap();
    decoded.check_consistency().unwrap();
    prop_assert_eq!(decoded.size(), tri.size());
    prop_assert_eq!(decoded.iso_sig(), sig);
    prop_assert!(decoded.is_isomorphic_to(&tri).is_some());
  }

  #[test]
  fn pentachora_invariant_under_relabelling((tri, iso) in common::relabelled::<5>(3)) {
    prop_assert_eq!(iso.apply(&tri).iso_sig(), tri.iso_sig());
  }

  #[test]
  fn relabelling_reproduces_decoding(tri in common::connected_triangulation::<3>(5)) {
    let (sig, iso) = tri.iso_sig_with_relabelling().unwrap();
    let decoded = Triangulation2::from_iso_sig(&sig).unwrap();
    prop_assert!(iso.apply(&tri).is_identical_to(&decoded));
  }
}
