//! Printable packing of small integers and facet actions.
//!
//! Values are written in base 64 over the alphabet `a-z A-Z 0-9 + -`, lowest
//! six bits first. Facet actions take values `0..=2` and are packed three per
//! character, the first action in the lowest two bits.

use crate::error::IsoSigError;

const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-";

/// Widest integer field that still fits into a `usize`.
const MAX_FIELD_CHARS: usize = 10;

pub fn encode_char(value: usize) -> char {
  ALPHABET[value] as char
}

pub fn decode_char(c: char) -> Option<usize> {
  match c {
    'a'..='z' => Some(c as usize - 'a' as usize),
    'A'..='Z' => Some(c as usize - 'A' as usize + 26),
    '0'..='9' => Some(c as usize - '0' as usize + 52),
    '+' => Some(62),
    '-' => Some(63),
    _ => None,
  }
}

/// Number of characters needed to write `value`.
pub fn field_width(mut value: usize) -> usize {
  let mut nchars = 0;
  while value > 0 {
    value >>= 6;
    nchars += 1;
  }
  nchars
}

/// Number of characters needed for an index into `nperms` permutations.
pub const fn chars_per_perm(nperms: usize) -> usize {
  let mut nchars = 1;
  let mut capacity = 64;
  while capacity < nperms {
    capacity *= 64;
    nchars += 1;
  }
  nchars
}

pub fn append_int(out: &mut String, mut value: usize, nchars: usize) {
  for _ in 0..nchars {
    out.push(encode_char(value & 0x3f));
    value >>= 6;
  }
}

pub fn append_trits(out: &mut String, trits: &[u8]) {
  debug_assert!(!trits.is_empty() && trits.len() <= 3);
  let value = trits
    .iter()
    .enumerate()
    .fold(0, |acc, (i, &t)| acc | (usize::from(t) << (2 * i)));
  out.push(encode_char(value));
}

/// Sequential reader over a validated signature.
pub struct Reader {
  values: Vec<usize>,
  pos: usize,
}

impl Reader {
  pub fn new(sig: &str) -> Result<Self, IsoSigError> {
    let values = sig
      .chars()
      .map(|c| decode_char(c).ok_or(IsoSigError::InvalidCharacter(c)))
      .collect::<Result<_, _>>()?;
    Ok(Self { values, pos: 0 })
  }

  pub fn is_empty(&self) -> bool {
    self.pos == self.values.len()
  }

  pub fn read_char(&mut self) -> Result<usize, IsoSigError> {
    let value = *self.values.get(self.pos).ok_or(IsoSigError::Truncated)?;
    self.pos += 1;
    Ok(value)
  }

  pub fn read_int(&mut self, nchars: usize) -> Result<usize, IsoSigError> {
    if nchars > MAX_FIELD_CHARS {
      return Err(IsoSigError::FieldTooWide(nchars));
    }
    let mut value = 0;
    for i in 0..nchars {
      value |= self.read_char()? << (6 * i);
    }
    Ok(value)
  }

  pub fn read_trits(&mut self) -> Result<[u8; 3], IsoSigError> {
    let value = self.read_char()?;
    Ok(std::array::from_fn(|i| ((value >> (2 * i)) & 3) as u8))
  }

  /// The leading simplex count of a component and the field width used by
  /// the rest of the component.
  pub fn read_size(&mut self) -> Result<(usize, usize), IsoSigError> {
    let first = self.read_char()?;
    if first < 63 {
      return Ok((first, 1));
    }
    let nchars = self.read_char()?;
    Ok((self.read_int(nchars)?, nchars))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn alphabet() {
    for value in 0..64 {
      assert_eq!(decode_char(encode_char(value)), Some(value));
    }
    assert_eq!(encode_char(41), 'P');
    assert_eq!(decode_char('_'), None);
    assert_eq!(decode_char(' '), None);
  }

  #[test]
  fn integers_and_trits() {
    let mut out = String::new();
    append_int(&mut out, 64 * 3 + 5, 2);
    append_trits(&mut out, &[1, 2, 2]);
    append_trits(&mut out, &[2]);
    assert_eq!(out, "fdPc");

    let mut reader = Reader::new(&out).unwrap();
    assert_eq!(reader.read_int(2), Ok(197));
    assert_eq!(reader.read_trits(), Ok([1, 2, 2]));
    assert_eq!(reader.read_trits(), Ok([2, 0, 0]));
    assert!(reader.is_empty());
    assert_eq!(reader.read_char(), Err(IsoSigError::Truncated));
  }

  #[test]
  fn widths() {
    assert_eq!(field_width(63), 1);
    assert_eq!(field_width(64), 2);
    assert_eq!(field_width(4096), 3);
    assert_eq!(chars_per_perm(24), 1);
    assert_eq!(chars_per_perm(120), 2);
    assert_eq!(chars_per_perm(5040), 3);
    assert_eq!(
      Reader::new("ab").unwrap().read_int(11),
      Err(IsoSigError::FieldTooWide(11))
    );
    assert_eq!(Reader::new("a b").err(), Some(IsoSigError::InvalidCharacter(' ')));
  }
}
