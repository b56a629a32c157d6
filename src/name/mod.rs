// Copyright 2026 the quill developers.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of data structures related to domain names.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;
use std::str::FromStr;

use arrayvec::ArrayVec;

mod error;
mod label;
pub use error::Error;
pub use label::Label;

/// The maximum number of labels in a domain name.
const MAX_N_LABELS: usize = 128;

/// The maximum length of the uncompressed on-the-wire representation of
/// a domain name.
const MAX_WIRE_LEN: usize = 255;

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A structure to represent a domain name.
///
/// A `Name` stores the uncompressed on-the-wire representation of a
/// fully qualified domain name ([RFC 1035 § 3.1]) together with the
/// offset of each label in that representation, so that label access
/// and right-to-left iteration (needed for the canonical ordering) are
/// cheap. Case is preserved as given; comparison, ordering, and hashing
/// fold ASCII case, label by label.
///
/// `Name`s are constructed through the [`FromStr`] implementation (with
/// [RFC 4343 § 2.1] escape support) or derived from existing `Name`s
/// via [`Name::superdomain`], [`Name::prefixed`], and [`Name::rebase`].
/// Parsing names out of DNS messages is the wire codec's concern and is
/// deliberately not provided here.
///
/// The [`Ord`] implementation is the DNSSEC canonical ordering of
/// [RFC 4034 § 6.1]: names are compared as sequences of labels read
/// from the rightmost (root) label toward the leftmost, and a name that
/// is a proper suffix of another sorts first. This is a strict total
/// order, which the non-existence proof synthesizer depends on.
///
/// [RFC 1035 § 3.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
#[derive(Clone)]
pub struct Name {
    wire: Box<[u8]>,
    offsets: Box<[u8]>,
}

impl Name {
    /// Returns the number of labels in this `Name`, including the null
    /// root label.
    #[allow(clippy::len_without_is_empty)] // A domain name is never empty!
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns whether the `Name` is the DNS root `.`.
    pub fn is_root(&self) -> bool {
        self.len() == 1
    }

    /// Returns whether the `Name` is a wildcard domain name (i.e.,
    /// whether its first label is `*`).
    pub fn is_wildcard(&self) -> bool {
        self[0].is_asterisk()
    }

    /// Returns an iterator over the labels in this `Name`.
    pub fn labels(&self) -> Labels {
        Labels {
            name: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Returns whether this `Name` is equal to or a subdomain of
    /// `other`: that is, whether `other`'s label sequence is a suffix
    /// of this one's.
    pub fn eq_or_subdomain_of(&self, other: &Name) -> bool {
        self.len() >= other.len()
            && self
                .labels()
                .rev()
                .zip(other.labels().rev())
                .all(|(a, b)| a == b)
    }

    /// Returns the (uncompressed) on-the-wire representation of the
    /// `Name`.
    pub fn wire_repr(&self) -> &[u8] {
        &self.wire
    }

    /// Returns a copy of this `Name` with all ASCII letters folded to
    /// lowercase, as DNSSEC's canonical RR form ([RFC 4034 § 6.2])
    /// requires.
    ///
    /// [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2
    pub fn to_lowercase(&self) -> Name {
        let mut wire = self.wire.clone();
        wire.make_ascii_lowercase();
        Name {
            wire,
            offsets: self.offsets.clone(),
        }
    }

    /// Returns the superdomain obtained by skipping the first `skip`
    /// labels of the `Name`, or `None` if there aren't enough labels.
    pub fn superdomain(&self, skip: usize) -> Option<Name> {
        if skip < self.len() {
            // Skipping leading labels of a valid name cannot produce an
            // invalid one, so the construction cannot fail.
            Some(Self::from_labels(self.labels().skip(skip)).unwrap())
        } else {
            None
        }
    }

    /// Returns a new `Name` with `label` prepended to this one. Fails
    /// if the result would be too long.
    pub fn prefixed(&self, label: &Label) -> Result<Name, Error> {
        Self::from_labels(std::iter::once(label).chain(self.labels()))
    }

    /// Replaces the `ancestor` suffix of this `Name` with `target`,
    /// keeping the labels below `ancestor` intact. This is the
    /// substitution used to synthesize CNAMEs from DNAME redirections
    /// ([RFC 6672 § 2.2]). Fails if this name is not equal to or a
    /// subdomain of `ancestor`, or if the result would be too long.
    ///
    /// [RFC 6672 § 2.2]: https://datatracker.ietf.org/doc/html/rfc6672#section-2.2
    pub fn rebase(&self, ancestor: &Name, target: &Name) -> Result<Name, Error> {
        if !self.eq_or_subdomain_of(ancestor) {
            return Err(Error::NotASubdomain);
        }
        let kept = self.len() - ancestor.len();
        Self::from_labels(self.labels().take(kept).chain(target.labels()))
    }

    /// Returns the root name `.`.
    pub fn root() -> Name {
        Name {
            wire: Box::new([0]),
            offsets: Box::new([0]),
        }
    }

    /// Builds a `Name` from a sequence of labels. The sequence must end
    /// with the null label, contain no other null labels, and fit
    /// within the wire-form and label-count limits.
    fn from_labels<'a>(labels: impl Iterator<Item = &'a Label>) -> Result<Name, Error> {
        let mut wire = Vec::new();
        let mut offsets = ArrayVec::<u8, MAX_N_LABELS>::new();
        let mut terminated = false;
        for label in labels {
            if terminated {
                return Err(Error::EmptyNonTerminalLabel);
            }
            if wire.len() + 1 + label.len() > MAX_WIRE_LEN {
                return Err(Error::NameTooLong);
            }
            offsets.try_push(wire.len() as u8).or(Err(Error::NameTooLong))?;
            wire.push(label.len() as u8);
            wire.extend_from_slice(label.octets());
            terminated = label.is_null();
        }
        if !terminated {
            return Err(Error::NotFullyQualified);
        }
        Ok(Name {
            wire: wire.into_boxed_slice(),
            offsets: offsets.as_slice().into(),
        })
    }
}

impl Index<usize> for Name {
    type Output = Label;

    fn index(&self, index: usize) -> &Self::Output {
        let offset = self.offsets[index] as usize;
        let len = self.wire[offset] as usize;
        Label::from_unchecked(&self.wire[offset + 1..offset + 1 + len])
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            for label in self.labels().take(self.len() - 1) {
                write!(f, "{}.", label)?;
            }
            Ok(())
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.labels().zip(other.labels()).all(|(a, b)| a == b)
    }
}

impl Eq for Name {}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The [`Ord`] implementation for `Name` employs DNSSEC's canonical
/// ordering of domain names ([RFC 4034 § 6.1]): labels are compared
/// from the rightmost toward the leftmost, and if one name runs out of
/// labels first, it sorts first.
///
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.labels().rev().zip(other.labels().rev()) {
            match a.cmp(b) {
                Ordering::Equal => (),
                unequal => return unequal,
            }
        }
        self.len().cmp(&other.len())
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in self.labels() {
            label.hash(state);
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ITERATION OVER A NAME'S LABELS                                     //
////////////////////////////////////////////////////////////////////////

/// An iterator over the [`Label`]s in a [`Name`]; see [`Name::labels`].
#[derive(Clone, Debug)]
pub struct Labels<'a> {
    name: &'a Name,
    front: usize,
    back: usize,
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a Label;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.front += 1;
            Some(&self.name[self.front - 1])
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Labels<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back > self.front {
            self.back -= 1;
            Some(&self.name[self.back])
        } else {
            None
        }
    }
}

impl ExactSizeIterator for Labels<'_> {}

impl FusedIterator for Labels<'_> {}

////////////////////////////////////////////////////////////////////////
// PARSING OF NAMES FROM RUST STRINGS                                 //
////////////////////////////////////////////////////////////////////////

/// Allows for conversion of a Rust [`str`] into a [`Name`]. The passed
/// string must be strictly ASCII and fully qualified (ending with a
/// dot). Escape sequences as defined by [RFC 4343 § 2.1] are supported.
///
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::StrEmpty);
        } else if s == "." {
            return Ok(Name::root());
        }

        let mut wire = Vec::new();
        let mut offsets = ArrayVec::<u8, MAX_N_LABELS>::new();
        let mut current = Vec::new();
        let mut remaining: &[u8] = s.as_ref();

        let mut close_label = |current: &mut Vec<u8>,
                               wire: &mut Vec<u8>,
                               offsets: &mut ArrayVec<u8, MAX_N_LABELS>|
         -> Result<(), Error> {
            if current.is_empty() {
                return Err(Error::EmptyNonTerminalLabel);
            }
            if current.len() > 63 {
                return Err(Error::LabelTooLong);
            }
            if wire.len() + 1 + current.len() + 1 > MAX_WIRE_LEN {
                return Err(Error::NameTooLong);
            }
            offsets.try_push(wire.len() as u8).or(Err(Error::NameTooLong))?;
            wire.push(current.len() as u8);
            wire.append(current);
            Ok(())
        };

        // To check that the string is ASCII, it suffices to check each
        // octet as we go, since every multi-byte UTF-8 character starts
        // with a non-ASCII octet.
        while let Some(&octet) = remaining.first() {
            if octet == b'\\' {
                let (value, consumed) = parse_escape(&remaining[1..])?;
                current.push(value);
                remaining = &remaining[consumed + 1..];
            } else if octet == b'.' {
                close_label(&mut current, &mut wire, &mut offsets)?;
                remaining = &remaining[1..];
            } else if !octet.is_ascii() {
                return Err(Error::StrNotAscii);
            } else {
                current.push(octet);
                remaining = &remaining[1..];
            }
        }
        if !current.is_empty() {
            return Err(Error::NotFullyQualified);
        }

        // Finally, the terminal null label.
        offsets.try_push(wire.len() as u8).or(Err(Error::NameTooLong))?;
        wire.push(0);
        Ok(Name {
            wire: wire.into_boxed_slice(),
            offsets: offsets.as_slice().into(),
        })
    }
}

/// Parses an escape sequence. `remaining` starts with the octet
/// immediately *after* the introducing backslash.
fn parse_escape(remaining: &[u8]) -> Result<(u8, usize), Error> {
    match remaining {
        [] => Err(Error::InvalidEscape),
        [d, rest @ ..] if d.is_ascii_digit() => match rest {
            [t, o, ..] if t.is_ascii_digit() && o.is_ascii_digit() => {
                let value =
                    100 * (d - b'0') as usize + 10 * (t - b'0') as usize + (o - b'0') as usize;
                if value > 255 {
                    Err(Error::InvalidEscape)
                } else {
                    Ok((value as u8, 3))
                }
            }
            _ => Err(Error::InvalidEscape),
        },
        [octet, ..] => Ok((*octet, 1)),
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn root_has_expected_characteristics() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.len(), 1);
        assert_eq!(root.wire_repr(), &[0]);
        assert_eq!(name("."), root);
    }

    #[test]
    fn fromstr_works() {
        assert_eq!(
            name("example.test.").wire_repr(),
            b"\x07example\x04test\x00"
        );
    }

    #[test]
    fn fromstr_escaping_works() {
        assert_eq!(name("\\000.\\\\\\..").wire_repr(), b"\x01\x00\x02\\.\x00");
    }

    #[test]
    fn fromstr_rejects_bad_strings() {
        assert_eq!("".parse::<Name>(), Err(Error::StrEmpty));
        assert_eq!("✈.aero.".parse::<Name>(), Err(Error::StrNotAscii));
        assert_eq!("non.fqdn".parse::<Name>(), Err(Error::NotFullyQualified));
        assert_eq!("a.b..c.".parse::<Name>(), Err(Error::EmptyNonTerminalLabel));
        assert_eq!("\\00x.".parse::<Name>(), Err(Error::InvalidEscape));
        assert_eq!("\\256.".parse::<Name>(), Err(Error::InvalidEscape));
        let long_label = "x".repeat(64) + ".";
        assert_eq!(long_label.parse::<Name>(), Err(Error::LabelTooLong));
        let long_name = "x.".repeat(128);
        assert_eq!(long_name.parse::<Name>(), Err(Error::NameTooLong));
    }

    #[test]
    fn display_round_trips() {
        for text in [".", "example.test.", "*.example.test.", "a\\.b.test."] {
            assert_eq!(text.parse::<Name>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn is_wildcard_works() {
        assert!(name("*.quill.test.").is_wildcard());
        assert!(!name("quill.test.").is_wildcard());
        assert!(!name("x.*.quill.test.").is_wildcard());
    }

    #[test]
    fn eq_folds_case() {
        assert_eq!(name("Example.TEST."), name("example.test."));
    }

    #[test]
    fn eq_or_subdomain_of_works() {
        let subdomain = name("subdomain.example.test.");
        let domain = name("example.test.");
        let tld = name("test.");
        let other = name("other.test.");
        assert!(subdomain.eq_or_subdomain_of(&subdomain));
        assert!(subdomain.eq_or_subdomain_of(&domain));
        assert!(subdomain.eq_or_subdomain_of(&tld));
        assert!(subdomain.eq_or_subdomain_of(&Name::root()));
        assert!(!domain.eq_or_subdomain_of(&subdomain));
        assert!(!domain.eq_or_subdomain_of(&other));
        assert!(!Name::root().eq_or_subdomain_of(&tld));
    }

    #[test]
    fn superdomain_works() {
        let sub = name("subdomain.example.test.");
        assert_eq!(sub.superdomain(0), Some(sub.clone()));
        assert_eq!(sub.superdomain(1), Some(name("example.test.")));
        assert_eq!(sub.superdomain(3), Some(Name::root()));
        assert_eq!(sub.superdomain(4), None);
    }

    #[test]
    fn prefixed_works() {
        let apex = name("example.test.");
        let wildcard = apex.prefixed(Label::asterisk()).unwrap();
        assert_eq!(wildcard, name("*.example.test."));
        assert!(wildcard.is_wildcard());
    }

    #[test]
    fn rebase_works() {
        let qname = name("www.dept.example.test.");
        let owner = name("dept.example.test.");
        let target = name("dept.example.org.");
        assert_eq!(
            qname.rebase(&owner, &target).unwrap(),
            name("www.dept.example.org.")
        );
        assert_eq!(
            qname.rebase(&name("other.test."), &target),
            Err(Error::NotASubdomain)
        );
    }

    #[test]
    fn rebase_rejects_overlong_result() {
        let qname = ("x.".repeat(120) + "a.test.").parse::<Name>().unwrap();
        let owner = name("a.test.");
        let target = ("y.".repeat(10) + "b.test.").parse::<Name>().unwrap();
        assert_eq!(qname.rebase(&owner, &target), Err(Error::NameTooLong));
    }

    #[test]
    fn ord_matches_rfc_4034_example() {
        // The ordered list from RFC 4034 § 6.1, which defines the
        // canonical ordering of domain names.
        let names: Vec<Name> = [
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
            "\\001.z.example.",
            "*.z.example.",
            "\\200.z.example.",
        ]
        .into_iter()
        .map(|n| n.parse().unwrap())
        .collect();

        for (i, ni) in names.iter().enumerate() {
            for (j, nj) in names.iter().enumerate() {
                assert_eq!(i.cmp(&j), ni.cmp(nj), "{} vs {}", ni, nj);
            }
        }
    }

    #[test]
    fn ord_is_total_over_subdomain_chains() {
        // A name sorts before every name that extends it on the left.
        let parent = name("example.com.");
        let child = name("a.example.com.");
        let grandchild = name("z.a.example.com.");
        assert!(parent < child);
        assert!(child < grandchild);
        assert!(parent < grandchild);
    }

    #[test]
    fn to_lowercase_works() {
        let mixed = name("UPPERCASE.Domain.Test.");
        assert_eq!(
            mixed.to_lowercase().wire_repr(),
            b"\x09uppercase\x06domain\x04test\x00"
        );
    }
}
