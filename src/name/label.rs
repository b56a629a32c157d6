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

//! Implementation of the [`Label`] type for the labels of domain names.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use super::Error;

/// The maximum length of a label (not including the length octet used
/// on the wire).
pub(super) const MAX_LABEL_LEN: usize = 63;

/// A label of a domain name.
///
/// A `Label` is a wrapper over `[u8]` that can only be constructed if
/// the underlying data is at most 63 octets long ([RFC 1035 § 2.3.4]).
/// Case is preserved, but comparison, ordering, and hashing all fold
/// ASCII case, since the DNS compares names case-insensitively and
/// DNSSEC's canonical ordering ([RFC 4034 § 6.1]) is defined over
/// lowercased labels.
///
/// [RFC 1035 § 2.3.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-2.3.4
/// [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1
#[repr(transparent)]
pub struct Label {
    octets: [u8],
}

impl Label {
    /// Converts a `&[u8]` to a `&Label` without checking the length;
    /// for use within the `name` module only.
    pub(super) fn from_unchecked(octets: &[u8]) -> &Self {
        // SAFETY: Label is a repr(transparent) wrapper over [u8].
        unsafe { &*(octets as *const [u8] as *const Self) }
    }

    /// Returns the underlying octets of the `Label`.
    pub fn octets(&self) -> &[u8] {
        self
    }

    /// Returns whether this is the null (empty) label that terminates
    /// every fully qualified domain name.
    pub fn is_null(&self) -> bool {
        self.octets.is_empty()
    }

    /// Returns whether this label is `*`, the wildcard label.
    pub fn is_asterisk(&self) -> bool {
        self.octets == [b'*']
    }

    /// Returns a reference to the null label.
    pub fn null() -> &'static Label {
        Label::from_unchecked(&[])
    }

    /// Returns a reference to the asterisk (wildcard) label.
    pub fn asterisk() -> &'static Label {
        Label::from_unchecked(b"*")
    }
}

impl<'a> TryFrom<&'a [u8]> for &'a Label {
    type Error = Error;

    fn try_from(octets: &'a [u8]) -> Result<Self, Self::Error> {
        if octets.len() > MAX_LABEL_LEN {
            Err(Error::LabelTooLong)
        } else {
            Ok(Label::from_unchecked(octets))
        }
    }
}

impl<'a, const N: usize> TryFrom<&'a [u8; N]> for &'a Label {
    type Error = Error;

    fn try_from(octets: &'a [u8; N]) -> Result<Self, Self::Error> {
        octets[..].try_into()
    }
}

impl Deref for Label {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.octets
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.octets.eq_ignore_ascii_case(&other.octets)
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.octets
            .iter()
            .map(u8::to_ascii_lowercase)
            .cmp(other.octets.iter().map(u8::to_ascii_lowercase))
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for octet in self.octets() {
            state.write_u8(octet.to_ascii_lowercase());
        }
    }
}

/// Displays the `Label` in its textual form, escaping octets as
/// specified by [RFC 4343 § 2.1].
///
/// [RFC 4343 § 2.1]: https://datatracker.ietf.org/doc/html/rfc4343#section-2.1
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &octet in self.octets() {
            match octet {
                b'.' | b'\\' => write!(f, "\\{}", octet as char)?,
                0x21..=0x7e => write!(f, "{}", octet as char)?,
                _ => write!(f, "\\{:03}", octet)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}
