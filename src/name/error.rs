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

//! Implementation of the [`Error`] type for domain-name errors.

use std::fmt;

/// Errors that arise when constructing or manipulating domain names.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// An empty string was given where a domain name was expected.
    StrEmpty,

    /// A non-ASCII octet was found in a textual domain name.
    StrNotAscii,

    /// An invalid escape sequence was found in a textual domain name.
    InvalidEscape,

    /// A textual domain name did not end with the root label.
    NotFullyQualified,

    /// A label exceeded 63 octets.
    LabelTooLong,

    /// The name's wire form would exceed 255 octets.
    NameTooLong,

    /// An empty label occurred somewhere other than the end of the
    /// name.
    EmptyNonTerminalLabel,

    /// A relative-name operation was applied to a name that is not a
    /// subdomain of the given ancestor.
    NotASubdomain,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::StrEmpty => f.write_str("the string is empty"),
            Self::StrNotAscii => f.write_str("the string is not ASCII"),
            Self::InvalidEscape => f.write_str("the string contains an invalid escape sequence"),
            Self::NotFullyQualified => f.write_str("the name is not fully qualified"),
            Self::LabelTooLong => f.write_str("the label exceeds 63 octets"),
            Self::NameTooLong => f.write_str("the name exceeds 255 octets"),
            Self::EmptyNonTerminalLabel => {
                f.write_str("an empty label may only terminate a name")
            }
            Self::NotASubdomain => {
                f.write_str("the name is not a subdomain of the given ancestor")
            }
        }
    }
}

impl std::error::Error for Error {}
