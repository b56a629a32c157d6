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

//! Implementation of the [`Type`] type for DNS RR types.

use std::fmt;
use std::str::FromStr;

/// Represents the RR type of a DNS record.
///
/// An RR type is represented on the wire as an unsigned 16-bit integer.
/// Hence this is basically a wrapper around `u16` with nice
/// [`Debug`](fmt::Debug), [`Display`](fmt::Display), and [`FromStr`]
/// implementations for working with the common textual representations
/// of RR types, plus constants for the types this crate understands
/// natively (the STD 13 types and the DNSSEC types of [RFC 4034]).
///
/// [RFC 4034]: https://datatracker.ietf.org/doc/html/rfc4034
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Type(u16);

impl Type {
    pub const A: Type = Type(1);
    pub const NS: Type = Type(2);
    pub const CNAME: Type = Type(5);
    pub const SOA: Type = Type(6);
    pub const MX: Type = Type(15);
    pub const TXT: Type = Type(16);
    pub const AAAA: Type = Type(28);
    pub const DNAME: Type = Type(39);
    pub const DS: Type = Type(43);
    pub const RRSIG: Type = Type(46);
    pub const NSEC: Type = Type(47);
    pub const DNSKEY: Type = Type(48);
    pub const ANY: Type = Type(255);
}

impl From<u16> for Type {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Type> for u16 {
    fn from(rr_type: Type) -> Self {
        rr_type.0
    }
}

impl FromStr for Type {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        const NAMES: &[(&str, Type)] = &[
            ("A", Type::A),
            ("NS", Type::NS),
            ("CNAME", Type::CNAME),
            ("SOA", Type::SOA),
            ("MX", Type::MX),
            ("TXT", Type::TXT),
            ("AAAA", Type::AAAA),
            ("DNAME", Type::DNAME),
            ("DS", Type::DS),
            ("RRSIG", Type::RRSIG),
            ("NSEC", Type::NSEC),
            ("DNSKEY", Type::DNSKEY),
            ("ANY", Type::ANY),
        ];
        if let Some(&(_, rr_type)) = NAMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(text)) {
            Ok(rr_type)
        } else if text
            .get(0..4)
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case("TYPE"))
        {
            // RFC 3597 § 5 generic form.
            text[4..]
                .parse::<u16>()
                .map(Self::from)
                .or(Err("type value is not a valid unsigned 16-bit integer"))
        } else {
            Err("unknown type")
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::A => f.write_str("A"),
            Self::NS => f.write_str("NS"),
            Self::CNAME => f.write_str("CNAME"),
            Self::SOA => f.write_str("SOA"),
            Self::MX => f.write_str("MX"),
            Self::TXT => f.write_str("TXT"),
            Self::AAAA => f.write_str("AAAA"),
            Self::DNAME => f.write_str("DNAME"),
            Self::DS => f.write_str("DS"),
            Self::RRSIG => f.write_str("RRSIG"),
            Self::NSEC => f.write_str("NSEC"),
            Self::DNSKEY => f.write_str("DNSKEY"),
            Self::ANY => f.write_str("ANY"),
            Self(value) => write!(f, "TYPE{}", value), // RFC 3597 § 5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn text_forms_follow_rfc3597() {
        assert_eq!(Type::from(0xff00).to_string(), "TYPE65280");
        assert_eq!("TYPE65280".parse::<Type>(), Ok(Type::from(0xff00)));
        assert_eq!("rrsig".parse::<Type>(), Ok(Type::RRSIG));
    }
}
