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

//! Implementation of DNS record data.
//!
//! Record data is modeled as the [`Rdata`] tagged variant: one variant
//! per RR type the server understands natively, plus an
//! [`Unknown`](Rdata::Unknown) fallback carrying raw octets for
//! everything else ([RFC 3597]). Every variant knows how to serialize
//! itself to the uncompressed wire form, to the DNSSEC canonical wire
//! form ([RFC 4034 § 6.2]: embedded domain names lowercased), and to a
//! zone-file-like textual form.
//!
//! [RFC 3597]: https://datatracker.ietf.org/doc/html/rfc3597
//! [RFC 4034 § 6.2]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.2

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::Type;
use crate::name::Name;

////////////////////////////////////////////////////////////////////////
// RDATA                                                              //
////////////////////////////////////////////////////////////////////////

/// The data carried by a single DNS resource record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rdata {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(Name),
    Cname(Name),
    Dname(Name),
    Mx { preference: u16, exchange: Name },
    Txt(Vec<Box<[u8]>>),
    Soa(Soa),
    Ds(Ds),
    Rrsig(Rrsig),
    Nsec(Nsec),
    Dnskey(Dnskey),
    Unknown { rr_type: Type, octets: Box<[u8]> },
}

/// The RDATA of an SOA record (RFC 1035 § 3.3.13).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Soa {
    pub mname: Name,
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// The RDATA of a DS record (RFC 4034 § 5.1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

/// The RDATA of an RRSIG record (RFC 4034 § 3.1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rrsig {
    pub type_covered: Type,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer: Name,
    pub signature: Vec<u8>,
}

/// The RDATA of an NSEC record (RFC 4034 § 4.1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Nsec {
    pub next_name: Name,
    pub types: TypeBitmap,
}

/// The RDATA of a DNSKEY record (RFC 4034 § 2.1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl Dnskey {
    /// The flags value of a zone-signing key: the Zone Key bit alone.
    pub const ZSK_FLAGS: u16 = 0x0100;

    /// The flags value of a key-signing key: the Zone Key bit plus the
    /// Secure Entry Point bit (RFC 4034 § 2.1.1).
    pub const KSK_FLAGS: u16 = 0x0101;
}

impl Rdata {
    /// Returns the RR type this record data belongs to.
    pub fn rr_type(&self) -> Type {
        match self {
            Self::A(_) => Type::A,
            Self::Aaaa(_) => Type::AAAA,
            Self::Ns(_) => Type::NS,
            Self::Cname(_) => Type::CNAME,
            Self::Dname(_) => Type::DNAME,
            Self::Mx { .. } => Type::MX,
            Self::Txt(_) => Type::TXT,
            Self::Soa(_) => Type::SOA,
            Self::Ds(_) => Type::DS,
            Self::Rrsig(_) => Type::RRSIG,
            Self::Nsec(_) => Type::NSEC,
            Self::Dnskey(_) => Type::DNSKEY,
            Self::Unknown { rr_type, .. } => *rr_type,
        }
    }

    /// Appends the uncompressed wire form of the RDATA to `buf`,
    /// preserving the case of embedded domain names.
    pub fn write_wire(&self, buf: &mut Vec<u8>) {
        self.write(buf, false)
    }

    /// Appends the DNSSEC canonical wire form of the RDATA to `buf`:
    /// uncompressed, with embedded domain names lowercased
    /// (RFC 4034 § 6.2).
    pub fn write_canonical(&self, buf: &mut Vec<u8>) {
        self.write(buf, true)
    }

    /// Returns the length of the RDATA's wire form in octets.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::A(_) => 4,
            Self::Aaaa(_) => 16,
            Self::Ns(name) | Self::Cname(name) | Self::Dname(name) => name.wire_repr().len(),
            Self::Mx { exchange, .. } => 2 + exchange.wire_repr().len(),
            Self::Txt(strings) => strings.iter().map(|s| 1 + s.len()).sum(),
            Self::Soa(soa) => soa.mname.wire_repr().len() + soa.rname.wire_repr().len() + 20,
            Self::Ds(ds) => 4 + ds.digest.len(),
            Self::Rrsig(rrsig) => 18 + rrsig.signer.wire_repr().len() + rrsig.signature.len(),
            Self::Nsec(nsec) => nsec.next_name.wire_repr().len() + nsec.types.wire_len(),
            Self::Dnskey(dnskey) => 4 + dnskey.public_key.len(),
            Self::Unknown { octets, .. } => octets.len(),
        }
    }

    fn write(&self, buf: &mut Vec<u8>, canonical: bool) {
        let write_name = |buf: &mut Vec<u8>, name: &Name| {
            if canonical {
                buf.extend_from_slice(name.to_lowercase().wire_repr());
            } else {
                buf.extend_from_slice(name.wire_repr());
            }
        };
        match self {
            Self::A(addr) => buf.extend_from_slice(&addr.octets()),
            Self::Aaaa(addr) => buf.extend_from_slice(&addr.octets()),
            Self::Ns(name) | Self::Cname(name) | Self::Dname(name) => write_name(buf, name),
            Self::Mx {
                preference,
                exchange,
            } => {
                buf.extend_from_slice(&preference.to_be_bytes());
                write_name(buf, exchange);
            }
            Self::Txt(strings) => {
                for string in strings {
                    buf.push(string.len() as u8);
                    buf.extend_from_slice(string);
                }
            }
            Self::Soa(soa) => {
                write_name(buf, &soa.mname);
                write_name(buf, &soa.rname);
                for field in [soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum] {
                    buf.extend_from_slice(&field.to_be_bytes());
                }
            }
            Self::Ds(ds) => {
                buf.extend_from_slice(&ds.key_tag.to_be_bytes());
                buf.push(ds.algorithm);
                buf.push(ds.digest_type);
                buf.extend_from_slice(&ds.digest);
            }
            Self::Rrsig(rrsig) => {
                buf.extend_from_slice(&u16::from(rrsig.type_covered).to_be_bytes());
                buf.push(rrsig.algorithm);
                buf.push(rrsig.labels);
                buf.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
                buf.extend_from_slice(&rrsig.expiration.to_be_bytes());
                buf.extend_from_slice(&rrsig.inception.to_be_bytes());
                buf.extend_from_slice(&rrsig.key_tag.to_be_bytes());
                write_name(buf, &rrsig.signer);
                buf.extend_from_slice(&rrsig.signature);
            }
            Self::Nsec(nsec) => {
                write_name(buf, &nsec.next_name);
                nsec.types.write_wire(buf);
            }
            Self::Dnskey(dnskey) => {
                buf.extend_from_slice(&dnskey.flags.to_be_bytes());
                buf.push(dnskey.protocol);
                buf.push(dnskey.algorithm);
                buf.extend_from_slice(&dnskey.public_key);
            }
            Self::Unknown { octets, .. } => buf.extend_from_slice(octets),
        }
    }
}

impl fmt::Display for Rdata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::A(addr) => write!(f, "{}", addr),
            Self::Aaaa(addr) => write!(f, "{}", addr),
            Self::Ns(name) | Self::Cname(name) | Self::Dname(name) => write!(f, "{}", name),
            Self::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            Self::Txt(strings) => {
                for (i, string) in strings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str("\"")?;
                    for &octet in string.iter() {
                        match octet {
                            b'"' | b'\\' => write!(f, "\\{}", octet as char)?,
                            0x20..=0x7e => write!(f, "{}", octet as char)?,
                            _ => write!(f, "\\{:03}", octet)?,
                        }
                    }
                    f.write_str("\"")?;
                }
                Ok(())
            }
            Self::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            ),
            Self::Ds(ds) => {
                write!(f, "{} {} {} ", ds.key_tag, ds.algorithm, ds.digest_type)?;
                for octet in &ds.digest {
                    write!(f, "{:02X}", octet)?;
                }
                Ok(())
            }
            Self::Rrsig(rrsig) => write!(
                f,
                "{} {} {} {} {} {} {} {} {}",
                rrsig.type_covered,
                rrsig.algorithm,
                rrsig.labels,
                rrsig.original_ttl,
                rrsig.expiration,
                rrsig.inception,
                rrsig.key_tag,
                rrsig.signer,
                BASE64.encode(&rrsig.signature)
            ),
            Self::Nsec(nsec) => write!(f, "{} {}", nsec.next_name, nsec.types),
            Self::Dnskey(dnskey) => write!(
                f,
                "{} {} {} {}",
                dnskey.flags,
                dnskey.protocol,
                dnskey.algorithm,
                BASE64.encode(&dnskey.public_key)
            ),
            Self::Unknown { octets, .. } => {
                // RFC 3597 § 5 generic form.
                write!(f, "\\# {}", octets.len())?;
                if !octets.is_empty() {
                    f.write_str(" ")?;
                    for octet in octets.iter() {
                        write!(f, "{:02X}", octet)?;
                    }
                }
                Ok(())
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// NSEC TYPE BITMAPS                                                  //
////////////////////////////////////////////////////////////////////////

/// The type bitmap of an NSEC record (RFC 4034 § 4.1.2).
///
/// The bitmap is stored in its wire form: a sequence of windows, each a
/// window index octet and a bitmap of 1 to 32 octets. Windows appear in
/// increasing index order and trailing zero octets are trimmed, which
/// makes the stored form both the wire and canonical encoding.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeBitmap {
    windows: Vec<(u8, Vec<u8>)>,
}

impl TypeBitmap {
    /// Returns whether any type is set in the bitmap.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Returns whether `rr_type` is present in the bitmap.
    pub fn contains(&self, rr_type: Type) -> bool {
        let raw = u16::from(rr_type);
        let window = (raw >> 8) as u8;
        let byte = ((raw & 0xff) >> 3) as usize;
        let mask = 0x80u8 >> (raw & 0x7);
        self.windows
            .iter()
            .find(|(index, _)| *index == window)
            .map_or(false, |(_, bitmap)| {
                bitmap.get(byte).map_or(false, |octet| octet & mask != 0)
            })
    }

    /// Appends the bitmap's wire form to `buf`.
    pub fn write_wire(&self, buf: &mut Vec<u8>) {
        for (index, bitmap) in &self.windows {
            buf.push(*index);
            buf.push(bitmap.len() as u8);
            buf.extend_from_slice(bitmap);
        }
    }

    /// Returns the length of the bitmap's wire form in octets.
    pub fn wire_len(&self) -> usize {
        self.windows.iter().map(|(_, bitmap)| 2 + bitmap.len()).sum()
    }

    /// Returns an iterator over the types set in the bitmap, in
    /// ascending order.
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.windows.iter().flat_map(|(index, bitmap)| {
            let base = (*index as u16) << 8;
            bitmap.iter().enumerate().flat_map(move |(byte, octet)| {
                (0..8)
                    .filter(move |bit| octet & (0x80 >> bit) != 0)
                    .map(move |bit| Type::from(base + (byte as u16) * 8 + bit as u16))
            })
        })
    }
}

impl FromIterator<Type> for TypeBitmap {
    fn from_iter<I: IntoIterator<Item = Type>>(types: I) -> Self {
        let mut windows: Vec<(u8, Vec<u8>)> = Vec::new();
        let mut raws: Vec<u16> = types.into_iter().map(u16::from).collect();
        raws.sort_unstable();
        raws.dedup();
        for raw in raws {
            let window = (raw >> 8) as u8;
            let byte = ((raw & 0xff) >> 3) as usize;
            let mask = 0x80u8 >> (raw & 0x7);
            if windows.last().map(|(index, _)| *index) != Some(window) {
                windows.push((window, Vec::new()));
            }
            let bitmap = &mut windows.last_mut().unwrap().1;
            if bitmap.len() <= byte {
                bitmap.resize(byte + 1, 0);
            }
            bitmap[byte] |= mask;
        }
        Self { windows }
    }
}

impl fmt::Display for TypeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, rr_type) in self.types().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", rr_type)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
