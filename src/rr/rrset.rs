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

//! Implementation of the [`Rrset`] type.

use std::fmt;

use super::{Rdata, Ttl, Type};
use crate::class::Class;
use crate::name::Name;

/// A set of records sharing an owner, type, and class ([RFC 2181 § 5]).
///
/// An `Rrset` is a self-contained value: it carries its owner name, so
/// sets synthesized away from any zone node (CNAMEs produced by DNAME
/// substitution, NSEC records, signatures) are represented the same way
/// as sets stored in the tree. Per [RFC 2181 § 5.2], all records of a
/// set share one TTL; `add` keeps the smallest TTL seen.
///
/// [RFC 2181 § 5]: https://datatracker.ietf.org/doc/html/rfc2181#section-5
/// [RFC 2181 § 5.2]: https://datatracker.ietf.org/doc/html/rfc2181#section-5.2
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rrset {
    pub owner: Name,
    pub rr_type: Type,
    pub class: Class,
    pub ttl: Ttl,
    rdatas: Vec<Rdata>,
}

impl Rrset {
    /// Creates an empty RRset with the provided owner, type, class, and
    /// TTL.
    pub fn new(owner: Name, rr_type: Type, class: Class, ttl: Ttl) -> Self {
        Self {
            owner,
            rr_type,
            class,
            ttl,
            rdatas: Vec::new(),
        }
    }

    /// Creates an RRset containing a single record.
    pub fn from_rdata(owner: Name, class: Class, ttl: Ttl, rdata: Rdata) -> Self {
        let rr_type = rdata.rr_type();
        Self {
            owner,
            rr_type,
            class,
            ttl,
            rdatas: vec![rdata],
        }
    }

    /// Adds a record to the RRset. Duplicate RDATA is silently dropped,
    /// and the RRset's TTL becomes the smaller of its current TTL and
    /// `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if `rdata` is not of the RRset's type.
    pub fn add(&mut self, rdata: Rdata, ttl: Ttl) {
        assert!(rdata.rr_type() == self.rr_type);
        self.ttl = self.ttl.min(ttl);
        if !self.rdatas.contains(&rdata) {
            self.rdatas.push(rdata);
        }
    }

    /// Returns an iterator over the RDATAs of the RRset.
    pub fn rdatas(&self) -> impl Iterator<Item = &Rdata> + '_ {
        self.rdatas.iter()
    }

    /// Returns the number of records in the RRset.
    pub fn len(&self) -> usize {
        self.rdatas.len()
    }

    /// Returns whether the RRset contains no records.
    pub fn is_empty(&self) -> bool {
        self.rdatas.is_empty()
    }

    /// Returns the size in octets that the RRset's records would occupy
    /// in an uncompressed DNS message.
    pub fn wire_size(&self) -> usize {
        // Each record is owner + type + class + TTL + RDLENGTH + RDATA.
        let per_record = self.owner.wire_repr().len() + 10;
        self.rdatas
            .iter()
            .map(|rdata| per_record + rdata.wire_len())
            .sum()
    }
}

impl fmt::Display for Rrset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, rdata) in self.rdatas.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(
                f,
                "{} {} {} {} {}",
                self.owner, self.ttl, self.class, self.rr_type, rdata
            )?;
        }
        Ok(())
    }
}
