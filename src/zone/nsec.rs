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

//! On-demand synthesis of NSEC records (RFC 4034 § 4).
//!
//! The zone is not pre-signed, so NSEC records do not exist as stored
//! data. Instead, when a negative answer needs a proof, the record for
//! the relevant gap in the canonical ordering is synthesized from the
//! node map: its owner is the greatest populated name at or before the
//! name being proven, its "next" field is the least populated name
//! after it (wrapping around to the apex at the end of the zone), and
//! its type bitmap lists the owner's types plus `NSEC` and `RRSIG`.
//! Empty non-terminals never own NSEC records, so they are skipped on
//! both sides of the gap.

use std::fmt;
use std::ops::Bound;

use super::Zone;
use crate::name::Name;
use crate::rr::{Nsec, Rdata, Rrset, Type};

/// An error synthesizing an NSEC record. Both cases indicate a zone
/// that should not have passed [`Zone::validate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NsecError {
    /// The zone has no apex SOA record to take the NSEC TTL from.
    NoSoa,

    /// No populated name at or before the target exists. The apex of a
    /// validated zone precedes every other in-zone name and holds at
    /// least an SOA, so this means the apex itself is bare.
    NoCoveringName,
}

impl fmt::Display for NsecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoSoa => f.write_str("the zone has no SOA record"),
            Self::NoCoveringName => f.write_str("the zone has no name covering the target"),
        }
    }
}

impl std::error::Error for NsecError {}

impl Zone {
    /// Synthesizes the NSEC RRset whose owner/next span covers `name`.
    ///
    /// If `name` itself is a populated owner, the synthesized record is
    /// the one owned by `name` (proving which types it has); otherwise
    /// it is the record covering the gap `name` falls into (proving the
    /// name does not exist).
    pub fn nsec_rrset(&self, name: &Name) -> Result<Rrset, NsecError> {
        let ttl = self.negative_ttl().ok_or(NsecError::NoSoa)?;

        let (owner, node) = self
            .nodes
            .range::<Name, _>((Bound::Unbounded, Bound::Included(name)))
            .rev()
            .find(|(_, node)| !node.is_empty())
            .ok_or(NsecError::NoCoveringName)?;

        let next_name = self
            .nodes
            .range::<Name, _>((Bound::Excluded(owner), Bound::Unbounded))
            .find(|(_, node)| !node.is_empty())
            .map(|(next, _)| next.clone())
            .unwrap_or_else(|| self.apex.clone());

        let types = node
            .types()
            .chain([Type::NSEC, Type::RRSIG])
            .collect();
        Ok(Rrset::from_rdata(
            owner.clone(),
            self.class,
            ttl,
            Rdata::Nsec(Nsec { next_name, types }),
        ))
    }
}
