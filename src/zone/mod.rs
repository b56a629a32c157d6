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

//! In-memory representation of a DNS zone.
//!
//! A [`Zone`] maps each owner name to a [`Node`] holding its RRsets.
//! The map is a `BTreeMap` keyed by [`Name`]'s canonical order
//! ([RFC 4034 § 6.1]), which gives exact lookup and, for free, the
//! ordered traversal the non-existence synthesizer in [`nsec`] needs to
//! find the names bracketing a gap.
//!
//! Loading is a two-phase affair: [`Zone::add`] performs only the
//! checks that can be made record-by-record, and [`Zone::validate`] is
//! run once afterward to catch whole-zone problems (a missing apex SOA,
//! CNAMEs with siblings, and so on). The resolver assumes it is handed
//! a zone that validated cleanly.
//!
//! [RFC 4034 § 6.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-6.1

use std::collections::BTreeMap;

use log::debug;

use crate::class::Class;
use crate::name::Name;
use crate::rr::{Rdata, Rrset, Ttl, Type};

mod error;
mod node;
mod nsec;

pub use error::{Error, ValidationIssue};
pub use node::Node;
pub use nsec::NsecError;

/// The contents of a single DNS zone.
#[derive(Clone, Debug)]
pub struct Zone {
    apex: Name,
    class: Class,
    nodes: BTreeMap<Name, Node>,
    soa: Option<Rrset>,
}

impl Zone {
    /// Creates an empty zone with the provided apex and class.
    pub fn new(apex: Name, class: Class) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(apex.clone(), Node::default());
        Self {
            apex,
            class,
            nodes,
            soa: None,
        }
    }

    /// Returns the apex of the zone.
    pub fn apex(&self) -> &Name {
        &self.apex
    }

    /// Returns the class of the zone.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Adds an RRset to the zone.
    ///
    /// Nodes for the owner and for any missing names between the owner
    /// and the apex are created as needed, so that every name with data
    /// below it exists in the tree (as an empty non-terminal if it has
    /// no data of its own). If the owner already has an RRset of the
    /// same type, the records are merged with duplicate RDATA dropped.
    pub fn add(&mut self, rrset: Rrset) -> Result<(), Error> {
        if rrset.class != self.class {
            return Err(Error::ClassMismatch);
        } else if !rrset.owner.eq_or_subdomain_of(&self.apex) {
            return Err(Error::NotInZone(rrset.owner.clone()));
        }

        let mut ancestor = rrset.owner.clone();
        while ancestor != self.apex {
            ancestor = ancestor.superdomain(1).unwrap();
            self.nodes.entry(ancestor.clone()).or_default();
        }

        if rrset.rr_type == Type::SOA && rrset.owner == self.apex {
            self.soa = Some(rrset.clone());
        }

        let node = self.nodes.entry(rrset.owner.clone()).or_default();
        match node.insert(rrset) {
            None => Ok(()),
            Some(existing) => {
                // Merge the displaced set back in.
                let owner = existing.owner.clone();
                let rr_type = existing.rr_type;
                let ttl = existing.ttl;
                let node = self.nodes.get_mut(&owner).unwrap();
                let merged = node.rrset_mut(rr_type).unwrap();
                for rdata in existing.rdatas() {
                    merged.add(rdata.clone(), ttl);
                }
                if rr_type == Type::SOA && owner == self.apex {
                    self.soa = node.rrset(Type::SOA).cloned();
                }
                Ok(())
            }
        }
    }

    /// Returns the node owned by `name`, if it exists.
    pub fn find(&self, name: &Name) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Returns the apex SOA RRset, if one has been added.
    pub fn soa(&self) -> Option<&Rrset> {
        self.soa.as_ref()
    }

    /// Returns the MINIMUM field of the apex SOA record, the TTL used
    /// for negative responses and synthesized NSEC records
    /// (RFC 2308 § 4).
    pub fn negative_ttl(&self) -> Option<Ttl> {
        match self.soa.as_ref()?.rdatas().next()? {
            Rdata::Soa(soa) => Some(Ttl::from(soa.minimum)),
            _ => None,
        }
    }

    /// Checks whole-zone requirements that [`Zone::add`] cannot check
    /// record-by-record.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        let apex_node = self.nodes.get(&self.apex).unwrap();
        match apex_node.rrset(Type::SOA) {
            None => issues.push(ValidationIssue::MissingApexSoa),
            Some(soa) if soa.len() > 1 => issues.push(ValidationIssue::MultipleSoaRecords),
            Some(_) => (),
        }
        if apex_node.rrset(Type::NS).is_none() {
            issues.push(ValidationIssue::MissingApexNs);
        }

        for (owner, node) in &self.nodes {
            if let Some(cname) = node.rrset(Type::CNAME) {
                if cname.len() > 1 {
                    issues.push(ValidationIssue::MultipleCnameRecords(owner.clone()));
                }
                if node.types().any(|t| t != Type::CNAME && t != Type::RRSIG && t != Type::NSEC)
                {
                    issues.push(ValidationIssue::CnameWithOtherData(owner.clone()));
                }
            }
            if let Some(dname) = node.rrset(Type::DNAME) {
                if dname.len() > 1 {
                    issues.push(ValidationIssue::MultipleDnameRecords(owner.clone()));
                }
            }
        }

        if issues.is_empty() {
            debug!("zone {} validated: {} names", self.apex, self.nodes.len());
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn a_rrset(owner: &str, addr: Ipv4Addr) -> Rrset {
        Rrset::from_rdata(name(owner), Class::IN, Ttl::from(3600), Rdata::A(addr))
    }

    fn soa_rrset(owner: &str, minimum: u32) -> Rrset {
        Rrset::from_rdata(
            name(owner),
            Class::IN,
            Ttl::from(3600),
            Rdata::Soa(crate::rr::Soa {
                mname: name("ns.example.test."),
                rname: name("admin.example.test."),
                serial: 1,
                refresh: 10800,
                retry: 3600,
                expire: 604800,
                minimum,
            }),
        )
    }

    fn ns_rrset(owner: &str) -> Rrset {
        Rrset::from_rdata(
            name(owner),
            Class::IN,
            Ttl::from(3600),
            Rdata::Ns(name("ns.example.test.")),
        )
    }

    fn valid_zone() -> Zone {
        let mut zone = Zone::new(name("example.test."), Class::IN);
        zone.add(soa_rrset("example.test.", 300)).unwrap();
        zone.add(ns_rrset("example.test.")).unwrap();
        zone
    }

    #[test]
    fn add_and_find_round_trip() {
        let mut zone = valid_zone();
        let rrset = a_rrset("host.example.test.", Ipv4Addr::new(192, 0, 2, 1));
        zone.add(rrset.clone()).unwrap();
        let node = zone.find(&name("host.example.test.")).unwrap();
        assert_eq!(node.rrset(Type::A), Some(&rrset));
        assert_eq!(node.rrset(Type::AAAA), None);
        assert!(zone.find(&name("other.example.test.")).is_none());
    }

    #[test]
    fn add_creates_empty_non_terminals() {
        let mut zone = valid_zone();
        zone.add(a_rrset("a.b.c.example.test.", Ipv4Addr::new(192, 0, 2, 1)))
            .unwrap();
        assert!(zone.find(&name("b.c.example.test.")).unwrap().is_empty());
        assert!(zone.find(&name("c.example.test.")).unwrap().is_empty());
    }

    #[test]
    fn add_merges_same_type_rrsets() {
        let mut zone = valid_zone();
        zone.add(a_rrset("host.example.test.", Ipv4Addr::new(192, 0, 2, 1)))
            .unwrap();
        zone.add(a_rrset("host.example.test.", Ipv4Addr::new(192, 0, 2, 2)))
            .unwrap();
        zone.add(a_rrset("host.example.test.", Ipv4Addr::new(192, 0, 2, 1)))
            .unwrap();
        let node = zone.find(&name("host.example.test.")).unwrap();
        assert_eq!(node.rrset(Type::A).unwrap().len(), 2);
    }

    #[test]
    fn add_rejects_out_of_zone_and_class_mismatches() {
        let mut zone = valid_zone();
        assert_eq!(
            zone.add(a_rrset("example.com.", Ipv4Addr::new(192, 0, 2, 1))),
            Err(Error::NotInZone(name("example.com."))),
        );
        let mut wrong_class = a_rrset("host.example.test.", Ipv4Addr::new(192, 0, 2, 1));
        wrong_class.class = Class::CH;
        assert_eq!(zone.add(wrong_class), Err(Error::ClassMismatch));
    }

    #[test]
    fn negative_ttl_is_the_soa_minimum() {
        let zone = valid_zone();
        assert_eq!(zone.negative_ttl(), Some(Ttl::from(300)));
    }

    #[test]
    fn validate_requires_apex_soa_and_ns() {
        let zone = Zone::new(name("example.test."), Class::IN);
        let issues = zone.validate().unwrap_err();
        assert!(issues.contains(&ValidationIssue::MissingApexSoa));
        assert!(issues.contains(&ValidationIssue::MissingApexNs));
        assert!(valid_zone().validate().is_ok());
    }

    #[test]
    fn validate_rejects_cname_with_siblings() {
        let mut zone = valid_zone();
        zone.add(Rrset::from_rdata(
            name("alias.example.test."),
            Class::IN,
            Ttl::from(3600),
            Rdata::Cname(name("host.example.test.")),
        ))
        .unwrap();
        assert!(zone.validate().is_ok());
        zone.add(a_rrset("alias.example.test.", Ipv4Addr::new(192, 0, 2, 1)))
            .unwrap();
        assert_eq!(
            zone.validate().unwrap_err(),
            vec![ValidationIssue::CnameWithOtherData(name(
                "alias.example.test."
            ))],
        );
    }
}
