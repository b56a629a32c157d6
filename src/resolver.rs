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

//! Resolution of queries against a served zone.
//!
//! The [`Resolver`] owns one immutable [`Zone`] and, when the zone is
//! signed, a [`ZoneSigner`]. [`Resolver::resolve`] turns one parsed
//! query into one complete response; it only reads the zone and key
//! material, so any number of queries may be resolved concurrently
//! against a shared `Resolver`.
//!
//! DNSSEC material (signatures and NSEC proofs) is attached only when
//! the query carried an EDNS OPT record with the DO bit set and the
//! zone is signed, with two exceptions that are answers rather than
//! proofs: an explicit DNSKEY query at the apex and an explicit RRSIG
//! query.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::message::{Edns, Query, Question, Rcode, Response};
use crate::name::{Label, Name};
use crate::rr::{Rdata, Rrset, Ttl, Type};
use crate::sign::ZoneSigner;
use crate::zone::Zone;
use crate::{sign, zone};

/// The largest EDNS payload size the resolver will advertise or honor.
const MAX_EDNS_PAYLOAD: u16 = 1280;

/// The payload limit for queries without EDNS (RFC 1035 § 4.2.1).
const CLASSIC_PAYLOAD: u16 = 512;

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error resolving a query.
#[derive(Debug)]
pub enum ResolveError {
    /// The query did not carry exactly one question. The transport
    /// collaborator chooses the wire response (FORMERR, usually).
    MalformedQuery,

    /// A zone-consistency violation was observed during resolution.
    /// These are caught by [`Zone::validate`] before serving, so
    /// hitting one here means the zone was served without validating
    /// and should be withdrawn.
    ZoneBroken(&'static str),

    /// Signature generation failed.
    Signing(sign::Error),

    /// Non-existence proof synthesis failed.
    Proof(zone::NsecError),
}

impl From<sign::Error> for ResolveError {
    fn from(err: sign::Error) -> Self {
        Self::Signing(err)
    }
}

impl From<zone::NsecError> for ResolveError {
    fn from(err: zone::NsecError) -> Self {
        Self::Proof(err)
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedQuery => f.write_str("the query does not have exactly one question"),
            Self::ZoneBroken(detail) => write!(f, "zone consistency violation: {}", detail),
            Self::Signing(err) => write!(f, "failed to sign the response: {}", err),
            Self::Proof(err) => write!(f, "failed to synthesize a non-existence proof: {}", err),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Returned by [`Resolver::with_signer`] when the signer was built for
/// a different apex than the zone's.
#[derive(Debug)]
pub struct SignerZoneMismatch {
    pub zone_apex: Name,
    pub signer_apex: Name,
}

impl fmt::Display for SignerZoneMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "the signer is for {} but the zone's apex is {}",
            self.signer_apex, self.zone_apex,
        )
    }
}

impl std::error::Error for SignerZoneMismatch {}

////////////////////////////////////////////////////////////////////////
// THE RESOLVER                                                       //
////////////////////////////////////////////////////////////////////////

/// Answers queries against a single zone.
#[derive(Debug)]
pub struct Resolver {
    zone: Zone,
    signer: Option<ZoneSigner>,
}

impl Resolver {
    /// Creates a resolver serving `zone` unsigned.
    pub fn new(zone: Zone) -> Self {
        Self { zone, signer: None }
    }

    /// Creates a resolver serving `zone` with DNSSEC signing.
    pub fn with_signer(zone: Zone, signer: ZoneSigner) -> Result<Self, SignerZoneMismatch> {
        if signer.apex() != zone.apex() {
            return Err(SignerZoneMismatch {
                zone_apex: zone.apex().clone(),
                signer_apex: signer.apex().clone(),
            });
        }
        Ok(Self {
            zone,
            signer: Some(signer),
        })
    }

    /// Returns the zone this resolver serves.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Resolves a query at the current system time.
    pub fn resolve(&self, query: &Query) -> Result<Response, ResolveError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs() as u32);
        self.resolve_at(query, now)
    }

    /// Resolves a query as of `now` (seconds since the Unix epoch),
    /// which determines key validity and signature timestamps.
    pub fn resolve_at(&self, query: &Query, now: u32) -> Result<Response, ResolveError> {
        if query.questions.len() != 1 {
            return Err(ResolveError::MalformedQuery);
        }
        let question = &query.questions[0];

        let mut response = Response {
            id: query.id,
            opcode: query.opcode,
            authoritative: true,
            truncated: false,
            recursion_desired: query.recursion_desired,
            recursion_available: false,
            authentic_data: true,
            checking_disabled: query.checking_disabled,
            rcode: Rcode::NOERROR,
            question: Some(question.clone()),
            edns: query.edns.map(|edns| Edns {
                udp_payload_size: edns.udp_payload_size.min(MAX_EDNS_PAYLOAD),
                dnssec_ok: edns.dnssec_ok,
            }),
            answer: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        };

        // Proofs and signatures are attached only for DO-bit queries
        // against a signed zone.
        let proofs = query.edns.map_or(false, |edns| edns.dnssec_ok) && self.signer.is_some();

        if question.qname.eq_or_subdomain_of(self.zone.apex()) {
            self.answer(question, proofs, now, &mut response)?;
        } else {
            debug!("refusing query for out-of-zone name {}", question.qname);
            response.rcode = Rcode::REFUSED;
            response.authoritative = false;
        }

        let limit = match query.edns {
            Some(edns) => edns.udp_payload_size.clamp(CLASSIC_PAYLOAD, MAX_EDNS_PAYLOAD),
            None => CLASSIC_PAYLOAD,
        };
        if response.wire_size() > limit as usize {
            response.truncated = true;
        }
        Ok(response)
    }

    fn answer(
        &self,
        question: &Question,
        proofs: bool,
        now: u32,
        response: &mut Response,
    ) -> Result<(), ResolveError> {
        let qname = &question.qname;

        // An apex DNSKEY query is answered from the key store, not the
        // tree; the keys are returned whether or not proofs were
        // requested.
        if question.qtype == Type::DNSKEY && qname == self.zone.apex() {
            if let Some(signer) = &self.signer {
                // The published keys take the SOA RRset's TTL.
                let dnskeys = signer.dnskey_rrset(self.soa()?.ttl);
                if proofs {
                    let rrsigs = signer.sign_rrset(&dnskeys, self.negative_ttl()?, now)?;
                    response.answer.push(dnskeys);
                    response.answer.push(rrsigs);
                } else {
                    response.answer.push(dnskeys);
                }
                return Ok(());
            }
        }

        // An RRSIG query returns the signatures covering every RRset at
        // the exact node; an empty or missing node falls through to the
        // negative paths.
        if question.qtype == Type::RRSIG {
            if let Some(signer) = &self.signer {
                match self.zone.find(qname) {
                    Some(node) if !node.is_empty() => {
                        let ttl = self.negative_ttl()?;
                        for rrset in node.rrsets() {
                            response.answer.push(signer.sign_rrset(rrset, ttl, now)?);
                        }
                        return Ok(());
                    }
                    Some(_) => return self.no_data(qname, false, proofs, now, response),
                    None => return self.nxdomain(qname, proofs, now, response),
                }
            }
        }

        // DNAME chase: the closest strict ancestor below the apex
        // owning a DNAME redirects the query (RFC 6672).
        let depth = qname.len() - self.zone.apex().len();
        for skip in 1..depth {
            let ancestor = match qname.superdomain(skip) {
                Some(ancestor) => ancestor,
                None => break,
            };
            let node = match self.zone.find(&ancestor) {
                Some(node) => node,
                None => continue,
            };
            let dname = match node.rrset(Type::DNAME) {
                Some(dname) => dname.clone(),
                None => continue,
            };
            return self.chase_dname(question, &ancestor, dname, proofs, now, response);
        }

        // Referral: a qname strictly below a non-apex NS owner is
        // delegated away. The topmost cut wins.
        for skip in (1..depth).rev() {
            let ancestor = match qname.superdomain(skip) {
                Some(ancestor) => ancestor,
                None => continue,
            };
            let node = match self.zone.find(&ancestor) {
                Some(node) => node,
                None => continue,
            };
            if let Some(ns) = node.rrset(Type::NS) {
                debug!("referring {} to the delegation at {}", qname, ancestor);
                response.authoritative = false;
                response.authority.push(ns.clone());
                if proofs {
                    if let Some(ds) = node.rrset(Type::DS) {
                        self.push_signed(&mut response.authority, ds.clone(), true, now)?;
                    }
                }
                return Ok(());
            }
        }

        let node = match self.zone.find(qname) {
            Some(node) => node,
            None => return self.nxdomain(qname, proofs, now, response),
        };

        if question.qtype == Type::ANY {
            if node.is_empty() {
                // The one no-data case that carries a wildcard proof.
                return self.no_data(qname, true, proofs, now, response);
            }
            for rrset in node.rrsets() {
                self.push_signed(&mut response.answer, rrset.clone(), proofs, now)?;
            }
            return Ok(());
        }

        if let Some(cname) = node.rrset(Type::CNAME) {
            if cname.len() > 1 {
                return Err(ResolveError::ZoneBroken("multiple CNAME records at one owner"));
            }
            let target = match cname.rdatas().next() {
                Some(Rdata::Cname(target)) => target.clone(),
                _ => return Err(ResolveError::ZoneBroken("malformed CNAME RRset")),
            };
            self.push_signed(&mut response.answer, cname.clone(), proofs, now)?;
            if target.eq_or_subdomain_of(self.zone.apex()) {
                if let Some(target_node) = self.zone.find(&target) {
                    if let Some(rrset) = target_node.rrset(question.qtype) {
                        self.push_signed(&mut response.answer, rrset.clone(), proofs, now)?;
                    }
                }
            }
            return Ok(());
        }

        if let Some(rrset) = node.rrset(question.qtype) {
            self.push_signed(&mut response.answer, rrset.clone(), proofs, now)?;
            return Ok(());
        }

        self.no_data(qname, false, proofs, now, response)
    }

    /// Handles the DNAME branch: the redirect record, a synthesized
    /// CNAME for the queried name, and the target's own data when it
    /// exists in this zone.
    fn chase_dname(
        &self,
        question: &Question,
        owner: &Name,
        dname: Rrset,
        proofs: bool,
        now: u32,
        response: &mut Response,
    ) -> Result<(), ResolveError> {
        if dname.len() > 1 {
            return Err(ResolveError::ZoneBroken("multiple DNAME records at one owner"));
        }
        let target = match dname.rdatas().next() {
            Some(Rdata::Dname(target)) => target.clone(),
            _ => return Err(ResolveError::ZoneBroken("malformed DNAME RRset")),
        };
        let ttl = dname.ttl;
        let class = dname.class;
        self.push_signed(&mut response.answer, dname, proofs, now)?;

        let rewritten = match question.qname.rebase(owner, &target) {
            Ok(rewritten) => rewritten,
            Err(_) => {
                // The substituted name exceeds the wire limits
                // (RFC 6672 § 2.2).
                response.rcode = Rcode::YXDOMAIN;
                return Ok(());
            }
        };
        let cname = Rrset::from_rdata(
            question.qname.clone(),
            class,
            ttl,
            Rdata::Cname(rewritten.clone()),
        );
        self.push_signed(&mut response.answer, cname, proofs, now)?;

        if let Some(target_node) = self.zone.find(&rewritten) {
            if let Some(rrset) = target_node.rrset(question.qtype) {
                self.push_signed(&mut response.answer, rrset.clone(), proofs, now)?;
            }
        }
        Ok(())
    }

    /// Populates a successful response with no data for the queried
    /// type: the SOA in authority, plus (with proofs) the NSEC record
    /// for the queried name and, when `wildcard_proof` is set, the one
    /// for the wildcard slot.
    fn no_data(
        &self,
        qname: &Name,
        wildcard_proof: bool,
        proofs: bool,
        now: u32,
        response: &mut Response,
    ) -> Result<(), ResolveError> {
        let soa = self.soa()?.clone();
        self.push_signed(&mut response.authority, soa, proofs, now)?;
        if proofs {
            let nsec = self.zone.nsec_rrset(qname)?;
            self.push_signed(&mut response.authority, nsec, true, now)?;
            if wildcard_proof {
                self.push_wildcard_proof(now, response)?;
            }
        }
        Ok(())
    }

    /// Populates an NXDOMAIN response: the SOA in authority, plus (with
    /// proofs) the NSEC records covering the queried name and the
    /// wildcard slot.
    fn nxdomain(
        &self,
        qname: &Name,
        proofs: bool,
        now: u32,
        response: &mut Response,
    ) -> Result<(), ResolveError> {
        response.rcode = Rcode::NXDOMAIN;
        let soa = self.soa()?.clone();
        self.push_signed(&mut response.authority, soa, proofs, now)?;
        if proofs {
            let nsec = self.zone.nsec_rrset(qname)?;
            self.push_signed(&mut response.authority, nsec, true, now)?;
            self.push_wildcard_proof(now, response)?;
        }
        Ok(())
    }

    /// Attaches the proof that no wildcard applies: the NSEC record
    /// covering the literal name `*.<apex>`.
    fn push_wildcard_proof(&self, now: u32, response: &mut Response) -> Result<(), ResolveError> {
        let wildcard = self
            .zone
            .apex()
            .prefixed(Label::asterisk())
            .map_err(|_| ResolveError::ZoneBroken("apex too long for a wildcard name"))?;
        let nsec = self.zone.nsec_rrset(&wildcard)?;
        self.push_signed(&mut response.authority, nsec, true, now)
    }

    /// Pushes `rrset` onto `section`, following it with its RRSIG RRset
    /// when `sign` is set.
    fn push_signed(
        &self,
        section: &mut Vec<Rrset>,
        rrset: Rrset,
        sign: bool,
        now: u32,
    ) -> Result<(), ResolveError> {
        let rrsigs = match (sign, &self.signer) {
            (true, Some(signer)) => Some(signer.sign_rrset(&rrset, self.negative_ttl()?, now)?),
            _ => None,
        };
        section.push(rrset);
        if let Some(rrsigs) = rrsigs {
            section.push(rrsigs);
        }
        Ok(())
    }

    fn soa(&self) -> Result<&Rrset, ResolveError> {
        self.zone
            .soa()
            .ok_or(ResolveError::ZoneBroken("the zone has no SOA record"))
    }

    fn negative_ttl(&self) -> Result<Ttl, ResolveError> {
        self.zone
            .negative_ttl()
            .ok_or(ResolveError::ZoneBroken("the zone has no SOA record"))
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use lazy_static::lazy_static;
    use ring::rand::SystemRandom;
    use ring::signature::Ed25519KeyPair;

    use super::*;
    use crate::class::Class;
    use crate::message::Opcode;
    use crate::rr::Soa;
    use crate::sign::{Algorithm, KeyConfig, KeyRole, KeyStore, PrivateKey, SignatureWindow};

    const NOW: u32 = 1_700_000_000;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    fn rrset(owner: &str, ttl: u32, rdata: Rdata) -> Rrset {
        Rrset::from_rdata(name(owner), Class::IN, Ttl::from(ttl), rdata)
    }

    fn test_zone() -> Zone {
        let mut zone = Zone::new(name("example.com."), Class::IN);
        for set in [
            rrset(
                "example.com.",
                3600,
                Rdata::Soa(Soa {
                    mname: name("ns.example.com."),
                    rname: name("admin.example.com."),
                    serial: 2026082901,
                    refresh: 10800,
                    retry: 3600,
                    expire: 604800,
                    minimum: 300,
                }),
            ),
            rrset("example.com.", 3600, Rdata::Ns(name("ns.example.com."))),
            rrset("ns.example.com.", 3600, Rdata::A(Ipv4Addr::new(192, 0, 2, 53))),
            rrset("www.example.com.", 3600, Rdata::A(Ipv4Addr::new(192, 0, 2, 1))),
            rrset(
                "alias.example.com.",
                3600,
                Rdata::Cname(name("target.example.com.")),
            ),
            rrset(
                "target.example.com.",
                3600,
                Rdata::A(Ipv4Addr::new(192, 0, 2, 2)),
            ),
            rrset(
                "redirect.example.com.",
                3600,
                Rdata::Dname(name("legacy.example.com.")),
            ),
            rrset(
                "www.legacy.example.com.",
                3600,
                Rdata::A(Ipv4Addr::new(192, 0, 2, 3)),
            ),
            rrset(
                "child.example.com.",
                3600,
                Rdata::Ns(name("ns.child.example.com.")),
            ),
            rrset(
                "big.example.com.",
                3600,
                Rdata::Txt(vec![vec![b'x'; 255].into_boxed_slice(); 3]),
            ),
            // a.b.example.com. makes b.example.com. an empty
            // non-terminal.
            rrset(
                "a.b.example.com.",
                3600,
                Rdata::A(Ipv4Addr::new(192, 0, 2, 4)),
            ),
        ] {
            zone.add(set).unwrap();
        }
        zone.validate().unwrap();
        zone
    }

    fn test_key(role: KeyRole) -> PrivateKey {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        PrivateKey::from_config(
            &KeyConfig {
                role,
                algorithm: Algorithm::Ed25519,
                name: name("example.com."),
                not_before: 0,
                not_after: u32::MAX,
                private_key: pkcs8.as_ref().to_vec(),
            },
            &rng,
        )
        .unwrap()
    }

    fn signed_resolver() -> Resolver {
        let mut store = KeyStore::default();
        store.add(test_key(KeyRole::Ksk));
        store.add(test_key(KeyRole::Zsk));
        let signer = ZoneSigner::new(
            name("example.com."),
            Class::IN,
            store,
            SignatureWindow::default(),
        )
        .unwrap();
        Resolver::with_signer(test_zone(), signer).unwrap()
    }

    lazy_static! {
        static ref UNSIGNED_RESOLVER: Resolver = Resolver::new(test_zone());
        static ref SIGNED_RESOLVER: Resolver = signed_resolver();
    }

    fn query_for(qname: &str, qtype: Type, edns: Option<Edns>) -> Query {
        Query {
            id: 0x1234,
            opcode: Opcode::QUERY,
            recursion_desired: true,
            checking_disabled: false,
            questions: vec![Question {
                qname: name(qname),
                qtype,
                qclass: Class::IN,
            }],
            edns,
        }
    }

    fn do_query(qname: &str, qtype: Type) -> Query {
        query_for(
            qname,
            qtype,
            Some(Edns {
                udp_payload_size: 1232,
                dnssec_ok: true,
            }),
        )
    }

    fn covered(rrset: &Rrset) -> Type {
        assert_eq!(rrset.rr_type, Type::RRSIG);
        match rrset.rdatas().next().unwrap() {
            Rdata::Rrsig(rrsig) => rrsig.type_covered,
            other => panic!("expected RRSIG, got {:?}", other),
        }
    }

    #[test]
    fn positive_answer() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("www.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert!(response.authoritative);
        assert!(!response.recursion_available);
        assert!(response.recursion_desired);
        assert_eq!(response.id, 0x1234);
        assert_eq!(response.answer.len(), 1);
        assert_eq!(
            response.answer[0].rdatas().collect::<Vec<_>>(),
            vec![&Rdata::A(Ipv4Addr::new(192, 0, 2, 1))],
        );
        assert!(response.authority.is_empty());
    }

    #[test]
    fn nxdomain_carries_the_soa() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("nosuch.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NXDOMAIN);
        assert!(response.answer.is_empty());
        assert_eq!(response.authority.len(), 1);
        assert_eq!(response.authority[0].rr_type, Type::SOA);
    }

    #[test]
    fn no_data_is_noerror_with_soa() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("www.example.com.", Type::AAAA, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert!(response.answer.is_empty());
        assert_eq!(response.authority.len(), 1);
        assert_eq!(response.authority[0].rr_type, Type::SOA);
    }

    #[test]
    fn out_of_zone_is_refused() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("www.example.org.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::REFUSED);
        assert!(!response.authoritative);
        assert!(response.answer.is_empty());
        assert!(response.authority.is_empty());
    }

    #[test]
    fn question_count_must_be_one() {
        let resolver = &*UNSIGNED_RESOLVER;
        let mut query = query_for("www.example.com.", Type::A, None);
        query.questions.clear();
        assert!(matches!(
            resolver.resolve_at(&query, NOW),
            Err(ResolveError::MalformedQuery),
        ));
        let mut query = query_for("www.example.com.", Type::A, None);
        let duplicate = query.questions[0].clone();
        query.questions.push(duplicate);
        assert!(matches!(
            resolver.resolve_at(&query, NOW),
            Err(ResolveError::MalformedQuery),
        ));
    }

    #[test]
    fn cname_is_chased_one_level() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("alias.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert_eq!(response.answer.len(), 2);
        assert_eq!(response.answer[0].rr_type, Type::CNAME);
        assert_eq!(response.answer[1].rr_type, Type::A);
        assert_eq!(
            response.answer[1].rdatas().collect::<Vec<_>>(),
            vec![&Rdata::A(Ipv4Addr::new(192, 0, 2, 2))],
        );
    }

    #[test]
    fn dname_synthesizes_a_cname() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("www.redirect.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert_eq!(response.answer.len(), 3);
        assert_eq!(response.answer[0].rr_type, Type::DNAME);
        assert_eq!(response.answer[1].rr_type, Type::CNAME);
        assert_eq!(response.answer[1].owner, name("www.redirect.example.com."));
        assert_eq!(
            response.answer[1].rdatas().collect::<Vec<_>>(),
            vec![&Rdata::Cname(name("www.legacy.example.com."))],
        );
        assert_eq!(response.answer[2].rr_type, Type::A);
        assert_eq!(
            response.answer[2].rdatas().collect::<Vec<_>>(),
            vec![&Rdata::A(Ipv4Addr::new(192, 0, 2, 3))],
        );
    }

    #[test]
    fn names_below_a_cut_get_a_referral() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("host.child.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert!(!response.authoritative);
        assert!(response.answer.is_empty());
        assert_eq!(response.authority.len(), 1);
        assert_eq!(response.authority[0].rr_type, Type::NS);
        assert_eq!(response.authority[0].owner, name("child.example.com."));
    }

    #[test]
    fn any_returns_every_rrset_at_the_node() {
        let resolver = &*UNSIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("example.com.", Type::ANY, None), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        let types: Vec<Type> = response.answer.iter().map(|r| r.rr_type).collect();
        assert_eq!(types, vec![Type::NS, Type::SOA]);
    }

    #[test]
    fn edns_parameters_are_echoed_and_capped() {
        let resolver = &*UNSIGNED_RESOLVER;
        let query = query_for(
            "www.example.com.",
            Type::A,
            Some(Edns {
                udp_payload_size: 4096,
                dnssec_ok: false,
            }),
        );
        let response = resolver.resolve_at(&query, NOW).unwrap();
        assert_eq!(
            response.edns,
            Some(Edns {
                udp_payload_size: 1280,
                dnssec_ok: false,
            }),
        );
        let response = resolver
            .resolve_at(&query_for("www.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.edns, None);
    }

    #[test]
    fn oversized_responses_are_marked_truncated() {
        let resolver = &*UNSIGNED_RESOLVER;
        let classic = resolver
            .resolve_at(&query_for("big.example.com.", Type::TXT, None), NOW)
            .unwrap();
        assert!(classic.wire_size() > 512);
        assert!(classic.truncated);

        let extended = resolver
            .resolve_at(
                &query_for(
                    "big.example.com.",
                    Type::TXT,
                    Some(Edns {
                        udp_payload_size: 1232,
                        dnssec_ok: false,
                    }),
                ),
                NOW,
            )
            .unwrap();
        assert!(!extended.truncated);
    }

    #[test]
    fn signatures_require_the_do_bit() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&query_for("www.example.com.", Type::A, None), NOW)
            .unwrap();
        assert_eq!(response.answer.len(), 1);
        assert!(response
            .answer
            .iter()
            .chain(&response.authority)
            .all(|rrset| rrset.rr_type != Type::RRSIG));
    }

    #[test]
    fn positive_answers_are_signed() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("www.example.com.", Type::A), NOW)
            .unwrap();
        assert_eq!(response.answer.len(), 2);
        assert_eq!(response.answer[0].rr_type, Type::A);
        assert_eq!(covered(&response.answer[1]), Type::A);
    }

    #[test]
    fn apex_dnskey_query_is_served_from_the_key_store() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("example.com.", Type::DNSKEY), NOW)
            .unwrap();
        assert_eq!(response.answer.len(), 2);
        assert_eq!(response.answer[0].rr_type, Type::DNSKEY);
        assert_eq!(response.answer[0].len(), 2);
        // The keys carry the SOA RRset's TTL, not the SOA MINIMUM.
        assert_eq!(response.answer[0].ttl, Ttl::from(3600));
        assert_eq!(covered(&response.answer[1]), Type::DNSKEY);
    }

    #[test]
    fn rrsig_query_covers_every_rrset_at_the_node() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("www.example.com.", Type::RRSIG), NOW)
            .unwrap();
        assert_eq!(response.answer.len(), 1);
        assert_eq!(covered(&response.answer[0]), Type::A);
        assert!(response.authority.is_empty());
    }

    #[test]
    fn signed_nxdomain_proves_name_and_wildcard() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("nosuch.example.com.", Type::A), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NXDOMAIN);
        let types: Vec<Type> = response.authority.iter().map(|r| r.rr_type).collect();
        assert_eq!(
            types,
            vec![
                Type::SOA,
                Type::RRSIG,
                Type::NSEC,
                Type::RRSIG,
                Type::NSEC,
                Type::RRSIG,
            ],
        );
        // Both proofs exist; with `*.example.com.` sorting before every
        // other subdomain, the wildcard proof is owned by the apex.
        assert_eq!(response.authority[4].owner, name("example.com."));
    }

    #[test]
    fn signed_no_data_omits_the_wildcard_proof() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("www.example.com.", Type::AAAA), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        let types: Vec<Type> = response.authority.iter().map(|r| r.rr_type).collect();
        assert_eq!(types, vec![Type::SOA, Type::RRSIG, Type::NSEC, Type::RRSIG]);
        assert_eq!(response.authority[2].owner, name("www.example.com."));
    }

    #[test]
    fn any_on_an_empty_node_adds_the_wildcard_proof() {
        let resolver = &*SIGNED_RESOLVER;
        let response = resolver
            .resolve_at(&do_query("b.example.com.", Type::ANY), NOW)
            .unwrap();
        assert_eq!(response.rcode, Rcode::NOERROR);
        assert!(response.answer.is_empty());
        let types: Vec<Type> = response.authority.iter().map(|r| r.rr_type).collect();
        assert_eq!(
            types,
            vec![
                Type::SOA,
                Type::RRSIG,
                Type::NSEC,
                Type::RRSIG,
                Type::NSEC,
                Type::RRSIG,
            ],
        );
    }

    #[test]
    fn mismatched_signer_is_rejected() {
        let mut store = KeyStore::default();
        store.add(test_key(KeyRole::Zsk));
        let signer = ZoneSigner::new(
            name("example.com."),
            Class::IN,
            store,
            SignatureWindow::default(),
        )
        .unwrap();
        let other_zone = Zone::new(name("example.org."), Class::IN);
        assert!(Resolver::with_signer(other_zone, signer).is_err());
    }
}
