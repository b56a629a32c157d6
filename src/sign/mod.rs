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

//! Online DNSSEC signing (RFC 4033–4035).
//!
//! The zone is served unsigned and signatures are produced on demand:
//! when a response needs an RRSIG, the [`ZoneSigner`] builds the
//! canonical sign data for the covered RRset (RFC 4034 § 3.1.8.1) and
//! signs it with every currently valid key of the appropriate role.
//! The DNSKEY RRset is signed by key-signing keys, everything else by
//! zone-signing keys; during a rollover, when two keys of one role are
//! valid at once, the covered set gets one RRSIG per key so that
//! validators holding either key can validate.
//!
//! Following the convention for negative and synthesized material, both
//! the original TTL recorded in RRSIGs and the TTL of the RRSIG RRsets
//! themselves are the zone's SOA MINIMUM, which the caller supplies.

use std::fmt;

use ring::rand::SystemRandom;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::class::Class;
use crate::name::Name;
use crate::rr::{Ds, Rdata, Rrset, Rrsig, Ttl, Type};

mod keys;

pub use keys::{compute_key_tag, Algorithm, KeyConfig, KeyError, KeyRole, KeyStore, PrivateKey};

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error constructing a signer or producing signatures.
#[derive(Debug)]
pub enum Error {
    /// No key of the required role is within its validity window at
    /// signing time.
    NoValidKey(KeyRole),

    /// A configured key's owner name is not the apex of the zone the
    /// signer serves.
    KeyOwnerMismatch(Name),

    /// The cryptography backend failed.
    Key(KeyError),
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        Self::Key(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoValidKey(KeyRole::Ksk) => f.write_str("no valid key-signing key"),
            Self::NoValidKey(KeyRole::Zsk) => f.write_str("no valid zone-signing key"),
            Self::KeyOwnerMismatch(owner) => {
                write!(f, "key for {} does not belong to this zone", owner)
            }
            Self::Key(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// SIGNATURE VALIDITY WINDOWS                                         //
////////////////////////////////////////////////////////////////////////

/// The validity period stamped into generated RRSIGs, relative to the
/// signing time: inception is backdated to tolerate clock skew at
/// validators, and expiration bounds the signature's lifetime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureWindow {
    pub backdate: u32,
    pub lifetime: u32,
}

impl Default for SignatureWindow {
    fn default() -> Self {
        Self {
            backdate: 3600,        // one hour
            lifetime: 30 * 86_400, // thirty days
        }
    }
}

/// A digest algorithm for DS records (RFC 4034 § 5.1.3, RFC 4509).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestType {
    Sha1,
    Sha256,
}

impl DigestType {
    fn number(self) -> u8 {
        match self {
            Self::Sha1 => 1,
            Self::Sha256 => 2,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// THE ZONE SIGNER                                                    //
////////////////////////////////////////////////////////////////////////

/// The signing half of a served zone: the key store plus the state
/// needed to produce RRSIG, DNSKEY, and DS RRsets for it.
pub struct ZoneSigner {
    apex: Name,
    class: Class,
    keys: KeyStore,
    window: SignatureWindow,
    rng: SystemRandom,
}

impl fmt::Debug for ZoneSigner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ZoneSigner")
            .field("apex", &self.apex)
            .field("class", &self.class)
            .field("keys", &self.keys)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl ZoneSigner {
    /// Creates a signer for the zone with the given apex and class.
    /// Every key in `keys` must be owned by the apex.
    pub fn new(
        apex: Name,
        class: Class,
        keys: KeyStore,
        window: SignatureWindow,
    ) -> Result<Self, Error> {
        if let Some(stray) = keys.keys().find(|key| *key.owner() != apex) {
            return Err(Error::KeyOwnerMismatch(stray.owner().clone()));
        }
        Ok(Self {
            apex,
            class,
            keys,
            window,
            rng: SystemRandom::new(),
        })
    }

    /// Returns the apex of the zone this signer serves.
    pub fn apex(&self) -> &Name {
        &self.apex
    }

    /// Builds the zone's DNSKEY RRset. Every configured key is
    /// published, valid or not, so that validators can be primed for an
    /// upcoming rollover.
    pub fn dnskey_rrset(&self, ttl: Ttl) -> Rrset {
        let mut rrset = Rrset::new(self.apex.clone(), Type::DNSKEY, self.class, ttl);
        for key in self.keys.keys() {
            rrset.add(key.dnskey_rdata(), ttl);
        }
        rrset
    }

    /// Builds the zone's DS RRset with the requested digest type, one
    /// record per key-signing key. The records are meant for the parent
    /// zone, which is why they are derived rather than stored.
    pub fn ds_rrset(&self, digest_type: DigestType, ttl: Ttl) -> Rrset {
        let mut rrset = Rrset::new(self.apex.clone(), Type::DS, self.class, ttl);
        let owner_wire = self.apex.to_lowercase();
        for key in self.keys.keys() {
            if key.role() != KeyRole::Ksk {
                continue;
            }
            let mut input = owner_wire.wire_repr().to_vec();
            key.dnskey_rdata().write_wire(&mut input);
            let digest = match digest_type {
                DigestType::Sha1 => Sha1::digest(&input).to_vec(),
                DigestType::Sha256 => Sha256::digest(&input).to_vec(),
            };
            rrset.add(
                Rdata::Ds(Ds {
                    key_tag: key.key_tag(),
                    algorithm: key.algorithm().number(),
                    digest_type: digest_type.number(),
                    digest,
                }),
                ttl,
            );
        }
        rrset
    }

    /// Signs `rrset`, producing its RRSIG RRset as of time `now`
    /// (seconds since the Unix epoch). `original_ttl` is the zone's
    /// SOA MINIMUM; it becomes both the original TTL recorded in the
    /// signatures and the TTL of the returned RRset.
    ///
    /// The DNSKEY RRset is signed with every valid key-signing key,
    /// anything else with every valid zone-signing key. Having no valid
    /// key of the needed role is an error, not a silently unsigned
    /// response.
    pub fn sign_rrset(
        &self,
        rrset: &Rrset,
        original_ttl: Ttl,
        now: u32,
    ) -> Result<Rrset, Error> {
        let role = if rrset.rr_type == Type::DNSKEY {
            KeyRole::Ksk
        } else {
            KeyRole::Zsk
        };

        let owner = rrset.owner.to_lowercase();
        let labels = rrsig_labels(&owner);
        let mut signatures = Rrset::new(rrset.owner.clone(), Type::RRSIG, rrset.class, original_ttl);

        let mut signed = false;
        for key in self.keys.valid_keys(role, now) {
            signed = true;
            let mut rrsig = Rrsig {
                type_covered: rrset.rr_type,
                algorithm: key.algorithm().number(),
                labels,
                original_ttl: original_ttl.into(),
                expiration: now.saturating_add(self.window.lifetime),
                inception: now.saturating_sub(self.window.backdate),
                key_tag: key.key_tag(),
                signer: self.apex.to_lowercase(),
                signature: Vec::new(),
            };
            let data = sign_data(&rrsig, &owner, rrset, original_ttl);
            rrsig.signature = key.sign(&self.rng, &data)?;
            signatures.add(Rdata::Rrsig(rrsig), original_ttl);
        }

        if signed {
            Ok(signatures)
        } else {
            Err(Error::NoValidKey(role))
        }
    }
}

/// Counts the labels of a (lowercased) owner name for the RRSIG labels
/// field: the root label is excluded, as is a leading `*`
/// (RFC 4034 § 3.1.3).
fn rrsig_labels(owner: &Name) -> u8 {
    let mut count = owner.len() - 1;
    if owner.is_wildcard() {
        count -= 1;
    }
    count as u8
}

/// Assembles the data an RRSIG signature covers (RFC 4034 § 3.1.8.1):
/// the RRSIG RDATA with the signature field left off, followed by each
/// record of the covered set in canonical form, sorted by canonical
/// RDATA.
fn sign_data(rrsig: &Rrsig, owner: &Name, rrset: &Rrset, original_ttl: Ttl) -> Vec<u8> {
    let mut data = Vec::new();
    Rdata::Rrsig(rrsig.clone()).write_canonical(&mut data);

    let mut rdatas: Vec<Vec<u8>> = rrset
        .rdatas()
        .map(|rdata| {
            let mut buf = Vec::new();
            rdata.write_canonical(&mut buf);
            buf
        })
        .collect();
    rdatas.sort_unstable();

    for rdata in rdatas {
        data.extend_from_slice(owner.wire_repr());
        data.extend_from_slice(&u16::from(rrset.rr_type).to_be_bytes());
        data.extend_from_slice(&u16::from(rrset.class).to_be_bytes());
        data.extend_from_slice(&u32::from(original_ttl).to_be_bytes());
        data.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        data.extend_from_slice(&rdata);
    }
    data
}
