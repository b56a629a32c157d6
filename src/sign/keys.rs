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

//! Private-key management for zone signing.
//!
//! Keys are loaded from [`KeyConfig`] entries (deserialized from the
//! server's configuration file) into [`PrivateKey`] values and grouped
//! in a [`KeyStore`]. A key carries a role and a validity window in
//! addition to its cryptographic material: key-signing keys (KSKs) sign
//! only the DNSKEY RRset, zone-signing keys (ZSKs) sign everything
//! else, and a key outside its validity window produces no signatures.
//! During a rollover several keys of one role are valid at once and the
//! signer emits one signature per valid key.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::rand::SecureRandom;
use ring::rsa::PublicKeyComponents;
use ring::signature::{self, EcdsaKeyPair, Ed25519KeyPair, KeyPair as _, RsaKeyPair};
use serde::{de, Deserialize};

use crate::name::Name;
use crate::rr::{Dnskey, Rdata};

////////////////////////////////////////////////////////////////////////
// ROLES AND ALGORITHMS                                               //
////////////////////////////////////////////////////////////////////////

/// The role of a signing key.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// A key-signing key. It signs the DNSKEY RRset and nothing else,
    /// and its DNSKEY record carries the Secure Entry Point flag.
    Ksk,

    /// A zone-signing key. It signs every RRset except the DNSKEY
    /// RRset.
    Zsk,
}

/// A supported DNSSEC signing algorithm.
///
/// The configured mnemonics are the IANA ones. Algorithms this server
/// cannot produce signatures for are rejected at configuration time.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
pub enum Algorithm {
    #[serde(rename = "RSASHA256")]
    RsaSha256,
    #[serde(rename = "RSASHA512")]
    RsaSha512,
    #[serde(rename = "ECDSAP256SHA256")]
    EcdsaP256Sha256,
    #[serde(rename = "ECDSAP384SHA384")]
    EcdsaP384Sha384,
    #[serde(rename = "ED25519")]
    Ed25519,
}

impl Algorithm {
    /// Returns the algorithm's IANA-assigned number.
    pub fn number(self) -> u8 {
        match self {
            Self::RsaSha256 => 8,
            Self::RsaSha512 => 10,
            Self::EcdsaP256Sha256 => 13,
            Self::EcdsaP384Sha384 => 14,
            Self::Ed25519 => 15,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RsaSha256 => f.write_str("RSASHA256"),
            Self::RsaSha512 => f.write_str("RSASHA512"),
            Self::EcdsaP256Sha256 => f.write_str("ECDSAP256SHA256"),
            Self::EcdsaP384Sha384 => f.write_str("ECDSAP384SHA384"),
            Self::Ed25519 => f.write_str("ED25519"),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION                                                      //
////////////////////////////////////////////////////////////////////////

/// The configuration of a single signing key.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyConfig {
    pub role: KeyRole,
    pub algorithm: Algorithm,
    #[serde(deserialize_with = "deserialize_name")]
    pub name: Name,
    pub not_before: u32,
    pub not_after: u32,
    #[serde(deserialize_with = "deserialize_base64")]
    pub private_key: Vec<u8>,
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<Name, D::Error>
where
    D: de::Deserializer<'de>,
{
    let text: String = Deserialize::deserialize(deserializer)?;
    text.parse().map_err(de::Error::custom)
}

fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let text: String = Deserialize::deserialize(deserializer)?;
    BASE64.decode(&text).map_err(de::Error::custom)
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Omits the key material.
        f.debug_struct("KeyConfig")
            .field("role", &self.role)
            .field("algorithm", &self.algorithm)
            .field("name", &self.name)
            .field("not_before", &self.not_before)
            .field("not_after", &self.not_after)
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error loading or using a signing key.
#[derive(Debug)]
pub enum KeyError {
    /// The PKCS#8 document was rejected by the cryptography backend.
    Rejected(ring::error::KeyRejected),

    /// The backend failed to produce a signature.
    Signing,
}

impl From<ring::error::KeyRejected> for KeyError {
    fn from(rejected: ring::error::KeyRejected) -> Self {
        Self::Rejected(rejected)
    }
}

impl From<ring::error::Unspecified> for KeyError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::Signing
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rejected(rejected) => write!(f, "invalid private key: {}", rejected),
            Self::Signing => f.write_str("failed to produce a signature"),
        }
    }
}

impl std::error::Error for KeyError {}

////////////////////////////////////////////////////////////////////////
// PRIVATE KEYS                                                       //
////////////////////////////////////////////////////////////////////////

/// A loaded signing key.
pub struct PrivateKey {
    role: KeyRole,
    algorithm: Algorithm,
    owner: Name,
    not_before: u32,
    not_after: u32,
    pair: Pair,
    public_key: Vec<u8>,
    key_tag: u16,
}

enum Pair {
    Rsa(RsaKeyPair),
    Ecdsa(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

impl PrivateKey {
    /// Loads a key from its configuration. The PKCS#8 document is
    /// parsed, the DNSKEY public key field is derived from it, and the
    /// key tag is computed.
    pub fn from_config(
        config: &KeyConfig,
        rng: &dyn SecureRandom,
    ) -> Result<Self, KeyError> {
        let der = config.private_key.as_slice();
        let (pair, public_key) = match config.algorithm {
            Algorithm::RsaSha256 | Algorithm::RsaSha512 => {
                let pair = RsaKeyPair::from_pkcs8(der)?;
                let public_key = rsa_dnskey_public_key(&pair);
                (Pair::Rsa(pair), public_key)
            }
            Algorithm::EcdsaP256Sha256 => {
                let pair = EcdsaKeyPair::from_pkcs8(
                    &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
                    der,
                    rng,
                )?;
                // The public key is the uncompressed point 04 || X || Y;
                // the DNSKEY field is X || Y (RFC 6605 § 4).
                let public_key = pair.public_key().as_ref()[1..].to_vec();
                (Pair::Ecdsa(pair), public_key)
            }
            Algorithm::EcdsaP384Sha384 => {
                let pair = EcdsaKeyPair::from_pkcs8(
                    &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
                    der,
                    rng,
                )?;
                let public_key = pair.public_key().as_ref()[1..].to_vec();
                (Pair::Ecdsa(pair), public_key)
            }
            Algorithm::Ed25519 => {
                let pair = Ed25519KeyPair::from_pkcs8(der)?;
                let public_key = pair.public_key().as_ref().to_vec();
                (Pair::Ed25519(pair), public_key)
            }
        };

        let flags = match config.role {
            KeyRole::Ksk => Dnskey::KSK_FLAGS,
            KeyRole::Zsk => Dnskey::ZSK_FLAGS,
        };
        let mut rdata_wire = Vec::with_capacity(4 + public_key.len());
        Rdata::Dnskey(Dnskey {
            flags,
            protocol: 3,
            algorithm: config.algorithm.number(),
            public_key: public_key.clone(),
        })
        .write_wire(&mut rdata_wire);
        let key_tag = compute_key_tag(&rdata_wire);

        Ok(Self {
            role: config.role,
            algorithm: config.algorithm,
            owner: config.name.clone(),
            not_before: config.not_before,
            not_after: config.not_after,
            pair,
            public_key,
            key_tag,
        })
    }

    pub fn role(&self) -> KeyRole {
        self.role
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the owner name of the key's DNSKEY record, i.e. the apex
    /// of the zone the key signs.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// Returns the key tag of the key's DNSKEY record (RFC 4034
    /// appendix B).
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the DNSKEY public key field.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns whether `time` (in seconds since the Unix epoch) falls
    /// within the key's validity window. The window is half-open: a key
    /// is valid from `not_before` up to but not including `not_after`.
    pub fn is_valid_at(&self, time: u32) -> bool {
        self.not_before <= time && time < self.not_after
    }

    /// Returns the key's DNSKEY RDATA.
    pub fn dnskey_rdata(&self) -> Rdata {
        Rdata::Dnskey(Dnskey {
            flags: match self.role {
                KeyRole::Ksk => Dnskey::KSK_FLAGS,
                KeyRole::Zsk => Dnskey::ZSK_FLAGS,
            },
            protocol: 3,
            algorithm: self.algorithm.number(),
            public_key: self.public_key.clone(),
        })
    }

    /// Signs `message`, returning the signature in the form RRSIG
    /// records carry it (RFC 3110 for RSA, fixed-width `r || s` for
    /// ECDSA per RFC 6605, raw for Ed25519 per RFC 8080).
    pub fn sign(&self, rng: &dyn SecureRandom, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        match &self.pair {
            Pair::Rsa(pair) => {
                let padding: &'static dyn signature::RsaEncoding = match self.algorithm {
                    Algorithm::RsaSha256 => &signature::RSA_PKCS1_SHA256,
                    _ => &signature::RSA_PKCS1_SHA512,
                };
                let mut sig = vec![0; pair.public().modulus_len()];
                pair.sign(padding, rng, message, &mut sig)?;
                Ok(sig)
            }
            Pair::Ecdsa(pair) => Ok(pair.sign(rng, message)?.as_ref().to_vec()),
            Pair::Ed25519(pair) => Ok(pair.sign(message).as_ref().to_vec()),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("role", &self.role)
            .field("algorithm", &self.algorithm)
            .field("owner", &self.owner)
            .field("key_tag", &self.key_tag)
            .finish_non_exhaustive()
    }
}

/// Produces the DNSKEY public key field of an RSA key (RFC 3110 § 2:
/// a length-prefixed exponent followed by the modulus).
fn rsa_dnskey_public_key(pair: &RsaKeyPair) -> Vec<u8> {
    // The components come back big-endian without leading zeros, which
    // is the form the DNSKEY field wants.
    let components = PublicKeyComponents::<Vec<u8>>::from(pair.public());
    let exponent = components.e;
    let modulus = components.n;
    let mut out = Vec::with_capacity(3 + exponent.len() + modulus.len());
    if exponent.len() < 256 {
        out.push(exponent.len() as u8);
    } else {
        out.push(0);
        out.extend_from_slice(&(exponent.len() as u16).to_be_bytes());
    }
    out.extend_from_slice(&exponent);
    out.extend_from_slice(&modulus);
    out
}

/// Computes a DNSKEY key tag over the record's RDATA wire form
/// (RFC 4034 appendix B).
pub fn compute_key_tag(rdata_wire: &[u8]) -> u16 {
    let mut acc: u32 = 0;
    for (i, &octet) in rdata_wire.iter().enumerate() {
        acc += if i & 1 == 0 {
            u32::from(octet) << 8
        } else {
            u32::from(octet)
        };
    }
    acc += (acc >> 16) & 0xffff;
    (acc & 0xffff) as u16
}

////////////////////////////////////////////////////////////////////////
// THE KEY STORE                                                      //
////////////////////////////////////////////////////////////////////////

/// The set of signing keys configured for a zone.
#[derive(Debug, Default)]
pub struct KeyStore {
    keys: Vec<PrivateKey>,
}

impl KeyStore {
    /// Loads every key in `configs`.
    pub fn from_configs(
        configs: &[KeyConfig],
        rng: &dyn SecureRandom,
    ) -> Result<Self, KeyError> {
        let mut store = Self::default();
        for config in configs {
            store.add(PrivateKey::from_config(config, rng)?);
        }
        Ok(store)
    }

    /// Adds a key to the store.
    pub fn add(&mut self, key: PrivateKey) {
        self.keys.push(key);
    }

    /// Returns an iterator over every key in the store, regardless of
    /// role or validity.
    pub fn keys(&self) -> impl Iterator<Item = &PrivateKey> + '_ {
        self.keys.iter()
    }

    /// Returns an iterator over the keys of `role` whose validity
    /// window includes `time`.
    pub fn valid_keys(&self, role: KeyRole, time: u32) -> impl Iterator<Item = &PrivateKey> + '_ {
        self.keys
            .iter()
            .filter(move |key| key.role() == role && key.is_valid_at(time))
    }

    /// Returns whether the store holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
