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

//! Structured views of DNS messages.
//!
//! This module is the boundary between the resolution logic and the
//! wire codec: a [`Query`] arrives already parsed (the codec is
//! responsible for decompressing names and for guarding against
//! compression-pointer loops), and a [`Response`] leaves as structured
//! sections for the codec to serialize. [`Response::wire_size`] gives
//! the size the serialized message would have without name compression,
//! which is what the truncation decision is made against.

mod opcode;
mod rcode;

use crate::class::Class;
use crate::name::Name;
use crate::rr::{Rrset, Type};

pub use opcode::Opcode;
pub use rcode::Rcode;

/// An entry of a DNS message's question section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: Type,
    pub qclass: Class,
}

/// The EDNS parameters of a message (RFC 6891).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Edns {
    pub udp_payload_size: u16,
    pub dnssec_ok: bool,
}

/// A received DNS query, already decoded by the wire codec.
#[derive(Clone, Debug)]
pub struct Query {
    pub id: u16,
    pub opcode: Opcode,
    pub recursion_desired: bool,
    pub checking_disabled: bool,
    pub questions: Vec<Question>,
    pub edns: Option<Edns>,
}

/// A response under construction.
///
/// The response owns its sections as whole [`Rrset`]s; the codec splits
/// them into individual records (and applies name compression) when it
/// serializes the message.
#[derive(Clone, Debug)]
pub struct Response {
    pub id: u16,
    pub opcode: Opcode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub rcode: Rcode,
    pub question: Option<Question>,
    pub edns: Option<Edns>,
    pub answer: Vec<Rrset>,
    pub authority: Vec<Rrset>,
    pub additional: Vec<Rrset>,
}

impl Response {
    /// Computes the size in octets of the serialized message, assuming
    /// the codec performs no name compression. The truncation decision
    /// compares this against the transport's payload limit; since
    /// compression only shrinks the message, the decision errs toward
    /// setting TC rather than overflowing.
    pub fn wire_size(&self) -> usize {
        let mut size = 12;
        if let Some(question) = &self.question {
            size += question.qname.wire_repr().len() + 4;
        }
        if self.edns.is_some() {
            // An OPT record with empty RDATA: root owner, type, class,
            // TTL, and RDLENGTH.
            size += 11;
        }
        for section in [&self.answer, &self.authority, &self.additional] {
            size += section.iter().map(Rrset::wire_size).sum::<usize>();
        }
        size
    }

    /// Returns the total number of records across the answer,
    /// authority, and additional sections (the OPT record excluded).
    pub fn record_count(&self) -> usize {
        [&self.answer, &self.authority, &self.additional]
            .into_iter()
            .flatten()
            .map(Rrset::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::rr::{Rdata, Ttl};

    fn empty_response() -> Response {
        Response {
            id: 0x1234,
            opcode: Opcode::QUERY,
            authoritative: true,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            authentic_data: true,
            checking_disabled: false,
            rcode: Rcode::NOERROR,
            question: None,
            edns: None,
            answer: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    #[test]
    fn wire_size_covers_all_parts() {
        let mut response = empty_response();
        assert_eq!(response.wire_size(), 12);

        response.question = Some(Question {
            qname: "host.example.test.".parse().unwrap(),
            qtype: Type::A,
            qclass: Class::IN,
        });
        assert_eq!(response.wire_size(), 12 + 19 + 4);

        response.edns = Some(Edns {
            udp_payload_size: 1232,
            dnssec_ok: true,
        });
        assert_eq!(response.wire_size(), 12 + 19 + 4 + 11);

        response.answer.push(Rrset::from_rdata(
            "host.example.test.".parse().unwrap(),
            Class::IN,
            Ttl::from(3600),
            Rdata::A(Ipv4Addr::new(192, 0, 2, 1)),
        ));
        assert_eq!(response.wire_size(), 12 + 19 + 4 + 11 + 33);
        assert_eq!(response.record_count(), 1);
    }
}
