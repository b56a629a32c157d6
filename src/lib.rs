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

//! The quill authoritative DNS resolution core.
//!
//! This crate implements the name-resolution heart of an authoritative,
//! DNSSEC-signing DNS server: an in-memory [zone tree](zone), a
//! [query resolver](resolver) with CNAME/DNAME chasing and referral
//! synthesis, on-demand [NSEC proof synthesis](zone::Zone::nsec_rrset),
//! and an [online signing engine](sign) with KSK/ZSK role separation
//! and rollover support.
//!
//! It deliberately stops at the message boundary: queries arrive
//! already parsed and responses leave as structured [`message`] types.
//! Sockets, the wire codec, zone-file parsing, and configuration
//! loading are the embedding server's concern.

#![warn(missing_debug_implementations)]

pub mod class;
pub mod message;
pub mod name;
pub mod resolver;
pub mod rr;
pub mod sign;
pub mod zone;
