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

//! Types for working with DNS resource records.

mod rdata;
mod rr_type;
mod rrset;
mod ttl;

pub use rdata::{Dnskey, Ds, Nsec, Rdata, Rrsig, Soa, TypeBitmap};
pub use rr_type::Type;
pub use rrset::Rrset;
pub use ttl::Ttl;
