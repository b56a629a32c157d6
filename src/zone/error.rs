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

//! Error types for zone construction and validation.

use std::fmt;

use crate::name::Name;

/// An error adding an RRset to a zone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The RRset's owner is not at or below the zone's apex.
    NotInZone(Name),

    /// The RRset's class does not match the zone's class.
    ClassMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotInZone(owner) => write!(f, "{} is not within the zone", owner),
            Self::ClassMismatch => f.write_str("the record's class does not match the zone's"),
        }
    }
}

impl std::error::Error for Error {}

/// A problem with a zone's contents detected by [`Zone::validate`].
///
/// [`Zone::validate`]: super::Zone::validate
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationIssue {
    /// The apex has no SOA record.
    MissingApexSoa,

    /// The apex has no NS records.
    MissingApexNs,

    /// The apex SOA RRset contains more than one record.
    MultipleSoaRecords,

    /// A node owns more than one CNAME record.
    MultipleCnameRecords(Name),

    /// A node owns a CNAME record alongside records of other types.
    CnameWithOtherData(Name),

    /// A node owns more than one DNAME record.
    MultipleDnameRecords(Name),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingApexSoa => f.write_str("the apex has no SOA record"),
            Self::MissingApexNs => f.write_str("the apex has no NS records"),
            Self::MultipleSoaRecords => f.write_str("the apex has more than one SOA record"),
            Self::MultipleCnameRecords(owner) => {
                write!(f, "{} has more than one CNAME record", owner)
            }
            Self::CnameWithOtherData(owner) => {
                write!(f, "{} has a CNAME record alongside other data", owner)
            }
            Self::MultipleDnameRecords(owner) => {
                write!(f, "{} has more than one DNAME record", owner)
            }
        }
    }
}
