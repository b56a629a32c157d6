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

//! Implementation of the [`Node`] type.

use std::collections::BTreeMap;

use crate::rr::{Rrset, Type};

/// A node of the zone tree: the RRsets sharing one owner name.
///
/// A node with no RRsets is an empty non-terminal, created implicitly
/// when a record is added below it.
#[derive(Clone, Debug, Default)]
pub struct Node {
    rrsets: BTreeMap<Type, Rrset>,
}

impl Node {
    /// Returns the node's RRset of type `rr_type`, if present.
    pub fn rrset(&self, rr_type: Type) -> Option<&Rrset> {
        self.rrsets.get(&rr_type)
    }

    /// Returns an iterator over the node's RRsets, in ascending type
    /// order.
    pub fn rrsets(&self) -> impl Iterator<Item = &Rrset> + '_ {
        self.rrsets.values()
    }

    /// Returns an iterator over the RR types present at the node.
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.rrsets.keys().copied()
    }

    /// Returns whether the node is an empty non-terminal.
    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty()
    }

    pub(super) fn insert(&mut self, rrset: Rrset) -> Option<Rrset> {
        self.rrsets.insert(rrset.rr_type, rrset)
    }

    pub(super) fn rrset_mut(&mut self, rr_type: Type) -> Option<&mut Rrset> {
        self.rrsets.get_mut(&rr_type)
    }
}
