//! Collections of patches sharing one global equation numbering.
//!
//! [`MultiPatch::enumerate`] walks patches in ascending id order and their
//! local functions in local order. Functions glued across an interface form
//! one equivalence class and receive a single equation id; each id maps back
//! to the first (patch id, local id) that carries it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bridge_error::BridgeError;
use crate::patch::boundary::BoundarySide;
use crate::patch::fe_space::FESpace;
use crate::patch::patch::Patch;

/// Shared, non-exclusive handle to a multipatch.
pub type SharedMultiPatch = Arc<RwLock<MultiPatch>>;

/// A conforming interface between two patch sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Interface {
    pub first: (usize, BoundarySide),
    pub second: (usize, BoundarySide),
}

/// Union-find over flat function slots.
#[derive(Debug, Default)]
struct FunctionEquivalence {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl FunctionEquivalence {
    fn with_len(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find_root(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find_root(a);
        let rb = self.find_root(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Patches keyed by id, plus the global numbering built over them.
#[derive(Clone, Debug, Default)]
pub struct MultiPatch {
    patches: BTreeMap<usize, Patch>,
    interfaces: Vec<Interface>,
    equation_map: Vec<(usize, usize)>,
    enumerated: bool,
}

impl MultiPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shared handle.
    pub fn into_shared(self) -> SharedMultiPatch {
        Arc::new(RwLock::new(self))
    }

    /// Add a patch. Invalidates any previous enumeration.
    pub fn add_patch(&mut self, patch: Patch) -> Result<(), BridgeError> {
        let id = patch.id();
        if self.patches.contains_key(&id) {
            return Err(BridgeError::DuplicatePatch(id));
        }
        self.patches.insert(id, patch);
        self.enumerated = false;
        Ok(())
    }

    pub fn patch(&self, id: usize) -> Result<&Patch, BridgeError> {
        self.patches.get(&id).ok_or(BridgeError::MissingPatch(id))
    }

    pub fn patch_mut(&mut self, id: usize) -> Result<&mut Patch, BridgeError> {
        self.patches.get_mut(&id).ok_or(BridgeError::MissingPatch(id))
    }

    /// Patches in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Patch> {
        self.patches.values_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Declare a conforming interface between two patch sides.
    ///
    /// Both boundary patches must have the same dimension, matching knot
    /// vectors and the same function count per direction. Boundary functions
    /// are paired in their local order, so the sides must share orientation.
    pub fn glue(
        &mut self,
        first: usize,
        first_side: BoundarySide,
        second: usize,
        second_side: BoundarySide,
    ) -> Result<(), BridgeError> {
        if (first, first_side) == (second, second_side) {
            return Err(BridgeError::InterfaceMismatch(format!(
                "side {first_side} of patch {first} cannot be glued to itself"
            )));
        }
        let a = self.patch(first)?.construct_boundary_patch(first_side)?;
        let b = self.patch(second)?.construct_boundary_patch(second_side)?;
        let (sa, sb) = (a.fe_space(), b.fe_space());
        if sa.dimension() != sb.dimension() {
            return Err(BridgeError::InterfaceMismatch(format!(
                "boundary dimensions differ ({} vs {})",
                sa.dimension(),
                sb.dimension()
            )));
        }
        for d in 0..sa.dimension() {
            if sa.order(d) != sb.order(d) || sa.number(d) != sb.number(d) {
                return Err(BridgeError::InterfaceMismatch(format!(
                    "direction {d}: order {} / {} functions vs order {} / {} functions",
                    sa.order(d),
                    sa.number(d),
                    sb.order(d),
                    sb.number(d)
                )));
            }
            if let (Some(ka), Some(kb)) = (sa.knot_vector(d), sb.knot_vector(d)) {
                ka.ensure_matches(kb)?;
            }
        }
        self.interfaces.push(Interface {
            first: (first, first_side),
            second: (second, second_side),
        });
        self.enumerated = false;
        Ok(())
    }

    /// Assign global equation ids to every function of every patch.
    ///
    /// Returns the equation system size.
    pub fn enumerate(&mut self) -> Result<usize, BridgeError> {
        let mut offsets = BTreeMap::new();
        let mut total = 0usize;
        for (&id, patch) in &self.patches {
            offsets.insert(id, total);
            total += patch.total_number();
        }

        let mut eq = FunctionEquivalence::with_len(total);
        for iface in &self.interfaces {
            let slots = |(pid, side): (usize, BoundarySide)| -> Result<Vec<usize>, BridgeError> {
                let patch = self.patch(pid)?;
                let base = offsets[&pid];
                Ok(patch
                    .fe_space()
                    .boundary_local_indices(side)?
                    .into_iter()
                    .map(|l| base + l)
                    .collect())
            };
            let (a, b) = (slots(iface.first)?, slots(iface.second)?);
            if a.len() != b.len() {
                return Err(BridgeError::InterfaceMismatch(format!(
                    "{} functions on patch {} vs {} on patch {}",
                    a.len(),
                    iface.first.0,
                    b.len(),
                    iface.second.0
                )));
            }
            for (x, y) in a.into_iter().zip(b) {
                eq.union(x, y);
            }
        }

        let mut root_ids: Vec<Option<usize>> = vec![None; total];
        let mut slot_ids = Vec::with_capacity(total);
        let mut equation_map = Vec::new();
        for (&pid, patch) in &self.patches {
            for local in 0..patch.total_number() {
                let root = eq.find_root(offsets[&pid] + local);
                let id = *root_ids[root].get_or_insert_with(|| {
                    equation_map.push((pid, local));
                    equation_map.len() - 1
                });
                slot_ids.push(id);
            }
        }

        let mut rest = slot_ids.as_slice();
        for patch in self.patches.values_mut() {
            let (ids, tail) = rest.split_at(patch.total_number());
            patch.fe_space_mut().reset_function_indices(ids.to_vec())?;
            rest = tail;
        }

        log::debug!(
            "enumerated {} patches: {} functions, {} equations",
            self.patches.len(),
            total,
            equation_map.len()
        );
        self.equation_map = equation_map;
        self.enumerated = true;
        Ok(self.equation_map.len())
    }

    #[inline]
    pub fn is_enumerated(&self) -> bool {
        self.enumerated
    }

    /// Number of global equation ids; 0 until enumerated.
    pub fn equation_system_size(&self) -> usize {
        if self.enumerated {
            self.equation_map.len()
        } else {
            0
        }
    }

    /// `(patch id, local id)` owning equation `eq`.
    pub fn equation_id_location(&self, eq: usize) -> Result<(usize, usize), BridgeError> {
        if !self.enumerated {
            return Err(BridgeError::NotEnumerated);
        }
        self.equation_map
            .get(eq)
            .copied()
            .ok_or(BridgeError::EquationIdOutOfRange {
                id: eq,
                size: self.equation_map.len(),
            })
    }
}

impl fmt::Display for MultiPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MultiPatch: {} patches, {} interfaces, {} equations",
            self.patches.len(),
            self.interfaces.len(),
            self.equation_system_size()
        )?;
        for p in self.patches.values() {
            writeln!(f, "  {p}")?;
        }
        Ok(())
    }
}
