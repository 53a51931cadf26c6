//! Second-quantized operator index strings.

use serde::{Deserialize, Serialize};

use crate::frm_onv::FrmOnv;

/// An ascending, duplicate-free string of spin-orbital indices representing
/// one side (creation or annihilation) of a fermionic operator product.
///
/// The string is only modifiable via [`FrmOps::clear`] and [`FrmOps::add`];
/// it is intended to be allocated once and reused as scratch across
/// connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrmOps {
    nspinorb: usize,
    inds: Vec<usize>,
}

impl FrmOps {
    /// Creates an empty string with capacity for a full basis.
    pub fn new(nspinorb: usize) -> Self {
        Self {
            nspinorb,
            inds: Vec::with_capacity(nspinorb),
        }
    }

    /// Removes all indices.
    pub fn clear(&mut self) {
        self.inds.clear();
    }

    /// Appends a spin-orbital index, which must exceed the current last.
    pub fn add(&mut self, ispinorb: usize) {
        debug_assert!(
            self.inds.last().map_or(true, |&last| ispinorb > last),
            "spin-orbital indices must be added in ascending order"
        );
        debug_assert!(ispinorb < self.nspinorb, "spin-orbital index OOB");
        self.inds.push(ispinorb);
    }

    /// Clears and fills the string from a slice of ascending indices.
    pub fn set_from(&mut self, inds: &[usize]) {
        self.clear();
        for &i in inds {
            self.add(i);
        }
    }

    /// Number of operators in the string.
    pub fn len(&self) -> usize {
        self.inds.len()
    }

    /// True when the string holds no operators.
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    /// Returns the `iop`-th index.
    pub fn get(&self, iop: usize) -> usize {
        self.inds[iop]
    }

    /// Slice view of the stored indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.inds
    }

    /// True when indices are strictly ascending (hence distinct).
    pub fn is_valid(&self) -> bool {
        self.inds.windows(2).all(|w| w[0] < w[1])
    }

    /// True if every index is occupied in the given vector.
    pub fn all_occ(&self, onv: &FrmOnv) -> bool {
        self.inds.iter().all(|&i| onv.get(i))
    }

    /// True if every index is vacant in the given vector.
    pub fn all_vac(&self, onv: &FrmOnv) -> bool {
        self.inds.iter().all(|&i| !onv.get(i))
    }
}

/// One mode of a bosonic operator product together with its multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BosOpPair {
    /// Mode index.
    pub imode: usize,
    /// Number of operators on the mode.
    pub nop: u32,
}

/// A multiset of boson-mode operators, stored as (mode, multiplicity) pairs
/// in ascending mode order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BosOps {
    nmode: usize,
    pairs: Vec<BosOpPair>,
    nop: u32,
}

impl BosOps {
    /// Creates an empty product over a basis of `nmode` modes.
    pub fn new(nmode: usize) -> Self {
        Self {
            nmode,
            pairs: Vec::with_capacity(nmode),
            nop: 0,
        }
    }

    /// Removes all operators.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.nop = 0;
    }

    /// Appends `nop` operators on a mode, which must exceed the current last.
    pub fn add(&mut self, imode: usize, nop: u32) {
        debug_assert!(nop > 0, "mode with no operators must not appear");
        debug_assert!(imode < self.nmode, "boson mode index OOB");
        debug_assert!(
            self.pairs.last().map_or(true, |pair| imode > pair.imode),
            "boson mode indices must be added in ascending order"
        );
        self.pairs.push(BosOpPair { imode, nop });
        self.nop += nop;
    }

    /// Clears and fills the product from an ascending mode list, rolling
    /// adjacent repeats into multiplicities.
    pub fn set_from_modes(&mut self, imodes: &[usize]) {
        self.clear();
        let mut iter = imodes.iter().copied();
        let Some(first) = iter.next() else { return };
        let mut mode = first;
        let mut count = 1u32;
        for imode in iter {
            if imode == mode {
                count += 1;
            } else {
                self.add(mode, count);
                mode = imode;
                count = 1;
            }
        }
        self.add(mode, count);
    }

    /// The stored (mode, multiplicity) pairs.
    pub fn pairs(&self) -> &[BosOpPair] {
        &self.pairs
    }

    /// Total number of operators across all modes.
    pub fn nop(&self) -> u32 {
        self.nop
    }

    /// True when the product holds no operators.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Mode index of the `iop`-th operator of the expanded product.
    pub fn imode_of_op(&self, mut iop: u32) -> Option<usize> {
        for pair in &self.pairs {
            if iop < pair.nop {
                return Some(pair.imode);
            }
            iop -= pair.nop;
        }
        None
    }

    /// Expands the product into one mode index per operator.
    pub fn expanded(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nop as usize);
        for pair in &self.pairs {
            out.extend(std::iter::repeat(pair.imode).take(pair.nop as usize));
        }
        out
    }
}
