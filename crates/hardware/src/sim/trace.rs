//! Branch traces and synthetic workloads.
//!
//! A trace is a finite sequence of resolved branches. The [`Workload`]
//! generators reproduce the branch streams of a branch-stress benchmark, one
//! pattern per kernel, each at its own code address so that kernels do not
//! alias in small tables unless the table really is too small.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bru::UpdateRequest;
use crate::common::Addr;

/// Default number of times each kernel is invoked.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Seed of the 16-bit LFSR driving [`Workload::Random`].
pub const LFSR_SEED: u16 = 0xACE1;

/// One resolved branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Address of the branch instruction.
    pub pc: Addr,
    /// Encoded or computed target; meaningful for not-taken branches too.
    pub target: Addr,
    /// Resolved direction.
    pub taken: bool,
}

impl BranchRecord {
    /// Builds a record from raw addresses.
    pub const fn new(pc: u32, target: u32, taken: bool) -> Self {
        Self {
            pc: Addr(pc),
            target: Addr(target),
            taken,
        }
    }

    /// The update the front-end sends once this branch resolves.
    pub const fn as_update(&self) -> UpdateRequest {
        UpdateRequest {
            address: self.pc,
            target: self.target,
            taken: self.taken,
        }
    }
}

/// Synthetic branch-pattern kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workload {
    /// Branches whose outcome is a function of earlier branches.
    Correlated,
    /// LFSR-driven, unpredictable branches.
    Random,
    /// Nested loops with varying trip counts and an early exit.
    NestedLoops,
    /// An indirect call site cycling through four targets.
    Indirect,
    /// T, N, T, N, ...
    Alternating,
    /// Taken seven times out of eight.
    Bimodal,
    /// Outcome is the XOR of bits 0, 2 and 5 of its own history.
    LongHistory,
    /// An eight-way jump table.
    Switch,
}

/// Code region of each kernel; kernels sit 4 KiB apart.
const fn region(workload: Workload) -> u32 {
    0x0001_0000 + 0x1000 * workload as u32
}

impl Workload {
    /// Every kernel, in benchmark order.
    pub const ALL: [Self; 8] = [
        Self::Correlated,
        Self::Random,
        Self::NestedLoops,
        Self::Indirect,
        Self::Alternating,
        Self::Bimodal,
        Self::LongHistory,
        Self::Switch,
    ];

    /// Kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Correlated => "correlated",
            Self::Random => "random",
            Self::NestedLoops => "nested-loops",
            Self::Indirect => "indirect",
            Self::Alternating => "alternating",
            Self::Bimodal => "bimodal",
            Self::LongHistory => "long-history",
            Self::Switch => "switch",
        }
    }

    /// Produces the branch stream of `iterations` invocations of the kernel.
    ///
    /// Deterministic: the same arguments always give the same trace.
    pub fn generate(self, iterations: usize) -> Vec<BranchRecord> {
        let base = region(self);
        let mut out = Vec::new();
        let mut lfsr = Lfsr::new(LFSR_SEED);
        for _ in 0..iterations {
            match self {
                Self::Correlated => correlated(&mut out, base, 64),
                Self::Random => random(&mut out, base, 64, &mut lfsr),
                Self::NestedLoops => nested_loops(&mut out, base, 16, 8),
                Self::Indirect => indirect(&mut out, base, 32),
                Self::Alternating => alternating(&mut out, base, 128),
                Self::Bimodal => bimodal(&mut out, base, 128),
                Self::LongHistory => long_history(&mut out, base, 128),
                Self::Switch => switch(&mut out, base, 64),
            }
        }
        out
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown workload '{s}'"))
    }
}

/// 16-bit Fibonacci LFSR, taps 0, 2, 3, 5.
#[derive(Clone, Copy, Debug)]
struct Lfsr(u16);

impl Lfsr {
    const fn new(seed: u16) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u16 {
        let s = self.0;
        let bit = (s ^ (s >> 2) ^ (s >> 3) ^ (s >> 5)) & 1;
        self.0 = (s >> 1) | (bit << 15);
        self.0
    }
}

/// Backward loop branch at the bottom of iteration `i` of `n`.
fn back_edge(out: &mut Vec<BranchRecord>, pc: u32, top: u32, i: usize, n: usize) {
    out.push(BranchRecord::new(pc, top, i + 1 < n));
}

fn correlated(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    for i in 0..n {
        let a = i & 1 != 0;
        let b = i & 2 != 0;
        let c = i & 4 != 0;
        out.push(BranchRecord::new(base + 0x10, base + 0x20, (a ^ b) && c));
        out.push(BranchRecord::new(base + 0x24, base + 0x30, a && !b));
        back_edge(out, base + 0x3C, base + 0x04, i, n);
    }
}

fn random(out: &mut Vec<BranchRecord>, base: u32, n: usize, lfsr: &mut Lfsr) {
    for i in 0..n {
        let r = lfsr.next();
        out.push(BranchRecord::new(base + 0x10, base + 0x20, r & 1 != 0));
        out.push(BranchRecord::new(base + 0x24, base + 0x30, r & 8 != 0));
        back_edge(out, base + 0x3C, base + 0x04, i, n);
    }
}

fn nested_loops(out: &mut Vec<BranchRecord>, base: u32, outer: usize, inner_base: usize) {
    for i in 0..outer {
        let limit = inner_base + (i & 3);
        for j in 0..limit {
            let exit = j == inner_base && i & 1 != 0;
            out.push(BranchRecord::new(base + 0x20, base + 0x40, exit));
            if exit {
                break;
            }
            back_edge(out, base + 0x30, base + 0x14, j, limit);
        }
        back_edge(out, base + 0x48, base + 0x04, i, outer);
    }
}

fn indirect(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    const FUNCS: [u32; 4] = [0x800, 0x880, 0x900, 0x980];
    for i in 0..n {
        out.push(BranchRecord::new(base + 0x10, base + FUNCS[i & 3], true));
        back_edge(out, base + 0x1C, base + 0x04, i, n);
    }
}

fn alternating(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    for i in 0..n {
        out.push(BranchRecord::new(base + 0x10, base + 0x20, i & 1 != 0));
        back_edge(out, base + 0x2C, base + 0x04, i, n);
    }
}

fn bimodal(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    for i in 0..n {
        out.push(BranchRecord::new(base + 0x10, base + 0x20, i & 7 != 7));
        back_edge(out, base + 0x2C, base + 0x04, i, n);
    }
}

fn long_history(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    // A zero seed would make every outcome zero.
    let mut history: u32 = 1;
    for i in 0..n {
        let taken = ((history ^ (history >> 2) ^ (history >> 5)) & 1) != 0;
        out.push(BranchRecord::new(base + 0x10, base + 0x20, taken));
        history = ((history << 1) | u32::from(taken)) & 0xFF;
        back_edge(out, base + 0x2C, base + 0x04, i, n);
    }
}

fn switch(out: &mut Vec<BranchRecord>, base: u32, n: usize) {
    for i in 0..n {
        let case = (i & 7) as u32;
        out.push(BranchRecord::new(base + 0x10, base + 0x100 + case * 0x10, true));
        back_edge(out, base + 0x1C, base + 0x04, i, n);
    }
}
