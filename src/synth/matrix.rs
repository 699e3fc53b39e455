//! Modulation Matrix
//!
//! A fixed graph of "modulator → carrier" frequency-modulation edges over
//! the engine's four oscillators. The matrix stores only the graph; the
//! oscillators themselves are owned by the engine and handed in by index
//! on every tick.
//!
//! # Per-sample FM
//!
//! ```text
//!        osc 1 ──(depth 300)──┐
//!                             ▼
//!        osc 2 ──(depth 80)─→ osc 0 ──→ Σ level · out ──→ output
//!                             ▲
//!        osc 3 ───────────────┘ (no edge, only summed)
//! ```
//!
//! Each tick visits oscillators in topological order. A modulator's sample
//! is generated first and then added to each carrier's frequency,
//! `output · depth` Hz, so the carrier sees it later in the same tick.
//! All frequencies are restored once the tick is done.
//!
//! Ties between oscillators with no pending modulators are broken by
//! ascending index, which keeps renders reproducible.
//!
//! # Acyclicity
//!
//! Every edge insertion is checked with a three-colour depth-first search.
//! An insertion that would close a loop is rolled back, so the graph is a
//! DAG at all times and the per-tick sort always covers every node.

use crate::{dsp::Oscillator, error::SynthError, OSCILLATOR_COUNT};

const N: usize = OSCILLATOR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModulationMatrix {
    connected: [[bool; N]; N],
    depth: [[f32; N]; N],
    level: f32,
}

impl Default for ModulationMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulationMatrix {
    pub fn new() -> Self {
        Self {
            connected: [[false; N]; N],
            depth: [[0.0; N]; N],
            level: 1.0,
        }
    }

    /// Build a matrix for `oscillators`, which must hold exactly four.
    pub fn for_oscillators(oscillators: &[Oscillator]) -> Result<Self, SynthError> {
        if oscillators.len() != N {
            return Err(SynthError::OscillatorCount {
                expected: N,
                found: oscillators.len(),
            });
        }
        Ok(Self::new())
    }

    fn check_index(index: usize) -> Result<(), SynthError> {
        if index >= N {
            return Err(SynthError::OscillatorOutOfRange { index });
        }
        Ok(())
    }

    /// Add or update the edge `modulator → carrier`.
    ///
    /// Returns `Ok(false)` and leaves the matrix untouched when the edge
    /// would close a cycle.
    pub fn set_modulation(
        &mut self,
        modulator: usize,
        carrier: usize,
        depth: f32,
    ) -> Result<bool, SynthError> {
        Self::check_index(modulator)?;
        Self::check_index(carrier)?;
        if modulator == carrier {
            return Err(SynthError::SelfModulation { index: modulator });
        }

        let was_connected = self.connected[modulator][carrier];
        let old_depth = self.depth[modulator][carrier];

        self.connected[modulator][carrier] = true;
        self.depth[modulator][carrier] = depth;

        if self.is_cyclic() {
            self.connected[modulator][carrier] = was_connected;
            self.depth[modulator][carrier] = old_depth;
            return Ok(false);
        }
        Ok(true)
    }

    /// Clear the edge `modulator → carrier` and its depth. Out-of-range
    /// indices are ignored.
    pub fn remove_modulation(&mut self, modulator: usize, carrier: usize) {
        if modulator < N && carrier < N {
            self.connected[modulator][carrier] = false;
            self.depth[modulator][carrier] = 0.0;
        }
    }

    pub fn is_connected(&self, modulator: usize, carrier: usize) -> bool {
        modulator < N && carrier < N && self.connected[modulator][carrier]
    }

    pub fn depth(&self, modulator: usize, carrier: usize) -> f32 {
        if modulator < N && carrier < N {
            self.depth[modulator][carrier]
        } else {
            0.0
        }
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Number of active edges.
    pub fn edge_count(&self) -> usize {
        self.connected.iter().flatten().filter(|&&c| c).count()
    }

    /// Whether the edge set contains a directed cycle.
    pub fn is_cyclic(&self) -> bool {
        let mut marks = [Mark::Unvisited; N];
        (0..N).any(|start| marks[start] == Mark::Unvisited && self.visit(start, &mut marks))
    }

    fn visit(&self, node: usize, marks: &mut [Mark; N]) -> bool {
        marks[node] = Mark::InProgress;
        for next in 0..N {
            if !self.connected[node][next] {
                continue;
            }
            match marks[next] {
                Mark::InProgress => return true,
                Mark::Unvisited => {
                    if self.visit(next, marks) {
                        return true;
                    }
                }
                Mark::Done => {}
            }
        }
        marks[node] = Mark::Done;
        false
    }

    /// Kahn's algorithm with index-ascending tie-breaking.
    pub fn topological_order(&self) -> Result<[usize; N], SynthError> {
        let mut in_degree = [0usize; N];
        for row in &self.connected {
            for (carrier, &edge) in row.iter().enumerate() {
                in_degree[carrier] += usize::from(edge);
            }
        }

        // Every node enters the queue at most once, so a flat array with a
        // head and tail cursor is enough.
        let mut queue = [0usize; N];
        let (mut head, mut tail) = (0, 0);
        for (node, &degree) in in_degree.iter().enumerate() {
            if degree == 0 {
                queue[tail] = node;
                tail += 1;
            }
        }

        while head < tail {
            let node = queue[head];
            head += 1;
            for carrier in 0..N {
                if self.connected[node][carrier] {
                    in_degree[carrier] -= 1;
                    if in_degree[carrier] == 0 {
                        queue[tail] = carrier;
                        tail += 1;
                    }
                }
            }
        }

        if tail != N {
            return Err(SynthError::CyclicGraph);
        }
        Ok(queue)
    }

    /// Render one sample of the whole oscillator bank.
    ///
    /// # Panics
    ///
    /// If the graph is cyclic, which `set_modulation` never allows.
    #[inline]
    pub fn process(&self, oscillators: &mut [Oscillator; N]) -> f32 {
        let order = match self.topological_order() {
            Ok(order) => order,
            Err(err) => panic!("modulation matrix invariant broken: {err}"),
        };

        let base: [f32; N] = std::array::from_fn(|i| oscillators[i].frequency());
        let mut outputs = [0.0f32; N];

        for &node in &order {
            let sample = oscillators[node].next_sample();
            outputs[node] = sample;

            for carrier in 0..N {
                if self.connected[node][carrier] {
                    let shifted =
                        oscillators[carrier].frequency() + sample * self.depth[node][carrier];
                    oscillators[carrier].set_frequency(shifted);
                }
            }
        }

        let mut mix = 0.0;
        for (osc, (&out, &freq)) in oscillators.iter_mut().zip(outputs.iter().zip(&base)) {
            mix += out * osc.level();
            osc.set_frequency(freq);
        }
        mix * self.level
    }
}
