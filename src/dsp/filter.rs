use std::f32::consts::PI;

/*
| type      | constructed by | passes       | rejects      |
| --------- | -------------- | ------------ | ------------ |
| low-pass  | LPF            | below cutoff | above cutoff |
| high-pass | HPF            | above cutoff | below cutoff |

Both responses come out of the same topology-preserving state-variable
filter. Resonance is given as Q: Q = 1/√2 is the flat Butterworth shape,
larger values peak at the cutoff. Internally the damping term is k = 1/Q.

Coefficients depend on cutoff, Q and sample rate, and are only refreshed by
`update_coefficients`. Effects call it once at the top of every block.
*/

/// Q of a flat (Butterworth) second-order response.
pub const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

const MIN_CUTOFF_HZ: f32 = 10.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;
const MIN_Q: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 1.0 / q.max(MIN_Q),
            cutoff_hz,
            q,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, BUTTERWORTH_Q)
    }

    /// Recompute `g` and `k` from the current cutoff, Q and sample rate.
    pub fn update_coefficients(&mut self, sample_rate: f32) {
        let cutoff = self
            .cutoff_hz
            .clamp(MIN_CUTOFF_HZ, sample_rate * MAX_CUTOFF_RATIO);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = 1.0 / self.q.max(MIN_Q);
    }

    #[inline]
    fn next_outputs(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.next_outputs(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.update_coefficients(sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }
}
