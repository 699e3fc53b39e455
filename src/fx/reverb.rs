use crate::{dsp::reverb::StereoReverb, io::AudioBlock};

/// Dry/wet balance of the reverb effect.
const DRY: f32 = 0.2;
const WET: f32 = 0.8;

/// Stereo room reverb mixed 20% dry / 80% wet on channels 0 and 1.
///
/// Room size and damping are pushed into the tanks at the start of every
/// block, so parameter changes land on block boundaries.
#[derive(Debug, Clone)]
pub struct Reverb {
    room_size: f32,
    damping: f32,
    tank: StereoReverb,
}

impl Reverb {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            room_size: 0.6,
            damping: 0.7,
            tank: StereoReverb::new(sample_rate),
        }
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        self.room_size = room_size;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.tank.configure(sample_rate);
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        self.tank.set_room_size(self.room_size);
        self.tank.set_damping(self.damping);

        for frame in block.frames_mut() {
            let (wet_l, wet_r) = self.tank.process(frame[0], frame[1]);
            frame[0] = frame[0] * DRY + wet_l * WET;
            frame[1] = frame[1] * DRY + wet_r * WET;
        }
    }
}
