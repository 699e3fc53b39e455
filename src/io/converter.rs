use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// The voice sounds one octave below the played key.
const KEY_TRANSPOSE: i16 = -12;

/// Map a decoded MIDI event to a voice message.
///
/// The voice is monophonic with last-note priority: every note-on retriggers
/// at the new pitch and any note-off releases, whichever key it was for. A
/// note-on with velocity 0 is treated as a note-off.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => {
            if velocity == 0 {
                Some(SynthMessage::NoteOff)
            } else {
                Some(SynthMessage::NoteOn {
                    frequency: midi_note_to_freq(key),
                })
            }
        }
        MidiEvent::NoteOff { channel, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff)
        }
        _ => None,
    }
}

/// Frequency of `note` after the fixed octave-down transpose.
pub fn midi_note_to_freq(note: u8) -> f32 {
    let note = note as i16 + KEY_TRANSPOSE;
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
