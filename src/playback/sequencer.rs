use crate::chord::pitch_mapper::{chord_to_midi_notes, REFERENCE_OCTAVE};
use crate::playback::clock::TickScheduler;
use std::time::{Duration, Instant};

/// Pool of synthesis voices; an external facility behind this seam.
pub trait VoicePool {
    /// Start sounding the given pitches.
    fn trigger(&mut self, pitches: &[u8]);
    /// Release every sounding voice.
    fn release_all(&mut self);
}

struct SequenceStep {
    chord: String,
    pitches: Vec<u8>,
}

/// Plays a flat chord list as a metronome-quantized sequence.
///
/// Runs on its own look-ahead clock, decoupled from the media position:
/// practice-mode chord preview and video playback are separate timelines.
/// Each step releases all sounding voices before triggering the next
/// chord, and the sequence cycles until stopped.
pub struct PreviewSequencer {
    voices: Box<dyn VoicePool>,
    steps: Vec<SequenceStep>,
    tempo_bpm: u32,
    beats_per_chord: u32,
    octave: i32,
    clock: TickScheduler,
    position: Option<usize>, // last triggered step
    running: bool,
}

impl PreviewSequencer {
    pub fn new(voices: Box<dyn VoicePool>, tempo_bpm: u32) -> Self {
        let tempo_bpm = tempo_bpm.max(1);
        let beats_per_chord = 4;
        Self {
            voices,
            steps: Vec::new(),
            tempo_bpm,
            beats_per_chord,
            octave: REFERENCE_OCTAVE,
            clock: TickScheduler::new(step_duration(tempo_bpm, beats_per_chord)),
            position: None,
            running: false,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the chord currently sounding.
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Replace the scheduled chord list.
    ///
    /// The previous schedule is disposed first: sounding voices released,
    /// position and clock reset. Chords map to pitch sets once, here.
    pub fn set_chords<'a, I>(&mut self, chords: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.dispose_schedule();
        self.steps = chords
            .into_iter()
            .map(|chord| {
                let pitch_set = chord_to_midi_notes(chord, self.octave);
                if pitch_set.fallback {
                    log::debug!("previewing unknown chord {chord:?} as a major triad");
                }
                SequenceStep {
                    chord: chord.to_string(),
                    pitches: pitch_set.midi,
                }
            })
            .collect();
        log::info!("preview schedule rebuilt with {} chords", self.steps.len());
    }

    /// Changing the tempo rebuilds the schedule clock.
    pub fn set_tempo(&mut self, tempo_bpm: u32) {
        self.tempo_bpm = tempo_bpm.max(1);
        self.rebuild_clock();
    }

    /// Changing the subdivision disposes the running schedule.
    pub fn set_beats_per_chord(&mut self, beats_per_chord: u32) {
        self.beats_per_chord = beats_per_chord.max(1);
        let chords: Vec<String> = self.steps.iter().map(|s| s.chord.clone()).collect();
        self.rebuild_clock();
        self.set_chords(chords.iter().map(String::as_str));
    }

    /// Octave used when mapping chords to pitches.
    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave;
        let chords: Vec<String> = self.steps.iter().map(|s| s.chord.clone()).collect();
        self.set_chords(chords.iter().map(String::as_str));
    }

    /// Start the sequence at `now`; the first chord sounds immediately.
    pub fn start(&mut self, now: Instant) {
        if self.steps.is_empty() {
            log::debug!("preview start ignored, empty schedule");
            return;
        }
        self.running = true;
        self.clock.reset();
        self.clock.due_ticks(now); // arm
        self.trigger_step(0);
    }

    /// Advance the look-ahead clock; triggers at most one step, jumping
    /// over any steps a stall made stale.
    pub fn advance(&mut self, now: Instant) {
        if !self.running || self.steps.is_empty() {
            return;
        }
        let due = self.clock.due_ticks(now);
        if due == 0 {
            return;
        }
        if due > 1 {
            log::debug!("preview clock stalled, skipping {} steps", due - 1);
        }
        let target = self
            .position
            .map_or(0, |position| (position + due as usize) % self.steps.len());
        self.trigger_step(target);
    }

    /// Stop and release everything still sounding.
    pub fn stop(&mut self) {
        self.running = false;
        self.position = None;
        self.clock.reset();
        self.voices.release_all();
    }

    fn trigger_step(&mut self, index: usize) {
        // no note-stacking across chord changes
        self.voices.release_all();
        let step = &self.steps[index];
        log::debug!("preview trigger {:?} -> {:?}", step.chord, step.pitches);
        self.voices.trigger(&step.pitches);
        self.position = Some(index);
    }

    fn dispose_schedule(&mut self) {
        self.voices.release_all();
        self.steps.clear();
        self.position = None;
        self.clock.reset();
    }

    fn rebuild_clock(&mut self) {
        self.clock = TickScheduler::new(step_duration(self.tempo_bpm, self.beats_per_chord));
    }
}

impl Drop for PreviewSequencer {
    fn drop(&mut self) {
        // scheduled voices must not outlive the sequence
        self.voices.release_all();
    }
}

fn step_duration(tempo_bpm: u32, beats_per_chord: u32) -> Duration {
    Duration::from_secs_f64(60.0 / f64::from(tempo_bpm) * f64::from(beats_per_chord))
}
