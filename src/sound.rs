//! Short synthesized interface sounds.
//!
//! Each [`Cue`] is a fixed list of oscillator tones; [`WebAudio`] schedules
//! them on one shared `AudioContext`.

use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioScheduledSourceNode, OscillatorType};

use crate::util::cwarn;

/// Gain that tones fade to; exponential ramps cannot reach zero.
const FADE_FLOOR: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Click,
    Hover,
    Success,
    MenuOpen,
    Secret,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
}

impl From<Wave> for OscillatorType {
    fn from(w: Wave) -> Self {
        match w {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
        }
    }
}

/// Frequency glide: reaches `to` Hz `over` seconds after the tone starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub to: f64,
    pub over: f64,
}

/// One oscillator. Times are seconds from the moment the cue is played.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub start: f64,
    pub duration: f64,
    pub freq: f64,
    pub sweep: Option<Sweep>,
    pub gain: f64,
}

impl Tone {
    const fn note(wave: Wave, start: f64, duration: f64, freq: f64, gain: f64) -> Self {
        Self {
            wave,
            start,
            duration,
            freq,
            sweep: None,
            gain,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

const SUCCESS_NOTES: [f64; 3] = [523.25, 659.25, 783.99];
const SECRET_NOTES: [(f64, f64); 7] = [
    (392.00, 0.0),
    (440.00, 0.08),
    (493.88, 0.16),
    (523.25, 0.24),
    (587.33, 0.32),
    (659.25, 0.40),
    (783.99, 0.50),
];

impl Cue {
    pub fn tones(self) -> Vec<Tone> {
        match self {
            Cue::Click => vec![Tone {
                sweep: Some(Sweep { to: 600.0, over: 0.05 }),
                ..Tone::note(Wave::Sine, 0.0, 0.1, 800.0, 0.3)
            }],
            Cue::Hover => vec![Tone::note(Wave::Sine, 0.0, 0.05, 1200.0, 0.1)],
            Cue::Success => SUCCESS_NOTES
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::note(Wave::Square, i as f64 * 0.1, 0.15, *f, 0.2))
                .collect(),
            Cue::MenuOpen => vec![Tone {
                sweep: Some(Sweep { to: 800.0, over: 0.1 }),
                ..Tone::note(Wave::Triangle, 0.0, 0.15, 400.0, 0.2)
            }],
            Cue::Secret => SECRET_NOTES
                .iter()
                .map(|(f, at)| Tone::note(Wave::Square, *at, 0.12, *f, 0.15))
                .collect(),
        }
    }
}

/// Where cues are played.
pub trait SoundSink {
    fn play(&self, cue: Cue);
}

/// Web Audio output. The context is created on the first cue, which
/// browsers only allow after a user gesture anyway.
#[derive(Default)]
pub struct WebAudio {
    context: RefCell<Option<AudioContext>>,
}

impl WebAudio {
    fn schedule(ctx: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let now = ctx.current_time();
        let t0 = now + tone.start;
        osc.set_type(tone.wave.into());
        let freq = osc.frequency();
        freq.set_value_at_time(tone.freq as f32, t0)?;
        if let Some(sweep) = tone.sweep {
            freq.exponential_ramp_to_value_at_time(sweep.to as f32, t0 + sweep.over)?;
        }
        let level = gain.gain();
        level.set_value_at_time(tone.gain as f32, t0)?;
        level.exponential_ramp_to_value_at_time(FADE_FLOOR, now + tone.end())?;

        let source: &AudioScheduledSourceNode = &osc;
        source.start_with_when(t0)?;
        source.stop_with_when(now + tone.end())?;
        Ok(())
    }

    fn with_context(&self, f: impl FnOnce(&AudioContext)) {
        let mut slot = self.context.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(e) => {
                    cwarn(&format!("sound: no audio context: {:?}", e));
                    return;
                }
            }
        }
        if let Some(ctx) = slot.as_ref() {
            // Contexts start suspended until the page has been interacted with.
            let _ = ctx.resume();
            f(ctx);
        }
    }
}

impl SoundSink for WebAudio {
    fn play(&self, cue: Cue) {
        self.with_context(|ctx| {
            for tone in cue.tones() {
                if let Err(e) = WebAudio::schedule(ctx, &tone) {
                    cwarn(&format!("sound: {:?} dropped: {:?}", cue, e));
                    return;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_glides_down_within_its_tone() {
        let tones = Cue::Click.tones();
        assert_eq!(tones.len(), 1);
        let sweep = tones[0].sweep.unwrap();
        assert!(sweep.to < tones[0].freq);
        assert!(sweep.over <= tones[0].duration);
    }

    #[test]
    fn success_is_a_rising_major_triad() {
        let tones = Cue::Success.tones();
        let freqs: Vec<f64> = tones.iter().map(|t| t.freq).collect();
        assert_eq!(freqs, SUCCESS_NOTES.to_vec());
        assert!(tones.windows(2).all(|w| w[1].start > w[0].start));
    }

    #[test]
    fn secret_melody_ascends_and_ends_on_high_g() {
        let tones = Cue::Secret.tones();
        assert_eq!(tones.len(), 7);
        assert!(tones.windows(2).all(|w| w[1].freq > w[0].freq && w[1].start > w[0].start));
        let last = tones.last().unwrap();
        assert_eq!(last.freq, 783.99);
        assert!((last.end() - 0.62).abs() < 1e-9);
    }

    #[test]
    fn every_tone_is_audible_and_fades() {
        for cue in [Cue::Click, Cue::Hover, Cue::Success, Cue::MenuOpen, Cue::Secret] {
            for tone in cue.tones() {
                assert!(tone.gain > FADE_FLOOR as f64, "{:?}", cue);
                assert!(tone.duration > 0.0 && tone.freq > 0.0, "{:?}", cue);
            }
        }
    }
}
