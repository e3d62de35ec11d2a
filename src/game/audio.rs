//! Sound seam. The core only names sounds; a backend decides what plays.

/// Anything that can play named sound effects and music.
pub trait AudioSink {
    /// One-shot effect at `volume` in `0.0 ..= 1.0`.
    fn play_sfx(&mut self, name: &str, volume: f32);

    /// Background track; `loops == None` repeats forever.
    fn play_music(&mut self, name: &str, loops: Option<u32>);
}

/// Sink that only logs what it was asked to play.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_sfx(&mut self, name: &str, volume: f32) {
        log::debug!("sfx {name} @ {volume:.2}");
    }

    fn play_music(&mut self, name: &str, loops: Option<u32>) {
        match loops {
            Some(n) => log::info!("music {name} x{n}"),
            None => log::info!("music {name} (looping)"),
        }
    }
}

/// Remembers every request, for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub sfx: Vec<(String, f32)>,
    pub music: Vec<String>,
}

impl AudioSink for RecordingAudio {
    fn play_sfx(&mut self, name: &str, volume: f32) {
        self.sfx.push((name.to_owned(), volume));
    }

    fn play_music(&mut self, name: &str, _loops: Option<u32>) {
        self.music.push(name.to_owned());
    }
}
