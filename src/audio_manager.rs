use log::{debug, warn};
use rodio::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Shot,
    NpcPain,
    NpcDeath,
    NpcAttack,
    PlayerPain,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 5] =
        [SoundEvent::Shot, SoundEvent::NpcPain, SoundEvent::NpcDeath, SoundEvent::NpcAttack, SoundEvent::PlayerPain];

    fn file_name(self) -> &'static str {
        match self {
            SoundEvent::Shot => "shotgun.wav",
            SoundEvent::NpcPain => "npc_pain.wav",
            SoundEvent::NpcDeath => "npc_death.wav",
            SoundEvent::NpcAttack => "npc_attack.wav",
            SoundEvent::PlayerPain => "player_pain.wav",
        }
    }

    fn relative_volume(self) -> f32 {
        match self {
            SoundEvent::NpcAttack => 0.2,
            _ => 1.0,
        }
    }
}

/// Fire-and-forget sound playback. Implementations swallow their own errors.
pub trait AudioSink {
    fn play(&self, event: SoundEvent);
}

/// Used when no output device is available.
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, _event: SoundEvent) {}
}

pub struct AudioManager {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music_sink: Option<Sink>,
    sfx: HashMap<SoundEvent, Arc<Vec<u8>>>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Option<Self> {
        let (_stream, handle) = OutputStream::try_default().ok()?;
        Some(Self { _stream, handle, music_sink: None, sfx: HashMap::new(), volume: volume.clamp(0.0, 1.0) })
    }

    /// Loads every effect from `dir`; missing files are skipped.
    pub fn load_sfx(&mut self, dir: &Path) {
        for event in SoundEvent::ALL {
            let path = dir.join(event.file_name());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    self.sfx.insert(event, Arc::new(bytes));
                }
                Err(e) => warn!("sound {} unavailable: {e}", path.display()),
            }
        }
        debug!("loaded {} sound effects", self.sfx.len());
    }

    pub fn play_music_loop(&mut self, path: &Path) {
        if self.music_sink.is_some() {
            return;
        }
        let Ok(bytes) = std::fs::read(path) else {
            warn!("music {} unavailable", path.display());
            return;
        };
        if let Ok(dec) = Decoder::new_looped(Cursor::new(bytes)) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(dec);
                sink.set_volume(self.volume);
                self.music_sink = Some(sink);
            }
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&self, event: SoundEvent) {
        // own sink per effect so overlapping events all start immediately
        if let Some(d) = self.sfx.get(&event) {
            if let Ok(dec) = Decoder::new(Cursor::new(d.as_ref().clone())) {
                if let Ok(sink) = Sink::try_new(&self.handle) {
                    sink.append(dec.amplify(self.volume * event.relative_volume()));
                    sink.detach();
                }
            }
        }
    }
}
