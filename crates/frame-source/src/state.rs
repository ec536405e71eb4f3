//! Media readiness model

/// How much media data is buffered, mirroring the HTML media element scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// Playback state of a video source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceState {
    /// Playback has started and is not paused
    pub playing: bool,
    /// Stream reached its end
    pub ended: bool,
    /// Source reported a decode or stream error
    pub errored: bool,
    /// Buffered data level
    pub ready_state: ReadyState,
    /// Intrinsic video width (0 until metadata arrives)
    pub width: u32,
    /// Intrinsic video height (0 until metadata arrives)
    pub height: u32,
}

impl SourceState {
    /// Playing source with enough data buffered
    pub fn playing(width: u32, height: u32) -> Self {
        Self {
            playing: true,
            ended: false,
            errored: false,
            ready_state: ReadyState::HaveEnoughData,
            width,
            height,
        }
    }

    /// Whether a frame can be decoded right now
    pub fn is_ready(&self) -> bool {
        self.playing
            && !self.ended
            && !self.errored
            && self.ready_state >= ReadyState::HaveCurrentData
            && self.width > 0
            && self.height > 0
    }
}
