/// One-shot edge detector for a held input.
///
/// `update` returns true only on the frame the input goes from released to
/// held. The latch stays set while held and clears on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeLatch {
    latched: bool,
}

impl EdgeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, held: bool) -> bool {
        if !held {
            self.latched = false;
            return false;
        }
        if self.latched {
            return false;
        }
        self.latched = true;
        true
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
