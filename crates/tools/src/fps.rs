use std::time::Duration;

/// Counts presented frames and reports the count once per elapsed second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    last: Option<u32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `dt`. Returns the frame count when a
    /// second boundary was crossed.
    pub fn frame(&mut self, dt: Duration) -> Option<u32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        self.last = Some(fps);
        tracing::trace!(fps, "frame counter");
        Some(fps)
    }

    /// Most recent complete count.
    pub fn last(&self) -> Option<u32> {
        self.last
    }

    pub fn title(base: &str, fps: u32) -> String {
        format!("{base} | FPS: {fps}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let mut counter = FpsCounter::new();
        let dt = Duration::from_millis(10);
        let reports: Vec<u32> = (0..250).filter_map(|_| counter.frame(dt)).collect();
        assert_eq!(reports, vec![100, 100]);
        assert_eq!(counter.last(), Some(100));
    }

    #[test]
    fn slow_frame_reports_immediately() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.frame(Duration::from_secs(3)), Some(1));
    }

    #[test]
    fn nothing_before_first_second() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.frame(Duration::from_millis(500)), None);
        assert_eq!(counter.last(), None);
    }

    #[test]
    fn title_format() {
        assert_eq!(FpsCounter::title("cubefall", 60), "cubefall | FPS: 60");
    }
}
