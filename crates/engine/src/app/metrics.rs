use std::time::{Duration, Instant};

use super::scene::SceneKey;

/// Rates over the last reporting window. Ticks are split by the scene that
/// was active when they ran, so a switch mid-window shows up in both.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopStats {
    pub fps: f32,
    pub game_tps: f32,
    pub editor_tps: f32,
    pub frame_time_ms: f32,
}

impl LoopStats {
    pub fn tps(&self) -> f32 {
        self.game_tps + self.editor_tps
    }

    /// Short form appended to the window title.
    pub fn summary(&self) -> String {
        format!("{:.0} fps / {:.0} tps", self.fps, self.tps())
    }
}

#[derive(Debug)]
pub(crate) struct FrameStats {
    window_start: Instant,
    window: Duration,
    frames: u32,
    game_ticks: u32,
    editor_ticks: u32,
    busiest_frame: Duration,
    frame_time_total: Duration,
}

impl FrameStats {
    pub(crate) fn new(window: Duration, now: Instant) -> Self {
        Self {
            window_start: now,
            window,
            frames: 0,
            game_ticks: 0,
            editor_ticks: 0,
            busiest_frame: Duration::ZERO,
            frame_time_total: Duration::ZERO,
        }
    }

    pub(crate) fn tick(&mut self, scene: SceneKey) {
        let counter = match scene {
            SceneKey::Game => &mut self.game_ticks,
            SceneKey::Editor => &mut self.editor_ticks,
        };
        *counter = counter.saturating_add(1);
    }

    pub(crate) fn frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
        self.busiest_frame = self.busiest_frame.max(frame_dt);
    }

    /// Longest frame seen in the current window.
    pub(crate) fn busiest_frame(&self) -> Duration {
        self.busiest_frame
    }

    /// Closes the window once it has run for its full length and starts
    /// the next one at `now`.
    pub(crate) fn roll(&mut self, now: Instant) -> Option<LoopStats> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time_total.as_secs_f32() * 1000.0 / frames as f32,
        };
        let stats = LoopStats {
            fps: self.frames as f32 / seconds,
            game_tps: self.game_ticks as f32 / seconds,
            editor_tps: self.editor_ticks as f32 / seconds,
            frame_time_ms,
        };

        *self = Self::new(self.window, now);
        Some(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_reports_rates_per_scene() {
        let base = Instant::now();
        let mut stats = FrameStats::new(Duration::from_secs(2), base);
        for _ in 0..4 {
            stats.frame(Duration::from_millis(20));
        }
        for _ in 0..6 {
            stats.tick(SceneKey::Game);
        }
        stats.tick(SceneKey::Editor);
        stats.tick(SceneKey::Editor);

        let report = stats
            .roll(base + Duration::from_secs(2))
            .expect("window elapsed");

        assert!((report.fps - 2.0).abs() < 0.01);
        assert!((report.game_tps - 3.0).abs() < 0.01);
        assert!((report.editor_tps - 1.0).abs() < 0.01);
        assert!((report.tps() - 4.0).abs() < 0.01);
        assert!((report.frame_time_ms - 20.0).abs() < 0.01);
    }

    #[test]
    fn nothing_reported_mid_window() {
        let base = Instant::now();
        let mut stats = FrameStats::new(Duration::from_secs(1), base);
        stats.frame(Duration::from_millis(16));

        assert_eq!(stats.roll(base + Duration::from_millis(999)), None);
    }

    #[test]
    fn rolling_starts_a_fresh_window() {
        let base = Instant::now();
        let mut stats = FrameStats::new(Duration::from_secs(1), base);
        stats.frame(Duration::from_millis(40));
        stats.frame(Duration::from_millis(10));
        stats.tick(SceneKey::Game);
        assert_eq!(stats.busiest_frame(), Duration::from_millis(40));

        let _ = stats.roll(base + Duration::from_secs(1));

        assert_eq!(stats.busiest_frame(), Duration::ZERO);
        assert_eq!(stats.roll(base + Duration::from_millis(1500)), None);
        let empty = stats
            .roll(base + Duration::from_secs(2))
            .expect("second window");
        assert_eq!(empty, LoopStats::default());
    }

    #[test]
    fn summary_rounds_combined_rates() {
        let stats = LoopStats {
            fps: 59.6,
            game_tps: 40.0,
            editor_tps: 20.0,
            frame_time_ms: 16.7,
        };
        assert_eq!(stats.summary(), "60 fps / 60 tps");
    }
}
