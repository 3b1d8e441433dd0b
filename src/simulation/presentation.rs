//! Read-only snapshots handed to an external renderer once per tick.
//!
//! A presenter never feeds anything back into the simulation. Failures on
//! its side are logged and swallowed.

use std::collections::VecDeque;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::event_log::LoggedEvent;

/// Drawable state of one flyer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyerView {
    /// Policy handle driving this flyer.
    pub policy: usize,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Tilt in degrees.
    pub tilt: f32,
    /// Wing frame index.
    pub frame: usize,
}

/// Drawable state of one obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    /// Left edge.
    pub x: f32,
    /// Gap height.
    pub gap_height: i32,
    /// Top piece upper edge.
    pub top: f32,
    /// Bottom piece upper edge.
    pub bot: f32,
    /// Whether the obstacle has been passed.
    pub passed: bool,
}

/// Drawable state of the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorView {
    /// Kill-plane height.
    pub y: f32,
    /// First tile offset.
    pub x1: f32,
    /// Second tile offset.
    pub x2: f32,
}

/// Everything a renderer needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Ticks elapsed in the episode.
    pub tick: u64,
    /// Generation label supplied by the caller.
    pub generation: u32,
    /// Obstacles passed so far.
    pub score: u32,
    /// Live flyers in list order.
    pub flyers: Vec<FlyerView>,
    /// Live obstacles in list order.
    pub obstacles: Vec<ObstacleView>,
    /// Floor offsets.
    pub floor: FloorView,
    /// Index of the obstacle the flyers were steering by this tick. It may
    /// point past the end of `obstacles` if that obstacle just despawned.
    pub active_obstacle: usize,
    /// Events recorded on this tick, newest first.
    pub events: Vec<LoggedEvent>,
}

impl Frame {
    /// Number of live flyers.
    pub fn alive(&self) -> usize {
        self.flyers.len()
    }

    /// The obstacle the flyers were steering by, if it still exists.
    pub fn active_obstacle(&self) -> Option<&ObstacleView> {
        self.obstacles.get(self.active_obstacle)
    }
}

/// Consumer of per-tick frames.
pub trait Presenter {
    /// Receives the state after a tick has been fully applied.
    fn present(&mut self, frame: &Frame);
}

/// Presenter that discards every frame, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &Frame) {}
}

/// Keeps the most recent frames in memory.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: VecDeque<Frame>,
    limit: Option<usize>,
}

impl FrameRecorder {
    /// Records every frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records at most `limit` frames, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(limit),
            limit: Some(limit),
        }
    }

    /// Recorded frames, oldest first.
    pub fn frames(&self) -> &VecDeque<Frame> {
        &self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&Frame> {
        self.frames.back()
    }
}

impl Presenter for FrameRecorder {
    fn present(&mut self, frame: &Frame) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            if self.frames.len() >= limit {
                self.frames.pop_front();
            }
        }
        self.frames.push_back(frame.clone());
    }
}

/// Writes each frame as one JSON line.
///
/// A write failure disables the writer for the rest of the episode instead
/// of interrupting the simulation.
#[derive(Debug)]
pub struct JsonLinesPresenter<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> JsonLinesPresenter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Whether a write has failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn present(&mut self, frame: &Frame) {
        if self.failed {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            warn!(tick = frame.tick, error = %err, "frame writer failed, dropping further frames");
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tick: u64, active_obstacle: usize) -> Frame {
        Frame {
            tick,
            generation: 1,
            score: 0,
            flyers: Vec::new(),
            obstacles: vec![ObstacleView {
                x: 10.0,
                gap_height: 100,
                top: -540.0,
                bot: 300.0,
                passed: false,
            }],
            floor: FloorView {
                y: 730.0,
                x1: 0.0,
                x2: 672.0,
            },
            active_obstacle,
            events: Vec::new(),
        }
    }

    #[test]
    fn stale_active_index_is_guarded() {
        assert!(frame(0, 0).active_obstacle().is_some());
        assert!(frame(0, 1).active_obstacle().is_none());
    }

    #[test]
    fn recorder_drops_oldest_beyond_limit() {
        let mut recorder = FrameRecorder::with_limit(2);
        for tick in 0..5 {
            recorder.present(&frame(tick, 0));
        }
        let ticks: Vec<u64> = recorder.frames().iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![3, 4]);
    }

    #[test]
    fn bounded_recorder_rolls_over_long_runs() {
        let mut recorder = FrameRecorder::with_limit(3);
        for tick in 0..10_000 {
            recorder.present(&frame(tick, 0));
        }
        assert_eq!(recorder.frames().len(), 3);
        assert_eq!(recorder.frames().front().map(|f| f.tick), Some(9_997));
        assert_eq!(recorder.last().map(|f| f.tick), Some(9_999));
    }

    #[test]
    fn zero_limit_records_nothing() {
        let mut recorder = FrameRecorder::with_limit(0);
        recorder.present(&frame(1, 0));
        assert!(recorder.frames().is_empty());
        assert!(recorder.last().is_none());
    }

    #[test]
    fn json_lines_round_trip() {
        let mut presenter = JsonLinesPresenter::new(Vec::new());
        presenter.present(&frame(7, 0));
        presenter.present(&frame(8, 0));
        let out = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<Frame> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].tick, 8);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failure_is_not_fatal() {
        let mut presenter = JsonLinesPresenter::new(Broken);
        presenter.present(&frame(0, 0));
        presenter.present(&frame(1, 0));
        assert!(presenter.has_failed());
    }
}
