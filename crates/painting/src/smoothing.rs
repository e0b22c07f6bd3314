//! Post-stroke smoothing
//!
//! While the pointer is held the raw path is painted live. On release the
//! target surface is restored to its pre-stroke snapshot and the path is
//! replayed through a Catmull-Rom fit, which replaces the jittery live
//! rasterization with a smooth one.

use glam::Vec2;
use tracing::debug;

use crate::brush::{BrushEngine, BrushState};
use crate::constants::SMOOTHING_SAMPLES_PER_SEGMENT;
use crate::geometry::PaintTarget;
use crate::surface::PaintSurface;
use crate::types::Region;

/// Densify a polyline with a uniform Catmull-Rom spline
///
/// Each interior segment `points[i] -> points[i + 1]` (for `1 <= i < n - 2`)
/// yields `samples` points at `t = k / samples`; the final point is appended
/// at the end. Inputs with fewer than 4 points are returned unchanged.
pub fn catmull_rom(points: &[Vec2], samples: usize) -> Vec<Vec2> {
    if points.len() < 4 || samples == 0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((points.len() - 3) * samples + 1);
    for window in points.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];
        for s in 0..samples {
            let t = s as f32 / samples as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            out.push(
                0.5 * ((2.0 * p1)
                    + (p2 - p0) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3),
            );
        }
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

/// Smoothed replacement path for a captured stroke
///
/// The first and last points are duplicated so the spline reaches both
/// ends. Fewer than 2 points produce an empty path.
pub fn smooth_path(points: &[Vec2], samples: usize) -> Vec<Vec2> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut padded = Vec::with_capacity(points.len() + 2);
    padded.push(points[0]);
    padded.extend_from_slice(points);
    padded.push(points[points.len() - 1]);
    catmull_rom(&padded, samples)
}

/// One pointer-down-to-up gesture
#[derive(Debug, Clone)]
pub struct Stroke {
    /// Tier being painted
    pub tier: usize,
    /// Region being painted
    pub region: Region,
    /// Brush captured at pointer-down (tool already resolved)
    pub brush: BrushState,
    /// Pointer positions in arrival order
    pub points: Vec<Vec2>,
    /// Target surface as it was before the first stamp
    pub snapshot: PaintSurface,
}

impl Stroke {
    pub fn last_point(&self) -> Option<Vec2> {
        self.points.last().copied()
    }
}

/// Outcome of finishing a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeFinish {
    /// The tool does not follow a path; live paint is kept as is
    Kept,
    /// Surface restored; fewer than 2 points, nothing replayed
    Degenerate,
    /// Surface restored and the smoothed path replayed
    Smoothed { samples: usize, stamps: usize },
}

/// Buffers the active stroke and replays it smoothed on completion
#[derive(Debug, Clone)]
pub struct StrokeSmoother {
    samples_per_segment: usize,
    active: Option<Stroke>,
}

impl Default for StrokeSmoother {
    fn default() -> Self {
        Self::new(SMOOTHING_SAMPLES_PER_SEGMENT)
    }
}

impl StrokeSmoother {
    pub fn new(samples_per_segment: usize) -> Self {
        Self {
            samples_per_segment,
            active: None,
        }
    }

    /// Start buffering a stroke at `start`
    ///
    /// `snapshot` must be a copy of the target surface taken before any
    /// paint of this stroke is applied. Replaces any unfinished stroke.
    pub fn begin(
        &mut self,
        tier: usize,
        region: Region,
        brush: BrushState,
        snapshot: PaintSurface,
        start: Vec2,
    ) {
        self.active = Some(Stroke {
            tier,
            region,
            brush,
            points: vec![start],
            snapshot,
        });
    }

    /// Append a pointer sample to the active stroke
    pub fn push(&mut self, point: Vec2) {
        if let Some(stroke) = self.active.as_mut() {
            stroke.points.push(point);
        }
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Drop the active stroke without touching any surface
    pub fn take(&mut self) -> Option<Stroke> {
        self.active.take()
    }

    /// Replace a finished stroke's live paint with its smoothed replay
    ///
    /// `target` must be the stroke's own tier region.
    pub fn finish(
        &self,
        stroke: &Stroke,
        target: &mut PaintTarget<'_>,
        engine: &BrushEngine,
    ) -> StrokeFinish {
        if !stroke.brush.tool.follows_path() {
            return StrokeFinish::Kept;
        }

        target.surface.copy_from(&stroke.snapshot);
        if stroke.points.len() < 2 {
            debug!("StrokeSmoother::finish: single point stroke, restored only");
            return StrokeFinish::Degenerate;
        }

        let path = smooth_path(&stroke.points, self.samples_per_segment);
        // The closing point duplicates the end of the last segment
        let replay = &path[..path.len().saturating_sub(1)];
        let stamps = replay
            .iter()
            .filter(|&&p| engine.stamp_point(target, p, &stroke.brush))
            .count();

        debug!(
            "StrokeSmoother::finish: {} points -> {} samples, {} stamps",
            stroke.points.len(),
            replay.len(),
            stamps
        );
        StrokeFinish::Smoothed {
            samples: replay.len(),
            stamps,
        }
    }
}
