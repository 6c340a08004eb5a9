//! Waypoint polyline shared by every enemy on a level, plus the per-enemy
//! progress follower that drives positions along it.

use rampart_core::WorldPoint;

/// Immutable waypoint polyline with precomputed segment lengths.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    waypoints: Vec<WorldPoint>,
    segment_lengths: Vec<f32>,
}

impl Path {
    /// Builds a path from an ordered waypoint list.
    ///
    /// Returns `None` for fewer than two waypoints. Duplicate consecutive
    /// waypoints are tolerated; their zero-length segments are crossed
    /// without consuming travel distance.
    pub(crate) fn from_waypoints(waypoints: Vec<WorldPoint>) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        let segment_lengths = waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        Some(Self {
            waypoints,
            segment_lengths,
        })
    }

    /// Index of the terminal waypoint.
    pub(crate) fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Ordered waypoints that make up the polyline.
    pub(crate) fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    fn segment_length(&self, index: usize) -> f32 {
        self.segment_lengths.get(index).copied().unwrap_or(0.0)
    }
}

/// Position along a [`Path`] expressed as a waypoint index plus the distance
/// already traveled on the current segment.
///
/// This pair is the source of truth for an enemy's location; world
/// coordinates are always derived from it. The index never decreases and
/// never exceeds the terminal waypoint index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PathProgress {
    index: usize,
    traveled: f32,
}

impl PathProgress {
    /// Progress anchored at the first waypoint.
    pub(crate) fn at_start() -> Self {
        Self {
            index: 0,
            traveled: 0.0,
        }
    }

    /// Moves forward by `distance` world units, crossing zero or more
    /// waypoints in a single call.
    ///
    /// Zero-length segments advance the index without consuming distance so
    /// duplicate waypoints cannot stall the walk.
    pub(crate) fn advance(&mut self, path: &Path, distance: f32) {
        debug_assert!(distance >= 0.0, "travel distance must be non-negative");
        let mut remaining = distance;
        while self.index < path.last_index() {
            let segment = path.segment_length(self.index);
            if segment <= f32::EPSILON {
                self.index += 1;
                self.traveled = 0.0;
                continue;
            }
            if remaining <= 0.0 {
                break;
            }
            let left_on_segment = segment - self.traveled;
            if remaining >= left_on_segment {
                remaining -= left_on_segment;
                self.index += 1;
                self.traveled = 0.0;
            } else {
                self.traveled += remaining;
                remaining = 0.0;
            }
        }
        if self.index >= path.last_index() {
            self.index = path.last_index();
            self.traveled = 0.0;
        }
        debug_assert!(self.index <= path.last_index());
    }

    /// Interpolated world position for the current index and segment offset.
    pub(crate) fn position(&self, path: &Path) -> WorldPoint {
        let waypoints = path.waypoints();
        if self.index >= path.last_index() {
            return waypoints[path.last_index()];
        }
        let segment = path.segment_length(self.index);
        if segment <= f32::EPSILON {
            return waypoints[self.index];
        }
        waypoints[self.index].lerp(waypoints[self.index + 1], self.traveled / segment)
    }

    /// Unit vector along the current segment, `None` at the terminus.
    pub(crate) fn heading(&self, path: &Path) -> Option<WorldPoint> {
        if self.index >= path.last_index() {
            return None;
        }
        let waypoints = path.waypoints();
        waypoints[self.index].direction_to(waypoints[self.index + 1])
    }

    /// Fraction of the path completed: zero at spawn, one at the terminus.
    pub(crate) fn progress_fraction(&self, path: &Path) -> f32 {
        self.index as f32 / path.last_index() as f32
    }

    /// Reports whether the terminal waypoint has been reached.
    pub(crate) fn has_reached_end(&self, path: &Path) -> bool {
        self.index >= path.last_index()
    }
}
