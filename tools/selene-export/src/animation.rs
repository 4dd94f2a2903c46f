//! Animation sampling
//!
//! Every frame of an inclusive range is sampled for the exported bones.
//! A bone's pose is stored relative to its exported parent, or in world
//! space for roots. The frame the pose source was on is restored when
//! sampling finishes, also when it fails.

use std::ops::{Deref, DerefMut, RangeInclusive};

use glam::Mat4;
use hashbrown::HashMap;

use crate::error::ValidationError;
use crate::formats::PoseRecord;
use crate::mesh::check_count;
use crate::scene::{Armature, FramePose, Timeline};
use crate::skeleton::{pose_record, Skeleton};

/// Something that can be stepped through frames and queried for bone poses
pub trait PoseSource {
    fn current_frame(&self) -> i32;

    fn set_frame(&mut self, frame: i32);

    /// Armature-space pose matrix of `bone` at the current frame
    fn bone_pose(&self, bone: &str) -> Option<Mat4>;
}

/// Restores the source's frame on drop
pub struct FrameGuard<'a, S: PoseSource + ?Sized> {
    source: &'a mut S,
    restore: i32,
}

impl<'a, S: PoseSource + ?Sized> FrameGuard<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        let restore = source.current_frame();
        Self { source, restore }
    }
}

impl<S: PoseSource + ?Sized> Deref for FrameGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.source
    }
}

impl<S: PoseSource + ?Sized> DerefMut for FrameGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.source
    }
}

impl<S: PoseSource + ?Sized> Drop for FrameGuard<'_, S> {
    fn drop(&mut self) {
        self.source.set_frame(self.restore);
    }
}

/// [`PoseSource`] over the frames recorded in a snapshot timeline
pub struct TimelinePlayer<'a> {
    frames: HashMap<i32, &'a FramePose>,
    current: i32,
}

impl<'a> TimelinePlayer<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            frames: timeline.frames.iter().map(|f| (f.frame, f)).collect(),
            current: timeline.frame_current,
        }
    }

    /// A player without recorded frames, every bone stays at rest
    pub fn empty() -> Self {
        Self {
            frames: HashMap::new(),
            current: 0,
        }
    }
}

impl PoseSource for TimelinePlayer<'_> {
    fn current_frame(&self) -> i32 {
        self.current
    }

    fn set_frame(&mut self, frame: i32) {
        self.current = frame;
    }

    fn bone_pose(&self, bone: &str) -> Option<Mat4> {
        self.frames
            .get(&self.current)
            .and_then(|frame| frame.bones.get(bone))
            .map(Mat4::from_cols_array)
    }
}

/// Number of frames in an inclusive range, rejecting empty ranges
pub fn frame_count(frames: &RangeInclusive<i32>) -> Result<u32, ValidationError> {
    let (start, end) = (*frames.start(), *frames.end());
    let count = end as i64 - start as i64 + 1;
    if count <= 0 {
        return Err(ValidationError::InvalidFrameRange { start, end });
    }
    u32::try_from(count).map_err(|_| ValidationError::InvalidFrameRange { start, end })
}

/// Sample the exported bones of `armature` over `frames`
///
/// Bones without a pose at some frame use their rest matrix.
pub fn sample_animation<S: PoseSource + ?Sized>(
    source: &mut S,
    armature: &Armature,
    skeleton: &Skeleton,
    frames: RangeInclusive<i32>,
) -> Result<Vec<Vec<PoseRecord>>, ValidationError> {
    let count = frame_count(&frames)?;
    check_count("bones", skeleton.len(), u16::MAX as usize)?;

    let world = armature.world();
    let rest: HashMap<&str, Mat4> = armature
        .bones
        .iter()
        .map(|b| (b.name.as_str(), Mat4::from_cols_array(&b.matrix_local)))
        .collect();

    let mut player = FrameGuard::new(source);
    let mut sampled = Vec::new();

    for frame in frames {
        player.set_frame(frame);

        // Parents precede children, so their world pose is always ready
        let mut world_poses: Vec<Mat4> = Vec::with_capacity(skeleton.len());
        let mut poses = Vec::with_capacity(skeleton.len());
        for bone in skeleton.bones() {
            let pose = player
                .bone_pose(&bone.name)
                .or_else(|| rest.get(bone.name.as_str()).copied())
                .unwrap_or(Mat4::IDENTITY);
            let world_pose = world * pose;
            let relative = match bone.parent {
                Some(parent) => world_poses[parent].inverse() * world_pose,
                None => world_pose,
            };
            world_poses.push(world_pose);
            poses.push(pose_record(&bone.name, relative));
        }
        sampled.push(poses);
    }

    tracing::debug!(
        "Sampled {} frames of {} bones from {:?}",
        count,
        skeleton.len(),
        armature.name
    );

    Ok(sampled)
}
