//! Skeleton construction
//!
//! Only bones that also name a vertex group of the mesh take part in the
//! export. Those bones form a forest: a bone whose immediate parent is not
//! exported becomes a root. Bones are indexed by a pre-order walk of that
//! forest, so a parent always has a smaller index than its children.

use glam::Mat4;
use hashbrown::{HashMap, HashSet};
use selene_common::{BoneRecord, PoseRecord, NO_PARENT};

use crate::scene::{Armature, VertexGroup};

/// One exported bone
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Inverse of the bone's rest transform in world space
    pub inverse_bind: Mat4,
    pub index: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Exported bones, stored in index order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

/// Split a transform into a pose record in the engine's axis convention
pub fn pose_record(name: &str, transform: Mat4) -> PoseRecord {
    let (_scale, rotation, translation) = transform.to_scale_rotation_translation();
    PoseRecord::from_authoring(name, rotation.to_array(), translation.to_array())
}

/// Names of armature bones that also have a vertex group on the mesh
pub fn active_bone_names<'a>(armature: &'a Armature, groups: &[VertexGroup]) -> HashSet<&'a str> {
    let group_names: HashSet<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    armature
        .bones
        .iter()
        .map(|bone| bone.name.as_str())
        .filter(|name| group_names.contains(name))
        .collect()
}

impl Skeleton {
    /// Build the exported skeleton of `armature` for a mesh with `groups`
    pub fn build(armature: &Armature, groups: &[VertexGroup]) -> Self {
        let active = active_bone_names(armature, groups);
        let world = armature.world();

        // Active bones in armature order; duplicate names keep the first bone
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut sources = Vec::new();
        for bone in &armature.bones {
            if active.contains(bone.name.as_str()) && !slots.contains_key(bone.name.as_str()) {
                slots.insert(bone.name.as_str(), sources.len());
                sources.push(bone);
            }
        }

        // Parent and child links between source slots
        let parents: Vec<Option<usize>> = sources
            .iter()
            .enumerate()
            .map(|(slot, bone)| {
                bone.parent
                    .as_deref()
                    .and_then(|name| slots.get(name).copied())
                    .filter(|&parent| parent != slot)
            })
            .collect();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); sources.len()];
        for (slot, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(slot);
            }
        }

        // Pre-order walk from the roots; bones caught in a parent cycle are
        // never reached from a root and are walked as roots afterwards
        let mut order: Vec<usize> = Vec::with_capacity(sources.len());
        let mut visited = vec![false; sources.len()];
        let roots = (0..sources.len()).filter(|&slot| parents[slot].is_none());
        let stragglers = 0..sources.len();
        for root in roots.chain(stragglers) {
            if visited[root] {
                continue;
            }
            let mut stack = vec![root];
            while let Some(slot) = stack.pop() {
                if visited[slot] {
                    continue;
                }
                visited[slot] = true;
                order.push(slot);
                stack.extend(children[slot].iter().rev().copied());
            }
        }

        let mut index_of_slot = vec![0usize; sources.len()];
        for (index, &slot) in order.iter().enumerate() {
            index_of_slot[slot] = index;
        }

        let mut bones: Vec<Bone> = order
            .iter()
            .enumerate()
            .map(|(index, &slot)| {
                let source = sources[slot];
                let rest = world * Mat4::from_cols_array(&source.matrix_local);
                let parent = parents[slot]
                    .map(|p| index_of_slot[p])
                    .filter(|&p| p < index);
                Bone {
                    name: source.name.clone(),
                    inverse_bind: rest.inverse(),
                    index,
                    parent,
                    children: Vec::new(),
                }
            })
            .collect();

        for index in 0..bones.len() {
            if let Some(parent) = bones[index].parent {
                bones[parent].children.push(index);
            }
        }

        tracing::debug!(
            "Built skeleton with {} of {} armature bones",
            bones.len(),
            armature.bones.len()
        );

        Self { bones }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Bone records in index order
    pub fn records(&self) -> Vec<BoneRecord> {
        self.bones
            .iter()
            .map(|bone| BoneRecord {
                pose: pose_record(&bone.name, bone.inverse_bind),
                parent: bone.parent.map_or(NO_PARENT, |p| p as i32),
            })
            .collect()
    }
}
