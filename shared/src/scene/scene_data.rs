use crate::{
    scene::{
        error::SceneTreeError,
        node::SceneNode,
        packages::{CharacterPackage, MaterialPackage, ObjectPackage, SceneHeader, TexturePackage},
        scene_tree::SceneTree,
    },
    types::ObjectId,
};

/// Runtime state of an object that the scene buffers do not carry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveState {
    /// Physics response is off while someone holds the object's lock
    pub physics_suspended: bool,
    /// Locked without a visible lock indicator
    pub hidden_lock: bool,
    pub kinematic: bool,
    pub exposure: f32,
    pub focus_size: f32,
    /// Latest per-bone rotations of an animated character
    pub bone_rotations: Vec<[f32; 4]>,
}

/// One complete scene snapshot.
/// A node's object ID is its index in `nodes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneData {
    pub header: SceneHeader,
    pub nodes: Vec<SceneNode>,
    pub objects: Vec<ObjectPackage>,
    pub characters: Vec<CharacterPackage>,
    pub textures: Vec<TexturePackage>,
    pub materials: Vec<MaterialPackage>,
    live: Vec<LiveState>,
}

impl SceneData {
    pub fn new(header: SceneHeader) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Flattens `roots` pre-order; each node's object ID becomes its traversal position
    pub fn from_trees(header: SceneHeader, roots: Vec<SceneTree>) -> Self {
        let mut nodes = Vec::with_capacity(roots.iter().map(SceneTree::len).sum());
        for root in roots {
            root.flatten_into(&mut nodes);
        }
        Self {
            header,
            nodes,
            ..Self::default()
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        Self::index_of(object_id).is_some_and(|index| index < self.nodes.len())
    }

    pub fn node(&self, object_id: ObjectId) -> Option<&SceneNode> {
        self.nodes.get(Self::index_of(object_id)?)
    }

    pub fn node_mut(&mut self, object_id: ObjectId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(Self::index_of(object_id)?)
    }

    pub fn live_state(&self, object_id: ObjectId) -> Option<&LiveState> {
        if !self.contains(object_id) {
            return None;
        }
        static DEFAULT_LIVE_STATE: LiveState = LiveState {
            physics_suspended: false,
            hidden_lock: false,
            kinematic: false,
            exposure: 0.0,
            focus_size: 0.0,
            bone_rotations: Vec::new(),
        };
        Some(
            Self::index_of(object_id)
                .and_then(|index| self.live.get(index))
                .unwrap_or(&DEFAULT_LIVE_STATE),
        )
    }

    pub fn live_state_mut(&mut self, object_id: ObjectId) -> Option<&mut LiveState> {
        let index = Self::index_of(object_id)?;
        if index >= self.nodes.len() {
            return None;
        }
        if self.live.len() < self.nodes.len() {
            self.live.resize_with(self.nodes.len(), LiveState::default);
        }
        self.live.get_mut(index)
    }

    /// Node and live state of one object, borrowed together
    pub fn object_mut(&mut self, object_id: ObjectId) -> Option<(&mut SceneNode, &mut LiveState)> {
        let index = Self::index_of(object_id)?;
        if index >= self.nodes.len() {
            return None;
        }
        if self.live.len() < self.nodes.len() {
            self.live.resize_with(self.nodes.len(), LiveState::default);
        }
        Some((&mut self.nodes[index], &mut self.live[index]))
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.nodes
            .iter()
            .position(|node| node.name() == name)
            .and_then(|index| ObjectId::try_from(index).ok())
    }

    /// Parent object ID of every node, derived from the `child_count` fields
    pub fn parents(&self) -> Result<Vec<Option<ObjectId>>, SceneTreeError> {
        if ObjectId::try_from(self.nodes.len()).is_err() {
            return Err(SceneTreeError::TooManyNodes {
                count: self.nodes.len(),
            });
        }

        let mut parents = Vec::with_capacity(self.nodes.len());
        // (object id, declared children, children still expected)
        let mut open: Vec<(ObjectId, i32, i32)> = Vec::new();

        for (index, node) in self.nodes.iter().enumerate() {
            let object_id = index as ObjectId;

            while matches!(open.last(), Some((_, _, 0))) {
                open.pop();
            }
            let parent = match open.last_mut() {
                Some((parent_id, _, remaining)) => {
                    *remaining -= 1;
                    Some(*parent_id)
                }
                None => None,
            };
            parents.push(parent);

            let child_count = node.child_count();
            if child_count < 0 {
                return Err(SceneTreeError::NegativeChildCount {
                    object_id,
                    child_count,
                });
            }
            if child_count > 0 {
                open.push((object_id, child_count, child_count));
            }
        }

        if let Some((object_id, declared, remaining)) =
            open.into_iter().rev().find(|(_, _, remaining)| *remaining > 0)
        {
            return Err(SceneTreeError::MissingChildren {
                object_id,
                declared,
                available: (declared - remaining) as usize,
            });
        }

        Ok(parents)
    }

    /// Slash separated names from the root down to `object_id`, e.g. `/root/lamp`
    pub fn path_of(&self, object_id: ObjectId) -> Option<String> {
        let parents = self.parents().ok()?;
        let mut names = Vec::new();
        let mut current = Some(object_id);
        while let Some(id) = current {
            names.push(self.node(id)?.name());
            current = *parents.get(Self::index_of(id)?)?;
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    /// Rebuilds the nested tree from the flattened node list
    pub fn to_trees(&self) -> Result<Vec<SceneTree>, SceneTreeError> {
        self.parents()?;

        let mut roots = Vec::new();
        let mut cursor = 0;
        while cursor < self.nodes.len() {
            roots.push(self.build_subtree(&mut cursor));
        }
        Ok(roots)
    }

    // only called once `parents` has validated every child count
    fn build_subtree(&self, cursor: &mut usize) -> SceneTree {
        let node = self.nodes[*cursor].clone();
        *cursor += 1;
        let child_count = node.child_count();
        let mut children = Vec::new();
        for _ in 0..child_count {
            children.push(self.build_subtree(cursor));
        }
        SceneTree::with_children(node, children)
    }

    fn index_of(object_id: ObjectId) -> Option<usize> {
        usize::try_from(object_id).ok()
    }
}
