use crate::scene::node::SceneNode;

/// Nested form of a scene, flattened pre-order into `SceneData::nodes`
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTree {
    pub node: SceneNode,
    pub children: Vec<SceneTree>,
}

impl SceneTree {
    pub fn leaf(node: SceneNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn with_children(node: SceneNode, children: Vec<SceneTree>) -> Self {
        Self { node, children }
    }

    pub fn push(&mut self, child: SceneTree) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, itself included
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(SceneTree::len).sum::<usize>()
    }

    /// Appends this subtree parent-before-children, writing each node's
    /// `child_count` from its actual children
    pub(crate) fn flatten_into(self, nodes: &mut Vec<SceneNode>) {
        let Self { mut node, children } = self;
        node.common_mut().child_count = children.len() as i32;
        nodes.push(node);
        for child in children {
            child.flatten_into(nodes);
        }
    }
}
