use crate::codec::scene_category::SceneCategory;

/// The six encoded blobs that make up a scene snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneBuffers {
    pub header: Vec<u8>,
    pub nodes: Vec<u8>,
    pub objects: Vec<u8>,
    pub characters: Vec<u8>,
    pub textures: Vec<u8>,
    pub materials: Vec<u8>,
}

impl SceneBuffers {
    pub fn get(&self, category: SceneCategory) -> &[u8] {
        match category {
            SceneCategory::Header => &self.header,
            SceneCategory::Nodes => &self.nodes,
            SceneCategory::Objects => &self.objects,
            SceneCategory::Characters => &self.characters,
            SceneCategory::Textures => &self.textures,
            SceneCategory::Materials => &self.materials,
        }
    }

    pub fn set(&mut self, category: SceneCategory, bytes: Vec<u8>) {
        *self.get_mut(category) = bytes;
    }

    fn get_mut(&mut self, category: SceneCategory) -> &mut Vec<u8> {
        match category {
            SceneCategory::Header => &mut self.header,
            SceneCategory::Nodes => &mut self.nodes,
            SceneCategory::Objects => &mut self.objects,
            SceneCategory::Characters => &mut self.characters,
            SceneCategory::Textures => &mut self.textures,
            SceneCategory::Materials => &mut self.materials,
        }
    }

    pub fn total_len(&self) -> usize {
        SceneCategory::TRANSFER_ORDER
            .iter()
            .map(|category| self.get(*category).len())
            .sum()
    }
}
