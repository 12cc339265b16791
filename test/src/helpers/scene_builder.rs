use scenesync_shared::{
    CameraNode, CharacterPackage, GeoNode, LightNode, LightType, MaterialPackage, NodeCommon,
    ObjectPackage, SceneData, SceneHeader, SceneNode, SceneTree, SkinData, SkinnedGeoNode,
    TexturePackage, MAX_SKIN_BONES,
};

pub fn group(name: &str) -> SceneNode {
    SceneNode::Group(NodeCommon::named(name))
}

pub fn geo(name: &str, geo_id: i32) -> SceneNode {
    SceneNode::Geo(GeoNode {
        common: editable(name),
        geo_id,
        ..GeoNode::default()
    })
}

/// A skinned mesh with `bones` meaningful bind poses; unused slots stay default
pub fn skinned_geo(name: &str, geo_id: i32, bones: usize) -> SceneNode {
    let bones = bones.min(MAX_SKIN_BONES);
    let mut skin = SkinData {
        bind_pose_length: bones as i32,
        root_bone_id: 0,
        bound_extents: [1.0, 2.0, 1.0],
        bound_center: [0.0, 1.0, 0.0],
        ..SkinData::default()
    };
    for bone in 0..bones {
        skin.bind_poses[bone] = identity_with_offset(bone as f32);
        skin.bone_ids[bone] = bone as i32;
    }
    SceneNode::SkinnedGeo(SkinnedGeoNode {
        geo: GeoNode {
            common: editable(name),
            geo_id,
            ..GeoNode::default()
        },
        skin: Box::new(skin),
    })
}

pub fn directional_light(name: &str, intensity: f32) -> SceneNode {
    SceneNode::Light(LightNode {
        common: editable(name),
        light_type: LightType::Directional,
        intensity,
        color: [1.0, 1.0, 1.0],
        ..LightNode::default()
    })
}

pub fn camera(name: &str) -> SceneNode {
    SceneNode::Camera(CameraNode {
        common: editable(name),
        ..CameraNode::default()
    })
}

/// A single triangle
pub fn mesh() -> ObjectPackage {
    ObjectPackage {
        vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        indices: vec![0, 1, 2],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        ..ObjectPackage::default()
    }
}

pub fn character(bones: usize) -> CharacterPackage {
    CharacterPackage {
        bone_mapping: (0..bones as i32).collect(),
        skeleton_mapping: (0..bones as i32).collect(),
        root_id: 0,
        positions: vec![[0.0, 1.0, 0.0]; bones],
        rotations: vec![[0.0, 0.0, 0.0, 1.0]; bones],
        scales: vec![[1.0; 3]; bones],
    }
}

pub fn texture(size: usize) -> TexturePackage {
    TexturePackage {
        width: 2,
        height: 2,
        format: 4,
        data: (0..size).map(|byte| byte as u8).collect(),
    }
}

pub fn material(name: &str) -> MaterialPackage {
    MaterialPackage {
        material_type: 1,
        name: name.to_string(),
        src: "Standard".to_string(),
        texture_ids: vec![0],
        property_ids: vec![],
    }
}

/// Group root with a geo child (`geo_id` 0) and a directional light child
/// of intensity 2.5
pub fn three_node_scene() -> SceneData {
    TestSceneBuilder::new()
        .root(SceneTree::with_children(
            group("root"),
            vec![
                SceneTree::leaf(geo("chair", 0)),
                SceneTree::leaf(directional_light("sun", 2.5)),
            ],
        ))
        .object(mesh())
        .build()
}

/// A scene exercising every node variant and every resource category
pub fn sample_scene() -> SceneData {
    TestSceneBuilder::new()
        .textures_with_dimensions()
        .root(SceneTree::with_children(
            group("root"),
            vec![
                SceneTree::with_children(
                    group("set"),
                    vec![
                        SceneTree::leaf(geo("table", 0)),
                        SceneTree::leaf(geo("chair", 0)),
                    ],
                ),
                SceneTree::leaf(skinned_geo("actor", 0, 4)),
                SceneTree::leaf(directional_light("sun", 2.5)),
                SceneTree::leaf(camera("main")),
            ],
        ))
        .object(mesh())
        .character(character(4))
        .texture(texture(16))
        .material(material("wood"))
        .build()
}

/// Assembles a `SceneData` from nested trees and resource packages
#[derive(Default)]
pub struct TestSceneBuilder {
    header: SceneHeader,
    roots: Vec<SceneTree>,
    objects: Vec<ObjectPackage>,
    characters: Vec<CharacterPackage>,
    textures: Vec<TexturePackage>,
    materials: Vec<MaterialPackage>,
}

impl TestSceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textures_with_dimensions(mut self) -> Self {
        self.header.texture_binary_type = 1;
        self
    }

    pub fn root(mut self, tree: SceneTree) -> Self {
        self.roots.push(tree);
        self
    }

    pub fn object(mut self, object: ObjectPackage) -> Self {
        self.objects.push(object);
        self
    }

    pub fn character(mut self, character: CharacterPackage) -> Self {
        self.characters.push(character);
        self
    }

    pub fn texture(mut self, texture: TexturePackage) -> Self {
        self.textures.push(texture);
        self
    }

    pub fn material(mut self, material: MaterialPackage) -> Self {
        self.materials.push(material);
        self
    }

    pub fn build(self) -> SceneData {
        let mut scene = SceneData::from_trees(self.header, self.roots);
        scene.objects = self.objects;
        scene.characters = self.characters;
        scene.textures = self.textures;
        scene.materials = self.materials;
        scene
    }
}

fn editable(name: &str) -> NodeCommon {
    NodeCommon {
        editable: true,
        ..NodeCommon::named(name)
    }
}

fn identity_with_offset(offset: f32) -> [f32; 16] {
    let mut matrix = [0.0; 16];
    matrix[0] = 1.0;
    matrix[5] = 1.0;
    matrix[10] = 1.0;
    matrix[15] = 1.0;
    matrix[3] = offset;
    matrix
}
