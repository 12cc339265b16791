use scenesync_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

use crate::{constants::MAX_SKIN_BONES, scene::node_name::NodeName};

/// Wire tag written before every node record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Group,
    Geo,
    Light,
    Camera,
    SkinnedGeo,
}

impl NodeType {
    pub fn to_i32(self) -> i32 {
        match self {
            NodeType::Group => 0,
            NodeType::Geo => 1,
            NodeType::Light => 2,
            NodeType::Camera => 3,
            NodeType::SkinnedGeo => 4,
        }
    }
}

impl TryFrom<i32> for NodeType {
    type Error = SerdeErr;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(NodeType::Group),
            1 => Ok(NodeType::Geo),
            2 => Ok(NodeType::Light),
            3 => Ok(NodeType::Camera),
            4 => Ok(NodeType::SkinnedGeo),
            _ => Err(SerdeErr::InvalidDiscriminant {
                type_name: "NodeType",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Spot,
    Directional,
    Point,
    Area,
    Disc,
}

impl LightType {
    pub fn to_i32(self) -> i32 {
        match self {
            LightType::Spot => 0,
            LightType::Directional => 1,
            LightType::Point => 2,
            LightType::Area => 3,
            LightType::Disc => 4,
        }
    }
}

impl TryFrom<i32> for LightType {
    type Error = SerdeErr;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LightType::Spot),
            1 => Ok(LightType::Directional),
            2 => Ok(LightType::Point),
            3 => Ok(LightType::Area),
            4 => Ok(LightType::Disc),
            _ => Err(SerdeErr::InvalidDiscriminant {
                type_name: "LightType",
                value,
            }),
        }
    }
}

impl Serde for LightType {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.to_i32().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        LightType::try_from(reader.read_i32()?)
    }

    fn byte_length(&self) -> u32 {
        4
    }
}

// NodeCommon

/// Fields every node variant starts with
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCommon {
    /// Whether clients may edit this node; an i32 on the wire
    pub editable: bool,
    /// Number of direct children following this node in traversal order
    pub child_count: i32,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    /// Quaternion, xyzw
    pub rotation: [f32; 4],
    pub name: NodeName,
}

impl NodeCommon {
    pub fn named(name: &str) -> Self {
        Self {
            name: NodeName::new(name),
            ..Self::default()
        }
    }
}

impl Default for NodeCommon {
    fn default() -> Self {
        Self {
            editable: false,
            child_count: 0,
            position: [0.0; 3],
            scale: [1.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            name: NodeName::default(),
        }
    }
}

impl Serde for NodeCommon {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        i32::from(self.editable).ser(writer);
        self.child_count.ser(writer);
        self.position.ser(writer);
        self.scale.ser(writer);
        self.rotation.ser(writer);
        self.name.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            editable: reader.read_i32()? != 0,
            child_count: reader.read_i32()?,
            position: Serde::de(reader)?,
            scale: Serde::de(reader)?,
            rotation: Serde::de(reader)?,
            name: NodeName::de(reader)?,
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for NodeCommon {
    fn const_byte_length() -> u32 {
        i32::const_byte_length() * 2
            + <[f32; 3]>::const_byte_length() * 2
            + <[f32; 4]>::const_byte_length()
            + NodeName::const_byte_length()
    }
}

// GeoNode

#[derive(Debug, Clone, PartialEq)]
pub struct GeoNode {
    pub common: NodeCommon,
    /// Index into the objects list, -1 for none
    pub geo_id: i32,
    /// Index into the materials list, -1 for none
    pub material_id: i32,
    pub color: [f32; 4],
}

impl Default for GeoNode {
    fn default() -> Self {
        Self {
            common: NodeCommon::default(),
            geo_id: -1,
            material_id: -1,
            color: [1.0; 4],
        }
    }
}

impl Serde for GeoNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.common.ser(writer);
        self.geo_id.ser(writer);
        self.material_id.ser(writer);
        self.color.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            common: NodeCommon::de(reader)?,
            geo_id: reader.read_i32()?,
            material_id: reader.read_i32()?,
            color: Serde::de(reader)?,
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for GeoNode {
    fn const_byte_length() -> u32 {
        NodeCommon::const_byte_length() + 8 + <[f32; 4]>::const_byte_length()
    }
}

// SkinData

/// Skinning block appended to a geo record
#[derive(Debug, Clone, PartialEq)]
pub struct SkinData {
    /// Number of meaningful entries in `bind_poses`
    pub bind_pose_length: i32,
    pub root_bone_id: i32,
    pub bound_extents: [f32; 3],
    pub bound_center: [f32; 3],
    /// Row-major 4x4 matrices, always `MAX_SKIN_BONES` on the wire
    pub bind_poses: [[f32; 16]; MAX_SKIN_BONES],
    /// Object IDs of the bones, always `MAX_SKIN_BONES` on the wire
    pub bone_ids: [i32; MAX_SKIN_BONES],
}

impl Default for SkinData {
    fn default() -> Self {
        Self {
            bind_pose_length: 0,
            root_bone_id: -1,
            bound_extents: [0.0; 3],
            bound_center: [0.0; 3],
            bind_poses: [[0.0; 16]; MAX_SKIN_BONES],
            bone_ids: [-1; MAX_SKIN_BONES],
        }
    }
}

impl Serde for SkinData {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.bind_pose_length.ser(writer);
        self.root_bone_id.ser(writer);
        self.bound_extents.ser(writer);
        self.bound_center.ser(writer);
        self.bind_poses.ser(writer);
        self.bone_ids.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            bind_pose_length: reader.read_i32()?,
            root_bone_id: reader.read_i32()?,
            bound_extents: Serde::de(reader)?,
            bound_center: Serde::de(reader)?,
            bind_poses: Serde::de(reader)?,
            bone_ids: Serde::de(reader)?,
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for SkinData {
    fn const_byte_length() -> u32 {
        8 + <[f32; 3]>::const_byte_length() * 2
            + <[[f32; 16]; MAX_SKIN_BONES]>::const_byte_length()
            + <[i32; MAX_SKIN_BONES]>::const_byte_length()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkinnedGeoNode {
    pub geo: GeoNode,
    pub skin: Box<SkinData>,
}

impl Serde for SkinnedGeoNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.geo.ser(writer);
        self.skin.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            geo: GeoNode::de(reader)?,
            skin: Box::new(SkinData::de(reader)?),
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for SkinnedGeoNode {
    fn const_byte_length() -> u32 {
        GeoNode::const_byte_length() + SkinData::const_byte_length()
    }
}

// LightNode

#[derive(Debug, Clone, PartialEq)]
pub struct LightNode {
    pub common: NodeCommon,
    pub light_type: LightType,
    pub intensity: f32,
    /// Spot cone angle in degrees
    pub angle: f32,
    pub range: f32,
    pub color: [f32; 3],
}

impl Default for LightNode {
    fn default() -> Self {
        Self {
            common: NodeCommon::default(),
            light_type: LightType::Point,
            intensity: 1.0,
            angle: 30.0,
            range: 10.0,
            color: [1.0; 3],
        }
    }
}

impl Serde for LightNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.common.ser(writer);
        self.light_type.ser(writer);
        self.intensity.ser(writer);
        self.angle.ser(writer);
        self.range.ser(writer);
        self.color.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            common: NodeCommon::de(reader)?,
            light_type: LightType::de(reader)?,
            intensity: reader.read_f32()?,
            angle: reader.read_f32()?,
            range: reader.read_f32()?,
            color: Serde::de(reader)?,
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for LightNode {
    fn const_byte_length() -> u32 {
        NodeCommon::const_byte_length() + 16 + <[f32; 3]>::const_byte_length()
    }
}

// CameraNode

#[derive(Debug, Clone, PartialEq)]
pub struct CameraNode {
    pub common: NodeCommon,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub focal_dist: f32,
    pub aperture: f32,
}

impl Default for CameraNode {
    fn default() -> Self {
        Self {
            common: NodeCommon::default(),
            fov: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            focal_dist: 5.0,
            aperture: 2.8,
        }
    }
}

impl Serde for CameraNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.common.ser(writer);
        self.fov.ser(writer);
        self.aspect.ser(writer);
        self.near.ser(writer);
        self.far.ser(writer);
        self.focal_dist.ser(writer);
        self.aperture.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            common: NodeCommon::de(reader)?,
            fov: reader.read_f32()?,
            aspect: reader.read_f32()?,
            near: reader.read_f32()?,
            far: reader.read_f32()?,
            focal_dist: reader.read_f32()?,
            aperture: reader.read_f32()?,
        })
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for CameraNode {
    fn const_byte_length() -> u32 {
        NodeCommon::const_byte_length() + 24
    }
}

// SceneNode

/// One record of the flattened scene node list
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group(NodeCommon),
    Geo(GeoNode),
    SkinnedGeo(SkinnedGeoNode),
    Light(LightNode),
    Camera(CameraNode),
}

impl SceneNode {
    pub fn node_type(&self) -> NodeType {
        match self {
            SceneNode::Group(_) => NodeType::Group,
            SceneNode::Geo(_) => NodeType::Geo,
            SceneNode::SkinnedGeo(_) => NodeType::SkinnedGeo,
            SceneNode::Light(_) => NodeType::Light,
            SceneNode::Camera(_) => NodeType::Camera,
        }
    }

    pub fn common(&self) -> &NodeCommon {
        match self {
            SceneNode::Group(common) => common,
            SceneNode::Geo(geo) => &geo.common,
            SceneNode::SkinnedGeo(skinned) => &skinned.geo.common,
            SceneNode::Light(light) => &light.common,
            SceneNode::Camera(camera) => &camera.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut NodeCommon {
        match self {
            SceneNode::Group(common) => common,
            SceneNode::Geo(geo) => &mut geo.common,
            SceneNode::SkinnedGeo(skinned) => &mut skinned.geo.common,
            SceneNode::Light(light) => &mut light.common,
            SceneNode::Camera(camera) => &mut camera.common,
        }
    }

    pub fn name(&self) -> String {
        self.common().name.as_string()
    }

    pub fn child_count(&self) -> i32 {
        self.common().child_count
    }

    /// The geo part of a Geo or SkinnedGeo node
    pub fn geo(&self) -> Option<&GeoNode> {
        match self {
            SceneNode::Geo(geo) => Some(geo),
            SceneNode::SkinnedGeo(skinned) => Some(&skinned.geo),
            _ => None,
        }
    }

    pub fn geo_mut(&mut self) -> Option<&mut GeoNode> {
        match self {
            SceneNode::Geo(geo) => Some(geo),
            SceneNode::SkinnedGeo(skinned) => Some(&mut skinned.geo),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&LightNode> {
        match self {
            SceneNode::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut LightNode> {
        match self {
            SceneNode::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&CameraNode> {
        match self {
            SceneNode::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn camera_mut(&mut self) -> Option<&mut CameraNode> {
        match self {
            SceneNode::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

impl Serde for SceneNode {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.node_type().to_i32().ser(writer);
        match self {
            SceneNode::Group(common) => common.ser(writer),
            SceneNode::Geo(geo) => geo.ser(writer),
            SceneNode::SkinnedGeo(skinned) => skinned.ser(writer),
            SceneNode::Light(light) => light.ser(writer),
            SceneNode::Camera(camera) => camera.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let node_type = NodeType::try_from(reader.read_i32()?)?;
        let node = match node_type {
            NodeType::Group => SceneNode::Group(NodeCommon::de(reader)?),
            NodeType::Geo => SceneNode::Geo(GeoNode::de(reader)?),
            NodeType::SkinnedGeo => SceneNode::SkinnedGeo(SkinnedGeoNode::de(reader)?),
            NodeType::Light => SceneNode::Light(LightNode::de(reader)?),
            NodeType::Camera => SceneNode::Camera(CameraNode::de(reader)?),
        };
        Ok(node)
    }

    fn byte_length(&self) -> u32 {
        let record = match self {
            SceneNode::Group(_) => NodeCommon::const_byte_length(),
            SceneNode::Geo(_) => GeoNode::const_byte_length(),
            SceneNode::SkinnedGeo(_) => SkinnedGeoNode::const_byte_length(),
            SceneNode::Light(_) => LightNode::const_byte_length(),
            SceneNode::Camera(_) => CameraNode::const_byte_length(),
        };
        4 + record
    }
}
