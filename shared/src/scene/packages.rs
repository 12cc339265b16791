use scenesync_serde::{
    read_counted, read_items, write_count, write_counted, write_items, ByteReader, ByteWrite,
    Serde, SerdeErr,
};

use crate::scene::error::PackageError;

// SceneHeader

/// Session-wide constants sent ahead of every other buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHeader {
    /// Scale applied by renderers to every light intensity
    pub light_intensity_factor: f32,
    /// 1 when texture records carry width, height and format
    pub texture_binary_type: i32,
}

impl SceneHeader {
    pub fn textures_carry_dimensions(&self) -> bool {
        self.texture_binary_type == 1
    }
}

impl Default for SceneHeader {
    fn default() -> Self {
        Self {
            light_intensity_factor: 1.0,
            texture_binary_type: 0,
        }
    }
}

impl Serde for SceneHeader {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.light_intensity_factor.ser(writer);
        self.texture_binary_type.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            light_intensity_factor: reader.read_f32()?,
            texture_binary_type: reader.read_i32()?,
        })
    }

    fn byte_length(&self) -> u32 {
        8
    }
}

// ObjectPackage

/// Mesh payload, addressed by a geo node's `geo_id`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectPackage {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<i32>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Per-vertex weights, empty unless the mesh is skinned
    pub bone_weights: Vec<[f32; 4]>,
    /// Per-vertex bone slots, same length as `bone_weights`
    pub bone_indices: Vec<[i32; 4]>,
}

impl ObjectPackage {
    pub fn is_skinned(&self) -> bool {
        !self.bone_weights.is_empty()
    }

    pub fn validate(&self) -> Result<(), PackageError> {
        if self.vertices.len() != self.normals.len() {
            return Err(PackageError::NormalCountMismatch {
                vertices: self.vertices.len(),
                normals: self.normals.len(),
            });
        }
        if self.bone_weights.len() != self.bone_indices.len() {
            return Err(PackageError::BoneDataMismatch {
                weights: self.bone_weights.len(),
                indices: self.bone_indices.len(),
            });
        }
        Ok(())
    }
}

impl Serde for ObjectPackage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_counted(writer, &self.vertices);
        write_counted(writer, &self.indices);
        write_counted(writer, &self.normals);
        write_counted(writer, &self.uvs);
        // weights and indices share one count
        write_count(writer, self.bone_weights.len());
        write_items(writer, &self.bone_weights);
        write_items(writer, &self.bone_indices);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let vertices = read_counted(reader)?;
        let indices = read_counted(reader)?;
        let normals = read_counted(reader)?;
        let uvs = read_counted(reader)?;
        let bone_count = reader.read_count(32)?;
        let bone_weights = read_items(reader, bone_count)?;
        let bone_indices = read_items(reader, bone_count)?;
        Ok(Self {
            vertices,
            indices,
            normals,
            uvs,
            bone_weights,
            bone_indices,
        })
    }
}

// CharacterPackage

/// Skeleton payload for one skinned character
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacterPackage {
    /// Object IDs of the bones driving the skinned meshes
    pub bone_mapping: Vec<i32>,
    /// Object IDs of the skeleton's bones
    pub skeleton_mapping: Vec<i32>,
    /// Object ID of the root bone
    pub root_id: i32,
    pub positions: Vec<[f32; 3]>,
    pub rotations: Vec<[f32; 4]>,
    pub scales: Vec<[f32; 3]>,
}

impl CharacterPackage {
    pub fn validate(&self) -> Result<(), PackageError> {
        let bones = self.skeleton_mapping.len();
        if self.positions.len() != bones
            || self.rotations.len() != bones
            || self.scales.len() != bones
        {
            return Err(PackageError::RestPoseMismatch {
                bones,
                positions: self.positions.len(),
                rotations: self.rotations.len(),
                scales: self.scales.len(),
            });
        }
        Ok(())
    }
}

impl Serde for CharacterPackage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_count(writer, self.bone_mapping.len());
        write_count(writer, self.skeleton_mapping.len());
        self.root_id.ser(writer);
        write_items(writer, &self.bone_mapping);
        write_items(writer, &self.skeleton_mapping);
        write_items(writer, &self.positions);
        write_items(writer, &self.rotations);
        write_items(writer, &self.scales);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let bone_mapping_count = reader.read_count(4)?;
        // one mapping entry plus position, rotation and scale per skeleton bone
        let skeleton_count = reader.read_count(4 + 12 + 16 + 12)?;
        let root_id = reader.read_i32()?;
        Ok(Self {
            bone_mapping: read_items(reader, bone_mapping_count)?,
            skeleton_mapping: read_items(reader, skeleton_count)?,
            root_id,
            positions: read_items(reader, skeleton_count)?,
            rotations: read_items(reader, skeleton_count)?,
            scales: read_items(reader, skeleton_count)?,
        })
    }
}

// TexturePackage

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TexturePackage {
    pub width: i32,
    pub height: i32,
    pub format: i32,
    pub data: Vec<u8>,
}

impl TexturePackage {
    /// Texture records only carry dimensions when the header says so,
    /// so they cannot implement `Serde` on their own
    pub fn ser_with(&self, writer: &mut dyn ByteWrite, with_dimensions: bool) {
        if with_dimensions {
            self.width.ser(writer);
            self.height.ser(writer);
            self.format.ser(writer);
        }
        write_count(writer, self.data.len());
        writer.write_bytes(&self.data);
    }

    pub fn de_with(reader: &mut ByteReader, with_dimensions: bool) -> Result<Self, SerdeErr> {
        let (width, height, format) = if with_dimensions {
            (reader.read_i32()?, reader.read_i32()?, reader.read_i32()?)
        } else {
            (0, 0, 0)
        };
        let size = reader.read_count(1)?;
        let data = reader.read_bytes(size)?.to_vec();
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }
}

// MaterialPackage

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialPackage {
    pub material_type: i32,
    pub name: String,
    /// Shader or resource the material is built from
    pub src: String,
    pub texture_ids: Vec<i32>,
    pub property_ids: Vec<i32>,
}

fn write_string(writer: &mut dyn ByteWrite, value: &str) {
    write_count(writer, value.len());
    writer.write_bytes(value.as_bytes());
}

fn read_string(reader: &mut ByteReader) -> Result<String, SerdeErr> {
    let length = reader.read_count(1)?;
    let bytes = reader.read_bytes(length)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

impl Serde for MaterialPackage {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.material_type.ser(writer);
        write_string(writer, &self.name);
        write_string(writer, &self.src);
        write_counted(writer, &self.texture_ids);
        write_counted(writer, &self.property_ids);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            material_type: reader.read_i32()?,
            name: read_string(reader)?,
            src: read_string(reader)?,
            texture_ids: read_counted(reader)?,
            property_ids: read_counted(reader)?,
        })
    }
}
