use log::{debug, warn};
use scenesync_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::{
    codec::{error::CodecError, scene_buffers::SceneBuffers, scene_category::SceneCategory},
    scene::{
        node::SceneNode,
        packages::{SceneHeader, TexturePackage},
        scene_data::SceneData,
    },
};

/// Encodes a snapshot into its six buffers
pub fn encode(scene: &SceneData) -> Result<SceneBuffers, CodecError> {
    let mut buffers = SceneBuffers::default();
    for category in SceneCategory::TRANSFER_ORDER {
        buffers.set(category, encode_category(scene, category)?);
    }
    Ok(buffers)
}

/// Encodes a single category of a snapshot
pub fn encode_category(scene: &SceneData, category: SceneCategory) -> Result<Vec<u8>, CodecError> {
    let mut writer = ByteWriter::new();
    match category {
        SceneCategory::Header => scene.header.ser(&mut writer),
        SceneCategory::Nodes => {
            for node in &scene.nodes {
                node.ser(&mut writer);
            }
        }
        SceneCategory::Objects => {
            for (record, object) in scene.objects.iter().enumerate() {
                object
                    .validate()
                    .map_err(|source| CodecError::InvalidPackage {
                        category,
                        record,
                        source,
                    })?;
                object.ser(&mut writer);
            }
        }
        SceneCategory::Characters => {
            for (record, character) in scene.characters.iter().enumerate() {
                character
                    .validate()
                    .map_err(|source| CodecError::InvalidPackage {
                        category,
                        record,
                        source,
                    })?;
                character.ser(&mut writer);
            }
        }
        SceneCategory::Textures => {
            let with_dimensions = scene.header.textures_carry_dimensions();
            for texture in &scene.textures {
                texture.ser_with(&mut writer, with_dimensions);
            }
        }
        SceneCategory::Materials => {
            for material in &scene.materials {
                material.ser(&mut writer);
            }
        }
    }
    Ok(writer.to_bytes())
}

/// Decodes six buffers into a fresh snapshot.
/// Nothing is returned unless every buffer decodes, so a failure never
/// leaves a half-built scene behind.
pub fn decode(buffers: &SceneBuffers) -> Result<SceneData, CodecError> {
    let header = decode_header(&buffers.header)?;
    let with_dimensions = header.textures_carry_dimensions();

    let mut scene = SceneData::new(header);
    scene.textures = decode_records(SceneCategory::Textures, &buffers.textures, |reader| {
        TexturePackage::de_with(reader, with_dimensions)
    })?;
    scene.objects = decode_records(SceneCategory::Objects, &buffers.objects, Serde::de)?;
    scene.characters = decode_records(SceneCategory::Characters, &buffers.characters, Serde::de)?;
    scene.materials = decode_records(SceneCategory::Materials, &buffers.materials, Serde::de)?;
    scene.nodes = decode_records(SceneCategory::Nodes, &buffers.nodes, SceneNode::de)?;

    report_inconsistencies(&scene);

    debug!(
        "Decoded scene: {} nodes, {} objects, {} characters, {} textures, {} materials",
        scene.nodes.len(),
        scene.objects.len(),
        scene.characters.len(),
        scene.textures.len(),
        scene.materials.len()
    );

    Ok(scene)
}

/// An empty header buffer stands for the default header
pub fn decode_header(bytes: &[u8]) -> Result<SceneHeader, CodecError> {
    if bytes.is_empty() {
        return Ok(SceneHeader::default());
    }
    let mut reader = ByteReader::new(bytes);
    SceneHeader::de(&mut reader).map_err(|source| CodecError::MalformedBuffer {
        category: SceneCategory::Header,
        record: 0,
        source,
    })
}

pub fn decode_nodes(bytes: &[u8]) -> Result<Vec<SceneNode>, CodecError> {
    decode_records(SceneCategory::Nodes, bytes, SceneNode::de)
}

fn decode_records<T>(
    category: SceneCategory,
    bytes: &[u8],
    mut decode_one: impl FnMut(&mut ByteReader) -> Result<T, SerdeErr>,
) -> Result<Vec<T>, CodecError> {
    let mut reader = ByteReader::new(bytes);
    let mut records = Vec::new();
    while reader.has_record() {
        let record = decode_one(&mut reader).map_err(|source| CodecError::MalformedBuffer {
            category,
            record: records.len(),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

// Invariant breaches that still leave a usable scene are logged, not fatal
fn report_inconsistencies(scene: &SceneData) {
    for (index, object) in scene.objects.iter().enumerate() {
        if let Err(error) = object.validate() {
            warn!("Object {} is inconsistent: {}", index, error);
        }
    }
    for (index, character) in scene.characters.iter().enumerate() {
        if let Err(error) = character.validate() {
            warn!("Character {} is inconsistent: {}", index, error);
        }
    }
    for (index, node) in scene.nodes.iter().enumerate() {
        if let SceneNode::Geo(geo) = node {
            let skinned_mesh = usize::try_from(geo.geo_id)
                .ok()
                .and_then(|geo_id| scene.objects.get(geo_id))
                .is_some_and(|object| object.is_skinned());
            if skinned_mesh {
                warn!(
                    "Node {} ({}) is not skinned but its mesh {} carries bone weights",
                    index,
                    node.name(),
                    geo.geo_id
                );
            }
        }
    }
    if let Err(error) = scene.parents() {
        warn!("Scene node hierarchy is inconsistent: {}", error);
    }
}
