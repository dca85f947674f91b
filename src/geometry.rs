use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, ensure};

/// Attribute stream names the renderer looks up.
pub const POSITION: &str = "POSITION";
pub const NORMAL: &str = "NORMAL";

/// A per-vertex data channel: raw bytes plus the layout metadata the buffer
/// stage forwards to the pipeline as-is. Stride and format are trusted
/// downstream, not validated.
#[derive(Debug, Clone)]
pub struct AttributeStream {
    pub data: Vec<u8>,
    pub stride: u64,
    pub format: wgpu::VertexFormat,
}

/// One mesh as produced by the geometry source: named attribute streams, a
/// 16-bit index stream, and a primitive topology tag. The record owns its
/// CPU-side bytes until teardown.
#[derive(Debug, Clone)]
pub struct MeshRecord {
    attributes: HashMap<String, AttributeStream>,
    pub indices: Vec<u16>,
    pub topology: wgpu::PrimitiveTopology,
}

impl MeshRecord {
    pub fn attribute(&self, name: &str) -> Option<&AttributeStream> {
        self.attributes.get(name)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Reads the scene file once and returns its meshes.
///
/// Never returns an empty list on success; a missing, malformed, normal-less,
/// or 16-bit-overflowing file fails the whole load with no partial results.
pub fn load_scene(path: &Path) -> anyhow::Result<Vec<MeshRecord>> {
    let (models, _) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("couldn't read the scene file {}", path.display()))?;

    let records = records_from_models(models)
        .with_context(|| format!("scene file {} is malformed", path.display()))?;

    log::info!("loaded {} mesh(es) from {}", records.len(), path.display());

    Ok(records)
}

fn records_from_models(models: Vec<tobj::Model>) -> anyhow::Result<Vec<MeshRecord>> {
    ensure!(!models.is_empty(), "scene contains no meshes");

    models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;

            ensure!(
                !mesh.positions.is_empty(),
                "mesh {:?} has no positions",
                model.name
            );
            ensure!(
                mesh.normals.len() == mesh.positions.len(),
                "mesh {:?} has no per-vertex normals",
                model.name
            );

            let indices = mesh
                .indices
                .iter()
                .map(|&index| u16::try_from(index))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("mesh {:?} overflows 16-bit indices", model.name))?;

            let mut attributes = HashMap::new();
            attributes.insert(
                POSITION.to_string(),
                AttributeStream {
                    data: bytemuck::cast_slice(&mesh.positions).to_vec(),
                    stride: 3 * std::mem::size_of::<f32>() as u64,
                    format: wgpu::VertexFormat::Float32x3,
                },
            );
            attributes.insert(
                NORMAL.to_string(),
                AttributeStream {
                    data: bytemuck::cast_slice(&mesh.normals).to_vec(),
                    stride: 3 * std::mem::size_of::<f32>() as u64,
                    format: wgpu::VertexFormat::Float32x3,
                },
            );

            Ok(MeshRecord {
                attributes,
                indices,
                topology: wgpu::PrimitiveTopology::TriangleList,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1
f 1//1 3//1 4//1
";

    fn write_scene(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_scene_produces_named_streams() {
        let path = write_scene("sphere_flight_quad.obj", QUAD_OBJ);
        let records = load_scene(&path).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        let position = record.attribute(POSITION).unwrap();
        assert_eq!(position.format, wgpu::VertexFormat::Float32x3);
        assert_eq!(position.stride, 12);
        assert!(!position.data.is_empty());
        assert!(record.attribute(NORMAL).is_some());
        assert_eq!(record.index_count(), 6);
        assert_eq!(record.topology, wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn attribute_streams_stay_in_lockstep() {
        let path = write_scene("sphere_flight_quad_lockstep.obj", QUAD_OBJ);
        let records = load_scene(&path).unwrap();
        let record = &records[0];
        assert_eq!(
            record.attribute(POSITION).unwrap().data.len(),
            record.attribute(NORMAL).unwrap().data.len()
        );
    }

    #[test]
    fn missing_scene_file_fails() {
        let err = load_scene(Path::new("does-not-exist.obj")).unwrap_err();
        assert!(format!("{err:#}").contains("does-not-exist.obj"));
    }

    #[test]
    fn mesh_without_normals_is_rejected() {
        let path = write_scene(
            "sphere_flight_no_normals.obj",
            "v 0.0 0.0 0.0\nv 1.0 0.0 0.0\nv 1.0 1.0 0.0\nf 1 2 3\n",
        );
        assert!(load_scene(&path).is_err());
    }
}
