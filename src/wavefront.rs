//! Wavefront OBJ export.

use std::io::Write;
use std::path::Path;

use obj::{Group, IndexTuple, ObjData, ObjMaterial, Object, SimplePolygon};

use crate::error::ExportError;
use crate::mesh::Mesh;
use crate::surface::triangles_from_surface;
use crate::triangle::Attributes;

impl Mesh {
    /// Writes the mesh as a single OBJ object with one group per surface.
    ///
    /// Corners are written unshared. UVs and normals are only written for
    /// surfaces that carry them; material names become `usemtl` references.
    pub fn write_obj(&self, out: &mut impl Write) -> Result<(), ExportError> {
        let mut data = ObjData::default();
        let mut groups = Vec::with_capacity(self.surface_count());

        for (index, surface) in self.surfaces().iter().enumerate() {
            let triangles = triangles_from_surface(surface, None);
            let mut polys = Vec::with_capacity(triangles.len());

            for tri in &triangles {
                let corners = (0..3).map(|corner| {
                    let position = data.position.len();
                    data.position.push(tri.vertices[corner].to_array());

                    let texture = tri.has(Attributes::UV).then(|| {
                        data.texture.push(tri.uvs[corner].to_array());
                        data.texture.len() - 1
                    });
                    let normal = tri.has(Attributes::NORMAL).then(|| {
                        data.normal.push(tri.normals[corner].to_array());
                        data.normal.len() - 1
                    });

                    IndexTuple(position, texture, normal)
                });
                polys.push(SimplePolygon(corners.collect()));
            }

            let name = match &surface.material {
                Some(material) => material.name.clone(),
                None => format!("surface{index}"),
            };

            groups.push(Group {
                name,
                index: 0,
                material: surface
                    .material
                    .as_ref()
                    .map(|material| ObjMaterial::Ref(material.name.clone())),
                polys,
            });
        }

        data.objects = vec![Object {
            name: self.name().to_string(),
            groups,
        }];

        data.write_to_buf(out)?;
        Ok(())
    }

    /// Writes the mesh to an OBJ file at `path`, replacing it if present.
    pub fn to_obj_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_obj(&mut file)?;
        file.flush()?;
        Ok(())
    }
}
