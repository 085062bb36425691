//! Wavefront OBJ dump
//!
//! Writes positions, UVs and normals once and the two submeshes as the
//! groups `body` and `edge`. Indices are 1-based and shared across v/vt/vn.

use anyhow::{Context, Result};
use blade_mesh::BladeMesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `mesh` to `path` as OBJ
pub fn write_obj(path: &Path, mesh: &BladeMesh) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create OBJ: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_obj_to(&mut writer, mesh).with_context(|| format!("Failed to write OBJ: {:?}", path))?;
    writer.flush()?;
    Ok(())
}

/// Write `mesh` as OBJ text into any writer
pub fn write_obj_to<W: Write>(writer: &mut W, mesh: &BladeMesh) -> std::io::Result<()> {
    let buffers = &mesh.buffers;
    writeln!(
        writer,
        "# blade: {} vertices, {} triangles",
        buffers.vertex_count(),
        buffers.triangle_count()
    )?;

    for v in &buffers.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for uv in &buffers.uvs {
        writeln!(writer, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &buffers.normals {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for (name, indices) in [
        ("body", &buffers.triangles_body),
        ("edge", &buffers.triangles_edge),
    ] {
        if indices.is_empty() {
            continue;
        }
        writeln!(writer, "g {}", name)?;
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
            writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
    }
    Ok(())
}
