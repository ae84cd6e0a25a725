//! Minimal single-pass OBJ parser: `v`, `vt`, `vn` and triangular `f pos/uv/normal`.
//!
//! Faces resolve against attributes seen *so far*, so every `v`/`vt`/`vn` a face
//! refers to must precede it in the file. Faces are expanded in file order into a
//! non-indexed vertex list (no deduplication), with `v` flipped to `1 - v`.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{AssetError, AssetResult},
    mesh::{MeshData, MeshVertex},
};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<MeshData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = load_obj_from_reader(BufReader::new(file)).map_err(|e| match e {
        AssetError::Io { source, .. } => AssetError::io(path, source),
        other => other,
    })?;

    if mesh.vertices.is_empty() {
        log::warn!("OBJ {:?} contained no faces", path);
    }
    log::info!(
        "Loaded mesh {:?} with {} tris.",
        path,
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> AssetResult<MeshData> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<MeshData> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(mut reader: R) -> AssetResult<MeshData> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();

    // Raw byte lines, decoded lossily: non-UTF-8 comments and names are still skipped.
    let mut buf = Vec::new();
    for line_no in 0.. {
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| AssetError::io("<reader>", e))?
            == 0
        {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "f" => {
                // Only triangles; anything past the third corner is ignored.
                for corner in 0..3 {
                    let token = parts.next().ok_or_else(|| {
                        AssetError::parse(
                            line_no,
                            format!("face has {} vertices, expected 3", corner),
                        )
                    })?;
                    let (vi, vti, vni) = parse_face_vertex(
                        token,
                        positions.len(),
                        texcoords.len(),
                        normals.len(),
                        line_no,
                    )?;
                    let [u, v] = texcoords[vti];
                    vertices.push(MeshVertex::new(positions[vi], [u, 1.0 - v], normals[vni]));
                }
            }
            _ if tag.starts_with('#') => {}
            _ => {
                log::warn!("Unknown OBJ directive \"{}\"", tag);
            }
        }
    }

    Ok(MeshData::new(vertices))
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> AssetResult<f32> {
    let token = value.ok_or_else(|| AssetError::parse(line_no, format!("missing {}", what)))?;
    token
        .parse::<f32>()
        .map_err(|e| AssetError::parse(line_no, format!("bad {} '{}': {}", what, token, e)))
}

/// Split `pos/uv/normal` and resolve each part to a 0-based index.
fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> AssetResult<(usize, usize, usize)> {
    let mut split = token.split('/');
    let mut next = |what: &str, len: usize| -> AssetResult<usize> {
        match split.next() {
            Some(value) if !value.is_empty() => resolve_index(value, len, line_no, what),
            _ => Err(AssetError::parse(
                line_no,
                format!("face element '{}' is missing its {} index", token, what),
            )),
        }
    };
    let pos = next("position", pos_count)?;
    let tex = next("texcoord", tex_count)?;
    let norm = next("normal", norm_count)?;
    Ok((pos, tex, norm))
}

/// 1-based positive indices; negative indices count back from the latest entry.
fn resolve_index(token: &str, len: usize, line_no: usize, what: &str) -> AssetResult<usize> {
    let raw = token
        .parse::<i64>()
        .map_err(|_| AssetError::parse(line_no, format!("invalid {} index '{}'", what, token)))?;
    if raw == 0 {
        return Err(AssetError::parse(
            line_no,
            format!("OBJ indices are 1-based; found 0 for {}", what),
        ));
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        return Err(AssetError::parse(
            line_no,
            format!("{} index {} out of bounds (len={})", what, raw, len),
        ));
    }

    Ok(idx as usize)
}
