//! Imports Wavefront OBJ meshes as groups of triangles.
//!
//! Only geometry is read: vertices (`v`), vertex normals (`vn`), faces (`f`)
//! and named groups (`g`). Any other statement is counted and skipped.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use ray_tracer::prelude::*;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to open the file: {0}")]
    CouldNotOpenFile(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("missing vertex at index {0}")]
    MissingVertex(usize),

    #[error("missing normal at index {0}")]
    MissingNormal(usize),

    #[error(transparent)]
    Scene(#[from] RayTracerError),
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// The result of reading one OBJ document into a [`ShapeArena`].
///
/// Triangles outside any `g` statement are children of `default_group`.
/// Named groups are top-level shapes of the arena until
/// [`into_group`](ParsedObj::into_group) gathers everything up.
#[derive(Debug, Clone)]
pub struct ParsedObj {
    pub ignored_lines: usize,
    pub vertices: Vec<Tuple>,
    pub normals: Vec<Tuple>,
    pub default_group: ShapeId,
    pub groups: Vec<(String, ShapeId)>,
}

impl ParsedObj {
    pub fn group(&self, name: &str) -> Option<ShapeId> {
        self.groups
            .iter()
            .find(|(group_name, _)| group_name == name)
            .map(|(_, id)| *id)
    }

    /// Moves every named group into the default group, in the order they were
    /// declared, and returns the default group.
    pub fn into_group(self, arena: &mut ShapeArena) -> Result<ShapeId> {
        for (_, group) in &self.groups {
            arena.add_child(self.default_group, *group)?;
        }
        Ok(self.default_group)
    }
}

/// One corner of a face: a 1-based vertex index and an optional 1-based normal index.
#[derive(Debug, Clone, Copy)]
struct FaceVertex {
    vertex: usize,
    normal: Option<usize>,
}

/// Parses OBJ text, adding its triangles to `arena` with the given material.
///
/// The whole document is read before anything is inserted, so on error the
/// arena is left as it was.
pub fn parse_obj_string(
    input: &str,
    arena: &mut ShapeArena,
    material: &Material,
) -> Result<ParsedObj> {
    let mut ignored_lines = 0;
    let mut vertices = vec![];
    let mut normals = vec![];
    // triangles of the default group, then one entry per named group
    let mut group_names: Vec<String> = vec![];
    let mut triangles: Vec<Vec<Shape>> = vec![vec![]];
    let mut current_group = 0;

    for (n, line) in input.lines().enumerate() {
        let line_no = n + 1;
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        let Some((&statement, arguments)) = tokens.split_first() else {
            continue;
        };

        match statement {
            "v" => vertices.push(parse_point(arguments, line_no)?),
            "vn" => {
                let point = parse_point(arguments, line_no)?;
                normals.push(Tuple::vector(point.x, point.y, point.z));
            }
            "f" => {
                let corners = arguments
                    .iter()
                    .map(|token| parse_face_vertex(token, line_no))
                    .collect::<Result<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(ParserError::InvalidInput(format!(
                        "Face record on line {line_no} has fewer than three vertices"
                    )));
                }
                triangles[current_group].extend(
                    fan_triangulation(&vertices, &normals, &corners)?
                        .into_iter()
                        .map(|triangle| triangle.with_material(material.clone())),
                );
            }
            "g" => {
                let name = arguments.first().ok_or_else(|| {
                    ParserError::InvalidInput(format!(
                        "Malformed named group record on line {line_no}: missing group name"
                    ))
                })?;
                current_group = match group_names.iter().position(|known| known == name) {
                    Some(index) => index + 1,
                    None => {
                        group_names.push(name.to_string());
                        triangles.push(vec![]);
                        group_names.len()
                    }
                };
            }
            _ => ignored_lines += 1,
        }
    }

    if ignored_lines > 0 {
        warn!("ignored {ignored_lines} unsupported OBJ lines");
    }
    let triangle_count = triangles.iter().map(Vec::len).sum::<usize>();
    debug!(
        "parsed OBJ: {} vertices, {} normals, {} triangles, {} named groups",
        vertices.len(),
        normals.len(),
        triangle_count,
        group_names.len()
    );

    let mut group_ids = Vec::with_capacity(triangles.len());
    for faces in triangles {
        let group = arena.insert(Shape::group());
        for triangle in faces {
            arena.insert_into(group, triangle)?;
        }
        group_ids.push(group);
    }

    Ok(ParsedObj {
        ignored_lines,
        vertices,
        normals,
        default_group: group_ids[0],
        groups: group_names.into_iter().zip(group_ids[1..].iter().copied()).collect(),
    })
}

pub fn parse_obj_file(
    path: impl AsRef<Path>,
    arena: &mut ShapeArena,
    material: &Material,
) -> Result<ParsedObj> {
    let contents = fs::read_to_string(path)?;
    parse_obj_string(&contents, arena, material)
}

fn parse_point(arguments: &[&str], line_no: usize) -> Result<Tuple> {
    let coordinates = arguments
        .iter()
        .take(3)
        .map(|value| {
            value.parse::<f64>().map_err(|_| {
                ParserError::InvalidInput(format!(
                    "Invalid vertex record on line {line_no}: {value}"
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match coordinates[..] {
        [x, y, z] => Ok(Tuple::point(x, y, z)),
        _ => Err(ParserError::InvalidInput(format!(
            "Vertex record on line {line_no} needs three coordinates"
        ))),
    }
}

/// Accepts `v`, `v/vt`, `v//vn` and `v/vt/vn`; texture indices are not used.
fn parse_face_vertex(token: &str, line_no: usize) -> Result<FaceVertex> {
    let parse_index = |value: &str| {
        value.parse::<usize>().map_err(|_| {
            ParserError::InvalidInput(format!(
                "Invalid index for face record on line {line_no}: {value}"
            ))
        })
    };

    let mut parts = token.split('/');
    let vertex = parse_index(parts.next().unwrap_or_default())?;
    let normal = match parts.nth(1) {
        Some(value) if !value.is_empty() => Some(parse_index(value)?),
        _ => None,
    };
    Ok(FaceVertex { vertex, normal })
}

/// Splits a convex polygon into triangles sharing its first vertex. Faces
/// whose every corner has a normal become smooth triangles.
fn fan_triangulation(
    vertices: &[Tuple],
    normals: &[Tuple],
    corners: &[FaceVertex],
) -> Result<Vec<Shape>> {
    let points = corners
        .iter()
        .map(|corner| lookup(vertices, corner.vertex, ParserError::MissingVertex))
        .collect::<Result<Vec<_>>>()?;
    let corner_normals = corners
        .iter()
        .map(|corner| {
            corner
                .normal
                .map(|index| lookup(normals, index, ParserError::MissingNormal))
                .transpose()
        })
        .collect::<Result<Option<Vec<_>>>>()?;

    let triangles = (1..points.len() - 1)
        .map(|i| match &corner_normals {
            Some(normals) => Shape::smooth_triangle(
                points[0],
                points[i],
                points[i + 1],
                normals[0],
                normals[i],
                normals[i + 1],
            ),
            None => Shape::triangle(points[0], points[i], points[i + 1]),
        })
        .collect();
    Ok(triangles)
}

/// OBJ indices start at 1.
fn lookup(items: &[Tuple], index: usize, missing: fn(usize) -> ParserError) -> Result<Tuple> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .copied()
        .ok_or(missing(index))
}
