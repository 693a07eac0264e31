use super::*;
use nom::{
    character::complete::{space0, u64 as dec_u64},
    combinator::{all_consuming, map},
    multi::many0,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult, Parser,
};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;
use std::path::Path;

// gmsh ASCII 2.2 meshes are laid out as follows:
// $MeshFormat
// version file-type data-size
// $EndMeshFormat
// (other sections, eg $PhysicalNames, are skipped)
// $Nodes
// node count
// id x y z
// --> repeats for nodes
// $EndNodes
// $Elements
// element count
// id type ntags tag... node...
// --> repeats for elements
// $EndElements
// **Note that node ids are 1-based and not necessarily contiguous**

/// Element type code of a 3-node triangle.
const TRIANGLE: u64 = 2;

/// Upper bound on the node table reserved from a declared count.
const NODE_RESERVE: usize = 1 << 16;

/// How the electrode nodes are found in the mesh.
#[derive(Copy, Clone, Debug)]
pub enum ElectrodeLookup<'a> {
    /// The geometry point number of each electrode; the mesher keeps these as node ids.
    ByPointId(&'a [usize]),
    /// Electrode coordinates, matched to the node coordinates at the precision written to the
    /// geometry description.
    ByCoordinates(&'a [Point2]),
}

/// The `$MeshFormat` fields, kept as read.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct MshHeader {
    pub version: String,
    pub file_type: String,
    pub data_size: String,
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct Node {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    /// The section plane position; the mesher's Y axis is elevation.
    pub fn pos(&self) -> Point2 {
        [self.x, self.y]
    }
}

/// A counter-clockwise triangle with its derived attributes.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct Triangle {
    /// Element id in the mesh file.
    pub element: u64,
    /// 0-based indices into the node table.
    pub nodes: [u32; 3],
    /// Physical tag.
    pub physical: u32,
    /// Elementary tag, the plane surface the triangle was meshed from.
    pub region: u32,
    pub centroid: Point2,
    pub area: f64,
}

/// The 1-based span of triangle positions holding a region.
///
/// The span bounds the region's triangles but may include triangles of other regions if the
/// region is not contiguous.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RegionRange {
    pub region: u32,
    pub first: usize,
    pub last: usize,
}

/// A triangulation read back from the mesher.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParsedMesh {
    pub header: MshHeader,
    pub nodes: Vec<Node>,
    pub triangles: Vec<Triangle>,
    pub regions: Vec<RegionRange>,
    /// 1-based node table position of each electrode, in electrode input order.
    /// An electrode that was not found in the mesh holds `None`.
    pub electrode_nodes: Vec<Option<usize>>,
    /// Number of triangles that were rewound counter-clockwise.
    pub corrected: usize,
    /// Number of non-triangle elements skipped.
    pub discarded: usize,
    pub warnings: Vec<Warning>,
}

impl ParsedMesh {
    /// Section plane position of the node at a 1-based table position.
    pub fn coordinates_at(&self, position: usize) -> Option<Point2> {
        position
            .checked_sub(1)
            .and_then(|i| self.nodes.get(i))
            .map(Node::pos)
    }

    pub fn tri_points(&self, tri: &Triangle) -> Tri {
        tri.nodes.map(|i| self.nodes[i as usize].pos())
    }
}

/// Read and parse a mesh file.
pub fn read_msh<P: AsRef<Path>>(path: P, lookup: ElectrodeLookup) -> Result<ParsedMesh> {
    let text = std::fs::read_to_string(path)?;
    parse_msh(&text, lookup)
}

/// Parse the text of a gmsh ASCII 2.2 mesh.
///
/// Only 3-node triangles are kept, other elements are counted in [`ParsedMesh::discarded`].
/// Clockwise triangles are rewound, and every triangle must have a non-zero area.
/// A node count for the electrodes that differs from the lookup is a warning, not an error.
pub fn parse_msh(text: &str, lookup: ElectrodeLookup) -> Result<ParsedMesh> {
    let mut warnings = Vec::new();
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    if lines.next() != Some("$MeshFormat") {
        return Err(Error::UnrecognizedFormat);
    }

    let header = lines
        .next()
        .map(read_header)
        .ok_or(Error::TruncatedInput {
            section: "format",
            record: 1,
        })?;
    let version = [&header.version, &header.file_type, &header.data_size]
        .map(|s| s.as_str())
        .join(" ");
    if version != crate::MSH_VERSION {
        Warning::VersionMismatch { found: version }.raise(&mut warnings);
    }
    end_of(&mut lines, "$EndMeshFormat", "format", 2)?;

    // ---- nodes
    seek(&mut lines, "$Nodes", "nodes")?;
    let count = read_count(&mut lines, "nodes")?;
    let mut nodes = Vec::with_capacity(count.min(NODE_RESERVE));
    for record in 1..=count {
        let (id, [x, y, z]) = lines
            .next()
            .and_then(|l| node_record(l).ok())
            .map(|(_, r)| r)
            .ok_or(Error::TruncatedInput {
                section: "nodes",
                record,
            })?;
        nodes.push(Node { id, x, y, z });
    }
    end_of(&mut lines, "$EndNodes", "nodes", count.saturating_add(1))?;
    log::debug!("read {} nodes", nodes.len());

    let index = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i as u32))
        .collect::<HashMap<_, _>>();

    // ---- elements
    seek(&mut lines, "$Elements", "elements")?;
    let count = read_count(&mut lines, "elements")?;
    let mut triangles = Vec::new();
    let mut discarded = 0;
    let mut corrected = 0;
    for record in 1..=count {
        let (element, kind, fields) = match lines.next().map(element_record) {
            Some(Ok((_, r))) => r,
            _ => return Err(truncated_at(record)),
        };

        if kind != TRIANGLE {
            discarded += 1;
            continue;
        }

        // fields are: ntags, tags..., nodes...
        let ntags = fields
            .first()
            .and_then(|&n| usize::try_from(n).ok())
            .ok_or_else(|| truncated_at(record))?;
        let (tags, ns) = match (fields.get(1..), ntags.checked_add(3)) {
            (Some(rest), Some(len)) if rest.len() == len => rest.split_at(ntags),
            _ => return Err(truncated_at(record)),
        };
        let tag = |t: Option<&u64>| t.map(|&t| u32::try_from(t)).transpose();
        let physical = tag(tags.first()).map_err(|_| truncated_at(record))?;
        let region = tag(tags.get(1))
            .map_err(|_| truncated_at(record))?
            .or(physical)
            .unwrap_or(0);

        let mut tri = [0u32; 3];
        for (t, &node) in tri.iter_mut().zip(ns) {
            *t = *index
                .get(&node)
                .ok_or(Error::UnknownNode { element, node })?;
        }

        let pts = tri.map(|i| nodes[i as usize].pos());
        if triangle::correct_winding(&mut tri, pts) {
            corrected += 1;
        }
        let pts = tri.map(|i| nodes[i as usize].pos());

        let area = triangle::area(pts);
        if area == 0.0 {
            return Err(Error::DegenerateMesh {
                triangle: triangles.len() + 1,
                element,
            });
        }

        triangles.push(Triangle {
            element,
            nodes: tri,
            physical: physical.unwrap_or(0),
            region,
            centroid: triangle::centroid(pts),
            area,
        });
    }
    end_of(&mut lines, "$EndElements", "elements", count.saturating_add(1))?;

    if triangles.is_empty() {
        return Err(Error::EmptyMesh);
    }
    log::debug!(
        "read {} triangles, {} rewound, {} other elements discarded",
        triangles.len(),
        corrected,
        discarded
    );

    let regions = region_ranges(&triangles, &mut warnings);
    let electrode_nodes = electrode_nodes(&nodes, &index, lookup, &mut warnings);

    log::info!(
        "parsed mesh with {} nodes and {} triangles in {} region(s)",
        nodes.len(),
        triangles.len(),
        regions.len()
    );

    Ok(ParsedMesh {
        header,
        nodes,
        triangles,
        regions,
        electrode_nodes,
        corrected,
        discarded,
        warnings,
    })
}

fn truncated_at(record: usize) -> Error {
    Error::TruncatedInput {
        section: "elements",
        record,
    }
}

/// Bounding ranges of each region, in ascending region order.
fn region_ranges(triangles: &[Triangle], warnings: &mut Vec<Warning>) -> Vec<RegionRange> {
    // region -> (first, last, count)
    let mut spans = BTreeMap::<u32, (usize, usize, usize)>::new();
    for (i, t) in triangles.iter().enumerate() {
        let pos = i + 1;
        spans
            .entry(t.region)
            .and_modify(|(_, last, n)| {
                *last = pos;
                *n += 1;
            })
            .or_insert((pos, pos, 1));
    }

    spans
        .into_iter()
        .map(|(region, (first, last, count))| {
            if last - first + 1 != count {
                Warning::NonContiguousRegion { region }.raise(warnings);
            }
            RegionRange {
                region,
                first,
                last,
            }
        })
        .collect()
}

/// Find each electrode's node, keeping one slot per electrode.
fn electrode_nodes(
    nodes: &[Node],
    index: &HashMap<u64, u32>,
    lookup: ElectrodeLookup,
    warnings: &mut Vec<Warning>,
) -> Vec<Option<usize>> {
    let found = match lookup {
        ElectrodeLookup::ByPointId(ids) => ids
            .iter()
            .map(|&id| index.get(&(id as u64)).map(|&i| i as usize + 1))
            .collect::<Vec<_>>(),
        ElectrodeLookup::ByCoordinates(pts) => {
            let key = |[x, z]: Point2| (format!("{:.2}", x), format!("{:.2}", z));
            let mut keys = HashMap::default();
            for (i, n) in nodes.iter().enumerate() {
                keys.entry(key(n.pos())).or_insert(i + 1);
            }
            pts.iter().map(|&p| keys.get(&key(p)).copied()).collect()
        }
    };

    let matched = found.iter().flatten().count();
    if matched != found.len() {
        Warning::CorrespondenceMismatch {
            expected: found.len(),
            found: matched,
        }
        .raise(warnings);
    }

    found
}

fn read_header(line: &str) -> MshHeader {
    let mut fields = line.split_whitespace().map(String::from);
    MshHeader {
        version: fields.next().unwrap_or_default(),
        file_type: fields.next().unwrap_or_default(),
        data_size: fields.next().unwrap_or_default(),
    }
}

/// Skip lines up to and including `marker`.
fn seek<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    marker: &str,
    section: &'static str,
) -> Result<()> {
    lines
        .find(|l| *l == marker)
        .map(|_| ())
        .ok_or(Error::TruncatedInput { section, record: 0 })
}

fn end_of<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    marker: &str,
    section: &'static str,
    record: usize,
) -> Result<()> {
    match lines.next() {
        Some(l) if l == marker => Ok(()),
        _ => Err(Error::TruncatedInput { section, record }),
    }
}

fn read_count<'a>(lines: &mut impl Iterator<Item = &'a str>, section: &'static str) -> Result<usize> {
    lines
        .next()
        .and_then(|l| all_consuming(ws(dec_u64))(l).ok())
        .and_then(|(_, n)| usize::try_from(n).ok())
        .ok_or(Error::TruncatedInput { section, record: 0 })
}

type Res<'a, O> = IResult<&'a str, O, ()>;

fn ws<'a, G, O>(g: G) -> impl FnMut(&'a str) -> Res<'a, O>
where
    G: Parser<&'a str, O, ()>,
{
    preceded(space0, g)
}

fn node_record(i: &str) -> Res<(u64, [f64; 3])> {
    map(
        all_consuming(terminated(
            tuple((ws(dec_u64), ws(double), ws(double), ws(double))),
            space0,
        )),
        |(id, x, y, z)| (id, [x, y, z]),
    )(i)
}

fn element_record(i: &str) -> Res<(u64, u64, Vec<u64>)> {
    all_consuming(terminated(
        tuple((ws(dec_u64), ws(dec_u64), many0(ws(dec_u64)))),
        space0,
    ))(i)
}
