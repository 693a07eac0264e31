//! Geometry description (`.geo`) builder.
//!
//! A half-space survey is described as two plane surfaces: a fine mesh region bounded by the
//! surface topography above and a smoothed base below, and a coarse background (Neumann) region
//! wrapping around it. Boreholes, buried electrodes, polygons and boundaries are embedded into
//! the fine mesh region.
//!
//! Points and lines are numbered from 1 in the order they are written, and the numbering is part
//! of the output: the mesher gives geometry points the same node numbers, which is how electrodes
//! are found in the mesh.
use crate::*;
use std::{fmt::Display, io};

/// The geometry description of a survey, ready to hand to the mesher.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GeoDescription {
    /// The description text.
    pub text: String,
    /// The point number of each electrode, in electrode input order.
    pub electrode_nodes: Vec<usize>,
    /// The characteristic length that was used.
    pub characteristic_length: f64,
    /// The depth of investigation that was used (zero for a whole space).
    pub depth_of_investigation: f64,
    pub warnings: Vec<Warning>,
}

impl GeoDescription {
    /// Write the description text to `sink`.
    pub fn write_to<W: io::Write>(&self, mut sink: W) -> io::Result<()> {
        sink.write_all(self.text.as_bytes())?;
        sink.flush()
    }
}

/// Build the half-space description and write it to `sink`.
///
/// Nothing is written if building fails.
pub fn build_to<W: io::Write>(
    electrodes: &Electrodes,
    aux: &AuxGeometry,
    opts: &BuildOptions,
    sink: W,
) -> Result<GeoDescription> {
    let geo = build(electrodes, aux, opts)?;
    geo.write_to(sink)?;
    Ok(geo)
}

/// A point of the surface chain.
#[derive(Copy, Clone, Debug, PartialEq)]
struct SurfacePoint {
    pos: Point2,
    electrode: bool,
}

/// Build the half-space geometry description.
///
/// See the [module documentation](self) for the layout of the domain.
pub fn build(
    electrodes: &Electrodes,
    aux: &AuxGeometry,
    opts: &BuildOptions,
) -> Result<GeoDescription> {
    if electrodes.is_empty() {
        return Err(Error::InvalidGeometry("at least one electrode is required"));
    }
    if opts.smoothing_window % 2 == 0 {
        return Err(Error::InvalidGeometry("smoothing window must be odd"));
    }

    let mut warnings = Vec::new();
    let all = electrodes.extents();
    let surface_elecs = electrodes.with_role(Role::Surface).collect::<Vec<_>>();
    let has_borehole = electrodes.has_role(|r| matches!(r, Role::Borehole(_)));
    let has_buried = electrodes.has_role(|r| r == Role::Buried);

    let topo = match aux.surface() {
        Some(s) => s.to_vec(),
        None if surface_elecs.is_empty() => {
            let elevation = all.max[1] + opts.elevation_offset;
            Warning::SynthesizedTopography { elevation }.raise(&mut warnings);
            vec![[all.min[0], elevation], [all.max[0], elevation]]
        }
        // the surface electrodes make the topography, extended below
        None => Vec::new(),
    };

    let spacing = electrode_spacing(electrodes, &surface_elecs);
    log::debug!("mean electrode spacing: {}", spacing);

    let mut surface = topo
        .iter()
        .map(|&pos| SurfacePoint {
            pos,
            electrode: false,
        })
        .chain(surface_elecs.iter().map(|&pos| SurfacePoint {
            pos,
            electrode: true,
        }))
        .collect::<Vec<_>>();

    extend_ends(
        &mut surface,
        &surface_elecs,
        all,
        spacing * opts.extension_factor,
    );

    let surface_ext = surface.iter().map(|p| p.pos).collect::<Extents2>();
    if !surface_ext.strictly_contains_x(&all) {
        return Err(Error::GeometryOutOfBounds {
            electrode_min: all.min[0],
            electrode_max: all.max[0],
            surface_min: surface_ext.min[0],
            surface_max: surface_ext.max[0],
        });
    }

    // stable, so ties keep scan order
    surface.sort_by(|a, b| a.pos[0].total_cmp(&b.pos[0]));

    let dups = surface
        .windows(2)
        .filter(|w| w[0].pos == w[1].pos)
        .map(|w| w[0].pos)
        .collect::<Vec<_>>();
    if !dups.is_empty() {
        Warning::DuplicatePoints { points: dups }.raise(&mut warnings);
    }

    let doi = opts
        .depth_of_investigation
        .unwrap_or_else(|| all.max[1] - (all.min[1] - all.width() / 2.0))
        .abs();

    let cl = opts.characteristic_length.unwrap_or_else(|| {
        let z: Vec<f64> = electrodes.positions().map(|p| p[1]).collect();
        let z_spacing = numeric::usable(numeric::mean_abs_diff(&z));
        match z_spacing {
            Some(s) if has_borehole || has_buried => s / 2.0,
            _ => spacing / 2.0,
        }
    });
    log::debug!("depth of investigation: {}, characteristic length: {}", doi, cl);

    let mut w = GeoWriter::default();
    w.comment("Geometry description of a 2D half-space survey with topography and electrodes");
    w.param("cl", cl, "characteristic length of the fine mesh region");

    // ---- surface chain
    w.blank();
    w.comment("Surface points");
    let surface_ids = surface
        .iter()
        .map(|p| {
            let tag = if p.electrode {
                "electrode"
            } else {
                "topography point"
            };
            w.point(p.pos.with_y(0.0), "cl", tag)
        })
        .collect::<Vec<_>>();

    w.comment("Lines between the surface points");
    let surface_lines = chain_lines(&mut w, &surface_ids, None);

    // ---- base of fine mesh region
    let cl_factor = if has_borehole {
        1.0
    } else {
        opts.coarseness_factor
    };
    let base = fine_mesh_base(&surface, doi, opts.smoothing_window);

    let lowest = all.min[1];
    let base_max = base.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    if base_max > lowest {
        return Err(Error::InvalidDepth {
            base_max,
            electrode_min: lowest,
        });
    }

    w.comment("Base of the fine mesh region");
    let base_cl = format!("cl*{:.2}", cl_factor);
    let base_ids = base
        .iter()
        .map(|&p| w.point(p.with_y(0.0), &base_cl, "base of fine mesh region"))
        .collect::<Vec<_>>();
    let base_lines = chain_lines(&mut w, &base_ids, None);

    w.comment("Vertical lines closing the ends of the fine mesh region");
    let (first_surf, last_surf) = (surface_ids[0], surface_ids[surface_ids.len() - 1]);
    let (first_base, last_base) = (base_ids[0], base_ids[base_ids.len() - 1]);
    let left = w.line(first_surf, first_base, None);
    let right = w.line(last_surf, last_base, None);

    let fine_loop = std::iter::once(left as isize)
        .chain(base_lines.iter().map(|&l| l as isize))
        .chain(std::iter::once(-(right as isize)))
        .chain(surface_lines.iter().rev().map(|&l| -(l as isize)))
        .collect::<Vec<_>>();
    w.line_loop(1, &fine_loop);
    w.plane_surface(1, 1, "fine mesh region");

    // ---- background region
    let flank = spacing * opts.flank_factor;
    let bottom = base.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min) - flank;
    let first = surface[0].pos;
    let last = surface[surface.len() - 1].pos;

    w.blank();
    w.comment("Background (Neumann) region");
    w.param(
        "cl2",
        cl * opts.background_factor,
        "characteristic length of the background region",
    );
    let lu = w.point([first[0] - flank, first[1], 0.0], "cl2", "far left upper point");
    let ll = w.point([first[0] - flank, bottom, 0.0], "cl2", "far left lower point");
    let ru = w.point([last[0] + flank, last[1], 0.0], "cl2", "far right upper point");
    let rl = w.point([last[0] + flank, bottom, 0.0], "cl2", "far right lower point");

    w.comment("Lines around the background region, counter-clockwise");
    let background_lines = [
        w.line(first_surf, lu, None),
        w.line(lu, ll, None),
        w.line(ll, rl, None),
        w.line(rl, ru, None),
        w.line(ru, last_surf, None),
    ];
    let coarse_loop = background_lines
        .iter()
        .map(|&l| l as isize)
        .chain(std::iter::once(right as isize))
        .chain(base_lines.iter().rev().map(|&l| -(l as isize)))
        .chain(std::iter::once(-(left as isize)))
        .collect::<Vec<_>>();
    w.line_loop(2, &coarse_loop);
    w.plane_surface(2, 2, "background region");
    w.physical_surface(1, &[1, 2]);

    // ---- electrodes embedded in the fine mesh region
    let mut placed = surface
        .iter()
        .zip(&surface_ids)
        .filter(|(p, _)| p.electrode)
        .map(|(p, &id)| (p.pos, id))
        .collect::<Vec<_>>();

    let (boreholes, skipped) = electrodes.borehole_numbers();
    for index in skipped {
        Warning::SkippedGeometry {
            kind: "borehole",
            index,
        }
        .raise(&mut warnings);
    }
    if !boreholes.is_empty() {
        w.blank();
        w.comment("Boreholes");
    }
    for n in boreholes {
        let pts = electrodes.with_role(Role::Borehole(n)).collect::<Vec<_>>();
        w.comment(format!("electrode string of borehole {}", n));
        let tag = format!("borehole {} electrode", n);
        let ids = pts
            .iter()
            .map(|&p| w.point(p.with_y(0.0), "cl", &tag))
            .collect::<Vec<_>>();
        let seg = format!("borehole {} segment", n);
        let lines = chain_lines(&mut w, &ids, Some(&seg));
        if lines.is_empty() {
            w.points_in_surface(&ids, 1);
        } else {
            w.lines_in_surface(&lines, 1);
        }
        placed.extend(pts.into_iter().zip(ids));
    }

    if has_buried {
        w.blank();
        w.comment("Buried electrodes");
        let pts = electrodes.with_role(Role::Buried).collect::<Vec<_>>();
        let ids = pts
            .iter()
            .enumerate()
            .map(|(k, &p)| w.point(p.with_y(0.0), "cl", format!("buried electrode {}", k + 1)))
            .collect::<Vec<_>>();
        w.points_in_surface(&ids, 1);
        placed.extend(pts.into_iter().zip(ids));
    }

    let mut planes = 2;
    embed_aux(&mut w, aux, &mut planes, &mut warnings);
    w.blank();
    w.comment("End of description");

    let electrode_nodes = correspondence(electrodes, &placed)?;

    log::info!(
        "built geometry description with {} points and {} lines",
        w.points,
        w.lines
    );

    Ok(GeoDescription {
        text: w.out,
        electrode_nodes,
        characteristic_length: cl,
        depth_of_investigation: doi,
        warnings,
    })
}

/// Build a whole-space description: a padded rectangle around the electrodes inside a much
/// larger background rectangle, with every electrode embedded as a point.
///
/// Electrode roles are ignored.
pub fn build_whole_space(
    electrodes: &Electrodes,
    aux: &AuxGeometry,
    opts: &WholeSpaceOptions,
) -> Result<GeoDescription> {
    if electrodes.is_empty() {
        return Err(Error::InvalidGeometry("at least one electrode is required"));
    }

    let mut warnings = Vec::new();
    let cl = opts.characteristic_length;
    let ext = electrodes.extents();
    // a flat or vertical survey borrows the other extent so the rectangles have area
    let span = match (ext.width(), ext.height()) {
        (w, h) if w > 0.0 && h > 0.0 => [w, h],
        (w, _) if w > 0.0 => [w, w],
        (_, h) if h > 0.0 => [h, h],
        _ => [1.0, 1.0],
    };
    let fine = ext.expand(span.scale(opts.padding_percent / 100.0));
    let outer = fine.expand(span.scale(opts.flank_factor));

    let mut w = GeoWriter::default();
    w.comment("Geometry description of a 2D whole-space survey");
    w.param("cl", cl, "characteristic length of the fine mesh region");

    w.blank();
    w.comment("Fine mesh region");
    let fine_ids = rectangle(&mut w, fine, "cl");
    let fine_lines = ring_lines(&mut w, &fine_ids);

    w.blank();
    w.comment("Background (Neumann) region");
    w.param(
        "cl2",
        cl * opts.background_factor,
        "characteristic length of the background region",
    );
    let outer_ids = rectangle(&mut w, outer, "cl2");
    let outer_lines = ring_lines(&mut w, &outer_ids);
    let outer_loop = outer_lines.iter().map(|&l| l as isize).collect::<Vec<_>>();
    w.line_loop(2, &outer_loop);
    w.plane_surface(1, 2, "whole space");
    w.lines_in_surface(&fine_lines, 1);
    w.physical_surface(1, &[1]);

    w.blank();
    w.comment("Electrodes");
    let electrode_nodes = electrodes
        .positions()
        .enumerate()
        .map(|(k, p)| {
            let id = w.point(p.with_y(0.0), "cl", format!("electrode {}", k + 1));
            w.points_in_surface(&[id], 1);
            id
        })
        .collect::<Vec<_>>();

    let mut planes = 1;
    embed_aux(&mut w, aux, &mut planes, &mut warnings);
    w.blank();
    w.comment("End of description");

    log::info!(
        "built whole-space description with {} points and {} lines",
        w.points,
        w.lines
    );

    Ok(GeoDescription {
        text: w.out,
        electrode_nodes,
        characteristic_length: cl,
        depth_of_investigation: 0.0,
        warnings,
    })
}

/// Mean spacing of the surface electrodes along X, falling back to the distinct X positions of
/// all electrodes, then the Z steps between electrodes, then unity.
fn electrode_spacing(electrodes: &Electrodes, surface_elecs: &[Point2]) -> f64 {
    let mut xs = surface_elecs.iter().map(|p| p[0]).collect::<Vec<_>>();
    xs.sort_by(f64::total_cmp);
    let all_x = electrodes.positions().map(|p| p[0]).collect::<Vec<_>>();
    let all_z = electrodes.positions().map(|p| p[1]).collect::<Vec<_>>();

    numeric::usable(numeric::mean_diff(xs))
        .or_else(|| numeric::usable(numeric::mean_unique_spacing(&all_x)))
        .or_else(|| numeric::usable(numeric::mean_abs_diff(&all_z)))
        .unwrap_or(1.0)
}

/// Push a topography point past either end of the surface chain when an electrode sits at the
/// extreme X, so the fine mesh region strictly spans the electrodes.
fn extend_ends(surface: &mut Vec<SurfacePoint>, surface_elecs: &[Point2], all: Extents2, by: f64) {
    // the electrodes that must be covered
    let (emin, emax) = if surface_elecs.is_empty() {
        (all.min[0], all.max[0])
    } else {
        let e = surface_elecs.iter().copied().collect::<Extents2>();
        (e.min[0], e.max[0])
    };

    let ext = surface.iter().map(|p| p.pos).collect::<Extents2>();
    let left = (emin == ext.min[0])
        .then(|| end_z(surface, emin))
        .flatten()
        .map(|z| [emin - by, z]);
    let right = (emax == ext.max[0])
        .then(|| end_z(surface, emax))
        .flatten()
        .map(|z| [emax + by, z]);

    surface.extend(left.into_iter().chain(right).map(|pos| SurfacePoint {
        pos,
        electrode: false,
    }));
}

/// Elevation of the surface at `x`, preferring an electrode when several points share it.
fn end_z(surface: &[SurfacePoint], x: f64) -> Option<f64> {
    let at = || surface.iter().filter(move |p| p.pos[0] == x);
    at().find(|p| p.electrode)
        .or_else(|| at().next())
        .map(|p| p.pos[1])
}

/// The smoothed base of the fine mesh region: every second surface point, lowered by the depth of
/// investigation and smoothed with a centred moving average.
fn fine_mesh_base(surface: &[SurfacePoint], doi: f64, window: usize) -> Vec<Point2> {
    let decimated = surface.iter().step_by(2).map(|p| p.pos).collect::<Vec<_>>();
    let lowered = decimated.iter().map(|p| p[1] - doi).collect::<Vec<_>>();
    let smoothed = numeric::moving_average(&lowered, window);

    let mut base = decimated
        .iter()
        .zip(smoothed)
        .map(|(p, z)| [p[0], z])
        .collect::<Vec<_>>();

    // decimation drops the last point of an even length chain, put one beneath it
    if surface.len() % 2 == 0 {
        if let Some(last) = surface.last() {
            base.push([last.pos[0], last.pos[1] - doi]);
        }
    }

    base
}

/// Write polygons then boundaries, each embedded in the first plane surface.
fn embed_aux(w: &mut GeoWriter, aux: &AuxGeometry, planes: &mut usize, warnings: &mut Vec<Warning>) {
    let (polygons, skipped) = aux.polygons();
    for index in skipped {
        Warning::SkippedGeometry {
            kind: "polygon",
            index,
        }
        .raise(warnings);
    }

    w.blank();
    w.comment("Polygons");
    for (n, polygon) in &polygons {
        w.comment(format!("vertices of polygon {}", n));
        let ids = polygon
            .pts()
            .iter()
            .map(|&p| w.point(p, "cl", "polygon vertex"))
            .collect::<Vec<_>>();
        let lines = ring_lines(w, &ids);
        // a polygon loop and surface upsets the mesher, so they are reserved but not declared
        w.lines += 1;
        *planes += 1;
        let reserved = w.lines;
        w.comment(format!("Line Loop({}) = {{{}}};", reserved, list(&lines)));
        w.comment(format!("Plane Surface({}) = {{{}}};", planes, reserved));
        w.lines_in_surface(&lines, 1);
    }
    log::debug!("{} polygon(s) added", polygons.len());

    let (boundaries, skipped) = aux.boundaries();
    for index in skipped {
        Warning::SkippedGeometry {
            kind: "boundary",
            index,
        }
        .raise(warnings);
    }

    w.blank();
    w.comment("Boundaries");
    for (n, boundary) in &boundaries {
        w.comment(format!("vertices of boundary {}", n));
        let ids = boundary
            .pts()
            .iter()
            .map(|&p| w.point(p, "cl", "boundary vertex"))
            .collect::<Vec<_>>();
        let lines = chain_lines(w, &ids, None);
        w.lines_in_surface(&lines, 1);
    }
    log::debug!("{} boundary(ies) added", boundaries.len());
}

/// Resolve the point number of each input electrode from the placed electrode points.
fn correspondence(electrodes: &Electrodes, placed: &[(Point2, usize)]) -> Result<Vec<usize>> {
    if placed.len() != electrodes.len() {
        return Err(Error::CorrespondenceMismatch {
            expected: electrodes.len(),
            found: placed.len(),
        });
    }

    let nodes = electrodes
        .positions()
        .filter_map(|e| placed.iter().find(|(p, _)| *p == e).map(|(_, id)| *id))
        .collect::<Vec<_>>();

    if nodes.len() != electrodes.len() {
        return Err(Error::CorrespondenceMismatch {
            expected: electrodes.len(),
            found: nodes.len(),
        });
    }

    Ok(nodes)
}

/// Lines joining consecutive points, returning the line numbers.
fn chain_lines(w: &mut GeoWriter, ids: &[usize], tag: Option<&str>) -> Vec<usize> {
    ids.windows(2).map(|p| w.line(p[0], p[1], tag)).collect()
}

/// Lines joining consecutive points and the last back to the first.
fn ring_lines(w: &mut GeoWriter, ids: &[usize]) -> Vec<usize> {
    ids.iter()
        .zip(ids.iter().cycle().skip(1))
        .map(|(&a, &b)| w.line(a, b, None))
        .collect()
}

/// The four corners of the extents, clockwise from the top right.
fn rectangle(w: &mut GeoWriter, e: Extents2, cl: &str) -> [usize; 4] {
    let [x0, z0] = e.min;
    let [x1, z1] = e.max;
    [[x1, z1], [x1, z0], [x0, z0], [x0, z1]].map(|p| w.point(p.with_y(0.0), cl, "corner"))
}

fn list<T: Display>(xs: impl IntoIterator<Item = T>) -> String {
    xs.into_iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes geometry entities and keeps the running point and line numbers.
#[derive(Default)]
struct GeoWriter {
    out: String,
    points: usize,
    lines: usize,
}

impl GeoWriter {
    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn comment(&mut self, c: impl Display) {
        self.out.push_str(&format!("//{}\n", c));
    }

    fn param(&mut self, name: &str, value: f64, c: &str) {
        self.out
            .push_str(&format!("{}={:.2};//{}\n", name, value, c));
    }

    fn point(&mut self, [x, z, y]: Point3, cl: &str, tag: impl Display) -> usize {
        self.points += 1;
        self.out.push_str(&format!(
            "Point({}) = {{{:.2},{:.2},{:.2},{}}};//{}\n",
            self.points, x, z, y, cl, tag
        ));
        self.points
    }

    fn line(&mut self, a: usize, b: usize, tag: Option<&str>) -> usize {
        self.lines += 1;
        self.out
            .push_str(&format!("Line({}) = {{{},{}}};", self.lines, a, b));
        if let Some(tag) = tag {
            self.out.push_str(&format!("//{}", tag));
        }
        self.out.push('\n');
        self.lines
    }

    fn line_loop(&mut self, id: usize, lines: &[isize]) {
        self.out
            .push_str(&format!("Line Loop({}) = {{{}}};\n", id, list(lines)));
    }

    fn plane_surface(&mut self, id: usize, line_loop: usize, c: &str) {
        self.out.push_str(&format!(
            "Plane Surface({}) = {{{}}};//{}\n",
            id, line_loop, c
        ));
    }

    fn physical_surface(&mut self, id: usize, surfaces: &[usize]) {
        self.out.push_str(&format!(
            "Physical Surface({}) = {{{}}};\n",
            id,
            list(surfaces)
        ));
    }

    fn lines_in_surface(&mut self, lines: &[usize], surface: usize) {
        if !lines.is_empty() {
            self.out
                .push_str(&format!("Line{{{}}} In Surface{{{}}};\n", list(lines), surface));
        }
    }

    fn points_in_surface(&mut self, points: &[usize], surface: usize) {
        if !points.is_empty() {
            self.out.push_str(&format!(
                "Point{{{}}} In Surface{{{}}};\n",
                list(points),
                surface
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_line() -> Electrodes {
        Electrodes::new(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0; 5]).unwrap()
    }

    fn count(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.starts_with(prefix)).count()
    }

    /// Coordinates of each `Point(n)` declaration, indexed by `n - 1`.
    fn declared_points(text: &str) -> Vec<Point2> {
        text.lines()
            .filter(|l| l.starts_with("Point("))
            .map(|l| {
                let inner = &l[l.find('{').unwrap() + 1..l.find('}').unwrap()];
                let mut f = inner.split(',').map(|s| s.trim().parse::<f64>().unwrap());
                [f.next().unwrap(), f.next().unwrap()]
            })
            .collect()
    }

    #[test]
    fn flat_survey() {
        let geo = build(&flat_line(), &AuxGeometry::new(), &BuildOptions::default()).unwrap();
        let t = &geo.text;

        assert_eq!(count(t, "Physical Surface("), 1);
        assert!(t.contains("Physical Surface(1) = {1, 2};"));
        assert_eq!(count(t, "Plane Surface("), 2);
        assert_eq!(count(t, "Line Loop("), 2);

        // the surface is extended 5 spacings beyond each end electrode
        assert!(t.contains("Point(1) = {-5.00,0.00,0.00,cl};//topography point"));
        assert!(t.contains("Point(2) = {0.00,0.00,0.00,cl};//electrode"));
        assert!(t.contains("Point(7) = {9.00,0.00,0.00,cl};//topography point"));

        assert_eq!(geo.electrode_nodes, vec![2, 3, 4, 5, 6]);
        assert_eq!(geo.depth_of_investigation, 2.0);
        assert_eq!(geo.characteristic_length, 0.5);
        assert!(geo.warnings.is_empty());
    }

    #[test]
    fn fine_mesh_loop_is_closed() {
        let geo = build(&flat_line(), &AuxGeometry::new(), &BuildOptions::default()).unwrap();
        let t = &geo.text;

        // 7 surface points -> 6 lines; 4 base points -> 3 lines; 2 connectors
        assert!(t.contains("Line(10) = {1,8};"));
        assert!(t.contains("Line(11) = {7,11};"));
        assert!(t.contains("Line Loop(1) = {10, 7, 8, 9, -11, -6, -5, -4, -3, -2, -1};"));
        assert!(t.contains("Line Loop(2) = {12, 13, 14, 15, 16, 11, -9, -8, -7, -10};"));
    }

    #[test]
    fn unsorted_electrodes_keep_input_order() {
        let x = [3.0, 0.0, 4.0, 1.0, 2.0];
        let e = Electrodes::new(&x, &[0.5, 0.0, 0.25, 0.0, 1.0]).unwrap();
        let geo = build(&e, &AuxGeometry::new(), &BuildOptions::default()).unwrap();

        let pts = declared_points(&geo.text);
        assert_eq!(geo.electrode_nodes.len(), e.len());
        for (node, p) in geo.electrode_nodes.iter().zip(e.positions()) {
            assert_eq!(pts[node - 1], p);
        }
    }

    #[test]
    fn topography_must_cover_electrodes() {
        let aux = AuxGeometry::new().with(Feature::surface(&[1.0, 10.0], &[0.0, 0.0]).unwrap());
        let e = Electrodes::new(&[0.0, 2.0], &[-1.0, -1.0])
            .unwrap()
            .with_roles(&[Role::Buried, Role::Buried])
            .unwrap();
        let r = build(&e, &aux, &BuildOptions::default());
        assert!(matches!(r, Err(Error::GeometryOutOfBounds { .. })));
    }

    #[test]
    fn shallow_depth_fails() {
        let opts = BuildOptions {
            depth_of_investigation: Some(0.5),
            ..Default::default()
        };
        let e = Electrodes::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 0.0, -1.0, 0.0]).unwrap();
        let r = build(&e, &AuxGeometry::new(), &opts);
        assert!(matches!(r, Err(Error::InvalidDepth { .. })));
    }

    #[test]
    fn buried_only_synthesizes_topography() {
        let e = Electrodes::new(&[0.0, 2.0, 4.0], &[-1.0, -2.0, -1.0])
            .unwrap()
            .with_roles(&[Role::Buried; 3])
            .unwrap();
        let geo = build(&e, &AuxGeometry::new(), &BuildOptions::default()).unwrap();

        assert_eq!(
            geo.warnings,
            vec![Warning::SynthesizedTopography { elevation: 0.0 }]
        );
        assert!(geo.text.contains("Point{"));
        assert!(geo.text.contains("} In Surface{1};"));
        assert!(geo.text.contains("//buried electrode 3"));

        let pts = declared_points(&geo.text);
        for (node, p) in geo.electrode_nodes.iter().zip(e.positions()) {
            assert_eq!(pts[node - 1], p);
        }
    }

    #[test]
    fn boreholes_and_buried() {
        let x = [-2.0, 10.0, 0.0, 0.0, 0.0, 5.0];
        let z = [0.0, 0.0, -1.0, -2.0, -3.0, -1.5];
        let roles = [
            Role::Surface,
            Role::Surface,
            Role::Borehole(1),
            Role::Borehole(1),
            Role::Borehole(1),
            Role::Buried,
        ];
        let e = Electrodes::new(&x, &z).unwrap().with_roles(&roles).unwrap();
        let opts = BuildOptions {
            depth_of_investigation: Some(10.0),
            ..Default::default()
        };
        let geo = build(&e, &AuxGeometry::new(), &opts).unwrap();
        let t = &geo.text;

        assert_eq!(count(t, "Line{"), 1);
        assert!(t.contains("//borehole 1 segment"));
        assert!(t.contains("//buried electrode 1"));
        // no coarsening below the fine mesh region with boreholes
        assert!(t.contains("cl*1.00};"));

        let pts = declared_points(t);
        for (node, p) in geo.electrode_nodes.iter().zip(e.positions()) {
            assert_eq!(pts[node - 1], p);
        }
    }

    #[test]
    fn borehole_gap_is_a_mismatch() {
        let e = Electrodes::new(&[0.0, 1.0, 2.0, 1.0], &[0.0, 0.0, 0.0, -1.0])
            .unwrap()
            .with_roles(&[Role::Surface, Role::Surface, Role::Surface, Role::Borehole(2)])
            .unwrap();
        let opts = BuildOptions {
            depth_of_investigation: Some(5.0),
            ..Default::default()
        };
        let r = build(&e, &AuxGeometry::new(), &opts);
        assert!(matches!(
            r,
            Err(Error::CorrespondenceMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn duplicate_points_warn_and_keep() {
        let aux = AuxGeometry::new()
            .with(Feature::surface(&[-5.0, 1.0, 9.0], &[0.0, 0.0, 0.0]).unwrap());
        let geo = build(&flat_line(), &aux, &BuildOptions::default()).unwrap();

        assert_eq!(
            geo.warnings,
            vec![Warning::DuplicatePoints {
                points: vec![[1.0, 0.0]]
            }]
        );
        // topography is scanned first, so wins the tie
        assert!(geo.text.contains("Point(3) = {1.00,0.00,0.00,cl};//topography point"));
        assert!(geo.text.contains("Point(4) = {1.00,0.00,0.00,cl};//electrode"));
        assert_eq!(geo.electrode_nodes, vec![2, 4, 5, 6, 7]);
    }

    #[test]
    fn polygons_and_boundaries() {
        let aux = AuxGeometry::new()
            .with(Feature::polygon(1, &[0.5, 1.5, 1.5], &[-0.5, -0.5, -1.0], None).unwrap())
            .with(Feature::boundary(1, &[0.0, 4.0], &[-1.5, -1.5], None).unwrap())
            .with(Feature::boundary(3, &[0.0, 4.0], &[-1.0, -1.0], None).unwrap());
        let geo = build(&flat_line(), &aux, &BuildOptions::default()).unwrap();
        let t = &geo.text;

        assert_eq!(t.matches("//polygon vertex").count(), 3);
        assert_eq!(t.matches("//boundary vertex").count(), 2);
        // background lines end at 16, polygon ring is 17..19, the loop reserves 20
        assert!(t.contains("//Line Loop(20) = {17, 18, 19};"));
        assert!(t.contains("//Plane Surface(3) = {20};"));
        assert!(t.contains("Line{17, 18, 19} In Surface{1};"));
        assert!(t.contains("Line(21) = {19,20};\n"));
        assert_eq!(
            geo.warnings,
            vec![Warning::SkippedGeometry {
                kind: "boundary",
                index: 3
            }]
        );
    }

    #[test]
    fn even_smoothing_window_rejected() {
        let opts = BuildOptions {
            smoothing_window: 4,
            ..Default::default()
        };
        let r = build(&flat_line(), &AuxGeometry::new(), &opts);
        assert!(matches!(r, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn nothing_written_on_failure() {
        let mut sink = Vec::new();
        let e = Electrodes::new(&[0.0, 1.0], &[0.0, 0.0])
            .unwrap()
            .with_roles(&[Role::Surface, Role::None])
            .unwrap();
        let r = build_to(&e, &AuxGeometry::new(), &BuildOptions::default(), &mut sink);
        assert!(r.is_err());
        assert!(sink.is_empty());

        let geo = build_to(&flat_line(), &AuxGeometry::new(), &BuildOptions::default(), &mut sink)
            .unwrap();
        assert_eq!(sink, geo.text.as_bytes());
    }

    #[test]
    fn whole_space() {
        let e = Electrodes::new(&[0.0, 10.0, 0.0, 10.0], &[0.0, 0.0, -10.0, -10.0]).unwrap();
        let geo = build_whole_space(&e, &AuxGeometry::new(), &WholeSpaceOptions::default())
            .unwrap();
        let t = &geo.text;

        assert!(t.contains("Point(1) = {12.00,2.00,0.00,cl};//corner"));
        assert!(t.contains("Point(3) = {-2.00,-12.00,0.00,cl};//corner"));
        assert!(t.contains("Line Loop(2) = {5, 6, 7, 8};"));
        assert!(t.contains("Plane Surface(1) = {2};//whole space"));
        assert!(t.contains("Line{1, 2, 3, 4} In Surface{1};"));
        assert_eq!(geo.electrode_nodes, vec![9, 10, 11, 12]);

        let pts = declared_points(t);
        for (node, p) in geo.electrode_nodes.iter().zip(e.positions()) {
            assert_eq!(pts[node - 1], p);
        }
    }
}
