//! Describe, mesh, and read back a survey in one call.
use crate::io::{msh, ElectrodeLookup, Mesher, ParsedMesh};
use crate::*;
use std::{fs, io::BufWriter, path::Path};

/// File name of the geometry description written into the work directory.
pub const GEO_FILE: &str = "mesh.geo";

/// The products of [`mesh_survey`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SurveyMesh {
    pub geometry: GeoDescription,
    pub mesh: ParsedMesh,
    /// Warnings from building, parsing and reconciling, in that order.
    pub warnings: Vec<Warning>,
}

/// Build the half-space description into `workdir`, mesh it, and parse the result.
///
/// Electrodes are found in the mesh by their geometry point numbers. The builder's point
/// numbers and the node ids recovered from the mesh are compared electrode by electrode, any
/// difference is surfaced as [`Warning::ListDisagreement`].
pub fn mesh_survey<M: Mesher + ?Sized>(
    electrodes: &Electrodes,
    aux: &AuxGeometry,
    opts: &BuildOptions,
    mesher: &M,
    workdir: &Path,
) -> Result<SurveyMesh> {
    fs::create_dir_all(workdir)?;
    let geo_path = workdir.join(GEO_FILE);

    // build first so a failed build leaves no file behind
    let geometry = builder::build(electrodes, aux, opts)?;
    geometry.write_to(BufWriter::new(fs::File::create(&geo_path)?))?;
    log::info!("wrote geometry description to {}", geo_path.display());

    let msh_path = mesher.mesh(&geo_path)?;
    let mesh = msh::read_msh(
        &msh_path,
        ElectrodeLookup::ByPointId(&geometry.electrode_nodes),
    )?;

    let mut warnings = geometry.warnings.clone();
    warnings.extend(mesh.warnings.iter().cloned());
    reconcile(&geometry.electrode_nodes, &mesh, &mut warnings);

    Ok(SurveyMesh {
        geometry,
        mesh,
        warnings,
    })
}

/// Compare the builder's point number with the recovered node id of each electrode.
///
/// An electrode without a recovered node disagrees.
fn reconcile(point_ids: &[usize], mesh: &ParsedMesh, warnings: &mut Vec<Warning>) {
    for (i, &id) in point_ids.iter().enumerate() {
        let node = mesh
            .electrode_nodes
            .get(i)
            .copied()
            .flatten()
            .and_then(|p| p.checked_sub(1))
            .and_then(|p| mesh.nodes.get(p));
        if node.map(|n| n.id) != Some(id as u64) {
            Warning::ListDisagreement { electrode: i + 1 }.raise(warnings);
        }
    }
}
