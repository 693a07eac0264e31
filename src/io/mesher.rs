use super::*;
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// An external tool that turns a geometry description file into a mesh file.
pub trait Mesher {
    /// Mesh the description at `geo`, returning the path of the written mesh.
    fn mesh(&self, geo: &Path) -> Result<PathBuf>;
}

/// The `gmsh` command line mesher.
///
/// Runs `gmsh <geo> -2 -format <format> -o <geo>.msh [args...]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Gmsh {
    /// Executable to run, resolved on `PATH` if not a path.
    pub exe: PathBuf,
    /// Output format version passed with `-format`.
    pub format: String,
    /// Extra arguments appended to the command.
    pub args: Vec<String>,
}

impl Default for Gmsh {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("gmsh"),
            format: "msh22".into(),
            args: Vec::new(),
        }
    }
}

impl Gmsh {
    /// The mesh path for a description, the description path with a `.msh` extension.
    pub fn output_path(geo: &Path) -> PathBuf {
        geo.with_extension("msh")
    }

    fn command(&self, geo: &Path, msh: &Path) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.arg(geo)
            .arg("-2")
            .arg("-format")
            .arg(&self.format)
            .arg("-o")
            .arg(msh)
            .args(&self.args);
        cmd
    }
}

impl Mesher for Gmsh {
    fn mesh(&self, geo: &Path) -> Result<PathBuf> {
        let msh = Self::output_path(geo);
        let mut cmd = self.command(geo, &msh);
        log::debug!("running {:?}", cmd);

        let out = cmd.output()?;
        if !out.status.success() {
            return Err(Error::MesherFailed {
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        if !msh.is_file() {
            return Err(Error::MesherOutputMissing(msh));
        }

        log::info!("meshed {} into {}", geo.display(), msh.display());
        Ok(msh)
    }
}
