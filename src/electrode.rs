//! Survey electrodes and the roles that place them in the mesh.
use crate::*;
use std::{fmt, str::FromStr};

/// What an electrode contributes to the geometry description.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// On the surface, part of the topography chain.
    Surface,
    /// Below the surface, embedded as an isolated point.
    Buried,
    /// Part of the numbered borehole string (numbering starts at 1).
    Borehole(u32),
    /// Not placed in the mesh.
    None,
}

impl Default for Role {
    fn default() -> Self {
        Role::Surface
    }
}

impl FromStr for Role {
    type Err = &'static str;

    /// Parses the tags `electrode` (or `surface`), `buried`, `borehole<n>` and `none`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "electrode" | "surface" => Ok(Role::Surface),
            "buried" => Ok(Role::Buried),
            "none" => Ok(Role::None),
            s => s
                .strip_prefix("borehole")
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|&n| n > 0)
                .map(Role::Borehole)
                .ok_or("expecting electrode, buried, borehole<n> or none"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Surface => write!(f, "electrode"),
            Role::Buried => write!(f, "buried"),
            Role::Borehole(n) => write!(f, "borehole{}", n),
            Role::None => write!(f, "none"),
        }
    }
}

/// An electrode position in the section plane with its role.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Electrode {
    pub pos: Point2,
    pub role: Role,
}

/// The ordered electrodes of a survey.
///
/// Input order is preserved, the electrode correspondence is reported against it.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Electrodes(Vec<Electrode>);

impl Electrodes {
    /// Surface electrodes from paired X and Z (elevation) coordinates.
    pub fn new(x: &[f64], z: &[f64]) -> Result<Self> {
        if x.len() != z.len() {
            return Err(Error::shape("electrode coordinates", x.len(), z.len()));
        }

        Ok(Electrodes(
            x.iter()
                .zip(z)
                .map(|(&x, &z)| Electrode {
                    pos: [x, z],
                    role: Role::Surface,
                })
                .collect(),
        ))
    }

    /// Assign a role to each electrode.
    pub fn with_roles(mut self, roles: &[Role]) -> Result<Self> {
        if roles.len() != self.len() {
            return Err(Error::shape("electrode roles", self.len(), roles.len()));
        }

        for (e, &role) in self.0.iter_mut().zip(roles) {
            e.role = role;
        }

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point2> + '_ {
        self.0.iter().map(|e| e.pos)
    }

    /// Positions of the electrodes with `role`, in input order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = Point2> + '_ {
        self.0.iter().filter(move |e| e.role == role).map(|e| e.pos)
    }

    pub fn has_role(&self, pred: impl Fn(Role) -> bool) -> bool {
        self.0.iter().any(|e| pred(e.role))
    }

    /// The borehole numbers that are contiguous from 1, and the numbers past the first gap.
    pub fn borehole_numbers(&self) -> (Vec<u32>, Vec<u32>) {
        let present = self.0.iter().filter_map(|e| match e.role {
            Role::Borehole(n) => Some(n),
            _ => None,
        });
        contiguous_from_one(present)
    }

    pub fn extents(&self) -> Extents2 {
        self.positions().collect()
    }
}

/// Split the distinct numbers into the run `1, 2, 3, ...` and whatever follows the first gap.
pub(crate) fn contiguous_from_one(numbers: impl Iterator<Item = u32>) -> (Vec<u32>, Vec<u32>) {
    let mut ns = numbers.collect::<Vec<_>>();
    ns.sort_unstable();
    ns.dedup();

    let run = ns
        .iter()
        .zip(1..)
        .take_while(|(n, i)| **n == *i)
        .count();
    let rest = ns.split_off(run);
    (ns, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch() {
        let e = Electrodes::new(&[0.0, 1.0, 2.0], &[0.0, 0.0]);
        assert!(matches!(
            e,
            Err(Error::ShapeMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));

        let e = Electrodes::new(&[0.0, 1.0], &[0.0, 0.0])
            .unwrap()
            .with_roles(&[Role::Buried]);
        assert!(matches!(e, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn role_parsing() {
        assert_eq!("electrode".parse::<Role>(), Ok(Role::Surface));
        assert_eq!("buried".parse::<Role>(), Ok(Role::Buried));
        assert_eq!("borehole12".parse::<Role>(), Ok(Role::Borehole(12)));
        assert_eq!("none".parse::<Role>(), Ok(Role::None));
        assert!("borehole".parse::<Role>().is_err());
        assert!("borehole0".parse::<Role>().is_err());
        assert!("pole".parse::<Role>().is_err());

        assert_eq!(Role::Borehole(3).to_string(), "borehole3");
    }

    #[test]
    fn borehole_numbering() {
        let e = Electrodes::new(&[0.0; 5], &[0.0, 1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_roles(&[
                Role::Borehole(2),
                Role::Borehole(1),
                Role::Borehole(4),
                Role::Surface,
                Role::Borehole(2),
            ])
            .unwrap();
        assert_eq!(e.borehole_numbers(), (vec![1, 2], vec![4]));

        assert_eq!(contiguous_from_one([2, 3].into_iter()), (vec![], vec![2, 3]));
        assert_eq!(contiguous_from_one(std::iter::empty()), (vec![], vec![]));
    }

    #[test]
    fn filtering_by_role() {
        let e = Electrodes::new(&[0.0, 1.0, 2.0], &[0.0, -1.0, 0.0])
            .unwrap()
            .with_roles(&[Role::Surface, Role::Buried, Role::Surface])
            .unwrap();
        assert_eq!(
            e.with_role(Role::Surface).collect::<Vec<_>>(),
            vec![[0.0, 0.0], [2.0, 0.0]]
        );
        assert!(e.has_role(|r| r == Role::Buried));
        assert!(!e.has_role(|r| matches!(r, Role::Borehole(_))));
        assert_eq!(e.extents(), Extents2::from_min_max([0.0, -1.0], [2.0, 0.0]));
    }
}
