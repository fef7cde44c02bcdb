use crate::error::{ClosureError, ClosureResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Idealized crystal shape controlling the diffusion geometric factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Sphere,
    Cylinder,
    Plane,
}

impl Geometry {
    pub const ALL: [Geometry; 3] = [Geometry::Sphere, Geometry::Cylinder, Geometry::Plane];

    /// Geometric factor A from Dodson (1973)
    pub const fn dodson_a(self) -> f64 {
        match self {
            Geometry::Sphere => 55.0,
            Geometry::Cylinder => 27.0,
            Geometry::Plane => 8.7,
        }
    }

    /// Geometric factor M, read off Fig. 2 of Ganguly & Tirone (1999)
    pub const fn ganguly_m(self) -> f64 {
        match self {
            Geometry::Sphere => 0.4,
            Geometry::Cylinder => 0.8,
            Geometry::Plane => 1.1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Geometry::Sphere => "sphere",
            Geometry::Cylinder => "cylinder",
            Geometry::Plane => "plane",
        }
    }
}

impl FromStr for Geometry {
    type Err = ClosureError;

    fn from_str(s: &str) -> ClosureResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "sphere" => Ok(Geometry::Sphere),
            "cylinder" => Ok(Geometry::Cylinder),
            "plane" => Ok(Geometry::Plane),
            _ => Err(ClosureError::InvalidGeometry {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_constants() {
        assert_eq!(Geometry::Sphere.dodson_a(), 55.0);
        assert_eq!(Geometry::Sphere.ganguly_m(), 0.4);
        assert_eq!(Geometry::Cylinder.dodson_a(), 27.0);
        assert_eq!(Geometry::Cylinder.ganguly_m(), 0.8);
        assert_eq!(Geometry::Plane.dodson_a(), 8.7);
        assert_eq!(Geometry::Plane.ganguly_m(), 1.1);
    }

    #[test]
    fn test_geometry_from_str_case_insensitive() {
        assert_eq!("sphere".parse::<Geometry>().unwrap(), Geometry::Sphere);
        assert_eq!("Sphere".parse::<Geometry>().unwrap(), Geometry::Sphere);
        assert_eq!("SPHERE".parse::<Geometry>().unwrap(), Geometry::Sphere);
        assert_eq!("Cylinder".parse::<Geometry>().unwrap(), Geometry::Cylinder);
        assert_eq!("pLaNe".parse::<Geometry>().unwrap(), Geometry::Plane);
        assert_eq!(" plane ".parse::<Geometry>().unwrap(), Geometry::Plane);
    }

    #[test]
    fn test_geometry_from_str_invalid() {
        for name in ["cube", "", "spheres", "slab", "123"] {
            match name.parse::<Geometry>() {
                Err(ClosureError::InvalidGeometry { name: got }) => assert_eq!(got, name),
                other => panic!("expected InvalidGeometry for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_geometry_display_round_trips_through_parse() {
        for geometry in Geometry::ALL {
            assert_eq!(geometry.to_string().parse::<Geometry>().unwrap(), geometry);
        }
        assert_eq!(format!("{}", Geometry::Cylinder), "cylinder");
    }

    #[test]
    fn test_geometry_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Geometry::Plane).unwrap(), "\"plane\"");
        let parsed: Geometry = serde_json::from_str("\"cylinder\"").unwrap();
        assert_eq!(parsed, Geometry::Cylinder);
    }
}
