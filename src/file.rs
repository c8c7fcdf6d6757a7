use std::fs;
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::astro::orbit::Orbit;
use crate::error::{Error, Result};
use crate::model::{AstralBody, BodyInfo, BodyKind, SystemCatalog};

/// A system as it is stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub bodies: Vec<BodyRecord>,
}

/// One body as it is stored on disk. Angles are in degrees, and the color is
/// six hex digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64,
    pub radius: f32,
    pub color: String,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub argument_of_perihelion: f64,
    pub longitude_of_ascending_node: f64,
    pub mean_anomaly: f64,
    pub orbital_period: f64,
    #[serde(default)]
    pub rotation_period: f64,
}

impl CatalogRecord {
    pub fn from_catalog(catalog: &SystemCatalog) -> Self {
        CatalogRecord {
            name: catalog.name().to_owned(),
            bodies: catalog.iter().map(BodyRecord::from_body).collect(),
        }
    }

    /// Builds the catalog, checking every body on the way in. The first bad
    /// body aborts the whole load.
    pub fn into_catalog(self) -> Result<SystemCatalog> {
        let mut catalog = SystemCatalog::new(self.name);
        for record in self.bodies {
            let (info, orbit) = record.into_parts()?;
            catalog.add_body(info, orbit);
        }
        Ok(catalog)
    }
}

impl BodyRecord {
    pub fn from_body(body: &AstralBody) -> Self {
        let orbit = &body.orbit;
        BodyRecord {
            name: body.info.name.clone(),
            kind: body.info.kind,
            mass: body.info.mass,
            radius: body.info.radius,
            color: format_color(&body.info.color),
            semi_major_axis: orbit.semimajor_axis(),
            eccentricity: orbit.eccentricity(),
            inclination: orbit.inclination_degrees(),
            argument_of_perihelion: orbit.arg_periapse_degrees(),
            longitude_of_ascending_node: orbit.long_asc_node_degrees(),
            mean_anomaly: orbit.mean_anomaly_at_epoch_degrees(),
            orbital_period: orbit.period(),
            rotation_period: body.info.rotation_period,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(Error::invalid_body(&self.name, reason))
        };

        let numbers = [
            ("mass", self.mass),
            ("radius", self.radius as f64),
            ("semi-major axis", self.semi_major_axis),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("argument of perihelion", self.argument_of_perihelion),
            ("longitude of ascending node", self.longitude_of_ascending_node),
            ("mean anomaly", self.mean_anomaly),
            ("orbital period", self.orbital_period),
            ("rotation period", self.rotation_period),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return invalid(&format!("{} is not a finite number", field));
            }
        }

        if !(0.0..1.0).contains(&self.eccentricity) {
            return invalid("eccentricity must be in [0, 1), only elliptic orbits are supported");
        }
        if self.orbital_period <= 0.0 {
            return invalid("orbital period must be positive");
        }
        if self.radius <= 0.0 {
            return invalid("radius must be positive");
        }
        if self.semi_major_axis < 0.0 {
            return invalid("semi-major axis must not be negative");
        }
        if self.rotation_period < 0.0 {
            return invalid("rotation period must not be negative");
        }
        Ok(())
    }

    pub fn into_parts(self) -> Result<(BodyInfo, Orbit)> {
        self.validate()?;

        let orbit = Orbit::from_degrees(
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.longitude_of_ascending_node,
            self.argument_of_perihelion,
            self.mean_anomaly,
            self.orbital_period,
        );
        let info = BodyInfo {
            color: parse_color(&self.color)?,
            name: self.name,
            kind: self.kind,
            mass: self.mass,
            radius: self.radius,
            rotation_period: self.rotation_period,
        };
        Ok((info, orbit))
    }
}

pub fn catalog_from_json(text: &str) -> Result<SystemCatalog> {
    let record: CatalogRecord = serde_json::from_str(text)?;
    record.into_catalog()
}

pub fn catalog_to_json(catalog: &SystemCatalog) -> Result<String> {
    let record = CatalogRecord::from_catalog(catalog);
    Ok(serde_json::to_string_pretty(&record)?)
}

pub fn load_catalog(path: &Path) -> Result<SystemCatalog> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let catalog = catalog_from_json(&text)?;
    info!(
        path = %path.display(),
        name = catalog.name(),
        bodies = catalog.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

pub fn save_catalog(catalog: &SystemCatalog, path: &Path) -> Result<()> {
    let text = catalog_to_json(catalog)?;
    fs::write(path, text).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), bodies = catalog.len(), "saved catalog");
    Ok(())
}

/// Parses `rrggbb` (optionally with a leading `#`) into RGB in `[0, 1]`.
pub fn parse_color(s: &str) -> Result<Point3<f32>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(s.to_owned()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|_| Error::InvalidColor(s.to_owned()))
    };
    Ok(Point3::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn format_color(color: &Point3<f32>) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "{:02x}{:02x}{:02x}",
        channel(color.x),
        channel(color.y),
        channel(color.z)
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn earth_record() -> BodyRecord {
        BodyRecord {
            name: "Earth".to_owned(),
            kind: BodyKind::Telluric,
            mass: 5.972e24,
            radius: 1.2,
            color: "2f6bff".to_owned(),
            semi_major_axis: 60.0,
            eccentricity: 0.0167,
            inclination: 0.0,
            argument_of_perihelion: 114.2,
            longitude_of_ascending_node: 348.7,
            mean_anomaly: 358.6,
            orbital_period: 31_558_149.8,
            rotation_period: 86_164.1,
        }
    }

    #[test]
    fn test_parse_color() {
        let c = parse_color("ff8000").unwrap();
        assert_relative_eq!(c, Point3::new(1.0, 128.0 / 255.0, 0.0));
        assert_relative_eq!(parse_color("#FFFFFF").unwrap(), Point3::new(1.0, 1.0, 1.0));

        for bad in ["", "fff", "ff80000", "gg0000", "+f8000", "ff 800"] {
            assert!(
                matches!(parse_color(bad), Err(Error::InvalidColor(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_format_color() {
        assert_eq!(format_color(&Point3::new(1.0, 0.0, 0.5)), "ff0080");
        assert_eq!(format_color(&parse_color("2f6bff").unwrap()), "2f6bff");
    }

    #[test]
    fn test_valid_record() {
        let (info, orbit) = earth_record().into_parts().unwrap();
        assert_eq!(info.name, "Earth");
        assert_eq!(info.kind, BodyKind::Telluric);
        assert_relative_eq!(orbit.eccentricity(), 0.0167);
        assert_relative_eq!(orbit.arg_periapse_degrees(), 114.2, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_records_name_the_body() {
        let cases: [fn(&mut BodyRecord); 8] = [
            |r| r.eccentricity = 1.0,
            |r| r.eccentricity = -0.1,
            |r| r.orbital_period = 0.0,
            |r| r.radius = 0.0,
            |r| r.semi_major_axis = -1.0,
            |r| r.inclination = f64::NAN,
            |r| r.mass = f64::INFINITY,
            |r| r.rotation_period = -1.0,
        ];
        for break_it in cases {
            let mut record = earth_record();
            break_it(&mut record);
            match record.into_parts() {
                Err(Error::InvalidBody { name, .. }) => assert_eq!(name, "Earth"),
                other => panic!("expected an invalid body, got {:?}", other),
            }
        }

        let mut record = earth_record();
        record.color = "blue".to_owned();
        assert!(matches!(record.into_parts(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_rotation_period_is_optional() {
        let json = r#"{
            "name": "Tiny",
            "bodies": [{
                "name": "Sun", "kind": "star", "mass": 1.989e30, "radius": 5.0,
                "color": "ffd27f", "semi_major_axis": 0.0, "eccentricity": 0.0,
                "inclination": 0.0, "argument_of_perihelion": 0.0,
                "longitude_of_ascending_node": 0.0, "mean_anomaly": 0.0,
                "orbital_period": 1.0
            }]
        }"#;
        let catalog = catalog_from_json(json).unwrap();
        let sun = catalog.get_by_name("Sun").unwrap();
        assert_eq!(sun.info.kind, BodyKind::Star);
        assert_eq!(sun.info.rotation_period, 0.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(catalog_from_json("{\"name\": 3}"), Err(Error::Json(_))));
        let json = r#"{"name": "X", "bodies": [{"name": "Y", "kind": "comet"}]}"#;
        assert!(matches!(catalog_from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let mut catalog = SystemCatalog::new("Round trip");
        let (info, orbit) = earth_record().into_parts().unwrap();
        catalog.add_body(info, orbit);

        let text = catalog_to_json(&catalog).unwrap();
        let reloaded = catalog_from_json(&text).unwrap();
        let record = CatalogRecord::from_catalog(&reloaded);
        assert_eq!(record.name, "Round trip");

        let body = &record.bodies[0];
        let expected = earth_record();
        assert_eq!(body.name, expected.name);
        assert_eq!(body.kind, expected.kind);
        assert_eq!(body.color, expected.color);
        assert_relative_eq!(body.inclination, expected.inclination);
        assert_relative_eq!(body.mean_anomaly, expected.mean_anomaly, max_relative = 1e-12);
        assert_relative_eq!(
            body.longitude_of_ascending_node,
            expected.longitude_of_ascending_node,
            max_relative = 1e-12
        );
        assert_relative_eq!(body.orbital_period, expected.orbital_period);
    }
}
