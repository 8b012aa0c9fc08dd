use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, GeoJson, Value};

use crate::adapters::outbound::geojson_sink::{KIND_OBSTACLE, KIND_RAW};
use crate::common::{DomainError, DomainResult};
use crate::domains::path_smoothing::{Obstacle, Point2D, Scenario, ScenarioSource, Workspace, WorkspaceBounds};

pub const DATA_DIR_ENV: &str = "SMOOTHING_DATA_DIR";

/// Loads scenarios from `<base>/scenarios/<name>`, either TOML or GeoJSON.
pub struct FilesystemScenarioSource {
    base: PathBuf,
}

impl FilesystemScenarioSource {
    /// Base precedence: argument -> `SMOOTHING_DATA_DIR` -> ./resources -> /usr/share/gryphon-smoothing
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            if let Ok(v) = env::var(DATA_DIR_ENV) {
                PathBuf::from(v)
            } else {
                let cwd_default = Path::new("resources");
                if cwd_default.exists() { cwd_default.to_path_buf() } else { PathBuf::from("/usr/share/gryphon-smoothing") }
            }
        });
        Self { base }
    }

    pub fn scenario_dir(&self) -> PathBuf {
        self.base.join("scenarios")
    }

    /// Write a scenario as TOML, creating the directory as needed.
    pub fn save_scenario(&self, scenario: &Scenario) -> DomainResult<PathBuf> {
        let dir = self.scenario_dir();
        fs::create_dir_all(&dir).map_err(infra)?;
        let text = toml::to_string(scenario).map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        let path = dir.join(format!("{}.toml", scenario.name));
        fs::write(&path, text).map_err(infra)?;
        Ok(path)
    }
}

impl ScenarioSource for FilesystemScenarioSource {
    fn load_scenario(&self, name: &str) -> DomainResult<Scenario> {
        let path = resolve(&self.scenario_dir(), name)?;
        let text = fs::read_to_string(&path).map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name).to_string();
        let scenario = match path.extension().and_then(|e| e.to_str()) {
            Some("geojson") | Some("json") => scenario_from_geojson(&stem, &text)?,
            _ => toml::from_str::<Scenario>(&text).map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))?,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    fn list_scenarios(&self) -> DomainResult<Vec<String>> {
        let dir = self.scenario_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&dir)
            .map_err(infra)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| matches!(p.extension().and_then(|e| e.to_str()), Some("toml" | "geojson" | "json")))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn infra(e: std::io::Error) -> DomainError {
    DomainError::InfrastructureError(format!("{}", e))
}

/// `name` may carry an extension; without one `.toml` then `.geojson` are tried.
fn resolve(dir: &Path, name: &str) -> DomainResult<PathBuf> {
    let direct = dir.join(name);
    if Path::new(name).extension().is_some() {
        return Ok(direct);
    }
    ["toml", "geojson"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.exists())
        .ok_or_else(|| DomainError::InfrastructureError(format!("scenario '{}' not found in {}", name, dir.display())))
}

/// Raw path: the LineString with `kind = "raw"`, else the first LineString.
/// Obstacles: features with a numeric `radius`, centered on their Point geometry
/// or on a `center` property. Bounds come from the collection bbox, else from the
/// extent of path and obstacles.
pub fn scenario_from_geojson(name: &str, text: &str) -> DomainResult<Scenario> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| DomainError::InfrastructureError(format!("invalid GeoJSON: {}", e)))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(DomainError::InfrastructureError("expected a FeatureCollection".to_string()));
    };

    let mut raw_path: Option<Vec<Point2D>> = None;
    let mut obstacles = Vec::new();
    for feature in &collection.features {
        let kind = feature.property("kind").and_then(|k| k.as_str());
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::LineString(coords)) if kind.map_or(true, |k| k == KIND_RAW) => {
                if raw_path.is_none() || kind == Some(KIND_RAW) {
                    raw_path = Some(coords.iter().filter_map(|c| position(c)).collect());
                }
            }
            _ => {
                if kind.map_or(true, |k| k == KIND_OBSTACLE) {
                    if let Some(obstacle) = obstacle_from_feature(feature)? {
                        obstacles.push(obstacle);
                    }
                }
            }
        }
    }

    let raw_path = raw_path.ok_or_else(|| DomainError::InfrastructureError("no LineString raw path in scenario".to_string()))?;
    let bounds = match collection.bbox.as_deref() {
        Some([min_x, min_y, max_x, max_y]) => WorkspaceBounds { min_x: *min_x, max_x: *max_x, min_y: *min_y, max_y: *max_y },
        _ => extent(&raw_path, &obstacles),
    };
    let name = collection
        .foreign_members
        .as_ref()
        .and_then(|m| m.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or(name);
    Ok(Scenario::new(name, Workspace::new(bounds, obstacles)?, raw_path)?)
}

fn position(c: &[f64]) -> Option<Point2D> {
    match c {
        [x, y, ..] => Some(Point2D::new(*x, *y)),
        _ => None,
    }
}

fn obstacle_from_feature(feature: &Feature) -> DomainResult<Option<Obstacle>> {
    let Some(radius) = feature.property("radius").and_then(|r| r.as_f64()) else {
        return Ok(None);
    };
    let center = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(c)) => position(c),
        _ => feature
            .property("center")
            .and_then(|c| c.as_array())
            .and_then(|c| position(&c.iter().filter_map(|v| v.as_f64()).collect::<Vec<_>>())),
    };
    match center {
        Some(center) => Ok(Some(Obstacle::new(center, radius)?)),
        None => Ok(None),
    }
}

fn extent(path: &[Point2D], obstacles: &[Obstacle]) -> WorkspaceBounds {
    let mut b = WorkspaceBounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    let circles = obstacles.iter().map(|o| (o.center(), o.radius()));
    for (p, r) in path.iter().map(|p| (*p, 0.0)).chain(circles) {
        b.min_x = b.min_x.min(p.x - r);
        b.max_x = b.max_x.max(p.x + r);
        b.min_y = b.min_y.min(p.y - r);
        b.max_y = b.max_y.max(p.y + r);
    }
    // degenerate extents (e.g. a horizontal path) still need a non-empty box
    if b.max_x <= b.min_x {
        b.max_x = b.min_x + 1.0;
    }
    if b.max_y <= b.min_y {
        b.max_y = b.min_y + 1.0;
    }
    b
}
