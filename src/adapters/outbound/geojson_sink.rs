use async_trait::async_trait;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use crate::common::{DomainError, DomainResult};
use crate::domains::path_smoothing::{
    validate_name, Obstacle, Point2D, SmoothingOutput, SmoothingReport, TrajectorySink,
};

pub const KIND_OBSTACLE: &str = "obstacle";
pub const KIND_KEEP_OUT: &str = "keep_out";
pub const KIND_RAW: &str = "raw";
pub const KIND_SAFE: &str = "safe";
pub const KIND_BLEND: &str = "blend";
pub const KIND_SPLINE: &str = "spline";

/// Writes each run as `<directory>/<scenario>.geojson`.
pub struct GeoJsonFileSink {
    directory: PathBuf,
    circle_segments: usize,
    safe_dist: f64,
}

impl GeoJsonFileSink {
    pub fn new(directory: impl Into<PathBuf>, circle_segments: usize, safe_dist: f64) -> Self {
        Self { directory: directory.into(), circle_segments: circle_segments.max(3), safe_dist }
    }

    pub fn path_for(&self, scenario: &str) -> PathBuf {
        let mut p = self.directory.clone();
        p.push(format!("{}.geojson", scenario));
        p
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scene as a FeatureCollection; the report is attached as a foreign member.
    pub fn to_feature_collection(&self, output: &SmoothingOutput, report: &SmoothingReport) -> DomainResult<FeatureCollection> {
        let mut features = Vec::new();
        for (index, obstacle) in output.obstacles.iter().enumerate() {
            features.push(self.circle_feature(KIND_OBSTACLE, index, obstacle, obstacle.radius()));
            features.push(self.circle_feature(
                KIND_KEEP_OUT,
                index,
                obstacle,
                obstacle.keep_out_radius(self.safe_dist),
            ));
        }
        features.push(line_feature(KIND_RAW, &output.raw_path));
        features.push(line_feature(KIND_SAFE, &output.safe_path));
        features.push(line_feature(KIND_BLEND, output.blend_curve.points()));
        features.push(line_feature(KIND_SPLINE, output.spline_curve.points()));

        let mut foreign = JsonObject::new();
        foreign.insert("name".to_string(), json!(output.scenario));
        foreign.insert("report".to_string(), serde_json::to_value(report)?);

        let b = &output.bounds;
        Ok(FeatureCollection {
            bbox: Some(vec![b.min_x, b.min_y, b.max_x, b.max_y]),
            features,
            foreign_members: Some(foreign),
        })
    }

    fn circle_feature(&self, kind: &str, index: usize, obstacle: &Obstacle, radius: f64) -> Feature {
        let c = obstacle.center();
        let mut ring: Vec<Vec<f64>> = (0..self.circle_segments)
            .map(|k| {
                let a = TAU * k as f64 / self.circle_segments as f64;
                vec![c.x + radius * a.cos(), c.y + radius * a.sin()]
            })
            .collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!(kind));
        properties.insert("index".to_string(), json!(index));
        properties.insert("center".to_string(), json!([c.x, c.y]));
        properties.insert("radius".to_string(), json!(obstacle.radius()));
        if kind == KIND_KEEP_OUT {
            properties.insert("keep_out_radius".to_string(), json!(radius));
        }
        feature(Value::Polygon(vec![ring]), properties)
    }
}

fn line_feature(kind: &str, points: &[Point2D]) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".to_string(), json!(kind));
    properties.insert("points".to_string(), json!(points.len()));
    feature(Value::LineString(points.iter().map(|p| vec![p.x, p.y]).collect()), properties)
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[async_trait]
impl TrajectorySink for GeoJsonFileSink {
    async fn publish(&self, output: &SmoothingOutput, report: &SmoothingReport) -> DomainResult<()> {
        // the name becomes the file stem; keep writes inside `directory`
        validate_name(&output.scenario)?;
        let collection = self.to_feature_collection(output, report)?;
        let text = serde_json::to_string_pretty(&GeoJson::FeatureCollection(collection))?;
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", self.directory.display(), e)))?;
        let path = self.path_for(&output.scenario);
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}
