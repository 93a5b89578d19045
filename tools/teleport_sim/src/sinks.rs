use cgmath::Vector3;
use vr_teleport::teleport::{ArcRendererSink, MarkerSink};

/// Stands in for the line renderer; keeps the last arc it was given.
#[derive(Default)]
pub struct ArcLog {
    pub drawing: bool,
    pub points: Vec<Vector3<f32>>,
}

impl ArcRendererSink for ArcLog {
    fn set_drawing(&mut self, enabled: bool) {
        self.drawing = enabled;
        if !enabled {
            self.points.clear();
        }
    }

    fn set_points(&mut self, points: &[Vector3<f32>]) {
        sim_log!(trace, count = points.len(), "arc points");
        self.points.clear();
        self.points.extend_from_slice(points);
    }
}

pub struct LandingMarker {
    pub visible: bool,
    pub position: Vector3<f32>,
}

impl MarkerSink for LandingMarker {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }
}

impl Default for LandingMarker {
    fn default() -> Self {
        LandingMarker {
            visible: false,
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}
