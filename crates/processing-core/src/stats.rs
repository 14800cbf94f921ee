//! Summary figures for a scene list, logged after segmentation.

use serde::Serialize;
use talereel_project_model::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneStats {
    pub count: usize,
    /// Sum of allocated durations.
    pub total: f64,
    pub average: f64,
    pub shortest: f64,
    pub longest: f64,
}

impl SceneStats {
    /// `None` for an empty scene list.
    pub fn compute(scenes: &[Scene]) -> Option<Self> {
        if scenes.is_empty() {
            return None;
        }
        let durations = scenes.iter().map(|s| s.duration);
        let total: f64 = durations.clone().sum();
        let shortest = durations.clone().fold(f64::INFINITY, f64::min);
        let longest = durations.fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            count: scenes.len(),
            total,
            average: total / scenes.len() as f64,
            shortest,
            longest,
        })
    }

    pub fn log(&self) {
        tracing::info!(
            count = self.count,
            total = format!("{:.2}", self.total),
            average = format!("{:.2}", self.average),
            shortest = format!("{:.2}", self.shortest),
            longest = format!("{:.2}", self.longest),
            "Scene statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(index: usize, duration: f64) -> Scene {
        Scene {
            index,
            text: String::new(),
            start: 0.0,
            end: 0.0,
            offset_start: 0.0,
            duration,
            start_str: String::new(),
            end_str: String::new(),
            offset_start_str: String::new(),
        }
    }

    #[test]
    fn test_stats() {
        let stats = SceneStats::compute(&[scene(1, 4.0), scene(2, 10.0), scene(3, 7.0)]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total, 21.0);
        assert_eq!(stats.average, 7.0);
        assert_eq!(stats.shortest, 4.0);
        assert_eq!(stats.longest, 10.0);
        assert!(SceneStats::compute(&[]).is_none());
    }
}
