/// Presentation settings of an orbit plot, durations in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPlot {
    pub duration: f64,
    pub lead: f64,
    /// Fraction of the plot that fades out, in [0, 1].
    pub fade: f64,
}

/// Auxiliary metadata attached to an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyInfo {
    pub class: Option<String>,
    pub label_color: Option<[f64; 3]>,
    pub trajectory_plot: Option<TrajectoryPlot>,
    pub description: Option<String>,
}
