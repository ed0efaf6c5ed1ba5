//! Closed-form geometry used to plot and fit orbits.
pub mod general_ellipse;
