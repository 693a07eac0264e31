/// Tuning of the half-space geometry description.
///
/// `None` leaves a value unset so it is derived from the electrodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Depth of investigation below the surface, the depth of the fine mesh region.
    pub depth_of_investigation: Option<f64>,
    /// Characteristic length of the fine mesh region.
    pub characteristic_length: Option<f64>,
    /// Multiplier on the characteristic length at the base of the fine mesh region.
    pub coarseness_factor: f64,
    /// Multiplier on the characteristic length in the background region.
    pub background_factor: f64,
    /// Background offset from the fine mesh region, in mean electrode spacings.
    pub flank_factor: f64,
    /// Extension of the surface past the end electrodes, in mean electrode spacings.
    pub extension_factor: f64,
    /// Window of the moving average smoothing the fine mesh base.
    pub smoothing_window: usize,
    /// Lift of a generated flat topography above the highest electrode.
    pub elevation_offset: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            depth_of_investigation: None,
            characteristic_length: None,
            coarseness_factor: 2.0,
            background_factor: 50.0,
            flank_factor: 100.0,
            extension_factor: 5.0,
            smoothing_window: 5,
            elevation_offset: 1.0,
        }
    }
}

/// Tuning of the whole-space geometry description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WholeSpaceOptions {
    /// Padding around the electrodes of the fine mesh rectangle, as a percentage of the
    /// electrode extents.
    pub padding_percent: f64,
    /// Characteristic length of the fine mesh region.
    pub characteristic_length: f64,
    /// Multiplier on the characteristic length in the background region.
    pub background_factor: f64,
    /// Background offset, as a multiple of the electrode extents.
    pub flank_factor: f64,
}

impl Default for WholeSpaceOptions {
    fn default() -> Self {
        Self {
            padding_percent: 20.0,
            characteristic_length: 1.0,
            background_factor: 150.0,
            flank_factor: 100.0,
        }
    }
}
