/// Initialization parameters for the headless GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Adapter preference.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Accept a software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,

    /// Format of the offscreen color target.
    pub target_format: wgpu::TextureFormat,

    /// Offscreen target size in physical pixels.
    pub target_size: (u32, u32),
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            force_fallback_adapter: false,
            target_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            target_size: (1024, 768),
        }
    }
}
