//! 3×3 convolution kernels pushed to the `uKernel` / `uKernelWeight` uniforms.
//!
//! The shaders receive the kernel but do not apply it; it is selected once at
//! startup and stays constant for the life of the program.

use std::fmt;
use std::str::FromStr;

/// Named kernel presets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum KernelPreset {
    #[default]
    Normal,
    GaussianBlur,
    Sharpen,
    EdgeDetect,
    Emboss,
    BoxBlur,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 6] = [
        KernelPreset::Normal,
        KernelPreset::GaussianBlur,
        KernelPreset::Sharpen,
        KernelPreset::EdgeDetect,
        KernelPreset::Emboss,
        KernelPreset::BoxBlur,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            KernelPreset::Normal => "normal",
            KernelPreset::GaussianBlur => "gaussianBlur",
            KernelPreset::Sharpen => "sharpen",
            KernelPreset::EdgeDetect => "edgeDetect",
            KernelPreset::Emboss => "emboss",
            KernelPreset::BoxBlur => "boxBlur",
        }
    }

    /// Row-major entries.
    pub const fn values(self) -> [f32; 9] {
        match self {
            KernelPreset::Normal => [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            KernelPreset::GaussianBlur => [
                0.045, 0.122, 0.045, //
                0.122, 0.332, 0.122, //
                0.045, 0.122, 0.045,
            ],
            KernelPreset::Sharpen => [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            KernelPreset::EdgeDetect => [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            KernelPreset::Emboss => [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0],
            KernelPreset::BoxBlur => [1.0; 9],
        }
    }

    pub fn kernel(self) -> Kernel {
        Kernel::new(self.values())
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown kernel `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

/// A kernel together with its normalization weight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Kernel {
    values: [f32; 9],
    weight: f32,
}

impl Kernel {
    pub fn new(values: [f32; 9]) -> Self {
        Self {
            values,
            weight: kernel_weight(&values),
        }
    }

    pub fn values(&self) -> [f32; 9] {
        self.values
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }
}

impl Default for Kernel {
    fn default() -> Self {
        KernelPreset::Normal.kernel()
    }
}

/// Sum of the entries, or 1 when that sum is not positive.
pub fn kernel_weight(values: &[f32; 9]) -> f32 {
    let sum: f32 = values.iter().sum();
    if sum <= 0.0 { 1.0 } else { sum }
}
