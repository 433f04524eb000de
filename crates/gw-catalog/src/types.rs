// Offering catalog types
//
// These types are embedded in the binary and describe the fixed server
// lineup. There is no runtime discovery: the offerings in `OFFERINGS` are
// the whole universe for the lifetime of the process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of GPU types in the lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpuType {
    A100,
    H100,
    H200,
    B200,
}

impl GpuType {
    /// Canonical uppercase key, as used in weight mappings.
    pub fn as_str(&self) -> &'static str {
        match self {
            GpuType::A100 => "A100",
            GpuType::H100 => "H100",
            GpuType::H200 => "H200",
            GpuType::B200 => "B200",
        }
    }

    /// Parse a canonical (uppercase) key back into a GPU type.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "A100" => Some(GpuType::A100),
            "H100" => Some(GpuType::H100),
            "H200" => Some(GpuType::H200),
            "B200" => Some(GpuType::B200),
            _ => None,
        }
    }
}

impl fmt::Display for GpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rentable GPU server offering.
#[derive(Debug, Clone)]
pub struct GpuOffering {
    pub gpu: GpuType,
    pub name: &'static str,
    /// Price per single GPU per hour, USD.
    pub price_per_gpu_hour: f64,
    /// GPUs in one server.
    pub gpus_per_server: u32,
    /// Network weight assumed until override weights are loaded.
    pub fallback_weight: f64,
}

/// Billing assumes a 730-hour month.
pub const HOURS_PER_MONTH: f64 = 730.0;

impl GpuOffering {
    /// Customer-facing server label, e.g. "8 x H100".
    pub fn display_name(&self) -> String {
        format!("{} x {}", self.gpus_per_server, self.name)
    }

    /// Monthly price for the whole server at the hourly GPU rate.
    pub fn monthly_price(&self) -> f64 {
        self.price_per_gpu_hour * self.gpus_per_server as f64 * HOURS_PER_MONTH
    }
}
