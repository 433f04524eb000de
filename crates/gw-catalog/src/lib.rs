// GPU offering catalog
//
// Single source of truth for the server lineup: identifiers, pricing, and
// the fallback network weights. All data is embedded at compile time - no
// runtime requests, no runtime mutation.

pub mod types;

pub use types::{GpuOffering, GpuType, HOURS_PER_MONTH};

/// All offerings, in canonical display order.
///
/// This order is also the tie-break order for ranking: entries that compare
/// equal keep their relative position from this table.
pub static OFFERINGS: [GpuOffering; 4] = [
    GpuOffering {
        gpu: GpuType::A100,
        name: "A100",
        price_per_gpu_hour: 0.99,
        gpus_per_server: 8,
        fallback_weight: 256.498,
    },
    GpuOffering {
        gpu: GpuType::H100,
        name: "H100",
        price_per_gpu_hour: 1.80,
        gpus_per_server: 8,
        fallback_weight: 606.046,
    },
    GpuOffering {
        gpu: GpuType::H200,
        name: "H200",
        price_per_gpu_hour: 2.40,
        gpus_per_server: 8,
        fallback_weight: 619.000,
    },
    GpuOffering {
        gpu: GpuType::B200,
        name: "B200",
        price_per_gpu_hour: 3.50,
        gpus_per_server: 8,
        fallback_weight: 955.921,
    },
];

/// Get the offering for a GPU type.
pub fn offering(gpu: GpuType) -> &'static GpuOffering {
    match gpu {
        GpuType::A100 => &OFFERINGS[0],
        GpuType::H100 => &OFFERINGS[1],
        GpuType::H200 => &OFFERINGS[2],
        GpuType::B200 => &OFFERINGS[3],
    }
}

/// Get all offerings.
pub fn offerings() -> &'static [GpuOffering] {
    &OFFERINGS
}
