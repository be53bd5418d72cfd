use candle_core::Device;
use tracing::{info, warn};

/// Pick the accelerator when one is usable, otherwise the CPU.
pub fn select_device() -> Device {
    if candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA device 0");
                return device;
            }
            Err(e) => warn!("CUDA reported available but failed to open: {e}"),
        }
    }
    info!("Using CPU");
    Device::Cpu
}

/// Device name as understood by the upstream framework (`cuda` / `cpu`).
pub fn device_name(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_name() {
        assert_eq!(device_name(&Device::Cpu), "cpu");
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn test_without_cuda_feature_selects_cpu() {
        assert!(select_device().is_cpu());
    }
}
