// bindings/translate.rs

// Translates an analog configuration into the native tile parameter block. Every
// nested bundle is validated on the way; the first failure is returned untouched.
// Unit cells are flattened into the multi-device layouts in cell order.

// Dependencies
use log::{debug, warn};

use super::{
    AnalogTileParameter, DeviceParameter, IdealDeviceParameter, IoParameter, PulsedDeviceParameter,
    TransferDeviceParameter, UpdateParameter, VectorDeviceParameter,
};
use crate::configs::{InferenceRpuConfig, SingleRpuConfig, UnitCellRpuConfig};
use crate::devices::{IdealDevice, PulsedDevice, StepModel, UnitCellDevice, VectorUnitCellUpdatePolicy};
use crate::parameters::{IoParameters, UpdateParameters};
use crate::ConfigError;

/// Borrowed view of one of the configurations that map to an analog tile
#[derive(Debug, Clone, Copy)]
pub enum AnalogConfigRef<'a> {
    /// Single pulsed device
    Single(&'a SingleRpuConfig),
    /// Unit cell
    UnitCell(&'a UnitCellRpuConfig),
    /// Inference-only
    Inference(&'a InferenceRpuConfig),
}

/// Builds the analog tile parameter block of a configuration
pub fn tile_parameters_to_bindings(config: AnalogConfigRef<'_>) -> Result<AnalogTileParameter, ConfigError> {
    let (label, device, forward, backward, update) = match config {
        AnalogConfigRef::Single(c) => {
            c.device.validate()?;
            if !c.update.is_pulsed() {
                warn!(
                    "Update pulse type {:?} bypasses the {} step model",
                    c.update.pulse_type,
                    c.device.step.name()
                );
            }
            let device = DeviceParameter::Pulsed(pulsed_device_to_bindings(&c.device));
            ("single", device, &c.forward, &c.backward, &c.update)
        }
        AnalogConfigRef::UnitCell(c) => {
            let device = unit_cell_to_bindings(&c.device)?;
            ("unit cell", device, &c.forward, &c.backward, &c.update)
        }
        AnalogConfigRef::Inference(c) => {
            c.device().validate()?;
            c.validate_runtime()?;
            let device = DeviceParameter::Ideal(ideal_device_to_bindings(c.device()));
            ("inference", device, &c.forward, c.backward(), c.update())
        }
    };

    forward.validate()?;
    backward.validate()?;
    update.validate()?;

    debug!(
        "Translated {} configuration into analog tile bindings ({} pulsed device(s))",
        label,
        device.devices().len()
    );

    Ok(AnalogTileParameter {
        device,
        forward_io: io_to_bindings(forward),
        backward_io: io_to_bindings(backward),
        update: update_to_bindings(update),
    })
}

fn io_to_bindings(io: &IoParameters) -> IoParameter {
    IoParameter {
        bm_test_negative_bound: io.bm_test_negative_bound,
        bound_management: io.bound_management.code(),
        inp_bound: io.inp_bound,
        inp_noise: io.inp_noise,
        inp_res: io.inp_res,
        inp_sto_round: io.inp_sto_round,
        is_perfect: io.is_perfect,
        max_bm_factor: io.max_bm_factor,
        max_bm_res: io.max_bm_res,
        nm_thres: io.nm_thres,
        noise_management: io.noise_management.code(),
        out_bound: io.out_bound,
        out_noise: io.out_noise,
        out_res: io.out_res,
        out_scale: io.out_scale,
        out_sto_round: io.out_sto_round,
        w_noise: io.w_noise,
        w_noise_type: io.w_noise_type.code(),
    }
}

fn update_to_bindings(update: &UpdateParameters) -> UpdateParameter {
    UpdateParameter {
        desired_bl: update.desired_bl,
        fixed_bl: update.fixed_bl,
        pulse_type: update.pulse_type.code(),
        res: update.res,
        sto_round: update.sto_round,
        update_bl_management: update.update_bl_management,
        update_management: update.update_management,
        x_res_implicit: update.x_res_implicit,
        d_res_implicit: update.d_res_implicit,
    }
}

fn ideal_device_to_bindings(device: &IdealDevice) -> IdealDeviceParameter {
    IdealDeviceParameter {
        construction_seed: device.construction_seed,
        diffusion: device.diffusion,
        lifetime: device.lifetime,
    }
}

// Native step model codes
fn step_code(step: &StepModel) -> i32 {
    match step {
        StepModel::ConstantStep => 0,
        StepModel::LinearStep(_) => 1,
        StepModel::SoftBounds => 2,
        StepModel::ExpStep(_) => 3,
    }
}

fn pulsed_device_to_bindings(device: &PulsedDevice) -> PulsedDeviceParameter {
    let mut params = PulsedDeviceParameter {
        step_type: step_code(&device.step),
        construction_seed: device.construction_seed,
        corrupt_devices_prob: device.corrupt_devices_prob,
        corrupt_devices_range: device.corrupt_devices_range,
        diffusion: device.diffusion,
        diffusion_dtod: device.diffusion_dtod,
        dw_min: device.dw_min,
        dw_min_dtod: device.dw_min_dtod,
        dw_min_std: device.dw_min_std,
        enforce_consistency: device.enforce_consistency,
        lifetime: device.lifetime,
        lifetime_dtod: device.lifetime_dtod,
        perfect_bias: device.perfect_bias,
        reset: device.reset,
        reset_dtod: device.reset_dtod,
        reset_std: device.reset_std,
        up_down: device.up_down,
        up_down_dtod: device.up_down_dtod,
        w_max: device.w_max,
        w_max_dtod: device.w_max_dtod,
        w_min: device.w_min,
        w_min_dtod: device.w_min_dtod,
        ls_gamma_up: 0.0,
        ls_gamma_down: 0.0,
        ls_gamma_up_dtod: 0.0,
        ls_gamma_down_dtod: 0.0,
        ls_allow_increasing: false,
        ls_mean_bound_reference: false,
        ls_mult_noise: false,
        es_a_up: 0.0,
        es_a_down: 0.0,
        es_gamma_up: 0.0,
        es_gamma_down: 0.0,
        es_a: 0.0,
        es_b: 0.0,
    };

    match &device.step {
        StepModel::LinearStep(p) => {
            params.ls_gamma_up = p.gamma_up;
            params.ls_gamma_down = p.gamma_down;
            params.ls_gamma_up_dtod = p.gamma_up_dtod;
            params.ls_gamma_down_dtod = p.gamma_down_dtod;
            params.ls_allow_increasing = p.allow_increasing;
            params.ls_mean_bound_reference = p.mean_bound_reference;
            params.ls_mult_noise = p.mult_noise;
        }
        StepModel::ExpStep(p) => {
            params.es_a_up = p.a_up;
            params.es_a_down = p.a_down;
            params.es_gamma_up = p.gamma_up;
            params.es_gamma_down = p.gamma_down;
            params.es_a = p.a;
            params.es_b = p.b;
        }
        StepModel::ConstantStep | StepModel::SoftBounds => {}
    }
    params
}

fn check_vec_len(name: &str, values: &[f64], expected: usize) -> Result<(), ConfigError> {
    if !values.is_empty() && values.len() != expected {
        return Err(ConfigError::Translation(format!(
            "{} has {} entries, expected {}",
            name,
            values.len(),
            expected
        )));
    }
    Ok(())
}

fn unit_cell_to_bindings(cell: &UnitCellDevice) -> Result<DeviceParameter, ConfigError> {
    cell.validate()?;

    let n_devices = cell.len();
    let devices: Vec<PulsedDeviceParameter> = cell
        .unit_cell_devices()
        .iter()
        .map(pulsed_device_to_bindings)
        .collect();

    match cell {
        UnitCellDevice::Vector(vector) => {
            check_vec_len("gamma_vec", &vector.gamma_vec, n_devices)?;
            if vector.update_policy == VectorUnitCellUpdatePolicy::SingleFixed
                && vector.first_update_idx >= n_devices
            {
                return Err(ConfigError::Translation(format!(
                    "first_update_idx {} out of range for {} device(s)",
                    vector.first_update_idx, n_devices
                )));
            }
            Ok(DeviceParameter::Vector(VectorDeviceParameter {
                devices,
                update_policy: vector.update_policy.code(),
                first_update_idx: vector.first_update_idx,
                gamma_vec: vector.gamma_vec.clone(),
            }))
        }
        UnitCellDevice::Difference(_) => {
            if n_devices != 2 {
                return Err(ConfigError::Translation(format!(
                    "difference unit cell needs exactly 2 devices, got {}",
                    n_devices
                )));
            }
            Ok(DeviceParameter::Difference(VectorDeviceParameter {
                devices,
                update_policy: VectorUnitCellUpdatePolicy::All.code(),
                first_update_idx: 0,
                gamma_vec: Vec::new(),
            }))
        }
        UnitCellDevice::Transfer(transfer) => {
            if n_devices < 2 {
                return Err(ConfigError::Translation(format!(
                    "transfer compound needs at least 2 devices, got {}",
                    n_devices
                )));
            }
            check_vec_len("gamma_vec", &transfer.gamma_vec, n_devices)?;
            check_vec_len("transfer_every_vec", &transfer.transfer_every_vec, n_devices - 1)?;
            check_vec_len("transfer_lr_vec", &transfer.transfer_lr_vec, n_devices - 1)?;
            Ok(DeviceParameter::Transfer(TransferDeviceParameter {
                vector: VectorDeviceParameter {
                    devices,
                    update_policy: VectorUnitCellUpdatePolicy::SingleFixed.code(),
                    first_update_idx: 0,
                    gamma_vec: transfer.gamma_vec.clone(),
                },
                gamma: transfer.gamma,
                transfer_every: transfer.transfer_every,
                transfer_every_vec: transfer.transfer_every_vec.clone(),
                no_self_transfer: transfer.no_self_transfer,
                units_in_mbatch: transfer.units_in_mbatch,
                n_cols_per_transfer: transfer.n_cols_per_transfer,
                with_reset_prob: transfer.with_reset_prob,
                random_column: transfer.random_column,
                transfer_lr: transfer.transfer_lr,
                transfer_lr_vec: transfer.transfer_lr_vec.clone(),
                scale_transfer_lr: transfer.scale_transfer_lr,
                transfer_io: io_to_bindings(&transfer.transfer_forward),
                transfer_up: update_to_bindings(&transfer.transfer_update),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{DifferenceUnitCellDevice, LinearStepParameters, TransferCompound, VectorUnitCellDevice};

    #[test]
    fn test_step_fields_only_for_matching_model() {
        let linear = PulsedDevice {
            step: StepModel::LinearStep(LinearStepParameters {
                gamma_up: 0.3,
                ..LinearStepParameters::default()
            }),
            ..PulsedDevice::default()
        };
        let params = pulsed_device_to_bindings(&linear);
        assert_eq!(params.step_type, 1);
        assert_eq!(params.ls_gamma_up, 0.3);
        assert_eq!(params.es_a_up, 0.0);

        let exp = pulsed_device_to_bindings(&PulsedDevice::exp_step());
        assert_eq!(exp.step_type, 3);
        assert_eq!(exp.es_a, 0.244);
        assert_eq!(exp.ls_gamma_up_dtod, 0.0);
    }

    #[test]
    fn test_enum_codes_lowered() {
        let io = io_to_bindings(&IoParameters::default());
        assert_eq!(io.bound_management, 1);
        assert_eq!(io.noise_management, 1);
        assert_eq!(io.w_noise_type, 0);
        assert_eq!(update_to_bindings(&UpdateParameters::no_pulse()).pulse_type, 0);
    }

    #[test]
    fn test_difference_cell_needs_pair() {
        let cell = UnitCellDevice::Difference(DifferenceUnitCellDevice {
            unit_cell_devices: vec![PulsedDevice::default(); 3],
        });
        assert!(matches!(unit_cell_to_bindings(&cell), Err(ConfigError::Translation(_))));
    }

    #[test]
    fn test_transfer_vectors_checked() {
        let mut transfer = TransferCompound::new(vec![PulsedDevice::default(); 3]);
        transfer.transfer_lr_vec = vec![1.0, 0.5];
        assert!(unit_cell_to_bindings(&UnitCellDevice::Transfer(transfer.clone())).is_ok());
        transfer.transfer_lr_vec = vec![1.0];
        assert!(unit_cell_to_bindings(&UnitCellDevice::Transfer(transfer)).is_err());
    }

    #[test]
    fn test_single_fixed_index_in_range() {
        let mut vector = VectorUnitCellDevice::new(vec![PulsedDevice::default(); 2]);
        vector.update_policy = VectorUnitCellUpdatePolicy::SingleFixed;
        vector.first_update_idx = 2;
        assert!(unit_cell_to_bindings(&UnitCellDevice::Vector(vector)).is_err());
    }
}
