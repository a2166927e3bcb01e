// Translation of configurations into native analog tile bindings.

use rpu_config::bindings::DeviceParameter;
use rpu_config::devices::{DifferenceUnitCellDevice, VectorUnitCellDevice};
use rpu_config::{
    AnalogRpuConfig, ConfigError, IdealDevice, InferenceRpuConfig, IoParameters, PulseType, PulsedDevice,
    RpuConfigKind, SingleRpuConfig, UnitCellDevice, UnitCellRpuConfig, UpdateParameters,
};
use rstest::rstest;

fn tagged(seed: u32) -> PulsedDevice {
    PulsedDevice {
        construction_seed: seed,
        ..PulsedDevice::default()
    }
}

fn seeds(device: &DeviceParameter) -> Vec<u32> {
    device.devices().iter().map(|d| d.construction_seed).collect()
}

#[test]
fn test_single_translation_is_deterministic() {
    let mut config = SingleRpuConfig::new(PulsedDevice::linear_step().with_lifetime(100.0)).unwrap();
    config.forward.inp_noise = 0.01;
    let first = config.as_bindings().unwrap();
    let second = config.as_bindings().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.device.devices()[0].lifetime, 100.0);
}

#[test]
fn test_single_translation_copies_all_passes() {
    let mut config = SingleRpuConfig::default();
    config.forward.out_noise = 0.1;
    config.backward.out_noise = 0.2;
    config.update.desired_bl = 10;
    let bindings = config.as_bindings().unwrap();
    assert_eq!(bindings.forward_io.out_noise, 0.1);
    assert_eq!(bindings.backward_io.out_noise, 0.2);
    assert_eq!(bindings.update.desired_bl, 10);
    assert_eq!(bindings.update.pulse_type, PulseType::StochasticCompressed.code());
}

#[rstest]
#[case(vec![1, 2, 3])]
#[case(vec![3, 1, 2])]
#[case(vec![2, 3, 1])]
fn test_unit_cell_order_preserved(#[case] order: Vec<u32>) {
    let devices = order.iter().map(|&seed| tagged(seed)).collect();
    let config = UnitCellRpuConfig::new(UnitCellDevice::Vector(VectorUnitCellDevice::new(devices))).unwrap();
    let bindings = config.as_bindings().unwrap();
    assert!(matches!(bindings.device, DeviceParameter::Vector(_)));
    assert_eq!(seeds(&bindings.device), order);
}

#[test]
fn test_difference_pair_order_preserved() {
    let cell = UnitCellDevice::Difference(DifferenceUnitCellDevice::pair(tagged(7), tagged(9)));
    let bindings = UnitCellRpuConfig::new(cell).unwrap().as_bindings().unwrap();
    assert!(matches!(bindings.device, DeviceParameter::Difference(_)));
    assert_eq!(seeds(&bindings.device), vec![7, 9]);
}

#[test]
fn test_empty_unit_cell_does_not_translate() {
    let config = UnitCellRpuConfig {
        device: UnitCellDevice::Vector(VectorUnitCellDevice::new(Vec::new())),
        ..UnitCellRpuConfig::default()
    };
    assert_eq!(config.as_bindings(), Err(ConfigError::EmptyUnitCell));
}

#[test]
fn test_difference_cell_with_three_devices_fails() {
    let config = UnitCellRpuConfig::new(UnitCellDevice::Difference(DifferenceUnitCellDevice {
        unit_cell_devices: vec![tagged(1), tagged(2), tagged(3)],
    }))
    .unwrap();
    assert!(matches!(config.as_bindings(), Err(ConfigError::Translation(_))));
}

#[rstest]
#[case::forward(|c: &mut SingleRpuConfig| c.forward.inp_noise = -1.0, "inp_noise")]
#[case::backward(|c: &mut SingleRpuConfig| c.backward.out_bound = 0.0, "out_bound")]
#[case::update(|c: &mut SingleRpuConfig| c.update.x_res_implicit = -0.5, "x_res_implicit")]
#[case::device(|c: &mut SingleRpuConfig| c.device.w_max_dtod = -0.1, "w_max_dtod")]
fn test_nested_validation_propagates(#[case] corrupt: fn(&mut SingleRpuConfig), #[case] expected: &str) {
    let mut config = SingleRpuConfig::default();
    corrupt(&mut config);
    match config.as_bindings() {
        Err(ConfigError::InvalidParameter { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected invalid {}, got {:?}", expected, other),
    }
}

#[test]
fn test_inference_end_to_end() {
    let forward = IoParameters {
        out_noise: 0.05,
        ..IoParameters::default()
    };
    let config = InferenceRpuConfig::new(forward).unwrap();

    assert_eq!(config.device(), &IdealDevice::default());
    assert_eq!(config.backward(), &IoParameters::perfect());
    assert_eq!(config.update(), &UpdateParameters::no_pulse());

    let bindings = config.as_bindings().unwrap();
    assert_eq!(bindings.forward_io.out_noise, 0.05);
    assert!(!bindings.forward_io.is_perfect);
    assert!(bindings.backward_io.is_perfect);
    assert_eq!(bindings.update.pulse_type, PulseType::None.code());
    assert!(matches!(bindings.device, DeviceParameter::Ideal(_)));
    assert!(bindings.device.devices().is_empty());
}

#[test]
fn test_floating_point_has_no_analog_tile() {
    let config = RpuConfigKind::FloatingPoint(Default::default());
    assert!(matches!(config.as_bindings(), Err(ConfigError::UnsupportedTranslation(_))));
}

#[test]
fn test_configuration_reused_for_several_tiles() {
    let config = RpuConfigKind::from(UnitCellRpuConfig::default());
    let tiles: Vec<_> = (0..3).map(|_| config.as_bindings().unwrap()).collect();
    assert!(tiles.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(tiles[0].device.devices().len(), 2);
}
