// src/main.rs
// Inspects an RPU configuration file: prints the device summary, the capability
// flags and the native tile bindings the configuration translates to.

// Imports dependencies and library modules.
// - env_logger: Logging for debugging.
// - rpu_config: configuration loading and translation.
use log::{error, info};
use rpu_config::configs::loader;
use rpu_config::{BindingsClass, RpuConfigKind};
use std::error::Error;

/// Loads the configuration named on the command line (or the default single
/// device configuration) and prints what the simulator would receive.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => loader::from_yaml_file(&path)?,
        None => {
            info!("No configuration file given, using the default single device configuration");
            RpuConfigKind::Single(Default::default())
        }
    };

    let summary = config.device_summary();
    info!("Configuration kind: {}", config.name());
    println!("kind: {}", config.name());
    println!("bindings: {}", config.bindings_class().name());
    println!("device: {}", summary);
    println!("requires_diffusion: {}", config.requires_diffusion());
    println!("requires_decay: {}", config.requires_decay());

    if config.bindings_class() == BindingsClass::AnalogTile {
        match config.as_bindings() {
            Ok(bindings) => println!("{:#?}", bindings),
            Err(e) => {
                error!("Translation failed: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
