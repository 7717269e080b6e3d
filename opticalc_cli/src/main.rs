//! # OptiCalc CLI
//!
//! Terminal front-end for the spectral data normalizer: point it at a
//! submission JSON file of raw wavelength rows and it prints either the
//! validated data set or the full structured error report. Useful for
//! checking measured data before sending a calculation to the engine.

use std::env;
use std::fs;
use std::process::ExitCode;

use opticalc_core::spectral::{convert_wavelength_data, RawWavelengthRow};

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: opticalc_cli <rows.json>");
        eprintln!();
        eprintln!("Validates raw measured wavelength rows, e.g.:");
        eprintln!(r#"  [{{ "w": 0.3, "direct": "0.91", "diffuse": "" }}]"#);
        return ExitCode::FAILURE;
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Error: could not read '{}': {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let rows: Vec<RawWavelengthRow> = match serde_json::from_str(&contents) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: '{}' is not a raw wavelength row array: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    println!("OptiCalc - Spectral Data Validator");
    println!("==================================");
    println!();
    println!("Rows read: {}", rows.len());

    match convert_wavelength_data(&rows) {
        Ok(data_set) => {
            println!("Coverage:  {:?}", data_set.coverage());
            println!("Status:    VALID");
            println!();
            println!("Normalized data set (JSON):");
            if let Ok(json) = serde_json::to_string_pretty(&data_set) {
                println!("{}", json);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Status:    INVALID");
            println!();
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
