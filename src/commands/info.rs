//! Info command implementation

use ecsim_core::acpi::REGION_SIZE;
use ecsim_core::ec::commands::{ACPI_READ, GET_PROJECT, GET_VERSION};
use ecsim_core::readout::TERMINATOR;
use ecsim_core::Ec;
use ecsim_host::{open_ec, HostConfig};

/// Longest identifier accepted before giving up on the terminator
const MAX_IDENT: usize = 32;

/// Issue `command` and collect the streamed string up to the terminator
fn read_ident(ec: &mut Ec, command: u8) -> String {
    let ports = *ec.ports();
    ec.write(ports.command, command);

    let mut ident = String::new();
    for _ in 0..MAX_IDENT {
        let byte = ec.read(ports.data);
        if byte == TERMINATOR || byte == 0 {
            break;
        }
        ident.push(byte as char);
    }
    ident
}

/// Read a SuperIO register through the index/data pair
fn read_superio(ec: &mut Ec, register: u8) -> u8 {
    let ports = *ec.ports();
    ec.write(ports.superio_address, register);
    ec.read(ports.superio_data)
}

/// Read one byte of ACPI shadow memory
fn read_acpi(ec: &mut Ec, index: u8) -> u8 {
    let ports = *ec.ports();
    ec.write(ports.command, ACPI_READ);
    ec.write(ports.data, index);
    ec.read(ports.data)
}

/// Print what the EC reports about itself
pub fn cmd_info(config: &HostConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut ec = open_ec(config);
    let mode = if ec.is_low_level() {
        format!("low-level ({})", config.lle.endpoint)
    } else {
        "high-level".to_string()
    };

    let project = read_ident(&mut ec, GET_PROJECT);
    let version = read_ident(&mut ec, GET_VERSION);
    let chip_id = u16::from_be_bytes([read_superio(&mut ec, 0x20), read_superio(&mut ec, 0x21)]);
    let region_size = read_acpi(&mut ec, REGION_SIZE);
    ec.shutdown();

    println!("Emulation:   {}", mode);
    println!("Project:     {}", project);
    println!("Version:     {}", version);
    println!("SuperIO ID:  0x{:04X}", chip_id);
    println!("ACPI region: 0x{:02X} bytes", region_size);

    Ok(())
}
