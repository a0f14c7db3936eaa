//! The emulated embedded controller
//!
//! [`Ec`] owns every piece of EC state and answers the host's port reads and
//! writes. If a low-level emulation peer is attached it gets the first shot
//! at every access; otherwise the access is routed by port to the SuperIO
//! register file or the EC command interface.
//!
//! # Command interface
//!
//! | Command | Effect |
//! |---------|--------|
//! | `0x80`  | next data write is an ACPI index, its byte is returned |
//! | `0x81`  | next two data writes are ACPI index and value |
//! | `0x92`  | data reads stream the project identifier, then `$` |
//! | `0x93`  | data reads stream the version identifier, then `$` |
//! | `0x01`  | enter SPI follow mode (see [`crate::spi`]) |
//! | `0xDC`  | returns `0x33` |
//! | `0xDE`, `0xF0` | accepted, no effect |

use bitflags::bitflags;

use crate::acpi::AcpiSpace;
use crate::config::{EcConfig, Port, PortMap};
use crate::lle::{Lle, LleRequest};
use crate::readout::{Readout, TERMINATOR};
use crate::spi::SpiFlash;
use crate::state::{SpiState, State};
use crate::superio::SuperIo;

bitflags! {
    /// EC status register, read from the command port
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EcStatus: u8 {
        /// Output buffer full: a byte is waiting in the data register
        const OUTPUT_FULL = 1 << 0;
    }
}

/// EC command opcodes
pub mod commands {
    /// Enter SPI follow mode
    pub const SPI_FOLLOW: u8 = 0x01;
    /// Read ACPI shadow memory
    pub const ACPI_READ: u8 = 0x80;
    /// Write ACPI shadow memory
    pub const ACPI_WRITE: u8 = 0x81;
    /// Read project identifier
    pub const GET_PROJECT: u8 = 0x92;
    /// Read version identifier
    pub const GET_VERSION: u8 = 0x93;
    /// Vendor command, answers [`VENDOR_DC_RESPONSE`]
    pub const VENDOR_DC: u8 = 0xDC;
    /// Vendor command, no visible effect
    pub const VENDOR_DE: u8 = 0xDE;
    /// Vendor command, no visible effect
    pub const VENDOR_F0: u8 = 0xF0;

    /// Byte staged by [`VENDOR_DC`]
    pub const VENDOR_DC_RESPONSE: u8 = 0x33;
}

/// Emulated embedded controller
#[derive(Debug)]
pub struct Ec {
    ports: PortMap,
    status: EcStatus,
    data: u8,
    state: State,
    acpi: AcpiSpace,
    project: Readout,
    version: Readout,
    superio: SuperIo,
    spi: SpiFlash,
    lle: Lle,
}

impl Ec {
    /// Create an EC using only the internal model
    pub fn new(config: &EcConfig) -> Self {
        let ec = Self::build(config);
        log::info!("EC using high-level emulation");
        ec
    }

    /// Create an EC that forwards to a low-level emulation peer while it answers
    pub fn with_lle(config: &EcConfig, lle: Lle) -> Self {
        let mut ec = Self::build(config);
        ec.lle = lle;
        if ec.is_low_level() {
            log::info!("EC using low-level emulation");
        } else {
            log::info!("EC using high-level emulation");
        }
        ec
    }

    fn build(config: &EcConfig) -> Self {
        Self {
            ports: config.ports,
            status: EcStatus::empty(),
            data: 0,
            state: State::Idle,
            acpi: AcpiSpace::default(),
            project: Readout::new(&config.project),
            version: Readout::new(&config.version),
            superio: SuperIo::new(config.superio_id),
            spi: SpiFlash::new(config.spi_status, config.jedec_id),
            lle: Lle::disconnected(),
        }
    }

    /// Port assignment
    pub fn ports(&self) -> &PortMap {
        &self.ports
    }

    /// Current protocol state
    pub fn state(&self) -> State {
        self.state
    }

    /// Status register as seen on the command port
    pub fn status(&self) -> EcStatus {
        self.status
    }

    /// Data register contents
    pub fn data(&self) -> u8 {
        self.data
    }

    /// ACPI shadow memory
    pub fn acpi(&self) -> &AcpiSpace {
        &self.acpi
    }

    /// SuperIO register file
    pub fn superio(&self) -> &SuperIo {
        &self.superio
    }

    /// Flash behind follow mode
    pub fn spi(&self) -> &SpiFlash {
        &self.spi
    }

    /// Project identifier readout
    pub fn project(&self) -> &Readout {
        &self.project
    }

    /// Version identifier readout
    pub fn version(&self) -> &Readout {
        &self.version
    }

    /// Whether accesses are currently answered by the low-level peer
    pub fn is_low_level(&self) -> bool {
        self.lle.is_connected()
    }

    /// Close the low-level peer channel
    pub fn shutdown(&mut self) {
        self.lle.close();
    }

    /// Read an I/O port
    pub fn read(&mut self, port: u8) -> u8 {
        if let Some(value) = self.lle.request(LleRequest::Read, port, 0) {
            return value;
        }

        let target = self.ports.decode(port);
        if target == Some(Port::Data) {
            self.stream_ident();
        }

        match target {
            Some(Port::SuperIoAddress) => {
                let value = self.superio.address();
                log::debug!("read superio addr 0x{:02X}", value);
                value
            }
            Some(Port::SuperIoData) => {
                let value = self.superio.read_data();
                log::debug!(
                    "read superio data 0x{:02X} = 0x{:02X}",
                    self.superio.address(),
                    value
                );
                value
            }
            Some(Port::Data) => {
                let value = self.data;
                self.data = 0;
                self.status.remove(EcStatus::OUTPUT_FULL);
                log::debug!("read data:     0x{:02X}", value);
                value
            }
            Some(Port::Command) => self.status.bits(),
            None => {
                log::warn!("read unsupported 0x{:02X}", port);
                0
            }
        }
    }

    /// Write an I/O port
    pub fn write(&mut self, port: u8, value: u8) {
        if self.lle.request(LleRequest::Write, port, value).is_some() {
            return;
        }

        match self.ports.decode(port) {
            Some(Port::SuperIoAddress) => {
                self.superio.set_address(value);
                log::debug!("write superio addr 0x{:02X}", value);
            }
            Some(Port::SuperIoData) => {
                self.superio.write_data(value);
                log::debug!(
                    "write superio data 0x{:02X} = 0x{:02X}",
                    self.superio.address(),
                    value
                );
            }
            Some(Port::Data) => self.write_data(value),
            Some(Port::Command) => self.write_command(value),
            None => log::warn!("write unsupported 0x{:02X}: 0x{:02X}", port, value),
        }
    }

    fn stage(&mut self, value: u8) {
        self.data = value;
        self.status.insert(EcStatus::OUTPUT_FULL);
    }

    /// Put the next identifier byte in the data register once the previous one was taken
    fn stream_ident(&mut self) {
        if self.status.contains(EcStatus::OUTPUT_FULL) {
            return;
        }
        let readout = match self.state {
            State::GetProject => &mut self.project,
            State::GetVersion => &mut self.version,
            _ => return,
        };
        let byte = match readout.next_byte() {
            Some(byte) => byte,
            None => {
                self.state = State::Idle;
                TERMINATOR
            }
        };
        self.stage(byte);
    }

    fn write_data(&mut self, value: u8) {
        log::debug!("write data:    0x{:02X} in {:?}", value, self.state);

        match self.state {
            State::GetAcpi => {
                self.state = State::Idle;
                let byte = self.acpi.get(value);
                self.stage(byte);
                log::debug!("get acpi space 0x{:02X} = 0x{:02X}", value, byte);
            }
            State::SetAcpi => {
                self.state = State::SetAcpiIndex(value);
                log::debug!("set acpi space 0x{:02X}", value);
            }
            State::SetAcpiIndex(index) => {
                self.state = State::Idle;
                self.acpi.set(index, value);
                log::debug!("set acpi space 0x{:02X} = 0x{:02X}", index, value);
            }
            State::Spi(spi) if spi.takes_payload() => {
                self.state = State::Spi(self.spi.payload(spi, value));
            }
            _ => log::debug!("data 0x{:02X} unsupported", value),
        }
    }

    fn write_command(&mut self, value: u8) {
        log::debug!("write command: 0x{:02X} in {:?}", value, self.state);

        if let Some(spi) = self.state.spi() {
            let step = self.spi.control(spi, value);
            self.state = step.next.map_or(State::Idle, State::Spi);
            if let Some(byte) = step.response {
                self.stage(byte);
            }
            return;
        }

        match value {
            commands::SPI_FOLLOW => self.state = State::Spi(SpiState::Follow),
            commands::ACPI_READ => self.state = State::GetAcpi,
            commands::ACPI_WRITE => self.state = State::SetAcpi,
            commands::GET_PROJECT => {
                self.state = State::GetProject;
                self.project.rewind();
            }
            commands::GET_VERSION => {
                self.state = State::GetVersion;
                self.version.rewind();
            }
            commands::VENDOR_DC => {
                self.state = State::Idle;
                self.stage(commands::VENDOR_DC_RESPONSE);
            }
            commands::VENDOR_DE | commands::VENDOR_F0 => self.state = State::Idle,
            _ => log::debug!("command 0x{:02X} unsupported", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::opcodes::*;

    const SIO_ADDR: u8 = 0x2E;
    const SIO_DATA: u8 = 0x2F;
    const DATA: u8 = 0x62;
    const CMD: u8 = 0x66;

    fn ec() -> Ec {
        Ec::new(&EcConfig::default())
    }

    /// Read an identifier up to its terminator using data-port reads only
    fn read_ident(ec: &mut Ec, command: u8) -> alloc::vec::Vec<u8> {
        ec.write(CMD, command);
        let mut out = alloc::vec::Vec::new();
        loop {
            let byte = ec.read(DATA);
            out.push(byte);
            if byte == TERMINATOR || out.len() > 32 {
                break;
            }
        }
        out
    }

    /// Issue a flash opcode from follow mode
    fn flash_opcode(ec: &mut Ec, opcode: u8) {
        ec.write(CMD, CTL_COMMAND);
        ec.write(DATA, opcode);
    }

    #[test]
    fn test_superio_address_latch() {
        let mut ec = ec();
        for v in 0..=255u8 {
            ec.write(SIO_ADDR, v);
            assert_eq!(ec.read(SIO_ADDR), v);
        }
    }

    #[test]
    fn test_superio_data() {
        let mut ec = ec();
        for a in 0..=255u8 {
            let v = a ^ 0x5A;
            ec.write(SIO_ADDR, a);
            ec.write(SIO_DATA, v);
            ec.write(SIO_ADDR, 0x42);
            ec.write(SIO_ADDR, a);
            assert_eq!(ec.read(SIO_DATA), v);
        }
    }

    #[test]
    fn test_superio_chip_id() {
        let mut ec = ec();
        ec.write(SIO_ADDR, 0x20);
        assert_eq!(ec.read(SIO_DATA), 0x85);
        ec.write(SIO_ADDR, 0x21);
        assert_eq!(ec.read(SIO_DATA), 0x87);
    }

    #[test]
    fn test_project_readout() {
        let mut ec = ec();
        assert_eq!(read_ident(&mut ec, commands::GET_PROJECT), b"N130ZU$");
        assert_eq!(ec.state(), State::Idle);

        // Re-trigger restarts from the first byte
        ec.write(CMD, commands::GET_PROJECT);
        assert_eq!(ec.read(DATA), b'N');
        assert_eq!(ec.state(), State::GetProject);
        assert_eq!(read_ident(&mut ec, commands::GET_PROJECT), b"N130ZU$");
    }

    #[test]
    fn test_project_state_until_terminator() {
        let mut ec = ec();
        ec.write(CMD, commands::GET_PROJECT);
        for &expected in b"N130ZU" {
            assert_eq!(ec.read(DATA), expected);
            assert_eq!(ec.state(), State::GetProject);
        }
        assert_eq!(ec.read(DATA), TERMINATOR);
        assert_eq!(ec.state(), State::Idle);
        // Nothing staged afterwards
        assert_eq!(ec.read(DATA), 0);
    }

    #[test]
    fn test_version_readout() {
        let mut ec = ec();
        assert_eq!(read_ident(&mut ec, commands::GET_VERSION), b"07.02$");
    }

    #[test]
    fn test_status_read_leaves_readout() {
        let mut ec = ec();
        ec.write(CMD, commands::GET_PROJECT);
        for _ in 0..3 {
            assert_eq!(ec.read(CMD), 0);
            assert_eq!(ec.project().cursor(), 0);
            assert_eq!(ec.data(), 0);
        }
        ec.write(SIO_ADDR, 0x20);
        assert_eq!(ec.read(SIO_DATA), 0x85);
        assert_eq!(ec.project().cursor(), 0);

        assert_eq!(ec.read(DATA), b'N');
        assert_eq!(ec.project().cursor(), 1);
        assert_eq!(ec.read(CMD), 0);
        assert_eq!(ec.read(DATA), b'1');
    }

    #[test]
    fn test_output_full_flag() {
        let mut ec = ec();
        assert_eq!(ec.read(CMD), 0);
        ec.write(CMD, commands::ACPI_READ);
        ec.write(DATA, 0x10);
        assert!(ec.status().contains(EcStatus::OUTPUT_FULL));
        assert_eq!(ec.read(CMD), 0x01);
        assert_eq!(ec.read(DATA), 0x05);
        assert!(!ec.status().contains(EcStatus::OUTPUT_FULL));
        assert_eq!(ec.data(), 0);
        assert_eq!(ec.state(), State::Idle);
    }

    #[test]
    fn test_acpi_write_then_read() {
        let mut ec = ec();
        ec.write(CMD, commands::ACPI_WRITE);
        ec.write(DATA, 0x40);
        assert_eq!(ec.state(), State::SetAcpiIndex(0x40));
        ec.write(DATA, 0x99);
        assert_eq!(ec.state(), State::Idle);

        ec.write(CMD, commands::ACPI_READ);
        ec.write(DATA, 0x40);
        assert_eq!(ec.read(DATA), 0x99);
        assert_eq!(ec.read(CMD), 0);
    }

    #[test]
    fn test_acpi_size_register() {
        let mut ec = ec();
        ec.write(CMD, commands::ACPI_READ);
        ec.write(DATA, 0xE5);
        assert_eq!(ec.read(DATA), 0x80);
    }

    #[test]
    fn test_acpi_command_record() {
        let mut ec = ec();
        for (index, value) in [(0xF9u8, 0x20u8), (0xFA, 0x02), (0xFB, 0x00), (0xF8, 0xB1)] {
            ec.write(CMD, commands::ACPI_WRITE);
            ec.write(DATA, index);
            ec.write(DATA, value);
        }
        ec.write(CMD, commands::ACPI_READ);
        ec.write(DATA, 0xF9);
        assert_eq!(ec.read(DATA), 0x06);
    }

    #[test]
    fn test_vendor_commands() {
        let mut ec = ec();
        ec.write(CMD, commands::VENDOR_DC);
        assert_eq!(ec.state(), State::Idle);
        assert_eq!(ec.read(CMD), 0x01);
        assert_eq!(ec.read(DATA), 0x33);

        ec.write(CMD, commands::ACPI_READ);
        ec.write(CMD, commands::VENDOR_DE);
        assert_eq!(ec.state(), State::Idle);
        assert_eq!(ec.read(CMD), 0);

        ec.write(CMD, commands::GET_VERSION);
        ec.write(CMD, commands::VENDOR_F0);
        assert_eq!(ec.state(), State::Idle);
    }

    #[test]
    fn test_unknown_command_keeps_state() {
        let mut ec = ec();
        ec.write(CMD, commands::ACPI_READ);
        ec.write(CMD, 0x42);
        assert_eq!(ec.state(), State::GetAcpi);
        assert_eq!(ec.read(CMD), 0);
    }

    #[test]
    fn test_unsupported_port() {
        let mut ec = ec();
        assert_eq!(ec.read(0x60), 0);
        ec.write(0x60, 0xFF);
        assert_eq!(ec.state(), State::Idle);
        assert_eq!(ec.read(CMD), 0);
    }

    #[test]
    fn test_data_write_in_idle_ignored() {
        let mut ec = ec();
        ec.write(DATA, 0x12);
        assert_eq!(ec.state(), State::Idle);
        assert_eq!(ec.read(CMD), 0);
    }

    #[test]
    fn test_sector_erase_address() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, SE_20);
        assert_eq!(ec.state(), State::Spi(SpiState::SectorErase));

        ec.write(CMD, CTL_WRITE);
        assert_eq!(ec.state(), State::Spi(SpiState::SectorEraseAddress));
        for byte in [0x78, 0x56, 0x34] {
            ec.write(DATA, byte);
            assert_eq!(ec.state(), State::Spi(SpiState::SectorEraseAddress));
            assert_ne!(ec.spi().latch().remaining(), 0);
        }
        ec.write(DATA, 0x12);
        assert_eq!(ec.spi().latch().remaining(), 0);
        assert_eq!(ec.state(), State::Spi(SpiState::Follow));
        assert_eq!(ec.spi().last_address(), Some(0x1234_5678));
    }

    #[test]
    fn test_sector_erase_d7() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, SE_D7);
        assert_eq!(ec.state(), State::Spi(SpiState::SectorErase));
    }

    #[test]
    fn test_write_enable_latch() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);

        flash_opcode(&mut ec, WREN);
        assert_eq!(ec.state(), State::Spi(SpiState::Follow));
        flash_opcode(&mut ec, RDSR);
        ec.write(CMD, CTL_READ);
        assert_eq!(ec.read(DATA) & SR_WEL, SR_WEL);

        flash_opcode(&mut ec, WRDI);
        flash_opcode(&mut ec, RDSR);
        ec.write(CMD, CTL_READ);
        assert_eq!(ec.read(DATA) & SR_WEL, 0);
        assert_eq!(ec.spi().status().bits(), 0x1C);
    }

    #[test]
    fn test_jedec_readout() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, RDID);

        let mut id = [0u8; 4];
        for byte in id.iter_mut() {
            ec.write(CMD, CTL_READ);
            assert_eq!(ec.read(CMD) & 1, 1);
            *byte = ec.read(DATA);
        }
        assert_eq!(id, [0xFF, 0xFF, 0xFE, 0xFF]);

        // Fifth attempt stages nothing
        ec.write(CMD, CTL_READ);
        assert_eq!(ec.read(CMD) & 1, 0);
        assert_eq!(ec.read(DATA), 0);
    }

    #[test]
    fn test_write_status_register() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, WRSR);
        ec.write(CMD, CTL_WRITE);
        ec.write(DATA, 0x00);
        assert_eq!(ec.state(), State::Spi(SpiState::WriteStatus));
        assert_eq!(ec.spi().status().bits(), 0x00);
    }

    #[test]
    fn test_hs_read() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, FAST_READ);
        ec.write(CMD, CTL_WRITE);
        for byte in [0x00, 0x20, 0x00, 0x00] {
            ec.write(DATA, byte);
        }
        assert_eq!(ec.state(), State::Spi(SpiState::HsReadAddress));
        ec.write(DATA, 0x00);
        assert_eq!(ec.state(), State::Spi(SpiState::HsReadData));

        ec.write(CMD, CTL_READ);
        assert_eq!(ec.read(DATA), 0xFF);
        assert_eq!(ec.spi().last_address(), Some(0x2000));
    }

    #[test]
    fn test_follow_unfollow() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        assert_eq!(ec.state(), State::Spi(SpiState::Follow));
        ec.write(CMD, CTL_COMMAND);
        assert_eq!(ec.state(), State::Spi(SpiState::Command));
        ec.write(CMD, CTL_FOLLOW);
        assert_eq!(ec.state(), State::Spi(SpiState::Follow));
        ec.write(CMD, CTL_UNFOLLOW);
        assert_eq!(ec.state(), State::Idle);

        // Back at the top level, 0x92 is a command again
        ec.write(CMD, commands::GET_PROJECT);
        assert_eq!(ec.state(), State::GetProject);
    }

    #[test]
    fn test_aai_program_entered() {
        let mut ec = ec();
        ec.write(CMD, commands::SPI_FOLLOW);
        flash_opcode(&mut ec, AAI_WP);
        assert_eq!(ec.state(), State::Spi(SpiState::AaiProgram));
        ec.write(DATA, 0xAB);
        assert_eq!(ec.state(), State::Spi(SpiState::AaiProgram));
        ec.write(CMD, CTL_FOLLOW);
        assert_eq!(ec.state(), State::Spi(SpiState::Follow));
    }

    #[test]
    fn test_custom_ports() {
        let mut config = EcConfig::default();
        config.ports.data = 0x68;
        config.ports.command = 0x6C;
        let mut ec = Ec::new(&config);
        ec.write(0x6C, commands::GET_VERSION);
        assert_eq!(ec.read(0x68), b'0');
        assert_eq!(ec.read(0x62), 0);
    }

    #[cfg(feature = "std")]
    mod bypass {
        use super::*;
        use crate::lle::tests::ScriptedTransport;
        use crate::lle::Lle;
        use alloc::boxed::Box;
        use core::sync::atomic::Ordering;

        #[test]
        fn test_fallback_after_failure() {
            // init ok, first read answered by the peer, second fails
            let transport = ScriptedTransport::new(&[Some(0x00), Some(0xAB), None, Some(0xCD)]);
            let calls = transport.calls.clone();
            let mut ec = Ec::with_lle(&EcConfig::default(), Lle::connect(Box::new(transport)));
            assert!(ec.is_low_level());

            // The internal status register would read 0
            assert_eq!(ec.read(CMD), 0xAB);
            assert_eq!(calls.load(Ordering::SeqCst), 2);

            ec.write(SIO_ADDR, 0x20);
            assert!(!ec.is_low_level());
            assert_eq!(ec.superio().address(), 0x20);
            assert_eq!(ec.read(SIO_DATA), 0x85);
            assert_eq!(ec.read(SIO_DATA), 0x85);
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[test]
        fn test_peer_answers_reads() {
            let transport = ScriptedTransport::new(&[Some(0x00), Some(0x5A), Some(0x00)]);
            let sent = transport.sent.clone();
            let mut ec = Ec::with_lle(&EcConfig::default(), Lle::connect(Box::new(transport)));

            assert_eq!(ec.read(CMD), 0x5A);
            ec.write(CMD, commands::GET_PROJECT);
            // Internal state never saw the command
            assert_eq!(ec.state(), State::Idle);

            let sent = sent.lock().unwrap();
            assert_eq!(sent[1], [0x01, CMD, 0x00]);
            assert_eq!(sent[2], [0x02, CMD, commands::GET_PROJECT]);
        }

        #[test]
        fn test_shutdown_closes_channel() {
            let transport = ScriptedTransport::new(&[Some(0x00), Some(0x01)]);
            let calls = transport.calls.clone();
            let mut ec = Ec::with_lle(&EcConfig::default(), Lle::connect(Box::new(transport)));
            ec.shutdown();
            assert!(!ec.is_low_level());
            assert_eq!(ec.read(CMD), 0);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
