//! End-to-end port sequences against a simulated board, no hardware needed.

mod common;

use common::SimulatedBoard;
use std::time::Duration;
use usbio::{
    Error, OutputFormat, PortController, PortPin, PortRequest, PortTransport, Protocol,
};

const PROTOCOLS: [Protocol; 2] = [Protocol::Split, Protocol::FourByte];

fn controller(board: &SimulatedBoard, protocol: Protocol) -> PortController<Box<dyn PortTransport + '_>> {
    PortController::new(protocol.transport(board, Duration::ZERO))
}

fn run(board: &SimulatedBoard, protocol: Protocol, request: PortRequest, format: &OutputFormat) -> String {
    let state = controller(board, protocol).execute(&request).unwrap();
    request.render(state, format)
}

#[test]
fn test_read_only_defaults() {
    let board = SimulatedBoard::new(Protocol::Split, 0xAA55);
    let output = run(&board, Protocol::Split, PortRequest::default(), &OutputFormat::Hex);

    assert_eq!(output, "0xAA55");
    // Read-only: port 0 then port 1 read commands, nothing written
    assert_eq!(board.commands(), vec![0x03, 0x04]);
    assert_eq!(board.port(), 0xAA55);
}

#[test]
fn test_inverted_whole_port_write() {
    for protocol in PROTOCOLS {
        let board = SimulatedBoard::new(protocol, 0x0000);
        let request = PortRequest {
            value: Some(0x55AA),
            pin: None,
            invert: true,
        };
        let output = run(&board, protocol, request, &OutputFormat::Hex);

        assert_eq!(board.port(), 0xAA55, "{} wrote the wrong word", protocol);
        assert_eq!(output, "0x55AA");
    }
}

#[test]
fn test_single_pin_write_preserves_others() {
    for protocol in PROTOCOLS {
        let board = SimulatedBoard::new(protocol, 0xF0F0);
        let request = PortRequest {
            value: Some(1),
            pin: Some(PortPin::new(1).unwrap()),
            invert: false,
        };
        let output = run(&board, protocol, request, &OutputFormat::Hex);

        assert_eq!(board.port(), 0xF0F2);
        assert_eq!(output, "1");
    }
}

#[test]
fn test_single_pin_sequence() {
    let board = SimulatedBoard::new(Protocol::Split, 0x00FF);
    let request = PortRequest {
        value: Some(0),
        pin: Some(PortPin::new(0).unwrap()),
        invert: false,
    };
    run(&board, Protocol::Split, request, &OutputFormat::Hex);

    // Read current, write both ports, read back
    assert_eq!(board.commands(), vec![0x03, 0x04, 0x01, 0x02, 0x03, 0x04]);
    assert_eq!(board.port(), 0x00FE);
}

#[test]
fn test_binary_output() {
    let board = SimulatedBoard::new(Protocol::FourByte, 0xABCD);
    let output = run(&board, Protocol::FourByte, PortRequest::default(), &OutputFormat::Bin);
    assert_eq!(output, "0b1010101111001101");
}

#[test]
fn test_template_output() {
    let board = SimulatedBoard::new(Protocol::Split, 0x00FF);
    let format = OutputFormat::parse("state={0:#06x} ({0:d})").unwrap();
    let output = run(&board, Protocol::Split, PortRequest::default(), &format);
    assert_eq!(output, "state=0x00ff (255)");
}

#[test]
fn test_inverted_single_pin_flips_sense() {
    for protocol in PROTOCOLS {
        // Requesting 0 under inversion drives the pin high on the wire
        let board = SimulatedBoard::new(protocol, 0x0000);
        let request = PortRequest {
            value: Some(0),
            pin: Some(PortPin::new(3).unwrap()),
            invert: true,
        };
        let output = run(&board, protocol, request, &OutputFormat::Hex);
        assert_eq!(board.port(), 0x0008);
        assert_eq!(output, "0");

        let board = SimulatedBoard::new(protocol, 0xFFFF);
        let request = PortRequest {
            value: Some(5),
            ..request
        };
        let output = run(&board, protocol, request, &OutputFormat::Hex);
        assert_eq!(board.port(), 0xFFF7);
        assert_eq!(output, "1");
    }
}

#[test]
fn test_negative_literal_masks_to_port() {
    let board = SimulatedBoard::new(Protocol::Split, 0x0000);
    let request = PortRequest {
        value: Some(-2),
        pin: None,
        invert: false,
    };
    assert_eq!(run(&board, Protocol::Split, request, &OutputFormat::Hex), "0xFFFE");
}

#[test]
fn test_failed_high_byte_write_is_fatal() {
    // Write order is [0x01 low, 0x02 high]; fail the second one
    let board = SimulatedBoard::new(Protocol::Split, 0x0000).fail_write_at(1);
    let request = PortRequest {
        value: Some(0x1234),
        pin: None,
        invert: false,
    };
    let result = controller(&board, Protocol::Split).execute(&request);

    assert!(matches!(result, Err(Error::Hid(_))));
    // The low byte already landed; nothing is rolled back
    assert_eq!(board.port(), 0x0034);
    assert_eq!(board.commands(), vec![0x01, 0x02]);
}

#[test]
fn test_read_failure_aborts_before_write() {
    let board = SimulatedBoard::new(Protocol::FourByte, 0x0F0F).fail_write_at(0);
    let request = PortRequest {
        value: Some(1),
        pin: Some(PortPin::new(4).unwrap()),
        invert: false,
    };
    let result = controller(&board, Protocol::FourByte).execute(&request);

    assert!(result.is_err());
    assert_eq!(board.port(), 0x0F0F);
    assert_eq!(board.commands(), vec![0x03]);
}

#[test]
fn test_direct_read_and_write() {
    let board = SimulatedBoard::new(Protocol::Split, 0x0000);
    let controller = controller(&board, Protocol::Split);
    controller.write_state(0xBEEF).unwrap();
    assert_eq!(controller.read_state().unwrap(), 0xBEEF);
}
