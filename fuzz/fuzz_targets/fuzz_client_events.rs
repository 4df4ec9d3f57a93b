//! Fuzz target: `I2cClient` interrupt handling
//!
//! Decodes the input as a stream of bus phases and drives them through
//! the client engine with the link handler attached.  The engine must
//! never panic, never leave the clock stretched, and always return to
//! idle on a stop.
//!
//! cargo fuzz run fuzz_client_events

#![no_main]

use libfuzzer_sys::fuzz_target;
use templink::app::slave::{ActuationService, LinkHandler};
use templink::adapters::sim::ConsoleOutputs;
use templink::adapters::log_sink::LogEventSink;
use templink::events::CommandQueue;
use templink::i2c::{I2cClient, ProtocolState, SimClientHardware};

fuzz_target!(|data: &[u8]| {
    let mut queue = CommandQueue::new();
    let (tx, rx) = queue.split();
    let mut client = I2cClient::new(SimClientHardware::new(), 0x08);
    client.initialize();
    client.callback_register(Some(LinkHandler::new(tx)));
    let mut slave = ActuationService::new(rx);
    let mut outputs = ConsoleOutputs::default();
    let mut sink = LogEventSink::new();

    for pair in data.chunks(2) {
        let op = pair[0];
        let arg = pair.get(1).copied().unwrap_or(0);
        match op % 8 {
            0 => {
                client.hardware_mut().present_address(arg);
                client.on_interrupt();
            }
            1 => {
                client.hardware_mut().present_data(arg);
                client.on_interrupt();
            }
            2 => {
                client.hardware_mut().request_read_data();
                client.on_interrupt();
            }
            3 => {
                let _ = client.hardware_mut().shift_out();
            }
            4 => {
                client.hardware_mut().present_stop();
                client.on_interrupt();
                assert_eq!(client.state(), ProtocolState::Idle);
            }
            5 => {
                client.hardware_mut().raise_bus_collision();
                client.on_error_interrupt();
            }
            6 => {
                client.hardware_mut().raise_write_collision();
                client.on_error_interrupt();
            }
            _ => {
                slave.poll(&mut outputs, &mut sink);
            }
        }
        assert!(!client.hardware().clock_held(), "clock left stretched");
    }
});
