//! Host bridge used when the panels run outside the game.

use std::cell::RefCell;
use std::rc::Rc;

use hud_core::bridge::{BridgeError, HostBridge, WireCall};
use hud_core::circular_buffer::CircularBuffer;

/// Recent calls, newest first, shared with whoever displays them.
pub type CallLog = Rc<RefCell<CircularBuffer<String>>>;

/// Logs every call at `info` and keeps the most recent ones in a [`CallLog`].
pub struct LoggingBridge {
    log: CallLog,
}

impl LoggingBridge {
    pub fn new(history_len: usize) -> Self {
        Self {
            log: Rc::new(RefCell::new(CircularBuffer::new(history_len))),
        }
    }

    pub fn call_log(&self) -> CallLog {
        Rc::clone(&self.log)
    }
}

pub fn describe(call: &WireCall) -> String {
    format!("{}({})", call.function, call.args.join(", "))
}

impl HostBridge for LoggingBridge {
    fn invoke(&mut self, call: &WireCall) -> Result<(), BridgeError> {
        let line = describe(call);
        log::info!("[stub] {line}");
        self.log.borrow_mut().push(line);
        Ok(())
    }
}
