//! Browser console logging.
//!
//! Installs a `tracing-subscriber` fmt subscriber whose writer forwards each
//! formatted event to the console method matching its level.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Most verbose level logged unless the page asks for more.
pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Install the console subscriber. Later calls are no-ops.
pub fn init(max_level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_max_level(max_level)
        .try_init();
}

/// Hands out one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and sends it to the console when dropped.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(message) = take_message(&mut self.buf) else {
            return;
        };
        let message = JsValue::from_str(&message);

        match self.level {
            Level::ERROR => console::error_1(&message),
            Level::WARN => console::warn_1(&message),
            Level::INFO => console::info_1(&message),
            Level::DEBUG => console::debug_1(&message),
            _ => console::log_1(&message),
        }
    }
}

/// Drain the buffer into one line of text, without the trailing newline.
fn take_message(buf: &mut Vec<u8>) -> Option<String> {
    let text = String::from_utf8_lossy(buf).trim_end().to_string();
    buf.clear();
    (!text.is_empty()).then_some(text)
}
