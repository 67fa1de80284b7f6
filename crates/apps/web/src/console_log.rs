//! `tracing` output for the browser: each formatted event goes to the
//! `console` method matching its level.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Log,
}

impl ConsoleMethod {
    fn for_level(level: Level) -> Self {
        match level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Info,
            _ => ConsoleMethod::Log,
        }
    }

    fn emit(self, line: &str) {
        let msg = JsValue::from_str(line);
        match self {
            ConsoleMethod::Error => web_sys::console::error_1(&msg),
            ConsoleMethod::Warn => web_sys::console::warn_1(&msg),
            ConsoleMethod::Info => web_sys::console::info_1(&msg),
            ConsoleMethod::Log => web_sys::console::log_1(&msg),
        }
    }
}

/// Buffers one formatted event and prints it when dropped.
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buf: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buf);
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
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
        if let Some(line) = self.take_line() {
            self.method.emit(&line);
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Log)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::for_level(*meta.level()))
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init() {
    // wasm32 has no system clock for the default timestamps.
    let _ = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .try_init();
}
