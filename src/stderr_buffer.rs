use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn buffer() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log lines are stored instead of being
/// written over the alternate screen.
pub fn activate() {
    *buffer() = Some(Vec::new());
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    buffer().take().unwrap_or_default()
}

pub fn is_active() -> bool {
    buffer().is_some()
}

/// Store `line` if buffering is active, otherwise print it to stderr.
pub fn emit(line: String) {
    let mut guard = buffer();
    if let Some(buf) = guard.as_mut() {
        buf.push(line);
    } else {
        drop(guard);
        eprintln!("{}", line);
    }
}

/// Log target that routes complete lines through the buffer.
#[derive(Default)]
pub struct BufferedStderr {
    pending: String,
}

impl Write for BufferedStderr {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            emit(line.trim_end_matches(['\r', '\n']).to_string());
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            emit(std::mem::take(&mut self.pending));
        }
        Ok(())
    }
}
