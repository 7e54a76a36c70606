use std::io::Write;

/// Writes workflow commands (`::notice::`, `::error::`, `::set-output`) for the CI runner.
pub struct WorkflowOutput<W: Write> {
    w: W,
}

impl<W: Write> WorkflowOutput<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn notice(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.w, "::notice::{}", escape_data(message))
    }

    pub fn error(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.w, "::error::{}", escape_data(message))
    }

    pub fn set_output(&mut self, name: &str, value: &str) -> std::io::Result<()> {
        writeln!(
            self.w,
            "::set-output name={}::{}",
            escape_property(name),
            escape_data(value)
        )
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.w
    }
}

pub fn stdout() -> WorkflowOutput<std::io::Stdout> {
    WorkflowOutput::new(std::io::stdout())
}

/// Keeps a command on a single line.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
