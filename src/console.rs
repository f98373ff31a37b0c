/*!
 * Console I/O Provider
 * The input source, output sink, and redirection flag a console pipe binds to
 */

use std::fmt;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

/// Line-oriented console endpoints handed to a [`ConsolePipe`](crate::pipe::ConsolePipe)
///
/// The pipe takes exclusive ownership of both streams.
pub struct ConsoleIo {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
    output_redirected: bool,
}

impl ConsoleIo {
    /// Bind the process's stdin and stdout
    ///
    /// Output counts as redirected when stdout is not a terminal.
    pub fn stdio() -> Self {
        let stdout = io::stdout();
        let output_redirected = !stdout.is_terminal();
        Self {
            input: Box::new(BufReader::new(io::stdin())),
            output: Box::new(stdout),
            output_redirected,
        }
    }

    /// Bind arbitrary streams, e.g. a file or an in-memory buffer
    pub fn from_streams<R, W>(input: R, output: W, output_redirected: bool) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            output_redirected,
        }
    }

    pub fn is_output_redirected(&self) -> bool {
        self.output_redirected
    }

    pub(crate) fn into_parts(self) -> (Box<dyn BufRead + Send>, Box<dyn Write + Send>, bool) {
        (self.input, self.output, self.output_redirected)
    }
}

impl fmt::Debug for ConsoleIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleIo")
            .field("output_redirected", &self.output_redirected)
            .finish_non_exhaustive()
    }
}
