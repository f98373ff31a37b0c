/*!
 * Pipe Relay - Main Entry Point
 *
 * Two-stage pipeline over the process console:
 * - stage 1 reads stdin through a console pipe into a buffered pipe
 * - stage 2 drains the buffered pipe to stdout through the same console pipe
 */

use anyhow::Context;
use shell_pipe::{init_tracing, BufferedPipe, ConsolePipe, Pipe, PipeConfig};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let (config, issues) = PipeConfig::from_env_checked();
    init_tracing(&config);
    for issue in &issues {
        warn!(variable = issue.variable, value = %issue.value, "{}", issue);
    }

    let terminus = Arc::new(ConsolePipe::stdio());
    let buffer = Arc::new(BufferedPipe::with_config(&config)?);

    info!(
        terminus = %terminus.kind(),
        capacity = buffer.max_capacity().as_usize(),
        "pipe relay starting"
    );

    terminus.set_readable();
    buffer.set_writable();

    let upstream = {
        let source = terminus.reader().clone();
        let buffer = buffer.clone();
        thread::Builder::new()
            .name("stage-read".to_string())
            .spawn(move || -> anyhow::Result<usize> {
                let sink = buffer.writer();
                let relayed = source.lines().try_fold(0usize, |relayed, line| {
                    sink.write_str(&line?)?;
                    Ok::<_, shell_pipe::PipeError>(relayed + 1)
                });
                // Downstream sees end-of-input even if this stage failed
                buffer.write_close();
                Ok(relayed?)
            })
            .context("failed to spawn reading stage")?
    };

    let sink = terminus.writer();
    let drained = buffer.reader().lines().try_fold(0usize, |written, line| {
        sink.write_str(&line?)?;
        Ok::<_, shell_pipe::PipeError>(written + 1)
    });
    if drained.is_err() {
        // Unblock the reading stage if it is waiting on a full buffer
        buffer.read_close();
    }
    let written = drained?;
    terminus.flush()?;

    let relayed = match upstream.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("reading stage panicked"),
    };
    if relayed != written {
        warn!(relayed, written, "stage line counts differ");
    }

    buffer.close();
    terminus.close();
    info!(lines = written, "pipe relay finished");
    Ok(())
}
