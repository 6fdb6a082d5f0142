use std::io::Write;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use evmap::cli::{self, Op};
use evmap::client;
use evmap::device::TableDevice;

fn main() -> Result<()> {
    evmap::tracing::init();

    let ops = cli::parse_ops().map_err(|e| anyhow!(e))?;
    run(ops)
}

fn run(ops: Vec<Op>) -> Result<()> {
    let mut device: Option<TableDevice> = None;
    let mut stdout = std::io::stdout().lock();

    for op in ops {
        match op {
            Op::SelectDevice(path) => {
                let loaded = TableDevice::load(&path)
                    .with_context(|| format!("cannot open device table {}", path.display()))?;
                info!(path = %path.display(), "selected device");
                device = Some(loaded);
            }
            Op::PrintMap => {
                let dev = device.as_ref().ok_or_else(|| anyhow!("No device opened"))?;
                client::print_keymap(dev, &mut stdout)?;
                stdout.flush()?;
            }
            Op::SetKey(expr) => {
                let dev = device.as_mut().ok_or_else(|| anyhow!("No device opened"))?;
                let outcome = client::set_keycode(dev, &expr)
                    .with_context(|| format!("cannot apply {}", expr))?;
                writeln!(
                    stdout,
                    "previous keycode: {}",
                    client::describe_keycode(outcome.old_keycode)
                )?;
            }
        }
    }

    Ok(())
}
