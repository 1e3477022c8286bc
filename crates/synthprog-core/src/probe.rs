//! Probe enumeration and selection
//!
//! A probe is an attached debug programmer (the J-Link on a development
//! kit), identified by its serial number. Exactly one probe has to be chosen
//! before anything is flashed.

use crate::error::{Error, Result};
use std::io::{BufRead, Write};

/// Parse the output of a probe listing (one decimal serial number per line)
pub fn parse_ids(output: &str) -> Result<Vec<u32>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<u32>()
                .map_err(|_| Error::InvalidProbeListing(line.to_string()))
        })
        .collect()
}

/// Choose the probe to program
///
/// - No probes: [`Error::NoDevice`], whatever was requested.
/// - A requested serial must be among `probes`.
/// - A single probe is used as-is; nothing is written to `output`.
/// - Otherwise the probes are listed on `output` and a 1-based index is read
///   from `input` until a valid one is entered.
pub fn select_probe<R: BufRead, W: Write>(
    probes: &[u32],
    requested: Option<u32>,
    input: R,
    output: W,
) -> Result<u32> {
    if probes.is_empty() {
        return Err(Error::NoDevice);
    }

    if let Some(snr) = requested {
        return if probes.contains(&snr) {
            Ok(snr)
        } else {
            Err(Error::ProbeNotFound(snr))
        };
    }

    if let [snr] = probes {
        log::info!("Using the only connected probe: {}", snr);
        return Ok(*snr);
    }

    prompt_selection(probes, input, output)
}

fn prompt_selection<R: BufRead, W: Write>(
    probes: &[u32],
    mut input: R,
    mut output: W,
) -> Result<u32> {
    writeln!(output, "Multiple devices connected:")?;
    for (i, snr) in probes.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, snr)?;
    }

    let mut line = String::new();
    loop {
        write!(output, "Select device [1-{}]: ", probes.len())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::SelectionAborted);
        }

        match line.trim().parse::<usize>() {
            Ok(index) if (1..=probes.len()).contains(&index) => return Ok(probes[index - 1]),
            _ => writeln!(output, "Invalid selection '{}'", line.trim())?,
        }
    }
}
