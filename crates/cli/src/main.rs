//! rog-keys CLI: turns ROG mouse macro buttons into key events.

mod inject;

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rog_keys_core::device::{self, DeviceInfo, InterfaceFilter};
use rog_keys_core::keymap::StandardKey;
use rog_keys_core::session::{ReportOutcome, Session, SessionRegistry};
use rog_keys_core::sink::{KeyEvent, KeySink};
use rog_keys_core::KEYBOARD_INTERFACE;
use tracing::{debug, warn};

/// Largest report any ROG interface sends.
const READ_BUF_LEN: usize = 64;

/// Sink that prints every event to stdout.
struct PrintSink {
    label: Option<String>,
    json: bool,
}

impl PrintSink {
    fn new(label: Option<String>, json: bool) -> Self {
        Self { label, json }
    }

    fn emit(&self, event: KeyEvent) {
        let line = if self.json {
            let mut value = match serde_json::to_value(event) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "failed to serialize key event");
                    return;
                }
            };
            if let (Some(label), Some(obj)) = (&self.label, value.as_object_mut()) {
                obj.insert("device".into(), label.clone().into());
            }
            value.to_string()
        } else {
            match &self.label {
                Some(label) => format!("{label}: {event}"),
                None => event.to_string(),
            }
        };

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}").and_then(|_| stdout.flush()) {
            warn!(error = %e, "failed to write key event");
        }
    }
}

impl KeySink for PrintSink {
    fn press(&mut self, key: StandardKey) {
        self.emit(KeyEvent::Press(key));
    }

    fn release(&mut self, key: StandardKey) {
        self.emit(KeyEvent::Release(key));
    }

    fn sync(&mut self) {
        self.emit(KeyEvent::Sync);
    }
}

/// Parse one report given as hex, e.g. `01 00 00 04 05 00 00 00 00`.
///
/// Accepts whitespace, `:`, `,` and `-` between bytes and an optional `0x`
/// prefix on the whole string.
fn parse_hex_report(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ':' | ',' | '-'))
        .collect();

    if digits.is_empty() {
        anyhow::bail!("empty report");
    }
    if !digits.is_ascii() {
        anyhow::bail!("non-hex characters in '{input}'");
    }
    if digits.len() % 2 != 0 {
        anyhow::bail!("odd number of hex digits in '{input}'");
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte '{}' in '{input}'", &digits[i..i + 2]))
        })
        .collect()
}

#[derive(Parser)]
#[command(
    name = "rog-keys",
    version,
    about = "Turn ASUS ROG mouse macro buttons into key events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List HID interfaces of connected ROG mice.
    ListDevices,
    /// Read special-button reports from connected mice and print or inject key events.
    Listen {
        /// USB interface to read from.
        #[arg(long, default_value_t = KEYBOARD_INTERFACE)]
        interface: i32,
        /// Print events as JSON lines.
        #[arg(long, conflicts_with = "inject")]
        json: bool,
        /// Inject key events through a uinput virtual keyboard instead of printing them.
        #[arg(long)]
        inject: bool,
        /// Read timeout per device in milliseconds.
        #[arg(long, default_value_t = 50)]
        poll_ms: u64,
    },
    /// Replay hex-encoded reports through a fresh session.
    Decode {
        /// Print events as JSON lines.
        #[arg(long)]
        json: bool,
        /// Reports in hex, one argument per report.
        #[arg(required = true)]
        reports: Vec<String>,
    },
}

fn list_devices() -> Result<()> {
    let devices = device::discover_devices()?;
    if devices.is_empty() {
        println!("No ROG mice found.");
        println!("Ensure your mouse is connected and hidraw permissions are set up.");
        return Ok(());
    }

    for dev in &devices {
        println!(
            "{} (VID: 0x{:04X}, PID: 0x{:04X}, interface: {}{}, reports: {}, path: {})",
            dev.model.name(),
            dev.vid,
            dev.pid,
            dev.interface_number,
            if dev.is_key_interface() { " [keys]" } else { "" },
            dev.model.report_format(),
            dev.path
        );
    }
    Ok(())
}

fn listen(interface: i32, json: bool, inject: bool, poll_ms: u64) -> Result<()> {
    let targets = device::discover(InterfaceFilter::Only(interface))?;
    if targets.is_empty() {
        anyhow::bail!("No ROG mouse interface {interface} found");
    }

    if inject {
        run_sessions(targets, poll_ms, |info| {
            inject::UinputSink::new(&format!("{} special keys", info.model.name()))
        })
    } else {
        let labelled = json || targets.len() > 1;
        run_sessions(targets, poll_ms, |info| {
            let label = labelled.then(|| info.path.clone());
            Ok(PrintSink::new(label, json))
        })
    }
}

/// Open every target, attach one session each and feed reports until all
/// devices are gone.
fn run_sessions<S, F>(targets: Vec<DeviceInfo>, poll_ms: u64, mut make_sink: F) -> Result<()>
where
    S: KeySink,
    F: FnMut(&DeviceInfo) -> Result<S>,
{
    let api = hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))?;
    let mut registry = SessionRegistry::new();
    let mut handles = Vec::new();

    for info in targets {
        let path = std::ffi::CString::new(info.path.clone())?;
        let handle = api
            .open_path(&path)
            .map_err(|e| anyhow::anyhow!("open HID device {}: {e}", info.path))?;
        let sink = make_sink(&info)?;
        registry.attach(info.path.clone(), sink);
        eprintln!("Listening on {} ({})", info.model.name(), info.path);
        handles.push((info.path, handle));
    }

    let timeout = i32::try_from(poll_ms).unwrap_or(i32::MAX);
    let mut buf = [0u8; READ_BUF_LEN];

    while !handles.is_empty() {
        let mut lost = Vec::new();
        for (path, handle) in &handles {
            match handle.read_timeout(&mut buf, timeout) {
                Ok(0) => {}
                Ok(n) => match registry.on_report(path, &buf[..n])? {
                    ReportOutcome::Ignored => debug!(len = n, "non-special report"),
                    outcome => debug!(?outcome, "report processed"),
                },
                Err(e) => {
                    warn!(path = %path, error = %e, "read failed, detaching device");
                    lost.push(path.clone());
                }
            }
        }
        for path in lost {
            registry.detach(&path);
            handles.retain(|(p, _)| *p != path);
            eprintln!("Device {path} detached");
        }
    }

    Ok(())
}

fn decode(reports: &[String], json: bool) -> Result<()> {
    let mut session = Session::new(PrintSink::new(None, json));
    for (i, input) in reports.iter().enumerate() {
        let data = parse_hex_report(input).with_context(|| format!("report #{}", i + 1))?;
        match session.on_report(&data) {
            ReportOutcome::Ignored => {
                eprintln!("report #{}: not a special-button report, ignored", i + 1)
            }
            ReportOutcome::Rejected => {
                eprintln!("report #{}: malformed, dropped", i + 1)
            }
            ReportOutcome::Applied { skipped, .. } if skipped > 0 => {
                eprintln!("report #{}: {skipped} unmapped code(s) skipped", i + 1)
            }
            ReportOutcome::Applied { .. } => {}
        }
    }
    eprintln!("final key state: {}", session.state());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => list_devices()?,
        Commands::Listen {
            interface,
            json,
            inject,
            poll_ms,
        } => listen(interface, json, inject, poll_ms)?,
        Commands::Decode { json, reports } => decode(&reports, json)?,
    }

    Ok(())
}
