use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use eventmeta::coding::{Decode, Encode};
use eventmeta::convert::{DeepStream, Minimal, Passthrough, Protobuf};
use eventmeta::{Config, Decoder, Event, Payload, PayloadFormat, Registry};
use serde::Deserialize;

mod log;

#[derive(Debug, Parser)]
#[command(name = "eventmeta")]
#[command(about = "Convert analytics event metadata into payloads", long_about = None)]
struct Cli {
	/// The log configuration.
	#[command(flatten)]
	log: log::Log,

	/// The command to execute.
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Convert events from a JSON file into framed payloads.
	///
	/// The input is either a single event or an array of events.
	Convert {
		/// The payload format: deepstream, minimal, protobuf, or a custom id such as 0x150.
		#[arg(long, default_value = "deepstream")]
		format: PayloadFormat,

		/// A TOML file configuring the built-in converters.
		#[arg(long, env = "EVENTMETA_CONFIG")]
		config: Option<PathBuf>,

		/// Convert all of the events as a single batch.
		#[arg(long)]
		batch: bool,

		/// Register a converter that forwards the buffer of custom objects with this tag.
		#[arg(long)]
		passthrough: Option<PayloadFormat>,

		/// Write one hex encoded payload per line instead of framed binary.
		#[arg(long)]
		hex: bool,

		/// The output file, stdout by default.
		#[arg(long)]
		output: Option<PathBuf>,

		/// The JSON file containing the events.
		input: PathBuf,
	},

	/// Decode a file of framed payloads and print the events as JSON.
	Inspect {
		/// The payload format the file was written with.
		#[arg(long, default_value = "deepstream")]
		format: PayloadFormat,

		/// Each payload contains a batch of events.
		#[arg(long)]
		batch: bool,

		/// The file of framed payloads.
		input: PathBuf,
	},

	/// List the built-in payload formats.
	Formats,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
	Many(Vec<Event>),
	One(Box<Event>),
}

impl Input {
	fn into_events(self) -> Vec<Event> {
		match self {
			Self::Many(events) => events,
			Self::One(event) => vec![*event],
		}
	}
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	cli.log.init();

	match cli.command {
		Command::Convert {
			format,
			config,
			batch,
			passthrough,
			hex,
			output,
			input,
		} => {
			let registry = registry(config.as_deref(), passthrough)?;
			let events = read_events(&input)?;
			let payloads = convert(&registry, format, &events, batch)?;

			let mut out: Box<dyn Write> = match output {
				Some(path) => Box::new(
					fs::File::create(&path).with_context(|| format!("failed to create {}", path.display()))?,
				),
				None => Box::new(io::stdout().lock()),
			};

			write_payloads(&mut out, &payloads, hex)?;
			out.flush()?;

			tracing::info!(%format, events = events.len(), payloads = payloads.len(), "converted");
		}
		Command::Inspect { format, batch, input } => {
			let buffer = fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
			let events = inspect(format, Bytes::from(buffer), batch)?;

			let mut out = io::stdout().lock();
			for event in events {
				writeln!(out, "{}", event.to_string_pretty()?)?;
			}
		}
		Command::Formats => {
			let mut out = io::stdout().lock();
			for format in PayloadFormat::BUILTIN {
				writeln!(out, "{}\t{}", format.value(), format)?;
			}
		}
	}

	Ok(())
}

fn registry(config: Option<&Path>, passthrough: Option<PayloadFormat>) -> anyhow::Result<Registry> {
	let config = match config {
		Some(path) => {
			Config::from_file(path).with_context(|| format!("failed to load config from {}", path.display()))?
		}
		None => Config::default(),
	};

	let mut registry = Registry::with_defaults(config);

	if let Some(format) = passthrough {
		let tag = format.value();
		registry
			.register_plugin(&format!("passthrough_{tag:#x}"), Passthrough::new(tag)?)
			.context("failed to register passthrough converter")?;
	}

	Ok(registry)
}

fn read_events(path: &Path) -> anyhow::Result<Vec<Event>> {
	let file = fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let input: Input = serde_json::from_reader(io::BufReader::new(file)).context("failed to parse events")?;
	Ok(input.into_events())
}

fn convert(registry: &Registry, format: PayloadFormat, events: &[Event], batch: bool) -> anyhow::Result<Vec<Payload>> {
	if batch {
		let payloads = registry.convert_batch(format, events)?;

		// Failed events were already logged by the registry.
		return Ok(payloads.into_iter().filter_map(Result::ok).collect());
	}

	events
		.iter()
		.enumerate()
		.map(|(index, event)| {
			registry
				.convert(format, event)
				.with_context(|| format!("failed to convert event {index}"))
		})
		.collect()
}

fn write_payloads<W: Write>(out: &mut W, payloads: &[Payload], hex: bool) -> anyhow::Result<()> {
	if hex {
		for payload in payloads {
			writeln!(out, "{}", hex::encode(payload.as_slice()))?;
		}
		return Ok(());
	}

	let mut buf = Vec::new();
	for payload in payloads {
		payload.encode(&mut buf);
	}
	out.write_all(&buf)?;

	Ok(())
}

fn decoder(format: PayloadFormat) -> anyhow::Result<Box<dyn Decoder>> {
	let decoder: Box<dyn Decoder> = match format {
		PayloadFormat::DeepStream => Box::new(DeepStream::default()),
		PayloadFormat::DeepStreamMinimal => Box::new(Minimal::default()),
		PayloadFormat::DeepStreamProtobuf => Box::new(Protobuf::default()),
		PayloadFormat::Custom(tag) => Box::new(Passthrough::new(tag)?),
	};

	Ok(decoder)
}

fn inspect(format: PayloadFormat, mut buffer: Bytes, batch: bool) -> anyhow::Result<Vec<Event>> {
	let decoder = decoder(format)?;
	let mut events = Vec::new();

	while !buffer.is_empty() {
		let payload = Payload::decode(&mut buffer).context("truncated payload")?;
		tracing::debug!(?payload, "decoding payload");

		match batch {
			true => events.extend(decoder.decode_batch(payload.as_slice())?),
			false => events.push(decoder.decode(payload.as_slice())?),
		}
	}

	Ok(events)
}
