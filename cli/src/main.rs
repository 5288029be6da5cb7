mod error;
use error::*;
use colored::Colorize;
use std::{fs::{read, read_to_string, write}, io::ErrorKind, process};
use quadreg::{fileio, log::{self, Level}, Config, Image, OpcodeSet, UnassignedPolicy};

struct Options {
	file: String,
	strict: bool,
	extended: bool,
}

impl Options {
	fn parse(args: impl Iterator<Item = String>) -> CLIResult<Self> {
		let mut file = None;
		let mut strict = false;
		let mut extended = false;
		for arg in args {
			match arg.as_str() {
				"--strict" => strict = true,
				"--extended" => extended = true,
				"-v" => log::set_max_level(Level::Info),
				"-vv" => log::set_max_level(Level::Debug),
				_ if arg.starts_with('-') => return Err(CLIError::UnknownArgument(arg)),
				_ if file.is_none() => file = Some(arg),
				_ => return Err(CLIError::UnknownArgument(arg)),
			}
		}
		Ok(Self {
			file: file.ok_or(CLIError::InsufficientArguments)?,
			strict,
			extended,
		})
	}

	/// Layers the command line flags over `config`.
	fn apply(&self, mut config: Config) -> Config {
		if self.strict {
			config = config.strict();
		}
		if self.extended {
			config = config.extended();
		}
		config
	}

	/// Flags that change what `stored` would have run with.
	fn overrides(&self, stored: &Config) -> Vec<&'static str> {
		let mut flags = Vec::new();
		if self.strict && stored.unassigned != UnassignedPolicy::Reject {
			flags.push("--strict");
		}
		if self.extended && stored.opcode_set != OpcodeSet::Extended {
			flags.push("--extended");
		}
		flags
	}
}

fn io_error(file: &str, e: std::io::Error) -> CLIError {
	match e.kind() {
		ErrorKind::NotFound => CLIError::NotFound(file.into()),
		_ => CLIError::ExternalError("io::Error".into(), e.to_string()),
	}
}

fn build(options: Options) -> CLIResult {
	let source = read_to_string(&options.file).map_err(|e| io_error(&options.file, e))?;
	let config = options.apply(Config::default());
	let bytecode = quadreg::assemble(&source, config.opcode_set)
		.map_err(|e| CLIError::external("AssemblerError", e))?;

	let image = fileio::ser(&Image { config, bytecode })
		.map_err(|e| CLIError::external("FileIOError", e))?;
	let (save_as, _) = options.file.rsplit_once('.').unwrap_or((options.file.as_str(), ""));
	let target = format!("{}.qrc", save_as);
	write(&target, image).map_err(|e| io_error(&target, e))?;
	quadreg::info!("wrote {}", target);
	Ok(())
}

fn run(options: Options) -> CLIResult {
	let bytes = read(&options.file).map_err(|e| io_error(&options.file, e))?;
	let image = if fileio::is_image(&bytes) {
		let image = fileio::de(&bytes).map_err(|e| CLIError::external("FileIOError", e))?;
		for flag in options.overrides(&image.config) {
			quadreg::warn!("{} overrides the configuration stored in {}", flag.bold(), options.file);
		}
		image
	} else {
		Image { config: Config::default(), bytecode: bytes }
	};

	let config = options.apply(image.config);
	let registers = quadreg::run(&image.bytecode, config)
		.map_err(|e| CLIError::external("RuntimeError", e))?;
	quadreg::info!("final registers: {}", registers);
	Ok(())
}

fn dispatch() -> CLIResult {
	let mut args = std::env::args();
	args.next(); // Ignore program name
	match args.next() {
		Some(arg) if arg == "build" => build(Options::parse(args)?),
		Some(arg) if arg == "run" => run(Options::parse(args)?),
		Some(arg) => Err(CLIError::UnknownArgument(arg)),
		None => Err(CLIError::InsufficientArguments),
	}
}

fn main() {
	if let Err(e) = dispatch() {
		quadreg::error!("{}", e);
		process::exit(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options(flags: &[&str]) -> Options {
		let args = flags.iter().map(|flag| flag.to_string()).chain(Some("prog.qrc".to_string()));
		Options::parse(args).unwrap()
	}

	#[test]
	fn flags_layer_over_stored_config() {
		let stored = Config::default().extended();
		let both = options(&["--strict", "--extended"]);
		assert_eq!(both.overrides(&stored), vec!["--strict"]);
		assert!(both.overrides(&Config::default().strict().extended()).is_empty());
		assert_eq!(both.apply(stored), Config::default().strict().extended());

		assert!(options(&[]).overrides(&Config::default()).is_empty());
	}

	#[test]
	fn unknown_flag_is_rejected() {
		let args = vec!["--fast".to_string(), "prog.qrc".to_string()];
		assert!(matches!(Options::parse(args.into_iter()), Err(CLIError::UnknownArgument(arg)) if arg == "--fast"));
	}
}
