// SPDX-License-Identifier: MPL-2.0
use mango_grader::app::{self, paths, Flags};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: mango_grader [OPTIONS] [IMAGE]

Options:
  --lang <code>        UI language (e.g. en-US, fr)
  --endpoint <url>     Prediction API URL
  --config-dir <dir>   Directory holding settings.toml
  -h, --help           Print this help

Live camera capture needs the V4L2 backend (Linux only):
  cargo build --features v4l2
Without it, uploads still work and opening the camera reports it unavailable.
";

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{USAGE}");
        return Ok(());
    }

    let flags = match parse_flags(args) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());
    app::run(flags)
}

fn parse_flags(mut args: pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    let lang = args.opt_value_from_str("--lang")?;
    let endpoint = args.opt_value_from_str("--endpoint")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let file_path = args.finish().into_iter().next().map(PathBuf::from);

    Ok(Flags {
        lang,
        endpoint,
        file_path,
        config_dir,
    })
}
