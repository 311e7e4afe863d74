// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate bifurcation;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate num_cpus;

use bifurcation::{BifurcationRenderer, SweepConfig};
use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use std::str::FromStr;
use std::time::Instant;

/// Parses a `MIN,MAX` lambda range, insisting that MAX lies above MIN.
fn parse_lambda_range(s: &str) -> Result<(f64, f64), String> {
    let mut bounds = s.splitn(2, ',').map(|bound| bound.trim().parse::<f64>());
    match (bounds.next(), bounds.next()) {
        (Some(Ok(low)), Some(Ok(high))) => {
            if low.is_finite() && high.is_finite() && high > low {
                Ok((low, high))
            } else {
                Err("The lambda maximum must be greater than the lambda minimum".to_string())
            }
        }
        _ => Err("Could not parse lambda range, expected MIN,MAX".to_string()),
    }
}

/// Parses a whole-number setting that may not drop below `least`.
fn parse_count(s: &str, least: usize, what: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(count) if count >= least => Ok(count),
        Ok(_) => Err(format!("The {} must be at least {}", what, least)),
        Err(_) => Err(format!("Could not parse {}", what)),
    }
}

fn parse_size(s: &str) -> Result<usize, String> {
    let size = parse_count(s, 1, "image size")?;
    if size > u32::max_value() as usize {
        return Err("The image size is too large for an image file".to_string());
    }
    Ok(size)
}

fn parse_tasks(s: &str) -> Option<usize> {
    if s == "auto" {
        Some(num_cpus::get())
    } else {
        usize::from_str(s).ok()
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const DIFFUSION: &str = "diffusion";
const COLUMNS: &str = "columns-per-pixel";
const PREITERATIONS: &str = "preiterations";
const LAMBDA: &str = "lambda";
const TASKS: &str = "tasks";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    App::new("bifurcate")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Logistic map bifurcation diagram renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (.png, or .pgm/.pnm for a graymap)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| parse_size(&s).map(|_| ()))
                .help("Width and height of the output image"),
        )
        .arg(
            Arg::with_name(DIFFUSION)
                .required(false)
                .long(DIFFUSION)
                .short("d")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| parse_count(&s, 1, "vertical diffusion").map(|_| ()))
                .help("Samples recorded per sub-column"),
        )
        .arg(
            Arg::with_name(COLUMNS)
                .required(false)
                .long(COLUMNS)
                .short("c")
                .takes_value(true)
                .default_value("3")
                .validator(|s| parse_count(&s, 1, "columns per pixel").map(|_| ()))
                .help("Sub-columns sampled per output pixel column"),
        )
        .arg(
            Arg::with_name(PREITERATIONS)
                .required(false)
                .long(PREITERATIONS)
                .short("p")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| parse_count(&s, 0, "preiteration count").map(|_| ()))
                .help("Iterations discarded before sampling begins"),
        )
        .arg(
            Arg::with_name(LAMBDA)
                .required(false)
                .long(LAMBDA)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("3.4,4.0")
                .validator(|s| parse_lambda_range(&s).map(|_| ()))
                .help("Lambda range to sweep, as MIN,MAX"),
        )
        .arg(
            Arg::with_name(TASKS)
                .required(false)
                .long(TASKS)
                .short("t")
                .takes_value(true)
                .default_value("16")
                .validator(|s| match parse_tasks(&s) {
                    Some(0) => Err("Task count must be at least 1".to_string()),
                    Some(_) => Ok(()),
                    None => Err("Could not parse task count".to_string()),
                })
                .help("Columns sampled at the same time, or 'auto' for one per CPU"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches()
}

fn init_logger(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .format_module_path(false)
        .init();
}

fn config_from(matches: &ArgMatches) -> Result<SweepConfig, String> {
    let value = |name: &str| {
        matches
            .value_of(name)
            .ok_or_else(|| format!("missing value for --{}", name))
    };
    let (lambda_min, lambda_max) = parse_lambda_range(value(LAMBDA)?)?;
    Ok(SweepConfig {
        image_size: parse_size(value(SIZE)?)?,
        vertical_diffusion: parse_count(value(DIFFUSION)?, 1, "vertical diffusion")?,
        columns_per_pixel: parse_count(value(COLUMNS)?, 1, "columns per pixel")?,
        preiterations: parse_count(value(PREITERATIONS)?, 0, "preiteration count")?,
        lambda_min,
        lambda_max,
        concurrent_units: parse_tasks(value(TASKS)?)
            .ok_or_else(|| "Could not parse task count".to_string())?,
    })
}

fn main() {
    let matches = args();
    init_logger(matches.occurrences_of(VERBOSE));

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let output = matches.value_of(OUTPUT).unwrap_or_default();

    let started = Instant::now();
    let rendered =
        BifurcationRenderer::new(config).and_then(|renderer| renderer.render(output));
    match rendered {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(stats) => {
            let elapsed = started.elapsed();
            info!("Wrote {} after sampling {} columns", output, stats.units);
            eprintln!(
                "Ran in {}.{:03} seconds",
                elapsed.as_secs(),
                elapsed.subsec_millis()
            );
        }
    }
}
