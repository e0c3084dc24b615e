//! The `flamegen` command: render, search, interpolate, rotate,
//! expand, and export flame documents.

use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{format_err, Error};
use image::RgbaImage;
use tracing::{info, warn};

use flamegen::affine::Matrix;
use flamegen::doc;
use flamegen::expand::ExpandVariation;
use flamegen::export;
use flamegen::interpolate::Interpolate;
use flamegen::model::Element;
use flamegen::progress::{BarProgress, DotProgress, TimedProgress};
use flamegen::raster::{self, Background, Rasterizer, VelocityColor};
use flamegen::rotate::Rotate;
use flamegen::search::RandomSearch;
use flamegen::system::{EmptyProgress, Progress};

const INPUT: &str = "INPUT";
const OUTPUT: &str = "output";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "iterations";
const SCALE: &str = "scale";
const DENSITY: &str = "density";
const GAMMA: &str = "gamma";
const COLOR_FACTOR: &str = "color-factor";
const VFLIP: &str = "vertical-flip";
const HFLIP: &str = "horizontal-flip";
const LIGHT: &str = "light";
const COUNT: &str = "count";
const THRESHOLD: &str = "threshold";
const CONCESSION: &str = "concession";
const BASE: &str = "base";
const INDEX: &str = "index";

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn input_arg() -> Arg<'static, 'static> {
    Arg::with_name(INPUT)
        .required(true)
        .help("flame document (ffdoc) file")
}

fn width_arg() -> Arg<'static, 'static> {
    Arg::with_name(WIDTH)
        .long(WIDTH)
        .short("w")
        .takes_value(true)
        .default_value("512")
        .validator(|s| {
            validate_range(
                &s,
                16u32,
                16_384,
                "Could not parse image width",
                "Image width must be between 16 and 16384",
            )
        })
        .help("Output image width")
}

fn height_arg() -> Arg<'static, 'static> {
    Arg::with_name(HEIGHT)
        .long(HEIGHT)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                16u32,
                16_384,
                "Could not parse image height",
                "Image height must be between 16 and 16384",
            )
        })
        .help("Output image height (default: same as the width)")
}

fn iterations_arg(default: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(ITERATIONS)
        .long(ITERATIONS)
        .short("N")
        .takes_value(true)
        .default_value(default)
        .validator(|s| {
            validate_range(
                &s,
                100usize,
                1_000_000_000,
                "Could not parse iteration count",
                "Iteration count must be between 100 and 1000000000",
            )
        })
        .help("Number of chaos-game iterations")
}

fn scale_arg() -> Arg<'static, 'static> {
    Arg::with_name(SCALE)
        .long(SCALE)
        .short("s")
        .takes_value(true)
        .default_value("1")
        .validator(|s| validate_number(&s, "Could not parse scale"))
        .help("When scale is 1.0, the range [-1,1] expands to the image width")
}

fn count_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(COUNT)
        .long(COUNT)
        .short("c")
        .takes_value(true)
        .default_value("10")
        .validator(|s| {
            validate_range(
                &s,
                1usize,
                100_000,
                "Could not parse count",
                "Count must be between 1 and 100000",
            )
        })
        .help(help)
}

fn output_arg(default: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(OUTPUT)
        .long(OUTPUT)
        .short("o")
        .takes_value(true)
        .default_value(default)
        .help("Output file path")
}

fn args() -> ArgMatches<'static> {
    App::new("flamegen")
        .version("0.1.0")
        .about("Fractal flame utilities")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("image")
                .about("Create a PNG image from a flame document")
                .arg(input_arg())
                .arg(width_arg())
                .arg(height_arg())
                .arg(iterations_arg("100000"))
                .arg(scale_arg())
                .arg(
                    Arg::with_name(DENSITY)
                        .long(DENSITY)
                        .short("d")
                        .takes_value(true)
                        .default_value("1")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1u32,
                                8,
                                "Could not parse density",
                                "Density must be between 1 and 8",
                            )
                        })
                        .help("Supersampling factor; render at density^2 the work, then downsample"),
                )
                .arg(
                    Arg::with_name(GAMMA)
                        .long(GAMMA)
                        .short("g")
                        .takes_value(true)
                        .default_value("0.5")
                        .validator(|s| validate_number(&s, "Could not parse gamma"))
                        .help("Gamma factor applied after downsampling (density > 1 only)"),
                )
                .arg(
                    Arg::with_name(COLOR_FACTOR)
                        .long(COLOR_FACTOR)
                        .short("F")
                        .takes_value(true)
                        .default_value("10")
                        .validator(|s| validate_number(&s, "Could not parse color factor"))
                        .help("Saturation gain applied to normalized velocities"),
                )
                .arg(
                    Arg::with_name(VFLIP)
                        .long(VFLIP)
                        .help("Flip the image vertically"),
                )
                .arg(
                    Arg::with_name(HFLIP)
                        .long(HFLIP)
                        .help("Flip the image horizontally"),
                )
                .arg(
                    Arg::with_name(LIGHT)
                        .long(LIGHT)
                        .help("Render for a light background instead of a dark one"),
                )
                .arg(output_arg("FF.png")),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Search flame-parameter space randomly, write the finds as a document")
                .arg(input_arg())
                .arg(count_arg("Number of candidates to accept"))
                .arg(
                    Arg::with_name(THRESHOLD)
                        .long(THRESHOLD)
                        .short("t")
                        .takes_value(true)
                        .default_value("0.1")
                        .validator(|s| validate_number(&s, "Could not parse threshold"))
                        .help("Coverage ratio a candidate must beat to be kept"),
                )
                .arg(
                    Arg::with_name(CONCESSION)
                        .long(CONCESSION)
                        .short("C")
                        .takes_value(true)
                        .default_value("100")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1usize,
                                1_000_000,
                                "Could not parse concession",
                                "Concession must be between 1 and 1000000",
                            )
                        })
                        .help("Consecutive rejections before the threshold halves"),
                )
                .arg(
                    Arg::with_name(BASE)
                        .long(BASE)
                        .short("b")
                        .help("Perturb the input element instead of inventing candidates"),
                )
                .arg(width_arg())
                .arg(height_arg())
                .arg(scale_arg())
                .arg(iterations_arg("10000"))
                .arg(output_arg("FF-found.ffdoc")),
        )
        .subcommand(
            SubCommand::with_name("interpolate")
                .about("Interpolate between the children of a document, write a new document")
                .arg(input_arg())
                .arg(count_arg("Number of in-between steps per endpoint pair"))
                .arg(output_arg("FF-inter.ffdoc")),
        )
        .subcommand(
            SubCommand::with_name("rotate")
                .about("Sweep the rotation nodes of a flame over a full circle")
                .arg(input_arg())
                .arg(count_arg("Number of rotation steps"))
                .arg(output_arg("FF-rotated.ffdoc")),
        )
        .subcommand(
            SubCommand::with_name("expand")
                .about("Try every catalog variation in one declaration slot")
                .arg(input_arg())
                .arg(
                    Arg::with_name(INDEX)
                        .long(INDEX)
                        .short("i")
                        .takes_value(true)
                        .default_value("0")
                        .validator(|s| {
                            validate_range(
                                &s,
                                0usize,
                                1024,
                                "Could not parse index",
                                "Index must be between 0 and 1024",
                            )
                        })
                        .help("Index into the variation declaration to expand"),
                )
                .arg(output_arg("FF-varia.ffdoc")),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Export a CSV table from a flame document")
                .arg(input_arg())
                .arg(
                    Arg::with_name(OUTPUT)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output file path (default: stdout)"),
                ),
        )
        .get_matches()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let matches = args();
    let result = match matches.subcommand() {
        ("image", Some(m)) => cmd_image(m),
        ("search", Some(m)) => cmd_search(m),
        ("interpolate", Some(m)) => cmd_interpolate(m),
        ("rotate", Some(m)) => cmd_rotate(m),
        ("expand", Some(m)) => cmd_expand(m),
        ("export", Some(m)) => cmd_export(m),
        _ => Ok(()),
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn parsed<T: FromStr>(m: &ArgMatches, name: &str) -> T {
    m.value_of(name)
        .and_then(|s| s.parse().ok())
        .expect("argument was validated")
}

/// Load a document, logging whatever the permissive parser papered
/// over.
fn load(path: &str) -> Result<Element, Error> {
    let (element, warnings) = doc::read_file(path)?;
    for w in warnings.iter() {
        warn!("{}: {}", path, w);
    }
    Ok(element)
}

#[derive(Copy, Clone)]
struct RenderOpts {
    width: u32,
    height: u32,
    iterations: usize,
    scale: f64,
    density: u32,
    gamma: f64,
    hflip: bool,
    vflip: bool,
    color_factor: f64,
    background: Background,
}

/// Logical [-1,1] space to pixel space: optional flips, the user
/// scale, then the half-size scale and recentering translation.
fn screen_transform(width: f64, height: f64, opts: &RenderOpts) -> Matrix {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let flip_x = if opts.hflip { -1.0 } else { 1.0 };
    let flip_y = if opts.vflip { -1.0 } else { 1.0 };
    Matrix::scaling(flip_x, flip_y)
        .then(&Matrix::scaling(opts.scale, opts.scale))
        .then(&Matrix::scaling(half_w, half_h))
        .then(&Matrix::translation(half_w, half_h))
}

fn render_element(
    elt: &Element,
    opts: &RenderOpts,
    progress: &mut dyn Progress,
) -> Result<RgbaImage, flamegen::Error> {
    let sys = elt.flame_system();
    let framing = elt.point_span().framing();
    let mut rng = rand::thread_rng();
    let resolver = VelocityColor {
        velocity: elt.velocity_span(),
        factor: opts.color_factor,
        background: opts.background,
    };
    if opts.density > 1 {
        let (lw, lh) = (opts.width * opts.density, opts.height * opts.density);
        let screen = framing.then(&screen_transform(lw as f64, lh as f64, opts));
        let iterations = opts.iterations * (opts.density as usize) * (opts.density as usize);
        let raster = Rasterizer::new(lw, lh, screen, resolver);
        let large = raster.render(&sys, iterations, progress, &mut rng)?;
        let small = raster::downsample(&large, opts.width, opts.height);
        Ok(raster::gamma_adjust(&small, opts.gamma))
    } else {
        let screen = framing.then(&screen_transform(
            opts.width as f64,
            opts.height as f64,
            opts,
        ));
        let raster = Rasterizer::new(opts.width, opts.height, screen, resolver);
        raster.render(&sys, opts.iterations, progress, &mut rng)
    }
}

/// `out.png` plus depth/number becomes `out-0001-0002.png`.
fn suffixed_path(base: &str, depth: usize, number: usize) -> PathBuf {
    let path = Path::new(base);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("FF");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{}-{:04}-{:04}.{}", stem, depth, number, ext))
}

fn cmd_image(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let width: u32 = parsed(m, WIDTH);
    let height: u32 = m
        .value_of(HEIGHT)
        .map(|s| s.parse().expect("argument was validated"))
        .unwrap_or(width);
    let opts = RenderOpts {
        width,
        height,
        iterations: parsed(m, ITERATIONS),
        scale: parsed(m, SCALE),
        density: parsed(m, DENSITY),
        gamma: parsed(m, GAMMA),
        hflip: m.is_present(HFLIP),
        vflip: m.is_present(VFLIP),
        color_factor: parsed(m, COLOR_FACTOR),
        background: if m.is_present(LIGHT) {
            Background::Light
        } else {
            Background::Dark
        },
    };
    let output = m.value_of(OUTPUT).expect("defaulted argument");
    let element = load(input)?;

    if let Some(elt) = element.singular() {
        let mut progress = TimedProgress::new(DotProgress);
        let img = render_element(elt, &opts, &mut progress)?;
        img.save(output)?;
        info!("wrote {}", output);
        return Ok(());
    }

    let mut jobs: Vec<(&Element, PathBuf)> = vec![];
    element.traverse(&mut |elt, depth, number| {
        if elt.is_valid() {
            jobs.push((elt, suffixed_path(output, depth, number)));
        }
    });
    if jobs.is_empty() {
        warn!("{}: no valid elements to render", input);
        return Ok(());
    }

    // independent elements share nothing; chunk them across workers
    let threads = num_cpus::get().min(jobs.len());
    let chunk_size = (jobs.len() + threads - 1) / threads;
    let opts_ref = &opts;
    crossbeam::scope(|spawner| {
        for batch in jobs.chunks(chunk_size) {
            spawner.spawn(move |_| {
                for (elt, path) in batch {
                    let mut progress = EmptyProgress;
                    match render_element(elt, opts_ref, &mut progress) {
                        Ok(img) => match img.save(path) {
                            Ok(()) => info!("wrote {}", path.display()),
                            Err(e) => warn!("{}: {}", path.display(), e),
                        },
                        Err(e) => {
                            // one bad flame must not sink the batch
                            warn!("{}: flame iteration is numerically invalid ({})", path.display(), e)
                        }
                    }
                }
            });
        }
    })
    .map_err(|_| format_err!("a render worker panicked"))?;
    Ok(())
}

fn cmd_search(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let width: usize = parsed(m, WIDTH);
    let height: usize = m
        .value_of(HEIGHT)
        .map(|s| s.parse().expect("argument was validated"))
        .unwrap_or(width);
    let search = RandomSearch {
        count: parsed(m, COUNT),
        threshold: parsed(m, THRESHOLD),
        concession: parsed(m, CONCESSION),
        iterations: parsed(m, ITERATIONS),
        width,
        height,
        scale: parsed(m, SCALE),
        use_base: m.is_present(BASE),
    };
    let output = m.value_of(OUTPUT).expect("defaulted argument");
    let element = load(input)?;
    let mut rng = rand::thread_rng();
    let mut image_progress = TimedProgress::new(DotProgress);
    let mut count_progress = BarProgress;
    let parent = search.run(&element, &mut rng, &mut image_progress, &mut count_progress)?;
    doc::write_file(&parent, output)?;
    info!("wrote {}", output);
    Ok(())
}

fn cmd_interpolate(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let output = m.value_of(OUTPUT).expect("defaulted argument");
    let element = load(input)?;
    let parent = Interpolate {
        count: parsed(m, COUNT),
    }
    .run(&element)?;
    doc::write_file(&parent, output)?;
    info!("wrote {}", output);
    Ok(())
}

fn cmd_rotate(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let output = m.value_of(OUTPUT).expect("defaulted argument");
    let element = load(input)?;
    let parent = Rotate {
        count: parsed(m, COUNT),
    }
    .run(&element)?;
    doc::write_file(&parent, output)?;
    info!("wrote {}", output);
    Ok(())
}

fn cmd_expand(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let output = m.value_of(OUTPUT).expect("defaulted argument");
    let element = load(input)?;
    let mut rng = rand::thread_rng();
    let mut progress = TimedProgress::new(DotProgress);
    let parent = ExpandVariation::new(parsed(m, INDEX)).run(&element, &mut rng, &mut progress)?;
    doc::write_file(&parent, output)?;
    info!("wrote {}", output);
    Ok(())
}

fn cmd_export(m: &ArgMatches) -> Result<(), Error> {
    let input = m.value_of(INPUT).expect("required argument");
    let element = load(input)?;
    let text = export::table(&element).join("\n");
    match m.value_of(OUTPUT) {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("wrote {}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
