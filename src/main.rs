use std::path::PathBuf;

use box_packer::catalog::{load_catalog, standard_catalog};
use box_packer::orientation::OrientationSearch;
use box_packer::types::validate_items;
use box_packer::{Item, Packer};
use clap::Parser;
use tracing::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Single,
    Multi,
}

#[derive(Parser)]
#[command(
    name = "box_packer",
    about = "Choose standard shipping boxes for a set of items"
)]
struct Cli {
    /// Items as [name=]LxWxH:grams[:qty] (e.g. rail=1000x20x40:1000:20)
    #[arg(long = "items", num_args = 1..)]
    items: Vec<String>,

    /// JSON file with the box catalog (default: built-in standard boxes)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Packing mode: single (one box for everything) or multi
    #[arg(long, default_value = "multi", value_parser = parse_mode)]
    mode: Mode,

    /// Try all six item orientations instead of long axis only
    #[arg(long)]
    all_axes: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    match s {
        "single" => Ok(Mode::Single),
        "multi" => Ok(Mode::Multi),
        _ => Err(format!("invalid mode '{}', expected: single or multi", s)),
    }
}

fn parse_dimensions(s: &str) -> Result<(f64, f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 3 {
        return Err(format!("invalid dimensions '{}', expected LxWxH", s));
    }
    let mut dims = [0.0; 3];
    for (dim, part) in dims.iter_mut().zip(&parts) {
        *dim = part
            .parse::<f64>()
            .map_err(|_| format!("invalid dimension '{}' in '{}'", part, s))?;
    }
    Ok((dims[0], dims[1], dims[2]))
}

fn parse_item(s: &str, index: usize) -> Result<Item, String> {
    let (name, body) = match s.split_once('=') {
        Some((name, body)) => (name.to_string(), body),
        None => (format!("item-{}", index + 1), s),
    };
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("invalid item '{}', expected [name=]LxWxH:grams[:qty]", s));
    }
    let (length, width, height) = parse_dimensions(parts[0])?;
    let weight = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid weight in '{}'", s))?;
    let quantity = match parts.get(2) {
        Some(q) => q
            .parse::<u32>()
            .map_err(|_| format!("invalid quantity in '{}'", s))?,
        None => 1,
    };
    let item = Item::new(&name, length, width, height, weight, quantity);
    item.validate().map_err(|e| e.to_string())?;
    Ok(item)
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level(cli.verbose))
        .init();

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => standard_catalog(),
    };

    let items: Vec<Item> = cli
        .items
        .iter()
        .enumerate()
        .map(|(i, s)| parse_item(s, i))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    if let Err(e) = validate_items(&items) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let orientation = if cli.all_axes {
        OrientationSearch::AllAxes
    } else {
        OrientationSearch::LongAxis
    };
    let packer = Packer::new(&catalog)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
        .with_orientation(orientation);

    match cli.mode {
        Mode::Single => {
            let result = packer.select_best_box(&items);
            match &result.container {
                Some(container) => {
                    println!("Box: {}", container);
                    for item in &result.packed_items {
                        println!("  {}", item);
                    }
                }
                None => {
                    println!("No single box fits:");
                    for item in &result.unfit_items {
                        println!("  {}", item);
                    }
                }
            }
        }
        Mode::Multi => {
            let result = packer.pack(&items);
            for (i, shipment) in result.shipments.iter().enumerate() {
                println!("Shipment {}: {}", i + 1, shipment.container);
                for item in &shipment.packed_items {
                    println!("  {}", item);
                }
                println!();
            }
            if !result.unfit_items.is_empty() {
                println!("Unfit:");
                for item in &result.unfit_items {
                    println!("  {}", item);
                }
                println!();
            }
            println!(
                "Summary: {} shipment{}, {} unit{} packed, {} unfit",
                result.shipment_count(),
                if result.shipment_count() == 1 { "" } else { "s" },
                result.packed_quantity(),
                if result.packed_quantity() == 1 { "" } else { "s" },
                result.unfit_quantity(),
            );
            if !result.success {
                std::process::exit(2);
            }
        }
    }
}
