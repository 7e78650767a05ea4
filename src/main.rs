use erdflow::diagram;
use erdflow::layout::LayoutEngine;
use erdflow::schema::{TableCatalog, TableDescriptor};
use erdflow::session::LayoutSession;
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <schema.json> [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -o, --output <file>   Output file (default: stdout)");
        eprintln!("  -f, --focus <id>      Focus-mode layout centered on a table id");
        eprintln!("  -g, --grid            Legacy grid layout");
        eprintln!("  -n, --normalize       Shift layout into a padded positive viewport");
        process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut focus: Option<String> = None;
    let mut grid = false;
    let mut normalize = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-f" | "--focus" => {
                i += 1;
                if i < args.len() {
                    focus = Some(args[i].clone());
                }
            }
            "-g" | "--grid" => {
                grid = true;
            }
            "-n" | "--normalize" => {
                normalize = true;
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let catalog = match TableCatalog::from_json(&input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Schema error: {}", e);
            process::exit(1);
        }
    };

    let mut result = if grid {
        let positions = LayoutEngine::default().layout_grid(&catalog);
        let tables: Vec<&TableDescriptor> = catalog.iter().collect();
        diagram::assemble(&tables, &positions)
    } else {
        let mut session = LayoutSession::new(catalog);
        match &focus {
            Some(id) => session.reset(id, true),
            None => session.rebuild_whole(),
        }
        session.snapshot()
    };

    if normalize {
        diagram::normalize(&mut result, diagram::VIEWPORT_PADDING);
    }

    let json = match serde_json::to_string_pretty(&result) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to serialize diagram: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}
