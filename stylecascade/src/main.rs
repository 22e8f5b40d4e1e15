use clap::Parser;
use log::info;
use std::fs;
use std::process;
use stylecascade_lib::{load_rules, ObjectData, ObjectTree, StyleLibrary, StyleSheet};

#[derive(Parser)]
#[command(name = "stylecascade")]
#[command(about = "Resolve the style of an object path against a rule file")]
struct Args {
    /// Rule file, e.g. `window .title { color: #333; }`.
    rules: String,

    /// Objects from root to target, each written as `name#id.class:pseudo`.
    #[arg(required = true)]
    path: Vec<String>,

    /// Print every object on the path, not only the target.
    #[arg(short, long)]
    all: bool,
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    let rules_text = match fs::read_to_string(&args.rules) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading rule file {}: {}", args.rules, e);
            process::exit(1);
        }
    };

    let mut library = StyleLibrary::new();
    match load_rules(&mut library, &rules_text) {
        Ok(count) => info!("{} rules loaded from {}", count, args.rules),
        Err(e) => {
            eprintln!("Error in {}: {}", args.rules, e);
            process::exit(1);
        }
    }

    let mut chain = Vec::with_capacity(args.path.len());
    for text in &args.path {
        match ObjectData::from_compound(text) {
            Some(data) => chain.push(data),
            None => {
                eprintln!("Invalid object description: {}", text);
                process::exit(2);
            }
        }
    }

    let mut tree = ObjectTree::new();
    let handles = tree.append_path(None, chain);
    let shown = if args.all {
        &handles[..]
    } else {
        &handles[handles.len() - 1..]
    };

    for (handle, text) in shown.iter().zip(&args.path[args.path.len() - shown.len()..]) {
        let mut sheet = StyleSheet::new();
        let matched = library.resolve_style(&tree, *handle, &mut sheet);
        println!("{} ({} rules matched)", text, matched);
        for (key, value) in sheet.iter() {
            println!("  {}: {};", key, value);
        }
    }

    library.shutdown();
}
