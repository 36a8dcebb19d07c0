//! roomcraft: compile a room DSL file and export the stitched geometry.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use roomcraft::config::{default_config_path, load_config};
use roomcraft::dsl::Compiler;
use roomcraft::export::write_yaml;
use roomcraft::CompileSession;

#[derive(Parser, Debug)]
#[command(name = "roomcraft")]
#[command(about = "Compile a room layout DSL into textured, stitched room geometry")]
struct Args {
    /// DSL file to compile
    input: PathBuf,

    /// Write the level bundle to this YAML file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.roomcraft/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep every polygon; skip stitching touching rooms
    #[arg(long)]
    no_union: bool,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Override the union tolerance
    #[arg(long)]
    epsilon: Option<f64>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: could not load {}: {e}", config_path.display());
            Default::default()
        }
    };
    if args.no_union {
        config.stitch_rooms = false;
    }
    if let Some(epsilon) = args.epsilon {
        config.union_epsilon = epsilon;
    }

    if args.tokens {
        return print_tokens(&args.input);
    }

    let mut session = CompileSession::for_file(&args.input, config);
    let result = Compiler::compile_file(&args.input, &mut session);

    for diagnostic in session.diagnostics().sorted() {
        eprintln!("{diagnostic}");
    }

    let rooms = match result {
        Ok(rooms) => rooms,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} rooms, {} polygons, {} lights, {} textures",
        rooms.len(),
        rooms.polygon_count(),
        rooms.light_count(),
        session.used_textures().count()
    );

    if let Some(output) = &args.output {
        if let Err(e) = write_yaml(output, &rooms) {
            eprintln!("error: cannot write {}: {e}", output.display());
            return ExitCode::FAILURE;
        }
        println!("wrote {}", output.display());
    }

    ExitCode::SUCCESS
}

fn print_tokens(input: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", input.display());
            return ExitCode::FAILURE;
        }
    };
    match Compiler::tokenize(&source) {
        Ok(tokens) => {
            for token in tokens {
                println!("{}:{}\t{:?}", token.line, token.col, token.kind);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
