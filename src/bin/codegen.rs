//! Generate TypeScript interfaces from a MySQL schema dump.
//!
//! `cargo run --bin codegen -- --input meta.sql --output src/interfaces/index.ts`

use anyhow::Context;
use clap::Parser;
use schema_rest::{codegen, init_tracing, load_dump, TypeMap};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codegen", about = "Emit TypeScript interfaces for every table in a schema dump")]
struct Cli {
    /// Schema dump to read.
    #[arg(short, long, default_value = "meta.sql")]
    input: PathBuf,

    /// File to write; parent directories are created.
    #[arg(short, long, default_value = "src/interfaces/index.ts")]
    output: PathBuf,

    /// Extra type mapping, e.g. `--map DATETIME=string`. Repeatable.
    #[arg(short, long = "map", value_name = "SQL=TS")]
    maps: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("codegen=info,schema_rest=info");

    let mut types = TypeMap::default();
    for spec in &cli.maps {
        types = types.with_spec(spec)?;
    }

    let tables = load_dump(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;
    let module = codegen::emit_module(&tables, &types);
    codegen::write_output(&cli.output, &module)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    tracing::info!(
        tables = tables.len(),
        output = %cli.output.display(),
        "interfaces generated"
    );
    Ok(())
}
