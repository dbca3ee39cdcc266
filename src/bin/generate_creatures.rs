use anyhow::Context;
use megadex::synthetic::{SyntheticSpec, write_synthetic};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// `generate_creatures [OUTPUT] [ROWS] [SEED]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "venv/Pokemon.csv".to_string()));
    let mut spec = SyntheticSpec::default();
    if let Some(rows) = args.next() {
        spec.rows = rows.parse().with_context(|| format!("invalid row count '{rows}'"))?;
    }
    if let Some(seed) = args.next() {
        spec.seed = seed.parse().with_context(|| format!("invalid seed '{seed}'"))?;
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    write_synthetic(BufWriter::new(file), &spec)?;

    println!(
        "✅ Wrote {} creatures ({:.0}% Mega) to {}",
        spec.rows,
        spec.mega_fraction * 100.0,
        output.display()
    );
    Ok(())
}
