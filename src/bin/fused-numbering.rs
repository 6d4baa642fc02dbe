use anyhow::{bail, Context, Result};
use fused_numbering::*;
use tracing::warn;

struct Args {
    log_level: String,
    dot: Option<String>,
    smiles: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        log_level: "warn".to_string(),
        dot: None,
        smiles: Vec::new(),
    };
    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--log-level" => args.log_level = argv.next().context("--log-level needs a level")?,
            "--dot" => args.dot = Some(argv.next().context("--dot needs a file name")?),
            "-h" | "--help" => {
                println!("usage: fused-numbering [--log-level LEVEL] [--dot FILE] SMILES...");
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            other => args.smiles.push(other.to_string()),
        }
    }
    if args.smiles.is_empty() {
        bail!("usage: fused-numbering [--log-level LEVEL] [--dot FILE] SMILES...");
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    init_logging(&args.log_level);

    let mut internal_errors = 0;
    for (i, smiles) in args.smiles.iter().enumerate() {
        let mut frag = match parse_smiles(smiles) {
            Ok(frag) => frag,
            Err(e) => {
                println!("{}\terror: {}", smiles, e);
                continue;
            }
        };
        match number_fused_ring(&mut frag) {
            Ok(()) => {
                let locants: Vec<String> = frag.locants().into_iter().flatten().collect();
                println!("{}\t{}", smiles, locants.join(","));
            }
            Err(e) => {
                if e.is_internal() {
                    internal_errors += 1;
                }
                println!("{}\terror: {}", smiles, e);
            }
        }

        if let Some(dot) = &args.dot {
            // One file per input once there are several
            let path = if args.smiles.len() > 1 {
                format!("{}.{}", dot, i)
            } else {
                dot.clone()
            };
            write_dot(&frag, &path).with_context(|| format!("writing {}", path))?;
        }
    }

    if internal_errors > 0 {
        warn!("{} inputs hit an internal error", internal_errors);
        std::process::exit(1);
    }
    Ok(())
}
