use std::error::Error;

use clap::Parser;
use shakmaty::{fen::Fen, CastlingMode, Chess};
use syzygy_probe::{PositionDescriptor, ProbeResult, Tablebase};

#[derive(Debug, Parser)]
struct Opt {
    /// Tablebase directories, separated like PATH
    #[arg(long, default_value = "")]
    path: String,
    /// Also lists the result of every legal move
    #[arg(long)]
    alternatives: bool,
    /// Ranks root moves with WDL tables only
    #[arg(long)]
    wdl_only: bool,
    /// The position to probe
    fen: String,
}

fn describe(res: ProbeResult) -> String {
    match res.outcome() {
        None => "failed".to_owned(),
        Some(outcome) if res.from() == res.to() => format!("{outcome}"),
        Some(outcome) => format!(
            "{} {} with dtz {}{}",
            outcome,
            uci(res),
            res.dtz(),
            if res.is_en_passant() { " (en passant)" } else { "" }
        ),
    }
}

fn uci(res: ProbeResult) -> String {
    match res.promotion().role() {
        Some(role) => format!("{}{}{}", res.from(), res.to(), role.char()),
        None => format!("{}{}", res.from(), res.to()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::parse();

    let tables = Tablebase::initialize(&opt.path)?;
    let pos: Chess = opt
        .fen
        .parse::<Fen>()?
        .into_position(CastlingMode::Standard)?;
    let desc = PositionDescriptor::from_position(&pos);

    println!("pieces: {} (max {})", desc.piece_count(), tables.max_pieces());
    println!("wdl: {}", describe(tables.probe_wdl(&desc)));

    let mut alternatives = Vec::new();
    let res = tables.probe_root(&desc, opt.alternatives.then_some(&mut alternatives));
    if res == ProbeResult::CHECKMATE {
        println!("root: checkmate");
    } else if res == ProbeResult::STALEMATE {
        println!("root: stalemate");
    } else {
        println!("root: {}", describe(res));
    }
    for alt in &alternatives {
        println!("  {}", describe(*alt));
    }

    let mut ranked = Vec::new();
    let ok = if opt.wdl_only {
        tables.probe_root_wdl(&desc, true, &mut ranked)
    } else {
        tables.probe_root_dtz(&desc, false, true, &mut ranked)
    };
    if ok {
        for m in &ranked {
            println!("{:>6} {:>8} {}", m.score, m.rank, m.mv);
        }
    } else {
        println!("ranking failed");
    }

    tables.uninitialize();
    Ok(())
}
