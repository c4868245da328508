#[cfg(not(feature = "quiz"))]
fn main() {
    eprintln!(
        "The quizbeat CLI requires the \"quiz\" feature. Rebuild with `--features quiz` to enable the game."
    );
}

#[cfg(feature = "quiz")]
mod cli {
    use std::env;
    use std::io::{self, Write};
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{bail, Context, Result};
    use quizbeat::catalog::{CachedCatalog, CsvCatalog};
    use quizbeat::round::{RoundEngine, RoundOutcome};
    use quizbeat::session::{build_config, GameConfig, GameMode, ImageMode, SetupOptions};
    use quizbeat::store::{FileStore, MemoryStore, SessionStore};
    use quizbeat::QuizbeatError;

    const CATALOG_LIMIT: usize = 1025;
    const DEFAULT_ITEMS: usize = 10;

    struct Args {
        catalog: Option<String>,
        players: Option<Vec<String>>,
        items: usize,
        mode: GameMode,
        image_mode: ImageMode,
        seed: Option<u64>,
        session_file: Option<String>,
        resume: bool,
        show_help: bool,
    }

    fn parse_args() -> Result<Args> {
        let mut parsed = Args {
            catalog: None,
            players: None,
            items: DEFAULT_ITEMS,
            mode: GameMode::Qcm,
            image_mode: ImageMode::Real,
            seed: None,
            session_file: None,
            resume: false,
            show_help: false,
        };

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => parsed.show_help = true,
                "--players" => {
                    let value = args.next().context("--players requires a,b,c")?;
                    parsed.players =
                        Some(value.split(',').map(|s| s.trim().to_string()).collect());
                }
                "--items" => {
                    let value = args.next().context("--items requires a number")?;
                    parsed.items = value.parse().context("--items requires a number")?;
                }
                "--mode" => {
                    let value = args.next().context("--mode requires qcm|libre")?;
                    parsed.mode = match value.as_str() {
                        "qcm" => GameMode::Qcm,
                        "libre" => GameMode::Libre,
                        other => bail!("unknown mode: {}", other),
                    };
                }
                "--shadow" => parsed.image_mode = ImageMode::Shadow,
                "--seed" => {
                    let value = args.next().context("--seed requires a number")?;
                    parsed.seed = Some(value.parse().context("--seed requires a number")?);
                }
                "--session" => {
                    parsed.session_file = Some(args.next().context("--session requires a path")?);
                }
                "--resume" => parsed.resume = true,
                _ if arg.starts_with('-') => bail!("unknown flag: {}", arg),
                _ => {
                    if parsed.catalog.is_some() {
                        bail!("unexpected argument: {}", arg);
                    }
                    parsed.catalog = Some(arg);
                }
            }
        }
        Ok(parsed)
    }

    fn print_help() {
        println!("Usage: quizbeat <catalog.csv> [options]");
        println!();
        println!("Options:");
        println!("  --players a,b,c   Player names (prompted when omitted)");
        println!("  --items N         Questions per player (default {})", DEFAULT_ITEMS);
        println!("  --mode qcm|libre  Multiple choice or free text (default qcm)");
        println!("  --shadow          Hide the image reference until answered");
        println!("  --seed N          Fix the deck/option RNG seed");
        println!("  --session FILE    Persist the session to FILE");
        println!("  --resume          Resume the session stored in --session FILE");
        println!("  -h, --help        Show this help");
    }

    fn prompt(message: &str) -> Result<String> {
        print!("{}", message);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn print_outcome(outcome: &RoundOutcome, player_name: &str) {
        if outcome.timed_out {
            println!("  Time's up! It was {}.", outcome.answer);
        } else if outcome.correct {
            println!("  Correct, {}! +{:.2} pts", player_name, outcome.points);
        } else {
            println!("  Wrong! It was {}.", outcome.answer);
        }
    }

    fn print_scoreboard(engine: &RoundEngine<CsvCatalog>) {
        let holder = engine.current_player_index();
        let line = engine
            .players()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if i == holder && !engine.is_finished() {
                    ">"
                } else {
                    " "
                };
                format!("{}{} {:.2}", marker, p.name, p.score)
            })
            .collect::<Vec<_>>()
            .join("  |  ");
        println!("  [{}]", line);
    }

    pub fn run() -> Result<()> {
        println!("Quizbeat - Creature Guessing Quiz");
        println!("==================================\n");

        let args = parse_args()?;
        if args.show_help {
            print_help();
            return Ok(());
        }
        let catalog_path = match &args.catalog {
            Some(path) => path.clone(),
            None => {
                print_help();
                bail!("missing catalog file");
            }
        };

        let store: Arc<dyn SessionStore> = match &args.session_file {
            Some(path) => Arc::new(FileStore::open(path).context("opening session file")?),
            None => Arc::new(MemoryStore::new()),
        };

        let source = CsvCatalog::open(&catalog_path)
            .with_context(|| format!("loading catalog '{}'", catalog_path))?;
        let mut catalog = CachedCatalog::new(source, store.clone(), "fr", "en");
        catalog
            .load(CATALOG_LIMIT)
            .context("loading catalog entries")?;

        let config = if args.resume {
            match GameConfig::load(store.as_ref()) {
                Ok(config) => {
                    println!("Resuming stored session ({} players).\n", config.players.len());
                    config
                }
                Err(QuizbeatError::NoSession) => {
                    bail!("no stored session to resume; run setup without --resume")
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            let names = match args.players.clone() {
                Some(names) => names,
                None => prompt("Players (comma separated): ")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            };
            let mut opts = SetupOptions::new(names, args.items)
                .game_mode(args.mode)
                .image_mode(args.image_mode);
            if let Some(seed) = args.seed {
                opts = opts.seed(seed);
            }
            let config = build_config(&opts, &mut catalog).context("building session")?;
            config.save(store.as_ref())?;
            config
        };

        let shadow = config.image_mode == ImageMode::Shadow;
        let items_per_player = config.items_per_player;
        let mut engine = match args.seed {
            Some(seed) => RoundEngine::with_seed(config, catalog, seed),
            None => RoundEngine::new(config, catalog),
        };
        engine.start().context("starting the game")?;

        while !engine.is_finished() {
            let snap = match engine.snapshot() {
                Some(snap) => snap,
                None => break,
            };
            let player_name = engine.players()[snap.player_index].name.clone();

            println!();
            println!(
                "Question {}/{} for {} (turn {}/{})",
                snap.round_index + 1,
                items_per_player,
                player_name,
                snap.global_turn + 1,
                snap.total_turns
            );
            print_scoreboard(&engine);
            println!(
                "  #{:03}  {}",
                snap.entry.id,
                if shadow { "(image hidden)" } else { snap.entry.image_url.as_str() }
            );
            for (i, option) in snap.options.iter().enumerate() {
                println!("    {}. {}", i + 1, option.label);
            }

            let question = if snap.options.is_empty() {
                format!("  Your answer ({}s): ", snap.time_budget)
            } else {
                format!("  Your pick 1-{} ({}s): ", snap.options.len(), snap.time_budget)
            };

            let mut outcome: Option<RoundOutcome> = None;
            while outcome.is_none() {
                let asked_at = Instant::now();
                let input = prompt(&question)?;

                // Feed whole seconds of thinking time into the countdown
                let seconds = asked_at.elapsed().as_secs().min(u64::from(u32::MAX)) as u32;
                for _ in 0..seconds {
                    outcome = engine.tick();
                    if outcome.is_some() {
                        break;
                    }
                }
                if outcome.is_some() {
                    break;
                }

                outcome = if snap.options.is_empty() {
                    engine.submit_text(&input)
                } else {
                    match input.parse::<usize>() {
                        Ok(n) if (1..=snap.options.len()).contains(&n) => {
                            engine.submit_choice(snap.options[n - 1].id)
                        }
                        _ => {
                            println!("  Enter a number between 1 and {}.", snap.options.len());
                            None
                        }
                    }
                };
            }

            if let Some(outcome) = &outcome {
                print_outcome(outcome, &player_name);
            }
            engine.advance()?;
        }

        println!();
        println!("Final standings");
        println!("---------------");
        for standing in engine.standings() {
            let medal = match standing.place {
                1 => "1st",
                2 => "2nd",
                3 => "3rd",
                _ => "   ",
            };
            println!(
                "  {} {:<12} {:>8.2} pts  ({}/{} correct)",
                medal,
                standing.player.name,
                standing.player.score,
                standing.player.correct,
                items_per_player
            );
        }

        // "Play again" clears the stored session
        GameConfig::clear(store.as_ref());
        Ok(())
    }
}

#[cfg(feature = "quiz")]
fn main() {
    if let Err(err) = cli::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
