//! Cube Sweeper entry point
//!
//! The browser build starts from `platform::web`. Natively this runs a small
//! terminal driver over the same session, useful for playing without a page:
//!
//! ```text
//! cube-sweeper size=4 bombs=6 seed=42
//! > r 1 2 3      reveal block (x, y, z)
//! > f 0 0 0      toggle flag
//! > v            validate flags
//! > n            show all numbers
//! > q            quit
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use cube_sweeper::config::query_param;
    use cube_sweeper::sim::{GameEvent, GamePhase, GameSession, Grid, PlayerAction};
    use cube_sweeper::GameConfig;
    use glam::IVec3;

    enum Command {
        Act(PlayerAction, IVec3),
        Validate,
        Numbers,
        Quit,
    }

    fn parse_command(line: &str) -> Option<Command> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?;
        let mut coord = || -> Option<IVec3> {
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            let z = parts.next()?.parse().ok()?;
            Some(IVec3::new(x, y, z))
        };
        match verb {
            "r" | "reveal" => Some(Command::Act(PlayerAction::Reveal, coord()?)),
            "f" | "flag" => Some(Command::Act(PlayerAction::Flag, coord()?)),
            "v" | "validate" => Some(Command::Validate),
            "n" | "numbers" => Some(Command::Numbers),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }

    /// One character per block: `#` hidden, `F` flag, digit when numbered,
    /// `*` revealed bomb, space once removed
    fn draw(grid: &Grid) {
        let s = grid.size() as i32;
        for z in 0..s {
            println!("z={z}");
            for y in 0..s {
                let row: String = (0..s)
                    .map(|x| match grid.get(IVec3::new(x, y, z)) {
                        Some(c) if c.removed => ' ',
                        Some(c) if c.flagged => 'F',
                        Some(c) if c.revealed && c.is_bomb => '*',
                        Some(c) if c.revealed => {
                            char::from_digit(c.risk.min(9) as u32, 10).unwrap_or('+')
                        }
                        _ => '#',
                    })
                    .collect();
                println!("  {row}");
            }
        }
    }

    pub fn run() -> io::Result<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let config = GameConfig::from_args(&args);
        let joined = args.join("&");
        let seed = query_param(&joined, "seed")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or_default()
            });

        let mut session = GameSession::new(config, seed);
        draw(session.grid());

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                break;
            };

            let mut events: Vec<GameEvent> = Vec::new();
            match parse_command(&line) {
                Some(Command::Act(action, coord)) => {
                    session.act(coord, action, &mut events);
                }
                Some(Command::Validate) => {
                    let report = session.validate_flags();
                    println!(
                        "{} correct flags, {} incorrect flags, {} bombs",
                        report.correct, report.incorrect, report.bombs
                    );
                }
                Some(Command::Numbers) => session.show_numbers(&mut events),
                Some(Command::Quit) => break,
                None => {
                    log::warn!("Unrecognised command: {line:?}");
                    continue;
                }
            }
            for event in &events {
                log::debug!("{event:?}");
            }
            draw(session.grid());

            match session.phase() {
                GamePhase::Playing => {}
                GamePhase::Won => {
                    println!("You Won!!");
                    break;
                }
                GamePhase::Lost => {
                    println!("Game Over!");
                    break;
                }
            }
        }

        let config = session.teardown();
        println!("Play again: {}", config.restart_url());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cube Sweeper (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("Terminal error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
