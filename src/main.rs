use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;
use wulin::config::EngineConfig;
use wulin::frontend_headless::HeadlessFrontend;
use wulin::interpreter::{EngineContext, Interpreter, PauseReason, ScriptState};

/// Frames the headless runner plays before giving up on a script
const MAX_FRAMES: u32 = 100_000;

fn print_usage(program: &str) {
    println!("wulin - event script engine for the classic wuxia RPG data set");
    println!();
    println!(
        "Usage: {} [config.toml] [--slot N] [--run SCRIPT_ID]",
        program
    );
    println!("Examples:");
    println!("  {} wulin.toml --slot 1", program);
    println!("  {} wulin.toml --run 100", program);
    println!();
    println!("--slot selects the save slot (0 = new game, 1-3 = saves).");
    println!("--run executes one event script headlessly, answering every prompt");
    println!("with the configured headless_answer, and lists what the script asked for.");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("wulin");

    let mut config_path = PathBuf::from("wulin.toml");
    let mut slot: u8 = 0;
    let mut run: Option<i16> = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            "--slot" => {
                let value = rest.next().ok_or("--slot needs a value")?;
                slot = value
                    .parse()
                    .map_err(|_| format!("Invalid slot: {}", value))?;
            }
            "--run" => {
                let value = rest.next().ok_or("--run needs a script id")?;
                run = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid script id: {}", value))?,
                );
            }
            path => config_path = PathBuf::from(path),
        }
    }

    let config = EngineConfig::load(&config_path)?;
    let answer = config.headless_answer;
    debug!("Configuration: {:?}", config);

    let frontend = HeadlessFrontend::new();
    let requests = frontend.log();
    let ctx = EngineContext::load(config, slot, Box::new(frontend))?;
    let mut interpreter = Interpreter::new(ctx);
    info!(
        "Slot {} loaded, sub-map {:?} at {:?}",
        slot,
        interpreter.ctx.world.submap(),
        interpreter.ctx.world.position()
    );

    let Some(script) = run else {
        return Ok(());
    };

    interpreter.run_event(script)?;
    let mut frames = 0;
    loop {
        match interpreter.state() {
            ScriptState::Idle | ScriptState::Running => break,
            ScriptState::Paused(PauseReason::Frontend) => interpreter.continue_events(answer)?,
            ScriptState::Paused(_) => interpreter.tick()?,
        }
        frames += 1;
        if frames >= MAX_FRAMES {
            warn!("Script {} still active after {} frames", script, frames);
            break;
        }
    }

    info!(
        "Script {} done: {} instructions, {} requests",
        script,
        interpreter.instruction_count(),
        requests.borrow().len()
    );
    for request in requests.borrow().iter() {
        println!("{:?}", request);
    }
    Ok(())
}
