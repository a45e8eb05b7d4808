//! Hack Emulator - CLI Entry Point
//!
//! Commands:
//! - `hack-emu run <program.hack>` - Run a program until it halts
//! - `hack-emu debug <program.hack>` - Interactive debugger
//! - `hack-emu disasm <program.hack>` - Disassemble a program
//! - `hack-emu config` - Print the default machine configuration

use clap::{Parser, Subcommand};
use hack::{load_hack, HackFile, Machine, MachineConfig, Word16};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hack-emu")]
#[command(version)]
#[command(about = "A cycle-accurate emulator of the 16-bit Hack computer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the .hack file to execute
        program: PathBuf,
        /// Maximum number of cycles to run
        #[arg(short, long, default_value = "1000000")]
        max_cycles: u64,
        /// Log every executed instruction
        #[arg(short, long)]
        trace: bool,
        /// Initialize memory before running, e.g. `--set 0=3 --set 1=4`
        #[arg(short, long = "set", value_name = "ADDR=VALUE", value_parser = parse_assignment)]
        set: Vec<(u16, i16)>,
        /// Key code held at the keyboard register
        #[arg(short, long, default_value = "0")]
        keyboard: u16,
        /// Print RAM words after the run, e.g. `--dump 0:16`
        #[arg(short, long, value_name = "START:COUNT", value_parser = parse_range)]
        dump: Option<(usize, usize)>,
        /// Print the screen as text after the run
        #[arg(long)]
        screen: bool,
        /// JSON machine configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Interactive debugger
    Debug {
        /// Path to the .hack file to debug
        program: PathBuf,
        /// JSON machine configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Disassemble a .hack file to readable text
    Disasm {
        /// Path to the .hack file
        program: PathBuf,
    },
    /// Print the default machine configuration as JSON
    Config,
}

fn parse_assignment(s: &str) -> Result<(u16, i16), String> {
    let (addr, value) = s.split_once('=').ok_or("expected ADDR=VALUE")?;
    let addr = addr.trim().parse::<u16>().map_err(|e| format!("bad address: {}", e))?;
    let value = value.trim().parse::<i16>().map_err(|e| format!("bad value: {}", e))?;
    Ok((addr, value))
}

fn parse_range(s: &str) -> Result<(usize, usize), String> {
    let (start, count) = s.split_once(':').ok_or("expected START:COUNT")?;
    let start = start.trim().parse::<usize>().map_err(|e| format!("bad start: {}", e))?;
    let count = count.trim().parse::<usize>().map_err(|e| format!("bad count: {}", e))?;
    Ok((start, count))
}

fn init_logging(trace: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if trace {
        builder.filter_module("hack", LevelFilter::Trace);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { program, max_cycles, trace, set, keyboard, dump, screen, config } => {
            init_logging(trace);
            let config = load_config(config.as_ref());
            run_program(&program, config, max_cycles, &set, keyboard, dump, screen);
        }
        Commands::Debug { program, config } => {
            let config = load_config(config.as_ref());
            debug_program(&program, config);
        }
        Commands::Disasm { program } => {
            init_logging(false);
            disassemble_file(&program);
        }
        Commands::Config => match MachineConfig::default().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn load_config(path: Option<&PathBuf>) -> MachineConfig {
    match path {
        None => MachineConfig::default(),
        Some(path) => match MachineConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
    }
}

fn load_program(path: &PathBuf) -> HackFile {
    let image = match load_hack(path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    if image.is_empty() {
        eprintln!("❌ No instructions to execute");
        std::process::exit(1);
    }

    image
}

fn run_program(
    path: &PathBuf,
    config: MachineConfig,
    max_cycles: u64,
    set: &[(u16, i16)],
    keyboard: u16,
    dump: Option<(usize, usize)>,
    screen: bool,
) {
    let image = load_program(path);
    println!("🔧 Running: {} ({} instructions)", path.display(), image.len());

    let mut machine = Machine::with_config(config);
    if let Err(e) = machine.load_program(&image.instructions) {
        eprintln!("❌ Failed to load program: {}", e);
        std::process::exit(1);
    }

    for &(addr, value) in set {
        if let Err(e) = machine.poke(addr, Word16::from_i16(value)) {
            eprintln!("❌ --set {}={}: {}", addr, value, e);
            std::process::exit(1);
        }
    }
    machine.set_keyboard(Word16::new(keyboard));

    let cycles = match machine.run(max_cycles) {
        Ok(cycles) => cycles,
        Err(e) => {
            let pc = machine.cpu.pc();
            match image.source_line(pc) {
                Some(line) => eprintln!("❌ Machine error at PC={} (line {}): {}", pc, line, e),
                None => eprintln!("❌ Machine error at PC={}: {}", pc, e),
            }
            std::process::exit(1);
        }
    };

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", cycles);
    println!("State:  {:?}", machine.state);
    println!("A:      {} ({})", machine.cpu.a(), machine.cpu.a().to_i16());
    println!("D:      {} ({})", machine.cpu.d(), machine.cpu.d().to_i16());
    println!("PC:     {}", machine.cpu.pc());

    if let Some((start, count)) = dump {
        println!();
        println!("━━━ RAM ━━━");
        for (addr, value) in machine.mem.ram.dump(start, count) {
            println!("{:05}: {:>6}  {}", addr, value.to_i16(), value);
        }
    }

    if screen {
        println!();
        println!("━━━ Screen ━━━");
        for row in machine.screen().render(128, 64) {
            println!("{}", row);
        }
    }

    if machine.is_running() && cycles >= max_cycles {
        println!();
        println!("⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.", max_cycles);
    }
}

#[cfg(feature = "tui")]
fn debug_program(path: &PathBuf, config: MachineConfig) {
    let instructions = load_program(path).instructions;
    println!("🔍 Loaded {} instructions, launching debugger...", instructions.len());

    if let Err(e) = hack::run_debugger(instructions, config) {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn debug_program(_path: &PathBuf, _config: MachineConfig) {
    eprintln!("❌ Built without the `tui` feature; the debugger is unavailable");
    std::process::exit(1);
}

fn disassemble_file(path: &PathBuf) {
    let instructions = load_program(path).instructions;
    print!("{}", hack::disassemble(&instructions));
}
